//! CLI command implementations

use clap::Subcommand;

pub mod detect;
pub mod inspect;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Identify the language of texts or files
    Detect(detect::DetectArgs),

    /// Show the contents of a model file
    Inspect(inspect::InspectArgs),
}

/// Initialize logging based on verbosity level
pub(crate) fn init_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // A second initialization only happens in tests and is harmless.
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .try_init();
}
