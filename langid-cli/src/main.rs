use clap::Parser;
use langid_cli::commands::Commands;

/// Identify the language of text with an on-device model
#[derive(Debug, Parser)]
#[command(name = "langid", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Detect(args) => args.execute(),
        Commands::Inspect(args) => args.execute(),
    }
}
