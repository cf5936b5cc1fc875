//! Plain text output formatter

use super::{Detection, OutputFormatter};
use anyhow::Result;
use std::io::Write;

/// Text formatter - one `source<TAB>language` line per input, followed by
/// indented per-language probabilities when scores are present
pub struct TextFormatter<W: Write> {
    writer: W,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputFormatter for TextFormatter<W> {
    fn format_detection(&mut self, detection: &Detection) -> Result<()> {
        writeln!(self.writer, "{}\t{}", detection.source, detection.language)?;
        if let Some(scores) = &detection.scores {
            for score in scores {
                writeln!(self.writer, "  {}\t{:.4}", score.language, score.probability)?;
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
