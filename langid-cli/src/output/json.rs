//! JSON output formatter

use super::{Detection, OutputFormatter};
use anyhow::Result;
use std::io::Write;

/// JSON formatter - outputs detections as a JSON array
pub struct JsonFormatter<W: Write> {
    writer: W,
    detections: Vec<Detection>,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            detections: Vec::new(),
        }
    }
}

impl<W: Write> OutputFormatter for JsonFormatter<W> {
    fn format_detection(&mut self, detection: &Detection) -> Result<()> {
        self.detections.push(detection.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, &self.detections)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
