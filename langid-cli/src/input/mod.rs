//! Input handling module

pub mod file_reader;
pub mod glob_resolver;

pub use file_reader::FileReader;
pub use glob_resolver::resolve_patterns;

/// A piece of text to classify, labelled with where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInput {
    /// Label printed next to the result
    pub source: String,
    /// Text to classify
    pub text: String,
}

impl TextInput {
    /// Create an input
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text: text.into(),
        }
    }

    /// One input per non-blank line, labelled `source:line`
    pub fn split_lines(&self) -> Vec<TextInput> {
        self.text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| TextInput::new(format!("{}:{}", self.source, index + 1), line))
            .collect()
    }
}
