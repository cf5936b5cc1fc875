//! Script-aware tokenization
//!
//! Text is split on whitespace and wherever the script of consecutive
//! letters changes ("hello世界" yields two tokens). Characters of the
//! Common script (punctuation, digits, combining marks) never start a new
//! token on their own; with `letters_only` everything except letters and
//! marks acts as a separator, as language identification only looks at
//! words.

use crate::unicode::{self, Script};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A contiguous run of text produced by the tokenizer
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Token {
    /// Token text, lowercased if the tokenizer is configured to
    pub value: String,
    /// Byte offset of the first character in the input
    pub start: usize,
    /// Byte offset one past the last character in the input
    pub end: usize,
    /// Synthetic boundary token carrying no text
    pub is_padding: bool,
    /// Whether the token lies inside the caller's span of interest
    pub is_in_span: bool,
}

impl Token {
    /// Create a regular token
    pub fn new(value: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            value: value.into(),
            start,
            end,
            is_padding: false,
            is_in_span: false,
        }
    }

    /// Create a padding token
    pub fn padding() -> Self {
        Self {
            is_padding: true,
            ..Default::default()
        }
    }

    /// Mark whether the token lies inside the span of interest
    pub fn in_span(mut self, is_in_span: bool) -> Self {
        self.is_in_span = is_in_span;
        self
    }

    /// Byte range of the token in the input text
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Tokenizer configuration, read from the `[tokenizer]` table of a model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerOptions {
    /// Lowercase token text
    pub lowercase: bool,
    /// Start a new token when the script of consecutive letters changes
    pub split_on_script_change: bool,
    /// Treat everything except letters and combining marks as separators
    pub letters_only: bool,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            lowercase: true,
            split_on_script_change: true,
            letters_only: true,
        }
    }
}

/// Token under construction
struct PendingToken {
    value: String,
    start: usize,
    end: usize,
    script: Script,
}

/// Splits text into tokens; holds no state between calls
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    options: TokenizerOptions,
}

impl Tokenizer {
    /// Create a tokenizer with the given options
    pub fn new(options: TokenizerOptions) -> Self {
        Self { options }
    }

    /// Get the tokenizer options
    pub fn options(&self) -> &TokenizerOptions {
        &self.options
    }

    /// Tokenize `text`; no token is marked as in-span
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        self.split(text, None)
    }

    /// Tokenize `text`, marking tokens that lie entirely inside the byte
    /// range `span`
    pub fn tokenize_with_span(&self, text: &str, span: Range<usize>) -> Vec<Token> {
        self.split(text, Some(span))
    }

    fn is_separator(&self, ch: char) -> bool {
        unicode::is_whitespace(ch)
            || (self.options.letters_only && !(unicode::is_letter(ch) || unicode::is_mark(ch)))
    }

    fn split(&self, text: &str, span: Option<Range<usize>>) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut pending: Option<PendingToken> = None;

        for (offset, ch) in text.char_indices() {
            if self.is_separator(ch) {
                if let Some(done) = pending.take() {
                    tokens.push(Self::finish(done, span.as_ref()));
                }
                continue;
            }

            let ch_script = unicode::script(ch);
            let script_changed = pending.as_ref().is_some_and(|token| {
                token.script != Script::Common
                    && ch_script != Script::Common
                    && token.script != ch_script
            });
            if self.options.split_on_script_change && script_changed {
                if let Some(done) = pending.take() {
                    tokens.push(Self::finish(done, span.as_ref()));
                }
            }

            let token = pending.get_or_insert_with(|| PendingToken {
                value: String::new(),
                start: offset,
                end: offset,
                script: ch_script,
            });
            if self.options.lowercase {
                token.value.extend(ch.to_lowercase());
            } else {
                token.value.push(ch);
            }
            if token.script == Script::Common {
                token.script = ch_script;
            }
            token.end = offset + ch.len_utf8();
        }

        if let Some(done) = pending.take() {
            tokens.push(Self::finish(done, span.as_ref()));
        }
        tokens
    }

    fn finish(pending: PendingToken, span: Option<&Range<usize>>) -> Token {
        let is_in_span =
            span.is_some_and(|span| pending.start >= span.start && pending.end <= span.end);
        Token::new(pending.value, pending.start, pending.end).in_span(is_in_span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.value.as_str()).collect()
    }

    fn verbatim() -> Tokenizer {
        Tokenizer::new(TokenizerOptions {
            lowercase: false,
            split_on_script_change: true,
            letters_only: false,
        })
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        let tokenizer = Tokenizer::default();
        assert!(tokenizer.tokenize("").is_empty());
        assert!(tokenizer.tokenize(" \t\n  ").is_empty());
    }

    #[test]
    fn test_whitespace_split_with_offsets() {
        let tokens = verbatim().tokenize("Hello  world");
        assert_eq!(values(&tokens), vec!["Hello", "world"]);
        assert_eq!(tokens[0].range(), 0..5);
        assert_eq!(tokens[1].range(), 7..12);
        assert!(tokens.iter().all(|t| !t.is_padding && !t.is_in_span));
    }

    #[test]
    fn test_script_change_splits() {
        let tokens = verbatim().tokenize("hello世界");
        assert_eq!(values(&tokens), vec!["hello", "世界"]);
        assert_eq!(tokens[1].start, 5);
    }

    #[test]
    fn test_script_change_split_can_be_disabled() {
        let tokenizer = Tokenizer::new(TokenizerOptions {
            split_on_script_change: false,
            ..TokenizerOptions::default()
        });
        assert_eq!(values(&tokenizer.tokenize("hello世界")), vec!["hello世界"]);
    }

    #[test]
    fn test_common_characters_do_not_split() {
        let tokens = verbatim().tokenize("abc123 «да»");
        assert_eq!(values(&tokens), vec!["abc123", "«да»"]);
    }

    #[test]
    fn test_letters_only_drops_digits_and_punctuation() {
        let tokens = Tokenizer::default().tokenize("Don't stop, 42 times!");
        assert_eq!(values(&tokens), vec!["don", "t", "stop", "times"]);
    }

    #[test]
    fn test_combining_marks_stay_in_token() {
        let tokens = Tokenizer::default().tokenize("cafe\u{0301} ok");
        assert_eq!(values(&tokens), vec!["cafe\u{0301}", "ok"]);
    }

    #[test]
    fn test_lowercasing_keeps_original_offsets() {
        let tokens = Tokenizer::default().tokenize("ÉTÉ");
        assert_eq!(values(&tokens), vec!["été"]);
        assert_eq!(tokens[0].range(), 0.."ÉTÉ".len());
    }

    #[test]
    fn test_span_marking() {
        let text = "one two three";
        let tokens = Tokenizer::default().tokenize_with_span(text, 4..7);
        let flags: Vec<bool> = tokens.iter().map(|t| t.is_in_span).collect();
        assert_eq!(flags, vec![false, true, false]);
    }

    #[test]
    fn test_tokenization_is_restartable() {
        let tokenizer = Tokenizer::default();
        let first = tokenizer.tokenize("Guten Tag");
        let second = tokenizer.tokenize("Guten Tag");
        assert_eq!(first, second);
    }

    #[test]
    fn test_padding_token() {
        let pad = Token::padding();
        assert!(pad.is_padding);
        assert!(pad.value.is_empty());
    }
}
