//! Unicode character classification and regular expressions
//!
//! Per-codepoint queries (script, digit, case, whitespace) and a small
//! regex wrapper used by the tokenizer and the feature extractors. Category
//! lookups outside ASCII are answered from the `regex` crate's Unicode
//! tables.

use regex::{Regex, RegexSet};
use std::fmt;
use std::sync::LazyLock;

/// Writing systems distinguished by the tokenizer and the script feature
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Script {
    /// Punctuation, symbols, digits and anything not listed below
    Common,
    /// Latin alphabet
    Latin,
    /// Greek alphabet
    Greek,
    /// Cyrillic alphabet
    Cyrillic,
    /// Armenian alphabet
    Armenian,
    /// Hebrew abjad
    Hebrew,
    /// Arabic abjad
    Arabic,
    /// Devanagari abugida
    Devanagari,
    /// Bengali abugida
    Bengali,
    /// Tamil abugida
    Tamil,
    /// Thai abugida
    Thai,
    /// Georgian alphabet
    Georgian,
    /// Ethiopic abugida
    Ethiopic,
    /// Korean Hangul
    Hangul,
    /// Japanese Hiragana
    Hiragana,
    /// Japanese Katakana
    Katakana,
    /// CJK ideographs
    Han,
}

impl Script {
    /// Number of distinct scripts
    pub const COUNT: usize = 17;

    /// All scripts, indexed by [`Script::id`]
    pub const ALL: [Script; Script::COUNT] = [
        Script::Common,
        Script::Latin,
        Script::Greek,
        Script::Cyrillic,
        Script::Armenian,
        Script::Hebrew,
        Script::Arabic,
        Script::Devanagari,
        Script::Bengali,
        Script::Tamil,
        Script::Thai,
        Script::Georgian,
        Script::Ethiopic,
        Script::Hangul,
        Script::Hiragana,
        Script::Katakana,
        Script::Han,
    ];

    /// Dense integer id of the script
    pub fn id(self) -> u32 {
        self as u32
    }

    /// Script name as used in Unicode property syntax
    pub fn name(self) -> &'static str {
        match self {
            Script::Common => "Common",
            Script::Latin => "Latin",
            Script::Greek => "Greek",
            Script::Cyrillic => "Cyrillic",
            Script::Armenian => "Armenian",
            Script::Hebrew => "Hebrew",
            Script::Arabic => "Arabic",
            Script::Devanagari => "Devanagari",
            Script::Bengali => "Bengali",
            Script::Tamil => "Tamil",
            Script::Thai => "Thai",
            Script::Georgian => "Georgian",
            Script::Ethiopic => "Ethiopic",
            Script::Hangul => "Hangul",
            Script::Hiragana => "Hiragana",
            Script::Katakana => "Katakana",
            Script::Han => "Han",
        }
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// One pattern per non-Common script, in `Script::ALL[1..]` order.
static SCRIPTS: LazyLock<RegexSet> = LazyLock::new(|| {
    let patterns = Script::ALL[1..]
        .iter()
        .map(|script| format!(r"^\p{{{}}}$", script.name()));
    RegexSet::new(patterns).expect("script property patterns are valid")
});

static DECIMAL_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\p{Nd}$").expect("digit pattern is valid"));

static UPPERCASE_LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\p{Lu}$").expect("uppercase pattern is valid"));

static MARK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\p{M}$").expect("mark pattern is valid"));

fn matches_char(regex: &Regex, ch: char) -> bool {
    let mut buf = [0u8; 4];
    regex.is_match(ch.encode_utf8(&mut buf))
}

/// Script of a codepoint; [`Script::Common`] when it belongs to none of the
/// distinguished scripts
pub fn script(ch: char) -> Script {
    if ch.is_ascii() {
        return if ch.is_ascii_alphabetic() {
            Script::Latin
        } else {
            Script::Common
        };
    }
    let mut buf = [0u8; 4];
    SCRIPTS
        .matches(ch.encode_utf8(&mut buf))
        .iter()
        .next()
        .map_or(Script::Common, |index| Script::ALL[index + 1])
}

/// Whitespace in the Unicode `White_Space` sense
pub fn is_whitespace(ch: char) -> bool {
    ch.is_whitespace()
}

/// Decimal digit (general category Nd), in any script
pub fn is_digit(ch: char) -> bool {
    if ch.is_ascii() {
        return ch.is_ascii_digit();
    }
    matches_char(&DECIMAL_DIGIT, ch)
}

/// Uppercase letter (general category Lu)
pub fn is_upper(ch: char) -> bool {
    if ch.is_ascii() {
        return ch.is_ascii_uppercase();
    }
    matches_char(&UPPERCASE_LETTER, ch)
}

/// Alphabetic codepoint
pub fn is_letter(ch: char) -> bool {
    ch.is_alphabetic()
}

/// Combining mark (general category M)
pub fn is_mark(ch: char) -> bool {
    !ch.is_ascii() && matches_char(&MARK, ch)
}

/// A regular expression that may have failed to compile
///
/// A pattern that does not compile is kept rather than rejected: it never
/// matches anything.
#[derive(Debug, Clone)]
pub struct RegexPattern {
    source: String,
    regex: Option<Regex>,
}

impl RegexPattern {
    /// Compile a pattern, logging a warning if it is invalid
    pub fn compile(pattern: &str) -> Self {
        let regex = match Regex::new(pattern) {
            Ok(regex) => Some(regex),
            Err(e) => {
                tracing::warn!("Failed to compile pattern {pattern:?}: {e}");
                None
            }
        };
        Self {
            source: pattern.to_string(),
            regex,
        }
    }

    /// Whether the pattern compiled
    pub fn is_valid(&self) -> bool {
        self.regex.is_some()
    }

    /// The pattern as written
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether the pattern matches anywhere in `text`
    pub fn find(&self, text: &str) -> bool {
        self.regex.as_ref().is_some_and(|regex| regex.is_match(text))
    }

    /// Text captured by group `index` of the first match in `text`
    ///
    /// Group 0 is the whole match.
    pub fn group<'t>(&self, text: &'t str, index: usize) -> Option<&'t str> {
        self.regex
            .as_ref()?
            .captures(text)?
            .get(index)
            .map(|m| m.as_str())
    }
}
