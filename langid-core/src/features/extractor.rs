//! Hashed character n-gram features for a single token
//!
//! A word is wrapped in start/end sentinels (`^word$`), long words are cut
//! down to a prefix and a suffix joined by a separator codepoint, and every
//! n-gram of the configured orders is fingerprinted into a fixed number of
//! buckets. The byte-oriented and codepoint-oriented variants hash the same
//! substrings for ASCII input, so they produce identical ids.

use super::options::FeatureExtractionOptions;
use super::FeatureVector;
use crate::error::FeatureError;
use crate::tokenizer::Token;
use crate::unicode::{self, RegexPattern};
use smallvec::SmallVec;
use std::iter;

/// Text hashed in place of a padding token
const PADDING_TOKEN: &str = "<PAD>";

/// Start-of-word sentinel
const WORD_START: char = '^';

/// End-of-word sentinel
const WORD_END: char = '$';

/// Joins the prefix and suffix of a trimmed word; never produced by the
/// tokenizer
const TRIM_SEPARATOR: char = '\u{1}';

/// Extracts sparse n-gram ids and dense side features from tokens
#[derive(Debug, Clone)]
pub struct TokenFeatureExtractor {
    options: FeatureExtractionOptions,
    regex_patterns: Vec<RegexPattern>,
}

impl TokenFeatureExtractor {
    /// Create an extractor
    ///
    /// Regular expressions that fail to compile are kept and always emit
    /// -1; only structurally invalid options are rejected.
    pub fn new(options: FeatureExtractionOptions) -> Result<Self, FeatureError> {
        options.validate()?;
        let regex_patterns = options
            .regexp_features
            .iter()
            .map(|pattern| RegexPattern::compile(pattern))
            .collect();
        Ok(Self {
            options,
            regex_patterns,
        })
    }

    /// Get the extraction options
    pub fn options(&self) -> &FeatureExtractionOptions {
        &self.options
    }

    /// Number of dense values emitted per token
    pub fn dense_dim(&self) -> usize {
        self.options.dense_dim()
    }

    /// Bucket id of a byte string
    pub fn hash_token(&self, bytes: &[u8]) -> u32 {
        // num_buckets > 0 is checked in `new`
        (farmhash::fingerprint64(bytes) % self.options.num_buckets as u64) as u32
    }

    /// Sparse and dense features of one token
    pub fn extract(&self, token: &Token) -> FeatureVector {
        let sparse = self.extract_chargram_features(token);
        let mut dense = SmallVec::new();

        if self.options.extract_case_feature {
            let starts_upper = if self.options.unicode_aware_features {
                token.value.chars().next().is_some_and(unicode::is_upper)
            } else {
                token
                    .value
                    .as_bytes()
                    .first()
                    .is_some_and(|b| b.is_ascii_uppercase())
            };
            dense.push(if starts_upper { 1.0 } else { -1.0 });
        }

        if self.options.extract_selection_mask_feature {
            if token.is_in_span {
                dense.push(1.0);
            } else if self.options.unicode_aware_features {
                dense.push(-1.0);
            } else {
                dense.push(0.0);
            }
        }

        for pattern in &self.regex_patterns {
            dense.push(if pattern.find(&token.value) { 1.0 } else { -1.0 });
        }

        FeatureVector { sparse, dense }
    }

    /// Features of every token, in input order
    pub fn extract_all(&self, tokens: &[Token]) -> Vec<FeatureVector> {
        tokens.iter().map(|token| self.extract(token)).collect()
    }

    /// Sparse n-gram ids, using the variant selected by the options
    pub fn extract_chargram_features(&self, token: &Token) -> Vec<u32> {
        if self.options.unicode_aware_features {
            self.extract_chargram_features_unicode(token)
        } else {
            self.extract_chargram_features_ascii(token)
        }
    }

    /// Sparse n-gram ids computed over bytes
    pub fn extract_chargram_features_ascii(&self, token: &Token) -> Vec<u32> {
        if token.is_padding {
            return vec![self.hash_token(PADDING_TOKEN.as_bytes())];
        }

        let feature_word = self.ascii_feature_word(token);
        let mut result =
            Vec::with_capacity(self.options.chargram_orders.len() * feature_word.len());
        for &order in &self.options.chargram_orders {
            let grams = if order == 1 {
                &feature_word[1..feature_word.len() - 1]
            } else {
                &feature_word[..]
            };
            result.extend(grams.windows(order).map(|gram| self.hash_token(gram)));
        }
        result
    }

    /// Sparse n-gram ids computed over codepoints
    pub fn extract_chargram_features_unicode(&self, token: &Token) -> Vec<u32> {
        if token.is_padding {
            return vec![self.hash_token(PADDING_TOKEN.as_bytes())];
        }

        let feature_word = self.unicode_feature_word(token);
        // Byte offset of every codepoint, plus the end of the word.
        let boundaries: Vec<usize> = feature_word
            .char_indices()
            .map(|(offset, _)| offset)
            .chain(iter::once(feature_word.len()))
            .collect();
        let num_chars = boundaries.len() - 1;

        let mut result = Vec::with_capacity(self.options.chargram_orders.len() * num_chars);
        for &order in &self.options.chargram_orders {
            let (first, last) = if order == 1 {
                (1, num_chars - 1)
            } else {
                (0, num_chars)
            };
            if last - first < order {
                continue;
            }
            for start in first..=last - order {
                let gram = &feature_word[boundaries[start]..boundaries[start + order]];
                result.push(self.hash_token(gram.as_bytes()));
            }
        }
        result
    }

    /// Sentinel-wrapped, possibly trimmed word used by the byte variant
    pub(crate) fn ascii_feature_word(&self, token: &Token) -> Vec<u8> {
        let mut word = token.value.as_bytes().to_vec();
        if self.options.remap_digits {
            word.iter_mut()
                .filter(|b| b.is_ascii_digit())
                .for_each(|b| *b = b'0');
        }

        let max_word_length = self.options.max_word_length;
        let mut feature_word = Vec::with_capacity(word.len() + 3);
        feature_word.push(WORD_START as u8);
        if word.len() > max_word_length {
            let half = max_word_length / 2;
            feature_word.extend_from_slice(&word[..half]);
            feature_word.push(TRIM_SEPARATOR as u8);
            feature_word.extend_from_slice(&word[word.len() - half..]);
        } else {
            feature_word.extend_from_slice(&word);
        }
        feature_word.push(WORD_END as u8);
        feature_word
    }

    /// Sentinel-wrapped, possibly trimmed word used by the codepoint variant
    pub(crate) fn unicode_feature_word(&self, token: &Token) -> String {
        let word: Vec<char> = if self.options.remap_digits {
            token
                .value
                .chars()
                .map(|ch| if unicode::is_digit(ch) { '0' } else { ch })
                .collect()
        } else {
            token.value.chars().collect()
        };

        let max_word_length = self.options.max_word_length;
        let mut feature_word = String::with_capacity(token.value.len() + 3);
        feature_word.push(WORD_START);
        if word.len() > max_word_length {
            let half = max_word_length / 2;
            feature_word.extend(&word[..half]);
            feature_word.push(TRIM_SEPARATOR);
            feature_word.extend(&word[word.len() - half..]);
        } else {
            feature_word.extend(&word);
        }
        feature_word.push(WORD_END);
        feature_word
    }
}
