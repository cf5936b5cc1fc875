//! Script distribution feature
//!
//! Emits one id per script found in the text, weighted by the fraction of
//! letters written in that script. Mixed-script text thus spreads its
//! weight over several embedding rows.

use super::SparseFeature;
use crate::tokenizer::Token;
use crate::unicode::{self, Script};

/// Relative frequency of each script over all tokens
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelevantScriptFeature;

impl RelevantScriptFeature {
    /// Number of distinct ids the feature can emit
    pub fn id_space(&self) -> usize {
        Script::COUNT
    }

    /// Weighted script ids, ordered by script id
    pub fn extract(&self, tokens: &[Token]) -> Vec<SparseFeature> {
        let mut counts = [0usize; Script::COUNT];
        for token in tokens.iter().filter(|token| !token.is_padding) {
            for ch in token.value.chars() {
                let script = unicode::script(ch);
                if script != Script::Common {
                    counts[script.id() as usize] += 1;
                }
            }
        }

        let total: usize = counts.iter().sum();
        if total == 0 {
            return Vec::new();
        }
        counts
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(id, &count)| SparseFeature {
                id: id as u32,
                weight: count as f32 / total as f32,
            })
            .collect()
    }
}
