//! Tokenizer settings.

use serde::{Deserialize, Serialize};

/// Size of the units a document is split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    /// Runs of letters and digits.
    Word,
    /// Single characters.
    Character,
}

impl Granularity {
    /// The next finer granularity (characters stay characters).
    pub fn finer(self) -> Self {
        match self {
            Self::Word => Self::Character,
            Self::Character => Self::Character,
        }
    }
}

/// Filtering applied while tokenizing.
///
/// Two documents must share identical settings before they can be compared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenizerSettings {
    /// Compare tokens case-insensitively.
    pub filter_case: bool,
    /// Drop punctuation instead of emitting it as tokens.
    pub filter_punctuation: bool,
    /// Ignore line structure. When false, whitespace containing a line
    /// break becomes a token of its own.
    pub filter_whitespace: bool,
    /// Token size.
    pub granularity: Granularity,
}

impl Default for TokenizerSettings {
    fn default() -> Self {
        Self {
            filter_case: true,
            filter_punctuation: true,
            filter_whitespace: true,
            granularity: Granularity::Word,
        }
    }
}

impl TokenizerSettings {
    /// Settings that keep case, punctuation, and line breaks significant.
    pub fn unfiltered() -> Self {
        Self {
            filter_case: false,
            filter_punctuation: false,
            filter_whitespace: false,
            granularity: Granularity::Word,
        }
    }

    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }
}
