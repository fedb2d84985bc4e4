//! Tokenization for collation.
//!
//! Turns raw document text into an ordered list of [`Token`]s. Each token
//! carries the text used for comparison (possibly case folded) and the
//! byte range of the source text it was read from. Two documents may only
//! be compared when they were tokenized under equal [`TokenizerSettings`].

pub mod settings;
pub mod simple;

pub use settings::{Granularity, TokenizerSettings};
pub use simple::SimpleTokenizer;

use serde::{Deserialize, Serialize};

/// A single comparable unit of a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    /// Comparison key (after case folding, if enabled).
    pub text: String,
    /// Byte offset of the token in the source text.
    pub offset: usize,
    /// Length of the token in the source text, in bytes.
    pub length: usize,
}

impl Token {
    pub fn new(text: impl Into<String>, offset: usize, length: usize) -> Self {
        Self {
            text: text.into(),
            offset,
            length,
        }
    }

    /// Byte offset just past the end of the token.
    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

/// Something that can split text into tokens.
pub trait Tokenizer {
    /// The settings this tokenizer applies.
    fn settings(&self) -> &TokenizerSettings;

    /// Tokenize a whole document.
    fn tokenize(&self, text: &str) -> Vec<Token>;

    /// Tokenize `text[start..end]`, reporting offsets relative to `start`.
    ///
    /// An out-of-bounds or non-char-boundary range yields no tokens.
    fn tokenize_range(&self, text: &str, start: usize, end: usize) -> Vec<Token> {
        match text.get(start..end) {
            Some(slice) => self.tokenize(slice),
            None => Vec::new(),
        }
    }
}
