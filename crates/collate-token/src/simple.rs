//! Whitespace and punctuation driven tokenizer.
//!
//! Whitespace only separates tokens. Letters and digits form word tokens
//! (or one token per character at [`Granularity::Character`]). Punctuation
//! is either dropped or emitted one character at a time. With whitespace
//! filtering off, any whitespace run containing a line break becomes a
//! `"\n"` token so that line structure takes part in the comparison.

use crate::{Granularity, Token, Tokenizer, TokenizerSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Word,
    Punctuation,
    Whitespace,
}

fn classify(ch: char) -> CharClass {
    if ch.is_whitespace() {
        CharClass::Whitespace
    } else if ch.is_alphanumeric() {
        CharClass::Word
    } else {
        CharClass::Punctuation
    }
}

/// The default tokenizer.
#[derive(Debug, Clone, Default)]
pub struct SimpleTokenizer {
    settings: TokenizerSettings,
}

impl SimpleTokenizer {
    pub fn new(settings: TokenizerSettings) -> Self {
        Self { settings }
    }

    fn push(&self, tokens: &mut Vec<Token>, text: &str, start: usize, end: usize) {
        let raw = &text[start..end];
        let key = if self.settings.filter_case {
            raw.to_lowercase()
        } else {
            raw.to_string()
        };
        tokens.push(Token::new(key, start, end - start));
    }

    fn flush_whitespace(&self, tokens: &mut Vec<Token>, text: &str, start: usize, end: usize) {
        if !self.settings.filter_whitespace && text[start..end].contains('\n') {
            tokens.push(Token::new("\n", start, end - start));
        }
    }
}

impl Tokenizer for SimpleTokenizer {
    fn settings(&self) -> &TokenizerSettings {
        &self.settings
    }

    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut word_start: Option<usize> = None;
        let mut space_start: Option<usize> = None;

        for (i, ch) in text.char_indices() {
            let class = classify(ch);

            if class != CharClass::Word {
                if let Some(start) = word_start.take() {
                    self.push(&mut tokens, text, start, i);
                }
            }
            if class != CharClass::Whitespace {
                if let Some(start) = space_start.take() {
                    self.flush_whitespace(&mut tokens, text, start, i);
                }
            }

            let end = i + ch.len_utf8();
            match class {
                CharClass::Word => match self.settings.granularity {
                    Granularity::Word => {
                        word_start.get_or_insert(i);
                    }
                    Granularity::Character => self.push(&mut tokens, text, i, end),
                },
                CharClass::Punctuation => {
                    if !self.settings.filter_punctuation {
                        self.push(&mut tokens, text, i, end);
                    }
                }
                CharClass::Whitespace => {
                    space_start.get_or_insert(i);
                }
            }
        }

        if let Some(start) = word_start {
            self.push(&mut tokens, text, start, text.len());
        }
        if let Some(start) = space_start {
            self.flush_whitespace(&mut tokens, text, start, text.len());
        }

        tokens
    }
}
