//! Property tests for the simple tokenizer.

use collate_token::{Granularity, SimpleTokenizer, Token, Tokenizer, TokenizerSettings};
use proptest::prelude::*;

fn any_settings() -> impl Strategy<Value = TokenizerSettings> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(case, punct, ws, chars)| TokenizerSettings {
            filter_case: case,
            filter_punctuation: punct,
            filter_whitespace: ws,
            granularity: if chars {
                Granularity::Character
            } else {
                Granularity::Word
            },
        },
    )
}

proptest! {
    /// Tokens are ordered, never overlap, and address real source text.
    #[test]
    fn tokens_are_ordered_and_in_bounds(text in "\\PC{0,80}", settings in any_settings()) {
        let tokens = SimpleTokenizer::new(settings).tokenize(&text);
        let mut last_end = 0;
        for token in &tokens {
            prop_assert!(token.offset >= last_end);
            prop_assert!(token.length > 0);
            prop_assert!(token.end() <= text.len());
            prop_assert!(text.get(token.offset..token.end()).is_some());
            last_end = token.end();
        }
    }

    /// Without case folding the key is exactly the source slice (line breaks aside).
    #[test]
    fn unfolded_keys_match_source(text in "[a-zA-Z .,]{0,60}") {
        let settings = TokenizerSettings {
            filter_case: false,
            ..TokenizerSettings::default()
        };
        for token in SimpleTokenizer::new(settings).tokenize(&text) {
            prop_assert_eq!(&text[token.offset..token.end()], token.text.as_str());
        }
    }

    /// Tokenizing a range gives the whole-text tokens that fall in the range.
    #[test]
    fn range_matches_whole_text(
        words in prop::collection::vec("[a-z]{1,5}", 1..12),
        skip in 0usize..6
    ) {
        let text = words.join(" ");
        let tokenizer = SimpleTokenizer::default();
        let all = tokenizer.tokenize(&text);
        let skip = skip.min(all.len() - 1);
        let start = all[skip].offset;
        let sub: Vec<_> = tokenizer
            .tokenize_range(&text, start, text.len())
            .into_iter()
            .map(|t| Token::new(t.text, t.offset + start, t.length))
            .collect();
        prop_assert_eq!(sub, all[skip..].to_vec());
    }
}

#[test]
fn case_folding_makes_keys_equal() {
    let tokenizer = SimpleTokenizer::default();
    let a = tokenizer.tokenize("The Cat");
    let b = tokenizer.tokenize("the CAT");
    let ka: Vec<_> = a.iter().map(|t| &t.text).collect();
    let kb: Vec<_> = b.iter().map(|t| &t.text).collect();
    assert_eq!(ka, kb);
}
