//! End-to-end collation tests.
//!
//! Tokenize two texts, collate them, and check the resulting differences.

use collate_diff::{
    collate, CollateError, CollationConfig, Difference, DifferenceSet, DifferenceType, Document,
    DocumentId,
};
use collate_token::{Granularity, SimpleTokenizer, TokenizerSettings};

fn collate_with(
    base: &str,
    witness: &str,
    settings: TokenizerSettings,
    config: &CollationConfig,
) -> DifferenceSet {
    let tokenizer = SimpleTokenizer::new(settings);
    let base = Document::tokenize(DocumentId(1), base, &tokenizer);
    let witness = Document::tokenize(DocumentId(2), witness, &tokenizer);
    collate(&base, &witness, config)
        .expect("settings match")
        .into_differences()
}

fn collate_text(base: &str, witness: &str) -> DifferenceSet {
    collate_with(
        base,
        witness,
        TokenizerSettings::default(),
        &CollationConfig::default(),
    )
}

fn ids(d: Difference) -> Difference {
    d.with_documents(DocumentId(1), DocumentId(2))
}

#[test]
fn moved_word_is_insert_then_delete() {
    let set = collate_with(
        "ABBA BABBA CADABRA",
        "ABBA CADABRA BABBA",
        TokenizerSettings::unfiltered(),
        &CollationConfig::default(),
    );
    assert_eq!(
        set.differences,
        vec![
            ids(Difference::insert(5, 5..12)),
            ids(Difference::delete(11..18, 18)),
        ]
    );
}

#[test]
fn inserted_word_and_replaced_word() {
    let base = "This is the normal sentence.";
    let witness = "This is not the normal hamburger.";
    for settings in [TokenizerSettings::default(), TokenizerSettings::unfiltered()] {
        let set = collate_with(base, witness, settings, &CollationConfig::default());
        assert_eq!(set.len(), 2);

        let insert = &set.differences[0];
        assert_eq!(insert.kind, DifferenceType::Insert);
        assert_eq!(&witness[insert.witness_range()], "not");
        assert_eq!(insert.base_offset, 8);

        let change = &set.differences[1];
        assert_eq!(change.kind, DifferenceType::Change);
        assert_eq!(&base[change.base_range()], "sentence");
        assert_eq!(&witness[change.witness_range()], "hamburger");
    }
}

#[test]
fn identical_texts_have_no_differences() {
    let text = "the cat and the hat sat on the mat";
    let set = collate_text(text, text);
    assert!(set.is_empty());
    // the, cat, and, hat, sat, on, mat
    assert_eq!(set.unique_symbols, 7);
}

#[test]
fn unique_symbols_cover_both_documents() {
    let set = collate_text("a b c", "c d");
    assert_eq!(set.unique_symbols, 4);
}

#[test]
fn empty_base_is_a_single_insert() {
    let set = collate_text("", "brand new words");
    assert_eq!(set.differences, vec![ids(Difference::insert(0, 0..15))]);
}

#[test]
fn empty_witness_is_a_single_delete() {
    let set = collate_text("old words gone", "");
    assert_eq!(set.differences, vec![ids(Difference::delete(0..14, 0))]);
}

#[test]
fn both_empty() {
    assert!(collate_text("", "").is_empty());
}

#[test]
fn disjoint_alphabets_are_one_change() {
    let set = collate_text("alpha beta", "fox quiz");
    assert_eq!(set.differences, vec![ids(Difference::change(0..10, 0..8))]);
}

#[test]
fn all_tokens_repeated() {
    // No anchors anywhere: only the shared prefix and suffix match.
    let set = collate_text("la la la la", "la la");
    assert_eq!(set.len(), 1);
    assert_eq!(set.differences[0].kind, DifferenceType::Delete);
    assert_eq!(set.differences[0].base_length, 5);
}

#[test]
fn case_filtering() {
    assert!(collate_text("The Cat", "the cat").is_empty());
    let set = collate_with(
        "The Cat",
        "the cat",
        TokenizerSettings::unfiltered(),
        &CollationConfig::default(),
    );
    // Character passes leave only the capitals.
    assert_eq!(
        set.differences,
        vec![
            ids(Difference::change(0..1, 0..1)),
            ids(Difference::change(4..5, 4..5)),
        ]
    );
}

#[test]
fn punctuation_filtering() {
    assert!(collate_text("Hello, world!", "Hello world").is_empty());
    let set = collate_with(
        "Hello, world!",
        "Hello world",
        TokenizerSettings::unfiltered(),
        &CollationConfig::default(),
    );
    assert_eq!(set.count(DifferenceType::Delete), 2);
}

#[test]
fn line_breaks_count_when_whitespace_unfiltered() {
    assert!(collate_text("one two\nthree", "one two three").is_empty());
    let set = collate_with(
        "one two\nthree",
        "one two three",
        TokenizerSettings::unfiltered(),
        &CollationConfig::default(),
    );
    assert_eq!(set.count(DifferenceType::Delete), 1);
}

#[test]
fn refinement_finds_locally_unique_words() {
    let base = "the start alpha the beta end the";
    let witness = "the start gamma the delta end the";
    let single = collate_with(
        base,
        witness,
        TokenizerSettings::default(),
        &CollationConfig::single_pass(),
    );
    let one_pass = CollationConfig {
        max_passes: 1,
        ..CollationConfig::default()
    };
    let multi = collate_with(base, witness, TokenizerSettings::default(), &one_pass);
    assert_eq!(single.len(), 1);
    assert_eq!(
        multi.differences,
        vec![
            ids(Difference::change(10..15, 10..15)),
            ids(Difference::change(20..24, 20..25)),
        ]
    );
}

#[test]
fn spelling_variant_narrows_to_characters() {
    let set = collate_text("one colour two", "one color two");
    assert_eq!(set.differences, vec![ids(Difference::delete(8..9, 8))]);
}

#[test]
fn character_refinement_from_the_start() {
    let config = CollationConfig {
        refine_granularity: Some(Granularity::Character),
        ..CollationConfig::default()
    };
    let set = collate_with(
        "This is the normal sentence.",
        "This is not the normal hamburger.",
        TokenizerSettings::default(),
        &config,
    );
    assert_eq!(
        set.differences,
        vec![
            ids(Difference::insert(8, 8..11)),
            ids(Difference::change(19..27, 23..32)),
        ]
    );
}

#[test]
fn no_degenerate_differences() {
    let set = collate_text(
        "a quick brown fox jumps over the lazy dog",
        "the quick red fox leaps over a lazy cat today",
    );
    assert!(!set.is_empty());
    for d in &set {
        assert!(!d.is_degenerate(), "degenerate difference {d:?}");
        match d.kind {
            DifferenceType::Delete => assert_eq!(d.witness_length, 0),
            DifferenceType::Insert => assert_eq!(d.base_length, 0),
            _ => {}
        }
    }
}

#[test]
fn mismatched_settings_rejected() {
    let base = Document::tokenize(DocumentId(1), "text", &SimpleTokenizer::default());
    let witness = Document::tokenize(
        DocumentId(2),
        "text",
        &SimpleTokenizer::new(TokenizerSettings::unfiltered()),
    );
    let err = collate(&base, &witness, &CollationConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        CollateError::ConfigMismatch {
            base: DocumentId(1),
            witness: DocumentId(2)
        }
    ));
}

#[test]
fn difference_set_serializes_with_manifest_fields() {
    let set = collate_text("This is the normal sentence.", "This is not the normal hamburger.");
    let json = serde_json::to_string(&set).unwrap();
    for field in [
        "base_offset",
        "base_length",
        "witness_offset",
        "witness_length",
        "origin_space",
        "\"Insert\"",
        "\"Change\"",
    ] {
        assert!(json.contains(field), "missing {field} in {json}");
    }
    let back: DifferenceSet = serde_json::from_str(&json).unwrap();
    assert_eq!(back, set);
}
