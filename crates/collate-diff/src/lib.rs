//! Collation engine: token-level differences between a base and a witness.
//!
//! The pipeline classifies tokens into shared symbols ([`symbol`]), matches
//! the two token streams ([`correlate`]), extracts runs of unmatched tokens
//! as differences ([`collect`]), normalizes them ([`consolidate`]), refines
//! change blocks in further passes ([`multipass`]), and finally answers
//! offset queries between the two documents ([`translate`]).

pub mod batch;
pub mod collect;
pub mod consolidate;
pub mod correlate;
pub mod distance;
pub mod dump;
pub mod multipass;
pub mod symbol;
pub mod translate;

use std::fmt;
use std::ops::Range;

use collate_token::{Granularity, Token, Tokenizer, TokenizerSettings};
use serde::{Deserialize, Serialize};

pub use distance::{DistanceScorer, Levenshtein};
pub use multipass::{collate, Collation, MultiPassDiff, PassState, MAX_PASSES};
pub use translate::OffsetTranslator;

pub type Result<T> = std::result::Result<T, CollateError>;

/// Identifies a document taking part in a comparison.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct DocumentId(pub u32);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc#{}", self.0)
    }
}

/// One of the two documents of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Base,
    Witness,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Self::Base => Self::Witness,
            Self::Witness => Self::Base,
        }
    }
}

/// A document's text together with its tokens.
#[derive(Debug, Clone)]
pub struct Document<'t> {
    pub id: DocumentId,
    pub text: &'t str,
    pub tokens: Vec<Token>,
    /// Settings the tokens were produced under.
    pub settings: TokenizerSettings,
}

impl<'t> Document<'t> {
    /// Tokenize `text` with `tokenizer`.
    pub fn tokenize(id: DocumentId, text: &'t str, tokenizer: &dyn Tokenizer) -> Self {
        Self {
            id,
            text,
            tokens: tokenizer.tokenize(text),
            settings: tokenizer.settings().clone(),
        }
    }

    /// Wrap tokens produced elsewhere.
    pub fn from_tokens(
        id: DocumentId,
        text: &'t str,
        tokens: Vec<Token>,
        settings: TokenizerSettings,
    ) -> Self {
        Self {
            id,
            text,
            tokens,
            settings,
        }
    }

    /// Text of `range`, or an error when it falls outside the document.
    pub fn excerpt(&self, range: Range<usize>) -> Result<&'t str> {
        dump::excerpt(self.id, self.text, range)
    }
}

/// Options controlling a collation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollationConfig {
    /// Refine change blocks after the first pass.
    pub refine: bool,
    /// Upper bound on refinement passes.
    pub max_passes: usize,
    /// How deep a change block is re-collated within a single pass.
    pub refine_depth: usize,
    /// Granularity of the first refinement pass, `None` for the documents'
    /// own granularity. Every later pass re-tokenizes one step finer.
    pub refine_granularity: Option<Granularity>,
    /// Let consolidation merge differences separated by one whitespace byte.
    pub absorb_whitespace_gap: bool,
}

impl Default for CollationConfig {
    fn default() -> Self {
        Self {
            refine: true,
            max_passes: MAX_PASSES,
            refine_depth: 1,
            refine_granularity: None,
            absorb_whitespace_gap: true,
        }
    }
}

impl CollationConfig {
    /// A single classify/correlate/extract/consolidate pass, no refinement.
    pub fn single_pass() -> Self {
        Self {
            refine: false,
            ..Self::default()
        }
    }
}

/// Kind of edit a [`Difference`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DifferenceType {
    None,
    /// Text present only in the base.
    Delete,
    /// Text present only in the witness.
    Insert,
    /// Base text replaced by witness text.
    Change,
}

impl DifferenceType {
    /// Name used by the manifest schema.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Delete => "delete",
            Self::Insert => "insert",
            Self::Change => "change",
        }
    }
}

impl fmt::Display for DifferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single edit between base and witness.
///
/// Offsets and lengths are byte positions in the source document texts.
/// A `Delete` has no witness extent and an `Insert` has no base extent;
/// their empty side records where the edit sits in the other document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Difference {
    pub base_doc: DocumentId,
    pub witness_doc: DocumentId,
    pub kind: DifferenceType,
    pub base_offset: usize,
    pub base_length: usize,
    pub witness_offset: usize,
    pub witness_length: usize,
    /// Edit distance between the two ranges, when scored.
    pub distance: Option<u32>,
    /// Legacy serialization flag carried through unchanged.
    pub origin_space: Option<bool>,
}

impl Difference {
    pub fn new(kind: DifferenceType, base: Range<usize>, witness: Range<usize>) -> Self {
        let (base_length, witness_length) = match kind {
            DifferenceType::Delete => (base.len(), 0),
            DifferenceType::Insert => (0, witness.len()),
            DifferenceType::Change | DifferenceType::None => (base.len(), witness.len()),
        };
        Self {
            base_doc: DocumentId::default(),
            witness_doc: DocumentId::default(),
            kind,
            base_offset: base.start,
            base_length,
            witness_offset: witness.start,
            witness_length,
            distance: None,
            origin_space: None,
        }
    }

    pub fn delete(base: Range<usize>, witness_offset: usize) -> Self {
        Self::new(DifferenceType::Delete, base, witness_offset..witness_offset)
    }

    pub fn insert(base_offset: usize, witness: Range<usize>) -> Self {
        Self::new(DifferenceType::Insert, base_offset..base_offset, witness)
    }

    pub fn change(base: Range<usize>, witness: Range<usize>) -> Self {
        Self::new(DifferenceType::Change, base, witness)
    }

    pub fn with_documents(mut self, base_doc: DocumentId, witness_doc: DocumentId) -> Self {
        self.base_doc = base_doc;
        self.witness_doc = witness_doc;
        self
    }

    pub fn with_distance(mut self, distance: u32) -> Self {
        self.distance = Some(distance);
        self
    }

    pub fn base_end(&self) -> usize {
        self.base_offset + self.base_length
    }

    pub fn witness_end(&self) -> usize {
        self.witness_offset + self.witness_length
    }

    pub fn base_range(&self) -> Range<usize> {
        self.base_offset..self.base_end()
    }

    pub fn witness_range(&self) -> Range<usize> {
        self.witness_offset..self.witness_end()
    }

    pub fn offset(&self, side: Side) -> usize {
        match side {
            Side::Base => self.base_offset,
            Side::Witness => self.witness_offset,
        }
    }

    pub fn length(&self, side: Side) -> usize {
        match side {
            Side::Base => self.base_length,
            Side::Witness => self.witness_length,
        }
    }

    pub fn end(&self, side: Side) -> usize {
        self.offset(side) + self.length(side)
    }

    /// Both extents empty. Never survives consolidation.
    pub fn is_degenerate(&self) -> bool {
        self.base_length == 0 && self.witness_length == 0
    }

    /// Combined size of the edit on both sides.
    pub fn size(&self) -> usize {
        self.base_length + self.witness_length
    }

    /// A `Change` covering both this difference and `other` on each side.
    pub fn span(&self, other: &Difference) -> Difference {
        let base = self.base_offset.min(other.base_offset)..self.base_end().max(other.base_end());
        let witness = self.witness_offset.min(other.witness_offset)
            ..self.witness_end().max(other.witness_end());
        Difference::change(base, witness).with_documents(self.base_doc, self.witness_doc)
    }

    /// Move the difference into a document where its texts start at the
    /// given offsets.
    pub fn shifted(mut self, base_delta: usize, witness_delta: usize) -> Self {
        self.base_offset += base_delta;
        self.witness_offset += witness_delta;
        self
    }
}

/// The ordered differences between a base and a witness.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifferenceSet {
    pub base_doc: DocumentId,
    pub witness_doc: DocumentId,
    /// Strictly increasing in base offset.
    pub differences: Vec<Difference>,
    /// Distinct token texts seen across both documents.
    pub unique_symbols: usize,
}

impl DifferenceSet {
    pub fn is_empty(&self) -> bool {
        self.differences.is_empty()
    }

    pub fn len(&self) -> usize {
        self.differences.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Difference> {
        self.differences.iter()
    }

    /// Number of differences of the given kind.
    pub fn count(&self, kind: DifferenceType) -> usize {
        self.differences.iter().filter(|d| d.kind == kind).count()
    }

    /// Size of the largest change block, 0 when there is none.
    pub fn largest_change(&self) -> usize {
        largest_change(&self.differences)
    }

    /// Sum of the scored distances of all changes.
    pub fn change_distance(&self) -> u64 {
        self.differences
            .iter()
            .filter(|d| d.kind == DifferenceType::Change)
            .filter_map(|d| d.distance)
            .map(u64::from)
            .sum()
    }
}

impl<'a> IntoIterator for &'a DifferenceSet {
    type Item = &'a Difference;
    type IntoIter = std::slice::Iter<'a, Difference>;

    fn into_iter(self) -> Self::IntoIter {
        self.differences.iter()
    }
}

pub(crate) fn largest_change(differences: &[Difference]) -> usize {
    differences
        .iter()
        .filter(|d| d.kind == DifferenceType::Change)
        .map(Difference::size)
        .max()
        .unwrap_or(0)
}

/// Error types for collation.
#[derive(Debug, thiserror::Error)]
pub enum CollateError {
    #[error("tokenizer settings of {base} and {witness} differ")]
    ConfigMismatch {
        base: DocumentId,
        witness: DocumentId,
    },

    #[error("range {start}..{end} is outside {doc} ({len} bytes)")]
    OffsetOutOfBounds {
        doc: DocumentId,
        start: usize,
        end: usize,
        len: usize,
    },
}
