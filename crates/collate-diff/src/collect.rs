//! Difference extraction from correlated token indexes.

use std::ops::Range;

use crate::symbol::FileInfo;
use crate::{Difference, DocumentId};

/// Walks two correlated [`FileInfo`]s and turns runs of unmatched tokens
/// into differences.
pub struct DifferenceCollector<'a> {
    base: &'a FileInfo,
    witness: &'a FileInfo,
    base_doc: DocumentId,
    witness_doc: DocumentId,
}

impl<'a> DifferenceCollector<'a> {
    pub fn new(base: &'a FileInfo, witness: &'a FileInfo) -> Self {
        Self {
            base,
            witness,
            base_doc: DocumentId::default(),
            witness_doc: DocumentId::default(),
        }
    }

    pub fn with_documents(mut self, base_doc: DocumentId, witness_doc: DocumentId) -> Self {
        self.base_doc = base_doc;
        self.witness_doc = witness_doc;
        self
    }

    /// Differences in document order.
    ///
    /// Matching is order preserving, so the unmatched base run and the
    /// unmatched witness run between two consecutive matched pairs belong
    /// to the same slot: both non-empty make a change, otherwise a pure
    /// delete or insert.
    pub fn collect(&self) -> Vec<Difference> {
        let (n, m) = (self.base.len(), self.witness.len());
        let mut differences = Vec::new();
        let (mut i, mut j) = (0, 0);

        loop {
            let base_start = i;
            while i < n && !self.base.is_matched(i) {
                i += 1;
            }
            let witness_start = j;
            while j < m && !self.witness.is_matched(j) {
                j += 1;
            }

            if let Some(d) = self.run_difference(base_start..i, witness_start..j) {
                differences.push(d);
            }

            if i >= n || j >= m {
                break;
            }
            debug_assert_eq!(self.base.cross_index[i], Some(j));
            i += 1;
            j += 1;
        }

        differences
    }

    fn run_difference(
        &self,
        base_run: Range<usize>,
        witness_run: Range<usize>,
    ) -> Option<Difference> {
        let difference = match (base_run.is_empty(), witness_run.is_empty()) {
            (true, true) => return None,
            (true, false) => Difference::insert(
                self.base.boundary_before(base_run.end),
                self.witness.run_span(witness_run),
            ),
            (false, true) => Difference::delete(
                self.base.run_span(base_run),
                self.witness.boundary_before(witness_run.end),
            ),
            (false, false) => Difference::change(
                self.base.run_span(base_run),
                self.witness.run_span(witness_run),
            ),
        };
        Some(difference.with_documents(self.base_doc, self.witness_doc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correlate::correlate;
    use crate::symbol::SymbolTable;
    use crate::DifferenceType;
    use collate_token::{SimpleTokenizer, Tokenizer, TokenizerSettings};

    fn collect(base: &str, witness: &str) -> Vec<Difference> {
        let tokenizer = SimpleTokenizer::new(TokenizerSettings::unfiltered());
        let (table, mut b, mut w) =
            SymbolTable::build(&tokenizer.tokenize(base), &tokenizer.tokenize(witness));
        correlate(&table, &mut b, &mut w);
        DifferenceCollector::new(&b, &w).collect()
    }

    #[test]
    fn identical_has_no_differences() {
        assert!(collect("one two three", "one two three").is_empty());
    }

    #[test]
    fn moved_word_becomes_insert_and_delete() {
        let diffs = collect("ABBA BABBA CADABRA", "ABBA CADABRA BABBA");
        assert_eq!(
            diffs,
            vec![Difference::insert(5, 5..12), Difference::delete(11..18, 18)]
        );
    }

    #[test]
    fn replaced_word_is_change() {
        let diffs = collect("a big dog", "a small dog");
        assert_eq!(diffs, vec![Difference::change(2..5, 2..7)]);
    }

    #[test]
    fn run_lengths_use_offsets() {
        let diffs = collect("keep one  two keep2", "keep keep2");
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].kind, DifferenceType::Delete);
        assert_eq!(diffs[0].base_range(), 5..13);
        assert_eq!(diffs[0].witness_offset, 5);
    }

    #[test]
    fn empty_base_is_one_insert() {
        let diffs = collect("", "all new text");
        assert_eq!(diffs, vec![Difference::insert(0, 0..12)]);
    }

    #[test]
    fn empty_witness_is_one_delete() {
        let diffs = collect("all old text", "");
        assert_eq!(diffs, vec![Difference::delete(0..12, 0)]);
    }

    #[test]
    fn leading_and_trailing_runs() {
        let diffs = collect("x mid y", "mid");
        assert_eq!(
            diffs,
            vec![Difference::delete(0..1, 0), Difference::delete(6..7, 3)]
        );
    }

    #[test]
    fn document_ids_attached() {
        let tokenizer = SimpleTokenizer::default();
        let (table, mut b, mut w) =
            SymbolTable::build(&tokenizer.tokenize("a b"), &tokenizer.tokenize("a c"));
        correlate(&table, &mut b, &mut w);
        let diffs = DifferenceCollector::new(&b, &w)
            .with_documents(DocumentId(1), DocumentId(2))
            .collect();
        assert_eq!(diffs[0].base_doc, DocumentId(1));
        assert_eq!(diffs[0].witness_doc, DocumentId(2));
    }
}
