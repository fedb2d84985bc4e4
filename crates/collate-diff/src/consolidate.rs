//! Difference list consolidation.
//!
//! Two passes normalize an extracted list. [`Consolidator::consolidate_differences`]
//! folds deletes and inserts that touch a change into that change.
//! [`Consolidator::consolidate_insert_delete`] drops degenerate entries,
//! joins touching deletes (or inserts), and pairs a delete with an insert
//! sitting at the same place into a scored change. Both passes keep the
//! list ordered and reach a fixed point.

use tracing::trace;

use crate::distance::{DistanceScorer, LEVENSHTEIN};
use crate::{Difference, DifferenceType, Side};

pub struct Consolidator<'a> {
    base_text: &'a str,
    witness_text: &'a str,
    scorer: &'a dyn DistanceScorer,
    absorb_whitespace_gap: bool,
}

impl<'a> Consolidator<'a> {
    /// Consolidator for differences between `base_text` and `witness_text`,
    /// scoring merged changes with [`Levenshtein`](crate::Levenshtein).
    pub fn new(base_text: &'a str, witness_text: &'a str) -> Self {
        Self {
            base_text,
            witness_text,
            scorer: &LEVENSHTEIN,
            absorb_whitespace_gap: true,
        }
    }

    pub fn with_scorer(mut self, scorer: &'a dyn DistanceScorer) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn absorb_whitespace_gap(mut self, absorb: bool) -> Self {
        self.absorb_whitespace_gap = absorb;
        self
    }

    /// Run both passes until neither changes the list.
    pub fn consolidate(&self, differences: &mut Vec<Difference>) {
        loop {
            let merged = self.consolidate_differences(differences)
                + self.consolidate_insert_delete(differences);
            if merged == 0 {
                break;
            }
        }
    }

    /// Fold deletes and inserts into a neighbouring change.
    ///
    /// Change+Delete and Delete+Change are checked on the base side,
    /// Change+Insert and Insert+Change on the witness side. Returns the
    /// number of merges.
    pub fn consolidate_differences(&self, differences: &mut Vec<Difference>) -> usize {
        let mut merges = 0;
        let mut i = 0;
        while i + 1 < differences.len() {
            match self.fold_into_change(&differences[i], &differences[i + 1]) {
                Some(merged) => {
                    trace!(?merged, "folded into change");
                    differences[i] = merged;
                    differences.remove(i + 1);
                    merges += 1;
                    i = i.saturating_sub(1);
                }
                None => i += 1,
            }
        }
        merges
    }

    /// Drop degenerate entries, join touching deletes or inserts, and turn
    /// a delete and insert at the same place into one change.
    ///
    /// Returns the number of entries removed.
    pub fn consolidate_insert_delete(&self, differences: &mut Vec<Difference>) -> usize {
        let before = differences.len();
        differences.retain(|d| !d.is_degenerate());
        let mut merges = before - differences.len();

        let mut i = 0;
        while i + 1 < differences.len() {
            match self.join(&differences[i], &differences[i + 1]) {
                Some(merged) => {
                    trace!(?merged, "joined insert/delete");
                    differences[i] = merged;
                    differences.remove(i + 1);
                    merges += 1;
                    i = i.saturating_sub(1);
                }
                None => i += 1,
            }
        }
        merges
    }

    fn fold_into_change(&self, a: &Difference, b: &Difference) -> Option<Difference> {
        use DifferenceType::{Change, Delete, Insert};

        let side = match (a.kind, b.kind) {
            (Change, Delete) | (Delete, Change) => Side::Base,
            (Change, Insert) | (Insert, Change) => Side::Witness,
            _ => return None,
        };
        if self.touches(side, a.end(side), b.offset(side)) {
            Some(a.span(b))
        } else {
            None
        }
    }

    fn join(&self, a: &Difference, b: &Difference) -> Option<Difference> {
        use DifferenceType::{Delete, Insert};

        match (a.kind, b.kind) {
            (Delete, Delete) if a.base_end() == b.base_offset => Some(
                Difference::delete(a.base_offset..b.base_end(), a.witness_offset)
                    .with_documents(a.base_doc, a.witness_doc),
            ),
            (Insert, Insert) if a.witness_end() == b.witness_offset => Some(
                Difference::insert(a.base_offset, a.witness_offset..b.witness_end())
                    .with_documents(a.base_doc, a.witness_doc),
            ),
            (Delete, Insert) => self.pair(a, b),
            (Insert, Delete) => self.pair(b, a),
            _ => None,
        }
    }

    /// Change replacing `delete` with `insert` when they sit at the same place.
    fn pair(&self, delete: &Difference, insert: &Difference) -> Option<Difference> {
        if delete.witness_offset != insert.witness_offset
            && insert.base_offset != delete.base_offset
        {
            return None;
        }
        let base = self.base_text.get(delete.base_range()).unwrap_or_default();
        let witness = self.witness_text.get(insert.witness_range()).unwrap_or_default();
        let distance = self.scorer.score(base, witness);
        Some(
            Difference::change(delete.base_range(), insert.witness_range())
                .with_documents(delete.base_doc, delete.witness_doc)
                .with_distance(distance),
        )
    }

    /// `start` follows `end` directly, or across one whitespace byte.
    fn touches(&self, side: Side, end: usize, start: usize) -> bool {
        if start == end {
            return true;
        }
        if !self.absorb_whitespace_gap || start != end + 1 {
            return false;
        }
        let text = match side {
            Side::Base => self.base_text,
            Side::Witness => self.witness_text,
        };
        text.as_bytes().get(end).is_some_and(u8::is_ascii_whitespace)
    }
}
