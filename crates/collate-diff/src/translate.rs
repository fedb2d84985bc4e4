//! Offset translation between the two documents of a collation.

use crate::multipass::Collation;
use crate::symbol::FileInfo;
use crate::{Difference, Side};

/// A matched token pair, by source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignedToken {
    pub base_offset: usize,
    pub base_length: usize,
    pub witness_offset: usize,
    pub witness_length: usize,
}

impl AlignedToken {
    /// Matched pairs recorded in the cross indexes, in base order.
    pub fn from_infos<'i>(
        base: &'i FileInfo,
        witness: &'i FileInfo,
    ) -> impl Iterator<Item = AlignedToken> + 'i {
        base.cross_index
            .iter()
            .enumerate()
            .filter_map(move |(b, w)| {
                let w = (*w)?;
                Some(AlignedToken {
                    base_offset: base.start_of(b),
                    base_length: base.lengths[b],
                    witness_offset: witness.start_of(w),
                    witness_length: witness.lengths[w],
                })
            })
    }

    pub fn shifted(mut self, base_delta: usize, witness_delta: usize) -> Self {
        self.base_offset += base_delta;
        self.witness_offset += witness_delta;
        self
    }

    pub fn start(&self, side: Side) -> usize {
        match side {
            Side::Base => self.base_offset,
            Side::Witness => self.witness_offset,
        }
    }

    pub fn end(&self, side: Side) -> usize {
        match side {
            Side::Base => self.base_offset + self.base_length,
            Side::Witness => self.witness_offset + self.witness_length,
        }
    }
}

/// Maps offsets in one document to the corresponding offsets in the other.
pub struct OffsetTranslator<'a> {
    base: &'a FileInfo,
    witness: &'a FileInfo,
    differences: &'a [Difference],
    alignment: &'a [AlignedToken],
    base_len: usize,
    witness_len: usize,
}

impl<'a> OffsetTranslator<'a> {
    pub fn new(collation: &'a Collation) -> Self {
        Self {
            base: &collation.base,
            witness: &collation.witness,
            differences: &collation.set.differences,
            alignment: &collation.alignment,
            base_len: collation.base_len,
            witness_len: collation.witness_len,
        }
    }

    /// Offset in the other document corresponding to `offset` in `from`.
    ///
    /// The offset is first snapped to a token of `from`: the token starting
    /// at or before it, or with `want_end` the token ending at or after it.
    /// Offsets with no such token (leading or trailing whitespace, empty
    /// documents) or past the document end give `None`.
    ///
    /// Differences and matched pairs overlapping the token are the units it
    /// maps through. Refinement can split one token into several of them,
    /// so the first unit gives the start on the other side and the last
    /// unit the end. A difference maps to its own start or end there, a
    /// matched pair to its partner's.
    pub fn translate(&self, offset: usize, from: Side, want_end: bool) -> Option<usize> {
        let (info, len) = match from {
            Side::Base => (self.base, self.base_len),
            Side::Witness => (self.witness, self.witness_len),
        };
        if offset > len {
            return None;
        }

        let token = snap(info, offset, want_end)?;
        let (start, end) = (info.start_of(token), info.end_of(token));
        let to = from.other();

        let differences = self
            .overlapping_differences(from, start, end)
            .map(|d| (d.offset(from), d.end(from), d.offset(to), d.end(to)));
        let pairs = self
            .overlapping_pairs(from, start, end)
            .map(|a| (a.start(from), a.end(from), a.start(to), a.end(to)));
        let units = differences.chain(pairs);

        if want_end {
            units.max_by_key(|unit| unit.1).map(|unit| unit.3)
        } else {
            units.min_by_key(|unit| unit.0).map(|unit| unit.2)
        }
    }

    /// Differences with a non-empty extent on `side` overlapping `start..end`.
    fn overlapping_differences(
        &self,
        side: Side,
        start: usize,
        end: usize,
    ) -> impl Iterator<Item = &'a Difference> {
        let first = self.differences.partition_point(|d| d.end(side) <= start);
        self.differences[first..]
            .iter()
            .take_while(move |d| d.offset(side) < end)
            .filter(move |d| d.length(side) > 0)
    }

    /// Matched pairs overlapping `start..end` on `side`.
    fn overlapping_pairs(
        &self,
        side: Side,
        start: usize,
        end: usize,
    ) -> impl Iterator<Item = &'a AlignedToken> {
        let first = self.alignment.partition_point(|a| a.end(side) <= start);
        self.alignment[first..]
            .iter()
            .take_while(move |a| a.start(side) < end)
    }
}

/// Token nearest to `offset`: the last one starting at or before it, or
/// with `want_end` the first one ending at or after it.
fn snap(info: &FileInfo, offset: usize, want_end: bool) -> Option<usize> {
    if want_end {
        let after = info.offsets.partition_point(|&o| o < offset);
        if after > 0 && info.end_of(after - 1) >= offset {
            Some(after - 1)
        } else if after < info.len() {
            Some(after)
        } else {
            None
        }
    } else {
        info.offsets
            .partition_point(|&o| o <= offset)
            .checked_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::SymbolTable;
    use collate_token::Token;

    fn info(words: &[(&str, usize)]) -> FileInfo {
        let tokens: Vec<Token> = words
            .iter()
            .map(|(w, o)| Token::new(*w, *o, w.len()))
            .collect();
        SymbolTable::build(&tokens, &[]).1
    }

    #[test]
    fn snap_before() {
        let info = info(&[("ab", 2), ("cd", 6)]);
        assert_eq!(snap(&info, 0, false), None);
        assert_eq!(snap(&info, 2, false), Some(0));
        assert_eq!(snap(&info, 3, false), Some(0));
        assert_eq!(snap(&info, 5, false), Some(0));
        assert_eq!(snap(&info, 6, false), Some(1));
        assert_eq!(snap(&info, 9, false), Some(1));
    }

    #[test]
    fn snap_after() {
        let info = info(&[("ab", 2), ("cd", 6)]);
        assert_eq!(snap(&info, 0, true), Some(0));
        assert_eq!(snap(&info, 4, true), Some(0));
        assert_eq!(snap(&info, 5, true), Some(1));
        assert_eq!(snap(&info, 8, true), Some(1));
        assert_eq!(snap(&info, 9, true), None);
    }

    #[test]
    fn snap_in_empty_document() {
        let info = info(&[]);
        assert_eq!(snap(&info, 0, false), None);
        assert_eq!(snap(&info, 0, true), None);
    }

    #[test]
    fn aligned_token_sides() {
        let a = AlignedToken {
            base_offset: 3,
            base_length: 2,
            witness_offset: 10,
            witness_length: 4,
        }
        .shifted(1, 1);
        assert_eq!(a.start(Side::Base), 4);
        assert_eq!(a.end(Side::Base), 6);
        assert_eq!(a.start(Side::Witness), 11);
        assert_eq!(a.end(Side::Witness), 15);
    }
}
