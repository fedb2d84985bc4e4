//! Diagnostic rendering of differences against the document texts.

use std::ops::Range;

use crate::{CollateError, DifferenceSet, DocumentId, Result};

/// Text of `range` in `text`, or an error when it is out of bounds or
/// splits a character.
pub fn excerpt(doc: DocumentId, text: &str, range: Range<usize>) -> Result<&str> {
    text.get(range.clone())
        .ok_or(CollateError::OffsetOutOfBounds {
            doc,
            start: range.start,
            end: range.end,
            len: text.len(),
        })
}

/// One line per difference: kind, both ranges, and the excerpts.
pub fn describe(set: &DifferenceSet, base_text: &str, witness_text: &str) -> Result<String> {
    let mut out = String::new();
    for d in set {
        let base = excerpt(set.base_doc, base_text, d.base_range())?;
        let witness = excerpt(set.witness_doc, witness_text, d.witness_range())?;
        out.push_str(&format!(
            "{:<6} base {}..{} {:?} -> witness {}..{} {:?}",
            d.kind.as_str(),
            d.base_offset,
            d.base_end(),
            base,
            d.witness_offset,
            d.witness_end(),
            witness,
        ));
        if let Some(distance) = d.distance {
            out.push_str(&format!(" (distance {})", distance));
        }
        out.push('\n');
    }
    Ok(out)
}
