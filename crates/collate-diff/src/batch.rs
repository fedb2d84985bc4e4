//! Parallel collation of independent document pairs.
//!
//! A collation owns all of its mutable state, so unrelated pairs can be
//! compared on separate threads.

use rayon::prelude::*;

use crate::{collate, Collation, CollationConfig, Document, Result};

/// A base and witness to collate.
#[derive(Debug, Clone)]
pub struct DocumentPair<'t> {
    pub base: Document<'t>,
    pub witness: Document<'t>,
}

/// Collate every pair, in parallel. Results keep the input order.
pub fn collate_all(pairs: &[DocumentPair<'_>], config: &CollationConfig) -> Vec<Result<Collation>> {
    pairs
        .par_iter()
        .map(|pair| collate(&pair.base, &pair.witness, config))
        .collect()
}
