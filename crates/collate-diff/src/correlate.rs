//! Token correlation.
//!
//! Tokens that occur exactly once in each document anchor the match. The
//! longest chain of anchors that is increasing in both documents is found
//! with patience sorting; matches then grow outwards from every matched
//! pair (and from the document edges) over identical neighbouring tokens,
//! which recovers repeated words next to anchors without letting common
//! words pair up across the document.

use crate::symbol::{FileInfo, SymbolTable};

/// Fill the `cross_index` arrays of `base` and `witness`.
pub fn correlate(table: &SymbolTable, base: &mut FileInfo, witness: &mut FileInfo) {
    let anchors = table.anchors();
    for (b, w) in anchor_chain(&anchors) {
        link(base, witness, b, w);
    }
    extend_forward(base, witness);
    extend_backward(base, witness);
}

/// Longest chain of `(base, witness)` pairs increasing in both indices.
///
/// `pairs` must be sorted by base index. Among chains of maximal length
/// the one that completes earliest in the base wins.
pub fn anchor_chain(pairs: &[(usize, usize)]) -> Vec<(usize, usize)> {
    if pairs.is_empty() {
        return Vec::new();
    }

    // Pile k holds pairs ending a chain of length k + 1, newest on top.
    let mut piles: Vec<Vec<usize>> = Vec::new();
    let mut prev: Vec<Option<usize>> = vec![None; pairs.len()];

    for (idx, &(_, w)) in pairs.iter().enumerate() {
        let target = piles.partition_point(|pile| {
            pile.last().is_some_and(|&top| pairs[top].1 < w)
        });
        if target > 0 {
            prev[idx] = piles[target - 1].last().copied();
        }
        match piles.get_mut(target) {
            Some(pile) => pile.push(idx),
            None => piles.push(vec![idx]),
        }
    }

    // The bottom of the last pile is the first pair that reached full length.
    let mut chain = Vec::new();
    let mut current = piles.last().and_then(|pile| pile.first().copied());
    while let Some(idx) = current {
        chain.push(pairs[idx]);
        current = prev[idx];
    }
    chain.reverse();
    chain
}

fn link(base: &mut FileInfo, witness: &mut FileInfo, b: usize, w: usize) {
    base.cross_index[b] = Some(w);
    witness.cross_index[w] = Some(b);
}

/// Match `base[b]` with `witness[w]` if both are free and carry the same symbol.
fn try_link(base: &mut FileInfo, witness: &mut FileInfo, b: usize, w: usize) -> bool {
    let free = b < base.len()
        && w < witness.len()
        && base.cross_index[b].is_none()
        && witness.cross_index[w].is_none();
    if free && base.symbols[b] == witness.symbols[w] {
        link(base, witness, b, w);
        true
    } else {
        false
    }
}

fn extend_forward(base: &mut FileInfo, witness: &mut FileInfo) {
    // Virtual anchor before the first token
    let mut k = 0;
    while try_link(base, witness, k, k) {
        k += 1;
    }

    for b in 0..base.len() {
        if let Some(w) = base.cross_index[b] {
            try_link(base, witness, b + 1, w + 1);
        }
    }
}

fn extend_backward(base: &mut FileInfo, witness: &mut FileInfo) {
    // Virtual anchor after the last token
    let (mut b, mut w) = (base.len(), witness.len());
    while b > 0 && w > 0 && try_link(base, witness, b - 1, w - 1) {
        b -= 1;
        w -= 1;
    }

    for b in (1..base.len()).rev() {
        if let Some(w) = base.cross_index[b] {
            if w > 0 {
                try_link(base, witness, b - 1, w - 1);
            }
        }
    }
}
