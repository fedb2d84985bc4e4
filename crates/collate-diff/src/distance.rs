//! Edit-distance scoring for merged change blocks.
//!
//! The score is informational only; matching never looks at it.

/// Scores how far apart a base excerpt and a witness excerpt are.
pub trait DistanceScorer: Send + Sync {
    fn score(&self, base: &str, witness: &str) -> u32;
}

/// Character-level Levenshtein distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct Levenshtein;

pub(crate) static LEVENSHTEIN: Levenshtein = Levenshtein;

impl DistanceScorer for Levenshtein {
    fn score(&self, base: &str, witness: &str) -> u32 {
        levenshtein(base, witness).min(u32::MAX as usize) as u32
    }
}

/// Levenshtein distance over chars, using two rolling rows.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}
