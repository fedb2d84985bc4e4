//! Multi-pass collation.
//!
//! The first pass collates the whole document pair. Later passes take
//! every change block, re-tokenize just the text it spans, and collate
//! that excerpt pair on its own. The first refinement pass works at the
//! documents' granularity: words that were ambiguous across the whole
//! document are often unique inside a single block. Every later pass goes
//! one granularity step finer, down to single characters. Passes continue
//! while the largest change block keeps shrinking, or while a finer
//! granularity is left to try, up to a fixed limit.

use collate_token::{Granularity, SimpleTokenizer, Token, Tokenizer};
use tracing::{debug, debug_span, trace};

use crate::collect::DifferenceCollector;
use crate::consolidate::Consolidator;
use crate::correlate::correlate;
use crate::distance::{DistanceScorer, LEVENSHTEIN};
use crate::symbol::{FileInfo, SymbolTable};
use crate::translate::{AlignedToken, OffsetTranslator};
use crate::{
    dump, largest_change, CollateError, CollationConfig, Difference, DifferenceSet,
    DifferenceType, Document, DocumentId, Result, Side,
};

/// Default bound on refinement passes.
pub const MAX_PASSES: usize = 10;

/// Progress of a [`MultiPassDiff`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassState {
    /// Nothing computed yet.
    Initial,
    /// The whole-document pass has run and been consolidated.
    Consolidated,
    /// Change blocks are being refined.
    Refining,
    /// Final differences available.
    Done,
}

/// Token indexes and raw differences from one pass over two token lists.
#[derive(Debug)]
pub struct PassOutput {
    pub base: FileInfo,
    pub witness: FileInfo,
    pub unique_symbols: usize,
    pub differences: Vec<Difference>,
}

/// Classify, correlate, and extract differences for two token lists.
///
/// The differences are not consolidated.
pub fn run_pass(
    base: &[Token],
    witness: &[Token],
    base_doc: DocumentId,
    witness_doc: DocumentId,
) -> PassOutput {
    let (table, mut base_info, mut witness_info) = SymbolTable::build(base, witness);
    correlate(&table, &mut base_info, &mut witness_info);
    let differences = DifferenceCollector::new(&base_info, &witness_info)
        .with_documents(base_doc, witness_doc)
        .collect();
    PassOutput {
        base: base_info,
        witness: witness_info,
        unique_symbols: table.len(),
        differences,
    }
}

#[derive(Debug)]
struct RefineTask {
    difference: Difference,
    depth: usize,
}

/// Stateful collation of one document pair. Use a fresh instance per pair.
pub struct MultiPassDiff<'a> {
    base: &'a Document<'a>,
    witness: &'a Document<'a>,
    config: CollationConfig,
    scorer: &'a dyn DistanceScorer,
    /// Granularity of the next refinement pass.
    granularity: Granularity,
    state: PassState,
    passes: usize,
    history: Vec<usize>,
    differences: Vec<Difference>,
    alignment: Vec<AlignedToken>,
    base_info: FileInfo,
    witness_info: FileInfo,
    unique_symbols: usize,
}

impl<'a> MultiPassDiff<'a> {
    /// Prepare a collation. Fails when the documents were tokenized under
    /// different settings.
    pub fn new(
        base: &'a Document<'a>,
        witness: &'a Document<'a>,
        config: &CollationConfig,
    ) -> Result<Self> {
        if base.settings != witness.settings {
            return Err(CollateError::ConfigMismatch {
                base: base.id,
                witness: witness.id,
            });
        }
        Ok(Self {
            base,
            witness,
            config: config.clone(),
            scorer: &LEVENSHTEIN,
            granularity: config.refine_granularity.unwrap_or(base.settings.granularity),
            state: PassState::Initial,
            passes: 0,
            history: Vec::new(),
            differences: Vec::new(),
            alignment: Vec::new(),
            base_info: FileInfo::default(),
            witness_info: FileInfo::default(),
            unique_symbols: 0,
        })
    }

    /// Score merged changes with `scorer` instead of Levenshtein.
    pub fn with_scorer(mut self, scorer: &'a dyn DistanceScorer) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn state(&self) -> PassState {
        self.state
    }

    /// Refinement passes applied so far.
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Largest change block after the first pass and after each kept
    /// refinement pass.
    pub fn history(&self) -> &[usize] {
        &self.history
    }

    pub fn differences(&self) -> &[Difference] {
        &self.differences
    }

    /// Advance by one state transition.
    pub fn step(&mut self) -> PassState {
        self.state = match self.state {
            PassState::Initial => {
                self.first_pass();
                PassState::Consolidated
            }
            PassState::Consolidated => {
                let refinable = self.config.refine
                    && self.config.max_passes > 0
                    && largest_change(&self.differences) > 0;
                if refinable {
                    PassState::Refining
                } else {
                    PassState::Done
                }
            }
            PassState::Refining => self.refine_pass(),
            PassState::Done => PassState::Done,
        };
        self.state
    }

    /// Step until done and hand back the result.
    pub fn run(mut self) -> Collation {
        while self.step() != PassState::Done {}
        self.finish()
    }

    fn consolidator(&self) -> Consolidator<'_> {
        Consolidator::new(self.base.text, self.witness.text)
            .with_scorer(self.scorer)
            .absorb_whitespace_gap(self.config.absorb_whitespace_gap)
    }

    fn first_pass(&mut self) {
        let pass = run_pass(
            &self.base.tokens,
            &self.witness.tokens,
            self.base.id,
            self.witness.id,
        );
        let mut differences = pass.differences;
        self.consolidator().consolidate(&mut differences);

        self.alignment = AlignedToken::from_infos(&pass.base, &pass.witness).collect();
        self.unique_symbols = pass.unique_symbols;
        self.base_info = pass.base;
        self.witness_info = pass.witness;
        self.history.push(largest_change(&differences));
        debug!(
            differences = differences.len(),
            unique_symbols = self.unique_symbols,
            largest = largest_change(&differences),
            "first pass"
        );
        self.differences = differences;
    }

    fn refine_pass(&mut self) -> PassState {
        let granularity = self.granularity;
        let refiner =
            SimpleTokenizer::new(self.base.settings.clone().with_granularity(granularity));
        let previous = largest_change(&self.differences);
        let mut found = Vec::new();
        let mut refined = self.refine_all(&refiner, &mut found);
        self.consolidator().consolidate(&mut refined);
        let largest = largest_change(&refined);
        self.passes += 1;
        self.granularity = granularity.finer();
        debug!(
            pass = self.passes,
            ?granularity,
            previous,
            largest,
            differences = refined.len(),
            "refinement pass"
        );

        let shrank = if largest > previous {
            debug!(pass = self.passes, "refinement grew the largest block; discarded");
            false
        } else {
            self.differences = refined;
            self.alignment.extend(found);
            self.history.push(largest);
            largest < previous
        };

        let finer_left = self.granularity != granularity;
        let remaining = largest_change(&self.differences) > 0;
        if remaining && (shrank || finer_left) && self.passes < self.config.max_passes {
            PassState::Refining
        } else {
            PassState::Done
        }
    }

    /// Replace every change block by its refinement, using a worklist so
    /// that nested refinement never recurses.
    fn refine_all(
        &self,
        refiner: &SimpleTokenizer,
        found: &mut Vec<AlignedToken>,
    ) -> Vec<Difference> {
        let mut refined = Vec::with_capacity(self.differences.len());
        let mut worklist: Vec<RefineTask> = self
            .differences
            .iter()
            .rev()
            .cloned()
            .map(|difference| RefineTask {
                difference,
                depth: 0,
            })
            .collect();

        while let Some(task) = worklist.pop() {
            let eligible = task.difference.kind == DifferenceType::Change
                && task.depth < self.config.refine_depth;
            let parts = if eligible {
                self.refine_change(refiner, &task.difference, found)
            } else {
                None
            };
            match parts {
                Some(parts) => {
                    trace!(parent = ?task.difference, parts = parts.len(), "split change block");
                    worklist.extend(parts.into_iter().rev().map(|difference| RefineTask {
                        difference,
                        depth: task.depth + 1,
                    }));
                }
                None => refined.push(task.difference),
            }
        }

        refined
    }

    /// Collate the excerpts spanned by `parent`. `None` when nothing in
    /// the excerpts matches, so the block stays as it is.
    fn refine_change(
        &self,
        refiner: &SimpleTokenizer,
        parent: &Difference,
        found: &mut Vec<AlignedToken>,
    ) -> Option<Vec<Difference>> {
        let base_tokens =
            refiner.tokenize_range(self.base.text, parent.base_offset, parent.base_end());
        let witness_tokens = refiner.tokenize_range(
            self.witness.text,
            parent.witness_offset,
            parent.witness_end(),
        );
        if base_tokens.is_empty() || witness_tokens.is_empty() {
            return None;
        }

        let pass = run_pass(&base_tokens, &witness_tokens, self.base.id, self.witness.id);
        if pass.base.matched() == 0 {
            return None;
        }

        let (base_delta, witness_delta) = (parent.base_offset, parent.witness_offset);
        found.extend(
            AlignedToken::from_infos(&pass.base, &pass.witness)
                .map(|a| a.shifted(base_delta, witness_delta)),
        );
        Some(
            pass.differences
                .into_iter()
                .map(|d| d.shifted(base_delta, witness_delta))
                .collect(),
        )
    }

    fn finish(mut self) -> Collation {
        self.alignment.sort_unstable_by_key(|a| (a.base_offset, a.witness_offset));
        let set = DifferenceSet {
            base_doc: self.base.id,
            witness_doc: self.witness.id,
            differences: self.differences,
            unique_symbols: self.unique_symbols,
        };
        if tracing::enabled!(tracing::Level::TRACE) {
            if let Ok(text) = dump::describe(&set, self.base.text, self.witness.text) {
                trace!("final differences:\n{text}");
            }
        }
        Collation {
            set,
            base: self.base_info,
            witness: self.witness_info,
            alignment: self.alignment,
            base_len: self.base.text.len(),
            witness_len: self.witness.text.len(),
            passes: self.passes,
            history: self.history,
        }
    }
}

/// Result of collating a document pair: the differences plus what is
/// needed to translate offsets between the documents.
#[derive(Debug, Clone)]
pub struct Collation {
    pub(crate) set: DifferenceSet,
    pub(crate) base: FileInfo,
    pub(crate) witness: FileInfo,
    pub(crate) alignment: Vec<AlignedToken>,
    pub(crate) base_len: usize,
    pub(crate) witness_len: usize,
    passes: usize,
    history: Vec<usize>,
}

impl Collation {
    pub fn differences(&self) -> &DifferenceSet {
        &self.set
    }

    pub fn into_differences(self) -> DifferenceSet {
        self.set
    }

    /// Refinement passes that were run.
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Largest change block after each kept pass, first pass included.
    pub fn history(&self) -> &[usize] {
        &self.history
    }

    /// Token index of one side, as correlated by the first pass.
    pub fn file_info(&self, side: Side) -> &FileInfo {
        match side {
            Side::Base => &self.base,
            Side::Witness => &self.witness,
        }
    }

    /// Matched token pairs, ordered by base offset.
    pub fn alignment(&self) -> &[AlignedToken] {
        &self.alignment
    }

    pub fn translator(&self) -> OffsetTranslator<'_> {
        OffsetTranslator::new(self)
    }

    /// See [`OffsetTranslator::translate`].
    pub fn translate(&self, offset: usize, from: Side, want_end: bool) -> Option<usize> {
        self.translator().translate(offset, from, want_end)
    }
}

/// Collate `base` against `witness`.
pub fn collate(
    base: &Document<'_>,
    witness: &Document<'_>,
    config: &CollationConfig,
) -> Result<Collation> {
    let span = debug_span!("collate", base = %base.id, witness = %witness.id);
    let _enter = span.enter();
    Ok(MultiPassDiff::new(base, witness, config)?.run())
}
