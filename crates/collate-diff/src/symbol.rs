//! Token classification and per-document token indexes.
//!
//! Every distinct token text becomes one [`Symbol`] in an arena shared by
//! both documents. A symbol's [`Classification`] follows from how often it
//! occurs in each document, so the order tokens are registered in never
//! changes the outcome.

use std::collections::HashMap;
use std::ops::Range;

use collate_token::Token;

/// Index of a symbol in its [`SymbolTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(u32);

impl SymbolId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Where a symbol occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Not seen yet.
    Fresh,
    BaseOnly,
    WitnessOnly,
    /// Exactly once in each document; an anchor candidate.
    UniqueBoth,
    /// Repeated in at least one document while present in both.
    Ambiguous,
}

/// Shared identity of all occurrences of one token text.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub text: String,
    pub base_count: u32,
    pub witness_count: u32,
    /// Position of the last base occurrence.
    pub base_index: Option<usize>,
    /// Position of the last witness occurrence.
    pub witness_index: Option<usize>,
}

impl Symbol {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            base_count: 0,
            witness_count: 0,
            base_index: None,
            witness_index: None,
        }
    }

    pub fn classification(&self) -> Classification {
        match (self.base_count, self.witness_count) {
            (0, 0) => Classification::Fresh,
            (_, 0) => Classification::BaseOnly,
            (0, _) => Classification::WitnessOnly,
            (1, 1) => Classification::UniqueBoth,
            _ => Classification::Ambiguous,
        }
    }

    /// Base and witness positions of an anchor symbol.
    pub fn anchor(&self) -> Option<(usize, usize)> {
        match self.classification() {
            Classification::UniqueBoth => self.base_index.zip(self.witness_index),
            _ => None,
        }
    }
}

/// Arena of symbols keyed by exact token text.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    lookup: HashMap<String, SymbolId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify both token lists and build their indexes.
    pub fn build(base: &[Token], witness: &[Token]) -> (Self, FileInfo, FileInfo) {
        let mut table = Self::new();
        let base_info = table.index_document(base, |sym, pos| {
            sym.base_count += 1;
            sym.base_index = Some(pos);
        });
        let witness_info = table.index_document(witness, |sym, pos| {
            sym.witness_count += 1;
            sym.witness_index = Some(pos);
        });
        (table, base_info, witness_info)
    }

    fn index_document(
        &mut self,
        tokens: &[Token],
        mut record: impl FnMut(&mut Symbol, usize),
    ) -> FileInfo {
        let mut info = FileInfo::with_capacity(tokens.len());
        for (pos, token) in tokens.iter().enumerate() {
            let id = self.intern(&token.text);
            record(&mut self.symbols[id.index()], pos);
            info.push(id, token);
        }
        info
    }

    /// Id for `text`, creating a fresh symbol if needed.
    pub fn intern(&mut self, text: &str) -> SymbolId {
        if let Some(&id) = self.lookup.get(text) {
            return id;
        }
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(Symbol::new(text));
        self.lookup.insert(text.to_string(), id);
        id
    }

    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    pub fn lookup(&self, text: &str) -> Option<SymbolId> {
        self.lookup.get(text).copied()
    }

    pub fn classification(&self, id: SymbolId) -> Classification {
        self.get(id).classification()
    }

    /// Number of distinct token texts.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Anchor pairs `(base_index, witness_index)`, ordered by base index.
    pub fn anchors(&self) -> Vec<(usize, usize)> {
        let mut anchors: Vec<_> = self.symbols.iter().filter_map(Symbol::anchor).collect();
        anchors.sort_unstable_by_key(|&(b, _)| b);
        anchors
    }
}

/// Token identities and source positions of one document.
///
/// `cross_index[i]` is the matched position in the other document's
/// `FileInfo`, or `None` while token `i` is unmatched.
#[derive(Debug, Clone, Default)]
pub struct FileInfo {
    pub symbols: Vec<SymbolId>,
    pub offsets: Vec<usize>,
    pub lengths: Vec<usize>,
    pub cross_index: Vec<Option<usize>>,
}

impl FileInfo {
    fn with_capacity(n: usize) -> Self {
        Self {
            symbols: Vec::with_capacity(n),
            offsets: Vec::with_capacity(n),
            lengths: Vec::with_capacity(n),
            cross_index: Vec::with_capacity(n),
        }
    }

    fn push(&mut self, id: SymbolId, token: &Token) {
        self.symbols.push(id);
        self.offsets.push(token.offset);
        self.lengths.push(token.length);
        self.cross_index.push(None);
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn is_matched(&self, index: usize) -> bool {
        matches!(self.cross_index.get(index), Some(Some(_)))
    }

    pub fn start_of(&self, index: usize) -> usize {
        self.offsets[index]
    }

    pub fn end_of(&self, index: usize) -> usize {
        self.offsets[index] + self.lengths[index]
    }

    /// End of the last token, 0 for an empty document.
    pub fn end(&self) -> usize {
        match self.len() {
            0 => 0,
            n => self.end_of(n - 1),
        }
    }

    /// Start of token `index`, or the end of the last token past the end.
    pub fn boundary_before(&self, index: usize) -> usize {
        if index < self.len() {
            self.start_of(index)
        } else {
            self.end()
        }
    }

    /// Source byte range covered by the non-empty token run `run`.
    pub fn run_span(&self, run: Range<usize>) -> Range<usize> {
        self.start_of(run.start)..self.end_of(run.end - 1)
    }

    /// Number of matched tokens.
    pub fn matched(&self) -> usize {
        self.cross_index.iter().filter(|c| c.is_some()).count()
    }
}
