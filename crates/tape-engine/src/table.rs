//! The in-memory price table — the single piece of mutable shared state.
//!
//! The table maps instrument symbols to their current [`Quote`]. The key set
//! is fixed at construction from the instrument seed list and never changes
//! at runtime; only the quote values move. Keys are normalized to lowercase
//! so lookups coming from user-supplied alert symbols match regardless of
//! case.
//!
//! Serializing the table produces the wire payload broadcast to every
//! subscriber: one JSON object keyed by symbol, in seed order, each value a
//! `{"value", "change", "history"}` object.

use ahash::AHashMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tape_core::error::TapeError;
use tape_core::types::{InstrumentSpec, Quote};

/// Mapping of symbol → current quote, with a fixed key set.
pub struct PriceTable {
    /// Symbols in seed order — the iteration order for simulation and the
    /// wire payload.
    symbols: Vec<String>,
    quotes: AHashMap<String, Quote>,
}

impl PriceTable {
    /// Build the table from a seed list. Symbols are lowercased; a duplicate
    /// (case-insensitive) keeps the first occurrence.
    pub fn new(seed: &[InstrumentSpec]) -> Self {
        let mut symbols = Vec::with_capacity(seed.len());
        let mut quotes = AHashMap::with_capacity(seed.len());
        for spec in seed {
            let key = spec.symbol.to_lowercase();
            if !quotes.contains_key(&key) {
                quotes.insert(key.clone(), Quote::seeded(spec.value, spec.change));
                symbols.push(key);
            }
        }
        Self { symbols, quotes }
    }

    /// Look up a quote by symbol, case-insensitively.
    pub fn get(&self, symbol: &str) -> Option<&Quote> {
        if let Some(quote) = self.quotes.get(symbol) {
            return Some(quote);
        }
        self.quotes.get(&symbol.to_lowercase())
    }

    /// Apply a new value to one symbol: recomputes the percentage change,
    /// replaces the value, and appends to the bounded history.
    ///
    /// `symbol` must be a canonical (lowercase) table key; anything else is
    /// rejected with [`TapeError::UnknownSymbol`]. The symbol set is fixed,
    /// so a rejection here means a caller bug, not a data condition.
    pub fn update(&mut self, symbol: &str, new_value: f64) -> Result<(), TapeError> {
        let quote = self
            .quotes
            .get_mut(symbol)
            .ok_or_else(|| TapeError::UnknownSymbol(symbol.to_string()))?;
        quote.apply(new_value);
        Ok(())
    }

    /// Symbols in seed order.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Iterate `(symbol, quote)` pairs in seed order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Quote)> {
        self.symbols
            .iter()
            .filter_map(|s| self.quotes.get(s).map(|q| (s.as_str(), q)))
    }

    /// Number of instruments in the table.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl Serialize for PriceTable {
    /// The broadcast wire shape: all symbols, always, never a delta.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.symbols.len()))?;
        for (symbol, quote) in self.iter() {
            map.serialize_entry(symbol, quote)?;
        }
        map.end()
    }
}
