//! Current price state for one instrument.

use std::collections::VecDeque;

use serde::Serialize;

/// Bound on the rolling price history kept per instrument.
pub const HISTORY_LEN: usize = 20;

/// Current price state for one symbol.
///
/// Serializes to the wire shape `{"value": n, "change": n, "history": [n, ...]}`.
/// `value` stays strictly positive for the lifetime of the quote: it is seeded
/// positive and only ever replaced by a positive multiplicative perturbation.
#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    /// Current price.
    pub value: f64,

    /// Percentage delta from the previous tick's value.
    #[serde(rename = "change")]
    pub change_percent: f64,

    /// Past values, oldest first, at most [`HISTORY_LEN`] entries.
    pub history: VecDeque<f64>,
}

impl Quote {
    /// Create the initial quote for a symbol. History starts with the seed
    /// value, matching what a subscriber sees before the first tick.
    pub fn seeded(value: f64, change_percent: f64) -> Self {
        Self { value, change_percent, history: VecDeque::from([value]) }
    }

    /// Apply the next tick's value: recompute the percentage change, replace
    /// the current value, and append to the bounded history (oldest entry
    /// evicted once the bound is exceeded).
    pub fn apply(&mut self, new_value: f64) {
        self.change_percent = (new_value - self.value) / self.value * 100.0;
        self.value = new_value;
        self.history.push_back(new_value);
        if self.history.len() > HISTORY_LEN {
            self.history.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_updates_value_and_change() {
        let mut quote = Quote::seeded(100.0, 0.0);
        quote.apply(101.0);
        assert_eq!(quote.value, 101.0);
        assert!((quote.change_percent - 1.0).abs() < 1e-9);
        assert_eq!(quote.history, [100.0, 101.0]);
    }

    #[test]
    fn change_is_relative_to_previous_tick() {
        let mut quote = Quote::seeded(100.0, 0.0);
        quote.apply(200.0);
        quote.apply(100.0);
        assert!((quote.change_percent - (-50.0)).abs() < 1e-9); // (100-200)/200
    }

    #[test]
    fn history_evicts_oldest_beyond_bound() {
        let mut quote = Quote::seeded(1.0, 0.0);
        for i in 2..=30 {
            quote.apply(i as f64);
        }
        assert_eq!(quote.history.len(), HISTORY_LEN);
        assert_eq!(quote.history.front(), Some(&11.0)); // 1..=10 evicted
        assert_eq!(quote.history.back(), Some(&30.0));
    }

    #[test]
    fn wire_shape_uses_change_key() {
        let quote = Quote::seeded(42.0, 0.5);
        let json = serde_json::to_value(&quote).unwrap();
        assert_eq!(json["value"], 42.0);
        assert_eq!(json["change"], 0.5);
        assert_eq!(json["history"], serde_json::json!([42.0]));
    }
}
