//! Stochastic price simulation.
//!
//! Each tick, every instrument's price is advanced with a geometric drift
//! model:
//!
//! ```text
//! new = old · exp(drift + volatility · U),   U uniform in [-1, 1]
//! ```
//!
//! The perturbation is multiplicative and `exp` is always positive, so prices
//! never reach zero or go negative regardless of the draw. Drift and
//! volatility are shared by all symbols — there are no per-asset volatility
//! classes.
//!
//! The uniform source is injectable so tests can drive the model with a fixed
//! sequence; production uses the thread-local `rand` generator.

use rand::Rng;
use tracing::error;

use crate::table::PriceTable;

/// A source of uniform draws in `[0, 1)`. `U` is derived as `2r − 1`.
pub type UnitSource = Box<dyn FnMut() -> f64 + Send>;

/// Advances every quote in a [`PriceTable`] once per tick.
pub struct PriceSimulator {
    drift: f64,
    volatility: f64,
    unit_source: UnitSource,
}

impl PriceSimulator {
    /// Create a simulator backed by the thread-local random generator.
    pub fn new(drift: f64, volatility: f64) -> Self {
        Self::with_source(drift, volatility, Box::new(|| rand::rng().random::<f64>()))
    }

    /// Create a simulator with an explicit uniform source.
    ///
    /// A source that always returns `0.5` yields `U = 0`, i.e. pure drift —
    /// useful for deterministic assertions.
    pub fn with_source(drift: f64, volatility: f64, unit_source: UnitSource) -> Self {
        Self { drift, volatility, unit_source }
    }

    /// Run one simulation pass: update every symbol once, in table order.
    pub fn step(&mut self, table: &mut PriceTable) {
        let symbols: Vec<String> = table.symbols().to_vec();
        for symbol in symbols {
            let Some(old_value) = table.get(&symbol).map(|q| q.value) else { continue };

            let u = 2.0 * (self.unit_source)() - 1.0;
            let new_value = old_value * (self.drift + self.volatility * u).exp();

            // The symbol came from the table itself; a rejection here is a
            // broken invariant, not a recoverable condition.
            if let Err(e) = table.update(&symbol, new_value) {
                error!("price update rejected: {e}");
            }
        }
    }
}
