//! Instrument seed specifications.
//!
//! The price table's symbol set is fixed at startup from a seed list: either
//! the `instruments` array in the config file or the built-in demo set below
//! (Indian indices, global indices, commodities, crypto assets, and large-cap
//! equities).

use serde::Deserialize;

/// Seed state for one instrument: the symbol and its opening quote.
#[derive(Debug, Clone, Deserialize)]
pub struct InstrumentSpec {
    /// Instrument identifier; normalized to lowercase by the price table.
    pub symbol: String,

    /// Opening price. Must be strictly positive.
    pub value: f64,

    /// Opening percentage change shown before the first tick.
    #[serde(default)]
    pub change: f64,
}

/// The built-in demo seed set.
const SEED: &[(&str, f64, f64)] = &[
    // Indian indices
    ("nifty50", 18234.50, 0.28),
    ("bsesensex", 61789.80, 0.24),
    ("niftybank", 43500.00, 0.46),
    ("niftyit", 29000.00, 0.52),
    ("niftypharma", 13000.00, 0.39),
    ("niftymidcap100", 35000.00, 0.34),
    ("niftysmallcap100", 12000.00, 0.67),
    ("nifty500", 16000.00, 0.44),
    ("indiavix", 12.50, -3.85),
    ("niftyauto", 15000.00, 0.67),
    ("niftyfmcg", 50000.00, 0.50),
    ("niftymetal", 6000.00, 0.50),
    // Global indices
    ("sp500", 4500.00, 0.44),
    ("nasdaq", 15000.00, 0.67),
    ("dowjones", 35000.00, 0.29),
    ("msciworld", 3000.00, 0.50),
    ("ftseallworld", 400.00, 0.50),
    ("djglobaltitans50", 300.00, 0.50),
    ("spglobal100", 1500.00, 0.50),
    ("spglobal1200", 2000.00, 0.50),
    // Commodities
    ("gold", 60000.00, 0.84),
    ("silver", 70000.00, 1.45),
    ("crudeoil", 80.00, 1.91),
    ("naturalgas", 3.00, 1.69),
    ("copper", 4.00, 0.50),
    ("aluminium", 2500.00, 0.40),
    ("zinc", 3000.00, 0.50),
    ("lead", 2000.00, 0.40),
    ("nickel", 20000.00, 0.50),
    ("cotton", 90.00, 0.56),
    // Crypto assets
    ("avax", 30.00, 5.26),
    ("btc", 60000.00, 2.04),
    ("eth", 3500.00, 2.04),
    ("xrp", 0.50, 4.17),
    ("ltc", 70.00, 2.94),
    ("ada", 0.40, 2.56),
    ("sol", 150.00, 3.45),
    ("doge", 0.15, 3.45),
    ("shib", 0.00001, 5.26),
    // Large-cap equities
    ("tcs", 3300.50, 0.31),
    ("reliance", 2500.00, -0.22),
    ("hdfcbank", 1600.75, 0.13),
    ("infosys", 1500.20, 0.60),
    ("icicibank", 900.00, -0.17),
    ("sbi", 600.50, 0.54),
    ("bhartiairtel", 800.00, -0.25),
    ("itc", 450.75, 0.24),
    ("lnt", 2200.00, 0.69),
    ("asianpaints", 3000.50, -0.33),
    ("tatamotors", 450.00, 1.12),
    ("marutisuzuki", 9000.00, -0.22),
    ("hul", 2500.00, 0.40),
    ("bajajfinance", 7000.00, -0.21),
    ("nestleindia", 20000.00, 0.25),
    ("wipro", 400.00, 1.27),
];

/// The built-in instrument seed set used when the config supplies none.
pub fn default_instruments() -> Vec<InstrumentSpec> {
    SEED.iter()
        .map(|&(symbol, value, change)| InstrumentSpec {
            symbol: symbol.to_string(),
            value,
            change,
        })
        .collect()
}
