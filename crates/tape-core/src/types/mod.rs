//! Domain types shared across the tape service.

pub mod alert;
pub mod instrument;
pub mod quote;

pub use alert::{Alert, AlertCondition};
pub use instrument::InstrumentSpec;
pub use quote::{HISTORY_LEN, Quote};
