//! User-defined price threshold alerts.
//!
//! Alerts are owned by the persistence layer; the engine only reads them and
//! compares each against the current quote for its symbol.

use serde::{Deserialize, Serialize};

/// Which side of the target price fires the alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertCondition {
    Above,
    Below,
}

impl AlertCondition {
    /// Whether a quote at `value` satisfies this condition for `target`.
    ///
    /// `Above` is strict `value > target`, `Below` is strict `value < target`;
    /// a value exactly at the target fires neither.
    pub fn is_met(self, value: f64, target: f64) -> bool {
        match self {
            Self::Above => value > target,
            Self::Below => value < target,
        }
    }
}

impl std::fmt::Display for AlertCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Above => write!(f, "above"),
            Self::Below => write!(f, "below"),
        }
    }
}

/// One user-defined threshold alert, read-only to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub user_id: i64,
    pub symbol: String,
    pub condition: AlertCondition,
    pub target_price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn above_is_strict() {
        assert!(AlertCondition::Above.is_met(100.1, 100.0));
        assert!(!AlertCondition::Above.is_met(100.0, 100.0)); // boundary
        assert!(!AlertCondition::Above.is_met(99.9, 100.0));
    }

    #[test]
    fn below_is_strict() {
        assert!(AlertCondition::Below.is_met(99.9, 100.0));
        assert!(!AlertCondition::Below.is_met(100.0, 100.0)); // boundary
        assert!(!AlertCondition::Below.is_met(100.1, 100.0));
    }

    #[test]
    fn condition_deserializes_lowercase() {
        let alert: Alert = serde_json::from_str(
            r#"{ "user_id": 7, "symbol": "btc", "condition": "above", "target_price": 65000.0 }"#,
        )
        .unwrap();
        assert_eq!(alert.condition, AlertCondition::Above);
        assert_eq!(alert.symbol, "btc");
    }
}
