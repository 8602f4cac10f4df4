//! Threshold alert evaluation.
//!
//! Alerts live in external persistence behind the [`AlertStore`] trait; the
//! engine does one bulk read per tick and compares every alert against the
//! current table. A trigger is observed as a log record only — there is no
//! delivery channel and no de-duplication, so an alert keeps firing on every
//! tick while its condition holds.
//!
//! Store reads are bounded by a timeout so a slow store can never hold up the
//! broadcast phase; a timeout or read error fails the evaluation, which the
//! tick loop treats as non-fatal.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use tape_core::error::TapeError;
use tape_core::types::Alert;
use tracing::info;

use crate::table::PriceTable;

/// Read-only view of the persisted alert list.
///
/// Implementations may fail or hang; the evaluator guards every call with a
/// timeout.
#[async_trait]
pub trait AlertStore: Send + Sync {
    /// Fetch the full alert list in one bulk read.
    async fn all_alerts(&self) -> Result<Vec<Alert>>;
}

/// An alert whose condition was satisfied this tick.
#[derive(Debug, Clone)]
pub struct AlertTrigger {
    pub alert: Alert,
    /// The quote value that satisfied the condition.
    pub value: f64,
}

/// Evaluates all persisted alerts against the price table once per tick.
pub struct AlertEvaluator {
    store: Arc<dyn AlertStore>,
    timeout: Duration,
}

impl AlertEvaluator {
    pub fn new(store: Arc<dyn AlertStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Run one evaluation pass.
    ///
    /// Returns the triggers observed this tick, or an error if the store read
    /// failed or exceeded the timeout. A symbol with no table entry never
    /// triggers and never errors.
    pub async fn evaluate(&self, table: &PriceTable) -> Result<Vec<AlertTrigger>> {
        let alerts = tokio::time::timeout(self.timeout, self.store.all_alerts())
            .await
            .map_err(|_| anyhow!("alert store read timed out after {:?}", self.timeout))??;

        let mut triggers = Vec::new();
        for alert in alerts {
            let Some(quote) = table.get(&alert.symbol) else { continue };
            if alert.condition.is_met(quote.value, alert.target_price) {
                info!(
                    "ALERT: {} is {} {} (current price: {}, user {})",
                    alert.symbol, alert.condition, alert.target_price, quote.value, alert.user_id,
                );
                triggers.push(AlertTrigger { value: quote.value, alert });
            }
        }
        Ok(triggers)
    }
}

// ---------------------------------------------------------------------------
// Store implementations
// ---------------------------------------------------------------------------

/// Fixed in-memory alert list. Stands in for real persistence in tests and
/// when no alerts file is configured.
pub struct StaticAlertStore {
    alerts: Vec<Alert>,
}

impl StaticAlertStore {
    pub fn new(alerts: Vec<Alert>) -> Self {
        Self { alerts }
    }
}

#[async_trait]
impl AlertStore for StaticAlertStore {
    async fn all_alerts(&self) -> Result<Vec<Alert>> {
        Ok(self.alerts.clone())
    }
}

/// Alert store backed by a JSON array file.
///
/// The file is re-read on every call, so edits show up on the next tick. A
/// missing or malformed file surfaces as a store error (and the tick carries
/// on without alert evaluation).
pub struct JsonAlertStore {
    path: PathBuf,
}

impl JsonAlertStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl AlertStore for JsonAlertStore {
    async fn all_alerts(&self) -> Result<Vec<Alert>> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| TapeError::Store(format!("read {}: {e}", self.path.display())))?;
        let alerts = serde_json::from_str(&raw)
            .map_err(|e| TapeError::Store(format!("parse {}: {e}", self.path.display())))?;
        Ok(alerts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tape_core::types::{AlertCondition, InstrumentSpec};

    fn table(seed: &[(&str, f64)]) -> PriceTable {
        let specs: Vec<_> = seed
            .iter()
            .map(|&(symbol, value)| InstrumentSpec {
                symbol: symbol.to_string(),
                value,
                change: 0.0,
            })
            .collect();
        PriceTable::new(&specs)
    }

    fn alert(symbol: &str, condition: AlertCondition, target_price: f64) -> Alert {
        Alert { user_id: 1, symbol: symbol.to_string(), condition, target_price }
    }

    fn evaluator(alerts: Vec<Alert>) -> AlertEvaluator {
        AlertEvaluator::new(Arc::new(StaticAlertStore::new(alerts)), Duration::from_secs(1))
    }

    #[tokio::test]
    async fn above_fires_iff_value_exceeds_target() {
        let table = table(&[("aapl", 100.0)]);

        let fired = evaluator(vec![alert("aapl", AlertCondition::Above, 99.0)])
            .evaluate(&table)
            .await
            .unwrap();
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].value, 100.0);

        let quiet = evaluator(vec![alert("aapl", AlertCondition::Above, 101.0)])
            .evaluate(&table)
            .await
            .unwrap();
        assert!(quiet.is_empty());
    }

    #[tokio::test]
    async fn below_fires_iff_value_under_target() {
        let table = table(&[("aapl", 100.0)]);

        let fired = evaluator(vec![alert("aapl", AlertCondition::Below, 101.0)])
            .evaluate(&table)
            .await
            .unwrap();
        assert_eq!(fired.len(), 1);

        let quiet = evaluator(vec![alert("aapl", AlertCondition::Below, 99.0)])
            .evaluate(&table)
            .await
            .unwrap();
        assert!(quiet.is_empty());
    }

    #[tokio::test]
    async fn symbol_match_ignores_case() {
        let table = table(&[("aapl", 100.0)]);
        let fired = evaluator(vec![alert("AAPL", AlertCondition::Above, 99.0)])
            .evaluate(&table)
            .await
            .unwrap();
        assert_eq!(fired.len(), 1);
    }

    #[tokio::test]
    async fn absent_symbol_never_fires_and_never_errors() {
        let table = table(&[("aapl", 100.0)]);
        let fired = evaluator(vec![
            alert("msft", AlertCondition::Above, 0.0),
            alert("aapl", AlertCondition::Above, 99.0),
        ])
        .evaluate(&table)
        .await
        .unwrap();
        assert_eq!(fired.len(), 1); // only the known symbol
        assert_eq!(fired[0].alert.symbol, "aapl");
    }

    #[tokio::test]
    async fn triggers_repeat_while_condition_holds() {
        let table = table(&[("aapl", 100.0)]);
        let evaluator = evaluator(vec![alert("aapl", AlertCondition::Above, 99.0)]);

        for _ in 0..3 {
            let fired = evaluator.evaluate(&table).await.unwrap();
            assert_eq!(fired.len(), 1); // no de-duplication across ticks
        }
    }

    struct HangingStore;

    #[async_trait]
    impl AlertStore for HangingStore {
        async fn all_alerts(&self) -> Result<Vec<Alert>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Vec::new())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn slow_store_read_times_out() {
        let table = table(&[("aapl", 100.0)]);
        let evaluator = AlertEvaluator::new(Arc::new(HangingStore), Duration::from_millis(50));
        let err = evaluator.evaluate(&table).await.unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn missing_alerts_file_is_a_store_error() {
        let table = table(&[("aapl", 100.0)]);
        let store = Arc::new(JsonAlertStore::new("/nonexistent/alerts.json"));
        let evaluator = AlertEvaluator::new(store, Duration::from_secs(1));
        assert!(evaluator.evaluate(&table).await.is_err());
    }
}
