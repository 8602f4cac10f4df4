//! The tick scheduler — one periodic task driving the whole pipeline.
//!
//! Each tick runs simulate → evaluate alerts → broadcast, in that order.
//! Ticks never overlap: a single task awaits each cycle to completion, and
//! the interval skips fires that would land while a cycle is still running.
//! Every phase is isolated — a failing alert store or an unserializable
//! snapshot is logged and the remaining phases (and all future ticks) still
//! run. Nothing stops the scheduler.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use tape_core::stats::TickDurationStats;

use crate::alerts::AlertEvaluator;
use crate::hub::BroadcastHub;
use crate::simulator::PriceSimulator;
use crate::table::PriceTable;

/// Log a tick-duration summary every this many ticks.
const STATS_LOG_EVERY: u64 = 100;

/// The market engine: owns the price table, the simulator, the alert
/// evaluator, and a handle to the broadcast hub.
///
/// Constructed once at startup; the table is shared out through
/// [`MarketEngine::table`] for snapshot-on-connect and any non-streaming
/// read access. The engine task is the table's only writer.
pub struct MarketEngine {
    table: Arc<RwLock<PriceTable>>,
    simulator: PriceSimulator,
    evaluator: AlertEvaluator,
    hub: Arc<BroadcastHub>,
    tick_interval: Duration,
    stats: TickDurationStats,
    tick_count: u64,
}

impl MarketEngine {
    pub fn new(
        table: PriceTable,
        simulator: PriceSimulator,
        evaluator: AlertEvaluator,
        hub: Arc<BroadcastHub>,
        tick_interval: Duration,
    ) -> Self {
        Self {
            table: Arc::new(RwLock::new(table)),
            simulator,
            evaluator,
            hub,
            tick_interval,
            stats: TickDurationStats::new(),
            tick_count: 0,
        }
    }

    /// Shared read handle to the price table.
    pub fn table(&self) -> Arc<RwLock<PriceTable>> {
        self.table.clone()
    }

    /// Run the tick loop forever.
    pub async fn run(mut self) {
        let mut interval = tokio::time::interval(self.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!("tick loop started (period {:?})", self.tick_interval);

        loop {
            interval.tick().await;

            let started = Instant::now();
            self.tick().await;
            self.stats.record(started.elapsed());

            self.tick_count += 1;
            if self.tick_count % STATS_LOG_EVERY == 0 {
                if let Some(summary) = self.stats.summary() {
                    info!("tick timing: {summary}");
                }
                self.stats.reset();
            }
        }
    }

    /// Run one simulate→evaluate→broadcast cycle.
    pub async fn tick(&mut self) {
        {
            let mut table = self.table.write().await;
            self.simulator.step(&mut table);
        }

        let table = self.table.read().await;

        // Alert evaluation is best-effort; a failing or slow store must not
        // hold up the broadcast.
        match self.evaluator.evaluate(&table).await {
            Ok(triggers) if !triggers.is_empty() => {
                debug!("{} alert(s) triggered this tick", triggers.len());
            }
            Ok(_) => {}
            Err(e) => warn!("alert evaluation failed: {e:#}"),
        }

        match serde_json::to_string(&*table) {
            Ok(payload) => self.hub.broadcast(payload.into()).await,
            Err(e) => error!("snapshot serialization failed: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::{AlertStore, StaticAlertStore};
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use tape_core::types::{Alert, InstrumentSpec};
    use tokio_tungstenite::tungstenite::Utf8Bytes;

    fn seed(symbols: &[(&str, f64)]) -> Vec<InstrumentSpec> {
        symbols
            .iter()
            .map(|&(symbol, value)| InstrumentSpec {
                symbol: symbol.to_string(),
                value,
                change: 0.0,
            })
            .collect()
    }

    fn engine_with_store(store: Arc<dyn AlertStore>, hub: Arc<BroadcastHub>) -> MarketEngine {
        let table = PriceTable::new(&seed(&[("btc", 60000.0), ("eth", 3500.0)]));
        let simulator = PriceSimulator::with_source(1e-5, 1e-3, Box::new(|| 0.5));
        let evaluator = AlertEvaluator::new(store, Duration::from_millis(100));
        MarketEngine::new(table, simulator, evaluator, hub, Duration::from_secs(3))
    }

    #[tokio::test]
    async fn tick_broadcasts_the_full_table() {
        let hub = Arc::new(BroadcastHub::new());
        let store = Arc::new(StaticAlertStore::new(Vec::new()));
        let mut engine = engine_with_store(store, hub.clone());

        let (_id, mut rx) = hub.subscribe(Utf8Bytes::from(String::from("{}"))).await;
        rx.recv().await.unwrap(); // snapshot

        engine.tick().await;
        let payload = rx.recv().await.unwrap();
        let parsed: serde_json::Value = serde_json::from_str(payload.as_str()).unwrap();
        let object = parsed.as_object().unwrap();
        assert_eq!(object.len(), 2); // all symbols, never a delta
        assert!(object["btc"]["value"].as_f64().unwrap() > 0.0);
        assert_eq!(object["eth"]["history"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn subscribers_get_identical_payloads() {
        let hub = Arc::new(BroadcastHub::new());
        let store = Arc::new(StaticAlertStore::new(Vec::new()));
        let mut engine = engine_with_store(store, hub.clone());

        let (_a, mut rx_a) = hub.subscribe(Utf8Bytes::from(String::from("{}"))).await;
        let (_b, mut rx_b) = hub.subscribe(Utf8Bytes::from(String::from("{}"))).await;
        rx_a.recv().await.unwrap();
        rx_b.recv().await.unwrap();

        engine.tick().await;
        assert_eq!(rx_a.recv().await.unwrap(), rx_b.recv().await.unwrap());
    }

    struct FailingStore;

    #[async_trait]
    impl AlertStore for FailingStore {
        async fn all_alerts(&self) -> Result<Vec<Alert>> {
            Err(anyhow!("store unavailable"))
        }
    }

    #[tokio::test]
    async fn store_failure_does_not_stop_the_broadcast() {
        let hub = Arc::new(BroadcastHub::new());
        let mut engine = engine_with_store(Arc::new(FailingStore), hub.clone());

        let (_id, mut rx) = hub.subscribe(Utf8Bytes::from(String::from("{}"))).await;
        rx.recv().await.unwrap();

        engine.tick().await;
        let payload = rx.recv().await.unwrap(); // broadcast still happened
        assert!(payload.as_str().contains("btc"));
    }

    #[tokio::test]
    async fn prices_move_every_tick() {
        let hub = Arc::new(BroadcastHub::new());
        let store = Arc::new(StaticAlertStore::new(Vec::new()));
        let mut engine = engine_with_store(store, hub);
        let table = engine.table();

        let before = table.read().await.get("btc").unwrap().value;
        engine.tick().await;
        engine.tick().await;
        let quote = table.read().await.get("btc").unwrap().clone();
        assert!(quote.value > before); // pure drift with the midpoint source
        assert_eq!(quote.history.len(), 3);
    }
}
