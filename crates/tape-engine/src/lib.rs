//! # tape-engine
//!
//! The market-data simulation and broadcast engine.
//!
//! ## Architecture
//!
//! A single periodic tick task drives the whole pipeline:
//!
//! ```text
//! MarketEngine.run() ──► simulator.step(table)      (mutate prices)
//!                    ──► evaluator.evaluate(table)  (check threshold alerts)
//!                    ──► hub.broadcast(snapshot)    (fan out to subscribers)
//! ```
//!
//! Subscribers attach through the WebSocket transport ([`ws`]), which
//! registers each connection with the [`hub::BroadcastHub`] and delivers a
//! full table snapshot immediately on connect.
//!
//! ## Modules
//!
//! - [`table`] — fixed-key symbol→quote table with bounded history
//! - [`simulator`] — geometric-drift price model
//! - [`alerts`] — alert store seam + per-tick threshold evaluation
//! - [`hub`] — subscriber registry and fan-out
//! - [`engine`] — the tick scheduler tying it all together
//! - [`ws`] — WebSocket transport feeding the hub

pub mod alerts;
pub mod engine;
pub mod hub;
pub mod simulator;
pub mod table;
pub mod ws;
