//! Order matching engine: price-time priority limit order matching for a
//! single-asset exchange.
//!
//! # Architecture
//!
//! - [`book`] - per-symbol order book keyed by integer price, FIFO within
//!   a price level
//! - [`sequence`] - per-symbol id allocation
//! - [`engine`] - the matching algorithm, partitioned and locked per symbol
//! - [`publisher`] - trade and order-book pub/sub over
//!   `tokio::sync::broadcast`
//! - [`store`] - storage backends: in-memory, and an optional Redis-backed
//!   mirror for interop with an existing deployment
//!
//! # Example
//!
//! ```no_run
//! use common::{OrderType, Side, Symbol};
//! use config::PublishingConfig;
//! use matching_engine::MatchingEngine;
//!
//! #[tokio::main]
//! async fn main() {
//!     let engine = MatchingEngine::new(PublishingConfig {
//!         snapshot_depth: 100,
//!         snapshot_throttle_ms: 50,
//!     });
//!     let symbol = Symbol::from("BTCUSD");
//!     let outcome = engine
//!         .submit(&symbol, OrderType::Limit, 1, Side::Buy, 100, 10)
//!         .await;
//!     println!("{:?}", outcome);
//! }
//! ```

pub mod book;
pub mod domain;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod publisher;
pub mod result;
pub mod sequence;
pub mod store;

pub use domain::{Order, OrderBookSnapshot, PriceLevel, Trade};
pub use engine::MatchingEngine;
pub use error::MatchingError;
pub use metrics::{EngineMetrics, MetricsSnapshot};
pub use result::Outcome;
pub use store::{create_store, InMemoryStore, MatchingStore, RedisStore, StoreError, StoreResult};
