//! Configuration types for the matching engine
//!
//! The full YAML document is a [`MasterConfig`]; only the subset that the
//! matching core actually consumes is modeled here — logging output
//! format, the storage backend selection, and the publish throttle. A
//! production deployment would extend this with the unrelated sections
//! (instrument catalogs, risk limits, wallet storage, ...) that a full
//! exchange carries; those are out of scope for this crate.

use serde::{Deserialize, Serialize};

pub mod defaults;
pub mod parser;
pub mod substitution;
pub mod validator;

pub use defaults::*;
pub use parser::*;
pub use substitution::*;
pub use validator::*;

/// Top-level configuration document
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MasterConfig {
    pub exchange: ExchangeConfig,
    pub logging: LoggingConfig,
    pub matching_engine: MatchingEngineConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExchangeConfig {
    pub name: String,
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,
}

/// Logging output configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Matching engine configuration: storage backend + publish throttle
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatchingEngineConfig {
    #[serde(rename = "orderbook_store")]
    pub orderbook_store: OrderbookStoreConfig,
    pub publishing: PublishingConfig,
}

/// Storage backend selection for order books and trades
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrderbookStoreConfig {
    #[serde(rename = "type")]
    pub store_type: String,
    #[serde(default)]
    pub redis: Option<RedisConfig>,
}

/// Redis connection parameters, used only when `orderbook_store.type = "redis"`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RedisConfig {
    pub host: String,
    #[serde(default = "default_redis_port")]
    pub port: u16,
    #[serde(default)]
    pub password: String,
    #[serde(rename = "db_index")]
    #[serde(default)]
    pub db_index: u8,
}

/// Throttled order-book snapshot publishing (§4.5 / §9 of the spec)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PublishingConfig {
    /// Price levels aggregated per side in a snapshot
    #[serde(default = "default_depth_levels")]
    pub snapshot_depth: u32,
    /// Minimum interval between successive snapshot emissions for a symbol.
    /// 0 forces publish-on-every-change.
    #[serde(default = "default_snapshot_throttle_ms")]
    pub snapshot_throttle_ms: u64,
}
