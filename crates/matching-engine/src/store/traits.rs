//! The storage trait every backend (in-memory, Redis) satisfies.

use async_trait::async_trait;
use thiserror::Error;

use common::{OrderType, Side, Symbol};

use crate::domain::{OrderBookSnapshot, Trade};
use crate::result::Outcome;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("redis error: {0}")]
    Redis(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Matching always happens in-process through the engine; a store only
/// decides what else happens around that (e.g. mirroring into Redis).
#[async_trait]
pub trait MatchingStore: Send + Sync {
    async fn submit(
        &self,
        symbol: &Symbol,
        order_type: OrderType,
        user_id: i64,
        side: Side,
        price: i64,
        qty: i64,
    ) -> StoreResult<Outcome>;

    async fn snapshot(&self, symbol: &Symbol, depth: usize) -> StoreResult<OrderBookSnapshot>;

    async fn recent_trades(&self, symbol: &Symbol, limit: usize) -> StoreResult<Vec<Trade>>;
}
