//! In-memory store: a thin passthrough to the engine, no mirroring.

use async_trait::async_trait;

use common::{OrderType, Side, Symbol};

use crate::domain::{OrderBookSnapshot, Trade};
use crate::engine::MatchingEngine;
use crate::result::Outcome;
use crate::store::traits::{MatchingStore, StoreResult};

pub struct InMemoryStore {
    engine: MatchingEngine,
}

impl InMemoryStore {
    pub fn new(engine: MatchingEngine) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl MatchingStore for InMemoryStore {
    async fn submit(
        &self,
        symbol: &Symbol,
        order_type: OrderType,
        user_id: i64,
        side: Side,
        price: i64,
        qty: i64,
    ) -> StoreResult<Outcome> {
        Ok(self.engine.submit(symbol, order_type, user_id, side, price, qty).await)
    }

    async fn snapshot(&self, symbol: &Symbol, depth: usize) -> StoreResult<OrderBookSnapshot> {
        Ok(self.engine.snapshot(symbol, depth).await)
    }

    async fn recent_trades(&self, symbol: &Symbol, limit: usize) -> StoreResult<Vec<Trade>> {
        Ok(self.engine.recent_trades(symbol, limit).await)
    }
}
