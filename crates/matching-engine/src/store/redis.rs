//! Redis-backed store.
//!
//! Matching always happens in-process through the engine. This store's
//! only job is to best-effort mirror the resulting state into Redis in
//! the key layout an existing deployment already expects, so readers
//! pointed at Redis keep working. A mirroring failure is logged and
//! otherwise ignored - it never rolls back a match that already
//! happened in-process.

use std::sync::Arc;

use async_trait::async_trait;
use redis::AsyncCommands;
use tokio::sync::Mutex;
use tracing::{info, warn};

use common::{OrderType, Side, Symbol};
use config::RedisConfig;

use crate::domain::{Order, OrderBookSnapshot, Trade};
use crate::engine::MatchingEngine;
use crate::result::Outcome;
use crate::store::traits::{MatchingStore, StoreError, StoreResult};

pub struct RedisStore {
    engine: MatchingEngine,
    redis: Arc<Mutex<redis::aio::ConnectionManager>>,
}

impl RedisStore {
    pub async fn new(engine: MatchingEngine, config: &RedisConfig) -> StoreResult<Self> {
        let connection_string = if config.password.is_empty() {
            format!("redis://{}:{}/{}", config.host, config.port, config.db_index)
        } else {
            format!(
                "redis://:{}@{}:{}/{}",
                config.password, config.host, config.port, config.db_index
            )
        };

        info!(host = %config.host, port = config.port, db = config.db_index, "connecting to redis");

        let client =
            redis::Client::open(connection_string.as_str()).map_err(|e| StoreError::Redis(e.to_string()))?;
        let connection_manager = client
            .get_connection_manager()
            .await
            .map_err(|e| StoreError::Redis(e.to_string()))?;

        Ok(Self {
            engine,
            redis: Arc::new(Mutex::new(connection_manager)),
        })
    }

    fn book_key(side: Side, symbol: &Symbol) -> String {
        match side {
            Side::Buy => format!("buy_book_{}", symbol.as_str()),
            Side::Sell => format!("sell_book_{}", symbol.as_str()),
        }
    }

    fn order_key(order_id: &str) -> String {
        format!("order:{}", order_id)
    }

    fn trade_key(trade_id: &str) -> String {
        format!("trade:{}", trade_id)
    }

    async fn mirror_order(&self, symbol: &Symbol, order: &Order) {
        let mut redis = self.redis.lock().await;
        let fields = [
            ("order_id", order.order_id.clone()),
            ("user_id", order.user_id.to_string()),
            ("side", order.side.to_string()),
            ("price", order.price.to_string()),
            ("qty", order.qty.to_string()),
            ("timestamp", order.timestamp.to_string()),
        ];
        if let Err(e) = redis
            .hset_multiple::<_, _, _, ()>(Self::order_key(&order.order_id), &fields)
            .await
        {
            warn!(error = %e, order_id = %order.order_id, "failed to mirror order to redis");
        }
        if let Err(e) = redis
            .zadd::<_, _, _, ()>(Self::book_key(order.side, symbol), &order.order_id, order.price)
            .await
        {
            warn!(error = %e, order_id = %order.order_id, "failed to mirror book entry to redis");
        }
    }

    async fn mirror_trade(&self, symbol: &Symbol, trade: &Trade) {
        let mut redis = self.redis.lock().await;
        let fields = [
            ("trade_id", trade.trade_id.clone()),
            ("maker_order_id", trade.maker_order_id.clone()),
            ("maker_user_id", trade.maker_user_id.to_string()),
            ("taker_order_id", trade.taker_order_id.clone()),
            ("taker_user_id", trade.taker_user_id.to_string()),
            ("price", trade.price.to_string()),
            ("qty", trade.qty.to_string()),
            ("timestamp", trade.timestamp.to_string()),
        ];
        if let Err(e) = redis
            .hset_multiple::<_, _, _, ()>(Self::trade_key(&trade.trade_id), &fields)
            .await
        {
            warn!(error = %e, trade_id = %trade.trade_id, "failed to mirror trade to redis");
        }

        // `Trade` does not carry the maker's side, so remove the maker
        // from both book keys - a harmless no-op on whichever it wasn't
        // resting in.
        for side in [Side::Buy, Side::Sell] {
            let _: Result<i64, _> = redis.zrem(Self::book_key(side, symbol), &trade.maker_order_id).await;
        }
    }

    async fn mirror_counters(&self, symbol: &Symbol) {
        let counters = self.engine.counters(symbol).await;
        let mut redis = self.redis.lock().await;
        let updates = [
            (format!("order_seq_{}", symbol.as_str()), counters.order_seq as i64),
            (format!("buy_seq_{}", symbol.as_str()), counters.buy_seq as i64),
            (format!("sell_seq_{}", symbol.as_str()), counters.sell_seq as i64),
            (format!("trade_seq_{}", symbol.as_str()), counters.trade_seq as i64),
            (format!("last_publish_time:{}", symbol.as_str()), counters.last_publish_time),
        ];
        for (key, value) in updates {
            if let Err(e) = redis.set::<_, _, ()>(&key, value).await {
                warn!(error = %e, key = %key, "failed to mirror counter to redis");
            }
        }
    }

    async fn mirror_submission(&self, symbol: &Symbol, order_id: &str, outcome: &Outcome) {
        for trade_id in outcome.trade_ids() {
            if let Some(trade) = self.engine.lookup_trade(symbol, &trade_id).await {
                self.mirror_trade(symbol, &trade).await;
            }
        }
        if let Some(order) = self.engine.lookup_order(symbol, order_id).await {
            self.mirror_order(symbol, &order).await;
        }
        self.mirror_counters(symbol).await;
    }
}

#[async_trait]
impl MatchingStore for RedisStore {
    async fn submit(
        &self,
        symbol: &Symbol,
        order_type: OrderType,
        user_id: i64,
        side: Side,
        price: i64,
        qty: i64,
    ) -> StoreResult<Outcome> {
        let outcome = self.engine.submit(symbol, order_type, user_id, side, price, qty).await;
        if let Some(order_id) = outcome.order_id() {
            self.mirror_submission(symbol, order_id, &outcome).await;
        }
        Ok(outcome)
    }

    async fn snapshot(&self, symbol: &Symbol, depth: usize) -> StoreResult<OrderBookSnapshot> {
        Ok(self.engine.snapshot(symbol, depth).await)
    }

    async fn recent_trades(&self, symbol: &Symbol, limit: usize) -> StoreResult<Vec<Trade>> {
        Ok(self.engine.recent_trades(symbol, limit).await)
    }
}
