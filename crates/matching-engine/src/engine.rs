//! Core Matching Engine
//!
//! Implements the deterministic price-time priority matching algorithm,
//! partitioned and locked per symbol so unrelated symbols never contend.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use common::{OrderType, Side, Symbol};
use config::PublishingConfig;
use tokio::sync::{broadcast, RwLock};
use tracing::info;

use crate::book::OrderBook;
use crate::domain::{Order, OrderBookSnapshot, Trade};
use crate::error::MatchingError;
use crate::metrics::EngineMetrics;
use crate::publisher::Publisher;
use crate::result::Outcome;
use crate::sequence::{format_order_id, format_trade_id, SequenceAllocator};

/// Per-symbol counters, exposed read-only for stores that mirror engine
/// state elsewhere (e.g. the Redis store).
#[derive(Debug, Clone, Copy)]
pub struct Counters {
    pub order_seq: u32,
    pub buy_seq: u32,
    pub sell_seq: u32,
    pub trade_seq: u32,
    pub last_publish_time: i64,
}

struct SymbolState {
    book: OrderBook,
    sequences: SequenceAllocator,
    trades: Vec<Trade>,
    last_publish_time: i64,
}

impl SymbolState {
    fn new() -> Self {
        Self {
            book: OrderBook::new(),
            sequences: SequenceAllocator::new(),
            trades: Vec::new(),
            last_publish_time: 0,
        }
    }
}

/// The matching engine. Owns a per-symbol sharded book and a publisher for
/// the order-book and trade broadcast channels.
pub struct MatchingEngine {
    symbols: RwLock<HashMap<Symbol, Arc<RwLock<SymbolState>>>>,
    publisher: Publisher,
    metrics: Arc<EngineMetrics>,
    publishing: PublishingConfig,
}

impl MatchingEngine {
    pub fn new(publishing: PublishingConfig) -> Self {
        Self {
            symbols: RwLock::new(HashMap::new()),
            publisher: Publisher::new(),
            metrics: Arc::new(EngineMetrics::new()),
            publishing,
        }
    }

    pub fn metrics(&self) -> Arc<EngineMetrics> {
        self.metrics.clone()
    }

    pub fn subscribe_orderbook(&self, symbol: &Symbol) -> broadcast::Receiver<String> {
        self.publisher.subscribe_orderbook(symbol)
    }

    pub fn subscribe_trades(&self, symbol: &Symbol) -> broadcast::Receiver<String> {
        self.publisher.subscribe_trades(symbol)
    }

    async fn symbol_state(&self, symbol: &Symbol) -> Arc<RwLock<SymbolState>> {
        if let Some(state) = self.symbols.read().await.get(symbol) {
            return state.clone();
        }
        let mut symbols = self.symbols.write().await;
        symbols
            .entry(symbol.clone())
            .or_insert_with(|| Arc::new(RwLock::new(SymbolState::new())))
            .clone()
    }

    fn validate(order_type: OrderType, price: i64, qty: i64) -> Result<(), MatchingError> {
        if order_type == OrderType::Market {
            return Err(MatchingError::NotImplemented);
        }
        if price <= 0 {
            return Err(MatchingError::InvalidPrice);
        }
        if qty <= 0 {
            return Err(MatchingError::InvalidQuantity);
        }
        Ok(())
    }

    /// Submits a new order for matching. The whole call is a single atomic
    /// transition against the symbol's state: no caller observes a
    /// half-applied match.
    pub async fn submit(
        &self,
        symbol: &Symbol,
        order_type: OrderType,
        user_id: i64,
        side: Side,
        price: i64,
        qty: i64,
    ) -> Outcome {
        let started = Instant::now();

        if let Err(error) = Self::validate(order_type, price, qty) {
            self.metrics.orders_rejected.increment();
            return Outcome::Error { error };
        }

        let state_lock = self.symbol_state(symbol).await;
        let mut state = state_lock.write().await;

        let timestamp = Utc::now().timestamp_millis();
        let order_seq = state.sequences.next_order_seq();
        let _side_seq = state.sequences.next_side_seq(side);
        let order_id = format_order_id(timestamp, order_seq);

        let mut remaining = qty;
        let mut trade_ids = Vec::new();
        let opposite = side.opposite();

        while remaining > 0 {
            let Some((maker_id, maker_price)) = state.book.peek_best(opposite) else {
                break;
            };

            let crosses = match side {
                Side::Buy => maker_price <= price,
                Side::Sell => maker_price >= price,
            };
            if !crosses {
                break;
            }

            let maker_qty = state.book.lookup(&maker_id).qty;
            let trade_qty = remaining.min(maker_qty);

            let trade_seq = state.sequences.next_trade_seq();
            let trade_id = format_trade_id(timestamp, trade_seq);
            let maker_user_id = state.book.lookup(&maker_id).user_id;

            let trade = Trade {
                trade_id: trade_id.clone(),
                maker_order_id: maker_id.clone(),
                maker_user_id,
                taker_order_id: order_id.clone(),
                taker_user_id: user_id,
                price: maker_price,
                qty: trade_qty,
                timestamp,
            };

            if maker_qty > remaining {
                state.book.decrement_qty(&maker_id, remaining);
            } else {
                state.book.pop_best(opposite);
            }
            remaining -= trade_qty;

            self.publisher.record_trade(symbol, &trade);
            self.metrics.trades_executed.increment();
            state.trades.push(trade);
            trade_ids.push(trade_id);
        }

        if remaining > 0 {
            state.book.insert(Order {
                order_id: order_id.clone(),
                user_id,
                side,
                price,
                qty: remaining,
                timestamp,
            });
        }

        if timestamp - state.last_publish_time >= self.publishing.snapshot_throttle_ms as i64 {
            let snapshot = OrderBookSnapshot {
                symbol: symbol.clone(),
                bids: state.book.snapshot(Side::Buy, self.publishing.snapshot_depth as usize),
                asks: state.book.snapshot(Side::Sell, self.publishing.snapshot_depth as usize),
            };
            self.publisher.publish_orderbook(symbol, &snapshot);
            state.last_publish_time = timestamp;
        }

        self.metrics.orders_received.increment();
        self.metrics.record_latency(started.elapsed());

        let outcome = if remaining == qty && trade_ids.is_empty() {
            Outcome::Open { order_id }
        } else if remaining == 0 {
            Outcome::Filled { order_id, trade_ids }
        } else {
            Outcome::Partial {
                order_id,
                remaining_qty: remaining,
                trade_ids,
            }
        };

        info!(
            symbol = symbol.as_str(),
            side = %side,
            status = ?outcome,
            "order submitted"
        );

        outcome
    }

    pub async fn snapshot(&self, symbol: &Symbol, depth: usize) -> OrderBookSnapshot {
        let state_lock = self.symbol_state(symbol).await;
        let state = state_lock.read().await;
        OrderBookSnapshot {
            symbol: symbol.clone(),
            bids: state.book.snapshot(Side::Buy, depth),
            asks: state.book.snapshot(Side::Sell, depth),
        }
    }

    pub async fn recent_trades(&self, symbol: &Symbol, limit: usize) -> Vec<Trade> {
        let state_lock = self.symbol_state(symbol).await;
        let state = state_lock.read().await;
        state
            .trades
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect()
    }

    pub async fn lookup_order(&self, symbol: &Symbol, order_id: &str) -> Option<Order> {
        let state_lock = self.symbol_state(symbol).await;
        let state = state_lock.read().await;
        state.book.try_lookup(order_id).cloned()
    }

    pub async fn lookup_trade(&self, symbol: &Symbol, trade_id: &str) -> Option<Trade> {
        let state_lock = self.symbol_state(symbol).await;
        let state = state_lock.read().await;
        state.trades.iter().find(|t| t.trade_id == trade_id).cloned()
    }

    pub async fn counters(&self, symbol: &Symbol) -> Counters {
        let state_lock = self.symbol_state(symbol).await;
        let state = state_lock.read().await;
        Counters {
            order_seq: state.sequences.order_seq(),
            buy_seq: state.sequences.buy_seq(),
            sell_seq: state.sequences.sell_seq(),
            trade_seq: state.sequences.trade_seq(),
            last_publish_time: state.last_publish_time,
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_engine() -> MatchingEngine {
        MatchingEngine::new(PublishingConfig {
            snapshot_depth: 100,
            snapshot_throttle_ms: 0,
        })
    }

    #[tokio::test]
    async fn test_resting_order_on_empty_book_is_open() {
        let engine = new_engine();
        let symbol = Symbol::from("BTCUSD");
        let outcome = engine
            .submit(&symbol, OrderType::Limit, 1, Side::Buy, 100, 10)
            .await;
        assert!(matches!(outcome, Outcome::Open { .. }));
    }

    #[tokio::test]
    async fn test_exact_match_fills_both_sides() {
        let engine = new_engine();
        let symbol = Symbol::from("BTCUSD");
        engine
            .submit(&symbol, OrderType::Limit, 1, Side::Sell, 100, 10)
            .await;
        let outcome = engine
            .submit(&symbol, OrderType::Limit, 2, Side::Buy, 100, 10)
            .await;
        match outcome {
            Outcome::Filled { trade_ids, .. } => assert_eq!(trade_ids.len(), 1),
            other => panic!("expected filled, got {:?}", other),
        }
        assert!(engine.snapshot(&symbol, 10).await.asks.is_empty());
    }

    #[tokio::test]
    async fn test_partial_maker_fill_keeps_maker_resting_with_price_improvement() {
        let engine = new_engine();
        let symbol = Symbol::from("BTCUSD");
        engine
            .submit(&symbol, OrderType::Limit, 1, Side::Sell, 100, 20)
            .await;
        let outcome = engine
            .submit(&symbol, OrderType::Limit, 2, Side::Buy, 105, 5)
            .await;
        match outcome {
            Outcome::Filled { trade_ids, .. } => assert_eq!(trade_ids.len(), 1),
            other => panic!("expected filled, got {:?}", other),
        }
        let trades = engine.recent_trades(&symbol, 1).await;
        assert_eq!(trades[0].price, 100);
        let asks = engine.snapshot(&symbol, 10).await.asks;
        assert_eq!(asks[0].qty, 15);
    }

    #[tokio::test]
    async fn test_incoming_order_walks_multiple_price_levels() {
        let engine = new_engine();
        let symbol = Symbol::from("BTCUSD");
        engine
            .submit(&symbol, OrderType::Limit, 1, Side::Sell, 100, 5)
            .await;
        engine
            .submit(&symbol, OrderType::Limit, 2, Side::Sell, 101, 5)
            .await;
        let outcome = engine
            .submit(&symbol, OrderType::Limit, 3, Side::Buy, 101, 10)
            .await;
        match outcome {
            Outcome::Filled { trade_ids, .. } => assert_eq!(trade_ids.len(), 2),
            other => panic!("expected filled, got {:?}", other),
        }
        let trades = engine.recent_trades(&symbol, 2).await;
        let prices: Vec<i64> = trades.iter().map(|t| t.price).collect();
        assert!(prices.contains(&100));
        assert!(prices.contains(&101));
    }

    #[tokio::test]
    async fn test_price_time_priority_at_one_level() {
        let engine = new_engine();
        let symbol = Symbol::from("BTCUSD");
        engine
            .submit(&symbol, OrderType::Limit, 1, Side::Sell, 100, 5)
            .await;
        engine
            .submit(&symbol, OrderType::Limit, 2, Side::Sell, 100, 5)
            .await;
        let outcome = engine
            .submit(&symbol, OrderType::Limit, 3, Side::Buy, 100, 5)
            .await;
        let Outcome::Filled { trade_ids, .. } = outcome else {
            panic!("expected filled")
        };
        let trade = engine.lookup_trade(&symbol, &trade_ids[0]).await.unwrap();
        assert_eq!(trade.maker_user_id, 1);
    }

    #[tokio::test]
    async fn test_non_crossing_order_rests_without_trading() {
        let engine = new_engine();
        let symbol = Symbol::from("BTCUSD");
        engine
            .submit(&symbol, OrderType::Limit, 1, Side::Buy, 95, 10)
            .await;
        let outcome = engine
            .submit(&symbol, OrderType::Limit, 2, Side::Sell, 100, 10)
            .await;
        assert!(matches!(outcome, Outcome::Open { .. }));
    }

    #[tokio::test]
    async fn test_equal_price_crosses() {
        let engine = new_engine();
        let symbol = Symbol::from("BTCUSD");
        engine
            .submit(&symbol, OrderType::Limit, 1, Side::Buy, 100, 10)
            .await;
        let outcome = engine
            .submit(&symbol, OrderType::Limit, 2, Side::Sell, 100, 10)
            .await;
        assert!(matches!(outcome, Outcome::Filled { .. }));
    }

    #[tokio::test]
    async fn test_one_unit_worse_price_does_not_cross() {
        let engine = new_engine();
        let symbol = Symbol::from("BTCUSD");
        engine
            .submit(&symbol, OrderType::Limit, 1, Side::Buy, 100, 10)
            .await;
        let outcome = engine
            .submit(&symbol, OrderType::Limit, 2, Side::Sell, 101, 10)
            .await;
        assert!(matches!(outcome, Outcome::Open { .. }));
    }

    #[tokio::test]
    async fn test_trade_price_is_always_makers_price() {
        let engine = new_engine();
        let symbol = Symbol::from("BTCUSD");
        engine
            .submit(&symbol, OrderType::Limit, 1, Side::Sell, 90, 10)
            .await;
        let outcome = engine
            .submit(&symbol, OrderType::Limit, 2, Side::Buy, 100, 10)
            .await;
        let Outcome::Filled { trade_ids, .. } = outcome else {
            panic!("expected filled")
        };
        let trade = engine.lookup_trade(&symbol, &trade_ids[0]).await.unwrap();
        assert_eq!(trade.price, 90);
    }

    #[tokio::test]
    async fn test_market_order_type_is_not_implemented() {
        let engine = new_engine();
        let symbol = Symbol::from("BTCUSD");
        let outcome = engine
            .submit(&symbol, OrderType::Market, 1, Side::Buy, 100, 10)
            .await;
        assert!(matches!(
            outcome,
            Outcome::Error {
                error: MatchingError::NotImplemented
            }
        ));
    }

    #[tokio::test]
    async fn test_invalid_price_rejected_before_mutation() {
        let engine = new_engine();
        let symbol = Symbol::from("BTCUSD");
        let outcome = engine
            .submit(&symbol, OrderType::Limit, 1, Side::Buy, 0, 10)
            .await;
        assert!(matches!(
            outcome,
            Outcome::Error {
                error: MatchingError::InvalidPrice
            }
        ));
        assert!(engine.snapshot(&symbol, 10).await.bids.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_quantity_rejected() {
        let engine = new_engine();
        let symbol = Symbol::from("BTCUSD");
        let outcome = engine
            .submit(&symbol, OrderType::Limit, 1, Side::Buy, 100, 0)
            .await;
        assert!(matches!(
            outcome,
            Outcome::Error {
                error: MatchingError::InvalidQuantity
            }
        ));
    }

    #[tokio::test]
    async fn test_quantity_conservation_across_partial_fill() {
        let engine = new_engine();
        let symbol = Symbol::from("BTCUSD");
        engine
            .submit(&symbol, OrderType::Limit, 1, Side::Sell, 100, 7)
            .await;
        let outcome = engine
            .submit(&symbol, OrderType::Limit, 2, Side::Buy, 100, 10)
            .await;
        match outcome {
            Outcome::Partial {
                remaining_qty,
                trade_ids,
                ..
            } => {
                assert_eq!(remaining_qty, 3);
                assert_eq!(trade_ids.len(), 1);
            }
            other => panic!("expected partial, got {:?}", other),
        }
        let trades = engine.recent_trades(&symbol, 1).await;
        assert_eq!(trades[0].qty, 7);
    }

    #[tokio::test]
    async fn test_exhausting_liquidity_leaves_empty_opposite_book() {
        let engine = new_engine();
        let symbol = Symbol::from("BTCUSD");
        engine
            .submit(&symbol, OrderType::Limit, 1, Side::Sell, 100, 5)
            .await;
        engine
            .submit(&symbol, OrderType::Limit, 2, Side::Buy, 100, 10)
            .await;
        assert!(engine.snapshot(&symbol, 10).await.asks.is_empty());
    }

    #[tokio::test]
    async fn test_symbols_do_not_interact() {
        let engine = new_engine();
        let btc = Symbol::from("BTCUSD");
        let eth = Symbol::from("ETHUSD");
        engine
            .submit(&btc, OrderType::Limit, 1, Side::Sell, 100, 10)
            .await;
        let outcome = engine
            .submit(&eth, OrderType::Limit, 2, Side::Buy, 100, 10)
            .await;
        assert!(matches!(outcome, Outcome::Open { .. }));
    }

    #[tokio::test]
    async fn test_splitting_incoming_order_yields_same_trades_as_one() {
        let engine = new_engine();
        let symbol = Symbol::from("BTCUSD");
        engine
            .submit(&symbol, OrderType::Limit, 1, Side::Sell, 100, 10)
            .await;
        engine
            .submit(&symbol, OrderType::Limit, 2, Side::Buy, 100, 4)
            .await;
        let outcome = engine
            .submit(&symbol, OrderType::Limit, 3, Side::Buy, 100, 6)
            .await;
        assert!(matches!(outcome, Outcome::Filled { .. }));
        let trades = engine.recent_trades(&symbol, 2).await;
        let total: i64 = trades.iter().map(|t| t.qty).sum();
        assert_eq!(total, 10);
    }
}
