//! Domain types for the matching engine.
//!
//! These are the engine's own richer record types; `common` only carries
//! the vocabulary shared above the engine boundary (`Side`, `Symbol`, ...).

use common::{Side, Symbol};
use serde::{Deserialize, Serialize};

/// A resting or just-submitted order.
///
/// Invariants: `qty > 0` while resting (an order reaching qty 0 is removed
/// atomically with the fill that caused it); `price > 0`; `side` is
/// immutable for the order's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub user_id: i64,
    pub side: Side,
    pub price: i64,
    pub qty: i64,
    pub timestamp: i64,
}

/// An immutable, append-only trade record.
///
/// `price` is always the maker's resting price, never the taker's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: String,
    pub maker_order_id: String,
    pub maker_user_id: i64,
    pub taker_order_id: String,
    pub taker_user_id: i64,
    pub price: i64,
    pub qty: i64,
    pub timestamp: i64,
}

/// One aggregated price level in a snapshot: the sum of `qty` across every
/// resting order at that price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: i64,
    pub qty: i64,
}

/// A throttled view of the top price levels of both sides of a symbol's
/// book, as published on its order-book channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    pub symbol: Symbol,
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
}
