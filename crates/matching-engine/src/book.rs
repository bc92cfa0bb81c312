//! Per-symbol order book.
//!
//! The book is a map from integer price to a FIFO queue of order-ids -
//! ascending for asks (lowest price first), descending for bids (highest
//! price first) - plus an auxiliary map from order-id to the full order
//! record. Within a price level, FIFO insertion order enforces time
//! priority: no explicit sequence field is needed on `Order` itself.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap, VecDeque};

use common::Side;

use crate::domain::{Order, PriceLevel};

#[derive(Debug, Default)]
pub struct OrderBook {
    bids: BTreeMap<Reverse<i64>, VecDeque<String>>,
    asks: BTreeMap<i64, VecDeque<String>>,
    orders: HashMap<String, Order>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Head of `side`'s book, without removing it.
    pub fn peek_best(&self, side: Side) -> Option<(String, i64)> {
        match side {
            Side::Buy => self.bids.iter().next().map(|(Reverse(price), queue)| {
                (
                    queue.front().expect("price level with empty queue").clone(),
                    *price,
                )
            }),
            Side::Sell => self
                .asks
                .iter()
                .next()
                .map(|(price, queue)| (queue.front().expect("price level with empty queue").clone(), *price)),
        }
    }

    /// Removes and returns the head of `side`'s book entirely - both from
    /// the price level's queue and from the order map.
    ///
    /// Panics if `side`'s book is empty; callers must check via
    /// `peek_best` first.
    pub fn pop_best(&mut self, side: Side) -> Order {
        let order_id = match side {
            Side::Buy => {
                let (&price_key, queue) = self
                    .bids
                    .iter_mut()
                    .next()
                    .expect("pop_best called on empty book");
                let id = queue.pop_front().expect("price level with empty queue");
                if queue.is_empty() {
                    self.bids.remove(&price_key);
                }
                id
            }
            Side::Sell => {
                let (&price_key, queue) = self
                    .asks
                    .iter_mut()
                    .next()
                    .expect("pop_best called on empty book");
                let id = queue.pop_front().expect("price level with empty queue");
                if queue.is_empty() {
                    self.asks.remove(&price_key);
                }
                id
            }
        };
        self.orders
            .remove(&order_id)
            .expect("dangling order id in book index")
    }

    /// Reduces `order_id`'s qty by `delta`. Caller guarantees
    /// `delta < current qty`, so the order never leaves this call at
    /// `qty <= 0`.
    pub fn decrement_qty(&mut self, order_id: &str, delta: i64) {
        let order = self
            .orders
            .get_mut(order_id)
            .expect("dangling order id in book index");
        assert!(
            delta < order.qty,
            "decrement_qty delta must leave a positive remainder"
        );
        order.qty -= delta;
    }

    /// Inserts a new resting order at the tail of its price level.
    pub fn insert(&mut self, order: Order) {
        let order_id = order.order_id.clone();
        match order.side {
            Side::Buy => self
                .bids
                .entry(Reverse(order.price))
                .or_default()
                .push_back(order_id.clone()),
            Side::Sell => self
                .asks
                .entry(order.price)
                .or_default()
                .push_back(order_id.clone()),
        }
        self.orders.insert(order_id, order);
    }

    /// Panics on an unknown order-id: a dangling index entry is engine
    /// state corruption, not a recoverable condition.
    pub fn lookup(&self, order_id: &str) -> &Order {
        self.orders
            .get(order_id)
            .expect("dangling order id in book index")
    }

    /// Non-panicking lookup, for callers (e.g. the Redis mirror) who only
    /// want to know whether an order is still resting.
    pub fn try_lookup(&self, order_id: &str) -> Option<&Order> {
        self.orders.get(order_id)
    }

    /// Up to `depth` distinct price levels from the head of `side`'s book,
    /// with quantities aggregated per level.
    pub fn snapshot(&self, side: Side, depth: usize) -> Vec<PriceLevel> {
        match side {
            Side::Buy => self
                .bids
                .iter()
                .take(depth)
                .map(|(Reverse(price), queue)| PriceLevel {
                    price: *price,
                    qty: queue.iter().map(|id| self.orders[id].qty).sum(),
                })
                .collect(),
            Side::Sell => self
                .asks
                .iter()
                .take(depth)
                .map(|(price, queue)| PriceLevel {
                    price: *price,
                    qty: queue.iter().map(|id| self.orders[id].qty).sum(),
                })
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(id: &str, side: Side, price: i64, qty: i64) -> Order {
        Order {
            order_id: id.to_string(),
            user_id: 1,
            side,
            price,
            qty,
            timestamp: 0,
        }
    }

    #[test]
    fn test_insert_and_peek_best_bid_is_highest_price() {
        let mut book = OrderBook::new();
        book.insert(order("a", Side::Buy, 95, 10));
        book.insert(order("b", Side::Buy, 100, 10));

        let (id, price) = book.peek_best(Side::Buy).unwrap();
        assert_eq!(id, "b");
        assert_eq!(price, 100);
    }

    #[test]
    fn test_insert_and_peek_best_ask_is_lowest_price() {
        let mut book = OrderBook::new();
        book.insert(order("a", Side::Sell, 105, 10));
        book.insert(order("b", Side::Sell, 100, 10));

        let (id, price) = book.peek_best(Side::Sell).unwrap();
        assert_eq!(id, "b");
        assert_eq!(price, 100);
    }

    #[test]
    fn test_fifo_within_price_level() {
        let mut book = OrderBook::new();
        book.insert(order("first", Side::Sell, 100, 5));
        book.insert(order("second", Side::Sell, 100, 5));

        let (id, _) = book.peek_best(Side::Sell).unwrap();
        assert_eq!(id, "first");

        book.pop_best(Side::Sell);
        let (id, _) = book.peek_best(Side::Sell).unwrap();
        assert_eq!(id, "second");
    }

    #[test]
    fn test_pop_best_removes_from_both_structures() {
        let mut book = OrderBook::new();
        book.insert(order("a", Side::Buy, 100, 10));

        let popped = book.pop_best(Side::Buy);
        assert_eq!(popped.order_id, "a");
        assert!(book.try_lookup("a").is_none());
        assert!(book.is_empty());
    }

    #[test]
    fn test_decrement_qty_leaves_remainder() {
        let mut book = OrderBook::new();
        book.insert(order("a", Side::Buy, 100, 10));
        book.decrement_qty("a", 4);
        assert_eq!(book.lookup("a").qty, 6);
    }

    #[test]
    #[should_panic(expected = "dangling order id")]
    fn test_lookup_unknown_order_panics() {
        let book = OrderBook::new();
        book.lookup("missing");
    }

    #[test]
    fn test_snapshot_aggregates_quantity_per_level() {
        let mut book = OrderBook::new();
        book.insert(order("a", Side::Sell, 100, 5));
        book.insert(order("b", Side::Sell, 100, 3));
        book.insert(order("c", Side::Sell, 101, 7));

        let levels = book.snapshot(Side::Sell, 10);
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[0], PriceLevel { price: 100, qty: 8 });
        assert_eq!(levels[1], PriceLevel { price: 101, qty: 7 });
    }

    #[test]
    fn test_snapshot_respects_depth() {
        let mut book = OrderBook::new();
        for price in 100..110 {
            book.insert(order(&format!("o{}", price), Side::Sell, price, 1));
        }
        assert_eq!(book.snapshot(Side::Sell, 3).len(), 3);
    }
}
