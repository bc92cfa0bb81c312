//! Per-symbol sequence allocation.
//!
//! Four counters per symbol: `order_seq` (0-99999), `buy_seq`, `sell_seq`,
//! `trade_seq` (0-99 each). The bounded ranges keep composite ids within a
//! soft operating limit (fewer than 100,000 orders, or 100 trades, per
//! millisecond) - they are not uniqueness guarantees on their own.

use common::Side;

const ORDER_SEQ_CAP: u32 = 100_000;
const SIDE_SEQ_CAP: u32 = 100;
const TRADE_SEQ_CAP: u32 = 100;

#[derive(Debug, Default)]
pub struct SequenceAllocator {
    order_seq: u32,
    buy_seq: u32,
    sell_seq: u32,
    trade_seq: u32,
}

impl SequenceAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_order_seq(&mut self) -> u32 {
        self.order_seq = (self.order_seq + 1) % ORDER_SEQ_CAP;
        self.order_seq
    }

    pub fn next_side_seq(&mut self, side: Side) -> u32 {
        let counter = match side {
            Side::Buy => &mut self.buy_seq,
            Side::Sell => &mut self.sell_seq,
        };
        *counter = (*counter + 1) % SIDE_SEQ_CAP;
        *counter
    }

    pub fn next_trade_seq(&mut self) -> u32 {
        self.trade_seq = (self.trade_seq + 1) % TRADE_SEQ_CAP;
        self.trade_seq
    }

    pub fn order_seq(&self) -> u32 {
        self.order_seq
    }

    pub fn buy_seq(&self) -> u32 {
        self.buy_seq
    }

    pub fn sell_seq(&self) -> u32 {
        self.sell_seq
    }

    pub fn trade_seq(&self) -> u32 {
        self.trade_seq
    }
}

/// `"{timestamp_ms}-{order_seq:05d}"`
pub fn format_order_id(timestamp_ms: i64, order_seq: u32) -> String {
    format!("{}-{:05}", timestamp_ms, order_seq)
}

/// `timestamp_ms * 100 + trade_seq`, rendered as a decimal string.
pub fn format_trade_id(timestamp_ms: i64, trade_seq: u32) -> String {
    (timestamp_ms * 100 + trade_seq as i64).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_seq_wraps_at_cap() {
        let mut seq = SequenceAllocator::new();
        seq.order_seq = ORDER_SEQ_CAP - 1;
        assert_eq!(seq.next_order_seq(), 0);
    }

    #[test]
    fn test_side_seq_independent_per_side() {
        let mut seq = SequenceAllocator::new();
        assert_eq!(seq.next_side_seq(Side::Buy), 1);
        assert_eq!(seq.next_side_seq(Side::Buy), 2);
        assert_eq!(seq.next_side_seq(Side::Sell), 1);
    }

    #[test]
    fn test_order_id_format() {
        assert_eq!(format_order_id(1_700_000_000_123, 42), "1700000000123-00042");
    }

    #[test]
    fn test_trade_id_format() {
        assert_eq!(format_trade_id(1_700_000_000_123, 7), "170000000012307");
    }
}
