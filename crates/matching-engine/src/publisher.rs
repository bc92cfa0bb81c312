//! Trade recording and throttled order-book snapshot publishing.
//!
//! Each symbol gets its own pair of broadcast channels, created lazily on
//! first use. Publishing with no subscribers is not an error - trades and
//! snapshots are fire-and-forget, matching the fact that matching itself
//! never depends on a subscriber being present.

use std::collections::HashMap;
use std::sync::Mutex;

use common::Symbol;
use tokio::sync::broadcast;

use crate::domain::{OrderBookSnapshot, PriceLevel, Trade};

const CHANNEL_CAPACITY: usize = 1024;

struct Channels {
    orderbook: broadcast::Sender<String>,
    trades: broadcast::Sender<String>,
}

impl Default for Channels {
    fn default() -> Self {
        Self {
            orderbook: broadcast::channel(CHANNEL_CAPACITY).0,
            trades: broadcast::channel(CHANNEL_CAPACITY).0,
        }
    }
}

#[derive(Default)]
pub struct Publisher {
    channels: Mutex<HashMap<Symbol, Channels>>,
}

impl Publisher {
    pub fn new() -> Self {
        Self::default()
    }

    fn channels_for(&self, symbol: &Symbol) -> (broadcast::Sender<String>, broadcast::Sender<String>) {
        let mut channels = self.channels.lock().expect("publisher lock poisoned");
        let entry = channels.entry(symbol.clone()).or_default();
        (entry.orderbook.clone(), entry.trades.clone())
    }

    pub fn subscribe_orderbook(&self, symbol: &Symbol) -> broadcast::Receiver<String> {
        self.channels_for(symbol).0.subscribe()
    }

    pub fn subscribe_trades(&self, symbol: &Symbol) -> broadcast::Receiver<String> {
        self.channels_for(symbol).1.subscribe()
    }

    /// `"{price},{qty},{timestamp}"`
    pub fn record_trade(&self, symbol: &Symbol, trade: &Trade) {
        let payload = format!("{},{},{}", trade.price, trade.qty, trade.timestamp);
        let _ = self.channels_for(symbol).1.send(payload);
    }

    /// `"bids\nasks"`, each side `price,qty|price,qty|...`
    pub fn publish_orderbook(&self, symbol: &Symbol, snapshot: &OrderBookSnapshot) {
        let payload = format!(
            "{}\n{}",
            render_side(&snapshot.bids),
            render_side(&snapshot.asks)
        );
        let _ = self.channels_for(symbol).0.send(payload);
    }
}

fn render_side(levels: &[PriceLevel]) -> String {
    levels
        .iter()
        .map(|level| format!("{},{}", level.price, level.qty))
        .collect::<Vec<_>>()
        .join("|")
}
