//! Storage backend selection for the matching engine.

mod memory;
mod redis;
mod traits;

pub use memory::InMemoryStore;
pub use redis::RedisStore;
pub use traits::{MatchingStore, StoreError, StoreResult};

use tracing::info;

use config::OrderbookStoreConfig;

use crate::engine::MatchingEngine;

pub async fn create_store(
    config: &OrderbookStoreConfig,
    engine: MatchingEngine,
) -> StoreResult<Box<dyn MatchingStore>> {
    match config.store_type.as_str() {
        "redis" => {
            let redis_config = config
                .redis
                .as_ref()
                .expect("validated config guarantees redis settings when store_type is redis");
            info!("creating redis-backed matching store");
            let store = RedisStore::new(engine, redis_config).await?;
            Ok(Box::new(store))
        }
        _ => {
            info!("creating in-memory matching store");
            Ok(Box::new(InMemoryStore::new(engine)))
        }
    }
}
