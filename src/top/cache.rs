use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use super::TopData;

struct CacheSlot {
	data: Arc<TopData>,
	stored_at: Instant,
}

/// Single process-wide slot holding the last aggregation.
///
/// There is no per-user keying and no single-flight: concurrent misses each
/// aggregate and the last `set` wins.
pub struct ResponseCache {
	ttl: Duration,
	slot: RwLock<Option<CacheSlot>>,
}

impl ResponseCache {
	pub fn new(ttl: Duration) -> Self {
		Self {
			ttl,
			slot: RwLock::new(None),
		}
	}

	pub async fn get(&self) -> Option<Arc<TopData>> {
		let slot = self.slot.read().await;
		slot.as_ref()
			.filter(|s| s.stored_at.elapsed() < self.ttl)
			.map(|s| Arc::clone(&s.data))
	}

	pub async fn set(&self, data: TopData) -> Arc<TopData> {
		let data = Arc::new(data);
		*self.slot.write().await = Some(CacheSlot {
			data: Arc::clone(&data),
			stored_at: Instant::now(),
		});
		data
	}
}
