/* src/cache/lru.rs */

use std::sync::{Mutex, MutexGuard};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{CacheError, CacheManager};

/// Default maximum number of cached entries.
pub const DEFAULT_CACHE_SIZE: usize = 200;

/// Which entry is evicted when the cache is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionPolicy {
	/// Evict the entry inserted first. Reads and overwrites do not reorder.
	#[default]
	InsertionOrder,
	/// Evict the entry touched least recently; reads and writes reorder.
	AccessOrder,
}

/// A bounded cache evicting one entry per insertion beyond `max_size`.
pub struct LruCacheManager<V> {
	entries: Mutex<IndexMap<String, V>>,
	max_size: usize,
	policy: EvictionPolicy,
}

impl<V> LruCacheManager<V> {
	pub fn new(max_size: usize) -> Self {
		Self::with_policy(max_size, EvictionPolicy::default())
	}

	pub fn with_policy(max_size: usize, policy: EvictionPolicy) -> Self {
		Self {
			entries: Mutex::new(IndexMap::with_capacity(max_size.min(1024))),
			max_size: max_size.max(1),
			policy,
		}
	}

	pub fn max_size(&self) -> usize {
		self.max_size
	}

	pub fn policy(&self) -> EvictionPolicy {
		self.policy
	}

	fn lock(&self) -> Result<MutexGuard<'_, IndexMap<String, V>>, CacheError> {
		self.entries.lock().map_err(|_| CacheError::Poisoned)
	}
}

impl<V> Default for LruCacheManager<V> {
	fn default() -> Self {
		Self::new(DEFAULT_CACHE_SIZE)
	}
}

impl<V> CacheManager<V> for LruCacheManager<V>
where
	V: Clone + Send,
{
	fn put(&self, key: &str, value: V) -> Result<(), CacheError> {
		let mut entries = self.lock()?;
		match entries.get_index_of(key) {
			Some(index) => {
				entries[index] = value;
				if self.policy == EvictionPolicy::AccessOrder {
					let last = entries.len() - 1;
					entries.move_index(index, last);
				}
			}
			None => {
				entries.insert(key.to_string(), value);
				if entries.len() > self.max_size
					&& let Some((evicted, _)) = entries.shift_remove_index(0)
				{
					tracing::trace!("Evicted cache entry: {}", evicted);
				}
			}
		}
		Ok(())
	}

	fn get(&self, key: &str) -> Result<Option<V>, CacheError> {
		let mut entries = self.lock()?;
		let Some(index) = entries.get_index_of(key) else {
			return Ok(None);
		};
		if self.policy == EvictionPolicy::AccessOrder {
			let last = entries.len() - 1;
			entries.move_index(index, last);
			return Ok(entries.get_index(last).map(|(_, v)| v.clone()));
		}
		Ok(entries.get_index(index).map(|(_, v)| v.clone()))
	}

	fn remove(&self, key: &str) -> Result<Option<V>, CacheError> {
		Ok(self.lock()?.shift_remove(key))
	}

	fn clear(&self) -> Result<(), CacheError> {
		self.lock()?.clear();
		Ok(())
	}

	fn size(&self) -> Result<usize, CacheError> {
		Ok(self.lock()?.len())
	}

	fn contains_key(&self, key: &str) -> Result<bool, CacheError> {
		Ok(self.lock()?.contains_key(key))
	}
}
