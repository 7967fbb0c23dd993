/* src/store/mod.rs */

//!
//! The cached preferences store.
//!
//! Every operation validates first, then consults the cache, then the
//! backend. Writes go to the backend and then through to the cache.

mod dispatch;
mod read;
mod write;

pub use dispatch::Dispatch;

use std::sync::Arc;

use crate::cache::{CacheManager, CachedValue, LruCacheManager};
use crate::serialization::Serialization;
use crate::settings::Settings;
use crate::validation::{DefaultValidator, PreferencesValidator};

/// Typed preferences on top of a [`Settings`] backend with a bounded cache.
pub struct CachedPreferencesStore {
	pub(crate) settings: Arc<dyn Settings>,
	pub(crate) dispatch: Dispatch,
	pub(crate) validator: Arc<dyn PreferencesValidator>,
	pub(crate) serialization: Serialization,
	pub(crate) cache: Arc<dyn CacheManager<CachedValue>>,
}

impl CachedPreferencesStore {
	/// Creates a store with the default validator, JSON serialization, an
	/// LRU cache of 200 entries and inline dispatch.
	pub fn new(settings: Arc<dyn Settings>) -> Self {
		Self {
			settings,
			dispatch: Dispatch::default(),
			validator: Arc::new(DefaultValidator),
			serialization: Serialization::default(),
			cache: Arc::new(LruCacheManager::<CachedValue>::default()),
		}
	}

	pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
		self.dispatch = dispatch;
		self
	}

	pub fn with_validator(mut self, validator: Arc<dyn PreferencesValidator>) -> Self {
		self.validator = validator;
		self
	}

	pub fn with_serialization(mut self, serialization: Serialization) -> Self {
		self.serialization = serialization;
		self
	}

	pub fn with_cache(mut self, cache: Arc<dyn CacheManager<CachedValue>>) -> Self {
		self.cache = cache;
		self
	}

	pub fn serialization(&self) -> &Serialization {
		&self.serialization
	}

	/// Caches `value`, degrading a cache fault to a best-effort eviction.
	fn cache_put(&self, key: &str, value: CachedValue) {
		if let Err(e) = self.cache.put(key, value) {
			tracing::warn!("Cache write failed for {}, evicting: {}", key, e);
			if let Err(e) = self.cache.remove(key) {
				tracing::warn!("Cache eviction failed for {}: {}", key, e);
			}
		}
	}

	/// A cache fault reads as a miss.
	fn cache_get(&self, key: &str) -> Option<CachedValue> {
		match self.cache.get(key) {
			Ok(hit) => hit,
			Err(e) => {
				tracing::warn!("Cache read failed for {}, falling back to backend: {}", key, e);
				None
			}
		}
	}

	fn cache_remove(&self, key: &str) {
		if let Err(e) = self.cache.remove(key) {
			tracing::warn!("Cache removal failed for {}: {}", key, e);
		}
	}
}

impl std::fmt::Debug for CachedPreferencesStore {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CachedPreferencesStore")
			.field("dispatch", &self.dispatch)
			.field("serialization", &self.serialization)
			.finish_non_exhaustive()
	}
}
