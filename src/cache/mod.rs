/* src/cache/mod.rs */

mod lru;

pub use lru::{DEFAULT_CACHE_SIZE, EvictionPolicy, LruCacheManager};

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::value::PrefValue;

#[derive(Debug, Clone, thiserror::Error)]
pub enum CacheError {
	/// A thread panicked while holding the cache lock.
	#[error("cache lock poisoned")]
	Poisoned,
	/// The cache implementation refused the operation.
	#[error("cache rejected operation for key: {key}")]
	Rejected { key: String },
}

/// A bounded key-value cache.
///
/// All operations are synchronous. Implementations guard their own state, so
/// one instance may be shared by every caller of a store.
pub trait CacheManager<V>: Send + Sync {
	fn put(&self, key: &str, value: V) -> Result<(), CacheError>;
	fn get(&self, key: &str) -> Result<Option<V>, CacheError>;
	fn remove(&self, key: &str) -> Result<Option<V>, CacheError>;
	fn clear(&self) -> Result<(), CacheError>;
	fn size(&self) -> Result<usize, CacheError>;
	fn contains_key(&self, key: &str) -> Result<bool, CacheError>;
}

/// A decoded value as held in the store's cache.
#[derive(Clone)]
pub enum CachedValue {
	Primitive(PrefValue),
	/// A deserialized structured value.
	Object(Arc<dyn Any + Send + Sync>),
}

impl CachedValue {
	pub fn object<T: Any + Send + Sync>(value: T) -> Self {
		Self::Object(Arc::new(value))
	}

	/// Returns the structured value if it is a `T`.
	pub fn downcast<T: Any + Send + Sync + Clone>(&self) -> Option<T> {
		match self {
			Self::Object(obj) => obj.downcast_ref::<T>().cloned(),
			Self::Primitive(_) => None,
		}
	}

	pub fn as_primitive(&self) -> Option<&PrefValue> {
		match self {
			Self::Primitive(v) => Some(v),
			Self::Object(_) => None,
		}
	}
}

impl fmt::Debug for CachedValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Primitive(v) => f.debug_tuple("Primitive").field(v).finish(),
			Self::Object(_) => f.write_str("Object(..)"),
		}
	}
}
