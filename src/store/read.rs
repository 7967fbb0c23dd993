/* src/store/read.rs */

use std::collections::BTreeSet;

use serde::de::DeserializeOwned;

use super::CachedPreferencesStore;
use crate::cache::CachedValue;
use crate::error::Result;
use crate::handlers::PrimitiveValue;
use crate::serialization::SerializationStrategy;
use crate::value::PrefValue;

impl CachedPreferencesStore {
	/// Reads a primitive value, returning `default` if the key is absent.
	///
	/// A cache hit of the requested kind returns without touching the
	/// backend. Only values present in the backend are cached, so a later
	/// read with another default is not answered with this one.
	pub async fn get_value<T: PrimitiveValue>(&self, key: &str, default: T) -> Result<T> {
		self.validator.validate_key(key)?;

		if let Some(hit) = self.cache_get(key) {
			match hit.as_primitive().and_then(T::from_value) {
				Some(value) => return Ok(value),
				None => tracing::debug!("Cached entry for {} is not {}, reading backend", key, T::KIND),
			}
		}

		let owned = key.to_string();
		let fallback = default.clone();
		let stored = self
			.dispatch
			.run(&self.settings, move |settings| {
				if settings.has_key(&owned)? {
					T::read(settings, &owned, fallback).map(Some)
				} else {
					Ok(None)
				}
			})
			.await?;

		match stored {
			Some(value) => {
				self.cache_put(key, CachedValue::Primitive(value.to_value()));
				Ok(value)
			}
			None => Ok(default),
		}
	}

	/// Reads a structured value with the store's serialization strategy.
	pub async fn get_serializable_value<T>(&self, key: &str, default: T) -> Result<T>
	where
		T: DeserializeOwned + Clone + Send + Sync + 'static,
	{
		let strategy = self.serialization;
		self.get_serializable_value_with(key, default, &strategy).await
	}

	/// Reads a structured value decoded by `strategy`.
	///
	/// Absent keys, empty strings and undecodable data all yield `default`.
	/// Undecodable data is never cached.
	pub async fn get_serializable_value_with<T, S>(&self, key: &str, default: T, strategy: &S) -> Result<T>
	where
		T: DeserializeOwned + Clone + Send + Sync + 'static,
		S: SerializationStrategy,
	{
		self.validator.validate_key(key)?;

		if let Some(hit) = self.cache_get(key) {
			match hit.downcast::<T>() {
				Some(value) => return Ok(value),
				None => tracing::debug!("Cached entry for {} has another type, reading backend", key),
			}
		}

		let Some(encoded) = self.read_string(key).await? else {
			return Ok(default);
		};
		if encoded.is_empty() {
			return Ok(default);
		}

		match strategy.deserialize::<T>(&encoded) {
			Ok(value) => {
				self.cache_put(key, CachedValue::object(value.clone()));
				Ok(value)
			}
			Err(e) => {
				tracing::warn!("Corrupted data for {}, returning default: {}", key, e);
				Ok(default)
			}
		}
	}

	/// True if the key is cached or present in the backend.
	pub async fn has_key(&self, key: &str) -> Result<bool> {
		self.validator.validate_key(key)?;

		match self.cache.contains_key(key) {
			Ok(true) => return Ok(true),
			Ok(false) => {}
			Err(e) => tracing::warn!("Cache lookup failed for {}: {}", key, e),
		}
		let owned = key.to_string();
		self.dispatch.run(&self.settings, move |settings| settings.has_key(&owned)).await
	}

	pub async fn all_keys(&self) -> Result<BTreeSet<String>> {
		self.dispatch.run(&self.settings, |settings| settings.keys()).await
	}

	/// Number of keys in the backend.
	pub async fn size(&self) -> Result<usize> {
		self.dispatch.run(&self.settings, |settings| settings.size()).await
	}

	/// Number of cached entries.
	pub fn cache_size(&self) -> Result<usize> {
		Ok(self.cache.size()?)
	}

	/// Best-effort current value of `key` in whatever kind it is held.
	///
	/// Cached primitives are returned as is; otherwise the string slot is
	/// read. Any failure, including a non-string backend value that is not
	/// cached, yields `None`.
	pub(crate) async fn peek_value(&self, key: &str) -> Option<PrefValue> {
		let structured = match self.cache_get(key) {
			Some(CachedValue::Primitive(value)) => return Some(value),
			Some(CachedValue::Object(_)) => true,
			None => false,
		};
		match self.read_string(key).await {
			Ok(Some(s)) if structured => Some(PrefValue::Serialized(s)),
			Ok(Some(s)) => Some(PrefValue::Str(s)),
			Ok(None) => None,
			Err(e) => {
				tracing::debug!("Could not read previous value of {}: {}", key, e);
				None
			}
		}
	}

	/// The string slot of `key`, or `None` if the key is absent.
	async fn read_string(&self, key: &str) -> Result<Option<String>> {
		let owned = key.to_string();
		self.dispatch
			.run(&self.settings, move |settings| {
				if settings.has_key(&owned)? {
					settings.get_string(&owned, "").map(Some)
				} else {
					Ok(None)
				}
			})
			.await
	}
}
