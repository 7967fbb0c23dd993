/* src/store/write.rs */

use serde::Serialize;

use super::CachedPreferencesStore;
use crate::cache::CachedValue;
use crate::error::Result;
use crate::handlers::PrimitiveValue;
use crate::serialization::SerializationStrategy;
use crate::value::PrefValue;

impl CachedPreferencesStore {
	/// Writes a primitive value to the backend, then to the cache.
	///
	/// A cache fault after a successful backend write is logged and the
	/// entry evicted; the write still succeeds.
	pub async fn put_value<T: PrimitiveValue>(&self, key: &str, value: T) -> Result<()> {
		self.validator.validate_key(key)?;
		let stored = value.to_value();
		self.validator.validate_value(&stored)?;

		let owned = key.to_string();
		self.dispatch
			.run(&self.settings, move |settings| T::write(settings, &owned, &value))
			.await?;

		self.cache_put(key, CachedValue::Primitive(stored));
		Ok(())
	}

	/// Encodes `value` with the store's serialization strategy and writes it.
	pub async fn put_serializable_value<T>(&self, key: &str, value: &T) -> Result<()>
	where
		T: Serialize + Clone + Send + Sync + 'static,
	{
		let strategy = self.serialization;
		self.write_serializable(key, value, &strategy).await.map(|_| ())
	}

	/// Encodes `value` with `strategy` and writes it.
	pub async fn put_serializable_value_with<T, S>(&self, key: &str, value: &T, strategy: &S) -> Result<()>
	where
		T: Serialize + Clone + Send + Sync + 'static,
		S: SerializationStrategy,
	{
		self.write_serializable(key, value, strategy).await.map(|_| ())
	}

	/// Returns the encoded form that was stored.
	pub(crate) async fn write_serializable<T, S>(&self, key: &str, value: &T, strategy: &S) -> Result<String>
	where
		T: Serialize + Clone + Send + Sync + 'static,
		S: SerializationStrategy,
	{
		self.validator.validate_key(key)?;
		let encoded = strategy.serialize(value)?;
		self.validator
			.validate_value(&PrefValue::Serialized(encoded.clone()))?;

		let owned = key.to_string();
		let payload = encoded.clone();
		self.dispatch
			.run(&self.settings, move |settings| settings.put_string(&owned, &payload))
			.await?;

		self.cache_put(key, CachedValue::object(value.clone()));
		Ok(encoded)
	}

	/// Removes `key` from the backend and the cache.
	///
	/// The two are not rolled back together: a cache fault after the
	/// backend removal is logged only.
	pub async fn remove_value(&self, key: &str) -> Result<()> {
		self.validator.validate_key(key)?;

		let owned = key.to_string();
		self.dispatch
			.run(&self.settings, move |settings| settings.remove(&owned))
			.await?;

		self.cache_remove(key);
		Ok(())
	}

	/// Removes every key from the backend and empties the cache.
	pub async fn clear_all(&self) -> Result<()> {
		self.dispatch.run(&self.settings, |settings| settings.clear()).await?;

		if let Err(e) = self.cache.clear() {
			tracing::warn!("Cache clear failed: {}", e);
		}
		Ok(())
	}

	/// Drops the cached entry for `key`. The backend is untouched.
	pub fn invalidate_cache(&self, key: &str) -> Result<()> {
		self.validator.validate_key(key)?;
		self.cache.remove(key)?;
		Ok(())
	}

	/// Empties the cache. The backend is untouched.
	pub fn invalidate_all_cache(&self) -> Result<()> {
		self.cache.clear()?;
		Ok(())
	}
}
