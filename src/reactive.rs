/* src/reactive.rs */

//!
//! Change-aware store: every successful mutation publishes exactly one
//! [`ChangeEvent`], and values can be observed as streams.

use std::collections::BTreeSet;
use std::sync::Arc;

use futures_util::stream::BoxStream;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::event::ChangeEvent;
use crate::handlers::PrimitiveValue;
use crate::notifier::ChangeNotifier;
use crate::observer::{ValueObserver, distinct_until_changed};
use crate::serialization::SerializationStrategy;
use crate::store::CachedPreferencesStore;
use crate::value::PrefValue;

/// A [`CachedPreferencesStore`] that announces its mutations.
///
/// Cloning yields another handle to the same store and notifier.
#[derive(Debug, Clone)]
pub struct ReactiveDataStore {
	store: Arc<CachedPreferencesStore>,
	notifier: ChangeNotifier,
	observer: ValueObserver,
}

impl ReactiveDataStore {
	pub fn new(store: CachedPreferencesStore, notifier: ChangeNotifier) -> Self {
		Self {
			store: Arc::new(store),
			observer: ValueObserver::new(notifier.clone()),
			notifier,
		}
	}

	pub fn store(&self) -> &CachedPreferencesStore {
		&self.store
	}

	pub fn notifier(&self) -> &ChangeNotifier {
		&self.notifier
	}

	/// Writes a primitive and publishes `ValueAdded` or `ValueUpdated`.
	///
	/// The previous value is read before the write. That read is not atomic
	/// with the write, and any failure in it classifies the write as an add.
	pub async fn put_value<T: PrimitiveValue>(&self, key: &str, value: T) -> Result<()> {
		let old = self.previous_value(key, value.clone()).await;
		let new = value.to_value();
		self.store.put_value(key, value).await?;
		self.publish(key, old, new).await;
		Ok(())
	}

	pub async fn get_value<T: PrimitiveValue>(&self, key: &str, default: T) -> Result<T> {
		self.store.get_value(key, default).await
	}

	/// Writes a structured value with the store's serialization strategy.
	pub async fn put_serializable_value<T>(&self, key: &str, value: &T) -> Result<()>
	where
		T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
	{
		let strategy = *self.store.serialization();
		self.put_serializable_value_with(key, value, &strategy).await
	}

	pub async fn put_serializable_value_with<T, S>(&self, key: &str, value: &T, strategy: &S) -> Result<()>
	where
		T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
		S: SerializationStrategy,
	{
		let old = self.previous_serialized(key, value, strategy).await;
		let encoded = self.store.write_serializable(key, value, strategy).await?;
		self.publish(key, old, PrefValue::Serialized(encoded)).await;
		Ok(())
	}

	pub async fn get_serializable_value<T>(&self, key: &str, default: T) -> Result<T>
	where
		T: DeserializeOwned + Clone + Send + Sync + 'static,
	{
		self.store.get_serializable_value(key, default).await
	}

	pub async fn get_serializable_value_with<T, S>(&self, key: &str, default: T, strategy: &S) -> Result<T>
	where
		T: DeserializeOwned + Clone + Send + Sync + 'static,
		S: SerializationStrategy,
	{
		self.store.get_serializable_value_with(key, default, strategy).await
	}

	/// Removes `key` and publishes `ValueRemoved` with a best-effort old value.
	pub async fn remove_value(&self, key: &str) -> Result<()> {
		self.store.validator.validate_key(key)?;
		let old = self.store.peek_value(key).await;
		self.store.remove_value(key).await?;
		self.notifier.notify(ChangeEvent::removed(key, old)).await;
		Ok(())
	}

	/// Clears the store and publishes a single `StoreCleared`.
	pub async fn clear_all(&self) -> Result<()> {
		self.store.clear_all().await?;
		self.notifier.notify(ChangeEvent::cleared()).await;
		Ok(())
	}

	pub async fn has_key(&self, key: &str) -> Result<bool> {
		self.store.has_key(key).await
	}

	pub async fn all_keys(&self) -> Result<BTreeSet<String>> {
		self.store.all_keys().await
	}

	pub async fn size(&self) -> Result<usize> {
		self.store.size().await
	}

	pub fn invalidate_cache(&self, key: &str) -> Result<()> {
		self.store.invalidate_cache(key)
	}

	pub fn invalidate_all_cache(&self) -> Result<()> {
		self.store.invalidate_all_cache()
	}

	pub fn cache_size(&self) -> Result<usize> {
		self.store.cache_size()
	}

	/// Current value of `key`, then the new value after every change to it.
	/// Consecutive duplicates are suppressed.
	pub fn observe_value<T: PrimitiveValue>(&self, key: &str, default: T) -> BoxStream<'static, T> {
		let store = Arc::clone(&self.store);
		let owned = key.to_string();
		let fallback = default.clone();
		self.observer.create_distinct_value_flow(key, default, move || {
			let store = Arc::clone(&store);
			let key = owned.clone();
			let default = fallback.clone();
			async move { store.get_value(&key, default).await }
		})
	}

	/// Like [`observe_value`](Self::observe_value) for structured values.
	pub fn observe_serializable_value<T>(&self, key: &str, default: T) -> BoxStream<'static, T>
	where
		T: DeserializeOwned + Clone + PartialEq + Send + Sync + 'static,
	{
		let store = Arc::clone(&self.store);
		let owned = key.to_string();
		let fallback = default.clone();
		self.observer.create_distinct_value_flow(key, default, move || {
			let store = Arc::clone(&store);
			let key = owned.clone();
			let default = fallback.clone();
			async move { store.get_serializable_value(&key, default).await }
		})
	}

	/// The set of keys, then again after every change.
	pub fn observe_keys(&self) -> BoxStream<'static, BTreeSet<String>> {
		let store = Arc::clone(&self.store);
		self.observer.create_store_flow(BTreeSet::new(), move || {
			let store = Arc::clone(&store);
			async move { store.all_keys().await }
		})
	}

	/// The number of keys, emitted only when it changes.
	pub fn observe_size(&self) -> BoxStream<'static, usize> {
		let store = Arc::clone(&self.store);
		distinct_until_changed(self.observer.create_store_flow(0, move || {
			let store = Arc::clone(&store);
			async move { store.size().await }
		}))
	}

	pub fn observe_changes(&self) -> BoxStream<'static, ChangeEvent> {
		self.notifier.observe_changes()
	}

	pub fn observe_key_changes(&self, key: &str) -> BoxStream<'static, ChangeEvent> {
		self.notifier.observe_key_changes(key)
	}

	async fn previous_value<T: PrimitiveValue>(&self, key: &str, probe: T) -> Option<PrefValue> {
		if !self.store.has_key(key).await.unwrap_or(false) {
			return None;
		}
		match self.store.get_value(key, probe).await {
			Ok(old) => Some(old.to_value()),
			Err(e) => {
				tracing::debug!("Could not read previous value of {}: {}", key, e);
				None
			}
		}
	}

	async fn previous_serialized<T, S>(&self, key: &str, probe: &T, strategy: &S) -> Option<PrefValue>
	where
		T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
		S: SerializationStrategy,
	{
		if !self.store.has_key(key).await.unwrap_or(false) {
			return None;
		}
		let old = self
			.store
			.get_serializable_value_with(key, probe.clone(), strategy)
			.await
			.ok()?;
		strategy.serialize(&old).ok().map(PrefValue::Serialized)
	}

	async fn publish(&self, key: &str, old: Option<PrefValue>, new: PrefValue) {
		let event = match old {
			Some(old) => ChangeEvent::updated(key, Some(old), Some(new)),
			None => ChangeEvent::added(key, Some(new)),
		};
		self.notifier.notify(event).await;
	}
}
