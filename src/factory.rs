/* src/factory.rs */

//!
//! Assembles a store from its parts.

use std::sync::Arc;

use validator::Validate;

use crate::cache::{CacheManager, CachedValue, EvictionPolicy, LruCacheManager};
use crate::config::DataStoreConfig;
use crate::notifier::ChangeNotifier;
use crate::reactive::ReactiveDataStore;
use crate::repository::{PreferencesRepository, UserPreferences};
use crate::serialization::Serialization;
use crate::settings::Settings;
use crate::store::{CachedPreferencesStore, Dispatch};
use crate::validation::{DefaultValidator, PreferencesValidator};

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
	#[error("{0} is required")]
	Missing(&'static str),

	#[error("invalid config: {0}")]
	Config(#[from] validator::ValidationErrors),
}

/// Builder for [`ReactiveDataStore`] and the repositories on top of it.
///
/// Only the settings backend is required. Explicit setters win over the
/// values in [`config`](Self::config).
#[derive(Default)]
pub struct DataStoreFactory {
	settings: Option<Arc<dyn Settings>>,
	dispatch: Dispatch,
	config: DataStoreConfig,
	validator: Option<Arc<dyn PreferencesValidator>>,
	serialization: Serialization,
	cache: Option<Arc<dyn CacheManager<CachedValue>>>,
	notifier: Option<ChangeNotifier>,
}

impl DataStoreFactory {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn settings(mut self, settings: Arc<dyn Settings>) -> Self {
		self.settings = Some(settings);
		self
	}

	pub fn dispatch(mut self, dispatch: Dispatch) -> Self {
		self.dispatch = dispatch;
		self
	}

	pub fn config(mut self, config: DataStoreConfig) -> Self {
		self.config = config;
		self
	}

	pub fn cache_size(mut self, size: usize) -> Self {
		self.config.cache_size = size;
		self
	}

	pub fn eviction(mut self, policy: EvictionPolicy) -> Self {
		self.config.eviction = policy;
		self
	}

	pub fn validator(mut self, validator: Arc<dyn PreferencesValidator>) -> Self {
		self.validator = Some(validator);
		self
	}

	pub fn serialization(mut self, serialization: Serialization) -> Self {
		self.serialization = serialization;
		self
	}

	/// Replaces the LRU cache built from the config.
	pub fn cache(mut self, cache: Arc<dyn CacheManager<CachedValue>>) -> Self {
		self.cache = Some(cache);
		self
	}

	/// Shares an existing notifier instead of creating one from the config.
	pub fn change_notifier(mut self, notifier: ChangeNotifier) -> Self {
		self.notifier = Some(notifier);
		self
	}

	pub fn build(self) -> Result<ReactiveDataStore, BuildError> {
		let settings = self.settings.ok_or(BuildError::Missing("settings"))?;
		self.config.validate()?;

		let cache = self.cache.unwrap_or_else(|| {
			Arc::new(LruCacheManager::<CachedValue>::with_policy(
				self.config.cache_size,
				self.config.eviction,
			))
		});
		let validator = self
			.validator
			.unwrap_or_else(|| Arc::new(DefaultValidator));
		let notifier = self
			.notifier
			.unwrap_or_else(|| ChangeNotifier::new(self.config.notifier.clone()));

		let store = CachedPreferencesStore::new(settings)
			.with_dispatch(self.dispatch)
			.with_validator(validator)
			.with_serialization(self.serialization)
			.with_cache(cache);

		tracing::debug!(
			"Built data store: cache_size={}, eviction={:?}",
			self.config.cache_size,
			self.config.eviction
		);
		Ok(ReactiveDataStore::new(store, notifier))
	}

	pub fn build_repository(self) -> Result<PreferencesRepository, BuildError> {
		Ok(PreferencesRepository::new(self.build()?))
	}

	pub fn build_user_preferences(self) -> Result<UserPreferences, BuildError> {
		Ok(UserPreferences::new(self.build_repository()?))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::settings::MemorySettings;

	#[test]
	fn settings_are_required() {
		let err = DataStoreFactory::new().build().unwrap_err();
		assert!(matches!(err, BuildError::Missing("settings")));
	}

	#[test]
	fn invalid_config_is_rejected() {
		let err = DataStoreFactory::new()
			.settings(Arc::new(MemorySettings::new()))
			.cache_size(0)
			.build()
			.unwrap_err();
		assert!(matches!(err, BuildError::Config(_)));
	}

	#[tokio::test]
	async fn cache_size_applies() -> Result<(), Box<dyn std::error::Error>> {
		let store = DataStoreFactory::new()
			.settings(Arc::new(MemorySettings::new()))
			.cache_size(2)
			.build()?;
		for (i, key) in ["a", "b", "c"].into_iter().enumerate() {
			store.put_value(key, i as i32).await?;
		}
		assert_eq!(store.cache_size()?, 2);
		assert_eq!(store.size().await?, 3);
		Ok(())
	}
}
