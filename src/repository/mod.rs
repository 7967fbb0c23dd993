/* src/repository/mod.rs */

//!
//! Caller-facing repositories over a [`ReactiveDataStore`].
//!
//! - [`PreferencesRepository`] - generic keyed preferences
//! - [`PreferenceFlowOperators`] - combinators over preference streams
//! - [`UserPreferences`] - theme, dark mode and dynamic color settings

mod model;
mod operators;
mod user;

pub use model::{DarkThemeConfig, ThemeBrand, UserData};
pub use operators::PreferenceFlowOperators;
pub use user::{
	DARK_THEME_CONFIG_KEY, DYNAMIC_COLOR_KEY, THEME_BRAND_KEY, UserPreferences,
	UserPreferencesRepository,
};

use std::collections::BTreeSet;

use futures_util::stream::BoxStream;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::event::ChangeEvent;
use crate::handlers::PrimitiveValue;
use crate::reactive::ReactiveDataStore;

/// Generic preferences API. Cheap to clone.
#[derive(Debug, Clone)]
pub struct PreferencesRepository {
	store: ReactiveDataStore,
}

impl PreferencesRepository {
	pub fn new(store: ReactiveDataStore) -> Self {
		Self { store }
	}

	pub fn data_store(&self) -> &ReactiveDataStore {
		&self.store
	}

	pub async fn save_preference<T: PrimitiveValue>(&self, key: &str, value: T) -> Result<()> {
		self.store.put_value(key, value).await
	}

	pub async fn get_preference<T: PrimitiveValue>(&self, key: &str, default: T) -> Result<T> {
		self.store.get_value(key, default).await
	}

	pub async fn save_serializable_preference<T>(&self, key: &str, value: &T) -> Result<()>
	where
		T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
	{
		self.store.put_serializable_value(key, value).await
	}

	pub async fn get_serializable_preference<T>(&self, key: &str, default: T) -> Result<T>
	where
		T: DeserializeOwned + Clone + Send + Sync + 'static,
	{
		self.store.get_serializable_value(key, default).await
	}

	pub async fn remove_preference(&self, key: &str) -> Result<()> {
		self.store.remove_value(key).await
	}

	pub async fn clear_all_preferences(&self) -> Result<()> {
		self.store.clear_all().await
	}

	/// Any error reads as absent.
	pub async fn has_preference(&self, key: &str) -> bool {
		self.store.has_key(key).await.unwrap_or(false)
	}

	pub fn observe_preference<T: PrimitiveValue>(&self, key: &str, default: T) -> BoxStream<'static, T> {
		self.store.observe_value(key, default)
	}

	pub fn observe_serializable_preference<T>(&self, key: &str, default: T) -> BoxStream<'static, T>
	where
		T: DeserializeOwned + Clone + PartialEq + Send + Sync + 'static,
	{
		self.store.observe_serializable_value(key, default)
	}

	pub fn observe_all_keys(&self) -> BoxStream<'static, BTreeSet<String>> {
		self.store.observe_keys()
	}

	pub fn observe_preference_count(&self) -> BoxStream<'static, usize> {
		self.store.observe_size()
	}

	pub fn observe_preference_changes(&self) -> BoxStream<'static, ChangeEvent> {
		self.store.observe_changes()
	}

	pub fn observe_key_preference_changes(&self, key: &str) -> BoxStream<'static, ChangeEvent> {
		self.store.observe_key_changes(key)
	}
}

impl From<ReactiveDataStore> for PreferencesRepository {
	fn from(store: ReactiveDataStore) -> Self {
		Self::new(store)
	}
}
