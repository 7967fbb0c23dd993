/* src/lib.rs */

//!
//! A typed, cached key-value preferences store with change notification.
//!
//! The crate is layered, leaves first:
//!
//! - **settings**: the synchronous key-value backend ([`Settings`]), with
//!   in-memory and JSON-file implementations.
//! - **handlers** / **serialization**: how primitives and structured values
//!   map onto backend slots.
//! - **validation**: key and value rules checked before any I/O.
//! - **cache**: a bounded LRU cache of decoded values.
//! - **store**: [`CachedPreferencesStore`], cache-first reads and
//!   write-through writes.
//! - **notifier** / **observer**: a multi-subscriber event bus and per-key
//!   value streams built on it.
//! - **reactive**: [`ReactiveDataStore`], which classifies every mutation
//!   into a [`ChangeEvent`] and publishes it.
//! - **repository**: generic and user-facing preference repositories.
//! - **config** / **factory**: configuration loading and assembly.
//!
//! ## Feature Flags
//!
//! - `full`: Enables all features.
//! - `file`: [`FileSettings`], a JSON-file backend (default).
//! - `toml`: TOML config files and the TOML serialization strategy.
//!
//! ## Basic Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use reactive_prefs::{DataStoreFactory, MemorySettings};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = DataStoreFactory::new()
//!     .settings(Arc::new(MemorySettings::new()))
//!     .build()?;
//!
//! store.put_value("dark_theme", true).await?;
//! assert!(store.get_value("dark_theme", false).await?);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod event;
pub mod factory;
pub mod handlers;
pub mod notifier;
pub mod observer;
pub mod reactive;
pub mod repository;
pub mod serialization;
pub mod settings;
pub mod store;
pub mod validation;
pub mod value;

pub use cache::{CacheError, CacheManager, CachedValue, EvictionPolicy, LruCacheManager};
pub use config::{ConfigError, DataStoreConfig};
pub use error::{Result, StoreError};
pub use event::{ChangeEvent, WILDCARD_KEY};
pub use factory::{BuildError, DataStoreFactory};
pub use handlers::PrimitiveValue;
pub use notifier::{ChangeNotifier, NotifierConfig, OverflowPolicy, Subscription};
pub use observer::ValueObserver;
pub use reactive::ReactiveDataStore;
pub use repository::{
	DarkThemeConfig, PreferenceFlowOperators, PreferencesRepository, ThemeBrand, UserData,
	UserPreferences, UserPreferencesRepository,
};
pub use serialization::{JsonSerialization, Serialization, SerializationStrategy};
pub use settings::{MemorySettings, Settings, SettingsError};
pub use store::{CachedPreferencesStore, Dispatch};
pub use validation::{DefaultValidator, PreferencesValidator};
pub use value::{PrefValue, ValueKind};

#[cfg(feature = "file")]
pub use settings::FileSettings;

#[cfg(feature = "toml")]
pub use serialization::TomlSerialization;
