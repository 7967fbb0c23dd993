/* src/config/mod.rs */

//!
//! Store configuration, loadable from JSON or TOML and validated on load.
//!
//! ```json
//! {
//!   "cache_size": 200,
//!   "eviction": "insertion_order",
//!   "notifier": { "replay": 0, "extra_buffer_capacity": 64, "overflow": "drop_oldest" }
//! }
//! ```

mod format;

#[cfg(feature = "toml")]
pub use format::Toml;
pub use format::{AnyFormat, Format, Json};

use std::path::Path;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::cache::{DEFAULT_CACHE_SIZE, EvictionPolicy};
use crate::notifier::NotifierConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("parse error: {0}")]
	Parse(String),

	#[error("validation failed: {0}")]
	Validation(#[from] validator::ValidationErrors),

	#[error("io error: {0}")]
	Io(#[from] std::io::Error),

	#[error("no config format for extension: {0}")]
	UnknownFormat(String),
}

/// Tunables of a data store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DataStoreConfig {
	/// Maximum cached entries.
	#[validate(range(min = 1))]
	pub cache_size: usize,
	pub eviction: EvictionPolicy,
	#[validate(nested)]
	pub notifier: NotifierConfig,
}

impl Default for DataStoreConfig {
	fn default() -> Self {
		Self {
			cache_size: DEFAULT_CACHE_SIZE,
			eviction: EvictionPolicy::default(),
			notifier: NotifierConfig::default(),
		}
	}
}

impl DataStoreConfig {
	/// Parses `input` as `format` and validates the result.
	pub fn parse(input: &[u8], format: &impl Format) -> Result<Self, ConfigError> {
		let config: Self = format.parse(input)?;
		config.validate()?;
		Ok(config)
	}

	pub fn from_json(input: &str) -> Result<Self, ConfigError> {
		Self::parse(input.as_bytes(), &Json)
	}

	#[cfg(feature = "toml")]
	pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
		Self::parse(input.as_bytes(), &Toml)
	}

	/// Reads a config file, choosing the format by its extension.
	pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
		let format = AnyFormat::from_extension(ext).ok_or_else(|| ConfigError::UnknownFormat(ext.to_string()))?;

		let bytes = tokio::fs::read(path).await?;
		let config = Self::parse(&bytes, &format)?;
		tracing::debug!("Loaded data store config from {}", path.display());
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::notifier::OverflowPolicy;

	#[test]
	fn empty_object_uses_defaults() -> Result<(), ConfigError> {
		let config = DataStoreConfig::from_json("{}")?;
		assert_eq!(config, DataStoreConfig::default());
		Ok(())
	}

	#[test]
	fn partial_override() -> Result<(), ConfigError> {
		let config = DataStoreConfig::from_json(
			r#"{"cache_size": 16, "eviction": "access_order", "notifier": {"overflow": "block"}}"#,
		)?;
		assert_eq!(config.cache_size, 16);
		assert_eq!(config.eviction, EvictionPolicy::AccessOrder);
		assert_eq!(config.notifier.overflow, OverflowPolicy::Block);
		assert_eq!(config.notifier.publish_timeout_ms, 5_000);
		Ok(())
	}

	#[test]
	fn zero_cache_is_rejected() {
		let err = DataStoreConfig::from_json(r#"{"cache_size": 0}"#).unwrap_err();
		assert!(matches!(err, ConfigError::Validation(_)));
	}

	#[test]
	fn nested_notifier_is_validated() {
		let err = DataStoreConfig::from_json(r#"{"notifier": {"publish_timeout_ms": 0}}"#).unwrap_err();
		assert!(matches!(err, ConfigError::Validation(_)));
	}

	#[test]
	fn garbage_is_a_parse_error() {
		let err = DataStoreConfig::from_json("cache_size = 3").unwrap_err();
		assert!(matches!(err, ConfigError::Parse(_)));
	}

	#[test]
	fn format_by_extension() {
		assert_eq!(AnyFormat::from_extension("JSON"), Some(AnyFormat::Json));
		assert_eq!(AnyFormat::from_extension("ini"), None);
	}
}
