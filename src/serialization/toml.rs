/* src/serialization/toml.rs */

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{SerializationStrategy, ensure_not_blank, preview};
use crate::error::StoreError;

/// TOML encoding. Only table-shaped values (structs, maps) can be stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TomlSerialization;

impl SerializationStrategy for TomlSerialization {
	fn extensions(&self) -> &'static [&'static str] {
		&["toml"]
	}

	fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, StoreError> {
		toml::to_string(value).map_err(|e| {
			StoreError::Serialization(format!(
				"failed to serialize value of type {}: {e}",
				std::any::type_name::<T>()
			))
		})
	}

	fn deserialize<T: DeserializeOwned>(&self, data: &str) -> Result<T, StoreError> {
		ensure_not_blank(data)?;
		toml::from_str(data).map_err(|e| {
			StoreError::Deserialization(format!("failed to deserialize data: {}: {e}", preview(data)))
		})
	}
}
