/* src/serialization/json.rs */

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{SerializationStrategy, ensure_not_blank, preview};
use crate::error::StoreError;

/// JSON encoding using `serde_json`. Unknown fields are ignored on decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JsonSerialization {
	pub pretty: bool,
}

impl JsonSerialization {
	pub const fn pretty() -> Self {
		Self { pretty: true }
	}
}

impl SerializationStrategy for JsonSerialization {
	fn extensions(&self) -> &'static [&'static str] {
		&["json"]
	}

	fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, StoreError> {
		let encoded = if self.pretty {
			serde_json::to_string_pretty(value)
		} else {
			serde_json::to_string(value)
		};
		encoded.map_err(|e| {
			StoreError::Serialization(format!(
				"failed to serialize value of type {}: {e}",
				std::any::type_name::<T>()
			))
		})
	}

	fn deserialize<T: DeserializeOwned>(&self, data: &str) -> Result<T, StoreError> {
		ensure_not_blank(data)?;
		serde_json::from_str(data).map_err(|e| {
			StoreError::Deserialization(format!("failed to deserialize data: {}: {e}", preview(data)))
		})
	}
}
