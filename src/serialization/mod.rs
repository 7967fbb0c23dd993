/* src/serialization/mod.rs */

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StoreError;

mod json;
pub use json::JsonSerialization;

#[cfg(feature = "toml")]
mod toml;
#[cfg(feature = "toml")]
pub use self::toml::TomlSerialization;

/// How much of a rejected payload is quoted in error messages.
const PREVIEW_CHARS: usize = 100;

/// Converts structured values to and from their stored string form.
pub trait SerializationStrategy: Send + Sync {
	/// File extensions or identifiers this encoding answers to.
	fn extensions(&self) -> &'static [&'static str];

	fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, StoreError>;

	/// Decodes `data`. Blank input is an error, never a zero value.
	fn deserialize<T: DeserializeOwned>(&self, data: &str) -> Result<T, StoreError>;
}

/// An enum over the built-in strategies, for runtime selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Serialization {
	Json(JsonSerialization),
	#[cfg(feature = "toml")]
	Toml(TomlSerialization),
}

impl Serialization {
	/// Picks the strategy registered for a file extension.
	pub fn from_extension(ext: &str) -> Option<Self> {
		let candidates = [
			Self::Json(JsonSerialization::default()),
			#[cfg(feature = "toml")]
			Self::Toml(TomlSerialization),
		];
		candidates
			.into_iter()
			.find(|s| s.extensions().iter().any(|e| e.eq_ignore_ascii_case(ext)))
	}
}

impl Default for Serialization {
	fn default() -> Self {
		Self::Json(JsonSerialization::default())
	}
}

impl SerializationStrategy for Serialization {
	fn extensions(&self) -> &'static [&'static str] {
		match self {
			Self::Json(s) => s.extensions(),
			#[cfg(feature = "toml")]
			Self::Toml(s) => s.extensions(),
		}
	}

	fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, StoreError> {
		match self {
			Self::Json(s) => s.serialize(value),
			#[cfg(feature = "toml")]
			Self::Toml(s) => s.serialize(value),
		}
	}

	fn deserialize<T: DeserializeOwned>(&self, data: &str) -> Result<T, StoreError> {
		match self {
			Self::Json(s) => s.deserialize(data),
			#[cfg(feature = "toml")]
			Self::Toml(s) => s.deserialize(data),
		}
	}
}

pub(crate) fn ensure_not_blank(data: &str) -> Result<(), StoreError> {
	if data.trim().is_empty() {
		return Err(StoreError::Deserialization(
			"cannot deserialize blank string".to_string(),
		));
	}
	Ok(())
}

pub(crate) fn preview(data: &str) -> String {
	let mut chars = data.chars();
	let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
	if chars.next().is_some() {
		format!("{head}...")
	} else {
		head
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn preview_truncates_long_input() {
		let long = "x".repeat(150);
		let shown = preview(&long);
		assert_eq!(shown.len(), PREVIEW_CHARS + 3);
		assert!(shown.ends_with("..."));
		assert_eq!(preview("short"), "short");
	}

	#[test]
	fn extension_lookup() {
		assert!(matches!(
			Serialization::from_extension("JSON"),
			Some(Serialization::Json(_))
		));
		assert!(Serialization::from_extension("ini").is_none());
	}
}
