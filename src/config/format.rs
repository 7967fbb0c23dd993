/* src/config/format.rs */

use serde::de::DeserializeOwned;

use super::ConfigError;

/// A config file syntax.
pub trait Format: Send + Sync {
	fn extensions(&self) -> &'static [&'static str];

	fn parse<T: DeserializeOwned>(&self, input: &[u8]) -> Result<T, ConfigError>;
}

/// JSON via `serde_json`.
pub struct Json;

impl Format for Json {
	fn extensions(&self) -> &'static [&'static str] {
		&["json"]
	}

	fn parse<T: DeserializeOwned>(&self, input: &[u8]) -> Result<T, ConfigError> {
		serde_json::from_slice(input).map_err(|e| ConfigError::Parse(e.to_string()))
	}
}

/// TOML via `toml`.
#[cfg(feature = "toml")]
pub struct Toml;

#[cfg(feature = "toml")]
impl Format for Toml {
	fn extensions(&self) -> &'static [&'static str] {
		&["toml"]
	}

	fn parse<T: DeserializeOwned>(&self, input: &[u8]) -> Result<T, ConfigError> {
		let s = std::str::from_utf8(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
		toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
	}
}

/// Every compiled-in format, selectable at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnyFormat {
	Json,
	#[cfg(feature = "toml")]
	Toml,
}

impl AnyFormat {
	pub const ALL: &'static [AnyFormat] = &[
		AnyFormat::Json,
		#[cfg(feature = "toml")]
		AnyFormat::Toml,
	];

	/// The format registered for `ext`, ignoring case.
	pub fn from_extension(ext: &str) -> Option<Self> {
		Self::ALL
			.iter()
			.copied()
			.find(|f| f.extensions().iter().any(|e| e.eq_ignore_ascii_case(ext)))
	}
}

impl Format for AnyFormat {
	fn extensions(&self) -> &'static [&'static str] {
		match self {
			Self::Json => Json.extensions(),
			#[cfg(feature = "toml")]
			Self::Toml => Toml.extensions(),
		}
	}

	fn parse<T: DeserializeOwned>(&self, input: &[u8]) -> Result<T, ConfigError> {
		match self {
			Self::Json => Json.parse(input),
			#[cfg(feature = "toml")]
			Self::Toml => Toml.parse(input),
		}
	}
}
