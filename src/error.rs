/* src/error.rs */

use crate::cache::CacheError;
use crate::settings::SettingsError;
use crate::value::ValueKind;

/// Errors surfaced by store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
	/// The key failed validation. No backend call was made.
	#[error("invalid key: {reason}")]
	InvalidKey { key: String, reason: String },

	/// The value failed validation. No backend call was made.
	#[error("invalid value: {0}")]
	InvalidValue(String),

	/// The key holds a value the requested type cannot be read from.
	#[error("unsupported type for key `{key}`: requested {requested}, stored {stored}")]
	UnsupportedType {
		key: String,
		requested: ValueKind,
		stored: ValueKind,
	},

	#[error("serialization failed: {0}")]
	Serialization(String),

	#[error("deserialization failed: {0}")]
	Deserialization(String),

	#[error("cache operation failed: {0}")]
	Cache(#[from] CacheError),

	#[error("backend error: {0}")]
	Backend(SettingsError),

	/// A blocking backend call could not be joined.
	#[error("dispatch failed: {0}")]
	Dispatch(String),
}

impl From<SettingsError> for StoreError {
	fn from(err: SettingsError) -> Self {
		match err {
			SettingsError::TypeMismatch {
				key,
				expected,
				found,
			} => StoreError::UnsupportedType {
				key,
				requested: expected,
				stored: found,
			},
			other => StoreError::Backend(other),
		}
	}
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, StoreError>;
