/* src/settings/mod.rs */

//!
//! The platform key-value backend consumed by the store.
//!
//! - [`MemorySettings`] - in-process map, lock-free reads
//! - [`FileSettings`] - JSON file on disk (`file` feature)

mod memory;

#[cfg(feature = "file")]
mod file;

pub use memory::MemorySettings;

#[cfg(feature = "file")]
pub use file::FileSettings;

use std::collections::BTreeSet;

use crate::value::ValueKind;

/// Errors raised by a settings backend.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	/// The key holds a value of a different kind than requested.
	#[error("key `{key}` holds {found}, requested {expected}")]
	TypeMismatch {
		key: String,
		expected: ValueKind,
		found: ValueKind,
	},

	#[error("io error: {0}")]
	Io(#[from] std::io::Error),

	/// Persisted data could not be decoded.
	#[error("corrupt settings data: {0}")]
	Corrupt(String),

	/// The backend refused the operation.
	#[error("settings backend unavailable: {0}")]
	Unavailable(String),
}

/// A synchronous key-value settings backend.
///
/// Reads of an absent key return the supplied default. Implementations must
/// be shareable across threads; the store calls them from whichever task
/// (or blocking thread) runs the operation.
pub trait Settings: Send + Sync {
	fn get_int(&self, key: &str, default: i32) -> Result<i32, SettingsError>;
	fn put_int(&self, key: &str, value: i32) -> Result<(), SettingsError>;

	fn get_long(&self, key: &str, default: i64) -> Result<i64, SettingsError>;
	fn put_long(&self, key: &str, value: i64) -> Result<(), SettingsError>;

	fn get_float(&self, key: &str, default: f32) -> Result<f32, SettingsError>;
	fn put_float(&self, key: &str, value: f32) -> Result<(), SettingsError>;

	fn get_double(&self, key: &str, default: f64) -> Result<f64, SettingsError>;
	fn put_double(&self, key: &str, value: f64) -> Result<(), SettingsError>;

	fn get_bool(&self, key: &str, default: bool) -> Result<bool, SettingsError>;
	fn put_bool(&self, key: &str, value: bool) -> Result<(), SettingsError>;

	fn get_string(&self, key: &str, default: &str) -> Result<String, SettingsError>;
	fn put_string(&self, key: &str, value: &str) -> Result<(), SettingsError>;

	fn has_key(&self, key: &str) -> Result<bool, SettingsError>;
	fn remove(&self, key: &str) -> Result<(), SettingsError>;
	fn clear(&self) -> Result<(), SettingsError>;
	fn keys(&self) -> Result<BTreeSet<String>, SettingsError>;
	fn size(&self) -> Result<usize, SettingsError>;
}
