/* src/validation.rs */

use crate::error::StoreError;
use crate::value::PrefValue;

pub const MAX_KEY_LENGTH: usize = 255;
pub const MAX_VALUE_LENGTH: usize = 10_000;

/// Checks keys and values before any backend or cache access.
pub trait PreferencesValidator: Send + Sync {
	fn validate_key(&self, key: &str) -> Result<(), StoreError>;

	fn validate_value(&self, value: &PrefValue) -> Result<(), StoreError>;
}

/// Rejects blank keys, keys over 255 characters or containing a null
/// character, and string or encoded values over 10,000 characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultValidator;

impl PreferencesValidator for DefaultValidator {
	fn validate_key(&self, key: &str) -> Result<(), StoreError> {
		let reason = if key.trim().is_empty() {
			"key cannot be blank".to_string()
		} else if key.chars().count() > MAX_KEY_LENGTH {
			format!("key length cannot exceed {MAX_KEY_LENGTH} characters")
		} else if key.contains('\0') {
			"key cannot contain null characters".to_string()
		} else {
			return Ok(());
		};
		Err(StoreError::InvalidKey {
			key: key.to_string(),
			reason,
		})
	}

	fn validate_value(&self, value: &PrefValue) -> Result<(), StoreError> {
		match value {
			PrefValue::Str(s) | PrefValue::Serialized(s) if s.chars().count() > MAX_VALUE_LENGTH => Err(
				StoreError::InvalidValue(format!("{} value too large: {} characters", value.kind(), s.chars().count())),
			),
			_ => Ok(()),
		}
	}
}
