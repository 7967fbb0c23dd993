/* src/handlers.rs */

//!
//! Per-type read/write strategies against a [`Settings`] backend.
//!
//! The handler is picked by the caller's declared type at compile time, so
//! there is no runtime probing for a matching handler.

use std::fmt::Debug;

use crate::settings::{Settings, SettingsError};
use crate::value::{PrefValue, ValueKind};

/// A primitive type that maps onto one backend slot.
pub trait PrimitiveValue: Clone + PartialEq + Debug + Send + Sync + 'static {
	const KIND: ValueKind;

	fn write(settings: &dyn Settings, key: &str, value: &Self) -> Result<(), SettingsError>;

	fn read(settings: &dyn Settings, key: &str, default: Self) -> Result<Self, SettingsError>;

	fn to_value(&self) -> PrefValue;

	/// Extracts `Self` from a value of the matching kind.
	fn from_value(value: &PrefValue) -> Option<Self>;
}

macro_rules! primitive_handler {
	($ty:ty, $variant:ident, $get:ident, $put:ident) => {
		impl PrimitiveValue for $ty {
			const KIND: ValueKind = ValueKind::$variant;

			fn write(settings: &dyn Settings, key: &str, value: &Self) -> Result<(), SettingsError> {
				tracing::trace!("put {}: key={}, value={}", Self::KIND, key, value);
				settings.$put(key, *value)
			}

			fn read(settings: &dyn Settings, key: &str, default: Self) -> Result<Self, SettingsError> {
				let result = settings.$get(key, default);
				tracing::trace!("get {}: key={}, result={:?}", Self::KIND, key, result);
				result
			}

			fn to_value(&self) -> PrefValue {
				PrefValue::$variant(*self)
			}

			fn from_value(value: &PrefValue) -> Option<Self> {
				match value {
					PrefValue::$variant(v) => Some(*v),
					_ => None,
				}
			}
		}
	};
}

primitive_handler!(i32, Int, get_int, put_int);
primitive_handler!(i64, Long, get_long, put_long);
primitive_handler!(f32, Float, get_float, put_float);
primitive_handler!(f64, Double, get_double, put_double);
primitive_handler!(bool, Bool, get_bool, put_bool);

impl PrimitiveValue for String {
	const KIND: ValueKind = ValueKind::Str;

	fn write(settings: &dyn Settings, key: &str, value: &Self) -> Result<(), SettingsError> {
		tracing::trace!("put string: key={}, len={}", key, value.len());
		settings.put_string(key, value)
	}

	fn read(settings: &dyn Settings, key: &str, default: Self) -> Result<Self, SettingsError> {
		settings.get_string(key, &default)
	}

	fn to_value(&self) -> PrefValue {
		PrefValue::Str(self.clone())
	}

	fn from_value(value: &PrefValue) -> Option<Self> {
		match value {
			PrefValue::Str(s) => Some(s.clone()),
			_ => None,
		}
	}
}
