/* src/value.rs */

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of value held under a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
	Int,
	Long,
	Float,
	Double,
	Bool,
	Str,
	/// An encoded structured value.
	Serialized,
}

impl fmt::Display for ValueKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::Int => "int",
			Self::Long => "long",
			Self::Float => "float",
			Self::Double => "double",
			Self::Bool => "bool",
			Self::Str => "string",
			Self::Serialized => "serialized",
		};
		f.write_str(name)
	}
}

/// A stored preference value.
///
/// Primitives map one-to-one onto backend slots. Structured values are kept
/// in their encoded string form, which is also what change events carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PrefValue {
	Int(i32),
	Long(i64),
	Float(#[serde(with = "float_repr")] f32),
	Double(#[serde(with = "float_repr")] f64),
	Bool(bool),
	Str(String),
	Serialized(String),
}

impl PrefValue {
	pub fn kind(&self) -> ValueKind {
		match self {
			Self::Int(_) => ValueKind::Int,
			Self::Long(_) => ValueKind::Long,
			Self::Float(_) => ValueKind::Float,
			Self::Double(_) => ValueKind::Double,
			Self::Bool(_) => ValueKind::Bool,
			Self::Str(_) => ValueKind::Str,
			Self::Serialized(_) => ValueKind::Serialized,
		}
	}

	/// Returns the string payload for `Str` and `Serialized` values.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Str(s) | Self::Serialized(s) => Some(s),
			_ => None,
		}
	}
}

impl fmt::Display for PrefValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Int(v) => write!(f, "{v}"),
			Self::Long(v) => write!(f, "{v}"),
			Self::Float(v) => write!(f, "{v}"),
			Self::Double(v) => write!(f, "{v}"),
			Self::Bool(v) => write!(f, "{v}"),
			Self::Str(v) => write!(f, "{v:?}"),
			Self::Serialized(v) => write!(f, "{v}"),
		}
	}
}

/// Writes finite floats as numbers and NaN or infinities as `"NaN"`,
/// `"inf"` and `"-inf"`, which plain JSON numbers cannot hold.
mod float_repr {
	use serde::de::Error as _;
	use serde::{Deserialize, Deserializer, Serialize, Serializer};

	pub(super) trait Float: Copy + Serialize + for<'de> Deserialize<'de> {
		const NAN: Self;
		const INFINITY: Self;
		const NEG_INFINITY: Self;

		fn is_nan(self) -> bool;
		fn is_infinite(self) -> bool;
		fn is_sign_negative(self) -> bool;
	}

	macro_rules! float {
		($($ty:ty),*) => {$(
			impl Float for $ty {
				const NAN: Self = <$ty>::NAN;
				const INFINITY: Self = <$ty>::INFINITY;
				const NEG_INFINITY: Self = <$ty>::NEG_INFINITY;

				fn is_nan(self) -> bool {
					<$ty>::is_nan(self)
				}
				fn is_infinite(self) -> bool {
					<$ty>::is_infinite(self)
				}
				fn is_sign_negative(self) -> bool {
					<$ty>::is_sign_negative(self)
				}
			}
		)*};
	}

	float!(f32, f64);

	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Repr<F> {
		Number(F),
		Text(String),
	}

	pub(super) fn serialize<F: Float, S: Serializer>(value: &F, serializer: S) -> Result<S::Ok, S::Error> {
		let value = *value;
		if value.is_nan() {
			serializer.serialize_str("NaN")
		} else if value.is_infinite() && value.is_sign_negative() {
			serializer.serialize_str("-inf")
		} else if value.is_infinite() {
			serializer.serialize_str("inf")
		} else {
			value.serialize(serializer)
		}
	}

	pub(super) fn deserialize<'de, F: Float, D: Deserializer<'de>>(deserializer: D) -> Result<F, D::Error> {
		match Repr::<F>::deserialize(deserializer)? {
			Repr::Number(value) => Ok(value),
			Repr::Text(text) => match text.as_str() {
				"NaN" => Ok(F::NAN),
				"inf" => Ok(F::INFINITY),
				"-inf" => Ok(F::NEG_INFINITY),
				other => Err(D::Error::custom(format!("invalid float: {other:?}"))),
			},
		}
	}
}
