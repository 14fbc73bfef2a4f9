//! Setting value type.
//!
//! A setting value is one of four scalar types. Strict equality is variant
//! equality: `Bool(false)`, `Int(0)` and `String("false")` are all
//! distinct, and every comparison in the engine relies on that.

use serde::{Deserialize, Serialize};

/// Scalar setting value, type-preserving across serialization.
///
/// The untagged representation keeps the native JSON scalar on the wire,
/// so a stored boolean is read back as a boolean, never as `0`/`1` or a
/// string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)] // No type tag - type inferred from the JSON scalar
pub enum SettingValue {
	Bool(bool), // Must be before Int to avoid bool -> int coercion
	Int(i64),
	Float(f64),
	String(String),
}

impl SettingValue {
	/// Check if this value matches the type of another value
	pub fn matches_type(&self, other: &SettingValue) -> bool {
		matches!(
			(self, other),
			(SettingValue::Bool(_), SettingValue::Bool(_))
				| (SettingValue::Int(_), SettingValue::Int(_))
				| (SettingValue::Float(_), SettingValue::Float(_))
				| (SettingValue::String(_), SettingValue::String(_))
		)
	}

	/// Get the type name for error messages
	pub fn type_name(&self) -> &'static str {
		match self {
			SettingValue::Bool(_) => "bool",
			SettingValue::Int(_) => "int",
			SettingValue::Float(_) => "float",
			SettingValue::String(_) => "string",
		}
	}

	/// Numeric view of the value, if it has one. Numeric strings count,
	/// matching the `num` rule.
	pub fn as_number(&self) -> Option<f64> {
		match self {
			SettingValue::Int(i) => Some(*i as f64),
			SettingValue::Float(f) => Some(*f),
			SettingValue::String(s) => s.parse::<f64>().ok(),
			SettingValue::Bool(_) => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			SettingValue::String(s) => Some(s),
			_ => None,
		}
	}
}

impl std::fmt::Display for SettingValue {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			SettingValue::Bool(b) => write!(f, "{b}"),
			SettingValue::Int(i) => write!(f, "{i}"),
			SettingValue::Float(x) => write!(f, "{x}"),
			SettingValue::String(s) => write!(f, "'{s}'"),
		}
	}
}

impl From<bool> for SettingValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<i64> for SettingValue {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

impl From<f64> for SettingValue {
	fn from(value: f64) -> Self {
		Self::Float(value)
	}
}

impl From<&str> for SettingValue {
	fn from(value: &str) -> Self {
		Self::String(value.to_string())
	}
}

impl From<String> for SettingValue {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}


// vim: ts=4
