//! Error types shared by the engine and store adapters.

pub type PbResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	/// No settings config is registered for a resource kind. Fatal when
	/// constructing an engine for that resource.
	ConfigNotFound(String),
	/// A candidate value failed validation for a key during a write.
	/// Aborts only that key's mutation.
	InvalidValue { key: String, value: String },
	/// A rule expression names a rule with no registered validator,
	/// neither user-supplied nor built-in.
	InvalidRule { name: String },
	/// Malformed registration: duplicate key, missing default, bad rule
	/// spec.
	ConfigError(String),
	/// Caller-side misuse, e.g. reading a string setting as an int.
	ValidationError(String),
	NotFound,
	DbError,

	// externals
	Io(std::io::Error),
}

impl Error {
	/// Build an `InvalidValue` for a key and the value that was rejected.
	pub fn invalid_value(key: impl Into<String>, value: impl std::fmt::Display) -> Self {
		Self::InvalidValue { key: key.into(), value: value.to_string() }
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Error::ConfigNotFound(kind) => {
				write!(f, "no settings config registered for resource kind '{kind}'")
			}
			Error::InvalidValue { key, value } => {
				write!(f, "value {value} is not a registered allowed value for '{key}'")
			}
			Error::InvalidRule { name } => {
				write!(f, "no validator registered for rule '{name}'")
			}
			Error::ConfigError(msg) => write!(f, "config error: {msg}"),
			Error::ValidationError(msg) => write!(f, "validation error: {msg}"),
			Error::NotFound => write!(f, "not found"),
			Error::DbError => write!(f, "database error"),
			Error::Io(err) => write!(f, "io error: {err}"),
		}
	}
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

// vim: ts=4
