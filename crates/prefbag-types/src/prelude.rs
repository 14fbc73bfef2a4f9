pub use crate::error::{Error, PbResult};
pub use crate::store_adapter::{SettingRow, SettingsStore};
pub use crate::types::{ResourceId, ResourceRef, Timestamp, now};
pub use crate::value::SettingValue;

pub use tracing::{debug, debug_span, error, error_span, info, info_span, warn, warn_span};

// vim: ts=4
