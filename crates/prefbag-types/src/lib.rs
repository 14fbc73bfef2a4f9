//! Shared types, the store adapter trait, and error types for prefbag.
//!
//! This crate contains the foundational types that are shared between the
//! core settings engine and all store adapter implementations. Keeping them
//! in a separate crate lets adapter crates compile without pulling in the
//! engine itself.

pub mod error;
pub mod prelude;
pub mod store_adapter;
pub mod types;
pub mod value;

pub use error::{Error, PbResult};
pub use store_adapter::{SettingRow, SettingsStore};
pub use types::{ResourceId, ResourceRef, Timestamp, now};
pub use value::SettingValue;

// vim: ts=4
