//! Store adapter trait for settings persistence.
//!
//! The engine persists one row per overridden key per resource instance.
//! Adapters implement this trait over whatever store they like; values
//! must round-trip with their scalar type intact.

use async_trait::async_trait;

use crate::error::PbResult;
use crate::types::{ResourceRef, Timestamp};
use crate::value::SettingValue;

/// One persisted setting override.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingRow {
	pub resource: ResourceRef,
	pub key: String,
	pub value: SettingValue,
	pub created_at: Timestamp,
	pub updated_at: Timestamp,
}

/// Persistence boundary for settings overrides.
///
/// At most one row exists per `(resource, key)`; the engine decides
/// create/update/delete, the adapter just executes. Concurrent writers
/// resolve last-write-wins per key: there is no locking or version column
/// at this layer.
#[async_trait]
pub trait SettingsStore: Send + Sync {
	/// All overrides persisted for one resource instance.
	async fn list_settings(&self, resource: &ResourceRef) -> PbResult<Vec<SettingRow>>;

	/// Single override by key, or None when the key is not overridden.
	async fn read_setting(
		&self,
		resource: &ResourceRef,
		key: &str,
	) -> PbResult<Option<SettingRow>>;

	/// Persist a new override.
	async fn create_setting(
		&self,
		resource: &ResourceRef,
		key: &str,
		value: &SettingValue,
	) -> PbResult<SettingRow>;

	/// Replace the value of an existing override.
	async fn update_setting(
		&self,
		row: &SettingRow,
		value: &SettingValue,
	) -> PbResult<SettingRow>;

	/// Remove an override.
	async fn delete_setting(&self, row: &SettingRow) -> PbResult<()>;
}

// vim: ts=4
