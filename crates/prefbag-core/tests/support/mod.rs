//! In-memory settings store used by the engine tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;

use prefbag_types::prelude::*;

/// Store double keeping rows in a sorted map, keyed like the relational
/// schema: `(resource_type, resource_id, key)`.
#[derive(Debug, Default)]
pub struct MemoryStore {
	rows: Mutex<BTreeMap<(String, i64, String), SettingRow>>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn row_count(&self) -> usize {
		self.rows.lock().len()
	}

	pub fn rows_for(&self, resource: &ResourceRef) -> usize {
		self.rows
			.lock()
			.values()
			.filter(|row| &row.resource == resource)
			.count()
	}
}

fn key_of(resource: &ResourceRef, key: &str) -> (String, i64, String) {
	(resource.kind.clone(), resource.id.0, key.to_string())
}

#[async_trait]
impl SettingsStore for MemoryStore {
	async fn list_settings(&self, resource: &ResourceRef) -> PbResult<Vec<SettingRow>> {
		Ok(self.rows.lock().values().filter(|row| &row.resource == resource).cloned().collect())
	}

	async fn read_setting(
		&self,
		resource: &ResourceRef,
		key: &str,
	) -> PbResult<Option<SettingRow>> {
		Ok(self.rows.lock().get(&key_of(resource, key)).cloned())
	}

	async fn create_setting(
		&self,
		resource: &ResourceRef,
		key: &str,
		value: &SettingValue,
	) -> PbResult<SettingRow> {
		let row = SettingRow {
			resource: resource.clone(),
			key: key.to_string(),
			value: value.clone(),
			created_at: now(),
			updated_at: now(),
		};
		self.rows.lock().insert(key_of(resource, key), row.clone());
		Ok(row)
	}

	async fn update_setting(
		&self,
		row: &SettingRow,
		value: &SettingValue,
	) -> PbResult<SettingRow> {
		let mut rows = self.rows.lock();
		let entry = rows.get_mut(&key_of(&row.resource, &row.key)).ok_or(Error::NotFound)?;
		entry.value = value.clone();
		entry.updated_at = now();
		Ok(entry.clone())
	}

	async fn delete_setting(&self, row: &SettingRow) -> PbResult<()> {
		self.rows.lock().remove(&key_of(&row.resource, &row.key));
		Ok(())
	}
}

// vim: ts=4
