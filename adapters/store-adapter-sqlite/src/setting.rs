//! Settings row queries
//!
//! Values are stored as JSON text of the untagged scalar, so the stored
//! type survives the round trip: a boolean comes back as a boolean, never
//! as `0`/`1` or a string.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use prefbag::prelude::*;

fn inspect(err: &sqlx::Error) {
	warn!("DB: {:#?}", err);
}

fn row_to_setting(row: &SqliteRow) -> PbResult<SettingRow> {
	let resource_type: String = row.get("resource_type");
	let resource_id: i64 = row.get("resource_id");
	let key: String = row.get("key");
	let raw: String = row.get("value");
	let created_at: i64 = row.get("created_at");
	let updated_at: i64 = row.get("updated_at");

	let value = serde_json::from_str(&raw)
		.inspect_err(|err| warn!("bad setting value for {}:{} {}: {}", resource_type, resource_id, key, err))
		.map_err(|_| Error::DbError)?;

	Ok(SettingRow {
		resource: ResourceRef { kind: resource_type, id: ResourceId(resource_id) },
		key,
		value,
		created_at: Timestamp(created_at),
		updated_at: Timestamp(updated_at),
	})
}

fn encode(value: &SettingValue) -> PbResult<String> {
	serde_json::to_string(value)
		.inspect_err(|err| warn!("unencodable setting value {}: {}", value, err))
		.map_err(|_| Error::DbError)
}

/// All overrides for one resource instance
pub(crate) async fn list(db: &SqlitePool, resource: &ResourceRef) -> PbResult<Vec<SettingRow>> {
	let rows = sqlx::query(
		"SELECT resource_type, resource_id, key, value, created_at, updated_at
		FROM settings WHERE resource_type = ? AND resource_id = ? ORDER BY key",
	)
	.bind(&resource.kind)
	.bind(resource.id.0)
	.fetch_all(db)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	rows.iter().map(row_to_setting).collect()
}

/// Single override by key
pub(crate) async fn read(
	db: &SqlitePool,
	resource: &ResourceRef,
	key: &str,
) -> PbResult<Option<SettingRow>> {
	let row = sqlx::query(
		"SELECT resource_type, resource_id, key, value, created_at, updated_at
		FROM settings WHERE resource_type = ? AND resource_id = ? AND key = ?",
	)
	.bind(&resource.kind)
	.bind(resource.id.0)
	.bind(key)
	.fetch_optional(db)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	row.as_ref().map(row_to_setting).transpose()
}

/// Persist a new override. INSERT OR REPLACE keeps concurrent creators
/// last-write-wins instead of erroring on the primary key.
pub(crate) async fn create(
	db: &SqlitePool,
	resource: &ResourceRef,
	key: &str,
	value: &SettingValue,
) -> PbResult<SettingRow> {
	let value_str = encode(value)?;
	sqlx::query(
		"INSERT OR REPLACE INTO settings (resource_type, resource_id, key, value)
		VALUES (?, ?, ?, ?)",
	)
	.bind(&resource.kind)
	.bind(resource.id.0)
	.bind(key)
	.bind(value_str)
	.execute(db)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	read(db, resource, key).await?.ok_or(Error::DbError)
}

/// Replace the value of an existing override
pub(crate) async fn update(
	db: &SqlitePool,
	row: &SettingRow,
	value: &SettingValue,
) -> PbResult<SettingRow> {
	let value_str = encode(value)?;
	sqlx::query(
		"UPDATE settings SET value = ?, updated_at = unixepoch()
		WHERE resource_type = ? AND resource_id = ? AND key = ?",
	)
	.bind(value_str)
	.bind(&row.resource.kind)
	.bind(row.resource.id.0)
	.bind(&row.key)
	.execute(db)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	read(db, &row.resource, &row.key).await?.ok_or(Error::NotFound)
}

/// Remove an override
pub(crate) async fn delete(db: &SqlitePool, row: &SettingRow) -> PbResult<()> {
	sqlx::query("DELETE FROM settings WHERE resource_type = ? AND resource_id = ? AND key = ?")
		.bind(&row.resource.kind)
		.bind(row.resource.id.0)
		.bind(&row.key)
		.execute(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	Ok(())
}

// vim: ts=4
