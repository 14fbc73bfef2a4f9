//! SQLite-backed settings store adapter.
//!
//! One `settings` table serves every resource kind; rows are scoped by
//! the `(resource_type, resource_id, key)` composite primary key.

use std::path::Path;

use async_trait::async_trait;
use sqlx::sqlite::{self, SqlitePool};

use prefbag::prelude::*;

mod schema;
mod setting;

use schema::init_db;

#[derive(Debug)]
pub struct StoreAdapterSqlite {
	db: SqlitePool,
}

impl StoreAdapterSqlite {
	/// Open (or create) the database file and initialize the schema.
	pub async fn new(path: impl AsRef<Path>) -> PbResult<Self> {
		let opts = sqlite::SqliteConnectOptions::new()
			.filename(path.as_ref())
			.create_if_missing(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.connect_with(opts)
			.await
			.inspect_err(|err| warn!("DB: {:#?}", err))
			.or(Err(Error::DbError))?;

		init_db(&db)
			.await
			.inspect_err(|err| warn!("DB: {:#?}", err))
			.or(Err(Error::DbError))?;

		Ok(Self { db })
	}
}

#[async_trait]
impl SettingsStore for StoreAdapterSqlite {
	async fn list_settings(&self, resource: &ResourceRef) -> PbResult<Vec<SettingRow>> {
		setting::list(&self.db, resource).await
	}

	async fn read_setting(
		&self,
		resource: &ResourceRef,
		key: &str,
	) -> PbResult<Option<SettingRow>> {
		setting::read(&self.db, resource, key).await
	}

	async fn create_setting(
		&self,
		resource: &ResourceRef,
		key: &str,
		value: &SettingValue,
	) -> PbResult<SettingRow> {
		setting::create(&self.db, resource, key, value).await
	}

	async fn update_setting(
		&self,
		row: &SettingRow,
		value: &SettingValue,
	) -> PbResult<SettingRow> {
		setting::update(&self.db, row, value).await
	}

	async fn delete_setting(&self, row: &SettingRow) -> PbResult<()> {
		setting::delete(&self.db, row).await
	}
}

// vim: ts=4
