//! Per-resource settings engine.
//!
//! A `Settings` instance binds one resource instance to its kind's config
//! and a store handle. Reads merge persisted overrides with registered
//! defaults; writes validate each value, then converge the store with the
//! minimal create/update/delete per key. Only overrides are persisted:
//! writing a default removes the override instead of storing it.

use indexmap::IndexMap;
use std::sync::Arc;

use prefbag_types::prelude::*;

use crate::registry::{AllowedValues, FrozenConfigRegistry, ResourceConfig};
use crate::rules::RuleBook;

pub struct Settings {
	config: Arc<ResourceConfig>,
	rules: Arc<RuleBook>,
	resource: ResourceRef,
	store: Arc<dyn SettingsStore>,
	saved: IndexMap<String, SettingValue>,
}

impl Settings {
	/// Bind a resource instance to its registered config and load its
	/// persisted overrides.
	pub async fn new(
		registry: &FrozenConfigRegistry,
		resource: ResourceRef,
		store: Arc<dyn SettingsStore>,
	) -> PbResult<Self> {
		let config = registry
			.config_for(&resource.kind)
			.ok_or_else(|| Error::ConfigNotFound(resource.kind.clone()))?;

		let mut settings =
			Self { config, rules: registry.rules(), resource, store, saved: IndexMap::new() };
		settings.sync().await?;
		Ok(settings)
	}

	/// Reload the override view from the store.
	///
	/// The store is the single source of truth; this picks up writes made
	/// by other engine instances targeting the same resource.
	pub async fn sync(&mut self) -> PbResult<()> {
		let rows = self.store.list_settings(&self.resource).await?;
		self.saved = rows.into_iter().map(|row| (row.key, row.value)).collect();
		Ok(())
	}

	pub fn resource(&self) -> &ResourceRef {
		&self.resource
	}

	/// True if the key exists in the registered config
	pub fn is_registered(&self, key: &str) -> bool {
		self.config.get(key).is_some()
	}

	/// True if the key currently has a persisted override
	pub fn has_saved(&self, key: &str) -> bool {
		self.saved.contains_key(key)
	}

	/// Check a candidate value against the key's allowed spec.
	///
	/// Unregistered keys are never valid. Literal sets use strict
	/// equality; rule specs go through the rule book and may fail with
	/// `Error::InvalidRule` when the rule does not exist.
	pub fn is_valid(&self, key: &str, value: &SettingValue) -> PbResult<bool> {
		let Some(def) = self.config.get(key) else {
			return Ok(false);
		};
		match &def.allowed {
			AllowedValues::Rule(_) => match def.allowed.rule_expr() {
				Some(expr) => self.rules.validate(&expr, value),
				None => Ok(false),
			},
			AllowedValues::List(values) => Ok(values.contains(value)),
		}
	}

	/// True if the value strictly equals the key's registered default
	pub fn is_default(&self, key: &str, value: &SettingValue) -> bool {
		self.default_for(key) == Some(value)
	}

	/// Registered default for the key, or None if unregistered
	pub fn default_for(&self, key: &str) -> Option<&SettingValue> {
		self.config.get(key).map(|def| &def.default)
	}

	/// Allowed spec for the key, or None if unregistered
	pub fn allowed_for(&self, key: &str) -> Option<&AllowedValues> {
		self.config.get(key).map(|def| &def.allowed)
	}

	/// All registered defaults, in registration order
	pub fn all_defaults(&self) -> IndexMap<&str, &SettingValue> {
		self.config.iter().map(|(key, def)| (key, &def.default)).collect()
	}

	/// All allowed specs, in registration order
	pub fn all_allowed(&self) -> IndexMap<&str, &AllowedValues> {
		self.config.iter().map(|(key, def)| (key, &def.allowed)).collect()
	}

	/// Override value if present, else the registered default, else None
	pub fn get(&self, key: &str) -> Option<&SettingValue> {
		self.saved.get(key).or_else(|| self.default_for(key))
	}

	/// True if `get(key)` strictly equals the value
	pub fn key_is(&self, key: &str, value: &SettingValue) -> bool {
		self.get(key) == Some(value)
	}

	/// Copy of the persisted overrides only (no defaults)
	pub fn all_saved(&self) -> IndexMap<String, SettingValue> {
		self.saved.clone()
	}

	/// Complete effective view: every registered key, override values
	/// substituted over defaults, in registration order
	pub fn all(&self) -> IndexMap<String, SettingValue> {
		self.config
			.iter()
			.map(|(key, def)| {
				(key.to_string(), self.saved.get(key).unwrap_or(&def.default).clone())
			})
			.collect()
	}

	/// Apply a sequence of key/value changes, in order.
	///
	/// Each key commits independently: a validation failure aborts that
	/// key and stops processing later pairs, but earlier pairs stay
	/// applied (no rollback). The override view is re-synced from the
	/// store afterwards, on the error path too.
	pub async fn set<K, V, I>(&mut self, changes: I) -> PbResult<()>
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: Into<SettingValue>,
	{
		let mut result = Ok(());
		for (key, value) in changes {
			if let Err(err) = self.apply(key.as_ref(), value.into()).await {
				result = Err(err);
				break;
			}
		}
		self.sync().await?;
		result
	}

	/// Validate one value and converge the store for its key.
	async fn apply(&self, key: &str, value: SettingValue) -> PbResult<()> {
		if !self.is_valid(key, &value)? {
			warn!("rejected value {} for setting {}.{}", value, self.resource, key);
			return Err(Error::invalid_value(key, &value));
		}

		if self.is_default(key, &value) {
			// Overridden and set back to default: drop the row. A default
			// that was never overridden persists nothing.
			if self.has_saved(key) {
				if let Some(row) = self.store.read_setting(&self.resource, key).await? {
					self.store.delete_setting(&row).await?;
					debug!("deleted setting {}.{}", self.resource, key);
				}
			}
		} else if self.has_saved(key) {
			// A concurrent writer may have removed the row since the last
			// sync; treat that as already converged.
			if let Some(row) = self.store.read_setting(&self.resource, key).await? {
				self.store.update_setting(&row, &value).await?;
				debug!("updated setting {}.{}", self.resource, key);
			}
		} else {
			self.store.create_setting(&self.resource, key, &value).await?;
			debug!("created setting {}.{}", self.resource, key);
		}

		Ok(())
	}

	/// Set the key back to its registered default and return it.
	pub async fn reset(&mut self, key: &str) -> PbResult<SettingValue> {
		let Some(default) = self.default_for(key).cloned() else {
			return Err(Error::invalid_value(key, "null"));
		};
		self.set([(key, default.clone())]).await?;
		Ok(default)
	}

	// Typed getters //
	//***************//

	pub fn get_bool(&self, key: &str) -> PbResult<bool> {
		match self.get(key) {
			Some(SettingValue::Bool(b)) => Ok(*b),
			Some(v) => Err(Error::ValidationError(format!(
				"setting '{}' is not a bool, got {}",
				key,
				v.type_name()
			))),
			None => Err(Error::NotFound),
		}
	}

	pub fn get_int(&self, key: &str) -> PbResult<i64> {
		match self.get(key) {
			Some(SettingValue::Int(i)) => Ok(*i),
			Some(v) => Err(Error::ValidationError(format!(
				"setting '{}' is not an int, got {}",
				key,
				v.type_name()
			))),
			None => Err(Error::NotFound),
		}
	}

	pub fn get_float(&self, key: &str) -> PbResult<f64> {
		match self.get(key) {
			Some(SettingValue::Float(f)) => Ok(*f),
			Some(v) => Err(Error::ValidationError(format!(
				"setting '{}' is not a float, got {}",
				key,
				v.type_name()
			))),
			None => Err(Error::NotFound),
		}
	}

	pub fn get_string(&self, key: &str) -> PbResult<String> {
		match self.get(key) {
			Some(SettingValue::String(s)) => Ok(s.clone()),
			Some(v) => Err(Error::ValidationError(format!(
				"setting '{}' is not a string, got {}",
				key,
				v.type_name()
			))),
			None => Err(Error::NotFound),
		}
	}
}

impl std::fmt::Debug for Settings {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Settings")
			.field("resource", &self.resource)
			.field("registered", &self.config.len())
			.field("saved", &self.saved)
			.finish()
	}
}

// vim: ts=4
