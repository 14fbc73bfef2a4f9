//! Setting registration.
//!
//! Each resource kind declares its settings in a `ResourceConfig`: the
//! mapping from key to allowed-value spec and default, in registration
//! order. Configs are collected in a `ConfigRegistry` during startup and
//! frozen into an immutable, shareable registry before any engine is
//! constructed.

use indexmap::IndexMap;
use serde::Deserialize;
use std::sync::Arc;

use prefbag_types::prelude::*;

use crate::rules::{RuleBook, RuleExpr};

/// Allowed-value specification for one key: an explicit set of permitted
/// literals, or a rule expression such as `:range=1,5:`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AllowedValues {
	List(Vec<SettingValue>),
	Rule(String),
}

impl AllowedValues {
	/// Parsed rule expression, when this spec is rule-shaped.
	pub fn rule_expr(&self) -> Option<RuleExpr> {
		match self {
			Self::Rule(spec) => RuleExpr::parse(spec),
			Self::List(_) => None,
		}
	}
}

/// Setting definition - allowed values and default for one key.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingDefinition {
	pub key: String,
	pub description: Option<String>,
	pub allowed: AllowedValues,
	pub default: SettingValue,
}

impl SettingDefinition {
	/// Create a builder for constructing a SettingDefinition
	pub fn builder(key: impl Into<String>) -> SettingDefinitionBuilder {
		SettingDefinitionBuilder::new(key)
	}
}

/// Builder for SettingDefinition with fluent API
pub struct SettingDefinitionBuilder {
	key: String,
	description: Option<String>,
	allowed: Option<AllowedValues>,
	default: Option<SettingValue>,
}

impl SettingDefinitionBuilder {
	pub fn new(key: impl Into<String>) -> Self {
		Self { key: key.into(), description: None, allowed: None, default: None }
	}

	/// Set a human-readable description (optional)
	pub fn description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	/// Allow an explicit set of literal values
	pub fn allowed<I, V>(mut self, values: I) -> Self
	where
		I: IntoIterator<Item = V>,
		V: Into<SettingValue>,
	{
		self.allowed = Some(AllowedValues::List(values.into_iter().map(Into::into).collect()));
		self
	}

	/// Allow values matching a rule expression, e.g. `:range=1,5:`
	pub fn rule(mut self, spec: impl Into<String>) -> Self {
		self.allowed = Some(AllowedValues::Rule(spec.into()));
		self
	}

	/// Set the default value (required)
	pub fn default(mut self, value: impl Into<SettingValue>) -> Self {
		self.default = Some(value.into());
		self
	}

	/// Build the SettingDefinition
	pub fn build(self) -> PbResult<SettingDefinition> {
		let allowed = self.allowed.ok_or_else(|| {
			Error::ConfigError(format!("setting '{}' has no allowed-value spec", self.key))
		})?;

		// A rule-shaped spec must parse; catch typos at registration time
		if let AllowedValues::Rule(spec) = &allowed {
			if RuleExpr::parse(spec).is_none() {
				return Err(Error::ConfigError(format!(
					"'{}' is not a valid rule spec for setting '{}'",
					spec, self.key
				)));
			}
		}

		let default = self.default.ok_or_else(|| {
			Error::ConfigError(format!("setting '{}' has no default value", self.key))
		})?;

		Ok(SettingDefinition { key: self.key, description: self.description, allowed, default })
	}
}

/// Serde shape of one setting in externally loaded registry data.
#[derive(Debug, Clone, Deserialize)]
pub struct SettingSpec {
	pub allowed: AllowedValues,
	pub default: SettingValue,
	#[serde(default)]
	pub description: Option<String>,
}

/// Serde shape of a whole resource kind's registry data: key order is
/// preserved from the source document.
pub type ResourceSpec = IndexMap<String, SettingSpec>;

/// Registered settings for one resource kind.
#[derive(Debug, Clone, Default)]
pub struct ResourceConfig {
	kind: String,
	settings: IndexMap<String, SettingDefinition>,
}

impl ResourceConfig {
	pub fn new(kind: impl Into<String>) -> Self {
		Self { kind: kind.into(), settings: IndexMap::new() }
	}

	/// Build a config from externally loaded registry data. How the data
	/// got deserialized (file, database, code) is the caller's business.
	pub fn from_spec(kind: impl Into<String>, spec: ResourceSpec) -> PbResult<Self> {
		let mut config = Self::new(kind);
		for (key, setting) in spec {
			let mut builder = SettingDefinition::builder(key).default(setting.default);
			builder = match setting.allowed {
				AllowedValues::List(values) => builder.allowed(values),
				AllowedValues::Rule(rule) => builder.rule(rule),
			};
			if let Some(description) = setting.description {
				builder = builder.description(description);
			}
			config.register(builder.build()?)?;
		}
		Ok(config)
	}

	/// Register a new setting definition
	pub fn register(&mut self, def: SettingDefinition) -> PbResult<()> {
		if self.settings.contains_key(&def.key) {
			return Err(Error::ConfigError(format!(
				"setting '{}' is already registered for '{}'",
				def.key, self.kind
			)));
		}

		debug!("registering setting: {}.{}", self.kind, def.key);
		self.settings.insert(def.key.clone(), def);
		Ok(())
	}

	pub fn kind(&self) -> &str {
		&self.kind
	}

	/// Get a setting definition by key
	pub fn get(&self, key: &str) -> Option<&SettingDefinition> {
		self.settings.get(key)
	}

	/// Iterate definitions in registration order
	pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingDefinition)> {
		self.settings.iter().map(|(key, def)| (key.as_str(), def))
	}

	pub fn len(&self) -> usize {
		self.settings.len()
	}

	pub fn is_empty(&self) -> bool {
		self.settings.is_empty()
	}
}

/// Mutable registry used during app initialization
#[derive(Debug, Default)]
pub struct ConfigRegistry {
	configs: IndexMap<String, ResourceConfig>,
	rules: RuleBook,
}

impl ConfigRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a resource kind's config
	pub fn add(&mut self, config: ResourceConfig) -> PbResult<()> {
		if self.configs.contains_key(config.kind()) {
			return Err(Error::ConfigError(format!(
				"resource kind '{}' is already registered",
				config.kind()
			)));
		}

		debug!("registering resource kind: {}", config.kind());
		self.configs.insert(config.kind().to_string(), config);
		Ok(())
	}

	/// Register a user rule validator, overriding any built-in of the
	/// same name.
	pub fn register_rule<F>(&mut self, name: impl Into<String>, f: F)
	where
		F: Fn(&SettingValue, &[&str]) -> bool + Send + Sync + 'static,
	{
		self.rules.register(name, f);
	}

	/// Freeze the registry (make it immutable)
	pub fn freeze(self) -> FrozenConfigRegistry {
		info!("freezing settings registry with {} resource kinds", self.configs.len());
		FrozenConfigRegistry {
			configs: self.configs.into_iter().map(|(kind, config)| (kind, Arc::new(config))).collect(),
			rules: Arc::new(self.rules),
		}
	}

	pub fn len(&self) -> usize {
		self.configs.len()
	}

	pub fn is_empty(&self) -> bool {
		self.configs.is_empty()
	}
}

/// Immutable registry shared by all engines
#[derive(Debug, Clone)]
pub struct FrozenConfigRegistry {
	configs: IndexMap<String, Arc<ResourceConfig>>,
	rules: Arc<RuleBook>,
}

impl FrozenConfigRegistry {
	/// Config for a resource kind
	pub fn config_for(&self, kind: &str) -> Option<Arc<ResourceConfig>> {
		self.configs.get(kind).cloned()
	}

	pub fn rules(&self) -> Arc<RuleBook> {
		self.rules.clone()
	}

	/// Registered resource kinds, in registration order
	pub fn kinds(&self) -> impl Iterator<Item = &str> {
		self.configs.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.configs.len()
	}

	pub fn is_empty(&self) -> bool {
		self.configs.is_empty()
	}
}


// vim: ts=4
