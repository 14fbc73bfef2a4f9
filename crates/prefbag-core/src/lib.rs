//! Settings resolution and persistence engine.
//!
//! Resources (users, groups, posts, ...) own named settings. Each key is
//! registered per resource kind with an allowed-value spec and a default;
//! reads merge persisted overrides with defaults, writes validate first
//! and then converge the store row-by-row. Persistence goes through the
//! `SettingsStore` trait from `prefbag-types`; this crate knows nothing
//! about concrete stores.

pub mod cache;
pub mod engine;
pub mod registry;
pub mod rules;

pub use cache::SettingsCache;
pub use engine::Settings;
pub use registry::{
	AllowedValues, ConfigRegistry, FrozenConfigRegistry, ResourceConfig, ResourceSpec,
	SettingDefinition, SettingDefinitionBuilder, SettingSpec,
};
pub use rules::{RuleBook, RuleExpr, RuleFn};

// vim: ts=4
