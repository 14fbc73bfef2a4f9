//! Settings engine tests against an in-memory store.

mod support;

use std::sync::Arc;

use prefbag_core::{ConfigRegistry, FrozenConfigRegistry, ResourceConfig, SettingDefinition, Settings};
use prefbag_types::prelude::*;

use support::MemoryStore;

fn user_config() -> ResourceConfig {
	let mut config = ResourceConfig::new("user");
	config
		.register(
			SettingDefinition::builder("fruit")
				.allowed(vec![
					SettingValue::from("bananas"),
					SettingValue::from("grapes"),
					SettingValue::Int(8),
					SettingValue::from("monkey"),
				])
				.default("monkey")
				.build()
				.unwrap(),
		)
		.unwrap();
	config
		.register(
			SettingDefinition::builder("notify")
				.allowed([true, false])
				.default(true)
				.build()
				.unwrap(),
		)
		.unwrap();
	config
		.register(
			SettingDefinition::builder("flag")
				.description("Accepts look-alike values of every scalar type")
				.allowed(vec![
					SettingValue::Bool(true),
					SettingValue::Bool(false),
					SettingValue::from("true"),
					SettingValue::from("false"),
					SettingValue::Int(0),
					SettingValue::Int(1),
					SettingValue::from("0"),
					SettingValue::from("1"),
				])
				.default(false)
				.build()
				.unwrap(),
		)
		.unwrap();
	config
		.register(
			SettingDefinition::builder("color")
				.allowed(["red", "green", "blue"])
				.default("red")
				.build()
				.unwrap(),
		)
		.unwrap();
	config
		.register(
			SettingDefinition::builder("volume")
				.rule(":range=1,5:")
				.default(1i64)
				.build()
				.unwrap(),
		)
		.unwrap();
	config
		.register(
			SettingDefinition::builder("nickname")
				.rule(":alpha:")
				.default("anon")
				.build()
				.unwrap(),
		)
		.unwrap();
	config
}

fn registry() -> FrozenConfigRegistry {
	let mut registry = ConfigRegistry::new();
	registry.add(user_config()).unwrap();

	let mut group = ResourceConfig::new("group");
	group
		.register(
			SettingDefinition::builder("color")
				.allowed(["red", "green", "blue"])
				.default("red")
				.build()
				.unwrap(),
		)
		.unwrap();
	registry.add(group).unwrap();

	let mut comment = ResourceConfig::new("comment");
	comment
		.register(
			SettingDefinition::builder("broken")
				.rule(":nope:")
				.default(0i64)
				.build()
				.unwrap(),
		)
		.unwrap();
	comment
		.register(
			SettingDefinition::builder("checked")
				.rule(":example:")
				.default(true)
				.build()
				.unwrap(),
		)
		.unwrap();
	registry.register_rule("example", |value, _args| matches!(value, SettingValue::Bool(_)));
	registry.add(comment).unwrap();

	registry.freeze()
}

async fn engine_for(
	registry: &FrozenConfigRegistry,
	store: &Arc<MemoryStore>,
	kind: &str,
	id: i64,
) -> Settings {
	Settings::new(registry, ResourceRef::new(kind, id), store.clone() as Arc<dyn SettingsStore>)
		.await
		.unwrap()
}

#[tokio::test]
async fn fresh_resource_reads_defaults() {
	let registry = registry();
	let store = Arc::new(MemoryStore::new());
	let settings = engine_for(&registry, &store, "user", 1).await;

	assert_eq!(settings.get("fruit"), Some(&SettingValue::from("monkey")));
	assert_eq!(settings.get("notify"), Some(&SettingValue::Bool(true)));
	assert!(settings.all_saved().is_empty());
	assert_eq!(store.row_count(), 0);

	assert!(settings.is_default("fruit", &SettingValue::from("monkey")));
	assert!(!settings.is_default("fruit", &SettingValue::from("grapes")));
	assert!(settings.allowed_for("color").is_some());
	assert!(!settings.has_saved("fruit"));
}

#[tokio::test]
async fn set_persists_a_single_override_row() {
	let registry = registry();
	let store = Arc::new(MemoryStore::new());
	let mut settings = engine_for(&registry, &store, "user", 1).await;

	settings.set([("fruit", "bananas")]).await.unwrap();

	assert_eq!(settings.get("fruit"), Some(&SettingValue::from("bananas")));
	assert_eq!(settings.all_saved().get("fruit"), Some(&SettingValue::from("bananas")));
	assert_eq!(store.row_count(), 1);
}

#[tokio::test]
async fn setting_back_to_default_deletes_the_row() {
	let registry = registry();
	let store = Arc::new(MemoryStore::new());
	let mut settings = engine_for(&registry, &store, "user", 1).await;

	settings.set([("fruit", "grapes")]).await.unwrap();
	assert_eq!(store.row_count(), 1);

	settings.set([("fruit", "monkey")]).await.unwrap();
	assert_eq!(store.row_count(), 0);
	assert_eq!(settings.get("fruit"), Some(&SettingValue::from("monkey")));
	assert!(settings.all_saved().is_empty());
}

#[tokio::test]
async fn setting_a_default_never_creates_a_row() {
	let registry = registry();
	let store = Arc::new(MemoryStore::new());
	let mut settings = engine_for(&registry, &store, "user", 1).await;

	settings.set([("fruit", "monkey")]).await.unwrap();
	assert_eq!(store.row_count(), 0);
}

#[tokio::test]
async fn repeated_set_updates_in_place() {
	let registry = registry();
	let store = Arc::new(MemoryStore::new());
	let mut settings = engine_for(&registry, &store, "user", 1).await;

	settings.set([("fruit", "bananas")]).await.unwrap();
	settings.set([("fruit", "bananas")]).await.unwrap();
	settings.set([("fruit", "grapes")]).await.unwrap();

	assert_eq!(store.row_count(), 1);
	assert_eq!(settings.get("fruit"), Some(&SettingValue::from("grapes")));
}

#[tokio::test]
async fn overrides_preserve_scalar_type() {
	let registry = registry();
	let store = Arc::new(MemoryStore::new());
	let mut settings = engine_for(&registry, &store, "user", 1).await;

	settings.set([("flag", SettingValue::Bool(true))]).await.unwrap();
	assert_eq!(settings.get("flag"), Some(&SettingValue::Bool(true)));
	assert_ne!(settings.get("flag"), Some(&SettingValue::Int(1)));

	settings.set([("flag", SettingValue::Int(1))]).await.unwrap();
	assert_eq!(settings.get("flag"), Some(&SettingValue::Int(1)));
	assert_ne!(settings.get("flag"), Some(&SettingValue::Bool(true)));

	settings.set([("flag", SettingValue::from("1"))]).await.unwrap();
	assert_eq!(settings.get("flag"), Some(&SettingValue::from("1")));
	assert_ne!(settings.get("flag"), Some(&SettingValue::Int(1)));
}

#[tokio::test]
async fn rule_backed_keys_validate_through_the_rule_book() {
	let registry = registry();
	let store = Arc::new(MemoryStore::new());
	let mut settings = engine_for(&registry, &store, "user", 1).await;

	for volume in [1i64, 3, 5] {
		assert!(settings.is_valid("volume", &SettingValue::Int(volume)).unwrap());
	}
	assert!(!settings.is_valid("volume", &SettingValue::Int(0)).unwrap());
	assert!(!settings.is_valid("volume", &SettingValue::Int(6)).unwrap());

	assert!(settings.is_valid("nickname", &"abc".into()).unwrap());
	assert!(!settings.is_valid("nickname", &SettingValue::Bool(false)).unwrap());
	assert!(!settings.is_valid("nickname", &"abc123".into()).unwrap());

	settings.set([("volume", 4i64)]).await.unwrap();
	assert_eq!(settings.get_int("volume").unwrap(), 4);

	let err = settings.set([("volume", 6i64)]).await.unwrap_err();
	assert!(matches!(err, Error::InvalidValue { .. }));
}

#[tokio::test]
async fn unregistered_keys_are_invalid_and_absent() {
	let registry = registry();
	let store = Arc::new(MemoryStore::new());
	let mut settings = engine_for(&registry, &store, "user", 1).await;

	assert!(!settings.is_valid("nope", &SettingValue::Bool(true)).unwrap());
	assert!(settings.get("nope").is_none());
	assert!(!settings.is_registered("nope"));
	assert!(settings.default_for("nope").is_none());
	assert!(settings.allowed_for("nope").is_none());

	let err = settings.set([("nope", 1i64)]).await.unwrap_err();
	match err {
		Error::InvalidValue { key, .. } => assert_eq!(key, "nope"),
		other => panic!("unexpected error: {other:?}"),
	}
	assert_eq!(store.row_count(), 0);
}

#[tokio::test]
async fn resources_are_isolated_by_id_and_kind() {
	let registry = registry();
	let store = Arc::new(MemoryStore::new());
	let mut alice = engine_for(&registry, &store, "user", 1).await;
	let mut group = engine_for(&registry, &store, "group", 1).await;

	alice.set([("color", "blue")]).await.unwrap();
	group.set([("color", "green")]).await.unwrap();

	let bob = engine_for(&registry, &store, "user", 2).await;
	assert!(bob.all_saved().is_empty());
	assert_eq!(bob.get("color"), Some(&SettingValue::from("red")));

	assert_eq!(alice.get("color"), Some(&SettingValue::from("blue")));
	assert_eq!(group.get("color"), Some(&SettingValue::from("green")));
	assert_eq!(store.rows_for(&ResourceRef::new("user", 1)), 1);
	assert_eq!(store.rows_for(&ResourceRef::new("group", 1)), 1);
	assert_eq!(store.rows_for(&ResourceRef::new("user", 2)), 0);
}

#[tokio::test]
async fn invalid_value_names_the_key_and_touches_nothing() {
	let registry = registry();
	let store = Arc::new(MemoryStore::new());
	let mut settings = engine_for(&registry, &store, "user", 1).await;

	let err = settings.set([("fruit", "apples")]).await.unwrap_err();
	match err {
		Error::InvalidValue { key, value } => {
			assert_eq!(key, "fruit");
			assert!(value.contains("apples"));
		}
		other => panic!("unexpected error: {other:?}"),
	}
	assert_eq!(store.row_count(), 0);
	assert_eq!(settings.get("fruit"), Some(&SettingValue::from("monkey")));
}

#[tokio::test]
async fn keys_commit_independently_without_rollback() {
	let registry = registry();
	let store = Arc::new(MemoryStore::new());
	let mut settings = engine_for(&registry, &store, "user", 1).await;

	let err = settings
		.set([
			("fruit", SettingValue::from("bananas")),
			("color", SettingValue::from("purple")),
			("notify", SettingValue::Bool(false)),
		])
		.await
		.unwrap_err();

	// the first key stays committed, the failing key stops the loop
	match err {
		Error::InvalidValue { key, .. } => assert_eq!(key, "color"),
		other => panic!("unexpected error: {other:?}"),
	}
	assert_eq!(store.row_count(), 1);
	assert_eq!(settings.get("fruit"), Some(&SettingValue::from("bananas")));
	assert_eq!(settings.get("notify"), Some(&SettingValue::Bool(true)));
	// the view was re-synced on the error path
	assert_eq!(settings.all_saved().len(), 1);
}

#[tokio::test]
async fn color_scenario_round_trip() {
	let registry = registry();
	let store = Arc::new(MemoryStore::new());
	let mut settings = engine_for(&registry, &store, "user", 7).await;

	settings.set([("color", "blue")]).await.unwrap();
	assert_eq!(settings.get("color"), Some(&SettingValue::from("blue")));
	assert_eq!(store.row_count(), 1);

	settings.set([("color", "red")]).await.unwrap();
	assert_eq!(settings.get("color"), Some(&SettingValue::from("red")));
	assert_eq!(store.row_count(), 0);
}

#[tokio::test]
async fn reset_returns_default_and_deletes_the_row() {
	let registry = registry();
	let store = Arc::new(MemoryStore::new());
	let mut settings = engine_for(&registry, &store, "user", 1).await;

	settings.set([("color", "green")]).await.unwrap();
	let default = settings.reset("color").await.unwrap();

	assert_eq!(default, SettingValue::from("red"));
	assert_eq!(store.row_count(), 0);

	let err = settings.reset("nope").await.unwrap_err();
	assert!(matches!(err, Error::InvalidValue { .. }));
}

#[tokio::test]
async fn key_is_compares_strictly() {
	let registry = registry();
	let store = Arc::new(MemoryStore::new());
	let mut settings = engine_for(&registry, &store, "user", 1).await;

	settings.set([("flag", SettingValue::Int(1))]).await.unwrap();
	assert!(settings.key_is("flag", &SettingValue::Int(1)));
	assert!(!settings.key_is("flag", &SettingValue::Bool(true)));
	assert!(!settings.key_is("flag", &SettingValue::from("1")));
}

#[tokio::test]
async fn all_merges_defaults_with_overrides() {
	let registry = registry();
	let store = Arc::new(MemoryStore::new());
	let mut settings = engine_for(&registry, &store, "user", 1).await;

	settings.set([("notify", false)]).await.unwrap();

	let all = settings.all();
	assert_eq!(all.len(), 6);
	assert_eq!(all.get("notify"), Some(&SettingValue::Bool(false)));
	assert_eq!(all.get("fruit"), Some(&SettingValue::from("monkey")));
	// registration order survives the merge
	let keys: Vec<_> = all.keys().map(String::as_str).collect();
	assert_eq!(keys, ["fruit", "notify", "flag", "color", "volume", "nickname"]);

	let defaults = settings.all_defaults();
	assert_eq!(defaults.get("notify"), Some(&&SettingValue::Bool(true)));
	assert_eq!(settings.all_allowed().len(), 6);
}

#[tokio::test]
async fn missing_config_fails_construction() {
	let registry = registry();
	let store = Arc::new(MemoryStore::new());

	let err = Settings::new(
		&registry,
		ResourceRef::new("admin", 1),
		store.clone() as Arc<dyn SettingsStore>,
	)
	.await
	.unwrap_err();

	match err {
		Error::ConfigNotFound(kind) => assert_eq!(kind, "admin"),
		other => panic!("unexpected error: {other:?}"),
	}
}

#[tokio::test]
async fn unknown_rule_surfaces_invalid_rule() {
	let registry = registry();
	let store = Arc::new(MemoryStore::new());
	let mut settings = engine_for(&registry, &store, "comment", 1).await;

	let err = settings.is_valid("broken", &"test".into()).unwrap_err();
	match err {
		Error::InvalidRule { name } => assert_eq!(name, "nope"),
		other => panic!("unexpected error: {other:?}"),
	}

	let err = settings.set([("broken", 1i64)]).await.unwrap_err();
	assert!(matches!(err, Error::InvalidRule { .. }));
	assert_eq!(store.row_count(), 0);
}

#[tokio::test]
async fn user_defined_rules_validate_settings() {
	let registry = registry();
	let store = Arc::new(MemoryStore::new());
	let mut settings = engine_for(&registry, &store, "comment", 1).await;

	settings.set([("checked", false)]).await.unwrap();
	assert_eq!(settings.get("checked"), Some(&SettingValue::Bool(false)));

	let err = settings.set([("checked", 1i64)]).await.unwrap_err();
	assert!(matches!(err, Error::InvalidValue { .. }));
}

#[tokio::test]
async fn sync_picks_up_writes_from_another_engine() {
	let registry = registry();
	let store = Arc::new(MemoryStore::new());
	let mut writer = engine_for(&registry, &store, "user", 1).await;
	let mut reader = engine_for(&registry, &store, "user", 1).await;

	writer.set([("color", "blue")]).await.unwrap();
	assert_eq!(reader.get("color"), Some(&SettingValue::from("red")));

	reader.sync().await.unwrap();
	assert_eq!(reader.get("color"), Some(&SettingValue::from("blue")));
}

#[tokio::test]
async fn typed_getters_check_the_resolved_type() {
	let registry = registry();
	let store = Arc::new(MemoryStore::new());
	let mut settings = engine_for(&registry, &store, "user", 1).await;

	assert!(settings.get_bool("notify").unwrap());
	assert_eq!(settings.get_int("volume").unwrap(), 1);
	assert_eq!(settings.get_string("nickname").unwrap(), "anon");

	assert!(matches!(settings.get_bool("volume"), Err(Error::ValidationError(_))));
	assert!(matches!(settings.get_int("nope"), Err(Error::NotFound)));

	settings.set([("flag", SettingValue::from("0"))]).await.unwrap();
	assert_eq!(settings.get_string("flag").unwrap(), "0");
	assert!(matches!(settings.get_int("flag"), Err(Error::ValidationError(_))));
}

// vim: ts=4
