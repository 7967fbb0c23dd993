/* tests/config_tests.rs */

#![cfg(feature = "toml")]

use std::sync::Arc;

use reactive_prefs::config::{AnyFormat, Format};
use reactive_prefs::{
	ConfigError, DataStoreConfig, DataStoreFactory, EvictionPolicy, MemorySettings, OverflowPolicy,
	Serialization, SerializationStrategy, TomlSerialization,
};
use serde::{Deserialize, Serialize};

#[tokio::test]
async fn test_load_toml_file() -> Result<(), Box<dyn std::error::Error>> {
	let dir = tempfile::tempdir()?;
	let path = dir.path().join("store.toml");
	std::fs::write(
		&path,
		r#"
cache_size = 32
eviction = "access_order"

[notifier]
replay = 1
overflow = "drop_newest"
"#,
	)?;

	let config = DataStoreConfig::load(&path).await?;
	assert_eq!(config.cache_size, 32);
	assert_eq!(config.eviction, EvictionPolicy::AccessOrder);
	assert_eq!(config.notifier.replay, 1);
	assert_eq!(config.notifier.overflow, OverflowPolicy::DropNewest);
	assert_eq!(config.notifier.extra_buffer_capacity, 64);

	let store = DataStoreFactory::new()
		.settings(Arc::new(MemorySettings::new()))
		.config(config)
		.build()?;
	assert_eq!(store.notifier().config().replay, 1);
	Ok(())
}

#[tokio::test]
async fn test_load_rejects_unknown_extension() -> Result<(), Box<dyn std::error::Error>> {
	let dir = tempfile::tempdir()?;
	let path = dir.path().join("store.ini");
	std::fs::write(&path, "cache_size = 1")?;

	let err = DataStoreConfig::load(&path).await.unwrap_err();
	assert!(matches!(err, ConfigError::UnknownFormat(_)));
	Ok(())
}

#[test]
fn test_invalid_toml_config() {
	let err = DataStoreConfig::from_toml("cache_size = 0").unwrap_err();
	assert!(matches!(err, ConfigError::Validation(_)));
	assert_eq!(AnyFormat::from_extension("toml"), Some(AnyFormat::Toml));
	assert_eq!(AnyFormat::Toml.extensions(), &["toml"]);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Palette {
	name: String,
	accent: u32,
}

#[tokio::test]
async fn test_toml_serialization_strategy() -> Result<(), Box<dyn std::error::Error>> {
	let store = DataStoreFactory::new()
		.settings(Arc::new(MemorySettings::new()))
		.serialization(Serialization::Toml(TomlSerialization))
		.build()?;
	let palette = Palette {
		name: "ocean".into(),
		accent: 0x0077ff,
	};

	store.put_serializable_value("palette", &palette).await?;
	store.invalidate_all_cache()?;
	let fallback = Palette {
		name: String::new(),
		accent: 0,
	};
	assert_eq!(store.get_serializable_value("palette", fallback).await?, palette);

	let encoded = TomlSerialization.serialize(&palette)?;
	assert!(encoded.contains("name = \"ocean\""));
	Ok(())
}
