/* tests/store_tests.rs */

mod common;

use std::sync::Arc;

use common::{BrokenCache, ProbeSettings};
use reactive_prefs::{
	CachedPreferencesStore, CachedValue, LruCacheManager, MemorySettings, PrefValue, Settings, StoreError,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Window {
	width: u32,
	height: u32,
	title: String,
}

fn probed() -> (Arc<ProbeSettings>, CachedPreferencesStore) {
	let settings = Arc::new(ProbeSettings::default());
	let store = CachedPreferencesStore::new(settings.clone());
	(settings, store)
}

#[tokio::test]
async fn test_cached_read_skips_backend() -> Result<(), Box<dyn std::error::Error>> {
	let (settings, store) = probed();
	store.put_value("volume", 7).await?;
	store.put_value("name", "ada".to_string()).await?;

	settings.fail_reads(true);
	let reads = settings.reads.load(std::sync::atomic::Ordering::SeqCst);

	assert_eq!(store.get_value("volume", 0).await?, 7);
	assert_eq!(store.get_value("name", String::new()).await?, "ada");
	assert_eq!(settings.reads.load(std::sync::atomic::Ordering::SeqCst), reads);
	Ok(())
}

#[tokio::test]
async fn test_invalid_keys_never_reach_backend() {
	let (settings, store) = probed();
	let long = "k".repeat(256);

	for key in [long.as_str(), "nul\0byte", "", "  "] {
		assert!(matches!(
			store.put_value(key, 1).await,
			Err(StoreError::InvalidKey { .. })
		));
		assert!(matches!(
			store.get_value(key, 1).await,
			Err(StoreError::InvalidKey { .. })
		));
		assert!(matches!(
			store.has_key(key).await,
			Err(StoreError::InvalidKey { .. })
		));
		assert!(matches!(
			store.remove_value(key).await,
			Err(StoreError::InvalidKey { .. })
		));
		assert!(matches!(
			store.get_serializable_value(key, 0u8).await,
			Err(StoreError::InvalidKey { .. })
		));
	}
	assert_eq!(settings.calls(), 0);
}

#[tokio::test]
async fn test_oversized_string_is_rejected_before_io() {
	let (settings, store) = probed();
	let result = store.put_value("bio", "x".repeat(10_001)).await;
	assert!(matches!(result, Err(StoreError::InvalidValue(_))));
	assert_eq!(settings.calls(), 0);
}

#[tokio::test]
async fn test_oversized_serializable_is_rejected_before_io() {
	let (settings, store) = probed();
	let result = store
		.put_serializable_value("bio", &"x".repeat(20_000))
		.await;
	assert!(matches!(result, Err(StoreError::InvalidValue(_))));
	assert_eq!(settings.calls(), 0);
}

#[tokio::test]
async fn test_primitives_round_trip_through_backend() -> Result<(), Box<dyn std::error::Error>> {
	let (_, store) = probed();
	store.put_value("i", -42i32).await?;
	store.put_value("l", 1i64 << 40).await?;
	store.put_value("f", 1.25f32).await?;
	store.put_value("d", 0.1f64).await?;
	store.put_value("b", true).await?;
	store.put_value("s", "héllo".to_string()).await?;
	store.invalidate_all_cache()?;

	assert_eq!(store.get_value("i", 0i32).await?, -42);
	assert_eq!(store.get_value("l", 0i64).await?, 1 << 40);
	assert_eq!(store.get_value("f", 0f32).await?, 1.25);
	assert_eq!(store.get_value("d", 0f64).await?, 0.1);
	assert!(store.get_value("b", false).await?);
	assert_eq!(store.get_value("s", String::new()).await?, "héllo");
	Ok(())
}

#[tokio::test]
async fn test_serializable_round_trip() -> Result<(), Box<dyn std::error::Error>> {
	let (_, store) = probed();
	let window = Window {
		width: 1280,
		height: 720,
		title: "main".into(),
	};
	store.put_serializable_value("window", &window).await?;
	store.invalidate_cache("window")?;

	let fallback = Window {
		width: 0,
		height: 0,
		title: String::new(),
	};
	assert_eq!(store.get_serializable_value("window", fallback).await?, window);
	Ok(())
}

#[tokio::test]
async fn test_corrupted_data_falls_back_without_caching() -> Result<(), Box<dyn std::error::Error>> {
	let settings = Arc::new(MemorySettings::new());
	let store = CachedPreferencesStore::new(settings.clone());
	settings.put_string("window", "{\"width\": oops")?;

	let fallback = Window {
		width: 800,
		height: 600,
		title: "default".into(),
	};
	assert_eq!(
		store.get_serializable_value("window", fallback.clone()).await?,
		fallback
	);
	assert_eq!(store.cache_size()?, 0);

	settings.put_raw(
		"window",
		PrefValue::Str(r#"{"width": 1, "height": 2, "title": "fixed"}"#.into()),
	);
	let repaired = store.get_serializable_value("window", fallback).await?;
	assert_eq!(repaired.title, "fixed");
	Ok(())
}

#[tokio::test]
async fn test_lru_evicts_earliest_inserted() -> Result<(), Box<dyn std::error::Error>> {
	let settings = Arc::new(MemorySettings::new());
	let store =
		CachedPreferencesStore::new(settings).with_cache(Arc::new(LruCacheManager::<CachedValue>::new(3)));
	for (i, key) in ["a", "b", "c", "d"].into_iter().enumerate() {
		store.put_value(key, i as i32).await?;
	}

	assert_eq!(store.cache_size()?, 3);
	// Evicted from the cache only; the backend still answers.
	assert_eq!(store.get_value("a", -1).await?, 0);
	Ok(())
}

#[tokio::test]
async fn test_backend_write_failure_propagates() {
	let (settings, store) = probed();
	settings.fail_writes(true);

	let err = store.put_value("k", 1).await.unwrap_err();
	assert!(matches!(err, StoreError::Backend(_)));
	assert_eq!(store.cache_size().unwrap(), 0);
}

#[tokio::test]
async fn test_cache_faults_do_not_fail_operations() -> Result<(), Box<dyn std::error::Error>> {
	let settings = Arc::new(MemorySettings::new());
	let store = CachedPreferencesStore::new(settings.clone()).with_cache(Arc::new(BrokenCache));

	store.put_value("k", 5).await?;
	assert_eq!(settings.get_raw("k"), Some(PrefValue::Int(5)));
	assert_eq!(store.get_value("k", 0).await?, 5);
	assert!(store.has_key("k").await?);
	store.remove_value("k").await?;
	store.clear_all().await?;

	assert!(matches!(store.cache_size(), Err(StoreError::Cache(_))));
	Ok(())
}

#[tokio::test]
async fn test_type_mismatch_reports_unsupported_type() -> Result<(), Box<dyn std::error::Error>> {
	let (_, store) = probed();
	store.put_value("flag", true).await?;

	// The cached bool does not satisfy an int read, so the backend decides.
	let err = store.get_value("flag", 0i32).await.unwrap_err();
	match err {
		StoreError::UnsupportedType {
			requested, stored, ..
		} => {
			assert_eq!(requested.to_string(), "int");
			assert_eq!(stored.to_string(), "bool");
		}
		other => panic!("unexpected error: {other}"),
	}
	Ok(())
}

#[tokio::test]
async fn test_inspection() -> Result<(), Box<dyn std::error::Error>> {
	let (_, store) = probed();
	store.put_value("b", 1).await?;
	store.put_value("a", 2).await?;

	let keys: Vec<_> = store.all_keys().await?.into_iter().collect();
	assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
	assert_eq!(store.size().await?, 2);
	assert!(!store.has_key("c").await?);
	Ok(())
}
