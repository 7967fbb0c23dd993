/* tests/common/mod.rs */

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use reactive_prefs::{CacheError, CacheManager, CachedValue, MemorySettings, Settings, SettingsError};

/// Wraps [`MemorySettings`], counting every call and optionally failing them.
#[derive(Default)]
pub struct ProbeSettings {
	pub inner: MemorySettings,
	pub reads: AtomicUsize,
	pub writes: AtomicUsize,
	pub fail_reads: AtomicBool,
	pub fail_writes: AtomicBool,
}

impl ProbeSettings {
	pub fn calls(&self) -> usize {
		self.reads.load(Ordering::SeqCst) + self.writes.load(Ordering::SeqCst)
	}

	pub fn fail_reads(&self, fail: bool) {
		self.fail_reads.store(fail, Ordering::SeqCst);
	}

	pub fn fail_writes(&self, fail: bool) {
		self.fail_writes.store(fail, Ordering::SeqCst);
	}

	fn read(&self) -> Result<(), SettingsError> {
		self.reads.fetch_add(1, Ordering::SeqCst);
		if self.fail_reads.load(Ordering::SeqCst) {
			return Err(SettingsError::Unavailable("reads disabled".into()));
		}
		Ok(())
	}

	fn write(&self) -> Result<(), SettingsError> {
		self.writes.fetch_add(1, Ordering::SeqCst);
		if self.fail_writes.load(Ordering::SeqCst) {
			return Err(SettingsError::Unavailable("writes disabled".into()));
		}
		Ok(())
	}
}

impl Settings for ProbeSettings {
	fn get_int(&self, key: &str, default: i32) -> Result<i32, SettingsError> {
		self.read()?;
		self.inner.get_int(key, default)
	}

	fn put_int(&self, key: &str, value: i32) -> Result<(), SettingsError> {
		self.write()?;
		self.inner.put_int(key, value)
	}

	fn get_long(&self, key: &str, default: i64) -> Result<i64, SettingsError> {
		self.read()?;
		self.inner.get_long(key, default)
	}

	fn put_long(&self, key: &str, value: i64) -> Result<(), SettingsError> {
		self.write()?;
		self.inner.put_long(key, value)
	}

	fn get_float(&self, key: &str, default: f32) -> Result<f32, SettingsError> {
		self.read()?;
		self.inner.get_float(key, default)
	}

	fn put_float(&self, key: &str, value: f32) -> Result<(), SettingsError> {
		self.write()?;
		self.inner.put_float(key, value)
	}

	fn get_double(&self, key: &str, default: f64) -> Result<f64, SettingsError> {
		self.read()?;
		self.inner.get_double(key, default)
	}

	fn put_double(&self, key: &str, value: f64) -> Result<(), SettingsError> {
		self.write()?;
		self.inner.put_double(key, value)
	}

	fn get_bool(&self, key: &str, default: bool) -> Result<bool, SettingsError> {
		self.read()?;
		self.inner.get_bool(key, default)
	}

	fn put_bool(&self, key: &str, value: bool) -> Result<(), SettingsError> {
		self.write()?;
		self.inner.put_bool(key, value)
	}

	fn get_string(&self, key: &str, default: &str) -> Result<String, SettingsError> {
		self.read()?;
		self.inner.get_string(key, default)
	}

	fn put_string(&self, key: &str, value: &str) -> Result<(), SettingsError> {
		self.write()?;
		self.inner.put_string(key, value)
	}

	fn has_key(&self, key: &str) -> Result<bool, SettingsError> {
		self.read()?;
		self.inner.has_key(key)
	}

	fn remove(&self, key: &str) -> Result<(), SettingsError> {
		self.write()?;
		self.inner.remove(key)
	}

	fn clear(&self) -> Result<(), SettingsError> {
		self.write()?;
		self.inner.clear()
	}

	fn keys(&self) -> Result<BTreeSet<String>, SettingsError> {
		self.read()?;
		self.inner.keys()
	}

	fn size(&self) -> Result<usize, SettingsError> {
		self.read()?;
		self.inner.size()
	}
}

/// A cache that refuses every operation.
pub struct BrokenCache;

impl CacheManager<CachedValue> for BrokenCache {
	fn put(&self, key: &str, _value: CachedValue) -> Result<(), CacheError> {
		Err(CacheError::Rejected { key: key.to_string() })
	}

	fn get(&self, key: &str) -> Result<Option<CachedValue>, CacheError> {
		Err(CacheError::Rejected { key: key.to_string() })
	}

	fn remove(&self, key: &str) -> Result<Option<CachedValue>, CacheError> {
		Err(CacheError::Rejected { key: key.to_string() })
	}

	fn clear(&self) -> Result<(), CacheError> {
		Err(CacheError::Poisoned)
	}

	fn size(&self) -> Result<usize, CacheError> {
		Err(CacheError::Poisoned)
	}

	fn contains_key(&self, key: &str) -> Result<bool, CacheError> {
		Err(CacheError::Rejected { key: key.to_string() })
	}
}
