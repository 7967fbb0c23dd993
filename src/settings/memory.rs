/* src/settings/memory.rs */

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use arc_swap::ArcSwap;

use super::{Settings, SettingsError};
use crate::value::{PrefValue, ValueKind};

/// In-memory settings backend.
///
/// Uses the RCU (Read-Copy-Update) pattern: reads load a snapshot without
/// locking, writes swap in a modified copy of the map.
pub struct MemorySettings {
	inner: ArcSwap<HashMap<String, PrefValue>>,
}

impl MemorySettings {
	pub fn new() -> Self {
		Self {
			inner: ArcSwap::from_pointee(HashMap::new()),
		}
	}

	/// Creates a backend pre-populated with `entries`.
	pub fn with_entries(entries: impl IntoIterator<Item = (String, PrefValue)>) -> Self {
		Self {
			inner: ArcSwap::from_pointee(entries.into_iter().collect()),
		}
	}

	/// Returns the raw value stored under `key`.
	pub fn get_raw(&self, key: &str) -> Option<PrefValue> {
		self.inner.load().get(key).cloned()
	}

	/// Returns an atomic snapshot of all entries.
	pub fn snapshot(&self) -> Arc<HashMap<String, PrefValue>> {
		self.inner.load_full()
	}

	/// Stores `value` and returns what it replaced.
	pub fn put_raw(&self, key: &str, value: PrefValue) -> Option<PrefValue> {
		// Capture the previous entry inside rcu so retries see the right one.
		let previous: RefCell<Option<PrefValue>> = RefCell::new(None);
		self.inner.rcu(|map| {
			*previous.borrow_mut() = map.get(key).cloned();
			let mut next = (**map).clone();
			next.insert(key.to_string(), value.clone());
			next
		});
		previous.into_inner()
	}

	/// Removes `key` and returns what it held.
	pub fn remove_raw(&self, key: &str) -> Option<PrefValue> {
		// Pre-check to avoid cloning the map for absent keys.
		if !self.inner.load().contains_key(key) {
			return None;
		}
		let removed: RefCell<Option<PrefValue>> = RefCell::new(None);
		self.inner.rcu(|map| {
			let mut next = (**map).clone();
			*removed.borrow_mut() = next.remove(key);
			next
		});
		removed.into_inner()
	}

	/// Replaces every entry at once.
	pub fn replace_all(&self, entries: HashMap<String, PrefValue>) {
		self.inner.store(Arc::new(entries));
	}

	fn typed<T>(
		&self,
		key: &str,
		default: T,
		expected: ValueKind,
		pick: impl FnOnce(&PrefValue) -> Option<T>,
	) -> Result<T, SettingsError> {
		let snapshot = self.inner.load();
		match snapshot.get(key) {
			None => Ok(default),
			Some(value) => pick(value).ok_or_else(|| SettingsError::TypeMismatch {
				key: key.to_string(),
				expected,
				found: value.kind(),
			}),
		}
	}
}

impl Default for MemorySettings {
	fn default() -> Self {
		Self::new()
	}
}

impl Settings for MemorySettings {
	fn get_int(&self, key: &str, default: i32) -> Result<i32, SettingsError> {
		self.typed(key, default, ValueKind::Int, |v| match v {
			PrefValue::Int(i) => Some(*i),
			_ => None,
		})
	}

	fn put_int(&self, key: &str, value: i32) -> Result<(), SettingsError> {
		self.put_raw(key, PrefValue::Int(value));
		Ok(())
	}

	fn get_long(&self, key: &str, default: i64) -> Result<i64, SettingsError> {
		self.typed(key, default, ValueKind::Long, |v| match v {
			PrefValue::Long(l) => Some(*l),
			_ => None,
		})
	}

	fn put_long(&self, key: &str, value: i64) -> Result<(), SettingsError> {
		self.put_raw(key, PrefValue::Long(value));
		Ok(())
	}

	fn get_float(&self, key: &str, default: f32) -> Result<f32, SettingsError> {
		self.typed(key, default, ValueKind::Float, |v| match v {
			PrefValue::Float(f) => Some(*f),
			_ => None,
		})
	}

	fn put_float(&self, key: &str, value: f32) -> Result<(), SettingsError> {
		self.put_raw(key, PrefValue::Float(value));
		Ok(())
	}

	fn get_double(&self, key: &str, default: f64) -> Result<f64, SettingsError> {
		self.typed(key, default, ValueKind::Double, |v| match v {
			PrefValue::Double(d) => Some(*d),
			_ => None,
		})
	}

	fn put_double(&self, key: &str, value: f64) -> Result<(), SettingsError> {
		self.put_raw(key, PrefValue::Double(value));
		Ok(())
	}

	fn get_bool(&self, key: &str, default: bool) -> Result<bool, SettingsError> {
		self.typed(key, default, ValueKind::Bool, |v| match v {
			PrefValue::Bool(b) => Some(*b),
			_ => None,
		})
	}

	fn put_bool(&self, key: &str, value: bool) -> Result<(), SettingsError> {
		self.put_raw(key, PrefValue::Bool(value));
		Ok(())
	}

	fn get_string(&self, key: &str, default: &str) -> Result<String, SettingsError> {
		self.typed(key, default.to_string(), ValueKind::Str, |v| match v {
			// Encoded structured values live in string slots too.
			PrefValue::Str(s) | PrefValue::Serialized(s) => Some(s.clone()),
			_ => None,
		})
	}

	fn put_string(&self, key: &str, value: &str) -> Result<(), SettingsError> {
		self.put_raw(key, PrefValue::Str(value.to_string()));
		Ok(())
	}

	fn has_key(&self, key: &str) -> Result<bool, SettingsError> {
		Ok(self.inner.load().contains_key(key))
	}

	fn remove(&self, key: &str) -> Result<(), SettingsError> {
		self.remove_raw(key);
		Ok(())
	}

	fn clear(&self) -> Result<(), SettingsError> {
		self.inner.store(Arc::new(HashMap::new()));
		Ok(())
	}

	fn keys(&self) -> Result<BTreeSet<String>, SettingsError> {
		Ok(self.inner.load().keys().cloned().collect())
	}

	fn size(&self) -> Result<usize, SettingsError> {
		Ok(self.inner.load().len())
	}
}
