/* src/settings/file.rs */

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{MemorySettings, Settings, SettingsError};
use crate::value::PrefValue;

/// A settings backend persisted as a JSON document.
///
/// Values are kept in memory and the whole document is rewritten after each
/// mutation. Writes go to a sibling temp file which is then renamed over the
/// target, so a crash never leaves a half-written document behind.
pub struct FileSettings {
	path: PathBuf,
	memory: MemorySettings,
	// Serializes flushes so two writers never race on the temp file.
	flush_lock: Mutex<()>,
}

impl FileSettings {
	/// Opens the document at `path`, creating an empty one on first write.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
		let path = path.into();
		let entries = match fs::read(&path) {
			Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => HashMap::new(),
			Ok(bytes) => {
				let doc: BTreeMap<String, PrefValue> = serde_json::from_slice(&bytes)
					.map_err(|e| SettingsError::Corrupt(format!("{}: {e}", path.display())))?;
				doc.into_iter().collect()
			}
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
			Err(e) => return Err(SettingsError::Io(e)),
		};

		tracing::debug!("Opened settings file {:?} with {} entries", path, entries.len());

		Ok(Self {
			path,
			memory: MemorySettings::with_entries(entries),
			flush_lock: Mutex::new(()),
		})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	fn flush(&self) -> Result<(), SettingsError> {
		let _guard = self
			.flush_lock
			.lock()
			.map_err(|_| SettingsError::Unavailable("flush lock poisoned".to_string()))?;

		let doc: BTreeMap<String, PrefValue> = self
			.memory
			.snapshot()
			.iter()
			.map(|(k, v)| (k.clone(), v.clone()))
			.collect();
		let bytes =
			serde_json::to_vec_pretty(&doc).map_err(|e| SettingsError::Corrupt(e.to_string()))?;

		if let Some(parent) = self.path.parent()
			&& !parent.as_os_str().is_empty()
		{
			fs::create_dir_all(parent)?;
		}

		let tmp = self.path.with_extension("json.tmp");
		{
			let mut file = fs::File::create(&tmp)?;
			file.write_all(&bytes)?;
			file.sync_all()?;
		}
		fs::rename(&tmp, &self.path)?;
		Ok(())
	}

	/// Applies `value` and persists it, restoring the previous entry if the
	/// document cannot be written.
	fn store(&self, key: &str, value: PrefValue) -> Result<(), SettingsError> {
		let previous = self.memory.put_raw(key, value);
		self.flush().inspect_err(|e| {
			tracing::warn!("Failed to persist {} to {:?}, rolling back: {}", key, self.path, e);
			match previous {
				Some(old) => {
					self.memory.put_raw(key, old);
				}
				None => {
					self.memory.remove_raw(key);
				}
			}
		})
	}
}

impl Settings for FileSettings {
	fn get_int(&self, key: &str, default: i32) -> Result<i32, SettingsError> {
		self.memory.get_int(key, default)
	}

	fn put_int(&self, key: &str, value: i32) -> Result<(), SettingsError> {
		self.store(key, PrefValue::Int(value))
	}

	fn get_long(&self, key: &str, default: i64) -> Result<i64, SettingsError> {
		self.memory.get_long(key, default)
	}

	fn put_long(&self, key: &str, value: i64) -> Result<(), SettingsError> {
		self.store(key, PrefValue::Long(value))
	}

	fn get_float(&self, key: &str, default: f32) -> Result<f32, SettingsError> {
		self.memory.get_float(key, default)
	}

	fn put_float(&self, key: &str, value: f32) -> Result<(), SettingsError> {
		self.store(key, PrefValue::Float(value))
	}

	fn get_double(&self, key: &str, default: f64) -> Result<f64, SettingsError> {
		self.memory.get_double(key, default)
	}

	fn put_double(&self, key: &str, value: f64) -> Result<(), SettingsError> {
		self.store(key, PrefValue::Double(value))
	}

	fn get_bool(&self, key: &str, default: bool) -> Result<bool, SettingsError> {
		self.memory.get_bool(key, default)
	}

	fn put_bool(&self, key: &str, value: bool) -> Result<(), SettingsError> {
		self.store(key, PrefValue::Bool(value))
	}

	fn get_string(&self, key: &str, default: &str) -> Result<String, SettingsError> {
		self.memory.get_string(key, default)
	}

	fn put_string(&self, key: &str, value: &str) -> Result<(), SettingsError> {
		self.store(key, PrefValue::Str(value.to_string()))
	}

	fn has_key(&self, key: &str) -> Result<bool, SettingsError> {
		self.memory.has_key(key)
	}

	fn remove(&self, key: &str) -> Result<(), SettingsError> {
		let Some(removed) = self.memory.remove_raw(key) else {
			return Ok(());
		};
		self.flush().inspect_err(|e| {
			tracing::warn!("Failed to persist removal of {} from {:?}, rolling back: {}", key, self.path, e);
			self.memory.put_raw(key, removed);
		})
	}

	fn clear(&self) -> Result<(), SettingsError> {
		let before = self.memory.snapshot();
		self.memory.clear()?;
		self.flush().inspect_err(|e| {
			tracing::warn!("Failed to persist clear of {:?}, rolling back: {}", self.path, e);
			self.memory.replace_all((*before).clone());
		})
	}

	fn keys(&self) -> Result<BTreeSet<String>, SettingsError> {
		self.memory.keys()
	}

	fn size(&self) -> Result<usize, SettingsError> {
		self.memory.size()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn values_survive_reopen() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("prefs.json");

		let settings = FileSettings::open(&path).unwrap();
		settings.put_int("count", 3).unwrap();
		settings.put_long("big", 1 << 40).unwrap();
		settings.put_string("name", "neo").unwrap();
		drop(settings);

		let reopened = FileSettings::open(&path).unwrap();
		assert_eq!(reopened.get_int("count", 0).unwrap(), 3);
		assert_eq!(reopened.get_long("big", 0).unwrap(), 1 << 40);
		assert_eq!(reopened.get_string("name", "").unwrap(), "neo");
	}

	#[test]
	fn removal_is_persisted() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("prefs.json");

		let settings = FileSettings::open(&path).unwrap();
		settings.put_bool("flag", true).unwrap();
		settings.remove("flag").unwrap();

		let reopened = FileSettings::open(&path).unwrap();
		assert!(!reopened.has_key("flag").unwrap());
	}

	#[test]
	fn extreme_floats_survive_reopen() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("prefs.json");

		let settings = FileSettings::open(&path).unwrap();
		settings.put_string("name", "ada").unwrap();
		settings.put_double("nan", f64::NAN).unwrap();
		settings.put_double("inf", f64::INFINITY).unwrap();
		settings.put_float("neg_inf", f32::NEG_INFINITY).unwrap();
		settings.put_float("tiny", f32::MIN_POSITIVE).unwrap();
		settings.put_double("max", f64::MAX).unwrap();
		drop(settings);

		let reopened = FileSettings::open(&path).unwrap();
		assert_eq!(reopened.get_string("name", "").unwrap(), "ada");
		assert!(reopened.get_double("nan", 0.0).unwrap().is_nan());
		assert_eq!(reopened.get_double("inf", 0.0).unwrap(), f64::INFINITY);
		assert_eq!(reopened.get_float("neg_inf", 0.0).unwrap(), f32::NEG_INFINITY);
		assert_eq!(reopened.get_float("tiny", 0.0).unwrap(), f32::MIN_POSITIVE);
		assert_eq!(reopened.get_double("max", 0.0).unwrap(), f64::MAX);
	}

	#[test]
	fn failed_flush_rolls_back_memory() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("blocker").join("prefs.json");

		let settings = FileSettings::open(&path).unwrap();
		settings.put_int("kept", 1).unwrap();
		settings.put_int("gone", 2).unwrap();

		// Replace the parent directory with a regular file.
		fs::remove_dir_all(dir.path().join("blocker")).unwrap();
		fs::write(dir.path().join("blocker"), b"").unwrap();

		assert!(settings.put_int("new", 5).is_err());
		assert!(!settings.has_key("new").unwrap());

		assert!(settings.put_int("kept", 9).is_err());
		assert_eq!(settings.get_int("kept", 0).unwrap(), 1);

		assert!(settings.remove("gone").is_err());
		assert_eq!(settings.get_int("gone", 0).unwrap(), 2);

		assert!(settings.clear().is_err());
		assert_eq!(settings.size().unwrap(), 2);
	}

	#[test]
	fn garbage_file_is_corrupt() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("prefs.json");
		fs::write(&path, b"not json").unwrap();

		assert!(matches!(
			FileSettings::open(&path),
			Err(SettingsError::Corrupt(_))
		));
	}
}
