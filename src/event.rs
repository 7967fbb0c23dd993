/* src/event.rs */

use std::time::SystemTime;

use crate::value::PrefValue;

/// Key carried by store-wide events. Per-key observers also match it.
pub const WILDCARD_KEY: &str = "*";

/// Events published after a successful mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEvent {
	/// A value was written under a key that was absent.
	ValueAdded {
		key: String,
		value: Option<PrefValue>,
		timestamp: SystemTime,
	},
	/// An existing value was overwritten.
	ValueUpdated {
		key: String,
		old_value: Option<PrefValue>,
		new_value: Option<PrefValue>,
		timestamp: SystemTime,
	},
	/// A key was removed.
	ValueRemoved {
		key: String,
		old_value: Option<PrefValue>,
		timestamp: SystemTime,
	},
	/// Every key was removed.
	StoreCleared { timestamp: SystemTime },
}

impl ChangeEvent {
	pub fn added(key: impl Into<String>, value: Option<PrefValue>) -> Self {
		Self::ValueAdded {
			key: key.into(),
			value,
			timestamp: SystemTime::now(),
		}
	}

	pub fn updated(
		key: impl Into<String>,
		old_value: Option<PrefValue>,
		new_value: Option<PrefValue>,
	) -> Self {
		Self::ValueUpdated {
			key: key.into(),
			old_value,
			new_value,
			timestamp: SystemTime::now(),
		}
	}

	pub fn removed(key: impl Into<String>, old_value: Option<PrefValue>) -> Self {
		Self::ValueRemoved {
			key: key.into(),
			old_value,
			timestamp: SystemTime::now(),
		}
	}

	pub fn cleared() -> Self {
		Self::StoreCleared {
			timestamp: SystemTime::now(),
		}
	}

	/// The affected key, or [`WILDCARD_KEY`] for [`ChangeEvent::StoreCleared`].
	pub fn key(&self) -> &str {
		match self {
			Self::ValueAdded { key, .. }
			| Self::ValueUpdated { key, .. }
			| Self::ValueRemoved { key, .. } => key,
			Self::StoreCleared { .. } => WILDCARD_KEY,
		}
	}

	pub fn timestamp(&self) -> SystemTime {
		match self {
			Self::ValueAdded { timestamp, .. }
			| Self::ValueUpdated { timestamp, .. }
			| Self::ValueRemoved { timestamp, .. }
			| Self::StoreCleared { timestamp } => *timestamp,
		}
	}

	/// True if observers of `key` should see this event.
	pub fn concerns(&self, key: &str) -> bool {
		let own = self.key();
		own == key || own == WILDCARD_KEY
	}
}
