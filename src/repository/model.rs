/* src/repository/model.rs */

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ThemeBrand {
	#[default]
	Default,
	Android,
}

impl ThemeBrand {
	pub const ALL: [Self; 2] = [Self::Default, Self::Android];

	/// The stored form.
	pub fn brand_name(self) -> &'static str {
		match self {
			Self::Default => "Default",
			Self::Android => "Android",
		}
	}

	/// Case-insensitive lookup by brand name. Unknown names map to
	/// [`ThemeBrand::Default`].
	pub fn parse(value: &str) -> Self {
		Self::ALL
			.into_iter()
			.find(|brand| brand.brand_name().eq_ignore_ascii_case(value.trim()))
			.unwrap_or_default()
	}
}

impl fmt::Display for ThemeBrand {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.brand_name())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DarkThemeConfig {
	#[default]
	FollowSystem,
	Light,
	Dark,
}

impl DarkThemeConfig {
	pub const ALL: [Self; 3] = [Self::FollowSystem, Self::Light, Self::Dark];

	/// Display name; also the stored form.
	pub fn config_name(self) -> &'static str {
		match self {
			Self::FollowSystem => "Follow System",
			Self::Light => "Light",
			Self::Dark => "Dark",
		}
	}

	fn constant_name(self) -> &'static str {
		match self {
			Self::FollowSystem => "FOLLOW_SYSTEM",
			Self::Light => "LIGHT",
			Self::Dark => "DARK",
		}
	}

	/// Accepts the display name or the constant-style name (`FOLLOW_SYSTEM`),
	/// ignoring case. Unknown input maps to [`DarkThemeConfig::FollowSystem`].
	pub fn parse(value: &str) -> Self {
		let value = value.trim();
		Self::ALL
			.into_iter()
			.find(|config| {
				config.config_name().eq_ignore_ascii_case(value)
					|| config.constant_name().eq_ignore_ascii_case(value)
			})
			.unwrap_or_default()
	}
}

impl fmt::Display for DarkThemeConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.config_name())
	}
}

/// Snapshot of every user preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserData {
	pub theme_brand: ThemeBrand,
	pub dark_theme_config: DarkThemeConfig,
	pub use_dynamic_color: bool,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn brand_parse() {
		assert_eq!(ThemeBrand::parse("android"), ThemeBrand::Android);
		assert_eq!(ThemeBrand::parse("Default"), ThemeBrand::Default);
		assert_eq!(ThemeBrand::parse("material"), ThemeBrand::Default);
	}

	#[test]
	fn dark_theme_parse_accepts_both_names() {
		assert_eq!(DarkThemeConfig::parse("follow system"), DarkThemeConfig::FollowSystem);
		assert_eq!(DarkThemeConfig::parse("DARK"), DarkThemeConfig::Dark);
		assert_eq!(DarkThemeConfig::parse("follow_system"), DarkThemeConfig::FollowSystem);
		assert_eq!(DarkThemeConfig::parse("Light"), DarkThemeConfig::Light);
		assert_eq!(DarkThemeConfig::parse("sepia"), DarkThemeConfig::FollowSystem);
	}
}
