/* src/repository/user.rs */

use async_trait::async_trait;
use futures_util::StreamExt;
use futures_util::stream::BoxStream;

use super::{DarkThemeConfig, PreferencesRepository, ThemeBrand, UserData};
use crate::error::Result;
use crate::observer::{combine_latest, distinct_until_changed};

pub const THEME_BRAND_KEY: &str = "theme_brand";
pub const DARK_THEME_CONFIG_KEY: &str = "dark_theme_config";
pub const DYNAMIC_COLOR_KEY: &str = "use_dynamic_color";

/// Typed access to the user's appearance settings.
#[async_trait]
pub trait UserPreferencesRepository: Send + Sync {
	/// All settings combined; re-emits when any of them changes.
	fn user_data(&self) -> BoxStream<'static, UserData>;

	async fn set_theme_brand(&self, brand: ThemeBrand) -> Result<()>;
	async fn theme_brand(&self) -> Result<ThemeBrand>;
	fn observe_theme_brand(&self) -> BoxStream<'static, ThemeBrand>;

	async fn set_dark_theme_config(&self, config: DarkThemeConfig) -> Result<()>;
	async fn dark_theme_config(&self) -> Result<DarkThemeConfig>;
	fn observe_dark_theme_config(&self) -> BoxStream<'static, DarkThemeConfig>;

	async fn set_dynamic_color_preference(&self, enabled: bool) -> Result<()>;
	async fn dynamic_color_preference(&self) -> Result<bool>;
	fn observe_dynamic_color_preference(&self) -> BoxStream<'static, bool>;

	/// Writes every default in turn. Stops at the first failure, leaving
	/// earlier writes applied.
	async fn reset_to_defaults(&self) -> Result<()>;

	async fn export_preferences(&self) -> Result<UserData>;

	/// Writes every field of `data` in turn. Stops at the first failure,
	/// leaving earlier writes applied.
	async fn import_preferences(&self, data: &UserData) -> Result<()>;
}

/// [`UserPreferencesRepository`] backed by a [`PreferencesRepository`].
#[derive(Debug, Clone)]
pub struct UserPreferences {
	preferences: PreferencesRepository,
}

impl UserPreferences {
	pub fn new(preferences: PreferencesRepository) -> Self {
		Self { preferences }
	}
}

#[async_trait]
impl UserPreferencesRepository for UserPreferences {
	fn user_data(&self) -> BoxStream<'static, UserData> {
		let appearance = combine_latest(self.observe_theme_brand(), self.observe_dark_theme_config());
		let combined = combine_latest(appearance, self.observe_dynamic_color_preference())
			.map(|((theme_brand, dark_theme_config), use_dynamic_color)| UserData {
				theme_brand,
				dark_theme_config,
				use_dynamic_color,
			})
			.boxed();
		distinct_until_changed(combined)
	}

	async fn set_theme_brand(&self, brand: ThemeBrand) -> Result<()> {
		self.preferences
			.save_preference(THEME_BRAND_KEY, brand.brand_name().to_string())
			.await
	}

	async fn theme_brand(&self) -> Result<ThemeBrand> {
		let name = self
			.preferences
			.get_preference(THEME_BRAND_KEY, ThemeBrand::default().brand_name().to_string())
			.await?;
		Ok(ThemeBrand::parse(&name))
	}

	fn observe_theme_brand(&self) -> BoxStream<'static, ThemeBrand> {
		self.preferences
			.observe_preference(THEME_BRAND_KEY, ThemeBrand::default().brand_name().to_string())
			.map(|name| ThemeBrand::parse(&name))
			.boxed()
	}

	async fn set_dark_theme_config(&self, config: DarkThemeConfig) -> Result<()> {
		self.preferences
			.save_preference(DARK_THEME_CONFIG_KEY, config.config_name().to_string())
			.await
	}

	async fn dark_theme_config(&self) -> Result<DarkThemeConfig> {
		let name = self
			.preferences
			.get_preference(
				DARK_THEME_CONFIG_KEY,
				DarkThemeConfig::default().config_name().to_string(),
			)
			.await?;
		Ok(DarkThemeConfig::parse(&name))
	}

	fn observe_dark_theme_config(&self) -> BoxStream<'static, DarkThemeConfig> {
		self.preferences
			.observe_preference(
				DARK_THEME_CONFIG_KEY,
				DarkThemeConfig::default().config_name().to_string(),
			)
			.map(|name| DarkThemeConfig::parse(&name))
			.boxed()
	}

	async fn set_dynamic_color_preference(&self, enabled: bool) -> Result<()> {
		self.preferences.save_preference(DYNAMIC_COLOR_KEY, enabled).await
	}

	async fn dynamic_color_preference(&self) -> Result<bool> {
		self.preferences.get_preference(DYNAMIC_COLOR_KEY, false).await
	}

	fn observe_dynamic_color_preference(&self) -> BoxStream<'static, bool> {
		self.preferences.observe_preference(DYNAMIC_COLOR_KEY, false)
	}

	async fn reset_to_defaults(&self) -> Result<()> {
		self.import_preferences(&UserData::default()).await
	}

	async fn export_preferences(&self) -> Result<UserData> {
		Ok(UserData {
			theme_brand: self.theme_brand().await?,
			dark_theme_config: self.dark_theme_config().await?,
			use_dynamic_color: self.dynamic_color_preference().await?,
		})
	}

	async fn import_preferences(&self, data: &UserData) -> Result<()> {
		self.set_theme_brand(data.theme_brand).await?;
		self.set_dark_theme_config(data.dark_theme_config).await?;
		self.set_dynamic_color_preference(data.use_dynamic_color).await?;
		tracing::debug!("Imported user preferences: {:?}", data);
		Ok(())
	}
}
