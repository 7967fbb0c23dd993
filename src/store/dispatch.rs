/* src/store/dispatch.rs */

use std::sync::Arc;

use tokio::runtime::Handle;

use crate::error::{Result, StoreError};
use crate::settings::{Settings, SettingsError};

/// Where backend calls run.
#[derive(Debug, Clone, Default)]
pub enum Dispatch {
	/// On the calling task.
	#[default]
	Inline,
	/// On the blocking thread pool of the given runtime.
	Blocking(Handle),
}

impl Dispatch {
	/// Uses the blocking pool of the runtime this is called from.
	pub fn blocking_current() -> Option<Self> {
		Handle::try_current().ok().map(Self::Blocking)
	}

	pub(crate) async fn run<R, F>(&self, settings: &Arc<dyn Settings>, op: F) -> Result<R>
	where
		F: FnOnce(&dyn Settings) -> std::result::Result<R, SettingsError> + Send + 'static,
		R: Send + 'static,
	{
		match self {
			Self::Inline => op(settings.as_ref()).map_err(StoreError::from),
			Self::Blocking(handle) => {
				let settings = Arc::clone(settings);
				handle
					.spawn_blocking(move || op(settings.as_ref()))
					.await
					.map_err(|e| StoreError::Dispatch(e.to_string()))?
					.map_err(StoreError::from)
			}
		}
	}
}
