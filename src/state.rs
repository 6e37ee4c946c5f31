use crate::cache::CacheProbe;
use crate::config::Config;
use crate::mount::MountDir;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// A fresh probe for each request; connections are not reused
    pub fn cache_probe(&self) -> CacheProbe {
        CacheProbe::from_config(&self.config)
    }

    pub fn mount_dir(&self) -> MountDir {
        MountDir::new(self.config.mount_path.clone())
    }
}
