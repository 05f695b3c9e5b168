use std::sync::Arc;

use anyhow::{Context, Result};
use marquee_application::{DiscoveryEngine, ExplorerUseCase, ScopedStore, SessionManager};
use marquee_core::config::{ConfigFile, DEFAULT_LOG_LEVEL, MarqueeConfig};
use marquee_core::session::StaticCredentialSource;
use marquee_infrastructure::{ConfigService, FileKeyValueStore, MarqueePaths, TmdbCatalogClient};
use tracing_appender::non_blocking::WorkerGuard;

use crate::logging;

/// Wiring shared by every command.
///
/// The session side needs no catalog key, so account and favorites-listing
/// commands work before one is configured.
pub struct App {
    layers: ConfigFile,
    session: Arc<SessionManager>,
    _log_guard: Option<WorkerGuard>,
}

impl App {
    pub async fn bootstrap() -> Result<Self> {
        let layers = ConfigService::new()
            .load_layers()
            .context("Failed to read configuration")?;
        let paths = MarqueePaths::new(layers.data_dir.clone());

        let logs_dir = paths.logs_dir().ok();
        let level = layers.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL);
        let log_guard = logging::init_logger(level, logs_dir.as_deref());

        let backing = FileKeyValueStore::from_paths(&paths).context("Failed to locate data directory")?;
        tracing::debug!("Using store {}", backing.path().display());
        let store = Arc::new(ScopedStore::new(Arc::new(backing)));
        let session =
            Arc::new(SessionManager::restore(store, Arc::new(StaticCredentialSource::demo())).await);

        Ok(Self {
            layers,
            session,
            _log_guard: log_guard,
        })
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// Builds the explorer; fails when no catalog key is configured.
    pub fn explorer(&self) -> Result<ExplorerUseCase> {
        let config = MarqueeConfig::resolve(self.layers.clone())?;
        let client = Arc::new(TmdbCatalogClient::new(&config));
        let engine = Arc::new(DiscoveryEngine::new(client));
        Ok(ExplorerUseCase::new(engine, self.session.clone()))
    }
}
