//! Application state management

use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::label::{LabelGeometry, LabelRenderer};
use crate::service::LabelService;
use crate::storage::{LocalPublisher, Publisher};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pub config: Config,
    pub labels: LabelService,
    pub local: Option<LocalPublisher>,
}

impl AppState {
    /// Create the state around an already-built publisher.
    ///
    /// `local` is the local publisher when that is the active backend; it
    /// enables serving stored files back under `/files`.
    pub fn new(config: Config, publisher: Arc<dyn Publisher>, local: Option<LocalPublisher>) -> Self {
        let renderer = LabelRenderer::new(LabelGeometry::default(), config.label.caption);

        Self {
            inner: Arc::new(AppStateInner {
                labels: LabelService::new(renderer, publisher),
                config,
                local,
            }),
        }
    }

    /// State backed by a local publisher
    pub fn with_local_publisher(config: Config, local: LocalPublisher) -> Self {
        let publisher: Arc<dyn Publisher> = Arc::new(local.clone());
        Self::new(config, publisher, Some(local))
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the label pipeline
    pub fn labels(&self) -> &LabelService {
        &self.inner.labels
    }

    /// Directory of locally published files, if local publishing is active
    pub fn local_dir(&self) -> Option<&Path> {
        self.inner.local.as_ref().map(|local| local.dir())
    }
}
