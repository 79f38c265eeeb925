//! Startup selection between an externally supplied scene bundle and the
//! built-in viewport

pub mod bundle;
pub mod module;

use std::fmt;

use shared::SceneBundle;

use crate::error::ViewportError;
use crate::state::settings::ViewportSettings;
use crate::viewport::controller::Surface;

pub use bundle::BundleModule;
pub use module::{BuiltinModule, SceneModule};

/// Loader progress shown in the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    LoadingPublic,
    LoadedPublic,
    LoadingFallback,
    LoadedFallback,
    Error(String),
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadStatus::Loading => write!(f, "loading"),
            LoadStatus::LoadingPublic => write!(f, "loading public bundle..."),
            LoadStatus::LoadedPublic => write!(f, "loaded public bundle"),
            LoadStatus::LoadingFallback => write!(f, "loading fallback module..."),
            LoadStatus::LoadedFallback => write!(f, "loaded fallback module"),
            LoadStatus::Error(msg) => write!(f, "error: {}", msg),
        }
    }
}

/// Where an external scene bundle may be found
#[allow(async_fn_in_trait)]
pub trait ModuleSource {
    /// Existence check; any failure counts as absent
    async fn probe(&self) -> bool;

    async fn fetch(&self) -> Result<SceneBundle, ViewportError>;
}

/// Bundle served over HTTP as JSON
pub struct HttpModuleSource {
    client: reqwest::Client,
    url: String,
}

impl HttpModuleSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ModuleSource for HttpModuleSource {
    async fn probe(&self) -> bool {
        match self.client.head(&self.url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!("Bundle probe {} failed: {e}", self.url);
                false
            }
        }
    }

    async fn fetch(&self) -> Result<SceneBundle, ViewportError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ViewportError::ModuleLoad(e.to_string()))?;
        response
            .json::<SceneBundle>()
            .await
            .map_err(|e| ViewportError::ModuleLoad(e.to_string()))
    }
}

enum Selection {
    Public(SceneBundle),
    Fallback,
}

/// Chooses a renderer once at startup and hosts it for the session
pub struct SceneLoader {
    status: LoadStatus,
    selection: Option<Selection>,
    module: Option<Box<dyn SceneModule>>,
}

impl Default for SceneLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneLoader {
    pub fn new() -> Self {
        Self {
            status: LoadStatus::Loading,
            selection: None,
            module: None,
        }
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// Probe `source` and fetch its bundle if present; otherwise pick the
    /// built-in viewport. A failed fetch leaves the loader in the error state.
    pub async fn select<S: ModuleSource>(&mut self, source: Option<&S>) {
        if let Some(source) = source {
            if source.probe().await {
                self.status = LoadStatus::LoadingPublic;
                match source.fetch().await {
                    Ok(bundle) => self.selection = Some(Selection::Public(bundle)),
                    Err(e) => self.abort(e),
                }
                return;
            }
        }
        self.status = LoadStatus::LoadingFallback;
        self.selection = Some(Selection::Fallback);
    }

    /// Create the selected module on `surface`. No-op once a module is running.
    pub fn init(&mut self, surface: Surface, settings: ViewportSettings) -> Result<(), ViewportError> {
        if self.module.is_some() {
            return Ok(());
        }
        let Some(selection) = self.selection.take() else {
            let err = match &self.status {
                LoadStatus::Error(msg) => ViewportError::ModuleLoad(msg.clone()),
                _ => ViewportError::ModuleLoad("no module selected".into()),
            };
            return Err(err);
        };

        let (result, loaded) = match selection {
            Selection::Public(bundle) => (
                BundleModule::new(bundle, settings)
                    .map(|m| Box::new(m) as Box<dyn SceneModule>),
                LoadStatus::LoadedPublic,
            ),
            Selection::Fallback => (
                Ok(Box::new(BuiltinModule::new(settings)) as Box<dyn SceneModule>),
                LoadStatus::LoadedFallback,
            ),
        };

        let mut module = match result {
            Ok(m) => m,
            Err(e) => {
                self.abort(e.clone());
                return Err(e);
            }
        };
        if let Err(e) = module.init(surface) {
            self.abort(e.clone());
            return Err(e);
        }
        tracing::info!("Scene module '{}' initialized", module.name());
        self.module = Some(module);
        self.status = loaded;
        Ok(())
    }

    pub fn module(&self) -> Option<&dyn SceneModule> {
        self.module.as_deref()
    }

    pub fn module_mut(&mut self) -> Option<&mut (dyn SceneModule + 'static)> {
        self.module.as_deref_mut()
    }

    /// True when no module can ever run this session
    pub fn is_failed(&self) -> bool {
        matches!(self.status, LoadStatus::Error(_))
    }

    pub fn destroy(&mut self) {
        if let Some(module) = self.module.as_mut() {
            module.destroy();
        }
    }

    /// Give up for this session, recording `err` as the status
    pub fn abort(&mut self, err: ViewportError) {
        tracing::error!("Failed to load scene module: {err}");
        self.selection = None;
        self.status = LoadStatus::Error(err.to_string());
    }
}
