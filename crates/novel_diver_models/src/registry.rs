//! Backend selection, client caching and fallback.

use crate::{Backend, BackendId, BackendSettings, Credentials};
use novel_diver_error::{GenerationError, GenerationErrorKind};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Owns backend credentials and the initialized clients built from them.
///
/// Clients are built lazily and cached per [`BackendId`]; the same `Arc` is
/// handed out until [`invalidate`](Self::invalidate) or a credential change
/// drops the cache. When demo mode is on the demo backend preempts the others.
#[derive(Debug)]
pub struct BackendRegistry {
    settings: BackendSettings,
    credentials: Credentials,
    cache: HashMap<BackendId, Arc<Backend>>,
    active: Option<BackendId>,
}

impl BackendRegistry {
    /// Create a registry. No client is built until one is resolved.
    pub fn new(settings: BackendSettings, credentials: Credentials) -> Self {
        Self {
            settings,
            credentials,
            cache: HashMap::new(),
            active: None,
        }
    }

    /// Settings the registry builds clients from.
    pub fn settings(&self) -> &BackendSettings {
        &self.settings
    }

    /// Whether the demo backend is forced, by settings or credentials.
    pub fn demo_mode(&self) -> bool {
        self.settings.demo_mode || self.credentials.demo_mode()
    }

    /// Backends that have what they need to initialize, in fallback order.
    pub fn available(&self) -> Vec<BackendId> {
        BackendId::all()
            .filter(|id| match id {
                BackendId::Demo => self.demo_mode(),
                other => self.credentials.has(*other),
            })
            .collect()
    }

    /// The backend most recently returned by [`resolve`](Self::resolve).
    pub fn active(&self) -> Option<BackendId> {
        self.active
    }

    /// Cached or freshly built client for exactly `id`.
    ///
    /// # Errors
    ///
    /// Fails if `id` is not available or its client cannot be built.
    #[instrument(skip(self))]
    pub fn client(&mut self, id: BackendId) -> Result<Arc<Backend>, GenerationError> {
        if let Some(backend) = self.cache.get(&id) {
            debug!("Reusing cached backend");
            return Ok(Arc::clone(backend));
        }
        if !self.available().contains(&id) {
            return Err(GenerationError::new(GenerationErrorKind::Unavailable));
        }

        let backend = Arc::new(Backend::initialize(id, &self.settings, &self.credentials)?);
        self.cache.insert(id, Arc::clone(&backend));
        Ok(backend)
    }

    /// Pick the backend for the next generation call.
    ///
    /// Demo mode always yields the demo backend. Otherwise the preferred id
    /// (falling back to the configured preference) is tried first, then every
    /// available id in order.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationErrorKind::Unavailable`] when no backend initializes.
    #[instrument(skip(self))]
    pub fn resolve(
        &mut self,
        preferred: Option<BackendId>,
    ) -> Result<Arc<Backend>, GenerationError> {
        if self.demo_mode() {
            let backend = self.client(BackendId::Demo)?;
            self.active = Some(BackendId::Demo);
            return Ok(backend);
        }

        let preferred = preferred.unwrap_or(self.settings.preferred_backend);
        let available = self.available();

        if available.contains(&preferred) {
            match self.client(preferred) {
                Ok(backend) => {
                    info!(backend = %preferred, "Using preferred backend");
                    self.active = Some(preferred);
                    return Ok(backend);
                }
                Err(e) => warn!(backend = %preferred, error = %e, "Preferred backend failed to initialize"),
            }
        }

        for id in available.into_iter().filter(|id| *id != preferred) {
            match self.client(id) {
                Ok(backend) => {
                    info!(backend = %id, preferred = %preferred, "Falling back to available backend");
                    self.active = Some(id);
                    return Ok(backend);
                }
                Err(e) => warn!(backend = %id, error = %e, "Backend failed to initialize"),
            }
        }

        error!("No working backend available");
        self.active = None;
        Err(GenerationError::new(GenerationErrorKind::Unavailable))
    }

    /// Drop every cached client so the next resolve rebuilds it.
    pub fn invalidate(&mut self) {
        debug!(cached = self.cache.len(), "Invalidating backend cache");
        self.cache.clear();
        self.active = None;
    }

    /// Replace or clear one backend's secret and drop cached clients.
    ///
    /// The demo backend takes no secret; use [`set_demo_mode`](Self::set_demo_mode).
    pub fn set_credential(&mut self, backend: BackendId, secret: Option<String>) {
        if self.credentials.set_secret(backend, secret) {
            info!(backend = %backend, "Credential updated");
            self.invalidate();
        } else {
            warn!(backend = %backend, "Backend takes no credential");
        }
    }

    /// Enable or disable the demo backend and drop cached clients.
    pub fn set_demo_mode(&mut self, enabled: bool) {
        self.credentials = self.credentials.clone().with_demo_mode(enabled);
        self.invalidate();
    }

    /// Replace all credentials and drop cached clients.
    pub fn refresh(&mut self, credentials: Credentials) {
        self.credentials = credentials;
        self.invalidate();
        info!(available = ?self.available(), "Credentials refreshed");
    }

    /// Check a secret with a live request before storing it.
    ///
    /// The registry is left untouched when verification fails.
    ///
    /// # Errors
    ///
    /// Returns the classified provider error from the probe request.
    #[instrument(skip(self, secret))]
    pub async fn set_and_verify_credential(
        &mut self,
        backend: BackendId,
        secret: String,
    ) -> Result<(), GenerationError> {
        let mut candidate = self.credentials.clone();
        if !candidate.set_secret(backend, Some(secret.clone())) {
            return Err(GenerationError::new(GenerationErrorKind::Unknown(format!(
                "The {} backend takes no credential",
                backend
            ))));
        }

        let client = Backend::initialize(backend, &self.settings, &candidate)?;
        client.probe().await?;

        info!(backend = %backend, "Credential verified");
        self.set_credential(backend, Some(secret));
        Ok(())
    }

    /// Probe every available backend, reporting each outcome.
    #[instrument(skip(self))]
    pub async fn verify_all(&mut self) -> Vec<(BackendId, Result<(), GenerationError>)> {
        let mut results = Vec::new();
        for id in self.available() {
            let outcome = match self.client(id) {
                Ok(backend) => backend.probe().await,
                Err(e) => Err(e),
            };
            results.push((id, outcome));
        }
        results
    }
}
