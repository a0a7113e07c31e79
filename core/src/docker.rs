//! The client facade.
//!
//! # Design
//! `Docker` binds an [`ApiClient`] to a [`Transport`] and a failure hook. The
//! resource handles returned by [`Docker::config()`], [`Docker::volume()`] and
//! [`Docker::container()`] run every operation through [`Docker::call`], the
//! one place where failures are logged and normalized. Nothing here is
//! mutable, so a `Docker` can be cloned and shared freely, and any number of
//! differently configured clients can live in one process.

use std::fmt;
use std::sync::Arc;

use tracing::{error, warn};

use crate::client::ApiClient;
use crate::configs::Configs;
use crate::containers::Containers;
use crate::error::{ErrorResponse, Failure, TransportError};
use crate::http::{HttpRequest, HttpResponse};
use crate::normalize::{normalize, Endpoint};
use crate::settings::ClientConfig;
use crate::transport::{ReqwestTransport, Transport};
use crate::volumes::Volumes;

/// Called once for every failed operation, before the failure is normalized.
pub type FailureHook = Arc<dyn Fn(Endpoint, &Failure) + Send + Sync>;

/// Errors while setting up a [`Docker`] from the default configuration.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("failed to load client configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// A client for the engine API.
#[derive(Clone)]
pub struct Docker {
    api: ApiClient,
    transport: Arc<dyn Transport>,
    on_failure: FailureHook,
}

impl Docker {
    /// Creates a client using [`ReqwestTransport`] with the given settings.
    pub fn connect(config: &ClientConfig) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::with_timeout(config.timeout())?;
        Ok(Self::with_transport(&config.base_url, transport))
    }

    /// Creates a client from [`ClientConfig::load()`].
    pub fn with_defaults() -> Result<Self, SetupError> {
        let config = ClientConfig::load()?;
        Ok(Self::connect(&config)?)
    }

    /// Creates a client that sends its requests through `transport`.
    pub fn with_transport(base_url: &str, transport: impl Transport + 'static) -> Self {
        Self {
            api: ApiClient::new(base_url),
            transport: Arc::new(transport),
            on_failure: Arc::new(log_failure),
        }
    }

    /// Replaces the failure hook. The default is [`log_failure`].
    pub fn on_failure(mut self, hook: impl Fn(Endpoint, &Failure) + Send + Sync + 'static) -> Self {
        self.on_failure = Arc::new(hook);
        self
    }

    /// The request builder and response parser used by this client.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn config(&self) -> Configs<'_> {
        Configs::new(self)
    }

    pub fn volume(&self) -> Volumes<'_> {
        Volumes::new(self)
    }

    pub fn container(&self) -> Containers<'_> {
        Containers::new(self)
    }

    /// Executes `request` and parses the response, normalizing any failure.
    pub(crate) async fn call<T>(
        &self,
        endpoint: Endpoint,
        request: Result<HttpRequest, Failure>,
        parse: impl FnOnce(HttpResponse) -> Result<T, Failure>,
    ) -> Result<T, ErrorResponse> {
        let result = match request {
            Ok(request) => match self.transport.execute(request).await {
                Ok(response) => parse(response),
                Err(err) => Err(Failure::Transport(err)),
            },
            Err(failure) => Err(failure),
        };

        result.map_err(|failure| {
            (self.on_failure)(endpoint, &failure);
            normalize(endpoint, &failure)
        })
    }
}

impl fmt::Debug for Docker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Docker")
            .field("base_url", &self.api.base_url())
            .finish_non_exhaustive()
    }
}

/// The default failure hook: logs the failure by category.
pub fn log_failure(endpoint: Endpoint, failure: &Failure) {
    if failure.is_connect() {
        error!(
            "{endpoint}: could not reach the engine, is its API exposed at the configured address? ({failure})"
        );
    } else if failure.status() == Some(404) {
        warn!("{endpoint}: engine returned 404 Not Found");
    } else {
        error!("{endpoint}: {failure}");
    }
}
