//! Typed async client for the container engine remote API.
//!
//! # Overview
//! Covers configs (list, create, inspect, update, delete), volumes (list,
//! create, inspect, delete, prune) and container listing. Every operation
//! returns either its payload or an [`ErrorResponse`]; transport failures,
//! non-2xx statuses and malformed bodies are all folded into that one shape.
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use dockr_core::{ConfigFilters, ConfigSpec, Docker};
//!
//! let docker = Docker::with_defaults()?;
//! let id = docker
//!     .config()
//!     .create(&ConfigSpec::new("app.conf").data("listen 8080"))
//!     .await?;
//! let configs = docker.config().list(&ConfigFilters::default()).await?;
//! println!("{} configs, created {}", configs.len(), id.id);
//! # Ok(())
//! # }
//! ```
//!
//! # Design
//! - `ApiClient` is sans-IO: `build_*` produces an `HttpRequest`, `parse_*`
//!   consumes an `HttpResponse`.
//! - `Docker` runs those through a `Transport` (reqwest by default), logs
//!   failures through a hook and normalizes them with one status-override
//!   table keyed by resource, operation and status.
//! - Filters are encoded by a single encoder that drops unset keys.

pub mod client;
pub mod configs;
pub mod containers;
pub mod docker;
pub mod error;
pub mod filters;
pub mod http;
pub mod normalize;
pub mod settings;
pub mod transport;
pub mod types;
pub mod volumes;

pub use client::ApiClient;
pub use docker::{log_failure, Docker, FailureHook, SetupError};
pub use error::{Done, ErrorResponse, Failure, TransportError};
pub use filters::{EncodedFilters, FilterSet, FilterValue};
pub use self::http::{HttpMethod, HttpRequest, HttpResponse};
pub use normalize::{normalize, Endpoint, Operation, Resource};
pub use settings::ClientConfig;
pub use transport::{ReqwestTransport, Transport};
pub use types::*;
