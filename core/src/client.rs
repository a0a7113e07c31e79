//! Stateless request builder and response parser for the engine API.
//!
//! # Design
//! `ApiClient` holds only a `base_url`. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method that
//! consumes an `HttpResponse`; the resource modules (`configs`, `volumes`,
//! `containers`) add those methods. The caller, usually [`Docker`], executes
//! the round trip in between.
//!
//! [`Docker`]: crate::Docker

use serde::de::DeserializeOwned;
use serde::Serialize;

use url::Url;

use crate::error::{Failure, TransportError};
use crate::filters::FilterSet;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Builds engine requests and parses engine responses without touching the
/// network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// A request to `segments` below the base URL.
    ///
    /// Each segment is percent-encoded on its own (`/`, `?` and `#` included),
    /// so an ID or name always stays a single segment. Empty, `.` and `..`
    /// segments are rejected.
    pub(crate) fn request(
        &self,
        method: HttpMethod,
        segments: &[&str],
    ) -> Result<HttpRequest, Failure> {
        let invalid = |reason: String| Failure::Transport(TransportError::InvalidUrl(reason));

        if let Some(segment) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(invalid(format!("invalid path segment `{segment}`")));
        }
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| invalid(format!("{}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|()| invalid(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);

        Ok(HttpRequest {
            method,
            path: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        })
    }

    pub(crate) fn json_request<B: Serialize>(
        &self,
        method: HttpMethod,
        segments: &[&str],
        body: &B,
    ) -> Result<HttpRequest, Failure> {
        let body = serde_json::to_string(body).map_err(Failure::Encode)?;
        let mut request = self.request(method, segments)?;
        request
            .headers
            .push(("content-type".to_string(), "application/json".to_string()));
        request.body = Some(body);
        Ok(request)
    }
}

/// The `filters` query pair for a filter object.
pub(crate) fn filters_param(filters: &impl FilterSet) -> Result<(String, String), Failure> {
    let encoded = filters.encode().to_query().map_err(Failure::Encode)?;
    Ok(("filters".to_string(), encoded))
}

/// Turns non-2xx responses into a `Failure`.
pub(crate) fn check_status(response: HttpResponse) -> Result<HttpResponse, Failure> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(Failure::Status(response))
    }
}

/// Checks the status and decodes the body as `T`.
pub(crate) fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T, Failure> {
    let response = check_status(response)?;
    serde_json::from_str(&response.body).map_err(Failure::Decode)
}

/// Checks the status of a response whose body is not used.
pub(crate) fn expect_success(response: HttpResponse) -> Result<(), Failure> {
    check_status(response).map(|_| ())
}
