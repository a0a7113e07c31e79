//! Folds operation failures into [`ErrorResponse`] values.
//!
//! Every operation is identified by an [`Endpoint`]. Engine statuses with a
//! well known meaning for that endpoint get a fixed message from
//! [`OVERRIDES`]; everything else keeps the HTTP reason phrase.

use std::fmt;

use crate::error::{ErrorResponse, Failure};

/// The code used when no HTTP status is available.
pub const FALLBACK_CODE: u16 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Config,
    Container,
    Volume,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Config => "config",
            Resource::Container => "container",
            Resource::Volume => "volume",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Create,
    Inspect,
    Update,
    Delete,
    Prune,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Create => "create",
            Operation::Inspect => "inspect",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Prune => "prune",
        }
    }
}

/// A resource and verb pair, e.g. `config.inspect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub resource: Resource,
    pub operation: Operation,
}

impl Endpoint {
    pub const fn new(resource: Resource, operation: Operation) -> Self {
        Self {
            resource,
            operation,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.resource.as_str(), self.operation.as_str())
    }
}

const SERVER_ERROR: &str = "Server error.";
const NOT_IN_SWARM: &str = "Node is not part of a swarm.";

/// Status messages keyed by endpoint and status code.
pub const OVERRIDES: &[(Resource, Operation, u16, &str)] = &[
    (Resource::Config, Operation::List, 503, NOT_IN_SWARM),
    (Resource::Config, Operation::Create, 409, "Name conflicts with an existing object."),
    (Resource::Config, Operation::Create, 500, SERVER_ERROR),
    (Resource::Config, Operation::Create, 503, NOT_IN_SWARM),
    (Resource::Config, Operation::Inspect, 404, "Config not found."),
    (Resource::Config, Operation::Inspect, 500, SERVER_ERROR),
    (Resource::Config, Operation::Inspect, 503, NOT_IN_SWARM),
    (Resource::Config, Operation::Delete, 404, "Config not found."),
    (Resource::Config, Operation::Delete, 500, SERVER_ERROR),
    (Resource::Config, Operation::Delete, 503, NOT_IN_SWARM),
    (Resource::Config, Operation::Update, 400, "Bad parameter."),
    (Resource::Config, Operation::Update, 404, "No such config."),
    (Resource::Config, Operation::Update, 500, SERVER_ERROR),
    (Resource::Config, Operation::Update, 503, NOT_IN_SWARM),
    (Resource::Container, Operation::List, 404, "Could not find any container"),
    (Resource::Volume, Operation::List, 404, "Could not find any volumes."),
    (Resource::Volume, Operation::Inspect, 404, "No such volume."),
    (Resource::Volume, Operation::Inspect, 500, SERVER_ERROR),
    (Resource::Volume, Operation::Delete, 404, "No such volume or volume driver."),
    (Resource::Volume, Operation::Delete, 409, "Volume is in use and cannot be removed."),
    (Resource::Volume, Operation::Delete, 500, SERVER_ERROR),
];

/// Looks up the fixed message for `status` on `endpoint`.
pub fn override_message(endpoint: Endpoint, status: u16) -> Option<&'static str> {
    OVERRIDES
        .iter()
        .find(|(resource, operation, code, _)| {
            *resource == endpoint.resource && *operation == endpoint.operation && *code == status
        })
        .map(|(_, _, _, message)| *message)
}

/// Maps a failure of `endpoint` to the error returned to the caller.
pub fn normalize(endpoint: Endpoint, failure: &Failure) -> ErrorResponse {
    match failure {
        Failure::Status(response) => {
            let code = match http::StatusCode::from_u16(response.status) {
                Ok(_) => response.status,
                Err(_) => FALLBACK_CODE,
            };
            let message = override_message(endpoint, code)
                .or_else(|| response.reason())
                .map(str::to_string)
                .unwrap_or_else(|| failure.to_string());
            ErrorResponse {
                code,
                message,
                description: response.engine_message(),
            }
        }
        other => ErrorResponse {
            code: FALLBACK_CODE,
            message: other.to_string(),
            description: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::http::HttpResponse;

    const CONFIG_INSPECT: Endpoint = Endpoint::new(Resource::Config, Operation::Inspect);
    const CONTAINER_LIST: Endpoint = Endpoint::new(Resource::Container, Operation::List);

    fn status(code: u16, body: &str) -> Failure {
        Failure::Status(HttpResponse {
            status: code,
            headers: Vec::new(),
            body: body.to_string(),
        })
    }

    #[test]
    fn same_status_different_endpoint() {
        let config = normalize(CONFIG_INSPECT, &status(404, ""));
        let container = normalize(CONTAINER_LIST, &status(404, ""));
        assert_eq!(
            config,
            ErrorResponse {
                code: 404,
                message: "Config not found.".to_string(),
                description: None,
            }
        );
        assert_eq!(
            container,
            ErrorResponse {
                code: 404,
                message: "Could not find any container".to_string(),
                description: None,
            }
        );
    }

    #[test]
    fn engine_message_becomes_description() {
        let err = normalize(
            CONFIG_INSPECT,
            &status(404, r#"{"message":"config nope not found"}"#),
        );
        assert_eq!(err.message, "Config not found.");
        assert_eq!(err.description.as_deref(), Some("config nope not found"));
    }

    #[test]
    fn unlisted_status_keeps_reason_phrase() {
        let err = normalize(CONTAINER_LIST, &status(500, ""));
        assert_eq!(err.code, 500);
        assert_eq!(err.message, "Internal Server Error");

        let err = normalize(Endpoint::new(Resource::Volume, Operation::Create), &status(409, ""));
        assert_eq!(err.message, "Conflict");
    }

    #[test]
    fn unknown_reason_falls_back_to_failure_text() {
        let err = normalize(CONTAINER_LIST, &status(599, ""));
        assert_eq!(err.code, 599);
        assert_eq!(err.message, "engine responded with status 599");
    }

    #[test]
    fn invalid_status_fails_closed() {
        let err = normalize(CONFIG_INSPECT, &status(42, ""));
        assert_eq!(err.code, FALLBACK_CODE);
        assert_eq!(err.message, "Server error.");
    }

    #[test]
    fn transport_failure_is_500() {
        let failure = Failure::from(TransportError::Connect("connection refused".to_string()));
        let err = normalize(CONFIG_INSPECT, &failure);
        assert_eq!(err.code, 500);
        assert_eq!(err.message, "failed to connect to the engine: connection refused");
        assert!(err.description.is_none());

        let failure = Failure::from(TransportError::Timeout("deadline elapsed".to_string()));
        assert_eq!(normalize(CONTAINER_LIST, &failure).code, 500);
    }

    #[test]
    fn decode_failure_is_500_without_override() {
        let source = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = normalize(CONFIG_INSPECT, &Failure::Decode(source));
        assert_eq!(err.code, 500);
        assert!(err.message.starts_with("failed to decode response body"));
    }

    #[test]
    fn endpoint_display() {
        assert_eq!(CONFIG_INSPECT.to_string(), "config.inspect");
        assert_eq!(
            Endpoint::new(Resource::Volume, Operation::Prune).to_string(),
            "volume.prune"
        );
    }

    #[test]
    fn overrides_are_unique() {
        for (i, a) in OVERRIDES.iter().enumerate() {
            for b in &OVERRIDES[i + 1..] {
                assert!(
                    !(a.0 == b.0 && a.1 == b.1 && a.2 == b.2),
                    "duplicate override for {:?} {:?} {}",
                    a.0,
                    a.1,
                    a.2
                );
            }
        }
    }
}
