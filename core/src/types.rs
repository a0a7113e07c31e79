//! Engine data contracts.
//!
//! # Design
//! These mirror the engine's JSON representations, using its PascalCase field
//! names. The client only interprets a handful of fields (filters, labels,
//! config data, versions); everything else passes through. Unset optional
//! fields are skipped when serializing and unknown fields are kept in `extra`
//! so that payloads survive a decode/encode cycle unchanged.

mod config;
mod container;
mod volume;

pub use self::config::*;
pub use self::container::*;
pub use self::volume::*;

use serde::{Deserialize, Serialize};

/// Response to a call that returns just an ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdResponse {
    /// The ID of the newly created object.
    #[serde(rename = "ID", alias = "Id")]
    pub id: String,
}

/// Extra JSON fields not modelled by a type.
pub type Extra = serde_json::Map<String, serde_json::Value>;

/// String key/value metadata.
pub type Labels = std::collections::HashMap<String, String>;
