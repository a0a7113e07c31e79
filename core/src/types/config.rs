use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use super::{Extra, Labels};
use crate::filters::{FilterSet, FilterValue};

/// A swarm config object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Config {
    #[serde(rename = "ID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<ObjectVersion>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<ConfigSpec>,

    #[serde(flatten)]
    pub extra: Extra,
}

impl Config {
    /// The object version to send along with an update.
    pub fn version_index(&self) -> Option<u64> {
        self.version.as_ref().and_then(|version| version.index)
    }

    pub fn name(&self) -> Option<&str> {
        self.spec.as_ref().map(|spec| spec.name.as_str())
    }
}

/// The version number of an object, used to guard against conflicting
/// writes. Two updates based on the same version cannot both succeed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ObjectVersion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConfigSpec {
    /// User-defined name of the config.
    pub name: String,

    /// Always present on the wire, `null` when unset.
    #[serde(default)]
    pub labels: Option<Labels>,

    /// Config data. Raw text when passed to `create`; base64 (RFC 4648) in
    /// everything the engine returns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,

    /// Templating driver, if the payload should be evaluated as a template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templating: Option<Driver>,

    #[serde(flatten)]
    pub extra: Extra,
}

impl ConfigSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels
            .get_or_insert_with(Labels::default)
            .insert(key.into(), value.into());
        self
    }

    /// A copy with `labels` replaced, keeping every other field as is.
    ///
    /// The engine rejects config updates that change anything but labels, so
    /// an update body is usually an inspected spec passed through this.
    pub fn with_labels(&self, labels: Labels) -> Self {
        Self {
            labels: Some(labels),
            ..self.clone()
        }
    }

    /// Decodes the base64 `Data` returned by the engine.
    pub fn decoded_data(&self) -> Option<Result<Vec<u8>, base64::DecodeError>> {
        self.data.as_deref().map(|data| STANDARD.decode(data))
    }

    /// A copy whose `Data` is base64 encoded for the wire.
    pub(crate) fn encoded(&self) -> Self {
        Self {
            data: self.data.as_deref().map(|data| STANDARD.encode(data)),
            ..self.clone()
        }
    }
}

/// A driver reference (network, logging, secrets, templating).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Driver {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Labels>,
}

/// Filters for listing configs.
///
/// * `id=<config id>`
/// * `label=<key>` or `label=<key>=<value>`
/// * `name=<config name>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFilters {
    pub id: Vec<String>,
    pub label: Vec<String>,
    pub name: Vec<String>,
}

impl FilterSet for ConfigFilters {
    const RECOGNIZED: &'static [&'static str] = &["id", "label", "name"];

    fn values(&self) -> Vec<(&'static str, FilterValue)> {
        vec![
            ("id", self.id.clone().into()),
            ("label", self.label.clone().into()),
            ("name", self.name.clone().into()),
        ]
    }
}

/// A version-guarded config update.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigUpdateParams {
    /// ID or name of the config.
    pub id: String,

    /// The version of the config being updated, as last read.
    pub version: u64,

    /// The new spec. Only `Labels` may differ from the current one.
    pub spec: ConfigSpec,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_data_decodes_back() {
        let spec = ConfigSpec::new("c1").data("Hello from config-1");
        let wire = spec.encoded();
        assert_eq!(wire.data.as_deref(), Some("SGVsbG8gZnJvbSBjb25maWctMQ=="));
        assert_eq!(
            wire.decoded_data().unwrap().unwrap(),
            b"Hello from config-1".to_vec()
        );
        assert_eq!(wire.name, "c1");
    }

    #[test]
    fn missing_data_stays_missing() {
        let spec = ConfigSpec::new("c1").encoded();
        assert!(spec.data.is_none());
        assert!(spec.decoded_data().is_none());
    }

    #[test]
    fn config_round_trips_unknown_fields() {
        let raw = serde_json::json!({
            "ID": "ktnbjxoalbkvbvedmg1urrz8h",
            "Version": {"Index": 11},
            "CreatedAt": "2016-11-05T01:20:17.327670065Z",
            "UpdatedAt": "2016-11-05T01:20:17.327670065Z",
            "Spec": {
                "Name": "app-dev.crt",
                "Labels": {"foo": "bar"},
                "Data": "aGk=",
                "Templating": {"Name": "golang"}
            },
            "Future": true
        });
        let config: Config = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(config.version_index(), Some(11));
        assert_eq!(config.name(), Some("app-dev.crt"));
        assert_eq!(serde_json::to_value(&config).unwrap(), raw);
    }

    #[test]
    fn spec_keeps_null_labels() {
        let raw = serde_json::json!({
            "ID": "ktnbjxoalbkvbvedmg1urrz8h",
            "Version": {"Index": 11},
            "Spec": {"Name": "plain", "Labels": null, "Data": "aGk="}
        });
        let config: Config = serde_json::from_value(raw.clone()).unwrap();
        assert!(config.spec.as_ref().unwrap().labels.is_none());
        assert_eq!(serde_json::to_value(&config).unwrap(), raw);
    }

    #[test]
    fn with_labels_keeps_the_rest() {
        let spec = ConfigSpec::new("c1").data("aGk=").label("nope", "label1");
        let mut labels = Labels::new();
        labels.insert("nope".to_string(), "new value".to_string());
        let updated = spec.with_labels(labels.clone());
        assert_eq!(updated.labels, Some(labels));
        assert_eq!(updated.data, spec.data);
        assert_eq!(updated.name, spec.name);
    }

    #[test]
    fn config_filters_encode_only_set_keys() {
        let filters = ConfigFilters {
            name: vec!["list-Config1".to_string()],
            ..Default::default()
        };
        assert_eq!(
            filters.encode().to_query().unwrap(),
            r#"{"name":["list-Config1"]}"#
        );
    }
}
