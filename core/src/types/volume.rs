use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{Extra, Labels};
use crate::filters::{FilterSet, FilterValue};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Volume {
    pub name: String,

    /// Name of the volume driver used by the volume.
    pub driver: String,

    /// Mount path of the volume on the host.
    pub mountpoint: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    /// Low-level details provided by the volume driver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<HashMap<String, serde_json::Value>>,

    /// Always present on the wire, `null` when the volume has no labels.
    #[serde(default)]
    pub labels: Option<Labels>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<VolumeScope>,

    /// The driver specific options used when creating the volume. Always
    /// present on the wire, like `labels`.
    #[serde(default)]
    pub options: Option<Labels>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_data: Option<VolumeUsageData>,

    #[serde(flatten)]
    pub extra: Extra,
}

/// Whether a volume exists cluster-wide or on one machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeScope {
    #[default]
    Local,
    Global,
}

/// Usage details; only populated by the disk usage endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VolumeUsageData {
    /// Bytes used, or `-1` when the driver cannot tell.
    pub size: i64,

    /// Containers referencing the volume, or `-1` when unknown.
    pub ref_count: i64,
}

/// Volume configuration for `volumes/create`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VolumeCreateOptions {
    /// The new volume's name. The engine generates one when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Defaults to `local` on the engine side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_opts: Option<Labels>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Labels>,
}

/// The envelope returned by `GET volumes`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VolumeListResponse {
    #[serde(default)]
    pub volumes: Option<Vec<Volume>>,

    #[serde(default)]
    pub warnings: Option<Vec<String>>,
}

/// The result of `volumes/prune`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VolumePruneResponse {
    #[serde(default)]
    pub volumes_deleted: Option<Vec<String>>,

    /// Disk space reclaimed in bytes.
    #[serde(default)]
    pub space_reclaimed: Option<u64>,
}

impl VolumePruneResponse {
    /// Names of the deleted volumes; empty when the engine sent `null`.
    pub fn deleted(&self) -> &[String] {
        self.volumes_deleted.as_deref().unwrap_or_default()
    }
}

/// Filters for listing volumes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolumeListFilters {
    /// `true` returns only volumes not in use by any container. `false` is
    /// the same as unset.
    pub dangling: Option<bool>,
    pub driver: Vec<String>,
    /// `<key>` or `<key>=<value>`.
    pub label: Vec<String>,
    /// Matches all or part of a volume name.
    pub name: Vec<String>,
}

impl FilterSet for VolumeListFilters {
    const RECOGNIZED: &'static [&'static str] = &["dangling", "driver", "label", "name"];

    fn values(&self) -> Vec<(&'static str, FilterValue)> {
        let mut values = vec![
            ("driver", self.driver.clone().into()),
            ("label", self.label.clone().into()),
            ("name", self.name.clone().into()),
        ];
        if let Some(dangling) = self.dangling {
            values.push(("dangling", dangling.into()));
        }
        values
    }
}

/// Filters for pruning volumes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolumePruneFilters {
    /// Only prune volumes with these labels: `<key>` or `<key>=<value>`.
    pub label: Vec<String>,
    /// Only prune volumes without these labels. Sent as `label!`.
    pub label_not: Vec<String>,
}

impl FilterSet for VolumePruneFilters {
    const RECOGNIZED: &'static [&'static str] = &["label", "label!"];

    fn values(&self) -> Vec<(&'static str, FilterValue)> {
        vec![
            ("label", self.label.clone().into()),
            ("label!", self.label_not.clone().into()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_decodes_engine_shape() {
        let raw = serde_json::json!({
            "Name": "tardis",
            "Driver": "custom",
            "Mountpoint": "/var/lib/docker/volumes/tardis",
            "CreatedAt": "2016-06-07T20:31:11.853781916Z",
            "Status": {"hello": "world"},
            "Labels": {"com.example.some-label": "some-value"},
            "Scope": "local",
            "Options": {"device": "tmpfs"},
            "UsageData": {"Size": -1, "RefCount": 2}
        });
        let volume: Volume = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(volume.scope, Some(VolumeScope::Local));
        assert_eq!(volume.usage_data.unwrap().ref_count, 2);
        assert_eq!(serde_json::to_value(&volume).unwrap(), raw);
    }

    #[test]
    fn volume_keeps_null_labels_and_options() {
        let raw = serde_json::json!({
            "Name": "v",
            "Driver": "local",
            "Mountpoint": "/m",
            "Labels": null,
            "Scope": "local",
            "Options": null
        });
        let volume: Volume = serde_json::from_value(raw.clone()).unwrap();
        assert!(volume.labels.is_none());
        assert_eq!(serde_json::to_value(&volume).unwrap(), raw);
    }

    #[test]
    fn null_prune_list_is_empty() {
        let prune: VolumePruneResponse =
            serde_json::from_str(r#"{"VolumesDeleted":null,"SpaceReclaimed":0}"#).unwrap();
        assert!(prune.deleted().is_empty());
    }

    #[test]
    fn create_options_skip_unset_fields() {
        let options = VolumeCreateOptions {
            name: Some("prune-volume".to_string()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_string(&options).unwrap(),
            r#"{"Name":"prune-volume"}"#
        );
    }

    #[test]
    fn dangling_filter_is_only_forwarded_when_true() {
        let filters = VolumeListFilters {
            dangling: Some(true),
            driver: vec!["local".to_string()],
            ..Default::default()
        };
        assert_eq!(
            filters.encode().to_query().unwrap(),
            r#"{"dangling":["true"],"driver":["local"]}"#
        );

        let filters = VolumeListFilters {
            dangling: Some(false),
            ..Default::default()
        };
        assert!(!filters.encode().contains_key("dangling"));
        assert!(VolumeListFilters::default().encode().is_empty());
    }
}
