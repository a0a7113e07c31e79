//! An in-memory stand-in for the container engine API.
//!
//! Implements just the endpoints the client talks to (configs, volumes and
//! container listing) with engine-shaped JSON and `{"message": ...}` error
//! bodies. State lives in an [`Engine`] behind a lock; [`app_with`] lets tests
//! seed it.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

/// Timestamp reported for every object the mock creates or updates.
pub const TIMESTAMP: &str = "2024-01-01T00:00:00.000000000Z";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ConfigSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templating: Option<Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ObjectVersion {
    #[serde(rename = "Index")]
    pub index: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConfigRecord {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Version")]
    pub version: ObjectVersion,
    #[serde(rename = "CreatedAt")]
    pub created_at: String,
    #[serde(rename = "UpdatedAt")]
    pub updated_at: String,
    #[serde(rename = "Spec")]
    pub spec: ConfigSpec,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VolumeRecord {
    pub name: String,
    pub driver: String,
    pub mountpoint: String,
    pub created_at: String,
    pub labels: BTreeMap<String, String>,
    pub scope: String,
    pub options: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateVolume {
    pub name: Option<String>,
    pub driver: Option<String>,
    pub driver_opts: Option<BTreeMap<String, String>>,
    pub labels: Option<BTreeMap<String, String>>,
}

/// The mock engine's state.
#[derive(Debug)]
pub struct Engine {
    swarm: bool,
    index: u64,
    configs: Vec<ConfigRecord>,
    volumes: BTreeMap<String, VolumeRecord>,
    in_use: HashSet<String>,
    containers: Vec<Value>,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            swarm: true,
            index: 10,
            configs: Vec::new(),
            volumes: BTreeMap::new(),
            in_use: HashSet::new(),
            containers: Vec::new(),
        }
    }
}

impl Engine {
    /// Behaves like a node that has not joined a swarm: config endpoints
    /// answer 503.
    pub fn without_swarm(mut self) -> Self {
        self.swarm = false;
        self
    }

    /// Marks a volume as referenced by a container, so it cannot be removed
    /// or pruned.
    pub fn with_volume_in_use(mut self, name: impl Into<String>) -> Self {
        self.in_use.insert(name.into());
        self
    }

    /// Adds a container to the `containers/json` listing.
    pub fn with_container(mut self, summary: Value) -> Self {
        self.containers.push(summary);
        self
    }

    fn next_index(&mut self) -> u64 {
        self.index += 1;
        self.index
    }

    fn find_config(&self, key: &str) -> Option<usize> {
        self.configs
            .iter()
            .position(|c| c.id == key || c.spec.name == key)
    }
}

pub type Db = Arc<RwLock<Engine>>;

/// An engine-style error response.
#[derive(Debug)]
pub struct EngineError(StatusCode, String);

impl EngineError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self(status, message.into())
    }

    fn not_a_swarm() -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "This node is not a swarm manager. Use \"docker swarm init\" or \"docker swarm join\" to connect this node to swarm and try again.",
        )
    }
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        (self.0, Json(json!({ "message": self.1 }))).into_response()
    }
}

type EngineResult<T> = Result<T, EngineError>;

pub fn app() -> Router {
    app_with(Engine::default())
}

pub fn app_with(engine: Engine) -> Router {
    let db: Db = Arc::new(RwLock::new(engine));
    Router::new()
        .route("/configs", get(list_configs))
        .route("/configs/create", post(create_config))
        .route("/configs/{id}", get(inspect_config).delete(delete_config))
        .route("/configs/{id}/update", post(update_config))
        .route("/containers/json", get(list_containers))
        .route("/volumes", get(list_volumes))
        .route("/volumes/create", post(create_volume))
        .route("/volumes/prune", post(prune_volumes))
        .route("/volumes/{name}", get(inspect_volume).delete(delete_volume))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, Engine::default()).await
}

pub async fn run_with(listener: TcpListener, engine: Engine) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(engine)).await
}

/// Parses the `filters` query parameter (a JSON `map[string][]string`).
fn parse_filters(
    query: &HashMap<String, String>,
    allowed: &[&str],
) -> EngineResult<HashMap<String, Vec<String>>> {
    let Some(raw) = query.get("filters").filter(|raw| !raw.is_empty()) else {
        return Ok(HashMap::new());
    };
    let filters: HashMap<String, Vec<String>> = serde_json::from_str(raw)
        .map_err(|e| EngineError::new(StatusCode::BAD_REQUEST, format!("invalid filter: {e}")))?;
    if let Some(key) = filters.keys().find(|key| !allowed.contains(&key.as_str())) {
        return Err(EngineError::new(
            StatusCode::BAD_REQUEST,
            format!("invalid filter '{key}'"),
        ));
    }
    Ok(filters)
}

/// `label=<key>` or `label=<key>=<value>` against a label map.
fn label_matches(labels: &BTreeMap<String, String>, filter: &str) -> bool {
    match filter.split_once('=') {
        Some((key, value)) => labels.get(key).is_some_and(|v| v == value),
        None => labels.contains_key(filter),
    }
}

/// Every filter key must have at least one matching value.
fn all_match(filters: &HashMap<String, Vec<String>>, matches: impl Fn(&str, &str) -> bool) -> bool {
    filters
        .iter()
        .all(|(key, values)| values.iter().any(|value| matches(key, value)))
}

fn parse_bool(value: Option<&String>) -> bool {
    matches!(value.map(String::as_str), Some("1" | "true" | "True"))
}

fn container_state(container: &Value) -> String {
    container["State"].as_str().unwrap_or_default().to_lowercase()
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()[..25].to_string()
}

async fn list_configs(
    State(db): State<Db>,
    Query(query): Query<HashMap<String, String>>,
) -> EngineResult<Json<Vec<ConfigRecord>>> {
    let engine = db.read().await;
    if !engine.swarm {
        return Err(EngineError::not_a_swarm());
    }
    let filters = parse_filters(&query, &["id", "label", "name", "names"])?;
    let configs = engine
        .configs
        .iter()
        .filter(|config| {
            all_match(&filters, |key, value| match key {
                "id" => config.id.starts_with(value),
                "name" | "names" => config.spec.name == value,
                "label" => config
                    .spec
                    .labels
                    .as_ref()
                    .is_some_and(|labels| label_matches(labels, value)),
                _ => false,
            })
        })
        .cloned()
        .collect();
    Ok(Json(configs))
}

async fn create_config(
    State(db): State<Db>,
    Json(spec): Json<ConfigSpec>,
) -> EngineResult<(StatusCode, Json<Value>)> {
    let mut engine = db.write().await;
    if !engine.swarm {
        return Err(EngineError::not_a_swarm());
    }
    if engine.configs.iter().any(|c| c.spec.name == spec.name) {
        return Err(EngineError::new(
            StatusCode::CONFLICT,
            format!("config {} already exists", spec.name),
        ));
    }
    if let Some(data) = &spec.data {
        if STANDARD.decode(data).is_err() {
            return Err(EngineError::new(
                StatusCode::BAD_REQUEST,
                "config data must be base64 encoded",
            ));
        }
    }

    let index = engine.next_index();
    let id = new_id();
    debug!("creating config `{}` as {id}", spec.name);
    engine.configs.push(ConfigRecord {
        id: id.clone(),
        version: ObjectVersion { index },
        created_at: TIMESTAMP.to_string(),
        updated_at: TIMESTAMP.to_string(),
        spec,
    });
    Ok((StatusCode::CREATED, Json(json!({ "ID": id }))))
}

async fn inspect_config(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> EngineResult<Json<ConfigRecord>> {
    let engine = db.read().await;
    if !engine.swarm {
        return Err(EngineError::not_a_swarm());
    }
    engine
        .find_config(&id)
        .map(|i| Json(engine.configs[i].clone()))
        .ok_or_else(|| EngineError::new(StatusCode::NOT_FOUND, format!("config {id} not found")))
}

async fn delete_config(State(db): State<Db>, Path(id): Path<String>) -> EngineResult<StatusCode> {
    let mut engine = db.write().await;
    if !engine.swarm {
        return Err(EngineError::not_a_swarm());
    }
    let index = engine
        .find_config(&id)
        .ok_or_else(|| EngineError::new(StatusCode::NOT_FOUND, format!("config {id} not found")))?;
    engine.configs.remove(index);
    Ok(StatusCode::NO_CONTENT)
}

async fn update_config(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    Json(spec): Json<ConfigSpec>,
) -> EngineResult<StatusCode> {
    let mut engine = db.write().await;
    if !engine.swarm {
        return Err(EngineError::not_a_swarm());
    }
    let version: u64 = query
        .get("version")
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| EngineError::new(StatusCode::BAD_REQUEST, "invalid config version"))?;
    let position = engine
        .find_config(&id)
        .ok_or_else(|| EngineError::new(StatusCode::NOT_FOUND, format!("config {id} not found")))?;

    let current = &engine.configs[position];
    if current.version.index != version {
        return Err(EngineError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "update out of sequence",
        ));
    }
    if current.spec.name != spec.name
        || current.spec.data != spec.data
        || current.spec.templating != spec.templating
    {
        return Err(EngineError::new(
            StatusCode::BAD_REQUEST,
            "rpc error: code = InvalidArgument desc = only updates to Labels are allowed",
        ));
    }

    let index = engine.next_index();
    let config = &mut engine.configs[position];
    config.spec.labels = spec.labels;
    config.version.index = index;
    config.updated_at = TIMESTAMP.to_string();
    Ok(StatusCode::OK)
}

async fn list_containers(
    State(db): State<Db>,
    Query(query): Query<HashMap<String, String>>,
) -> EngineResult<Json<Vec<Value>>> {
    let engine = db.read().await;
    let filters = parse_filters(&query, &["id", "label", "name", "status"])?;
    let all = parse_bool(query.get("all"));
    let limit = query.get("limit").and_then(|l| l.parse::<usize>().ok());

    let mut containers: Vec<Value> = engine
        .containers
        .iter()
        .filter(|c| all || !filters.is_empty() || container_state(c) == "running")
        .filter(|c| {
            all_match(&filters, |key, value| match key {
                "status" => container_state(c) == value,
                "id" => c["Id"].as_str().is_some_and(|id| id.starts_with(value)),
                "name" => c["Names"].as_array().is_some_and(|names| {
                    names
                        .iter()
                        .filter_map(Value::as_str)
                        .any(|name| name.trim_start_matches('/').contains(value))
                }),
                "label" => c["Labels"]
                    .as_object()
                    .map(|labels| {
                        labels
                            .iter()
                            .filter_map(|(k, v)| v.as_str().map(|v| (k.clone(), v.to_string())))
                            .collect::<BTreeMap<_, _>>()
                    })
                    .is_some_and(|labels| label_matches(&labels, value)),
                _ => false,
            })
        })
        .cloned()
        .collect();
    if let Some(limit) = limit {
        containers.truncate(limit);
    }
    Ok(Json(containers))
}

async fn list_volumes(
    State(db): State<Db>,
    Query(query): Query<HashMap<String, String>>,
) -> EngineResult<Json<Value>> {
    let engine = db.read().await;
    let filters = parse_filters(&query, &["dangling", "driver", "label", "name"])?;
    let volumes: Vec<&VolumeRecord> = engine
        .volumes
        .values()
        .filter(|volume| {
            all_match(&filters, |key, value| match key {
                "dangling" => {
                    let dangling = matches!(value, "1" | "true");
                    dangling != engine.in_use.contains(&volume.name)
                }
                "driver" => volume.driver == value,
                "label" => label_matches(&volume.labels, value),
                "name" => volume.name.contains(value),
                _ => false,
            })
        })
        .collect();
    Ok(Json(json!({ "Volumes": volumes, "Warnings": [] })))
}

async fn create_volume(
    State(db): State<Db>,
    Json(input): Json<CreateVolume>,
) -> EngineResult<(StatusCode, Json<VolumeRecord>)> {
    let mut engine = db.write().await;
    let name = input.name.unwrap_or_else(|| Uuid::new_v4().simple().to_string());
    let driver = input.driver.unwrap_or_else(|| "local".to_string());

    if let Some(existing) = engine.volumes.get(&name) {
        if existing.driver != driver {
            return Err(EngineError::new(
                StatusCode::CONFLICT,
                format!("volume name {name} already in use by driver {}", existing.driver),
            ));
        }
        return Ok((StatusCode::CREATED, Json(existing.clone())));
    }

    debug!("creating volume `{name}`");
    let volume = VolumeRecord {
        mountpoint: format!("/var/lib/docker/volumes/{name}/_data"),
        name: name.clone(),
        driver,
        created_at: TIMESTAMP.to_string(),
        labels: input.labels.unwrap_or_default(),
        scope: "local".to_string(),
        options: input.driver_opts.unwrap_or_default(),
    };
    engine.volumes.insert(name, volume.clone());
    Ok((StatusCode::CREATED, Json(volume)))
}

async fn inspect_volume(
    State(db): State<Db>,
    Path(name): Path<String>,
) -> EngineResult<Json<VolumeRecord>> {
    let engine = db.read().await;
    engine
        .volumes
        .get(&name)
        .cloned()
        .map(Json)
        .ok_or_else(|| EngineError::new(StatusCode::NOT_FOUND, format!("get {name}: no such volume")))
}

async fn delete_volume(
    State(db): State<Db>,
    Path(name): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> EngineResult<StatusCode> {
    let mut engine = db.write().await;
    let force = parse_bool(query.get("force"));
    if engine.in_use.contains(&name) {
        return Err(EngineError::new(
            StatusCode::CONFLICT,
            format!("remove {name}: volume is in use"),
        ));
    }
    match engine.volumes.remove(&name) {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None if force => Ok(StatusCode::NO_CONTENT),
        None => Err(EngineError::new(
            StatusCode::NOT_FOUND,
            format!("get {name}: no such volume"),
        )),
    }
}

/// `label=...` keeps matching volumes, `label!=...` keeps the others.
fn prune_label_matches(labels: &BTreeMap<String, String>, filter: &str, negated: bool) -> bool {
    label_matches(labels, filter) != negated
}

async fn prune_volumes(
    State(db): State<Db>,
    Query(query): Query<HashMap<String, String>>,
) -> EngineResult<Json<Value>> {
    let mut engine = db.write().await;
    let filters = parse_filters(&query, &["label", "label!"])?;

    let doomed: Vec<String> = engine
        .volumes
        .values()
        .filter(|volume| !engine.in_use.contains(&volume.name))
        .filter(|volume| {
            filters.iter().all(|(key, values)| {
                let negated = key == "label!";
                values
                    .iter()
                    .all(|value| prune_label_matches(&volume.labels, value, negated))
            })
        })
        .map(|volume| volume.name.clone())
        .collect();

    for name in &doomed {
        engine.volumes.remove(name);
    }
    debug!("pruned {} volumes", doomed.len());
    Ok(Json(json!({ "VolumesDeleted": doomed, "SpaceReclaimed": 0 })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn label_filter_matches_key_or_pair() {
        let labels = labels(&[("nope", "label1")]);
        assert!(label_matches(&labels, "nope"));
        assert!(label_matches(&labels, "nope=label1"));
        assert!(!label_matches(&labels, "nope=label2"));
        assert!(!label_matches(&labels, "other"));
    }

    #[test]
    fn negated_prune_label() {
        let labels = labels(&[("keep", "true")]);
        assert!(prune_label_matches(&labels, "keep", false));
        assert!(!prune_label_matches(&labels, "keep", true));
    }

    #[test]
    fn filters_reject_unknown_keys() {
        let mut query = HashMap::new();
        query.insert("filters".to_string(), r#"{"bogus":["x"]}"#.to_string());
        let err = parse_filters(&query, &["name"]).unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_filters_mean_no_constraint() {
        assert!(parse_filters(&HashMap::new(), &["name"]).unwrap().is_empty());
    }

    #[test]
    fn config_spec_skips_unset_fields() {
        let spec = ConfigSpec {
            name: "c".to_string(),
            labels: None,
            data: None,
            templating: None,
        };
        assert_eq!(serde_json::to_value(&spec).unwrap(), json!({"Name": "c"}));
    }

    #[test]
    fn generated_ids_look_like_swarm_ids() {
        let id = new_id();
        assert_eq!(id.len(), 25);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
