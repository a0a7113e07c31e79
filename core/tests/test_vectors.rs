//! Check filter encoding and failure normalization against the JSON vectors
//! in `test-vectors/`.

use dockr_core::filters::encode;
use dockr_core::{
    normalize, Endpoint, ErrorResponse, Failure, FilterValue, HttpResponse, Operation, Resource,
};
use serde_json::Value;

fn parse_endpoint(s: &str) -> Endpoint {
    let (resource, operation) = s.split_once('.').unwrap();
    let resource = match resource {
        "config" => Resource::Config,
        "volume" => Resource::Volume,
        "container" => Resource::Container,
        other => panic!("unknown resource: {other}"),
    };
    let operation = match operation {
        "list" => Operation::List,
        "create" => Operation::Create,
        "inspect" => Operation::Inspect,
        "update" => Operation::Update,
        "delete" => Operation::Delete,
        "prune" => Operation::Prune,
        other => panic!("unknown operation: {other}"),
    };
    Endpoint::new(resource, operation)
}

fn filter_value(value: &Value) -> FilterValue {
    match value {
        Value::Bool(flag) => FilterValue::Bool(*flag),
        Value::Array(items) => FilterValue::List(
            items
                .iter()
                .map(|item| item.as_str().unwrap().to_string())
                .collect(),
        ),
        other => panic!("unsupported filter value: {other}"),
    }
}

#[test]
fn status_override_vectors() {
    let raw = include_str!("../../test-vectors/status_overrides.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let endpoint = parse_endpoint(case["endpoint"].as_str().unwrap());
        let failure = Failure::Status(HttpResponse {
            status: case["response"]["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: case["response"]["body"].as_str().unwrap().to_string(),
        });
        let expected: ErrorResponse = serde_json::from_value(case["expected"].clone()).unwrap();

        assert_eq!(normalize(endpoint, &failure), expected, "{name}");
    }
}

#[test]
fn filter_vectors() {
    let raw = include_str!("../../test-vectors/filters.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let recognized: Vec<&str> = case["recognized"]
            .as_array()
            .unwrap()
            .iter()
            .map(|key| key.as_str().unwrap())
            .collect();
        let input: Vec<(&str, FilterValue)> = case["input"]
            .as_object()
            .unwrap()
            .iter()
            .map(|(key, value)| (key.as_str(), filter_value(value)))
            .collect();

        let encoded = encode(&recognized, input);
        assert_eq!(
            encoded.to_query().unwrap(),
            case["expected"].as_str().unwrap(),
            "{name}"
        );
        for key in input_keys(&case["input"]) {
            if !recognized.contains(&key.as_str()) {
                assert!(!encoded.contains_key(&key), "{name}: {key} leaked");
            }
        }
    }
}

fn input_keys(input: &Value) -> Vec<String> {
    input.as_object().unwrap().keys().cloned().collect()
}
