//! Integration tests for the area query wrappers
//!
//! These tests verify the reshaping of nearby-query results, the sentinel
//! error results on failure, and cached fragment reads, using a mock query
//! client in place of the network.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

use opencrag::api::area_cache_key;
use opencrag::{get_area_by_uuid, get_crag_details_near, QueryClient};

/// Mock client returning a canned response and recording calls
struct MockQueryClient {
    response: Result<Value, String>,
    fragments: Mutex<HashMap<String, Value>>,
    last_variables: Mutex<Option<Value>>,
}

impl MockQueryClient {
    fn with_response(response: Value) -> Self {
        MockQueryClient {
            response: Ok(response),
            fragments: Mutex::new(HashMap::new()),
            last_variables: Mutex::new(None),
        }
    }

    fn failing(message: &str) -> Self {
        MockQueryClient {
            response: Err(message.to_string()),
            fragments: Mutex::new(HashMap::new()),
            last_variables: Mutex::new(None),
        }
    }

    fn last_variables(&self) -> Option<Value> {
        self.last_variables.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueryClient for MockQueryClient {
    async fn query(&self, _query: &str, variables: Value) -> Result<Value> {
        *self.last_variables.lock().unwrap() = Some(variables);
        match &self.response {
            Ok(value) => Ok(value.clone()),
            Err(message) => Err(anyhow::anyhow!("{}", message)),
        }
    }

    fn read_fragment(&self, cache_key: &str) -> Option<Value> {
        self.fragments.lock().unwrap().get(cache_key).cloned()
    }

    fn write_fragment(&self, cache_key: &str, value: Value) {
        self.fragments
            .lock()
            .unwrap()
            .insert(cache_key.to_string(), value);
    }
}

fn crags_near_response() -> Value {
    json!({
        "cragsNear": [
            {
                "count": 2,
                "_id": "band-0",
                "placeId": "leavenworth",
                "crags": [
                    {"uuid": "a-1", "areaName": "Icicle Creek", "totalClimbs": 120,
                     "metadata": {"lat": 47.55, "lng": -120.72}},
                    {"uuid": "a-2", "areaName": "Tumwater Canyon", "totalClimbs": 45,
                     "metadata": {"lat": 47.61, "lng": -120.73}}
                ]
            },
            {
                "count": 1,
                "_id": "band-1",
                "placeId": "leavenworth",
                "crags": [
                    {"uuid": "a-3", "areaName": "Peshastin Pinnacles", "totalClimbs": 60,
                     "metadata": {"lat": 47.57, "lng": -120.61}}
                ]
            }
        ]
    })
}

#[tokio::test]
async fn test_nearby_query_flattens_distance_bands() {
    let client = MockQueryClient::with_response(crags_near_response());

    let result =
        get_crag_details_near(&client, Some("leavenworth"), (-120.7, 47.6), (0, 48000), true).await;

    assert_eq!(result.error, None);
    assert_eq!(result.place_id.as_deref(), Some("leavenworth"));
    let names: Vec<&str> = result.data.iter().map(|a| a.area_name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Icicle Creek", "Tumwater Canyon", "Peshastin Pinnacles"]
    );
}

#[tokio::test]
async fn test_nearby_query_builds_expected_variables() {
    let client = MockQueryClient::with_response(crags_near_response());

    get_crag_details_near(&client, None, (-120.7, 47.6), (1000, 48000), false).await;

    let variables = client.last_variables().unwrap();
    assert_eq!(variables["placeId"], "unspecified");
    assert_eq!(variables["lng"], -120.7);
    assert_eq!(variables["lat"], 47.6);
    assert_eq!(variables["minDistance"], 1000);
    assert_eq!(variables["maxDistance"], 48000);
    assert_eq!(variables["includeCrags"], false);
}

#[tokio::test]
async fn test_nearby_query_failure_yields_error_marker() {
    let client = MockQueryClient::failing("connection refused");

    let result = get_crag_details_near(&client, Some("x"), (0.0, 0.0), (0, 1000), false).await;

    assert!(result.data.is_empty());
    assert_eq!(result.error.as_deref(), Some("API error"));
    assert_eq!(result.place_id, None);
}

#[tokio::test]
async fn test_nearby_query_unexpected_shape_yields_error_marker() {
    let client = MockQueryClient::with_response(json!({"somethingElse": []}));

    let result = get_crag_details_near(&client, None, (0.0, 0.0), (0, 1000), false).await;

    assert!(result.data.is_empty());
    assert_eq!(result.error.as_deref(), Some("API error"));
}

#[tokio::test]
async fn test_nearby_query_populates_fragment_cache() {
    let client = MockQueryClient::with_response(crags_near_response());

    get_crag_details_near(&client, Some("leavenworth"), (-120.7, 47.6), (0, 48000), true).await;

    let area = get_area_by_uuid(&client, "a-2").expect("area should be cached");
    assert_eq!(area.area_name, "Tumwater Canyon");
    assert_eq!(area.total_climbs, 45);
}

#[test]
fn test_fragment_read_miss_returns_none() {
    let client = MockQueryClient::with_response(json!({}));
    assert!(get_area_by_uuid(&client, "missing-uuid").is_none());
}

#[test]
fn test_fragment_read_undecodable_entry_returns_none() {
    let client = MockQueryClient::with_response(json!({}));
    client.write_fragment(&area_cache_key("bad"), json!("not an area record"));

    assert!(get_area_by_uuid(&client, "bad").is_none());
}
