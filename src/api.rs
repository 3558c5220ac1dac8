//! Area query wrappers
//!
//! Thin functions over the query client for fetching climbing areas near a
//! coordinate and for reading a single cached area by identifier. Failures
//! are swallowed into sentinel results (empty list plus error marker, or
//! `None`); absence of data is a normal, displayable state for the callers.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use crate::traits::QueryClient;

/// Core fields fetched for every area
pub const CORE_CRAG_FIELDS: &str = r#"
  fragment CoreCragFields on Area {
    areaName
    uuid
    totalClimbs
    metadata {
      lat
      lng
      areaId
    }
    content {
      description
    }
  }
"#;

/// Query for areas near a coordinate within a distance band; executed with
/// [`CORE_CRAG_FIELDS`] prepended
const CRAGS_NEAR: &str = r#"
  query CragsNear($placeId: String, $lng: Float, $lat: Float, $minDistance: Int, $maxDistance: Int, $includeCrags: Boolean) {
    cragsNear(placeId: $placeId, lnglat: {lat: $lat, lng: $lng}, minDistance: $minDistance, maxDistance: $maxDistance, includeCrags: $includeCrags) {
      count
      _id
      placeId
      crags {
        ...CoreCragFields
      }
    }
  }
"#;

/// Error marker set on failed nearby queries
const API_ERROR: &str = "API error";

/// A climbing area as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    pub uuid: String,
    #[serde(default)]
    pub area_name: String,
    #[serde(default)]
    pub total_climbs: u32,
    #[serde(default)]
    pub metadata: AreaMetadata,
    #[serde(default)]
    pub content: Option<AreaContent>,
}

/// Location metadata of an area
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaMetadata {
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lng: f64,
    #[serde(default)]
    pub area_id: Option<String>,
}

/// Editorial content of an area
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AreaContent {
    #[serde(default)]
    pub description: Option<String>,
}

/// Result of a nearby-crags query
///
/// On failure `data` is empty, `error` carries a marker, and the place id is
/// dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CragsNearDetails {
    pub data: Vec<Area>,
    pub place_id: Option<String>,
    pub error: Option<String>,
}

/// One distance band of the nested query result
#[derive(Debug, Deserialize)]
struct CragsNearGroup {
    #[serde(default)]
    crags: Vec<Area>,
}

#[derive(Debug, Deserialize)]
struct CragsNearData {
    #[serde(rename = "cragsNear")]
    crags_near: Vec<CragsNearGroup>,
}

/// Fetches climbing areas near a coordinate
///
/// Issues one cache-first query for areas between `range.0` and `range.1`
/// meters of the coordinate and flattens the per-band result into a single
/// list. Each returned area is also written into the client's fragment cache
/// so later [`get_area_by_uuid`] reads can hit.
///
/// # Arguments
/// - `client` - Query client to execute with
/// - `place_id` - Identifier of the place searched from (defaults to "unspecified")
/// - `lnglat` - Longitude/latitude pair of the search center
/// - `range` - Minimum and maximum distance in meters
/// - `include_crags` - Whether the server should include crag-level areas
///
/// # Returns
/// The flattened area list tagged with the place id. On any failure the list
/// is empty and `error` is set; this function never returns an `Err`.
pub async fn get_crag_details_near(
    client: &dyn QueryClient,
    place_id: Option<&str>,
    lnglat: (f64, f64),
    range: (i64, i64),
    include_crags: bool,
) -> CragsNearDetails {
    let place_id = place_id.unwrap_or("unspecified");
    let variables = json!({
        "lng": lnglat.0,
        "lat": lnglat.1,
        "placeId": place_id,
        "minDistance": range.0,
        "maxDistance": range.1,
        "includeCrags": include_crags,
    });

    match query_crags_near(client, variables).await {
        Ok(areas) => {
            for area in &areas {
                if let Ok(value) = serde_json::to_value(area) {
                    client.write_fragment(&area_cache_key(&area.uuid), value);
                }
            }
            CragsNearDetails {
                data: areas,
                place_id: Some(place_id.to_string()),
                error: None,
            }
        }
        Err(e) => {
            warn!(error = %e, "cragsNear query failed");
            CragsNearDetails {
                data: Vec::new(),
                place_id: None,
                error: Some(API_ERROR.to_string()),
            }
        }
    }
}

/// Executes the nearby query and flattens the nested result
async fn query_crags_near(
    client: &dyn QueryClient,
    variables: serde_json::Value,
) -> anyhow::Result<Vec<Area>> {
    let document = format!("{}{}", CORE_CRAG_FIELDS, CRAGS_NEAR);
    let data = client.query(&document, variables).await?;
    let parsed: CragsNearData = serde_json::from_value(data)?;
    Ok(parsed
        .crags_near
        .into_iter()
        .flat_map(|group| group.crags)
        .collect())
}

/// Builds the cache key an area is stored under
///
/// The key embeds the uuid in a JSON object literal; odd looking, but it is
/// the normalized-cache key format of the upstream client.
pub fn area_cache_key(uuid: &str) -> String {
    format!("Area:{{\"uuid\":\"{}\"}}", uuid)
}

/// Reads an area from the fragment cache by uuid
///
/// # Arguments
/// - `client` - Query client whose cache to read
/// - `uuid` - Identifier of the area
///
/// # Returns
/// The cached area, or `None` on a miss or an undecodable cache entry
pub fn get_area_by_uuid(client: &dyn QueryClient, uuid: &str) -> Option<Area> {
    let fragment = client.read_fragment(&area_cache_key(uuid))?;
    match serde_json::from_value(fragment) {
        Ok(area) => Some(area),
        Err(e) => {
            warn!(error = %e, uuid, "cached area fragment did not decode");
            None
        }
    }
}
