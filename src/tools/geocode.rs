use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::schema::{Validate, ValidationError};
use crate::{
    lib::{
        errors::{FetchError, ToolError},
        http::{GetRequest, HttpFetch},
    },
    server::config::HttpSection,
};

pub const GEOCODE_TOOL_ID: &str = "geocode";

/// Input for `geocode`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GeocodeRequest {
    /// Free-form address or place name to look up.
    pub address: String,
}

impl Validate for GeocodeRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// Best match returned by the geocoder.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedPlace {
    pub display_name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl fmt::Display for GeocodedPlace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "주소: {}\n위도: {}\n경도: {}",
            self.display_name, self.latitude, self.longitude
        )
    }
}

#[derive(Debug, Deserialize)]
struct RawPlace {
    display_name: String,
    lat: String,
    lon: String,
}

/// Build the single lookup request for `address`.
pub fn lookup_request(http: &HttpSection, address: &str) -> GetRequest {
    GetRequest::new(http.geocode_url.clone())
        .query("q", address)
        .query("format", "json")
        .query("limit", 1)
        .header("User-Agent", http.user_agent.clone())
}

/// Resolve `address` with one outbound call.
pub async fn geocode(
    fetcher: &dyn HttpFetch,
    http: &HttpSection,
    address: &str,
) -> Result<GeocodedPlace, ToolError> {
    let body = fetcher
        .get_json(lookup_request(http, address))
        .await
        .map_err(ToolError::Geocode)?;
    parse_first_place(body, &http.geocode_url)
        .map_err(ToolError::Geocode)?
        .ok_or_else(|| ToolError::NoGeocodeResult {
            address: address.to_string(),
        })
}

fn parse_first_place(body: Value, url: &str) -> Result<Option<GeocodedPlace>, FetchError> {
    let decode_error = |message: String| FetchError::Decode {
        url: url.to_string(),
        message,
    };

    let places: Vec<RawPlace> =
        serde_json::from_value(body).map_err(|err| decode_error(err.to_string()))?;
    let Some(first) = places.into_iter().next() else {
        return Ok(None);
    };

    let latitude = first
        .lat
        .trim()
        .parse::<f64>()
        .map_err(|err| decode_error(format!("lat `{}`: {err}", first.lat)))?;
    let longitude = first
        .lon
        .trim()
        .parse::<f64>()
        .map_err(|err| decode_error(format!("lon `{}`: {err}", first.lon)))?;

    Ok(Some(GeocodedPlace {
        display_name: first.display_name,
        latitude,
        longitude,
    }))
}
