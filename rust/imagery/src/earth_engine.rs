// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Google Earth Engine REST client
//!
//! The composite is sent as one expression graph to
//! `projects/{project}/maps`; the returned map name is turned into an XYZ
//! tile template. Requests are not retried and carry no client timeout,
//! since `maps.create` can outlast reqwest's default 30 second limit.

use crate::error::{Error, Result};
use crate::request::{CompositeRequest, CLOUD_PROPERTY};
use crate::service::{CompositeLayer, ImageryService};
use forestmap_geometry::Polygon;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};

/// Public REST endpoint
pub const DEFAULT_API_URL: &str = "https://earthengine.googleapis.com/v1";

const ATTRIBUTION: &str = "Google Earth Engine";

#[derive(Debug, Deserialize)]
struct MapResponse {
    name: String,
}

/// Blocking Earth Engine client
pub struct EarthEngineClient {
    base_url: String,
    project: String,
    access_token: Option<String>,
    http: reqwest::blocking::Client,
}

impl EarthEngineClient {
    pub fn new(base_url: &str, project: &str, access_token: Option<String>) -> Result<Self> {
        let http = reqwest::blocking::Client::builder().timeout(None).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            project: project.to_string(),
            access_token,
            http,
        })
    }

    fn auth_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &self.access_token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|e| Error::InvalidHeader(e.to_string()))?,
            );
        }
        Ok(headers)
    }

    /// Body of a `maps.create` call
    pub fn map_request_body(request: &CompositeRequest) -> JsonValue {
        json!({
            "expression": {
                "result": "0",
                "values": { "0": composite_expression(request) },
            },
            "fileFormat": "AUTO_JPEG_PNG",
            "bandIds": request.vis.bands,
            "visualizationOptions": {
                "ranges": [{ "min": request.vis.min, "max": request.vis.max }],
            },
        })
    }

    fn tile_template(&self, map_name: &str) -> String {
        format!("{}/{}/tiles/{{z}}/{{x}}/{{y}}", self.base_url, map_name)
    }
}

impl ImageryService for EarthEngineClient {
    fn name(&self) -> &str {
        "earthengine"
    }

    fn composite(&self, request: &CompositeRequest) -> Result<CompositeLayer> {
        if self.access_token.is_none() {
            tracing::warn!("No Earth Engine access token, request is unauthenticated");
        }
        let url = format!("{}/projects/{}/maps", self.base_url, self.project);
        tracing::debug!(%url, collection = %request.collection, "Requesting composite map");

        let resp = self
            .http
            .post(&url)
            .headers(self.auth_headers()?)
            .json(&Self::map_request_body(request))
            .send()?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().unwrap_or_default();
            return Err(Error::Status { status, body });
        }

        let body: MapResponse = resp.json()?;
        tracing::info!(map = %body.name, "Created Earth Engine map");

        Ok(CompositeLayer::Tiles {
            url_template: self.tile_template(&body.name),
            attribution: ATTRIBUTION.to_string(),
        })
    }
}

fn constant(value: JsonValue) -> JsonValue {
    json!({ "constantValue": value })
}

fn invoke(function: &str, arguments: JsonValue) -> JsonValue {
    json!({
        "functionInvocationValue": {
            "functionName": function,
            "arguments": arguments,
        }
    })
}

fn ring_coordinates(ring: &[nalgebra::Point2<f64>]) -> JsonValue {
    JsonValue::Array(ring.iter().map(|p| json!([p.x, p.y])).collect())
}

fn polygon_coordinates(polygon: &Polygon) -> JsonValue {
    JsonValue::Array(polygon.rings().map(|r| ring_coordinates(r)).collect())
}

fn region_geometry(request: &CompositeRequest) -> JsonValue {
    let coordinates: Vec<JsonValue> = request.region.iter().map(polygon_coordinates).collect();
    invoke(
        "GeometryConstructors.MultiPolygon",
        json!({
            "coordinates": constant(JsonValue::Array(coordinates)),
            "geodesic": constant(json!(false)),
        }),
    )
}

/// `clip(median(filter(load(collection))), region)` as an expression node
pub fn composite_expression(request: &CompositeRequest) -> JsonValue {
    let region = region_geometry(request);
    let collection = invoke(
        "ImageCollection.load",
        json!({ "id": constant(json!(request.collection)) }),
    );

    let by_bounds = invoke(
        "Filter.intersects",
        json!({
            "leftField": constant(json!(".all")),
            "rightValue": region.clone(),
        }),
    );
    let by_date = invoke(
        "Filter.dateRangeContains",
        json!({
            "leftValue": invoke(
                "DateRange",
                json!({
                    "start": constant(json!(request.start.format("%Y-%m-%d").to_string())),
                    "end": constant(json!(request.end.format("%Y-%m-%d").to_string())),
                }),
            ),
            "rightField": constant(json!("system:time_start")),
        }),
    );
    let by_cloud = invoke(
        "Filter.lessThan",
        json!({
            "leftField": constant(json!(CLOUD_PROPERTY)),
            "rightValue": constant(json!(request.cloud_threshold)),
        }),
    );

    let mut filtered = collection;
    for filter in [by_bounds, by_date, by_cloud] {
        filtered = invoke(
            "Collection.filter",
            json!({ "collection": filtered, "filter": filter }),
        );
    }

    let median = invoke("reduce.median", json!({ "collection": filtered }));
    invoke("Image.clip", json!({ "input": median, "geometry": region }))
}
