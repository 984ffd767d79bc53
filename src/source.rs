//! Candidate providers: the bundled data file and a live Overpass query.

use std::future::Future;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info};

use crate::candidate::{normalize_all, Candidate, LiveCandidate, StaticCandidate};
use crate::geo::GeoPoint;
use crate::http::{HttpClient, HttpError};

pub const DEFAULT_DATA_FILE: &str = "biergarten_data.json";
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";
pub const DEFAULT_RADIUS_M: u32 = 2_000;
pub const CATEGORY_TAG: (&str, &str) = ("amenity", "biergarten");

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("reading data file: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("server answered with status {0}")]
    Status(u16),
    #[error("malformed candidate list: {0}")]
    Parse(#[from] serde_json::Error),
}

pub trait CandidateSource: Send + Sync {
    fn fetch(
        &self,
        around: GeoPoint,
    ) -> impl Future<Output = Result<Vec<Candidate>, FetchError>> + Send;

    fn name(&self) -> &str;
}

/// Fetches from `source`, turning any failure into an empty list.
pub async fn fetch_or_empty<S: CandidateSource>(source: &S, around: GeoPoint) -> Vec<Candidate> {
    match source.fetch(around).await {
        Ok(candidates) => {
            info!(source = source.name(), count = candidates.len(), "candidates fetched");
            candidates
        }
        Err(e) => {
            error!(source = source.name(), error = %e, "error fetching Biergärten");
            Vec::new()
        }
    }
}

/// JSON array of `{ location: {lat, lon}, name, cost, rating }` on disk.
pub struct StaticFileSource {
    path: PathBuf,
}

impl StaticFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CandidateSource for StaticFileSource {
    async fn fetch(&self, _around: GeoPoint) -> Result<Vec<Candidate>, FetchError> {
        let bytes = tokio::fs::read(&self.path).await?;
        let raw: Vec<StaticCandidate> = serde_json::from_slice(&bytes)?;
        Ok(normalize_all(raw))
    }

    fn name(&self) -> &str {
        "static"
    }
}

#[derive(Deserialize)]
struct OverpassResponse {
    elements: Vec<LiveCandidate>,
}

pub struct OverpassSource<C> {
    client: C,
    endpoint: String,
    radius_m: u32,
}

impl<C: HttpClient> OverpassSource<C> {
    pub fn new(client: C, endpoint: impl Into<String>, radius_m: u32) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            radius_m,
        }
    }

    pub fn query(&self, around: &GeoPoint) -> String {
        let (key, value) = CATEGORY_TAG;
        format!(
            r#"[out:json][timeout:25];node(around:{},{},{})["{}"="{}"];out;"#,
            self.radius_m,
            around.lat(),
            around.lon(),
            key,
            value
        )
    }
}

impl<C: HttpClient> CandidateSource for OverpassSource<C> {
    async fn fetch(&self, around: GeoPoint) -> Result<Vec<Candidate>, FetchError> {
        let query = self.query(&around);
        let response = self
            .client
            .get(&self.endpoint, &[("data", query.as_str())])
            .await?;
        if !response.is_success() {
            return Err(FetchError::Status(response.status));
        }
        let parsed: OverpassResponse = serde_json::from_slice(&response.body)?;
        Ok(normalize_all(parsed.elements))
    }

    fn name(&self) -> &str {
        "overpass"
    }
}

/// Source chosen at startup.
pub enum AnySource<C> {
    Static(StaticFileSource),
    Overpass(OverpassSource<C>),
}

impl<C: HttpClient> CandidateSource for AnySource<C> {
    async fn fetch(&self, around: GeoPoint) -> Result<Vec<Candidate>, FetchError> {
        match self {
            AnySource::Static(s) => s.fetch(around).await,
            AnySource::Overpass(s) => s.fetch(around).await,
        }
    }

    fn name(&self) -> &str {
        match self {
            AnySource::Static(s) => s.name(),
            AnySource::Overpass(s) => s.name(),
        }
    }
}
