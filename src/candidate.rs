use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::geo::{CoordError, GeoPoint};

/// A beer garden, normalized from whichever provider delivered it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub point: GeoPoint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
}

impl Candidate {
    pub fn new(point: GeoPoint) -> Self {
        Self {
            point,
            id: None,
            name: None,
            cost: None,
            rating: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed Biergarten")
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

/// Record shape of the bundled data file.
#[derive(Debug, Clone, Deserialize)]
pub struct StaticCandidate {
    pub location: LatLon,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub cost: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub rating: Option<String>,
}

/// An Overpass `node` element.
#[derive(Debug, Clone, Deserialize)]
pub struct LiveCandidate {
    pub id: Option<i64>,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub enum RawCandidate {
    Static(StaticCandidate),
    Live(LiveCandidate),
}

impl RawCandidate {
    pub fn normalize(self) -> Result<Candidate, CoordError> {
        match self {
            RawCandidate::Static(s) => Ok(Candidate {
                point: GeoPoint::new(s.location.lat, s.location.lon)?,
                id: None,
                name: s.name,
                cost: s.cost,
                rating: s.rating,
            }),
            RawCandidate::Live(mut l) => Ok(Candidate {
                point: GeoPoint::new(l.lat, l.lon)?,
                id: l.id,
                name: l.tags.remove("name"),
                cost: None,
                rating: None,
            }),
        }
    }
}

impl From<StaticCandidate> for RawCandidate {
    fn from(value: StaticCandidate) -> Self {
        RawCandidate::Static(value)
    }
}

impl From<LiveCandidate> for RawCandidate {
    fn from(value: LiveCandidate) -> Self {
        RawCandidate::Live(value)
    }
}

/// Normalizes a batch, dropping records with impossible coordinates.
pub fn normalize_all<R: Into<RawCandidate>>(raw: Vec<R>) -> Vec<Candidate> {
    raw.into_iter()
        .filter_map(|r| match r.into().normalize() {
            Ok(c) => Some(c),
            Err(e) => {
                tracing::warn!(error = %e, "skipping candidate");
                None
            }
        })
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
}

// cost and rating show up as strings or numbers depending on who edited the file
fn scalar_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Scalar>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        Scalar::Text(s) => s,
        Scalar::Number(n) => n.to_string(),
        Scalar::Flag(b) => b.to_string(),
    }))
}
