//! Where is the user standing?
//!
//! A [`Locator`] answers that exactly once per call. Coordinates either come
//! from the command line ([`FixedLocator`]) or from an IP geolocation lookup
//! ([`IpLocator`]), which is bounded by a timeout.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::geo::GeoPoint;
use crate::http::{HttpClient, HttpError};

pub const DEFAULT_LOCATE_URL: &str = "http://ip-api.com/json/?fields=status,message,lat,lon";
pub const DEFAULT_LOCATE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("position unavailable")]
    PositionUnavailable,
    #[error("location request timed out")]
    Timeout,
    #[error("unknown location error")]
    Unknown,
}

pub trait Locator: Send + Sync {
    fn locate(&self) -> impl Future<Output = Result<GeoPoint, LocationError>> + Send;
}

#[derive(Debug, Clone, Copy)]
pub struct FixedLocator(pub GeoPoint);

impl Locator for FixedLocator {
    async fn locate(&self) -> Result<GeoPoint, LocationError> {
        Ok(self.0)
    }
}

#[derive(Deserialize)]
struct IpLookup {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

pub struct IpLocator<C> {
    client: C,
    url: String,
    timeout: Duration,
}

impl<C: HttpClient> IpLocator<C> {
    pub fn new(client: C, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            url: url.into(),
            timeout,
        }
    }

    async fn lookup(&self) -> Result<GeoPoint, LocationError> {
        let response = self.client.get(&self.url, &[]).await.map_err(|e| match e {
            HttpError::Timeout => LocationError::Timeout,
            HttpError::Transport(msg) => {
                warn!(error = %msg, "geolocation service unreachable");
                LocationError::PositionUnavailable
            }
        })?;

        match response.status {
            401 | 403 => return Err(LocationError::PermissionDenied),
            _ if !response.is_success() => {
                warn!(status = response.status, "geolocation service refused the lookup");
                return Err(LocationError::Unknown);
            }
            _ => {}
        }

        let lookup: IpLookup = serde_json::from_slice(&response.body).map_err(|e| {
            warn!(error = %e, "unreadable geolocation response");
            LocationError::Unknown
        })?;
        if lookup.status != "success" {
            debug!(reason = lookup.message.as_deref().unwrap_or(""), "lookup failed");
            return Err(LocationError::PositionUnavailable);
        }
        match (lookup.lat, lookup.lon) {
            (Some(lat), Some(lon)) => {
                GeoPoint::new(lat, lon).map_err(|_| LocationError::PositionUnavailable)
            }
            _ => Err(LocationError::PositionUnavailable),
        }
    }
}

impl<C: HttpClient> Locator for IpLocator<C> {
    async fn locate(&self) -> Result<GeoPoint, LocationError> {
        match tokio::time::timeout(self.timeout, self.lookup()).await {
            Ok(result) => result,
            Err(_) => Err(LocationError::Timeout),
        }
    }
}

/// Locator chosen at startup.
pub enum AnyLocator<C> {
    Fixed(FixedLocator),
    Ip(IpLocator<C>),
}

impl<C: HttpClient> Locator for AnyLocator<C> {
    async fn locate(&self) -> Result<GeoPoint, LocationError> {
        match self {
            AnyLocator::Fixed(l) => l.locate().await,
            AnyLocator::Ip(l) => l.locate().await,
        }
    }
}
