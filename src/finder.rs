use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::candidate::Candidate;
use crate::geo::GeoPoint;
use crate::locate::{LocationError, Locator};
use crate::nearest::{find_nearest, NearestResult};
use crate::source::{fetch_or_empty, CandidateSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error(transparent)]
    Location(#[from] LocationError),
    #[error("no candidates found")]
    NoCandidates,
    #[error("a search is already running")]
    AlreadyRunning,
}

impl SearchError {
    pub fn user_message(&self) -> &'static str {
        match self {
            SearchError::Location(LocationError::PermissionDenied) => {
                "User denied the request for Geolocation."
            }
            SearchError::Location(LocationError::PositionUnavailable) => {
                "Location information is unavailable."
            }
            SearchError::Location(LocationError::Timeout) => {
                "The request to get user location timed out."
            }
            SearchError::Location(LocationError::Unknown) => "An unknown error occurred.",
            SearchError::NoCandidates => "No Biergärten available.",
            SearchError::AlreadyRunning => "Still looking, please wait.",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Found {
    pub origin: GeoPoint,
    pub nearest: NearestResult,
    pub candidates: Vec<Candidate>,
}

/// Runs locate, fetch and nearest in sequence. One search at a time.
pub struct Finder<L, S> {
    locator: L,
    source: S,
    in_flight: AtomicBool,
}

struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<L: Locator, S: CandidateSource> Finder<L, S> {
    pub fn new(locator: L, source: S) -> Self {
        Self {
            locator,
            source,
            in_flight: AtomicBool::new(false),
        }
    }

    fn begin(&self) -> Option<InFlight<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| InFlight(&self.in_flight))
    }

    #[instrument(skip(self), fields(source = self.source.name()))]
    pub async fn search(&self) -> Result<Found, SearchError> {
        let Some(_guard) = self.begin() else {
            warn!("search ignored, previous one still running");
            return Err(SearchError::AlreadyRunning);
        };

        let origin = self.locator.locate().await?;
        info!(lat = origin.lat(), lon = origin.lon(), "located");

        let candidates = fetch_or_empty(&self.source, origin).await;
        let nearest = find_nearest(&origin, &candidates).ok_or(SearchError::NoCandidates)?;
        info!(
            name = nearest.candidate.display_name(),
            distance_km = nearest.distance_km,
            "nearest Biergarten"
        );
        Ok(Found {
            origin,
            nearest,
            candidates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locate::FixedLocator;
    use crate::source::FetchError;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use tokio::sync::Notify;

    struct StubSource {
        candidates: Option<Vec<Candidate>>,
        calls: AtomicUsize,
    }

    impl StubSource {
        fn with(candidates: Vec<Candidate>) -> Self {
            Self {
                candidates: Some(candidates),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                candidates: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl CandidateSource for StubSource {
        async fn fetch(&self, _around: GeoPoint) -> Result<Vec<Candidate>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.candidates {
                Some(c) => Ok(c.clone()),
                None => Err(FetchError::Status(503)),
            }
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    struct DeniedLocator;

    impl Locator for DeniedLocator {
        async fn locate(&self) -> Result<GeoPoint, LocationError> {
            Err(LocationError::PermissionDenied)
        }
    }

    /// Holds the search open until notified.
    struct GatedLocator {
        gate: Arc<Notify>,
        at: GeoPoint,
    }

    impl Locator for GatedLocator {
        async fn locate(&self) -> Result<GeoPoint, LocationError> {
            self.gate.notified().await;
            Ok(self.at)
        }
    }

    fn munich() -> GeoPoint {
        GeoPoint::new(48.1351, 11.5820).unwrap()
    }

    fn scenario() -> Vec<Candidate> {
        vec![
            Candidate::new(GeoPoint::new(48.14, 11.58).unwrap()).with_name("A"),
            Candidate::new(GeoPoint::new(48.10, 11.50).unwrap()).with_name("B"),
        ]
    }

    #[tokio::test]
    async fn finds_nearest() {
        let finder = Finder::new(FixedLocator(munich()), StubSource::with(scenario()));
        let found = finder.search().await.unwrap();
        assert_eq!(found.origin, munich());
        assert_eq!(found.nearest.candidate.display_name(), "A");
        assert_eq!(found.candidates.len(), 2);
    }

    #[tokio::test]
    async fn location_failure_skips_fetch() {
        let finder = Finder::new(DeniedLocator, StubSource::with(scenario()));
        let err = finder.search().await.unwrap_err();
        assert_eq!(err, SearchError::Location(LocationError::PermissionDenied));
        assert_eq!(err.user_message(), "User denied the request for Geolocation.");
        assert_eq!(finder.source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn fetch_failure_means_no_candidates() {
        let finder = Finder::new(FixedLocator(munich()), StubSource::failing());
        let err = finder.search().await.unwrap_err();
        assert_eq!(err, SearchError::NoCandidates);
        assert_eq!(err.user_message(), "No Biergärten available.");
    }

    #[tokio::test]
    async fn empty_list_means_no_candidates() {
        let finder = Finder::new(FixedLocator(munich()), StubSource::with(Vec::new()));
        assert_eq!(finder.search().await.unwrap_err(), SearchError::NoCandidates);
    }

    #[tokio::test]
    async fn overlapping_search_is_ignored() {
        let gate = Arc::new(Notify::new());
        let finder = Finder::new(
            GatedLocator {
                gate: gate.clone(),
                at: munich(),
            },
            StubSource::with(scenario()),
        );

        let (first, second, _) = tokio::join!(finder.search(), finder.search(), async {
            gate.notify_one();
        });
        assert!(first.is_ok());
        assert_eq!(second.unwrap_err(), SearchError::AlreadyRunning);
        assert_eq!(finder.source.calls.load(Ordering::SeqCst), 1);

        // released once the first search finished
        gate.notify_one();
        assert!(finder.search().await.is_ok());
    }

    #[tokio::test]
    async fn guard_released_after_error() {
        let finder = Finder::new(DeniedLocator, StubSource::with(scenario()));
        assert!(finder.search().await.is_err());
        assert_eq!(
            finder.search().await.unwrap_err(),
            SearchError::Location(LocationError::PermissionDenied)
        );
    }
}
