use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::candidate::Candidate;
use crate::geo::GeoPoint;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearestResult {
    pub candidate: Candidate,
    pub distance_km: f64,
}

/// Linear scan for the candidate closest to `query`.
/// Ties go to the earlier candidate. `None` when `candidates` is empty.
pub fn find_nearest(query: &GeoPoint, candidates: &[Candidate]) -> Option<NearestResult> {
    let mut nearest: Option<&Candidate> = None;
    let mut min_distance = f64::INFINITY;
    for candidate in candidates {
        let d = query.distance_km(&candidate.point);
        if d < min_distance {
            min_distance = d;
            nearest = Some(candidate);
        }
    }
    nearest.map(|candidate| NearestResult {
        candidate: candidate.clone(),
        distance_km: min_distance,
    })
}

/// Every candidate with its distance, closest first. Stable for equal distances.
pub fn rank_by_distance(query: &GeoPoint, candidates: &[Candidate]) -> Vec<NearestResult> {
    let mut ranked: Vec<NearestResult> = candidates
        .iter()
        .map(|c| NearestResult {
            candidate: c.clone(),
            distance_km: query.distance_km(&c.point),
        })
        .collect();
    ranked.sort_by_key(|r| OrderedFloat(r.distance_km));
    ranked
}
