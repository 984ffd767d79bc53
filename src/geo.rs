use serde::Serialize;
use thiserror::Error;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6_371.0;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordError {
    #[error("latitude {0} outside [-90, 90]")]
    InvalidLatitude(f64),
    #[error("longitude {0} outside [-180, 180]")]
    InvalidLongitude(f64),
}

/// A position on the globe in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    lat: f64,
    lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordError> {
        // NaN fails both range checks
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordError::InvalidLatitude(lat));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(CoordError::InvalidLongitude(lon));
        }
        Ok(Self { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        haversine_km(self.lat, self.lon, other.lat, other.lon)
    }
}

/// Great-circle distance using the haversine formula.
/// Input lat/lon in degrees. Output in kilometers. NaN inputs give NaN.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (lat1, lon1, lat2, lon2) = (
        lat1.to_radians(),
        lon1.to_radians(),
        lat2.to_radians(),
        lon2.to_radians(),
    );
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // rounding can push antipodal pairs past 1; clamp keeps NaN as NaN
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    #[test]
    fn same_point_is_zero() {
        let marienplatz = point(48.1374, 11.5755);
        assert_eq!(marienplatz.distance_km(&marienplatz), 0.0);
    }

    #[test]
    fn symmetric() {
        let munich = point(48.1351, 11.5820);
        let berlin = point(52.5200, 13.4050);
        let there = munich.distance_km(&berlin);
        let back = berlin.distance_km(&munich);
        assert!((there - back).abs() < 1e-9);
    }

    #[test]
    fn munich_to_berlin() {
        let d = haversine_km(48.1351, 11.5820, 52.5200, 13.4050);
        assert!((d - 504.4).abs() < 1.0, "got {d}");
    }

    #[test]
    fn scales_linearly_along_equator() {
        let one = haversine_km(0.0, 0.0, 0.0, 0.01);
        let two = haversine_km(0.0, 0.0, 0.0, 0.02);
        assert!((two - 2.0 * one).abs() < 1e-9);
        // one degree of arc on a 6371 km sphere
        let degree = haversine_km(0.0, 0.0, 0.0, 1.0);
        assert!((degree - 111.195).abs() < 1e-3, "got {degree}");
    }

    #[test]
    fn antipodes_are_half_the_circumference() {
        let half = std::f64::consts::PI * EARTH_RADIUS_KM;
        for lon in [0.0, 11.582, 45.3, 100.0] {
            for step in 0..=9000 {
                let lat = step as f64 / 100.0;
                let d = haversine_km(lat, lon, -lat, lon - 180.0);
                assert!(d.is_finite(), "lat {lat} lon {lon} gave {d}");
                assert!((d - half).abs() < 1e-3, "lat {lat} lon {lon} gave {d}");
            }
        }
    }

    #[test]
    fn nan_propagates() {
        assert!(haversine_km(f64::NAN, 0.0, 0.0, 0.0).is_nan());
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(GeoPoint::new(90.5, 0.0), Err(CoordError::InvalidLatitude(90.5)));
        assert_eq!(GeoPoint::new(0.0, -180.1), Err(CoordError::InvalidLongitude(-180.1)));
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(-90.0, 180.0).is_ok());
    }
}
