use std::io::Write;

use anyhow::Result;
use csv::Writer;
use serde::Serialize;

use crate::finder::Found;
use crate::geo::GeoPoint;
use crate::nearest::{rank_by_distance, NearestResult};

pub fn google_maps_walking_url(from: &GeoPoint, to: &GeoPoint) -> String {
    format!(
        "https://www.google.com/maps/dir/?api=1&origin={},{}&destination={},{}&travelmode=walking",
        from.lat(),
        from.lon(),
        to.lat(),
        to.lon()
    )
}

pub fn osm_walking_url(from: &GeoPoint, to: &GeoPoint) -> String {
    format!(
        "https://www.openstreetmap.org/directions?engine=fossgis_osrm&route={}%2C{}%3B{}%2C{}&transport=foot",
        from.lat(),
        from.lon(),
        to.lat(),
        to.lon()
    )
}

/// Human readable block for the nearest Biergarten.
pub fn write_summary<W: Write>(out: &mut W, found: &Found) -> Result<()> {
    let candidate = &found.nearest.candidate;
    let at = &candidate.point;
    writeln!(out, "{}", candidate.display_name())?;
    writeln!(out, "Latitude: {}, Longitude: {}", at.lat(), at.lon())?;
    if let Some(cost) = &candidate.cost {
        writeln!(out, "Cost: {}", cost)?;
    }
    if let Some(rating) = &candidate.rating {
        writeln!(out, "Rating: {}", rating)?;
    }
    writeln!(out, "Distance: {:.2} km", found.nearest.distance_km)?;
    writeln!(
        out,
        "Navigate with Google Maps (Walking): {}",
        google_maps_walking_url(&found.origin, at)
    )?;
    writeln!(
        out,
        "Navigate with OpenStreetMap (Walking): {}",
        osm_walking_url(&found.origin, at)
    )?;
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    origin: &'a GeoPoint,
    nearest: &'a NearestResult,
    google_maps: String,
    openstreetmap: String,
}

pub fn write_json<W: Write>(out: &mut W, found: &Found) -> Result<()> {
    let at = &found.nearest.candidate.point;
    let report = JsonReport {
        origin: &found.origin,
        nearest: &found.nearest,
        google_maps: google_maps_walking_url(&found.origin, at),
        openstreetmap: osm_walking_url(&found.origin, at),
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

/// All candidates ranked by distance, as CSV. Returns the number of rows written.
pub fn write_ranking<W: Write>(out: W, found: &Found) -> Result<usize> {
    let ranked = rank_by_distance(&found.origin, &found.candidates);
    let mut wtr = Writer::from_writer(out);
    wtr.write_record(["rank", "name", "lat", "lon", "distance_km", "cost", "rating"])?;
    for (i, r) in ranked.iter().enumerate() {
        let c = &r.candidate;
        wtr.write_record(&[
            (i + 1).to_string(),
            c.display_name().to_string(),
            c.point.lat().to_string(),
            c.point.lon().to_string(),
            format!("{:.3}", r.distance_km),
            c.cost.clone().unwrap_or_default(),
            c.rating.clone().unwrap_or_default(),
        ])?;
    }
    wtr.flush()?;
    Ok(ranked.len())
}
