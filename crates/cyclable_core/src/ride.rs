use serde::{Deserialize, Serialize};

use crate::tags::Tags;

/// `[lon, lat]`
pub type Coordinate = [f64; 2];

/// Fixed-point divisor of the coordinates in BRouter's message table.
pub const DEFAULT_COORDINATE_SCALE: f64 = 1e6;

/// One row of the routing engine's coarse table.
///
/// The boundary is the last coordinate of the stretch described by the row,
/// stored as scaled integers. Once descaled it is expected to be one of the
/// coordinates of the ride geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub boundary_lon: i64,
    pub boundary_lat: i64,
    pub elevation: f64,
    /// Meters
    pub distance: f64,
    pub tags: Tags,
}

impl TableRow {
    pub fn boundary(&self, scale: f64) -> Coordinate {
        [
            self.boundary_lon as f64 / scale,
            self.boundary_lat as f64 / scale,
        ]
    }

    // https://wiki.openstreetmap.org/wiki/Tag:route%3Dferry
    pub fn is_ferry(&self) -> bool {
        self.tags.has_tag("route", "ferry")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ride {
    pub geometry: Vec<Coordinate>,
    pub table: Vec<TableRow>,
    pub from_point: String,
    pub to_point: String,
    /// The destination is a town hall.
    pub backbone_ride: bool,
}

impl Ride {
    pub fn distance(&self) -> f64 {
        self.table.iter().map(|row| row.distance).sum()
    }
}
