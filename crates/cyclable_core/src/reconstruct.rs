use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value as GeoJsonValue};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use crate::{
    ride::{Coordinate, Ride, TableRow},
    safety::is_safe_path,
    tags::Tags,
};

/// A tagged slice of a ride geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub coordinates: Vec<Coordinate>,
    pub tags: Tags,
    pub distance: f64,
    pub elevation: f64,
    pub is_safe: bool,
    pub backbone_ride: bool,
    pub from_point: String,
    pub to_point: String,
}

impl Segment {
    fn new(ride: &Ride, row: &TableRow, coordinates: &[Coordinate]) -> Self {
        Self {
            coordinates: coordinates.to_vec(),
            tags: row.tags.clone(),
            distance: row.distance,
            elevation: row.elevation,
            is_safe: is_safe_path(&row.tags),
            backbone_ride: ride.backbone_ride,
            from_point: ride.from_point.clone(),
            to_point: ride.to_point.clone(),
        }
    }

    pub fn to_feature(&self) -> Feature {
        let positions = self.coordinates.iter().map(|c| c.to_vec()).collect();

        let mut properties = JsonObject::new();
        properties.insert("tags".to_string(), json!(self.tags.to_string()));
        properties.insert("distance".to_string(), json!(self.distance));
        properties.insert("elevation".to_string(), json!(self.elevation));
        properties.insert("backboneRide".to_string(), json!(self.backbone_ride));
        properties.insert("isSafePath".to_string(), json!(self.is_safe));
        properties.insert("fromPoint".to_string(), json!(self.from_point));
        properties.insert("toPoint".to_string(), json!(self.to_point));

        Feature {
            bbox: None,
            geometry: Some(Geometry::new(GeoJsonValue::LineString(positions))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }
}

pub fn to_feature_collection<'a>(segments: impl IntoIterator<Item = &'a Segment>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: segments.into_iter().map(Segment::to_feature).collect(),
        foreign_members: None,
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Reconstruction {
    pub segments: Vec<Segment>,
    /// Table rows whose boundary was not found in the geometry.
    pub missed_boundaries: usize,
}

/// Splits the ride geometry into one slice per table row.
///
/// Each slice runs from the cursor up to and including the first coordinate
/// equal to the row boundary. That coordinate also opens the next slice.
/// A boundary that is never found swallows the rest of the geometry, so the
/// following rows get empty slices, which are dropped.
///
/// Boundaries are compared with exact float equality: the descaled table
/// coordinate has to be bit-identical to the geometry coordinate.
pub fn reconstruct_segments(ride: &Ride, scale: f64) -> Reconstruction {
    let geometry = &ride.geometry;
    let mut cursor = 0;
    let mut reconstruction = Reconstruction {
        segments: Vec::with_capacity(ride.table.len()),
        missed_boundaries: 0,
    };

    for row in &ride.table {
        let boundary = row.boundary(scale);
        let start = cursor;

        let slice = match geometry[start..].iter().position(|c| *c == boundary) {
            Some(offset) => {
                cursor = start + offset;
                &geometry[start..=cursor]
            }
            None => {
                reconstruction.missed_boundaries += 1;
                cursor = geometry.len();
                &geometry[start..]
            }
        };

        if !slice.is_empty() {
            reconstruction.segments.push(Segment::new(ride, row, slice));
        }
    }

    if reconstruction.missed_boundaries > 0 {
        warn!(
            "Ride {} -> {}: {}/{} boundaries not found in geometry",
            ride.from_point,
            ride.to_point,
            reconstruction.missed_boundaries,
            ride.table.len()
        );
    }

    reconstruction
}
