use geo::{Distance, Haversine};
use serde::{Deserialize, Serialize};

use crate::{de::deserialize_id, tags::Tags};

static TRANSPORT_STOP_TAGS: [(&str, &[&str]); 4] = [
    ("highway", &["bus_stop"]),
    ("public_transport", &["platform", "stop_position", "station"]),
    ("railway", &["station", "halt", "tram_stop", "stop"]),
    ("amenity", &["bus_station"]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PointCategory {
    TransportStop,
    Townhall,
    Other,
}

/// A sampled location of the metropolitan area, as delivered by the point
/// source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub tags: Tags,
}

impl Point {
    pub fn new(id: impl Into<String>, lat: f64, lon: f64, tags: Tags) -> Self {
        Self {
            id: id.into(),
            lat,
            lon,
            tags,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.tags.get("name")
    }

    // https://wiki.openstreetmap.org/wiki/Tag:amenity%3Dtownhall
    pub fn is_townhall(&self) -> bool {
        self.tags.has_tag("amenity", "townhall")
    }

    pub fn is_transport_stop(&self) -> bool {
        TRANSPORT_STOP_TAGS
            .iter()
            .any(|(key, values)| self.tags.has_any(key, values))
    }

    pub fn category(&self) -> PointCategory {
        if self.is_transport_stop() {
            PointCategory::TransportStop
        } else if self.is_townhall() {
            PointCategory::Townhall
        } else {
            PointCategory::Other
        }
    }

    /// Great-circle distance in meters.
    pub fn haversine_distance(&self, other: &Point) -> f64 {
        Haversine.distance(geo::Point::from(self), geo::Point::from(other))
    }
}

impl From<&Point> for geo::Point<f64> {
    fn from(point: &Point) -> Self {
        geo::Point::new(point.lon, point.lat)
    }
}

impl From<&Point> for geo::Coord<f64> {
    fn from(point: &Point) -> Self {
        geo::Coord {
            x: point.lon,
            y: point.lat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point_with(tags: &[(&str, &str)]) -> Point {
        Point::new("1", 48.11, -1.68, tags.iter().copied().collect())
    }

    #[test]
    fn test_category() {
        assert_eq!(
            point_with(&[("amenity", "townhall")]).category(),
            PointCategory::Townhall
        );
        assert_eq!(
            point_with(&[("highway", "bus_stop")]).category(),
            PointCategory::TransportStop
        );
        assert_eq!(
            point_with(&[("public_transport", "platform")]).category(),
            PointCategory::TransportStop
        );
        assert_eq!(
            point_with(&[("amenity", "library")]).category(),
            PointCategory::Other
        );
        assert_eq!(point_with(&[]).category(), PointCategory::Other);
    }

    #[test]
    fn test_haversine_distance() {
        let a = Point::new("a", 0.0, 0.0, Tags::new());
        let b = Point::new("b", 0.01, 0.0, Tags::new());

        let distance = a.haversine_distance(&b);
        assert!((distance - 1111.9).abs() < 1.0, "got {distance}");
        assert_eq!(a.haversine_distance(&a), 0.0);
    }

    #[test]
    fn test_deserialize_numeric_id() {
        let point: Point = serde_json::from_str(
            r#"{"id": 123456, "lat": 48.1, "lon": -1.6, "tags": {"amenity": "townhall"}}"#,
        )
        .unwrap();

        assert_eq!(point.id, "123456");
        assert!(point.is_townhall());
    }

    #[test]
    fn test_deserialize_without_tags() {
        let point: Point = serde_json::from_str(r#"{"id": "n1", "lat": 1.0, "lon": 2.0}"#).unwrap();

        assert_eq!(point.id, "n1");
        assert!(point.tags.is_empty());
    }
}
