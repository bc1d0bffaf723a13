use std::{
    collections::HashSet,
    sync::atomic::{AtomicUsize, Ordering},
};

use thiserror::Error;

use crate::{
    fetch::ItineraryProvider,
    pairs::PairRequest,
    point::Point,
    ride::{Coordinate, DEFAULT_COORDINATE_SCALE, Ride, TableRow},
    tags::Tags,
};

pub fn townhall(id: &str, lat: f64, lon: f64) -> Point {
    Point::new(
        id,
        lat,
        lon,
        [("amenity", "townhall"), ("name", id)].into_iter().collect(),
    )
}

pub fn bus_stop(id: &str, name: &str, lat: f64, lon: f64) -> Point {
    Point::new(
        id,
        lat,
        lon,
        [("highway", "bus_stop"), ("name", name)].into_iter().collect(),
    )
}

pub fn row(boundary_lon: i64, boundary_lat: i64, distance: f64, tags: &str) -> TableRow {
    TableRow {
        boundary_lon,
        boundary_lat,
        elevation: 0.0,
        distance,
        tags: Tags::parse(tags),
    }
}

pub fn ride(geometry: Vec<Coordinate>, table: Vec<TableRow>) -> Ride {
    Ride {
        geometry,
        table,
        from_point: "a".to_string(),
        to_point: "b".to_string(),
        backbone_ride: true,
    }
}

fn scaled(value: f64) -> i64 {
    (value * DEFAULT_COORDINATE_SCALE).round() as i64
}

/// A straight ride from the origin to the destination of the pair: 100m of
/// cycleway then 300m of primary road.
///
/// A ferry crossing is safe apart from a 50m ferry row, so leaking it into
/// the score would change the safe share.
pub fn straight_ride(pair: &PairRequest<'_>, ferry: bool) -> Ride {
    let from = [pair.origin.lon, pair.origin.lat].map(scaled);
    let to = [pair.destination.lon, pair.destination.lat].map(scaled);
    let middle = [(from[0] + to[0]) / 2, (from[1] + to[1]) / 2];

    let geometry = [from, middle, to]
        .iter()
        .map(|c| {
            [
                c[0] as f64 / DEFAULT_COORDINATE_SCALE,
                c[1] as f64 / DEFAULT_COORDINATE_SCALE,
            ]
        })
        .collect();

    Ride {
        geometry,
        table: if ferry {
            vec![
                row(middle[0], middle[1], 100.0, "highway=cycleway"),
                row(middle[0], middle[1], 50.0, "route=ferry"),
                row(to[0], to[1], 250.0, "highway=cycleway"),
            ]
        } else {
            vec![
                row(middle[0], middle[1], 100.0, "highway=cycleway"),
                row(to[0], to[1], 300.0, "highway=primary"),
            ]
        },
        from_point: pair.origin.id.clone(),
        to_point: pair.destination.id.clone(),
        backbone_ride: pair.is_backbone(),
    }
}

#[derive(Debug, Error)]
#[error("routing service unavailable")]
pub struct MockError;

#[derive(Default)]
pub struct MockProvider {
    failing: Option<(String, String)>,
    ferries: HashSet<(String, String)>,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub calls: AtomicUsize,
}

impl MockProvider {
    pub fn failing_on(from: &str, to: &str) -> Self {
        Self {
            failing: Some((from.to_string(), to.to_string())),
            ..Self::default()
        }
    }

    pub fn with_ferry(mut self, from: &str, to: &str) -> Self {
        self.ferries.insert((from.to_string(), to.to_string()));
        self
    }
}

impl ItineraryProvider for MockProvider {
    type Error = MockError;

    async fn fetch_ride(&self, pair: &PairRequest<'_>) -> Result<Ride, MockError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(in_flight, Ordering::SeqCst);

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let key = (pair.origin.id.clone(), pair.destination.id.clone());
        if self.failing.as_ref() == Some(&key) {
            return Err(MockError);
        }

        Ok(straight_ride(pair, self.ferries.contains(&key)))
    }
}
