use geojson::FeatureCollection;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    bbox::BBox,
    error::PipelineError,
    fetch::{ItineraryProvider, Pacing, fetch_rides},
    pairs::{PairSelectionParams, select_pairs},
    point::Point,
    reconstruct::{Reconstruction, reconstruct_segments, to_feature_collection},
    ride::{Coordinate, DEFAULT_COORDINATE_SCALE, Ride},
    score::safe_percentage,
    validate::is_valid_ride,
};

#[derive(Debug, Clone)]
pub struct PipelineParams {
    pub pair_selection: PairSelectionParams,
    pub pacing: Pacing,
    /// Divisor applied to the routing table coordinates before they are
    /// matched against the ride geometry.
    pub coordinate_scale: f64,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            pair_selection: PairSelectionParams::default(),
            pacing: Pacing::default(),
            coordinate_scale: DEFAULT_COORDINATE_SCALE,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineStatistics {
    pub pairs: usize,
    pub rides: usize,
    pub rejected_rides: usize,
    pub segments: usize,
    pub missed_boundaries: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResult {
    pub points: Vec<Point>,
    /// Center of the points bounding box.
    pub center: Option<Coordinate>,
    pub segments: FeatureCollection,
    /// Percentage of safe distance, `None` when nothing was ridden.
    pub score: Option<f64>,
    /// Every fetched ride, rejected ones included.
    pub raw_rides: Vec<Ride>,
    pub statistics: PipelineStatistics,
}

pub fn points_center(points: &[Point]) -> Option<Coordinate> {
    points
        .iter()
        .collect::<BBox>()
        .center()
        .map(|center| [center.x, center.y])
}

pub struct Pipeline<P> {
    provider: P,
    params: PipelineParams,
}

impl<P> Pipeline<P>
where
    P: ItineraryProvider,
{
    pub fn new(provider: P, params: PipelineParams) -> Self {
        Self { provider, params }
    }

    pub fn params(&self) -> &PipelineParams {
        &self.params
    }

    pub async fn run(&self, points: Vec<Point>) -> Result<PipelineResult, PipelineError> {
        let center = points_center(&points);

        let pairs = select_pairs(&points, &self.params.pair_selection);
        info!("Selected {} pairs for {} points", pairs.len(), points.len());

        let rides = fetch_rides(&self.provider, &pairs, self.params.pacing).await?;

        let valid_rides: Vec<&Ride> = rides.iter().filter(|ride| is_valid_ride(ride)).collect();
        debug!(
            "{} rides rejected for containing a ferry",
            rides.len() - valid_rides.len()
        );

        let score = safe_percentage(valid_rides.iter().flat_map(|ride| &ride.table));

        let scale = self.params.coordinate_scale;
        let reconstructions: Vec<Reconstruction> = valid_rides
            .par_iter()
            .map(|ride| reconstruct_segments(ride, scale))
            .collect();

        let missed_boundaries = reconstructions.iter().map(|r| r.missed_boundaries).sum();
        let segments = to_feature_collection(reconstructions.iter().flat_map(|r| &r.segments));

        let statistics = PipelineStatistics {
            pairs: pairs.len(),
            rides: rides.len(),
            rejected_rides: rides.len() - valid_rides.len(),
            segments: segments.features.len(),
            missed_boundaries,
        };

        info!(
            "Score: {}, {} segments from {} valid rides",
            score.map_or_else(|| "n/a".to_string(), |score| format!("{score:.1}%")),
            statistics.segments,
            valid_rides.len()
        );

        Ok(PipelineResult {
            points,
            center,
            segments,
            score,
            raw_rides: rides,
            statistics,
        })
    }
}
