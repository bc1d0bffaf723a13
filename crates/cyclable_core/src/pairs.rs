use crate::point::Point;

/// Directional itinerary request between a point and one of its neighbors.
#[derive(Debug, Clone, Copy)]
pub struct PairRequest<'a> {
    pub origin: &'a Point,
    pub destination: &'a Point,
    /// Index of the origin in the point list.
    pub origin_index: usize,
    /// Rank of the destination among the origin's neighbors, closest first.
    pub rank: usize,
}

impl PairRequest<'_> {
    /// Slot of the request in a staggered schedule.
    pub fn schedule_index(&self) -> usize {
        self.origin_index + self.rank
    }

    pub fn is_backbone(&self) -> bool {
        self.destination.is_townhall()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PairSelectionParams {
    pub max_neighbors: usize,
    /// Two points closer than this with the same name are the same place.
    pub duplicate_radius_meters: f64,
}

impl Default for PairSelectionParams {
    fn default() -> Self {
        Self {
            // Think of a compass
            max_neighbors: 4,
            duplicate_radius_meters: 1_000.0,
        }
    }
}

fn is_candidate(point: &Point, other: &Point, distance: f64, params: &PairSelectionParams) -> bool {
    if std::ptr::eq(point, other) || point.is_transport_stop() != other.is_transport_stop() {
        return false;
    }

    !(distance < params.duplicate_radius_meters && point.name() == other.name())
}

/// Pairs every point with its closest neighbors of the same kind.
///
/// Requests are ordered by origin, then by neighbor rank.
pub fn select_pairs<'a>(points: &'a [Point], params: &PairSelectionParams) -> Vec<PairRequest<'a>> {
    let neighbors = params.max_neighbors.min(points.len().saturating_sub(1));
    let mut pairs = Vec::with_capacity(points.len() * neighbors);

    for (origin_index, point) in points.iter().enumerate() {
        let mut candidates: Vec<(f64, &Point)> = points
            .iter()
            .map(|other| (point.haversine_distance(other), other))
            .filter(|(distance, other)| is_candidate(point, other, *distance, params))
            .collect();

        candidates.sort_by(|a, b| a.0.total_cmp(&b.0));

        pairs.extend(
            candidates
                .into_iter()
                .take(params.max_neighbors)
                .enumerate()
                .map(|(rank, (_, destination))| PairRequest {
                    origin: point,
                    destination,
                    origin_index,
                    rank,
                }),
        );
    }

    pairs
}
