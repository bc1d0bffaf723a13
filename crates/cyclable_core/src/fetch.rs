use std::{future::Future, time::Duration};

use futures::{StreamExt, TryStreamExt, future::try_join_all, stream};
use tracing::debug;

use crate::{error::PipelineError, pairs::PairRequest, ride::Ride};

/// Anything able to turn a pair of points into a bicycle itinerary.
pub trait ItineraryProvider {
    type Error: std::error::Error + Send + Sync + 'static;

    fn fetch_ride(
        &self,
        pair: &PairRequest<'_>,
    ) -> impl Future<Output = Result<Ride, Self::Error>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// At most `permits` requests in flight.
    Concurrent { permits: usize },
    /// Every request starts `base_delay * (origin_index + rank)` after the
    /// first one. Requests sharing a slot start together.
    Staggered { base_delay: Duration },
}

impl Default for Pacing {
    fn default() -> Self {
        Pacing::Concurrent { permits: 4 }
    }
}

async fn fetch_one<P>(provider: &P, pair: &PairRequest<'_>) -> Result<Ride, PipelineError>
where
    P: ItineraryProvider,
{
    debug!(
        "Fetching itinerary {} -> {}",
        pair.origin.id, pair.destination.id
    );

    provider
        .fetch_ride(pair)
        .await
        .map_err(|source| PipelineError::Fetch {
            from: pair.origin.id.clone(),
            to: pair.destination.id.clone(),
            source: Box::new(source),
        })
}

// Roughly 30 years
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Start instant of a staggered request. Saturates instead of overflowing on
/// huge delays.
fn slot_deadline(
    start: tokio::time::Instant,
    base_delay: Duration,
    slot: usize,
) -> tokio::time::Instant {
    let slot = u32::try_from(slot).unwrap_or(u32::MAX);

    start
        .checked_add(base_delay.saturating_mul(slot))
        .or_else(|| start.checked_add(FAR_FUTURE))
        .unwrap_or(start)
}

/// Fetches one ride per pair, in pair order.
///
/// The first failure aborts the whole batch and drops the requests still in
/// flight.
pub async fn fetch_rides<P>(
    provider: &P,
    pairs: &[PairRequest<'_>],
    pacing: Pacing,
) -> Result<Vec<Ride>, PipelineError>
where
    P: ItineraryProvider,
{
    match pacing {
        Pacing::Concurrent { permits } => {
            stream::iter(pairs)
                .map(|pair| fetch_one(provider, pair))
                .buffered(permits.max(1))
                .try_collect()
                .await
        }
        Pacing::Staggered { base_delay } => {
            let start = tokio::time::Instant::now();

            try_join_all(pairs.iter().map(|pair| async move {
                tokio::time::sleep_until(slot_deadline(start, base_delay, pair.schedule_index()))
                    .await;
                fetch_one(provider, pair).await
            }))
            .await
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::{
        pairs::{PairSelectionParams, select_pairs},
        test_utils::{MockProvider, townhall},
    };

    fn points() -> Vec<crate::point::Point> {
        (0..4)
            .map(|i| townhall(&format!("t{i}"), 48.0 + 0.02 * i as f64, -1.6))
            .collect()
    }

    #[tokio::test]
    async fn test_concurrent_fetch_keeps_pair_order() {
        let points = points();
        let pairs = select_pairs(&points, &PairSelectionParams::default());
        let provider = MockProvider::default();

        let rides = fetch_rides(&provider, &pairs, Pacing::Concurrent { permits: 3 })
            .await
            .unwrap();

        assert_eq!(rides.len(), pairs.len());
        for (ride, pair) in rides.iter().zip(&pairs) {
            assert_eq!(ride.from_point, pair.origin.id);
            assert_eq!(ride.to_point, pair.destination.id);
            assert!(ride.backbone_ride);
        }
        assert!(provider.max_in_flight.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn test_concurrent_fetch_with_zero_permits_still_runs() {
        let points = points();
        let pairs = select_pairs(&points, &PairSelectionParams::default());
        let provider = MockProvider::default();

        let rides = fetch_rides(&provider, &pairs, Pacing::Concurrent { permits: 0 })
            .await
            .unwrap();

        assert_eq!(rides.len(), pairs.len());
        assert_eq!(provider.max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_slot_deadline() {
        let start = tokio::time::Instant::now();
        let base_delay = Duration::from_millis(300);

        assert_eq!(slot_deadline(start, base_delay, 0), start);
        assert_eq!(
            slot_deadline(start, base_delay, 3),
            start + Duration::from_millis(900)
        );
    }

    #[test]
    fn test_slot_deadline_saturates_on_huge_delay() {
        let start = tokio::time::Instant::now();

        assert_eq!(slot_deadline(start, Duration::MAX, 0), start);
        assert!(slot_deadline(start, Duration::MAX, 1) > start);
        assert!(slot_deadline(start, Duration::MAX, usize::MAX) > start);
    }

    #[tokio::test(start_paused = true)]
    async fn test_staggered_fetch_waits_for_slot() {
        let points = points();
        let pairs = select_pairs(&points, &PairSelectionParams::default());
        let provider = MockProvider::default();
        let start = tokio::time::Instant::now();

        let rides = fetch_rides(
            &provider,
            &pairs,
            Pacing::Staggered {
                base_delay: Duration::from_millis(300),
            },
        )
        .await
        .unwrap();

        assert_eq!(rides.len(), pairs.len());
        let last_slot = pairs.iter().map(PairRequest::schedule_index).max().unwrap();
        assert!(start.elapsed() >= Duration::from_millis(300) * last_slot as u32);
    }

    #[tokio::test]
    async fn test_first_failure_aborts() {
        let points = points();
        let pairs = select_pairs(&points, &PairSelectionParams::default());
        let provider = MockProvider::failing_on("t2", "t1");

        let error = fetch_rides(&provider, &pairs, Pacing::default())
            .await
            .unwrap_err();

        match error {
            PipelineError::Fetch { from, to, .. } => {
                assert_eq!(from, "t2");
                assert_eq!(to, "t1");
            }
        }
    }
}
