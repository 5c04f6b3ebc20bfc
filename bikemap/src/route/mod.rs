//! Incremental multi-stop route construction
//!
//! A route is an ordered chain of directions-API segments. Past segments
//! are frozen; at most one pending segment tracks the live map center and
//! is re-fetched, under a throttle, while the center moves. Contiguity is
//! enforced at append time: a new segment starts where the previous
//! resolved geometry ends.

pub mod throttle;

use std::time::Duration;

use geo::{EuclideanDistance, Point};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use tracing::{debug, warn};

use crate::directions::Directions;
use throttle::Throttle;

/// A resolved leg of the route
#[derive(Debug, Clone)]
pub struct Segment {
    pub origin: Point,
    pub destination: Point,

    /// Line-string feature returned by the directions lookup
    pub feature: Feature,
}

/// The live leg; unresolved until a directions fetch lands
#[derive(Debug, Clone)]
struct PendingSegment {
    origin: Point,
    destination: Point,
    feature: Option<Feature>,
}

/// Multi-stop route state machine
///
/// Owned by a single UI session; all mutation goes through the methods
/// below, and the `features`/`origin` views are derived on demand.
pub struct RouteBuilder<D> {
    directions: D,
    past: Vec<Segment>,
    pending: Option<PendingSegment>,
    throttle: Throttle,
    min_leg_distance: f64,
    tracking: bool,
}

impl<D: Directions> RouteBuilder<D> {
    pub fn new(directions: D, throttle_period: Duration, min_leg_distance: f64) -> Self {
        Self {
            directions,
            past: Vec::new(),
            pending: None,
            throttle: Throttle::new(throttle_period),
            min_leg_distance,
            tracking: true,
        }
    }

    /// Enables or disables live tracking of the map center
    pub fn set_tracking(&mut self, tracking: bool) {
        self.tracking = tracking;
    }

    /// Commits the pending leg and opens a new one toward the center.
    ///
    /// A no-op while the pending leg is unresolved: an empty leg cannot be
    /// committed. The new leg starts at the last resolved coordinate of
    /// the committed leg, or at the center for the first stop.
    pub fn add_stop(&mut self, center: Point) {
        if matches!(&self.pending, Some(pending) if pending.feature.is_none()) {
            return;
        }

        if let Some(PendingSegment {
            origin,
            destination,
            feature: Some(feature),
        }) = self.pending.take()
        {
            self.past.push(Segment {
                origin,
                destination,
                feature,
            });
        }

        let origin = self
            .past
            .last()
            .and_then(|segment| last_coordinate(&segment.feature))
            .unwrap_or(center);

        self.pending = Some(PendingSegment {
            origin,
            destination: center,
            feature: None,
        });
    }

    /// Discards the last committed leg and reopens it as the live leg,
    /// letting the user redo it with a new endpoint. A no-op without
    /// committed legs.
    pub fn remove_stop(&mut self, center: Point) {
        let Some(last) = self.past.pop() else {
            return;
        };
        self.pending = Some(PendingSegment {
            origin: last.origin,
            destination: center,
            feature: None,
        });
    }

    /// Discards all route state. Idempotent.
    pub fn clear(&mut self) {
        self.past.clear();
        self.pending = None;
        self.throttle.reset();
    }

    pub fn can_remove_stop(&self) -> bool {
        !self.past.is_empty()
    }

    /// True while the live leg exists but has no geometry yet
    pub fn has_unresolved_leg(&self) -> bool {
        matches!(&self.pending, Some(pending) if pending.feature.is_none())
    }

    pub fn past_segments(&self) -> &[Segment] {
        &self.past
    }

    /// Feeds a map-center movement into the live leg.
    ///
    /// Fetches directions from the leg origin to the center once the
    /// center has moved past the minimum distance, at most once per
    /// throttle window; movements inside the window are dropped, so only
    /// the latest center is ever fetched. A failed fetch leaves the leg
    /// in its previous state; the next movement retries implicitly.
    pub async fn track_center(&mut self, center: Point) {
        if !self.tracking {
            return;
        }
        let Some(pending) = &self.pending else {
            return;
        };
        if pending.origin.euclidean_distance(&center) < self.min_leg_distance {
            return;
        }
        if !self.throttle.admit() {
            return;
        }

        let origin = pending.origin;
        debug!(?origin, ?center, "Fetching directions for live leg");

        match self.directions.fetch_route(origin, center).await {
            Ok(feature) => {
                if let Some(pending) = &mut self.pending {
                    pending.destination = center;
                    pending.feature = Some(feature);
                }
            }
            Err(err) => {
                warn!("Directions fetch failed: {err}");
            }
        }
    }

    /// Derived render view: every resolved line geometry plus a point
    /// feature at each resolved leg's start and end coordinate.
    pub fn features(&self) -> FeatureCollection {
        let resolved: Vec<&Feature> = self
            .past
            .iter()
            .map(|segment| &segment.feature)
            .chain(self.pending.iter().filter_map(|p| p.feature.as_ref()))
            .collect();

        let mut features: Vec<Feature> = resolved.iter().map(|f| (*f).clone()).collect();
        for feature in &resolved {
            let coordinates = line_coordinates(feature);
            if let Some(first) = coordinates.first() {
                features.push(point_feature(first));
            }
            if let Some(last) = coordinates.last() {
                features.push(point_feature(last));
            }
        }

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }

    /// Derived start-of-route marker position: the first coordinate of the
    /// earliest leg's resolved geometry, its raw origin while unresolved,
    /// or nothing for an empty route.
    pub fn origin(&self) -> Option<Vec<f64>> {
        if let Some(first) = self.past.first() {
            return Some(
                line_coordinates(&first.feature)
                    .first()
                    .cloned()
                    .unwrap_or_else(|| vec![first.origin.x(), first.origin.y()]),
            );
        }

        self.pending.as_ref().map(|pending| {
            pending
                .feature
                .as_ref()
                .and_then(|feature| line_coordinates(feature).first().cloned())
                .unwrap_or_else(|| vec![pending.origin.x(), pending.origin.y()])
        })
    }
}

fn line_coordinates(feature: &Feature) -> &[Vec<f64>] {
    match &feature.geometry {
        Some(Geometry {
            value: Value::LineString(coordinates),
            ..
        }) => coordinates,
        _ => &[],
    }
}

fn last_coordinate(feature: &Feature) -> Option<Point> {
    let position = line_coordinates(feature).last()?;
    Some(Point::new(position[0], position[1]))
}

fn point_feature(position: &[f64]) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(position.to_vec()))),
        id: None,
        properties: Some(JsonObject::new()),
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directions::DirectionsError;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Straight-line directions stub. The first coordinate is nudged off
    /// the requested origin, like a road-snapped route.
    #[derive(Clone, Default)]
    struct StubDirections {
        calls: Arc<AtomicUsize>,
        fail: Arc<AtomicBool>,
    }

    impl Directions for StubDirections {
        async fn fetch_route(
            &self,
            origin: Point,
            destination: Point,
        ) -> Result<Feature, DirectionsError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            if self.fail.load(Ordering::Relaxed) {
                return Err(DirectionsError::NoRoute);
            }
            Ok(Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::LineString(vec![
                    vec![origin.x() + 0.0002, origin.y()],
                    vec![destination.x(), destination.y()],
                ]))),
                id: None,
                properties: Some(JsonObject::new()),
                foreign_members: None,
            })
        }
    }

    const PERIOD: Duration = Duration::from_millis(250);
    const MIN_LEG: f64 = 0.001;

    fn builder(stub: &StubDirections) -> RouteBuilder<StubDirections> {
        RouteBuilder::new(stub.clone(), PERIOD, MIN_LEG)
    }

    async fn next_window() {
        tokio::time::advance(PERIOD).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_stop_opens_pending_at_center() {
        let stub = StubDirections::default();
        let mut route = builder(&stub);

        route.add_stop(Point::new(34.78, 32.08));

        assert!(route.has_unresolved_leg());
        assert!(!route.can_remove_stop());
        assert_eq!(route.origin(), Some(vec![34.78, 32.08]));
        assert!(route.features().features.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_stop_noop_while_unresolved() {
        let stub = StubDirections::default();
        let mut route = builder(&stub);

        route.add_stop(Point::new(34.78, 32.08));
        route.add_stop(Point::new(34.9, 32.2));

        // Still the first pending leg, nothing committed
        assert!(route.past_segments().is_empty());
        assert_eq!(route.origin(), Some(vec![34.78, 32.08]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_leg_starts_at_resolved_end() {
        let stub = StubDirections::default();
        let mut route = builder(&stub);

        route.add_stop(Point::new(34.78, 32.08));
        route.track_center(Point::new(34.79, 32.09)).await;
        assert!(!route.has_unresolved_leg());

        route.add_stop(Point::new(34.79, 32.09));

        assert_eq!(route.past_segments().len(), 1);
        // The new leg starts at the resolved end, not the raw destination
        let pending_origin = route.pending.as_ref().unwrap().origin;
        assert_eq!(pending_origin, Point::new(34.79, 32.09));
    }

    #[tokio::test(start_paused = true)]
    async fn test_contiguity_across_add_and_remove() {
        let stub = StubDirections::default();
        let mut route = builder(&stub);

        let stops = [
            Point::new(34.78, 32.08),
            Point::new(34.79, 32.09),
            Point::new(34.8, 32.1),
            Point::new(34.81, 32.11),
        ];

        route.add_stop(stops[0]);
        for stop in &stops[1..] {
            next_window().await;
            route.track_center(*stop).await;
            route.add_stop(*stop);
        }

        route.remove_stop(Point::new(34.82, 32.12));
        next_window().await;
        route.track_center(Point::new(34.82, 32.12)).await;
        route.add_stop(Point::new(34.82, 32.12));

        let past = route.past_segments();
        assert_eq!(past.len(), 3);
        for pair in past.windows(2) {
            assert_eq!(pair[0].destination, pair[1].origin);
            assert_eq!(last_coordinate(&pair[0].feature), Some(pair[1].origin));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_stop_reopens_last_leg() {
        let stub = StubDirections::default();
        let mut route = builder(&stub);

        route.add_stop(Point::new(34.78, 32.08));
        route.track_center(Point::new(34.79, 32.09)).await;
        route.add_stop(Point::new(34.79, 32.09));
        next_window().await;
        route.track_center(Point::new(34.8, 32.1)).await;
        route.add_stop(Point::new(34.8, 32.1));

        assert_eq!(route.past_segments().len(), 2);
        let reopened_origin = route.past_segments()[1].origin;

        route.remove_stop(Point::new(34.85, 32.15));

        assert_eq!(route.past_segments().len(), 1);
        assert!(route.has_unresolved_leg());
        let pending = route.pending.as_ref().unwrap();
        assert_eq!(pending.origin, reopened_origin);
        assert_eq!(pending.destination, Point::new(34.85, 32.15));
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_stop_noop_without_committed_legs() {
        let stub = StubDirections::default();
        let mut route = builder(&stub);

        route.remove_stop(Point::new(34.78, 32.08));
        assert!(route.pending.is_none());

        route.add_stop(Point::new(34.78, 32.08));
        route.remove_stop(Point::new(34.79, 32.09));
        // Pending alone is not a committed leg; it stays as it was
        assert_eq!(route.pending.as_ref().unwrap().origin, Point::new(34.78, 32.08));
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_is_idempotent_on_empty() {
        let stub = StubDirections::default();
        let mut route = builder(&stub);

        route.clear();
        assert!(route.origin().is_none());
        assert!(route.features().features.is_empty());

        route.add_stop(Point::new(34.78, 32.08));
        route.track_center(Point::new(34.79, 32.09)).await;
        route.clear();
        route.clear();

        assert!(route.past_segments().is_empty());
        assert!(route.pending.is_none());
        assert!(route.origin().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_fetch_below_min_distance() {
        let stub = StubDirections::default();
        let mut route = builder(&stub);

        route.add_stop(Point::new(34.78, 32.08));
        route.track_center(Point::new(34.7801, 32.0801)).await;

        assert_eq!(stub.calls.load(Ordering::Relaxed), 0);
        assert!(route.has_unresolved_leg());
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_fetch_without_pending_leg() {
        let stub = StubDirections::default();
        let mut route = builder(&stub);

        route.track_center(Point::new(34.79, 32.09)).await;
        assert_eq!(stub.calls.load(Ordering::Relaxed), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_fetch_while_tracking_disabled() {
        let stub = StubDirections::default();
        let mut route = builder(&stub);

        route.add_stop(Point::new(34.78, 32.08));
        route.set_tracking(false);
        route.track_center(Point::new(34.79, 32.09)).await;
        assert_eq!(stub.calls.load(Ordering::Relaxed), 0);

        route.set_tracking(true);
        route.track_center(Point::new(34.79, 32.09)).await;
        assert_eq!(stub.calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_count_bounded_by_throttle() {
        let stub = StubDirections::default();
        let mut route = builder(&stub);

        route.add_stop(Point::new(34.78, 32.08));

        // A one-second drag, one center update every 25 ms
        for i in 0..40 {
            let center = Point::new(34.79 + 0.001 * i as f64, 32.09);
            route.track_center(center).await;
            tokio::time::advance(Duration::from_millis(25)).await;
        }

        let calls = stub.calls.load(Ordering::Relaxed);
        assert!(calls <= 5, "issued {calls} fetches");
        assert!(calls >= 4, "issued {calls} fetches");
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_fetch_leaves_leg_unresolved_and_retries() {
        let stub = StubDirections::default();
        let mut route = builder(&stub);

        stub.fail.store(true, Ordering::Relaxed);
        route.add_stop(Point::new(34.78, 32.08));
        route.track_center(Point::new(34.79, 32.09)).await;

        assert_eq!(stub.calls.load(Ordering::Relaxed), 1);
        assert!(route.has_unresolved_leg());
        assert_eq!(route.origin(), Some(vec![34.78, 32.08]));

        // The next movement past the threshold retries
        stub.fail.store(false, Ordering::Relaxed);
        next_window().await;
        route.track_center(Point::new(34.8, 32.1)).await;

        assert_eq!(stub.calls.load(Ordering::Relaxed), 2);
        assert!(!route.has_unresolved_leg());
    }

    #[tokio::test(start_paused = true)]
    async fn test_features_view_has_lines_and_endpoints() {
        let stub = StubDirections::default();
        let mut route = builder(&stub);

        route.add_stop(Point::new(34.78, 32.08));
        route.track_center(Point::new(34.79, 32.09)).await;
        route.add_stop(Point::new(34.79, 32.09));
        next_window().await;
        route.track_center(Point::new(34.8, 32.1)).await;

        let features = route.features().features;
        let lines = features
            .iter()
            .filter(|f| {
                matches!(
                    f.geometry.as_ref().map(|g| &g.value),
                    Some(Value::LineString(_))
                )
            })
            .count();
        let points = features
            .iter()
            .filter(|f| {
                matches!(f.geometry.as_ref().map(|g| &g.value), Some(Value::Point(_)))
            })
            .count();

        // Two resolved legs: the committed one and the live one
        assert_eq!(lines, 2);
        assert_eq!(points, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_origin_prefers_resolved_geometry() {
        let stub = StubDirections::default();
        let mut route = builder(&stub);

        route.add_stop(Point::new(34.78, 32.08));
        assert_eq!(route.origin(), Some(vec![34.78, 32.08]));

        route.track_center(Point::new(34.79, 32.09)).await;

        // The stub snaps the first coordinate off the raw origin
        assert_eq!(route.origin(), Some(vec![34.78 + 0.0002, 32.08]));
    }
}
