//! Rider position tracking during active delivery.
//!
//! Once an order goes out for delivery, a per-partner poller samples the
//! rider's latest reported position every five seconds, republishing it to
//! local display state and pushing it to the backend as an availability
//! update. Push failures are logged and skipped - never retried, never
//! surfaced.
//!
//! The poller is a two-state machine, [`PollerState`]: `Idle` (no active
//! delivery) and `Tracking` (interval timer running). Starting cancels any
//! previous timer first, so restarts are idempotent and two timers can
//! never run for the same partner. Stopping an idle poller is a no-op.
//! Tracking ends on teardown or when the order is marked delivered.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, warn};

use plateful_core::{GeoPoint, OrderId, PartnerId};

use crate::api::ApiError;

/// Fixed sampling interval while tracking.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Source of rider position samples.
///
/// Server-side this is the latest fix the rider's device reported; tests
/// script it. A `None` means no usable fix for this tick.
pub trait LocationSource: Send + Sync + 'static {
    /// Sample the current position of `partner`, if one is known.
    fn sample(&self, partner: PartnerId) -> Option<GeoPoint>;
}

/// The backend push made on every successful sample, as a seam for testing.
#[async_trait]
pub trait AvailabilityGateway: Send + Sync {
    /// Publish the rider's position to the backend.
    async fn push_location(&self, partner: PartnerId, location: GeoPoint) -> Result<(), ApiError>;
}

/// Latest device fix per partner, fed by the location report endpoint.
#[derive(Default)]
pub struct FixBoard {
    latest: RwLock<HashMap<PartnerId, GeoPoint>>,
}

impl FixBoard {
    /// Record the most recent fix for a partner, replacing any previous one.
    pub fn report(&self, partner: PartnerId, fix: GeoPoint) {
        if let Ok(mut latest) = self.latest.write() {
            latest.insert(partner, fix);
        }
    }
}

impl LocationSource for FixBoard {
    fn sample(&self, partner: PartnerId) -> Option<GeoPoint> {
        self.latest.read().ok()?.get(&partner).copied()
    }
}

/// Poller state: no active delivery, or a running interval timer.
enum PollerState {
    Idle,
    Tracking { order: OrderId, task: JoinHandle<()> },
}

struct TrackerShared {
    partner: PartnerId,
    position: watch::Sender<Option<GeoPoint>>,
    source: Arc<dyn LocationSource>,
    gateway: Arc<dyn AvailabilityGateway>,
}

/// Position poller for one delivery partner.
pub struct RideTracker {
    shared: Arc<TrackerShared>,
    state: Mutex<PollerState>,
}

impl RideTracker {
    /// Create an idle tracker for `partner`.
    #[must_use]
    pub fn new(
        partner: PartnerId,
        source: Arc<dyn LocationSource>,
        gateway: Arc<dyn AvailabilityGateway>,
    ) -> Self {
        let (position, _) = watch::channel(None);
        Self {
            shared: Arc::new(TrackerShared {
                partner,
                position,
                source,
                gateway,
            }),
            state: Mutex::new(PollerState::Idle),
        }
    }

    /// Begin tracking `order`.
    ///
    /// Any previous timer is cancelled first, so calling this for a new
    /// order while one is already tracked is safe. One immediate sample is
    /// taken and published on entry; if it is unavailable the last-known
    /// position is left as-is and the transition still happens. Backend
    /// pushes begin with the interval ticks.
    pub async fn start(&self, order: OrderId) {
        let mut state = self.state.lock().await;
        if let PollerState::Tracking { task, .. } = &*state {
            task.abort();
        }

        if let Some(fix) = self.shared.source.sample(self.shared.partner) {
            self.shared.position.send_replace(Some(fix));
        }

        let shared = Arc::clone(&self.shared);
        let task = tokio::spawn(async move {
            let mut ticker = time::interval(POLL_INTERVAL);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // the first tick of an interval completes immediately; the
            // entry sample already covered it
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(fix) = shared.source.sample(shared.partner) else {
                    // no usable sample this tick; keep going
                    continue;
                };
                shared.position.send_replace(Some(fix));
                if let Err(e) = shared.gateway.push_location(shared.partner, fix).await {
                    warn!(partner = %shared.partner, error = %e, "availability push failed");
                }
            }
        });

        debug!(partner = %self.shared.partner, order = %order, "tracking started");
        *state = PollerState::Tracking { order, task };
    }

    /// Stop tracking and cancel the timer.
    ///
    /// Stopping an idle tracker is a no-op.
    pub async fn stop(&self) {
        let mut state = self.state.lock().await;
        if let PollerState::Tracking { order, task } = &*state {
            task.abort();
            debug!(partner = %self.shared.partner, order = %order, "tracking stopped");
        }
        *state = PollerState::Idle;
    }

    /// The order currently being tracked, if any.
    pub async fn current_order(&self) -> Option<OrderId> {
        match &*self.state.lock().await {
            PollerState::Idle => None,
            PollerState::Tracking { order, .. } => Some(*order),
        }
    }

    /// Latest published rider position; display state holds only this.
    #[must_use]
    pub fn position(&self) -> Option<GeoPoint> {
        *self.shared.position.borrow()
    }
}

impl Drop for RideTracker {
    fn drop(&mut self) {
        // teardown cancels the timer; get_mut needs no lock
        if let PollerState::Tracking { task, .. } = self.state.get_mut() {
            task.abort();
        }
    }
}

/// Lazily-created trackers, one per delivery partner.
pub struct TrackerSet {
    trackers: StdMutex<HashMap<PartnerId, Arc<RideTracker>>>,
    source: Arc<dyn LocationSource>,
    gateway: Arc<dyn AvailabilityGateway>,
}

impl TrackerSet {
    /// Create an empty set backed by the given source and gateway.
    #[must_use]
    pub fn new(source: Arc<dyn LocationSource>, gateway: Arc<dyn AvailabilityGateway>) -> Self {
        Self {
            trackers: StdMutex::new(HashMap::new()),
            source,
            gateway,
        }
    }

    /// Get or create the tracker for `partner`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned, which can only happen after
    /// another panic.
    #[must_use]
    pub fn for_partner(&self, partner: PartnerId) -> Arc<RideTracker> {
        let mut trackers = self
            .trackers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Arc::clone(trackers.entry(partner).or_insert_with(|| {
            Arc::new(RideTracker::new(
                partner,
                Arc::clone(&self.source),
                Arc::clone(&self.gateway),
            ))
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use tokio::time::Instant;

    /// Scripted source: hands out fixes in order, then `None` forever.
    struct ScriptedSource {
        fixes: StdMutex<VecDeque<Option<GeoPoint>>>,
    }

    impl ScriptedSource {
        fn new(fixes: Vec<Option<GeoPoint>>) -> Arc<Self> {
            Arc::new(Self {
                fixes: StdMutex::new(fixes.into()),
            })
        }
    }

    impl LocationSource for ScriptedSource {
        fn sample(&self, _partner: PartnerId) -> Option<GeoPoint> {
            self.fixes.lock().unwrap().pop_front().flatten()
        }
    }

    /// Gateway double recording push instants and payloads.
    #[derive(Default)]
    struct RecordingGateway {
        pushes: StdMutex<Vec<(Instant, GeoPoint)>>,
    }

    #[async_trait]
    impl AvailabilityGateway for RecordingGateway {
        async fn push_location(
            &self,
            _partner: PartnerId,
            location: GeoPoint,
        ) -> Result<(), ApiError> {
            self.pushes.lock().unwrap().push((Instant::now(), location));
            Ok(())
        }
    }

    fn point(n: f64) -> GeoPoint {
        GeoPoint::new(19.0 + n, 72.8 + n)
    }

    #[tokio::test(start_paused = true)]
    async fn two_successful_samples_push_five_seconds_apart() {
        let source = ScriptedSource::new(vec![Some(point(0.0)), Some(point(0.1)), Some(point(0.2))]);
        let gateway = Arc::new(RecordingGateway::default());
        let tracker = RideTracker::new(PartnerId::new(1), source, gateway.clone());

        let started = Instant::now();
        tracker.start(OrderId::new(10)).await;
        // entry sample publishes immediately, without a backend push
        assert_eq!(tracker.position(), Some(point(0.0)));
        assert!(gateway.pushes.lock().unwrap().is_empty());

        time::sleep(Duration::from_secs(11)).await;

        let pushes = gateway.pushes.lock().unwrap();
        assert_eq!(pushes.len(), 2);
        assert_eq!(pushes[0].0 - started, Duration::from_secs(5));
        assert_eq!(pushes[1].0 - pushes[0].0, Duration::from_secs(5));
        drop(pushes);

        // display state holds only the latest position
        assert_eq!(tracker.position(), Some(point(0.2)));

        tracker.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn failed_samples_are_skipped_silently() {
        let source = ScriptedSource::new(vec![None, None, Some(point(0.5))]);
        let gateway = Arc::new(RecordingGateway::default());
        let tracker = RideTracker::new(PartnerId::new(1), source, gateway.clone());

        tracker.start(OrderId::new(10)).await;
        // entry sample failed: last-known position stays unset
        assert_eq!(tracker.position(), None);

        time::sleep(Duration::from_secs(11)).await;

        // first tick skipped, second tick published and pushed
        assert_eq!(gateway.pushes.lock().unwrap().len(), 1);
        assert_eq!(tracker.position(), Some(point(0.5)));

        tracker.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn restart_replaces_the_previous_timer() {
        let source = ScriptedSource::new(vec![Some(point(0.0)); 8]);
        let gateway = Arc::new(RecordingGateway::default());
        let tracker = RideTracker::new(PartnerId::new(1), source, gateway.clone());

        tracker.start(OrderId::new(10)).await;
        tracker.start(OrderId::new(11)).await;
        assert_eq!(tracker.current_order().await, Some(OrderId::new(11)));

        // one timer, not two: a single push per interval
        time::sleep(Duration::from_secs(6)).await;
        assert_eq!(gateway.pushes.lock().unwrap().len(), 1);

        tracker.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn stop_is_idempotent_and_ends_the_pushes() {
        let source = ScriptedSource::new(vec![Some(point(0.0)); 8]);
        let gateway = Arc::new(RecordingGateway::default());
        let tracker = RideTracker::new(PartnerId::new(1), source, gateway.clone());

        tracker.start(OrderId::new(10)).await;
        tracker.stop().await;
        tracker.stop().await;
        assert_eq!(tracker.current_order().await, None);

        let before = gateway.pushes.lock().unwrap().len();
        time::sleep(Duration::from_secs(12)).await;
        assert_eq!(gateway.pushes.lock().unwrap().len(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn tracker_set_reuses_one_tracker_per_partner() {
        let source = ScriptedSource::new(vec![]);
        let gateway = Arc::new(RecordingGateway::default());
        let set = TrackerSet::new(source, gateway);

        let a = set.for_partner(PartnerId::new(1));
        let b = set.for_partner(PartnerId::new(1));
        let other = set.for_partner(PartnerId::new(2));
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &other));
    }

    #[test]
    fn fix_board_keeps_the_latest_report() {
        let board = FixBoard::default();
        let partner = PartnerId::new(3);
        assert_eq!(board.sample(partner), None);

        board.report(partner, point(0.0));
        board.report(partner, point(1.0));
        assert_eq!(board.sample(partner), Some(point(1.0)));
    }
}
