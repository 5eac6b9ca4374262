//! Directional indicator state machine.
//!
//! Tracks how many members lie off-screen in each direction and decides when
//! the bubbles become visible. The engine never reads a clock: every input
//! carries the caller's `Timestamp` and timers fire from [`tick`].
//!
//! Visibility rules:
//! - Any camera change or user activity hides the bubbles at once.
//! - Camera changes recompute only after a quiet window (`debounce_ms`).
//! - Bubbles reappear `display_delay_ms` after the last recompute or
//!   activity, and only while the engine is active with members to show.
//!
//! [`tick`]: DirectionalIndicatorEngine::tick

use std::time::Duration;

use foundation::bounds::Viewport;
use foundation::time::Timestamp;
use members::Member;
use runtime::event_bus::{Event, EventBus};
use runtime::timer::{TimerId, TimerQueue};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::bubble::BubbleInfo;
use crate::navigation::{FlyToOptions, NavigationTarget, plan_target};
use crate::viewport_index::{
    Direction, DirectionCounts, DirectionalBuckets, bucketize, partition,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// Bubbles stay hidden below this zoom.
    pub min_zoom: f64,
    pub debounce_ms: u64,
    pub display_delay_ms: u64,
    pub ready_poll_ms: u64,
    /// Readiness polls before the engine gives up and idles.
    pub max_ready_polls: u32,
    pub enabled: bool,
    pub fly_to: FlyToOptions,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            min_zoom: 3.0,
            debounce_ms: 300,
            display_delay_ms: 2000,
            ready_poll_ms: 100,
            max_ready_polls: 600,
            enabled: true,
            fly_to: FlyToOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewportError {
    /// The map has no size or projection yet.
    NotInitialized,
    Host(String),
}

impl std::fmt::Display for ViewportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewportError::NotInitialized => write!(f, "map is not initialized"),
            ViewportError::Host(msg) => write!(f, "map host error: {msg}"),
        }
    }
}

impl std::error::Error for ViewportError {}

/// Read access to the map camera.
pub trait ViewportProvider {
    /// `Ok(None)` while the map is still loading.
    fn bounds(&self) -> Result<Option<Viewport>, ViewportError>;
    fn zoom(&self) -> f64;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraEvent {
    MoveEnd,
    ZoomEnd,
}

impl CameraEvent {
    pub const ALL: [CameraEvent; 2] = [CameraEvent::MoveEnd, CameraEvent::ZoomEnd];
}

/// A map widget the engine can subscribe to and steer.
///
/// Subscribed events are expected to be forwarded to
/// [`DirectionalIndicatorEngine::on_camera_change`].
pub trait MapHost: ViewportProvider {
    fn subscribe(&mut self, event: CameraEvent);
    fn unsubscribe(&mut self, event: CameraEvent);
    fn fly_to(&mut self, target: &NavigationTarget, options: FlyToOptions);
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    WaitingForReady,
    Computing,
    PendingDisplay,
    Visible,
    Disposed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum IndicatorEvent {
    Recomputed {
        counts: DirectionCounts,
        is_active: bool,
    },
    Revealed,
    Navigated {
        target: NavigationTarget,
    },
    /// Readiness polling hit its bound.
    GaveUpWaiting {
        polls: u32,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum EngineTimer {
    Debounce,
    Reveal,
    ReadyPoll,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSnapshot<'a> {
    pub buckets: &'a DirectionalBuckets<Member>,
    pub counts: DirectionCounts,
    pub is_active: bool,
    pub is_visible: bool,
    pub phase: Phase,
}

#[derive(Debug)]
pub struct DirectionalIndicatorEngine {
    config: IndicatorConfig,
    members: Vec<Member>,
    buckets: DirectionalBuckets<Member>,
    is_active: bool,
    is_visible: bool,
    phase: Phase,
    timers: TimerQueue<EngineTimer>,
    debounce: Option<TimerId>,
    reveal: Option<TimerId>,
    ready_poll: Option<TimerId>,
    ready_polls: u32,
    events: EventBus<IndicatorEvent>,
}

impl Default for DirectionalIndicatorEngine {
    fn default() -> Self {
        Self::new(IndicatorConfig::default())
    }
}

impl DirectionalIndicatorEngine {
    pub fn new(config: IndicatorConfig) -> Self {
        Self {
            config,
            members: Vec::new(),
            buckets: DirectionalBuckets::default(),
            is_active: false,
            is_visible: false,
            phase: Phase::Idle,
            timers: TimerQueue::new(),
            debounce: None,
            reveal: None,
            ready_poll: None,
            ready_polls: 0,
            events: EventBus::new(),
        }
    }

    pub fn with_members(mut self, members: Vec<Member>) -> Self {
        self.members = members;
        self
    }

    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    fn is_disposed(&self) -> bool {
        self.phase == Phase::Disposed
    }

    /// Subscribes to camera events and runs the first computation.
    pub fn attach<H: MapHost>(&mut self, now: Timestamp, host: &mut H) {
        if self.is_disposed() {
            return;
        }
        for event in CameraEvent::ALL {
            host.subscribe(event);
        }
        self.recompute(now, &*host);
    }

    /// Move-end / zoom-end from the host.
    pub fn on_camera_change(&mut self, now: Timestamp) {
        if self.is_disposed() {
            return;
        }
        self.on_user_activity(now);
        self.cancel_slot(EngineTimer::Debounce);
        let id = self.timers.schedule(
            now,
            Duration::from_millis(self.config.debounce_ms),
            EngineTimer::Debounce,
        );
        self.debounce = Some(id);
    }

    /// Hides the bubbles and restarts the display delay.
    pub fn on_user_activity(&mut self, now: Timestamp) {
        if self.is_disposed() {
            return;
        }
        self.is_visible = false;
        self.cancel_slot(EngineTimer::Reveal);
        if self.phase == Phase::WaitingForReady {
            return;
        }
        if self.has_any_bubbles() {
            self.schedule_reveal(now);
        } else if self.phase == Phase::Visible {
            self.phase = Phase::Idle;
        }
    }

    /// Replaces the member list and recomputes right away.
    pub fn set_members<P: ViewportProvider>(
        &mut self,
        now: Timestamp,
        members: Vec<Member>,
        host: &P,
    ) {
        if self.is_disposed() {
            return;
        }
        self.members = members;
        self.ready_polls = 0;
        self.recompute(now, host);
    }

    /// Fires every timer due at or before `now`, in deadline order.
    ///
    /// Each timer runs at its own deadline, so timers it schedules that fall
    /// due before `now` fire within the same call.
    pub fn tick<P: ViewportProvider>(&mut self, now: Timestamp, host: &P) {
        while let Some(due) = self.timers.next_due().filter(|due| *due <= now) {
            let Some((id, timer)) = self.timers.pop_due(due) else {
                break;
            };
            if self.is_disposed() {
                return;
            }
            let slot = self.slot_mut(timer);
            if *slot == Some(id) {
                *slot = None;
            }
            match timer {
                EngineTimer::Debounce => {
                    self.ready_polls = 0;
                    self.recompute(due, host);
                }
                EngineTimer::ReadyPoll => self.recompute(due, host),
                EngineTimer::Reveal => self.reveal(due),
            }
        }
    }

    /// Earliest pending timer deadline, for hosts that sleep between ticks.
    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.timers.next_due()
    }

    /// Unsubscribes and cancels every timer. Later inputs are ignored.
    pub fn dispose<H: MapHost>(&mut self, host: &mut H) {
        if self.is_disposed() {
            return;
        }
        for event in CameraEvent::ALL {
            host.unsubscribe(event);
        }
        let cancelled = self.timers.cancel_all();
        self.debounce = None;
        self.reveal = None;
        self.ready_poll = None;
        self.is_visible = false;
        self.is_active = false;
        self.phase = Phase::Disposed;
        debug!(cancelled, "indicator engine disposed");
    }

    pub fn snapshot(&self) -> IndicatorSnapshot<'_> {
        IndicatorSnapshot {
            buckets: &self.buckets,
            counts: self.buckets.counts(),
            is_active: self.is_active,
            is_visible: self.is_visible,
            phase: self.phase,
        }
    }

    pub fn plan_navigation(&self, direction: Direction) -> Option<NavigationTarget> {
        plan_target(direction, self.buckets.get(direction))
    }

    /// Flies the host camera toward the members hidden in `direction`.
    /// Returns `false` when there is nobody there.
    pub fn navigate<H: MapHost>(
        &mut self,
        now: Timestamp,
        direction: Direction,
        host: &mut H,
    ) -> bool {
        if self.is_disposed() {
            return false;
        }
        let Some(target) = self.plan_navigation(direction) else {
            warn!(%direction, "no members to navigate to");
            return false;
        };
        host.fly_to(&target, self.config.fly_to);
        info!(
            %direction,
            lat = target.center.lat,
            lng = target.center.lng,
            zoom = target.zoom,
            "navigating"
        );
        self.events.emit(now, IndicatorEvent::Navigated { target });
        true
    }

    pub fn bubble_info(&self, direction: Direction) -> BubbleInfo<'_> {
        BubbleInfo::new(direction, self.buckets.get(direction))
    }

    pub fn is_direction_active(&self, direction: Direction) -> bool {
        self.is_active && !self.buckets.get(direction).is_empty()
    }

    pub fn total_hidden(&self) -> usize {
        self.buckets.total()
    }

    pub fn has_any_bubbles(&self) -> bool {
        self.is_active && self.buckets.has_any()
    }

    /// Takes the buffered events. Hosts should drain after each input: the
    /// buffer keeps only the most recent [`EventBus::DEFAULT_CAPACITY`]
    /// events and evicts older ones.
    pub fn drain_events(&mut self) -> Vec<Event<IndicatorEvent>> {
        self.events.drain()
    }

    /// Events evicted because the host did not drain in time.
    pub fn dropped_events(&self) -> u64 {
        self.events.dropped()
    }

    fn recompute<P: ViewportProvider>(&mut self, now: Timestamp, host: &P) {
        if !self.config.enabled || self.members.is_empty() {
            self.reset();
            return;
        }

        let viewport = match host.bounds() {
            Ok(Some(vp)) if vp.is_valid() => vp,
            Ok(_) => {
                self.wait_for_ready(now);
                return;
            }
            Err(err) => {
                warn!(%err, "viewport unavailable, clearing indicators");
                self.reset();
                return;
            }
        };

        self.phase = Phase::Computing;
        self.cancel_slot(EngineTimer::ReadyPoll);
        self.ready_polls = 0;

        let split = partition(&viewport, &self.members);
        let buckets = bucketize(&viewport, split.hidden.iter().copied()).cloned();
        let zoom = host.zoom();
        self.is_active = zoom >= self.config.min_zoom && buckets.has_any();
        self.buckets = buckets;
        self.is_visible = false;

        let counts = self.buckets.counts();
        debug!(
            visible = split.visible.len(),
            hidden = self.buckets.total(),
            skipped = split.skipped,
            zoom,
            active = self.is_active,
            "indicators recomputed"
        );
        self.events.emit(
            now,
            IndicatorEvent::Recomputed {
                counts,
                is_active: self.is_active,
            },
        );

        self.cancel_slot(EngineTimer::Reveal);
        if self.is_active {
            self.schedule_reveal(now);
        } else {
            self.phase = Phase::Idle;
        }
    }

    /// Anything computed against an earlier viewport or member list is
    /// dropped until the map reports usable bounds again.
    fn wait_for_ready(&mut self, now: Timestamp) {
        self.cancel_slot(EngineTimer::ReadyPoll);
        self.cancel_slot(EngineTimer::Reveal);
        self.buckets = DirectionalBuckets::default();
        self.is_active = false;
        self.is_visible = false;
        if self.ready_polls >= self.config.max_ready_polls {
            warn!(polls = self.ready_polls, "map never became ready, giving up");
            self.events.emit(
                now,
                IndicatorEvent::GaveUpWaiting {
                    polls: self.ready_polls,
                },
            );
            self.ready_polls = 0;
            self.phase = Phase::Idle;
            return;
        }
        self.ready_polls += 1;
        let id = self.timers.schedule(
            now,
            Duration::from_millis(self.config.ready_poll_ms),
            EngineTimer::ReadyPoll,
        );
        self.ready_poll = Some(id);
        self.phase = Phase::WaitingForReady;
    }

    fn reveal(&mut self, now: Timestamp) {
        if self.has_any_bubbles() {
            self.is_visible = true;
            self.phase = Phase::Visible;
            self.events.emit(now, IndicatorEvent::Revealed);
        }
    }

    fn schedule_reveal(&mut self, now: Timestamp) {
        let id = self.timers.schedule(
            now,
            Duration::from_millis(self.config.display_delay_ms),
            EngineTimer::Reveal,
        );
        self.reveal = Some(id);
        if self.phase != Phase::WaitingForReady {
            self.phase = Phase::PendingDisplay;
        }
    }

    fn reset(&mut self) {
        self.cancel_slot(EngineTimer::Reveal);
        self.cancel_slot(EngineTimer::ReadyPoll);
        self.buckets = DirectionalBuckets::default();
        self.is_active = false;
        self.is_visible = false;
        self.ready_polls = 0;
        self.phase = Phase::Idle;
    }

    fn slot_mut(&mut self, timer: EngineTimer) -> &mut Option<TimerId> {
        match timer {
            EngineTimer::Debounce => &mut self.debounce,
            EngineTimer::Reveal => &mut self.reveal,
            EngineTimer::ReadyPoll => &mut self.ready_poll,
        }
    }

    fn cancel_slot(&mut self, timer: EngineTimer) {
        if let Some(id) = self.slot_mut(timer).take() {
            self.timers.cancel(id);
        }
    }
}
