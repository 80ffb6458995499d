//! Manual adjustment of the displayed time by dragging pointers
//!
//! While adjusting, the clock is stopped and every drag step rewrites the
//! clock's origin so that the dragged pointer shows the time under the cursor.
//! Dragging the hour or minute pointer through 12 o'clock carries a full
//! revolution into the next pointer up, so a drag can move the time across
//! hour (or half-day) boundaries.

use std::collections::VecDeque;

use tracing::{debug, info};

use crate::clock::{ClockModel, FrameScheduler};
use crate::geometry::{angle_of, Point};
use crate::pointer::{PointerKind, DEFAULT_HIT_WIDTH};

/// Direction of a pass through 12 o'clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrossingDirection {
    #[default]
    None,
    Clockwise,
    Counterclockwise,
}

impl CrossingDirection {
    /// Classify the move `previous` -> `current` around `center`
    ///
    /// Only moves that stay in the upper half of the dial can cross 12. The
    /// vertical line through the center belongs to the right-hand side.
    pub fn classify(center: Point, previous: Point, current: Point) -> Self {
        let in_upper_half = previous.y < center.y && current.y < center.y;
        if !in_upper_half {
            return CrossingDirection::None;
        }
        let was_left = previous.x < center.x;
        let is_left = current.x < center.x;
        match (was_left, is_left) {
            (true, false) => CrossingDirection::Clockwise,
            (false, true) => CrossingDirection::Counterclockwise,
            _ => CrossingDirection::None,
        }
    }

    /// Revolutions this crossing carries
    fn sign(self) -> f64 {
        match self {
            CrossingDirection::None => 0.0,
            CrossingDirection::Clockwise => 1.0,
            CrossingDirection::Counterclockwise => -1.0,
        }
    }
}

/// Status changes for the host to show as text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusEvent {
    /// Adjustment mode entered
    Adjusting,
    /// Adjustment mode left
    AdjustmentSucceeded,
    /// The clock now shows a time other than real time
    CustomTimeActive,
    /// The clock went back to real time
    Cleared,
}

/// State of one drag gesture
#[derive(Debug, Clone)]
struct DragSession {
    selected: PointerKind,
    last_crossing: CrossingDirection,
    passed_in_lower_half: bool,
}

impl DragSession {
    fn new(selected: PointerKind) -> Self {
        Self {
            selected,
            last_crossing: CrossingDirection::None,
            passed_in_lower_half: false,
        }
    }

    /// Whether a crossing in `direction` should carry a revolution
    ///
    /// Repeating the last direction only counts after the gesture has been
    /// through the lower half, so jitter on the 12 mark is counted once.
    fn accept(&mut self, direction: CrossingDirection) -> bool {
        if direction == CrossingDirection::None {
            return false;
        }
        if self.last_crossing == direction && !self.passed_in_lower_half {
            return false;
        }
        self.last_crossing = direction;
        self.passed_in_lower_half = false;
        true
    }
}

/// Turns pointer drags into changes of the clock's origin
#[derive(Debug)]
pub struct AdjustmentController {
    active: bool,
    hit_width: f64,
    session: Option<DragSession>,
    events: VecDeque<StatusEvent>,
}

impl Default for AdjustmentController {
    fn default() -> Self {
        Self::new()
    }
}

impl AdjustmentController {
    pub fn new() -> Self {
        Self {
            active: false,
            hit_width: DEFAULT_HIT_WIDTH,
            session: None,
            events: VecDeque::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn selected(&self) -> Option<PointerKind> {
        self.session.as_ref().map(|s| s.selected)
    }

    /// Drain pending status events
    pub fn take_events(&mut self) -> Vec<StatusEvent> {
        self.events.drain(..).collect()
    }

    /// Stop the clock and start accepting drags
    pub fn begin_adjustment(&mut self, clock: &mut ClockModel, now: f64, scheduler: &mut dyn FrameScheduler) {
        if self.active {
            return;
        }
        clock.stop(scheduler);
        clock.refresh(now, true);
        self.active = true;
        self.events.push_back(StatusEvent::Adjusting);
        info!(origin = clock.origin(), "adjustment started");
    }

    /// Grab the pointer under `point`, if any
    pub fn select_pointer(&mut self, clock: &ClockModel, point: Point) -> Option<PointerKind> {
        if !self.active {
            return None;
        }
        let kind = clock.pointer_at(point, self.hit_width)?;
        debug!(?kind, "pointer selected");
        self.session = Some(DragSession::new(kind));
        Some(kind)
    }

    /// Move the selected pointer to `point`
    ///
    /// `previous` is the cursor position of the preceding move event. Returns
    /// the new displayed time in seconds, or `None` when nothing is selected.
    pub fn drag_to(&mut self, clock: &mut ClockModel, point: Point, previous: Point, now: f64) -> Option<f64> {
        if !self.active {
            return None;
        }
        let session = self.session.as_mut()?;
        let kind = session.selected;
        let center = clock.center();

        clock.pointers_mut().get_mut(kind).set_angle(angle_of(center, point));

        let pointers = clock.pointers();
        let selected = pointers.get(kind);
        // Swap the selected pointer's share of the time for the dragged one
        let mut updated = pointers.hour.value_seconds() - selected.value_seconds() + selected.to_elapsed_seconds();

        // The press point reaches us only as `previous` of the first move
        if previous.y > center.y {
            session.passed_in_lower_half = true;
        }

        if kind != PointerKind::Second {
            let direction = CrossingDirection::classify(center, previous, point);
            if session.accept(direction) {
                updated += direction.sign() * selected.revolution_seconds();
                debug!(?kind, ?direction, updated, "crossed 12 o'clock");
            }
        }

        if point.y > center.y {
            session.passed_in_lower_half = true;
        }

        clock.set_origin(updated - now);
        clock.refresh(now, kind == PointerKind::Second);
        Some(updated)
    }

    /// Let go of the selected pointer without leaving adjustment mode
    pub fn release_pointer(&mut self, clock: &mut ClockModel) {
        if self.session.take().is_some() {
            debug!("pointer released");
        }
        // Seconds were held still while other pointers moved
        clock.pointers_mut().second.sync_angle();
    }

    /// Leave adjustment mode and restart the clock
    pub fn end_adjustment(&mut self, clock: &mut ClockModel, now: f64, scheduler: &mut dyn FrameScheduler) {
        if !self.active {
            return;
        }
        self.session = None;
        self.active = false;
        clock.run(now, scheduler);

        self.events.push_back(StatusEvent::AdjustmentSucceeded);
        if clock.is_custom_time() {
            self.events.push_back(StatusEvent::CustomTimeActive);
        }
        info!(
            origin = clock.origin(),
            offset = clock.time_offset(),
            "adjustment finished"
        );
    }

    /// Return the clock to real time
    pub fn reset(&mut self, clock: &mut ClockModel, now: f64) {
        clock.reset_to_baseline();
        if self.active {
            clock.refresh(now, true);
        }
        self.events.push_back(StatusEvent::Cleared);
        info!("clock reset to real time");
    }
}
