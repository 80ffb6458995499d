//! Clock model - the dial, its three pointers and the frame loop
//!
//! The displayed time is always `origin + now`, where `now` is the process
//! clock in seconds. Running the clock recomputes pointer values from that sum
//! every frame; adjusting the clock moves `origin`.

use tracing::debug;

use crate::canvas::{Canvas, Paint};
use crate::config::Rhythm;
use crate::geometry::{point_on_circle, Point};
use crate::pointer::{Pointer, PointerError, PointerKind, PointerSpec};
use crate::time_angle::time_to_angle;
use crate::time_engine::DIAL_PERIOD_SECS;

/// Size of the drawing surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Dial radius that fits the viewport with some margin
    pub fn dial_radius(&self) -> f64 {
        let radius = self.height * 0.4;
        if radius * 2.2 > self.width {
            self.width / 2.2
        } else {
            radius
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Identifies one scheduled frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// Host facility for per-frame callbacks
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// In-process frame scheduler drained once per host frame
#[derive(Debug, Default)]
pub struct FrameQueue {
    next_id: u64,
    pending: Vec<FrameHandle>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every frame requested since the last call
    pub fn take_due(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.retain(|&h| h != handle);
    }
}

/// The three pointers, keyed by kind
#[derive(Debug, Clone)]
pub struct Pointers {
    pub hour: Pointer,
    pub minute: Pointer,
    pub second: Pointer,
}

impl Pointers {
    fn for_radius(radius: f64) -> Result<Self, PointerError> {
        Ok(Self {
            hour: Pointer::new(PointerSpec::standard(PointerKind::Hour, radius * 0.45, radius / 45.0, false))?,
            minute: Pointer::new(PointerSpec::standard(PointerKind::Minute, radius * 0.6, radius / 80.0, true))?,
            second: Pointer::new(PointerSpec::standard(PointerKind::Second, radius * 0.8, radius / 160.0, true))?,
        })
    }

    pub fn get(&self, kind: PointerKind) -> &Pointer {
        match kind {
            PointerKind::Hour => &self.hour,
            PointerKind::Minute => &self.minute,
            PointerKind::Second => &self.second,
        }
    }

    pub fn get_mut(&mut self, kind: PointerKind) -> &mut Pointer {
        match kind {
            PointerKind::Hour => &mut self.hour,
            PointerKind::Minute => &mut self.minute,
            PointerKind::Second => &mut self.second,
        }
    }

    /// Pointers in selection priority order
    pub fn iter(&self) -> impl Iterator<Item = &Pointer> {
        PointerKind::ALL.into_iter().map(move |kind| self.get(kind))
    }
}

/// Pointer values for a dial reading, in each pointer's own unit
fn split_elapsed(elapsed: f64, floor: bool) -> (f64, f64, f64) {
    let elapsed = elapsed.rem_euclid(DIAL_PERIOD_SECS);
    let hours = elapsed / 3600.0;
    let minutes = elapsed.rem_euclid(3600.0) / 60.0;
    let seconds = elapsed.rem_euclid(60.0);
    if floor {
        (hours, minutes.floor(), seconds.floor())
    } else {
        (hours, minutes, seconds)
    }
}

/// An analog clock face
#[derive(Debug, Clone)]
pub struct ClockModel {
    viewport: Viewport,
    radius: f64,
    center: Point,
    origin: f64,
    baseline: f64,
    rhythm: Rhythm,
    running: bool,
    pending_frame: Option<FrameHandle>,
    pointers: Pointers,
}

impl ClockModel {
    /// Build a stopped clock
    ///
    /// `baseline` is the origin that shows real time; `origin` is the one
    /// actually displayed.
    pub fn new(viewport: Viewport, origin: f64, baseline: f64, rhythm: Rhythm) -> Result<Self, PointerError> {
        let radius = viewport.dial_radius();
        Ok(Self {
            viewport,
            radius,
            center: viewport.center(),
            origin,
            baseline,
            rhythm,
            running: false,
            pending_frame: None,
            pointers: Pointers::for_radius(radius)?,
        })
    }

    /// Rebuild the dial for a new viewport, keeping the displayed time
    pub fn resize(
        &mut self,
        viewport: Viewport,
        now: f64,
        scheduler: &mut dyn FrameScheduler,
    ) -> Result<(), PointerError> {
        let was_running = self.running;
        let resized = ClockModel::new(viewport, self.origin, self.baseline, self.rhythm)?;
        self.stop(scheduler);
        *self = resized;
        if was_running {
            self.run(now, scheduler);
        } else {
            self.refresh(now, true);
        }
        Ok(())
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn pointers(&self) -> &Pointers {
        &self.pointers
    }

    pub fn pointers_mut(&mut self) -> &mut Pointers {
        &mut self.pointers
    }

    pub fn rhythm(&self) -> Rhythm {
        self.rhythm
    }

    pub fn set_rhythm(&mut self, rhythm: Rhythm) {
        self.rhythm = rhythm;
    }

    pub fn origin(&self) -> f64 {
        self.origin
    }

    pub fn set_origin(&mut self, origin: f64) {
        self.origin = origin;
    }

    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    /// Go back to showing real time
    pub fn reset_to_baseline(&mut self) {
        self.origin = self.baseline;
    }

    /// Whether the displayed time has been moved away from real time
    pub fn is_custom_time(&self) -> bool {
        (self.origin - self.baseline).abs() > 1e-9
    }

    /// Seconds the displayed time lags real time
    pub fn time_offset(&self) -> f64 {
        self.baseline - self.origin
    }

    /// Displayed elapsed seconds at process time `now`
    pub fn displayed_seconds(&self, now: f64) -> f64 {
        self.origin + now
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Recompute every pointer for process time `now`
    pub fn tick(&mut self, now: f64) {
        let floor = self.rhythm == Rhythm::Tick;
        let (hours, minutes, seconds) = split_elapsed(self.displayed_seconds(now), floor);
        self.pointers.hour.set_from_time(hours);
        self.pointers.minute.set_from_time(minutes);
        self.pointers.second.set_from_time(seconds);
    }

    /// One-off continuous recomputation while stopped
    ///
    /// The seconds pointer keeps its current angle unless `include_seconds`.
    pub fn refresh(&mut self, now: f64, include_seconds: bool) {
        let (hours, minutes, seconds) = split_elapsed(self.displayed_seconds(now), false);
        self.pointers.hour.set_from_time(hours);
        self.pointers.minute.set_from_time(minutes);
        if include_seconds {
            self.pointers.second.set_from_time(seconds);
        } else {
            self.pointers.second.set_value(seconds);
        }
    }

    /// Stopped -> Running; returns whether the state changed
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        true
    }

    /// Start the frame loop
    pub fn run(&mut self, now: f64, scheduler: &mut dyn FrameScheduler) {
        if !self.start() {
            return;
        }
        self.tick(now);
        self.pending_frame = Some(scheduler.request_frame());
        debug!(origin = self.origin, "clock running");
    }

    /// Stop the frame loop, cancelling the pending frame
    pub fn stop(&mut self, scheduler: &mut dyn FrameScheduler) {
        if !self.running {
            return;
        }
        self.running = false;
        if let Some(handle) = self.pending_frame.take() {
            scheduler.cancel_frame(handle);
        }
        debug!(origin = self.origin, "clock stopped");
    }

    /// Handle a scheduled frame; returns whether the dial needs a redraw
    ///
    /// Frames that are not the one currently pending are ignored.
    pub fn on_frame(&mut self, handle: FrameHandle, now: f64, scheduler: &mut dyn FrameScheduler) -> bool {
        if !self.running || self.pending_frame != Some(handle) {
            debug!(?handle, "ignoring stale frame");
            return false;
        }
        self.tick(now);
        self.pending_frame = Some(scheduler.request_frame());
        true
    }

    /// First pointer under `point`, in hour, minute, second order
    pub fn pointer_at(&self, point: Point, hit_width: f64) -> Option<PointerKind> {
        self.pointers
            .iter()
            .find(|p| p.hit_test(self.center, point, hit_width))
            .map(Pointer::kind)
    }

    /// Draw the whole dial
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.clear_rect(Point::default(), self.viewport.width, self.viewport.height, Paint::OuterBackground);
        self.draw_border(canvas);
        self.draw_digits(canvas);
        self.draw_graduations(canvas);
        for pointer in self.pointers.iter() {
            pointer.draw(canvas, self.center);
        }
        canvas.draw_arc(self.center, self.radius / 50.0, 0.0, Paint::Pivot, true);
    }

    fn draw_border(&self, canvas: &mut dyn Canvas) {
        canvas.draw_arc(self.center, self.radius, 0.0, Paint::InnerBackground, true);
        canvas.draw_arc(self.center, self.radius, self.radius / 18.0, Paint::Border, false);
    }

    fn draw_digits(&self, canvas: &mut dyn Canvas) {
        let distance = self.radius * 0.73;
        let font_size = self.radius * 0.24;
        for hour in 1..=12 {
            let angle = time_to_angle(f64::from(hour), 12.0);
            let position = point_on_circle(self.center, angle, distance);
            canvas.draw_text(&hour.to_string(), position, font_size, Paint::Digit);
        }
    }

    fn draw_graduations(&self, canvas: &mut dyn Canvas) {
        for i in 0..60 {
            let angle = time_to_angle(f64::from(i), 60.0);
            let (distance, length, width, paint) = if i % 5 == 0 {
                (self.radius * 0.86, self.radius * 0.08, self.radius / 150.0, Paint::HourGraduation)
            } else {
                (self.radius * 0.89, self.radius * 0.05, self.radius / 200.0, Paint::Graduation)
            };
            let from = point_on_circle(self.center, angle, distance);
            let to = point_on_circle(self.center, angle, distance + length);
            canvas.draw_line(from, to, width, paint);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::recording::{RecordingCanvas, Shape};

    fn clock_at(origin: f64, rhythm: Rhythm) -> ClockModel {
        ClockModel::new(Viewport::new(800.0, 600.0), origin, origin, rhythm).unwrap()
    }

    #[test]
    fn test_layout() {
        let clock = clock_at(0.0, Rhythm::Flow);
        assert_eq!(clock.radius(), 240.0);
        assert_eq!(clock.center(), Point::new(400.0, 300.0));

        // Narrow viewport shrinks the dial to fit the width
        let narrow = ClockModel::new(Viewport::new(220.0, 600.0), 0.0, 0.0, Rhythm::Flow).unwrap();
        assert!((narrow.radius() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_tick_at_zero() {
        let mut clock = clock_at(0.0, Rhythm::Flow);
        clock.tick(0.0);
        for p in clock.pointers().iter() {
            assert_eq!(p.value(), 0.0);
            assert_eq!(p.angle(), time_to_angle(0.0, p.spec().max));
        }
    }

    #[test]
    fn test_tick_flow() {
        let mut clock = clock_at(3661.0, Rhythm::Flow);
        clock.tick(0.0);
        let p = clock.pointers();
        assert!((p.hour.value() - 3661.0 / 3600.0).abs() < 1e-12);
        assert!((p.minute.value() - 61.0 / 60.0).abs() < 1e-12);
        assert!((p.second.value() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_tick_rhythm_floors_minutes_and_seconds() {
        let mut clock = clock_at(3000.0, Rhythm::Tick);
        clock.tick(661.5);
        let p = clock.pointers();
        assert!((p.hour.value() - 3661.5 / 3600.0).abs() < 1e-12);
        assert_eq!(p.minute.value(), 1.0);
        assert_eq!(p.second.value(), 1.0);
    }

    #[test]
    fn test_tick_folds_negative_and_overflowing_time() {
        let mut clock = clock_at(-30.0, Rhythm::Flow);
        clock.tick(0.0);
        let p = clock.pointers();
        assert!((p.hour.value() - (DIAL_PERIOD_SECS - 30.0) / 3600.0).abs() < 1e-9);
        assert!((p.second.value() - 30.0).abs() < 1e-9);

        clock.set_origin(DIAL_PERIOD_SECS + 120.0);
        clock.tick(0.0);
        assert!((clock.pointers().minute.value() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_start_and_stop_are_idempotent() {
        let mut queue = FrameQueue::new();
        let mut clock = clock_at(0.0, Rhythm::Flow);

        clock.run(0.0, &mut queue);
        clock.run(0.0, &mut queue);
        assert!(clock.is_running());
        assert_eq!(queue.pending_len(), 1);

        clock.stop(&mut queue);
        clock.stop(&mut queue);
        assert!(!clock.is_running());
        assert_eq!(queue.pending_len(), 0);

        assert!(clock.start());
        assert!(!clock.start());
    }

    #[test]
    fn test_frame_loop_reschedules() {
        let mut queue = FrameQueue::new();
        let mut clock = clock_at(0.0, Rhythm::Flow);
        clock.run(0.0, &mut queue);

        for frame in 1..=3 {
            let due = queue.take_due();
            assert_eq!(due.len(), 1);
            assert!(clock.on_frame(due[0], f64::from(frame), &mut queue));
            assert!((clock.pointers().second.value() - f64::from(frame)).abs() < 1e-9);
        }
        assert_eq!(queue.pending_len(), 1);
    }

    #[test]
    fn test_stale_frame_after_stop_is_ignored() {
        let mut queue = FrameQueue::new();
        let mut clock = clock_at(0.0, Rhythm::Flow);
        clock.run(0.0, &mut queue);

        // Host already took the frame, then the clock was stopped
        let due = queue.take_due();
        clock.stop(&mut queue);
        assert!(!clock.on_frame(due[0], 10.0, &mut queue));
        assert_eq!(clock.pointers().second.value(), 0.0);
        assert_eq!(queue.pending_len(), 0);

        // A frame from an earlier run is stale after a restart too
        clock.run(1.0, &mut queue);
        assert!(!clock.on_frame(due[0], 10.0, &mut queue));
    }

    #[test]
    fn test_stop_then_run_preserves_displayed_time() {
        let mut queue = FrameQueue::new();
        let mut clock = clock_at(500.0, Rhythm::Flow);
        clock.run(0.0, &mut queue);
        let due = queue.take_due();
        clock.on_frame(due[0], 42.25, &mut queue);

        let before = clock.displayed_seconds(42.25);
        let minute_before = clock.pointers().minute.value();
        clock.stop(&mut queue);
        assert_eq!(clock.displayed_seconds(42.25), before);
        clock.run(42.25, &mut queue);
        assert_eq!(clock.displayed_seconds(42.25), before);
        assert_eq!(clock.pointers().minute.value(), minute_before);
    }

    #[test]
    fn test_refresh_can_hold_seconds_angle() {
        let mut clock = clock_at(0.0, Rhythm::Flow);
        clock.tick(0.0);
        let angle = clock.pointers().second.angle();

        clock.refresh(15.0, false);
        assert_eq!(clock.pointers().second.value(), 15.0);
        assert_eq!(clock.pointers().second.angle(), angle);

        clock.refresh(15.0, true);
        assert_eq!(clock.pointers().second.angle(), time_to_angle(15.0, 60.0));
    }

    #[test]
    fn test_resize_carries_origin() {
        let mut queue = FrameQueue::new();
        let mut clock = ClockModel::new(Viewport::new(800.0, 600.0), 100.0, 40.0, Rhythm::Tick).unwrap();
        clock.run(0.0, &mut queue);

        clock.resize(Viewport::new(400.0, 400.0), 5.0, &mut queue).unwrap();
        assert_eq!(clock.origin(), 100.0);
        assert_eq!(clock.baseline(), 40.0);
        assert_eq!(clock.rhythm(), Rhythm::Tick);
        assert_eq!(clock.radius(), 160.0);
        assert!(clock.is_running());
        assert_eq!(queue.pending_len(), 1);
    }

    #[test]
    fn test_custom_time_and_reset() {
        let mut clock = ClockModel::new(Viewport::new(800.0, 600.0), 100.0, 100.0, Rhythm::Flow).unwrap();
        assert!(!clock.is_custom_time());
        clock.set_origin(160.0);
        assert!(clock.is_custom_time());
        assert_eq!(clock.time_offset(), -60.0);
        clock.reset_to_baseline();
        assert!(!clock.is_custom_time());
    }

    #[test]
    fn test_pointer_at_priority() {
        let mut clock = clock_at(0.0, Rhythm::Flow);
        clock.tick(0.0);
        // All three pointers overlap at 12; the hour pointer wins
        let near_center = Point::new(400.0, 260.0);
        assert_eq!(clock.pointer_at(near_center, 20.0), Some(PointerKind::Hour));

        // Only the second pointer reaches this far out
        let far = Point::new(400.0, 300.0 - 240.0 * 0.75);
        assert_eq!(clock.pointer_at(far, 20.0), Some(PointerKind::Second));

        assert_eq!(clock.pointer_at(Point::new(10.0, 10.0), 20.0), None);
    }

    #[test]
    fn test_draw_dial() {
        let mut clock = clock_at(0.0, Rhythm::Flow);
        clock.tick(0.0);
        let mut canvas = RecordingCanvas::default();
        clock.draw(&mut canvas);

        assert_eq!(canvas.shapes[0], Shape::Clear(Paint::OuterBackground));
        assert_eq!(canvas.count(|s| matches!(s, Shape::Text { .. })), 12);
        assert_eq!(
            canvas.count(|s| matches!(s, Shape::Line { paint: Paint::HourGraduation, .. })),
            12
        );
        assert_eq!(
            canvas.count(|s| matches!(s, Shape::Line { paint: Paint::Graduation, .. })),
            48
        );
        assert_eq!(canvas.count(|s| matches!(s, Shape::Triangle(_))), 3);
        assert!(matches!(
            canvas.shapes.last(),
            Some(Shape::Arc { paint: Paint::Pivot, filled: true, .. })
        ));

        // "12" sits straight above the center
        let twelve = canvas
            .shapes
            .iter()
            .find_map(|s| match s {
                Shape::Text { text, position } if text == "12" => Some(*position),
                _ => None,
            })
            .unwrap();
        assert!((twelve.x - 400.0).abs() < 1e-9);
        assert!(twelve.y < 300.0);
    }
}
