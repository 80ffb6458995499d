//! Adjustable Dial Clock
//!
//! A classic analog clock whose pointers can be grabbed and dragged to set a
//! custom time. The custom offset and the pointer rhythm survive restarts.

mod drawing;
mod ui;

use chrono::Utc;
use nannou::prelude::*;
use nannou_egui::{self, Egui};
use shared::time_engine::parse_timezone;
use shared::{
    baseline_origin, AdjustmentController, ClockModel, FrameQueue, Point, Preferences, ProcessClock, Rhythm,
    Viewport,
};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use crate::drawing::{colors, to_screen, NannouCanvas};
use crate::ui::{draw_control_panel, StatusLine};

const CLOCK_NAME: &str = "adjustable_dial";

fn main() {
    init_tracing();
    nannou::app(model).update(update).exit(exit).run();
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Application state
struct Model {
    /// The dial being shown
    clock: ClockModel,
    /// Drag-to-retime logic
    controller: AdjustmentController,
    /// Frame callbacks requested by the clock
    frames: FrameQueue,
    /// Seconds since startup
    process_clock: ProcessClock,
    /// Persisted preferences
    preferences: Preferences,
    /// Last cursor position seen, in dial coordinates
    last_cursor: Option<Point>,
    /// Message line
    status: StatusLine,
    /// egui integration
    egui: Egui,
}

impl Model {
    fn now(&self) -> f64 {
        self.process_clock.now_secs()
    }

    fn toggle_adjust(&mut self) {
        let now = self.now();
        if self.controller.is_active() {
            self.controller.end_adjustment(&mut self.clock, now, &mut self.frames);
        } else {
            self.controller.begin_adjustment(&mut self.clock, now, &mut self.frames);
        }
        self.drain_events();
    }

    fn reset(&mut self) {
        let now = self.now();
        self.controller.reset(&mut self.clock, now);
        self.drain_events();
        save_preferences(self);
    }

    fn set_rhythm(&mut self, rhythm: Rhythm) {
        self.clock.set_rhythm(rhythm);
        self.preferences.rhythm = rhythm;
        save_preferences(self);
    }

    fn drain_events(&mut self) {
        let adjusting = self.controller.is_active();
        for event in self.controller.take_events() {
            self.status.apply(event, adjusting);
        }
    }

    fn release(&mut self) {
        if self.controller.selected().is_some() {
            self.controller.release_pointer(&mut self.clock);
        }
    }
}

fn save_preferences(model: &mut Model) {
    model.preferences.time_offset = model.clock.time_offset();
    if let Err(e) = model.preferences.save(CLOCK_NAME) {
        error!(error = %e, "failed to save preferences");
    }
}

fn viewport_of(rect: Rect) -> Viewport {
    Viewport::new(<f64 as From<f32>>::from(rect.w()), <f64 as From<f32>>::from(rect.h()))
}

fn model(app: &App) -> Model {
    // Create window
    let window_id = app
        .new_window()
        .title("Adjustable Dial")
        .size(800, 700)
        .min_size(300, 300)
        .view(view)
        .key_pressed(key_pressed)
        .mouse_pressed(mouse_pressed)
        .mouse_released(mouse_released)
        .mouse_moved(mouse_moved)
        .mouse_exited(mouse_exited)
        .resized(resized)
        .raw_event(raw_window_event)
        .build()
        .unwrap();

    let window = app.window(window_id).unwrap();
    let egui = Egui::from_window(&window);

    let preferences = Preferences::load(CLOCK_NAME);
    let timezone = preferences.timezone.as_deref().and_then(|name| {
        parse_timezone(name)
            .map_err(|e| warn!(error = %e, "falling back to the system time zone"))
            .ok()
    });

    let process_clock = ProcessClock::start();
    let now = process_clock.now_secs();
    let baseline = baseline_origin(timezone, Utc::now(), now);
    let origin = baseline - preferences.time_offset;

    let mut frames = FrameQueue::new();
    let mut clock = ClockModel::new(viewport_of(app.window_rect()), origin, baseline, preferences.rhythm)
        .expect("built-in pointer configuration is valid");
    clock.run(now, &mut frames);

    let mut status = StatusLine::default();
    if clock.is_custom_time() {
        status.apply(shared::StatusEvent::CustomTimeActive, false);
    }

    Model {
        clock,
        controller: AdjustmentController::new(),
        frames,
        process_clock,
        preferences,
        last_cursor: None,
        status,
        egui,
    }
}

fn update(_app: &App, model: &mut Model, update: Update) {
    let now = model.now();

    // Run the frames the clock asked for
    for handle in model.frames.take_due() {
        model.clock.on_frame(handle, now, &mut model.frames);
    }

    model
        .status
        .update(model.controller.is_active(), model.clock.is_custom_time());

    // Begin egui frame
    model.egui.set_elapsed_time(update.since_start);
    let ctx = model.egui.begin_frame();

    let result = draw_control_panel(
        &ctx,
        &model.status,
        model.controller.is_active(),
        model.clock.is_custom_time(),
        model.clock.rhythm(),
    );

    drop(ctx);

    if result.toggle_adjust {
        model.toggle_adjust();
    }
    if result.reset {
        model.reset();
    }
    if let Some(rhythm) = result.rhythm {
        model.set_rhythm(rhythm);
    }
}

fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    draw.background().color(colors::OUTER_BACKGROUND);

    let mut canvas = NannouCanvas::new(&draw, model.clock.viewport());
    model.clock.draw(&mut canvas);

    // Render to frame
    draw.to_frame(app, &frame).unwrap();

    // Render egui on top
    model.egui.draw_to_frame(&frame).unwrap();
}

fn exit(_app: &App, mut model: Model) {
    save_preferences(&mut model);
}

fn key_pressed(_app: &App, model: &mut Model, key: Key) {
    match key {
        // A toggles adjustment mode
        Key::A => model.toggle_adjust(),
        // R returns to real time
        Key::R => model.reset(),
        // T switches rhythm
        Key::T => {
            let rhythm = match model.clock.rhythm() {
                Rhythm::Flow => Rhythm::Tick,
                Rhythm::Tick => Rhythm::Flow,
            };
            model.set_rhythm(rhythm);
        }
        _ => {}
    }
}

fn mouse_pressed(app: &App, model: &mut Model, button: MouseButton) {
    if button != MouseButton::Left || model.egui.ctx().wants_pointer_input() {
        return;
    }
    let pos = to_screen(model.clock.viewport(), app.mouse.position());
    model.controller.select_pointer(&model.clock, pos);
    model.last_cursor = Some(pos);
}

fn mouse_moved(_app: &App, model: &mut Model, pos: Point2) {
    let pos = to_screen(model.clock.viewport(), pos);
    if let Some(previous) = model.last_cursor {
        let now = model.now();
        model.controller.drag_to(&mut model.clock, pos, previous, now);
    }
    model.last_cursor = Some(pos);
}

fn mouse_released(_app: &App, model: &mut Model, button: MouseButton) {
    if button == MouseButton::Left {
        model.release();
    }
}

fn mouse_exited(_app: &App, model: &mut Model) {
    model.release();
    model.last_cursor = None;
}

fn resized(_app: &App, model: &mut Model, size: Vec2) {
    let now = model.now();
    let viewport = Viewport::new(<f64 as From<f32>>::from(size.x), <f64 as From<f32>>::from(size.y));
    if let Err(e) = model.clock.resize(viewport, now, &mut model.frames) {
        error!(error = %e, "failed to rebuild the dial");
    }
}

fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    // Let egui handle raw events for keyboard and mouse input
    model.egui.handle_raw_event(event);
}
