//! Shared core for the adjustable dial clock
//!
//! Everything here is independent of the windowing backend: dial geometry,
//! time/angle conversion, the pointer and clock model, the drag-to-retime
//! controller, and preference persistence.

pub mod adjust;
pub mod canvas;
pub mod clock;
pub mod config;
pub mod geometry;
pub mod pointer;
pub mod time_angle;
pub mod time_engine;

pub use adjust::{AdjustmentController, CrossingDirection, StatusEvent};
pub use canvas::{Canvas, Paint};
pub use clock::{ClockModel, FrameHandle, FrameQueue, FrameScheduler, Pointers, Viewport};
pub use config::{save_config, ConfigError, Preferences, Rhythm};
pub use geometry::{point_on_circle, Point};
pub use pointer::{Pointer, PointerError, PointerKind, PointerShape, PointerSpec};
pub use time_angle::{angle_to_time, time_to_angle};
pub use time_engine::{baseline_origin, ProcessClock, DIAL_PERIOD_SECS};
