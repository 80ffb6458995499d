//! Conversion between time values and screen angles on the dial
//!
//! Time zero sits at 12 o'clock, which is screen angle `-PI/2`, and time runs
//! clockwise. Both functions assume a strictly positive `max`; pointers check
//! that when they are built.

use std::f64::consts::{FRAC_PI_2, TAU};

/// Screen angle (radians) of `time` on a dial that wraps every `max` units
pub fn time_to_angle(time: f64, max: f64) -> f64 {
    TAU * time / max - FRAC_PI_2
}

/// Time value in `[0, max)` shown by a pointer at screen `angle`
///
/// Any angle is accepted; whole turns are discarded.
pub fn angle_to_time(angle: f64, max: f64) -> f64 {
    let turn = (angle + FRAC_PI_2).rem_euclid(TAU) / TAU;
    let time = turn * max;
    // rem_euclid can land on TAU itself for tiny negative inputs
    if time >= max {
        0.0
    } else {
        time
    }
}
