//! UI module for the Adjustable Dial
//!
//! Bottom control panel (adjust, reset, rhythm) and the status line fed by
//! the adjustment controller's events.

use std::time::{Duration, Instant};

use nannou_egui::egui;
use shared::{Rhythm, StatusEvent};

/// How long a confirmation stays before the follow-up message
const FOLLOW_UP_DELAY: Duration = Duration::from_secs(5);

const MSG_ADJUSTING: &str = "Select a pointer and drag it to the desired position.";
const MSG_SUCCEEDED: &str = "✅ The time was updated successfully!";
const MSG_CUSTOM_TIME: &str = "Note: the clock is showing a custom time.";

/// What to show once the follow-up delay has passed
#[derive(Debug, Clone, Copy, PartialEq)]
enum FollowUp {
    /// Warn about custom time if still not adjusting
    CustomTime,
    /// Clear the line if the clock is back to real time
    ClearIfReal,
}

/// Text line under the dial
#[derive(Debug, Default)]
pub struct StatusLine {
    text: Option<&'static str>,
    follow_up: Option<(Instant, FollowUp)>,
}

impl StatusLine {
    pub fn text(&self) -> &str {
        self.text.unwrap_or("")
    }

    /// React to a controller event
    pub fn apply(&mut self, event: StatusEvent, adjusting: bool) {
        let now = Instant::now();
        match event {
            StatusEvent::Adjusting => {
                self.text = Some(MSG_ADJUSTING);
                self.follow_up = None;
            }
            StatusEvent::AdjustmentSucceeded => {
                self.text = Some(MSG_SUCCEEDED);
            }
            StatusEvent::CustomTimeActive => {
                self.follow_up = Some((now + FOLLOW_UP_DELAY, FollowUp::CustomTime));
            }
            StatusEvent::Cleared if !adjusting => {
                self.text = Some(MSG_SUCCEEDED);
                self.follow_up = Some((now + FOLLOW_UP_DELAY, FollowUp::ClearIfReal));
            }
            StatusEvent::Cleared => {}
        }
    }

    /// Resolve a due follow-up
    pub fn update(&mut self, adjusting: bool, custom_time: bool) {
        let Some((due, follow_up)) = self.follow_up else {
            return;
        };
        if Instant::now() < due {
            return;
        }
        self.follow_up = None;
        match follow_up {
            FollowUp::CustomTime if !adjusting && custom_time => self.text = Some(MSG_CUSTOM_TIME),
            FollowUp::ClearIfReal if !adjusting && !custom_time => self.text = None,
            _ => {}
        }
    }
}

/// Result of control panel interactions
#[derive(Default)]
pub struct ControlPanelResult {
    /// Enter or leave adjustment mode
    pub toggle_adjust: bool,
    /// Go back to real time
    pub reset: bool,
    /// New rhythm picked
    pub rhythm: Option<Rhythm>,
}

/// Draw the control panel (bottom)
pub fn draw_control_panel(
    ctx: &egui::Context,
    status: &StatusLine,
    adjusting: bool,
    custom_time: bool,
    rhythm: Rhythm,
) -> ControlPanelResult {
    let mut result = ControlPanelResult::default();

    egui::TopBottomPanel::bottom("control_panel")
        .resizable(false)
        .show(ctx, |ui| {
            ui.add_space(4.0);
            ui.label(egui::RichText::new(status.text()).size(16.0));
            ui.add_space(4.0);

            ui.horizontal(|ui| {
                let adjust_label = if adjusting { "Finish adjusting" } else { "Adjust" };
                if ui
                    .button(adjust_label)
                    .on_hover_text("Drag the pointers to set the time. Keyboard: A")
                    .clicked()
                {
                    result.toggle_adjust = true;
                }

                if (adjusting || custom_time)
                    && ui
                        .button("Reset")
                        .on_hover_text("Return to real time. Keyboard: R")
                        .clicked()
                {
                    result.reset = true;
                }

                ui.separator();
                ui.label("Rhythm:");
                if ui.selectable_label(rhythm == Rhythm::Flow, "Flow").clicked() && rhythm != Rhythm::Flow {
                    result.rhythm = Some(Rhythm::Flow);
                }
                if ui.selectable_label(rhythm == Rhythm::Tick, "Tick").clicked() && rhythm != Rhythm::Tick {
                    result.rhythm = Some(Rhythm::Tick);
                }
            });
            ui.add_space(4.0);
        });

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjusting_message() {
        let mut status = StatusLine::default();
        assert_eq!(status.text(), "");
        status.apply(StatusEvent::Adjusting, true);
        assert_eq!(status.text(), MSG_ADJUSTING);
    }

    #[test]
    fn test_custom_time_waits_for_delay() {
        let mut status = StatusLine::default();
        status.apply(StatusEvent::AdjustmentSucceeded, false);
        status.apply(StatusEvent::CustomTimeActive, false);
        status.update(false, true);
        assert_eq!(status.text(), MSG_SUCCEEDED);
    }

    #[test]
    fn test_cleared_while_adjusting_keeps_text() {
        let mut status = StatusLine::default();
        status.apply(StatusEvent::Adjusting, true);
        status.apply(StatusEvent::Cleared, true);
        assert_eq!(status.text(), MSG_ADJUSTING);
    }
}
