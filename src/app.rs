//! Central application state shared between the event loop and renderer.

use std::time::{Duration, Instant};

use rand::thread_rng;

use crate::config::AppConfig;
use crate::logging::{log_debug, log_debug_content};
use crate::wheel::{SpinResult, Wheel, SLOT_COUNT};

/// Maximum characters retained per option slot.
pub(crate) const SLOT_MAX_CHARS: usize = 32;

const READY_STATUS: &str = "Type your options, then press Enter to spin.";

pub struct App {
    wheel: Wheel,
    spin_duration: Duration,
    active_slot: usize,
    status: String,
    greeting: Option<String>,
    last_result: Option<SpinResult>,
    /// Start instant and starting rotation of the spin in flight, for
    /// animation interpolation.
    spin_start: Option<(Instant, f64)>,
    needs_redraw: bool,
}

impl App {
    pub fn new(config: &AppConfig, greeting: Option<String>) -> Self {
        let spin_duration = Duration::from_millis(config.spin_ms);
        Self {
            wheel: Wheel::with_spin_duration(spin_duration),
            spin_duration,
            active_slot: 0,
            status: READY_STATUS.into(),
            greeting,
            last_result: None,
            spin_start: None,
            needs_redraw: true,
        }
    }

    pub fn wheel(&self) -> &Wheel {
        &self.wheel
    }

    pub fn active_slot(&self) -> usize {
        self.active_slot
    }

    pub fn status_text(&self) -> &str {
        &self.status
    }

    pub fn greeting(&self) -> Option<&str> {
        self.greeting.as_deref()
    }

    pub fn last_result(&self) -> Option<&SpinResult> {
        self.last_result.as_ref()
    }

    pub fn is_spinning(&self) -> bool {
        self.wheel.is_spinning()
    }

    /// Rotation to render right now. While a spin animates, interpolate from
    /// the pre-spin rotation toward the final one with an ease-out curve;
    /// otherwise the true cumulative rotation.
    pub fn display_rotation(&self, now: Instant) -> f64 {
        match self.spin_start {
            Some((started, from)) if self.wheel.is_spinning() => {
                let total = self.spin_duration.as_secs_f64();
                let t = ((now - started).as_secs_f64() / total).clamp(0.0, 1.0);
                let eased = 1.0 - (1.0 - t).powi(3);
                from + (self.wheel.rotation() - from) * eased
            }
            _ => self.wheel.rotation(),
        }
    }

    pub fn select_next_slot(&mut self) {
        self.active_slot = (self.active_slot + 1) % SLOT_COUNT;
        self.request_redraw();
    }

    pub fn select_previous_slot(&mut self) {
        self.active_slot = (self.active_slot + SLOT_COUNT - 1) % SLOT_COUNT;
        self.request_redraw();
    }

    pub fn push_slot_char(&mut self, ch: char) {
        if self.refuse_edit_while_spinning() {
            return;
        }
        let mut label = self.wheel.slots()[self.active_slot].clone();
        if label.chars().count() >= SLOT_MAX_CHARS {
            self.status = format!("Option labels are capped at {SLOT_MAX_CHARS} characters.");
            self.request_redraw();
            return;
        }
        label.push(ch);
        self.wheel.set_option(self.active_slot, label);
        self.last_result = None;
        self.request_redraw();
    }

    pub fn backspace_slot(&mut self) {
        if self.refuse_edit_while_spinning() {
            return;
        }
        let mut label = self.wheel.slots()[self.active_slot].clone();
        if label.pop().is_some() {
            self.wheel.set_option(self.active_slot, label);
            self.last_result = None;
            self.request_redraw();
        }
    }

    pub fn clear_slot(&mut self) {
        if self.refuse_edit_while_spinning() {
            return;
        }
        if !self.wheel.slots()[self.active_slot].is_empty() {
            self.wheel.set_option(self.active_slot, String::new());
            self.last_result = None;
            self.request_redraw();
        }
    }

    /// Start a spin with the thread RNG. Preconditions are the wheel's:
    /// silently keeps the prior state when nothing is filled or a spin is
    /// already running.
    pub fn spin(&mut self, now: Instant) {
        if self.wheel.is_spinning() {
            return;
        }
        if self.wheel.filled_count() == 0 {
            self.status = "Add options to create the wheel.".into();
            self.request_redraw();
            return;
        }
        let from = self.wheel.rotation();
        if self.wheel.spin(now, &mut thread_rng()) {
            self.spin_start = Some((now, from));
            self.last_result = None;
            self.status = "Spinning...".into();
            log_debug(&format!(
                "spin started: k={} rotation={:.1}",
                self.wheel.filled_count(),
                self.wheel.rotation()
            ));
            self.request_redraw();
        }
    }

    pub fn reset(&mut self) {
        if self.wheel.is_spinning() {
            self.status = "Hold on, the wheel is still spinning.".into();
            self.request_redraw();
            return;
        }
        self.wheel.reset();
        self.active_slot = 0;
        self.last_result = None;
        self.spin_start = None;
        self.status = READY_STATUS.into();
        log_debug("wheel reset");
        self.request_redraw();
    }

    /// Advance time-driven state. Returns true while a spin animates so the
    /// caller keeps redrawing frames.
    pub fn tick(&mut self, now: Instant) -> bool {
        if let Some(result) = self.wheel.tick(now) {
            self.status = format!(
                "We have arrived at a decision: {} (option {} was selected). Enter spins again.",
                result.label,
                result.index + 1
            );
            log_debug(&format!("spin resolved: index={}", result.index));
            log_debug_content(&format!("spin resolved: label={}", result.label));
            self.last_result = Some(result);
            self.spin_start = None;
            self.request_redraw();
        }
        self.wheel.is_spinning()
    }

    fn refuse_edit_while_spinning(&mut self) -> bool {
        if self.wheel.is_spinning() {
            self.status = "Hold on, the wheel is still spinning.".into();
            self.request_redraw();
            true
        } else {
            false
        }
    }

    pub fn request_redraw(&mut self) {
        self.needs_redraw = true;
    }

    pub fn take_redraw_request(&mut self) -> bool {
        let requested = self.needs_redraw;
        self.needs_redraw = false;
        requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn test_app() -> App {
        let config = AppConfig::parse_from(["test-app"]);
        App::new(&config, None)
    }

    #[test]
    fn typing_fills_the_active_slot() {
        let mut app = test_app();
        app.push_slot_char('p');
        app.push_slot_char('i');
        app.select_next_slot();
        app.push_slot_char('x');
        assert_eq!(app.wheel().slots()[0], "pi");
        assert_eq!(app.wheel().slots()[1], "x");
        app.backspace_slot();
        assert_eq!(app.wheel().slots()[1], "");
    }

    #[test]
    fn spin_without_options_explains_itself() {
        let mut app = test_app();
        app.spin(Instant::now());
        assert!(!app.is_spinning());
        assert_eq!(app.status_text(), "Add options to create the wheel.");
    }

    #[test]
    fn single_option_spin_resolves_to_it() {
        let mut app = test_app();
        for ch in "tacos".chars() {
            app.push_slot_char(ch);
        }
        let now = Instant::now();
        app.spin(now);
        assert!(app.is_spinning());
        assert!(app.last_result().is_none());

        // Mid-animation nothing is visible yet.
        assert!(app.tick(now + Duration::from_millis(100)));

        assert!(!app.tick(now + Duration::from_millis(4_000)));
        let result = app.last_result().expect("result after animation");
        assert_eq!(result.index, 0);
        assert_eq!(result.label, "tacos");
        assert!(app.status_text().contains("tacos"));
    }

    #[test]
    fn edits_are_refused_while_spinning() {
        let mut app = test_app();
        app.push_slot_char('a');
        let now = Instant::now();
        app.spin(now);
        app.push_slot_char('b');
        assert_eq!(app.wheel().slots()[0], "a");
        assert_eq!(app.status_text(), "Hold on, the wheel is still spinning.");
    }

    #[test]
    fn display_rotation_moves_monotonically_toward_final() {
        let mut app = test_app();
        app.push_slot_char('a');
        app.select_next_slot();
        app.push_slot_char('b');
        let now = Instant::now();
        app.spin(now);
        let final_rotation = app.wheel().rotation();
        let quarter = app.display_rotation(now + Duration::from_millis(1_000));
        let half = app.display_rotation(now + Duration::from_millis(2_000));
        let done = app.display_rotation(now + Duration::from_millis(4_000));
        assert!(quarter > half, "rotation should keep decreasing");
        assert!(half > final_rotation);
        assert!((done - final_rotation).abs() < 1e-9);
    }

    #[test]
    fn reset_restores_the_initial_state() {
        let mut app = test_app();
        app.push_slot_char('a');
        let now = Instant::now();
        app.spin(now);
        app.tick(now + Duration::from_millis(4_000));
        assert!(app.last_result().is_some());
        app.reset();
        assert_eq!(app.wheel().filled_count(), 0);
        assert_eq!(app.wheel().rotation(), 0.0);
        assert!(app.last_result().is_none());
    }
}
