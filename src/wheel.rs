//! Selector wheel state: slot editing, a fair random pick among filled
//! options, and the rotation path that keeps the animation continuous
//! across repeated spins.
//!
//! The wheel only ever rotates in one direction (negative degrees, i.e.
//! visually clockwise segments sweeping past the pointer) so the animation
//! never snaps backward. Each spin recomputes its delta from the true
//! current offset modulo 360, so alignment never drifts no matter how many
//! spins have happened.

use std::time::{Duration, Instant};

use rand::Rng;

/// Number of editable option slots.
pub const SLOT_COUNT: usize = 5;

/// How long the wheel animates before a spin result becomes visible.
pub const DEFAULT_SPIN_DURATION: Duration = Duration::from_millis(4000);

/// Extra whole rotations per spin, purely visual. The winning segment draw
/// is independent of these.
const MIN_FULL_TURNS: u32 = 5;
const MAX_FULL_TURNS: u32 = 10;

/// Winning option reported once a spin's animation window has elapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinResult {
    /// Index into the filled-options sequence at spin time.
    pub index: usize,
    pub label: String,
}

/// A spin whose outcome is decided but not yet visible. Carries the
/// generation it was started under so a resolution that fires after a
/// `reset` or slot edit is discarded instead of resurrecting stale state.
#[derive(Debug, Clone, Copy)]
struct PendingSpin {
    target: usize,
    deadline: Instant,
    generation: u64,
}

/// In-memory state for one wheel session.
pub struct Wheel {
    slots: [String; SLOT_COUNT],
    rotation: f64,
    selected: Option<usize>,
    pending: Option<PendingSpin>,
    generation: u64,
    spin_duration: Duration,
}

impl Wheel {
    pub fn new() -> Self {
        Self::with_spin_duration(DEFAULT_SPIN_DURATION)
    }

    pub fn with_spin_duration(spin_duration: Duration) -> Self {
        Self {
            slots: Default::default(),
            rotation: 0.0,
            selected: None,
            pending: None,
            generation: 0,
            spin_duration,
        }
    }

    pub fn slots(&self) -> &[String; SLOT_COUNT] {
        &self.slots
    }

    /// Non-empty labels in slot order; these define segment index assignment.
    pub fn filled_options(&self) -> Vec<&str> {
        self.slots
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn filled_count(&self) -> usize {
        self.filled_options().len()
    }

    /// Cumulative applied rotation in degrees; never positive.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// A spin is in flight until its deadline resolves it. A pending spin
    /// from a stale generation no longer counts: its resolution will be
    /// discarded, so the wheel is free to accept input again.
    pub fn is_spinning(&self) -> bool {
        self.pending
            .map(|p| p.generation == self.generation)
            .unwrap_or(false)
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_label(&self) -> Option<&str> {
        self.selected
            .and_then(|index| self.filled_options().get(index).copied())
    }

    /// Replace slot `index`'s label. Any previously selected result predates
    /// the edit and is cleared as stale; a pending spin is orphaned the same
    /// way via the generation bump.
    pub fn set_option(&mut self, index: usize, text: impl Into<String>) {
        debug_assert!(index < SLOT_COUNT, "slot index out of range");
        self.slots[index] = text.into();
        self.selected = None;
        self.generation += 1;
    }

    /// Start a spin. No-op (returns false) when no option is filled or a
    /// spin is already in flight; fairness contract: the winning segment is
    /// drawn uniformly over the filled options at this moment.
    pub fn spin(&mut self, now: Instant, rng: &mut impl Rng) -> bool {
        let filled = self.filled_count();
        if filled == 0 || self.is_spinning() {
            return false;
        }

        let segment_angle = 360.0 / filled as f64;
        let full_turns = rng.gen_range(MIN_FULL_TURNS..MAX_FULL_TURNS);
        let target = rng.gen_range(0..filled);

        // Angular position (clockwise from the top pointer) of the target
        // segment's center, and of whatever is currently under the pointer.
        let target_offset = target as f64 * segment_angle + segment_angle / 2.0;
        // rotation is never positive, so the remainder sits in (-360, 0].
        let current_offset = (self.rotation % 360.0).abs();

        // Unidirectional delta from current to target; wrap once so it
        // always lands in (-360, 0] and the wheel never jumps backward.
        let mut delta = current_offset - target_offset;
        if delta > 0.0 {
            delta -= 360.0;
        }

        self.rotation += delta - f64::from(full_turns) * 360.0;
        self.generation += 1;
        self.selected = None;
        self.pending = Some(PendingSpin {
            target,
            deadline: now + self.spin_duration,
            generation: self.generation,
        });
        true
    }

    /// Resolve a pending spin whose animation window has elapsed. Returns
    /// the winning option, or `None` if nothing resolved this tick. A
    /// resolution from a stale generation is dropped without touching state.
    pub fn tick(&mut self, now: Instant) -> Option<SpinResult> {
        let pending = self.pending?;
        if now < pending.deadline {
            return None;
        }
        self.pending = None;
        if pending.generation != self.generation {
            return None;
        }
        let label = self
            .filled_options()
            .get(pending.target)
            .copied()
            .unwrap_or_default()
            .to_string();
        self.selected = Some(pending.target);
        Some(SpinResult {
            index: pending.target,
            label,
        })
    }

    /// Return to the initial state: empty slots, zero rotation, nothing
    /// selected. A spin resolution already in flight will be discarded when
    /// it fires, thanks to the generation bump.
    pub fn reset(&mut self) {
        self.slots = Default::default();
        self.selected = None;
        self.rotation = 0.0;
        self.generation += 1;
    }

    /// The wheel-angle (clockwise degrees from the pointer) currently
    /// resting under the pointer. In [0, 360).
    pub fn resting_offset(&self) -> f64 {
        (self.rotation % 360.0).abs()
    }
}

impl Default for Wheel {
    fn default() -> Self {
        Self::new()
    }
}
