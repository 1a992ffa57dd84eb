//! Explicit cross-call state of the calculator.
//!
//! Only the exponential mode needs anything carried between bars: the last
//! smoothed value of the main line and of the signal line. The caller owns
//! the state and hands it to every update.

/// Last committed value of a recursive average.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingCarry {
    index: usize,
    value: f64,
    /// Value at `index - 1`, kept so the same bar can be evaluated again.
    prev: Option<f64>,
}

impl SmoothingCarry {
    /// The value at `index - 1`, if this carry knows it.
    pub fn previous_for(&self, index: usize) -> Option<f64> {
        if index == self.index + 1 {
            Some(self.value)
        } else if index == self.index {
            self.prev
        } else {
            None
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub(crate) fn commit(slot: &mut Option<SmoothingCarry>, index: usize, value: f64) {
        *slot = Some(match *slot {
            Some(carry) if carry.index == index => SmoothingCarry { value, ..carry },
            Some(carry) if carry.index + 1 == index => SmoothingCarry {
                index,
                value,
                prev: Some(carry.value),
            },
            _ => SmoothingCarry {
                index,
                value,
                prev: None,
            },
        });
    }
}

/// State carried between per-bar updates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BandState {
    pub(crate) main: Option<SmoothingCarry>,
    pub(crate) signal: Option<SmoothingCarry>,
    /// Bars `0..computed` have been evaluated at least once.
    pub(crate) computed: usize,
}

impl BandState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of leading bars already evaluated.
    pub fn computed(&self) -> usize {
        self.computed
    }

    pub fn main_carry(&self) -> Option<SmoothingCarry> {
        self.main
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
