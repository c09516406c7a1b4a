//! Bounded `{current, max}` counters used for health, energy and experience.

/// A `current / max` pair that always satisfies `current <= max`.
///
/// Every mutator clamps instead of failing, so a malformed or out-of-order
/// game message can never push the stored value outside its bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Meter {
    pub current: u32,
    pub max: u32,
}

impl Meter {
    /// Creates a meter, clamping `current` into `0..=max`.
    pub fn new(current: u32, max: u32) -> Self {
        Self {
            current: current.min(max),
            max,
        }
    }

    /// Replaces both values at once (clamped).
    pub fn set(&mut self, current: u32, max: u32) {
        *self = Self::new(current, max);
    }

    /// Raises `current` by `amount`, saturating at `max`.
    pub fn add(&mut self, amount: u32) {
        self.current = self.current.saturating_add(amount).min(self.max);
    }

    /// Lowers `current` by `amount`, saturating at zero.
    pub fn sub(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }

    /// Sets `current` only, clamped to `max`.
    pub fn set_current(&mut self, current: u32) {
        self.current = current.min(self.max);
    }

    /// Grows `max` and refills `current` to the new maximum.
    pub fn grow_and_fill(&mut self, amount: u32) {
        self.max = self.max.saturating_add(amount);
        self.current = self.max;
    }

    pub fn fill(&mut self) {
        self.current = self.max;
    }

    pub fn is_empty(&self) -> bool {
        self.current == 0
    }

    /// Integer percentage of `current / max`; `0` when `max` is zero.
    pub fn percent(&self) -> u32 {
        if self.max == 0 {
            0
        } else {
            ((u64::from(self.current) * 100) / u64::from(self.max)) as u32
        }
    }

    /// Returns `true` when `current >= ratio * max`.
    pub fn at_least(&self, ratio: f64) -> bool {
        f64::from(self.current) >= f64::from(self.max) * ratio
    }
}

impl std::fmt::Display for Meter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.current, self.max)
    }
}
