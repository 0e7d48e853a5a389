use serde::{Deserialize, Serialize};

/// A salience score clamped to `[0.0, 1.0]`.
///
/// Mirrors the teacher's `Confidence` newtype: construction always clamps
/// rather than rejecting, since salience is a derived, continuously
/// recomputed quantity rather than user input.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Salience(f64);

impl Salience {
    pub const MIN: Salience = Salience(0.0);
    pub const MAX: Salience = Salience(1.0);

    pub fn new(value: f64) -> Self {
        Salience(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Applies exponential decay over `elapsed_days` using `lambda`.
    pub fn decayed(self, lambda: f64, elapsed_days: f64) -> Salience {
        Salience::new(self.0 * (-lambda * elapsed_days.max(0.0)).exp())
    }

    /// Boosts salience on access/reinforcement, saturating at 1.0.
    pub fn reinforced(self, delta: f64) -> Salience {
        Salience::new(self.0 + delta)
    }
}

impl Default for Salience {
    fn default() -> Self {
        Salience(0.5)
    }
}

impl From<f64> for Salience {
    fn from(value: f64) -> Self {
        Salience::new(value)
    }
}

impl std::fmt::Display for Salience {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_out_of_range_values() {
        assert_eq!(Salience::new(1.5).value(), 1.0);
        assert_eq!(Salience::new(-0.5).value(), 0.0);
    }

    #[test]
    fn decay_reduces_salience_over_time() {
        let s = Salience::new(1.0);
        let decayed = s.decayed(0.1, 10.0);
        assert!(decayed.value() < s.value());
        assert!(decayed.value() > 0.0);
    }

    #[test]
    fn reinforcement_saturates_at_max() {
        let s = Salience::new(0.9);
        assert_eq!(s.reinforced(1.0), Salience::MAX);
    }
}
