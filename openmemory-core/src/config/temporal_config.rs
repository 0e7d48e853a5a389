use serde::{Deserialize, Serialize};

use super::defaults;

/// Bitemporal fact/edge store configuration (spec.md §4.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemporalConfig {
    /// Reinforcement rate `α` applied when a re-asserted fact matches the
    /// current active object: `confidence += α * (1 - confidence)`.
    pub reinforcement_alpha: f64,
    /// Confidence decay constant used in the periodic confidence sweep.
    pub confidence_decay_lambda: f64,
    /// Active facts whose confidence drops below this are auto-closed.
    pub confidence_floor: f64,
}

impl Default for TemporalConfig {
    fn default() -> Self {
        Self {
            reinforcement_alpha: defaults::DEFAULT_TEMPORAL_REINFORCEMENT_ALPHA,
            confidence_decay_lambda: defaults::DEFAULT_TEMPORAL_CONFIDENCE_DECAY_LAMBDA,
            confidence_floor: defaults::DEFAULT_TEMPORAL_CONFIDENCE_FLOOR,
        }
    }
}
