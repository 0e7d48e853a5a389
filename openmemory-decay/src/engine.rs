use chrono::{DateTime, Utc};
use uuid::Uuid;

use openmemory_core::config::DecayConfig;
use openmemory_core::memory::{Memory, Salience};

use crate::eligibility::{self, ColdDecision};
use crate::formula::{self, DecayBreakdown};

/// Applies per-sector exponential salience decay and flags memories that
/// have dropped below the consolidation floor.
pub struct DecayEngine {
    config: DecayConfig,
}

impl Default for DecayEngine {
    fn default() -> Self {
        Self::new(DecayConfig::default())
    }
}

impl DecayEngine {
    pub fn new(config: DecayConfig) -> Self {
        Self { config }
    }

    pub fn archival_salience_threshold(&self) -> f64 {
        self.config.archival_salience_threshold
    }

    /// Computes the memory's decayed salience as of `now`. Does not
    /// mutate `memory` — callers persist the result themselves.
    pub fn decay(&self, memory: &Memory, now: DateTime<Utc>) -> Salience {
        formula::compute(memory, now, &self.config.lambda_overrides)
    }

    pub fn decay_breakdown(&self, memory: &Memory, now: DateTime<Utc>) -> DecayBreakdown {
        formula::compute_breakdown(memory, now, &self.config.lambda_overrides)
    }

    pub fn evaluate_cold(&self, memory: &Memory, decayed: Salience) -> ColdDecision {
        eligibility::evaluate(memory, decayed, self.config.archival_salience_threshold)
    }

    /// Decays a batch of memories and flags the ones cold enough for
    /// consolidation review. Pure computation; the caller writes the new
    /// salience back through `openmemory-storage`.
    pub fn process_batch(&self, memories: &[Memory], now: DateTime<Utc>) -> Vec<(Uuid, Salience, bool)> {
        memories
            .iter()
            .map(|m| {
                let decayed = self.decay(m, now);
                let cold = eligibility::is_cold(decayed, self.config.archival_salience_threshold);
                (m.id, decayed, cold)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openmemory_core::memory::Sector;

    #[test]
    fn process_batch_flags_cold_memories() {
        let engine = DecayEngine::new(DecayConfig { archival_salience_threshold: 0.2, ..DecayConfig::default() });

        let mut fresh = Memory::new("user-1", "ciphertext", Sector::Episodic);
        fresh.salience = Salience::new(0.9);

        let mut cold = Memory::new("user-1", "ciphertext", Sector::Episodic);
        cold.salience = Salience::new(0.01);
        cold.last_seen_at = Utc::now() - chrono::Duration::days(400);

        let results = engine.process_batch(&[fresh.clone(), cold.clone()], Utc::now());
        assert_eq!(results.len(), 2);
        let fresh_result = results.iter().find(|(id, _, _)| *id == fresh.id).unwrap();
        let cold_result = results.iter().find(|(id, _, _)| *id == cold.id).unwrap();
        assert!(!fresh_result.2);
        assert!(cold_result.2);
    }

    #[test]
    fn lambda_overrides_flow_through_engine() {
        let mut overrides = std::collections::HashMap::new();
        overrides.insert("episodic".to_string(), 0.0);
        let engine = DecayEngine::new(DecayConfig { lambda_overrides: overrides, ..DecayConfig::default() });

        let mut m = Memory::new("user-1", "ciphertext", Sector::Episodic);
        m.salience = Salience::new(0.7);
        let later = m.last_seen_at + chrono::Duration::days(1000);
        let decayed = engine.decay(&m, later);
        assert!((decayed.value() - 0.7).abs() < 1e-9);
    }
}
