use openmemory_core::memory::{Memory, Salience};

/// Whether `salience` has dropped below the consolidation floor. Pure
/// salience check — the waypoint-degree check named alongside it in the
/// consolidation rule lives in `openmemory-consolidation`, which has
/// access to the waypoint graph this crate does not.
pub fn is_cold(salience: Salience, threshold: f64) -> bool {
    salience.value() < threshold
}

#[derive(Debug, Clone)]
pub struct ColdDecision {
    pub memory_id: uuid::Uuid,
    pub cold: bool,
    pub salience: f64,
    pub threshold: f64,
}

pub fn evaluate(memory: &Memory, salience: Salience, threshold: f64) -> ColdDecision {
    ColdDecision { memory_id: memory.id, cold: is_cold(salience, threshold), salience: salience.value(), threshold }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openmemory_core::memory::Sector;

    #[test]
    fn below_threshold_is_cold() {
        assert!(is_cold(Salience::new(0.05), 0.1));
        assert!(!is_cold(Salience::new(0.2), 0.1));
    }

    #[test]
    fn evaluate_carries_memory_id() {
        let m = Memory::new("user-1", "ciphertext", Sector::Semantic);
        let decision = evaluate(&m, Salience::new(0.01), 0.1);
        assert_eq!(decision.memory_id, m.id);
        assert!(decision.cold);
    }
}
