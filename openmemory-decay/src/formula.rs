use std::collections::HashMap;

use chrono::{DateTime, Utc};

use openmemory_core::memory::{Memory, Salience, Sector};

/// Resolves the decay λ used for a memory: a weighted average of each
/// sector it belongs to, weighted by that sector's `SectorWeight`, falling
/// back to `Sector::config().decay_lambda` unless `overrides` names that
/// sector explicitly.
pub fn effective_lambda(memory: &Memory, overrides: &HashMap<String, f64>) -> f64 {
    let total_weight: f64 = memory.sectors.iter().map(|sw| sw.weight).sum();
    if total_weight <= 0.0 {
        return memory.primary_sector.config().decay_lambda;
    }

    memory
        .sectors
        .iter()
        .map(|sw| {
            let lambda = overrides.get(sw.sector.as_str()).copied().unwrap_or_else(|| sw.sector.config().decay_lambda);
            lambda * (sw.weight / total_weight)
        })
        .sum()
}

/// `salience <- salience * exp(-lambda * elapsed_days)`, clamped to
/// `[0, 1]` by `Salience` itself.
pub fn compute(memory: &Memory, now: DateTime<Utc>, overrides: &HashMap<String, f64>) -> Salience {
    let lambda = effective_lambda(memory, overrides);
    let elapsed_days = (now - memory.last_seen_at).num_seconds().max(0) as f64 / 86400.0;
    memory.salience.decayed(lambda, elapsed_days)
}

/// Per-sector breakdown of the decay computation, for observability.
#[derive(Debug, Clone)]
pub struct DecayBreakdown {
    pub starting_salience: f64,
    pub effective_lambda: f64,
    pub elapsed_days: f64,
    pub final_salience: f64,
    pub per_sector_lambda: Vec<(Sector, f64)>,
}

pub fn compute_breakdown(memory: &Memory, now: DateTime<Utc>, overrides: &HashMap<String, f64>) -> DecayBreakdown {
    let lambda = effective_lambda(memory, overrides);
    let elapsed_days = (now - memory.last_seen_at).num_seconds().max(0) as f64 / 86400.0;
    let final_salience = memory.salience.decayed(lambda, elapsed_days);

    DecayBreakdown {
        starting_salience: memory.salience.value(),
        effective_lambda: lambda,
        elapsed_days,
        final_salience: final_salience.value(),
        per_sector_lambda: memory
            .sectors
            .iter()
            .map(|sw| (sw.sector, overrides.get(sw.sector.as_str()).copied().unwrap_or_else(|| sw.sector.config().decay_lambda)))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openmemory_core::memory::SectorWeight;
    use std::time::Duration as StdDuration;

    fn memory_with_sectors(sectors: Vec<SectorWeight>) -> Memory {
        let mut m = Memory::new("user-1", "ciphertext", sectors[0].sector);
        m.sectors = sectors;
        m
    }

    #[test]
    fn no_elapsed_time_leaves_salience_unchanged() {
        let m = Memory::new("user-1", "ciphertext", Sector::Semantic);
        let decayed = compute(&m, m.last_seen_at, &HashMap::new());
        assert!((decayed.value() - m.salience.value()).abs() < 1e-9);
    }

    #[test]
    fn elapsed_time_reduces_salience() {
        let mut m = Memory::new("user-1", "ciphertext", Sector::Episodic);
        m.salience = Salience::new(1.0);
        let later = m.last_seen_at + chrono::Duration::days(30);
        let decayed = compute(&m, later, &HashMap::new());
        assert!(decayed.value() < 1.0);
        assert!(decayed.value() > 0.0);
    }

    #[test]
    fn slow_sector_decays_slower_than_episodic() {
        let later_fn = |m: &Memory| m.last_seen_at + chrono::Duration::days(60);

        let mut episodic = Memory::new("user-1", "ciphertext", Sector::Episodic);
        episodic.salience = Salience::new(1.0);
        let episodic_decayed = compute(&episodic, later_fn(&episodic), &HashMap::new());

        let mut slow = Memory::new("user-1", "ciphertext", Sector::Slow);
        slow.salience = Salience::new(1.0);
        let slow_decayed = compute(&slow, later_fn(&slow), &HashMap::new());

        assert!(slow_decayed.value() > episodic_decayed.value());
    }

    #[test]
    fn lambda_override_takes_precedence_over_sector_default() {
        let m = memory_with_sectors(vec![SectorWeight { sector: Sector::Episodic, weight: 1.0 }]);
        let mut overrides = HashMap::new();
        overrides.insert("episodic".to_string(), 0.0);
        let later = m.last_seen_at + chrono::Duration::days(100);
        let decayed = compute(&m, later, &overrides);
        assert!((decayed.value() - m.salience.value()).abs() < 1e-9);
        let _ = StdDuration::from_secs(0);
    }

    #[test]
    fn mixed_sector_weights_blend_lambda() {
        let m = memory_with_sectors(vec![
            SectorWeight { sector: Sector::Episodic, weight: 0.5 },
            SectorWeight { sector: Sector::Slow, weight: 0.5 },
        ]);
        let lambda = effective_lambda(&m, &HashMap::new());
        let episodic_lambda = Sector::Episodic.config().decay_lambda;
        let slow_lambda = Sector::Slow.config().decay_lambda;
        assert!(lambda > slow_lambda && lambda < episodic_lambda);
    }
}
