use std::sync::OnceLock;

use regex::Regex;

use openmemory_core::memory::{Sector, SectorWeight};

use crate::rules::{all_signals, SectorSignal};

struct CompiledSignal {
    sector: Sector,
    regex: Regex,
    weight: f64,
}

static COMPILED_SIGNALS: OnceLock<Vec<CompiledSignal>> = OnceLock::new();

fn compiled_signals() -> &'static [CompiledSignal] {
    COMPILED_SIGNALS.get_or_init(|| {
        all_signals()
            .into_iter()
            .filter_map(|SectorSignal { sector, pattern, weight }| {
                Regex::new(&format!("(?i){pattern}"))
                    .map(|regex| CompiledSignal { sector, regex, weight })
                    .ok()
            })
            .collect()
    })
}

/// Classifies `text` into a primary sector plus per-sector weights
/// (spec.md §4.3 step 1).
///
/// Every sector that accrues any score is returned with a weight
/// normalized against the highest-scoring sector; the primary sector is
/// the highest scorer, ties broken by `Sector::precedence_rank`.
pub fn classify(text: &str) -> (Sector, Vec<SectorWeight>) {
    let mut scores: [f64; 6] = [0.0; 6];

    for signal in compiled_signals() {
        if signal.regex.is_match(text) {
            let idx = Sector::ALL.iter().position(|s| *s == signal.sector).unwrap();
            scores[idx] += signal.weight;
        }
    }

    let max_score = scores.iter().cloned().fold(0.0_f64, f64::max);

    if max_score <= 0.0 {
        // No lexical signal fired: default to the slow sector, the
        // catch-all for undifferentiated background memory.
        return (Sector::Slow, vec![SectorWeight { sector: Sector::Slow, weight: 1.0 }]);
    }

    let mut weights: Vec<SectorWeight> = Sector::ALL
        .iter()
        .zip(scores.iter())
        .filter(|(_, score)| **score > 0.0)
        .map(|(sector, score)| SectorWeight { sector: *sector, weight: score / max_score })
        .collect();

    weights.sort_by(|a, b| {
        b.weight
            .partial_cmp(&a.weight)
            .unwrap()
            .then_with(|| a.sector.precedence_rank().cmp(&b.sector.precedence_rank()))
    });

    let primary = weights[0].sector;
    (primary, weights)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn episodic_cue_wins_primary_sector() {
        let (primary, _) = classify("Yesterday I met with the design team at 3pm.");
        assert_eq!(primary, Sector::Episodic);
    }

    #[test]
    fn procedural_cue_wins_primary_sector() {
        let (primary, _) = classify("Step 1: run the migration. Step 2: configure the pool.");
        assert_eq!(primary, Sector::Procedural);
    }

    #[test]
    fn no_signal_falls_back_to_slow() {
        let (primary, weights) = classify("xyzzy plugh");
        assert_eq!(primary, Sector::Slow);
        assert_eq!(weights.len(), 1);
    }

    #[test]
    fn tie_breaks_by_precedence() {
        // "means" (semantic, 0.7) and "run" (procedural, 0.7) score equally;
        // procedural outranks semantic in precedence.
        let (primary, _) = classify("This means you should run the job now.");
        assert_eq!(primary, Sector::Procedural);
    }
}
