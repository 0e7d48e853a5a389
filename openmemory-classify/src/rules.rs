use openmemory_core::memory::Sector;

/// A keyword/pattern signal for one sector. Matching increments that
/// sector's score by `weight`.
pub struct SectorSignal {
    pub sector: Sector,
    pub pattern: &'static str,
    pub weight: f64,
}

/// Heuristic lexical signals feeding the L2 classifier (spec.md §4.3 step 1).
/// Not exhaustive; tuned for precision over recall since ties fall back to
/// `Sector::precedence_rank`.
pub fn all_signals() -> Vec<SectorSignal> {
    vec![
        // Episodic: events anchored to a specific time or occasion.
        SectorSignal { sector: Sector::Episodic, pattern: r"\byesterday\b", weight: 1.0 },
        SectorSignal { sector: Sector::Episodic, pattern: r"\btoday\b", weight: 0.8 },
        SectorSignal { sector: Sector::Episodic, pattern: r"\bwhen (i|we)\b", weight: 0.8 },
        SectorSignal { sector: Sector::Episodic, pattern: r"\bat \d{1,2}(:\d{2})?\s*(am|pm)\b", weight: 1.0 },
        SectorSignal { sector: Sector::Episodic, pattern: r"\b(met|visited|attended|happened)\b", weight: 0.9 },

        // Semantic: durable facts and definitions.
        SectorSignal { sector: Sector::Semantic, pattern: r"\bis (a|an|the)\b", weight: 0.6 },
        SectorSignal { sector: Sector::Semantic, pattern: r"\bmeans\b", weight: 0.7 },
        SectorSignal { sector: Sector::Semantic, pattern: r"\bcapital of\b", weight: 1.0 },
        SectorSignal { sector: Sector::Semantic, pattern: r"\b(always|never) true\b", weight: 0.8 },

        // Procedural: how-to, step-by-step, instructions.
        SectorSignal { sector: Sector::Procedural, pattern: r"\bstep \d+\b", weight: 1.2 },
        SectorSignal { sector: Sector::Procedural, pattern: r"\bhow to\b", weight: 1.0 },
        SectorSignal { sector: Sector::Procedural, pattern: r"\bfirst,? .* then\b", weight: 0.9 },
        SectorSignal { sector: Sector::Procedural, pattern: r"\b(run|execute|configure|install)\b", weight: 0.7 },

        // Emotional: affect-laden language.
        SectorSignal { sector: Sector::Emotional, pattern: r"\b(felt|feel|feeling)\b", weight: 1.0 },
        SectorSignal { sector: Sector::Emotional, pattern: r"\b(happy|sad|angry|anxious|excited|proud|afraid)\b", weight: 1.1 },
        SectorSignal { sector: Sector::Emotional, pattern: r"\b(love|hate|miss)\b", weight: 0.9 },

        // Reflective: self-referential analysis of past experience.
        SectorSignal { sector: Sector::Reflective, pattern: r"\bi (realized|learned|noticed)\b", weight: 1.2 },
        SectorSignal { sector: Sector::Reflective, pattern: r"\bin (hindsight|retrospect)\b", weight: 1.2 },
        SectorSignal { sector: Sector::Reflective, pattern: r"\bnext time i\b", weight: 1.0 },
        SectorSignal { sector: Sector::Reflective, pattern: r"\bwhat (i|we) (should|could) have\b", weight: 0.9 },
    ]
}
