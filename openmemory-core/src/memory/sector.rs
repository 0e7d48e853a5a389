use serde::{Deserialize, Serialize};

/// The closed set of cognitive sectors a memory can belong to (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sector {
    Episodic,
    Semantic,
    Procedural,
    Emotional,
    Reflective,
    Slow,
}

impl Sector {
    /// All six sectors, in a fixed, stable order.
    pub const ALL: [Sector; 6] = [
        Sector::Episodic,
        Sector::Semantic,
        Sector::Procedural,
        Sector::Emotional,
        Sector::Reflective,
        Sector::Slow,
    ];

    /// Classifier tie-break precedence: lower rank wins.
    /// `procedural > episodic > emotional > reflective > semantic > slow`.
    pub fn precedence_rank(self) -> u8 {
        match self {
            Sector::Procedural => 0,
            Sector::Episodic => 1,
            Sector::Emotional => 2,
            Sector::Reflective => 3,
            Sector::Semantic => 4,
            Sector::Slow => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Sector::Episodic => "episodic",
            Sector::Semantic => "semantic",
            Sector::Procedural => "procedural",
            Sector::Emotional => "emotional",
            Sector::Reflective => "reflective",
            Sector::Slow => "slow",
        }
    }
}

impl std::fmt::Display for Sector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Sector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "episodic" => Ok(Sector::Episodic),
            "semantic" => Ok(Sector::Semantic),
            "procedural" => Ok(Sector::Procedural),
            "emotional" => Ok(Sector::Emotional),
            "reflective" => Ok(Sector::Reflective),
            "slow" => Ok(Sector::Slow),
            other => Err(format!("unknown sector: {other}")),
        }
    }
}

/// A sector with its classification weight in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectorWeight {
    pub sector: Sector,
    pub weight: f64,
}

/// Static, per-sector configuration: decay rate, scoring weight, dimensionality hint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectorConfig {
    /// Decay constant λ used in `salience * exp(-λ * Δt_days)`.
    pub decay_lambda: f64,
    /// Contribution of this sector's recency term to composite scoring.
    pub scoring_weight: f64,
    /// Suggested embedding dimensionality for this sector.
    pub dim_hint: usize,
}

impl Sector {
    /// The static config for this sector (spec.md §2, L2 Classifier row).
    pub fn config(self) -> SectorConfig {
        match self {
            Sector::Episodic => SectorConfig { decay_lambda: 0.08, scoring_weight: 1.0, dim_hint: 384 },
            Sector::Semantic => SectorConfig { decay_lambda: 0.02, scoring_weight: 1.0, dim_hint: 384 },
            Sector::Procedural => SectorConfig { decay_lambda: 0.015, scoring_weight: 1.1, dim_hint: 384 },
            Sector::Emotional => SectorConfig { decay_lambda: 0.05, scoring_weight: 0.9, dim_hint: 384 },
            Sector::Reflective => SectorConfig { decay_lambda: 0.03, scoring_weight: 0.9, dim_hint: 384 },
            Sector::Slow => SectorConfig { decay_lambda: 0.005, scoring_weight: 0.8, dim_hint: 384 },
        }
    }
}
