use crate::data::models::Reliability;
use crate::error::AppError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

pub const HIGH_TIER_THRESHOLD: f64 = 0.60;
pub const MEDIUM_TIER_THRESHOLD: f64 = 0.45;
pub const HIGH_RISK_THRESHOLD: f64 = 0.40;

/// Raw weights for the league, home and away sources.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightVector {
    pub league: f64,
    pub home: f64,
    pub away: f64,
}

impl Default for WeightVector {
    fn default() -> Self {
        WeightVector {
            league: 0.4,
            home: 0.3,
            away: 0.3,
        }
    }
}

/// What to do when all three weights are zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZeroWeightPolicy {
    #[default]
    Reject,
    Equal,
}

impl FromStr for ZeroWeightPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(ZeroWeightPolicy::Reject),
            "equal" => Ok(ZeroWeightPolicy::Equal),
            other => Err(format!(
                "unknown zero weight policy '{}' (expected 'reject' or 'equal')",
                other
            )),
        }
    }
}

impl WeightVector {
    pub fn new(league: f64, home: f64, away: f64) -> Self {
        WeightVector { league, home, away }
    }

    pub fn total(&self) -> f64 {
        self.league + self.home + self.away
    }

    /// Scales the weights so they sum to 1.
    pub fn normalize(&self, policy: ZeroWeightPolicy) -> Result<WeightVector, AppError> {
        for (name, w) in [("league", self.league), ("home", self.home), ("away", self.away)] {
            if !w.is_finite() || w < 0.0 {
                return Err(AppError::InvalidWeights(format!(
                    "{} weight must be a non-negative number, got {}",
                    name, w
                )));
            }
        }

        // Scale by the largest weight first so the sum cannot overflow.
        let max = self.league.max(self.home).max(self.away);
        if max > 0.0 {
            let scaled = WeightVector::new(self.league / max, self.home / max, self.away / max);
            let total = scaled.total();
            return Ok(WeightVector {
                league: scaled.league / total,
                home: scaled.home / total,
                away: scaled.away / total,
            });
        }

        match policy {
            ZeroWeightPolicy::Reject => Err(AppError::InvalidWeights(
                "at least one weight must be greater than zero".to_string(),
            )),
            ZeroWeightPolicy::Equal => Ok(WeightVector::new(1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0)),
        }
    }
}

/// Display tier of a combined probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbabilityTier {
    High,
    Medium,
    Low,
}

impl ProbabilityTier {
    pub fn classify(p: f64) -> Self {
        if p >= HIGH_TIER_THRESHOLD {
            ProbabilityTier::High
        } else if p >= MEDIUM_TIER_THRESHOLD {
            ProbabilityTier::Medium
        } else {
            ProbabilityTier::Low
        }
    }
}

impl fmt::Display for ProbabilityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbabilityTier::High => write!(f, "high"),
            ProbabilityTier::Medium => write!(f, "medium"),
            ProbabilityTier::Low => write!(f, "low"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Recommendation {
    #[serde(rename = "Strong Betting Opportunity")]
    StrongOpportunity,
    #[serde(rename = "Moderate — Proceed with Caution")]
    Moderate,
    #[serde(rename = "High Risk")]
    HighRisk,
}

impl Recommendation {
    /// Rules are checked in order: strong, high risk, moderate.
    pub fn evaluate(combined: f64, reliabilities: [Reliability; 3]) -> Self {
        if combined >= HIGH_TIER_THRESHOLD && reliabilities.iter().all(Reliability::is_high) {
            Recommendation::StrongOpportunity
        } else if combined <= HIGH_RISK_THRESHOLD {
            Recommendation::HighRisk
        } else {
            Recommendation::Moderate
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::StrongOpportunity => "Strong Betting Opportunity",
            Recommendation::Moderate => "Moderate — Proceed with Caution",
            Recommendation::HighRisk => "High Risk",
        }
    }

    pub fn advice(&self) -> Option<&'static str> {
        match self {
            Recommendation::StrongOpportunity | Recommendation::Moderate => None,
            Recommendation::HighRisk => Some("Consider Avoiding"),
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Blend {
    pub combined: f64,
    pub weights: WeightVector,
    pub tier: ProbabilityTier,
    pub recommendation: Recommendation,
}

pub struct ProbabilityBlender;

impl ProbabilityBlender {
    /// Weighted average of the three probabilities:
    /// - league × league_weight
    /// - home × home_weight
    /// - away × away_weight
    /// with the weights normalized to sum to 1 first.
    pub fn combine(
        p_league: f64,
        p_home: f64,
        p_away: f64,
        weights: &WeightVector,
        policy: ZeroWeightPolicy,
    ) -> Result<(f64, WeightVector), AppError> {
        let w = weights.normalize(policy)?;
        let combined = p_league * w.league + p_home * w.home + p_away * w.away;
        Ok((combined, w))
    }

    pub fn blend(
        probabilities: [f64; 3],
        reliabilities: [Reliability; 3],
        weights: &WeightVector,
        policy: ZeroWeightPolicy,
    ) -> Result<Blend, AppError> {
        let [p_league, p_home, p_away] = probabilities;
        let (combined, normalized) = Self::combine(p_league, p_home, p_away, weights, policy)?;

        Ok(Blend {
            combined,
            weights: normalized,
            tier: ProbabilityTier::classify(combined),
            recommendation: Recommendation::evaluate(combined, reliabilities),
        })
    }
}
