use crate::error::AppError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Confidence tag attached upstream to each probability estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Reliability {
    Low,
    Medium,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl Reliability {
    pub fn is_high(&self) -> bool {
        matches!(self, Reliability::High | Reliability::VeryHigh)
    }
}

impl fmt::Display for Reliability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reliability::Low => write!(f, "Low"),
            Reliability::Medium => write!(f, "Medium"),
            Reliability::High => write!(f, "High"),
            Reliability::VeryHigh => write!(f, "Very High"),
        }
    }
}

impl FromStr for Reliability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Low" => Ok(Reliability::Low),
            "Medium" => Ok(Reliability::Medium),
            "High" => Ok(Reliability::High),
            "Very High" => Ok(Reliability::VeryHigh),
            other => Err(format!("unknown reliability label '{}'", other)),
        }
    }
}

/// One row of a league, home-team or guest-team probability table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilityEntry {
    pub name: String,
    pub probability: f64,
    pub reliability: Reliability,
    pub total_games: u64,
}

pub type LeagueProbability = ProbabilityEntry;
pub type TeamProbability = ProbabilityEntry;

/// Keyed probability table. Keys iterate in sorted order.
#[derive(Debug, Clone, Default)]
pub struct ProbabilityTable {
    label: &'static str,
    entries: BTreeMap<String, ProbabilityEntry>,
}

impl ProbabilityTable {
    pub fn new(label: &'static str) -> Self {
        ProbabilityTable {
            label,
            entries: BTreeMap::new(),
        }
    }

    /// Inserts unless the key already exists. Returns false for a duplicate.
    pub fn insert(&mut self, entry: ProbabilityEntry) -> bool {
        if self.entries.contains_key(&entry.name) {
            return false;
        }
        self.entries.insert(entry.name.clone(), entry);
        true
    }

    pub fn get(&self, key: &str) -> Result<&ProbabilityEntry, AppError> {
        self.entries.get(key).ok_or_else(|| AppError::NotFound {
            table: self.label,
            key: key.to_string(),
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = &ProbabilityEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalMatch {
    pub league: String,
    pub home_team: String,
    pub guest_team: String,
    /// Every column of the source row, aligned with `HistoricalTable::headers`.
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct HistoricalTable {
    pub headers: Vec<String>,
    pub matches: Vec<HistoricalMatch>,
}

impl HistoricalTable {
    pub fn in_league<'a>(&'a self, league: &'a str) -> impl Iterator<Item = &'a HistoricalMatch> {
        self.matches.iter().filter(move |m| m.league == league)
    }

    pub fn head_to_head(&self, home: &str, away: &str) -> Vec<&HistoricalMatch> {
        self.matches
            .iter()
            .filter(|m| m.home_team == home && m.guest_team == away)
            .collect()
    }
}

/// Everything loaded at session start. Never mutated afterwards.
#[derive(Debug, Clone)]
pub struct DataSet {
    pub leagues: ProbabilityTable,
    pub home: ProbabilityTable,
    pub guest: ProbabilityTable,
    pub history: HistoricalTable,
}
