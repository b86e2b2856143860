use super::blender::{Blend, ProbabilityBlender, WeightVector, ZeroWeightPolicy};
use crate::data::models::{DataSet, ProbabilityEntry, ProbabilityTable};
use crate::error::AppError;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamRole {
    Home,
    Away,
}

impl TeamRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TeamRole::Home => "home",
            TeamRole::Away => "away",
        }
    }
}

/// Full result for one league/home/away selection.
#[derive(Debug, Clone, Serialize)]
pub struct MatchupReport {
    pub league: ProbabilityEntry,
    pub home: ProbabilityEntry,
    pub away: ProbabilityEntry,
    #[serde(flatten)]
    pub blend: Blend,
    pub head_to_head: HeadToHead,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeadToHead {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl HeadToHead {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// League keys in sorted order.
pub fn leagues(data: &DataSet) -> Vec<&ProbabilityEntry> {
    data.leagues.entries().collect()
}

/// Teams that played `league` in the given role and have a probability row
/// for that role.
pub fn eligible_teams(data: &DataSet, league: &str, role: TeamRole) -> Result<Vec<String>, AppError> {
    let table = role_table(data, role);
    let played: BTreeSet<&str> = data
        .history
        .in_league(league)
        .map(|m| match role {
            TeamRole::Home => m.home_team.as_str(),
            TeamRole::Away => m.guest_team.as_str(),
        })
        .collect();

    let teams: Vec<String> = played
        .into_iter()
        .filter(|team| table.contains(team))
        .map(str::to_string)
        .collect();

    debug!(league, role = role.as_str(), count = teams.len(), "eligible teams");

    if teams.is_empty() {
        return Err(AppError::NoEligibleTeams {
            role: role.as_str(),
            league: league.to_string(),
        });
    }
    Ok(teams)
}

pub fn eligible_home_teams(data: &DataSet, league: &str) -> Result<Vec<String>, AppError> {
    eligible_teams(data, league, TeamRole::Home)
}

pub fn eligible_away_teams(data: &DataSet, league: &str) -> Result<Vec<String>, AppError> {
    eligible_teams(data, league, TeamRole::Away)
}

/// All historical rows with `home` hosting `away`, in file order.
pub fn head_to_head(data: &DataSet, home: &str, away: &str) -> HeadToHead {
    let rows = data
        .history
        .head_to_head(home, away)
        .into_iter()
        .map(|m| m.values.clone())
        .collect();

    HeadToHead {
        columns: data.history.headers.clone(),
        rows,
    }
}

pub fn resolve_matchup(
    data: &DataSet,
    league: &str,
    home: &str,
    away: &str,
    weights: &WeightVector,
    policy: ZeroWeightPolicy,
) -> Result<MatchupReport, AppError> {
    let league_entry = data.leagues.get(league)?;
    let home_entry = data.home.get(home)?;
    let away_entry = data.guest.get(away)?;

    ensure_eligible(data, league, home, TeamRole::Home)?;
    ensure_eligible(data, league, away, TeamRole::Away)?;

    let blend = ProbabilityBlender::blend(
        [
            league_entry.probability,
            home_entry.probability,
            away_entry.probability,
        ],
        [
            league_entry.reliability,
            home_entry.reliability,
            away_entry.reliability,
        ],
        weights,
        policy,
    )?;

    debug!(
        league,
        home,
        away,
        combined = blend.combined,
        recommendation = %blend.recommendation,
        "matchup resolved"
    );

    Ok(MatchupReport {
        league: league_entry.clone(),
        home: home_entry.clone(),
        away: away_entry.clone(),
        blend,
        head_to_head: head_to_head(data, home, away),
    })
}

fn ensure_eligible(data: &DataSet, league: &str, team: &str, role: TeamRole) -> Result<(), AppError> {
    let eligible = eligible_teams(data, league, role)?;
    if eligible.iter().any(|t| t == team) {
        Ok(())
    } else {
        Err(AppError::TeamNotInLeague {
            role: role.as_str(),
            team: team.to_string(),
            league: league.to_string(),
        })
    }
}

fn role_table(data: &DataSet, role: TeamRole) -> &ProbabilityTable {
    match role {
        TeamRole::Home => &data.home,
        TeamRole::Away => &data.guest,
    }
}
