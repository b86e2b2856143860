use crate::analysis::blender::{WeightVector, ZeroWeightPolicy};
use crate::data::files::DataFiles;
use crate::error::AppError;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub files: DataFiles,
    pub default_weights: WeightVector,
    pub zero_weight_policy: ZeroWeightPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. Unset variables
    /// fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = lookup("BET_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        let defaults = DataFiles::default();
        let files = DataFiles {
            league: lookup("BET_LEAGUE_FILE").unwrap_or(defaults.league),
            home: lookup("BET_HOME_FILE").unwrap_or(defaults.home),
            guest: lookup("BET_GUEST_FILE").unwrap_or(defaults.guest),
            history: lookup("BET_HISTORY_FILE").unwrap_or(defaults.history),
        };

        let base = WeightVector::default();
        let default_weights = WeightVector {
            league: weight_var(&lookup, "BET_LEAGUE_WEIGHT", base.league)?,
            home: weight_var(&lookup, "BET_HOME_WEIGHT", base.home)?,
            away: weight_var(&lookup, "BET_AWAY_WEIGHT", base.away)?,
        };

        let zero_weight_policy = match lookup("BET_ZERO_WEIGHT_POLICY") {
            Some(raw) => raw.parse().map_err(AppError::ConfigError)?,
            None => ZeroWeightPolicy::default(),
        };

        Ok(Config {
            data_dir,
            files,
            default_weights,
            zero_weight_policy,
        })
    }
}

fn weight_var<F>(lookup: &F, key: &str, default: f64) -> Result<f64, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };

    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| AppError::ConfigError(format!("{} must be a number, got '{}'", key, raw)))?;

    if !(0.0..=1.0).contains(&value) {
        return Err(AppError::ConfigError(format!(
            "{} must be between 0 and 1, got {}",
            key, value
        )));
    }

    Ok(value)
}
