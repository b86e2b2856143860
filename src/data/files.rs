// Default file names produced by the upstream data processing step.

use std::path::{Path, PathBuf};

pub const LEAGUE_FILE: &str = "league_probabilities.csv";
pub const HOME_FILE: &str = "home_team_probabilities.csv";
pub const GUEST_FILE: &str = "guest_team_probabilities.csv";
pub const HISTORY_FILE: &str = "clean_data_bet.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFiles {
    pub league: String,
    pub home: String,
    pub guest: String,
    pub history: String,
}

impl Default for DataFiles {
    fn default() -> Self {
        DataFiles {
            league: LEAGUE_FILE.to_string(),
            home: HOME_FILE.to_string(),
            guest: GUEST_FILE.to_string(),
            history: HISTORY_FILE.to_string(),
        }
    }
}

impl DataFiles {
    /// All four paths resolved under `dir`, in load order.
    pub fn resolve(&self, dir: &Path) -> [PathBuf; 4] {
        [
            dir.join(&self.league),
            dir.join(&self.home),
            dir.join(&self.guest),
            dir.join(&self.history),
        ]
    }
}
