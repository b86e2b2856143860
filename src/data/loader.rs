use crate::data::files::DataFiles;
use crate::data::models::{
    DataSet, HistoricalMatch, HistoricalTable, ProbabilityEntry, ProbabilityTable, Reliability,
};
use crate::error::AppError;
use indicatif::ProgressBar;
use std::path::Path;
use tracing::{debug, info, warn};

const HISTORY_KEY_COLUMNS: [&str; 3] = ["league", "home_team", "guest_team"];

/// Loads all four tables from `dir`. Every file is checked for existence
/// before any of them is read.
pub fn load_dataset(dir: &Path, files: &DataFiles, pb: &ProgressBar) -> Result<DataSet, AppError> {
    let [league_path, home_path, guest_path, history_path] = files.resolve(dir);

    for path in [&league_path, &home_path, &guest_path, &history_path] {
        if !path.is_file() {
            return Err(AppError::MissingFile(path.clone()));
        }
    }

    pb.set_length(4);
    pb.set_message("Loading league probabilities");
    let leagues = load_probability_table(&league_path, "league table")?;
    pb.inc(1);

    pb.set_message("Loading home team probabilities");
    let home = load_probability_table(&home_path, "home team table")?;
    pb.inc(1);

    pb.set_message("Loading guest team probabilities");
    let guest = load_probability_table(&guest_path, "guest team table")?;
    pb.inc(1);

    pb.set_message("Loading historical matches");
    let history = load_history(&history_path)?;
    pb.inc(1);

    info!(
        leagues = leagues.len(),
        home_teams = home.len(),
        guest_teams = guest.len(),
        matches = history.matches.len(),
        "data loaded from {}",
        dir.display()
    );

    Ok(DataSet {
        leagues,
        home,
        guest,
        history,
    })
}

/// Reads a probability table. The first column is the key whatever its
/// header; `probability`, `reliability` and `total_games` are found by name.
pub fn load_probability_table(path: &Path, label: &'static str) -> Result<ProbabilityTable, AppError> {
    let file = path.display().to_string();
    let mut reader = open_reader(path)?;

    let headers = reader
        .headers()
        .map_err(|e| AppError::CsvError(format!("{}: {}", file, e)))?
        .clone();
    if headers.is_empty() {
        return Err(invalid(&file, "file has no header row"));
    }

    let prob_idx = column_index(&headers, "probability", &file)?;
    let rel_idx = column_index(&headers, "reliability", &file)?;
    let games_idx = column_index(&headers, "total_games", &file)?;

    let mut table = ProbabilityTable::new(label);
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|e| AppError::CsvError(format!("{}: {}", file, e)))?;
        let field = |idx: usize| record.get(idx).unwrap_or("");

        let name = field(0).to_string();
        if name.is_empty() {
            return Err(invalid(&file, &format!("row {} has an empty key", row + 1)));
        }

        let probability = parse_probability(field(prob_idx))
            .map_err(|reason| invalid(&file, &format!("'{}': {}", name, reason)))?;
        let reliability: Reliability = field(rel_idx)
            .parse()
            .map_err(|reason: String| invalid(&file, &format!("'{}': {}", name, reason)))?;
        let total_games = parse_total_games(field(games_idx))
            .map_err(|reason| invalid(&file, &format!("'{}': {}", name, reason)))?;

        let entry = ProbabilityEntry {
            name: name.clone(),
            probability,
            reliability,
            total_games,
        };
        if !table.insert(entry) {
            warn!("{}: duplicate key '{}' ignored, keeping first row", file, name);
        }
    }

    debug!("{}: {} rows", file, table.len());
    Ok(table)
}

pub fn load_history(path: &Path) -> Result<HistoricalTable, AppError> {
    let file = path.display().to_string();
    let mut reader = open_reader(path)?;

    let headers = reader
        .headers()
        .map_err(|e| AppError::CsvError(format!("{}: {}", file, e)))?
        .clone();

    let mut key_idx = [0usize; 3];
    for (slot, name) in key_idx.iter_mut().zip(HISTORY_KEY_COLUMNS) {
        *slot = column_index(&headers, name, &file)?;
    }
    let [league_idx, home_idx, guest_idx] = key_idx;

    let mut matches = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| AppError::CsvError(format!("{}: {}", file, e)))?;
        let field = |idx: usize| record.get(idx).unwrap_or("").to_string();

        matches.push(HistoricalMatch {
            league: field(league_idx),
            home_team: field(home_idx),
            guest_team: field(guest_idx),
            values: record.iter().map(str::to_string).collect(),
        });
    }

    debug!("{}: {} matches", file, matches.len());
    Ok(HistoricalTable {
        headers: headers.iter().map(str::to_string).collect(),
        matches,
    })
}

fn open_reader(path: &Path) -> Result<csv::Reader<std::fs::File>, AppError> {
    if !path.is_file() {
        return Err(AppError::MissingFile(path.to_path_buf()));
    }
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| AppError::CsvError(format!("{}: {}", path.display(), e)))
}

fn column_index(headers: &csv::StringRecord, name: &str, file: &str) -> Result<usize, AppError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| invalid(file, &format!("missing required column '{}'", name)))
}

fn invalid(file: &str, reason: &str) -> AppError {
    AppError::InvalidData {
        file: file.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_probability(raw: &str) -> Result<f64, String> {
    let p: f64 = raw
        .parse()
        .map_err(|_| format!("probability '{}' is not a number", raw))?;
    if !p.is_finite() || !(0.0..=1.0).contains(&p) {
        return Err(format!("probability {} is outside [0, 1]", p));
    }
    Ok(p)
}

// pandas writes integer columns as "120.0" once a NaN has passed through them.
fn parse_total_games(raw: &str) -> Result<u64, String> {
    if let Ok(n) = raw.parse::<u64>() {
        return Ok(n);
    }
    match raw.parse::<f64>() {
        Ok(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 => Ok(f as u64),
        _ => Err(format!("total_games '{}' is not a non-negative integer", raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn reads_pandas_index_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "league.csv",
            ",probability,reliability,total_games\nSerie A,0.62,High,380\nLa Liga,0.48,Very High,380.0\n",
        );

        let table = load_probability_table(&path, "league table").unwrap();
        assert_eq!(table.len(), 2);
        let la_liga = table.get("La Liga").unwrap();
        assert_eq!(la_liga.reliability, Reliability::VeryHigh);
        assert_eq!(la_liga.total_games, 380);
        assert_eq!(table.keys().next(), Some("La Liga"));
    }

    #[test]
    fn rejects_out_of_range_probability() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "home.csv",
            "team,probability,reliability,total_games\nAjax,1.2,High,10\n",
        );

        let err = load_probability_table(&path, "home team table").unwrap_err();
        assert!(matches!(err, AppError::InvalidData { .. }));
        assert!(err.to_string().contains("Ajax"));
    }

    #[test]
    fn rejects_unknown_reliability() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "guest.csv",
            "team,probability,reliability,total_games\nAjax,0.5,Superb,10\n",
        );

        let err = load_probability_table(&path, "guest team table").unwrap_err();
        assert!(err.to_string().contains("'Superb'"));
    }

    #[test]
    fn rejects_lowercase_reliability() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "guest.csv",
            "team,probability,reliability,total_games\nAjax,0.5,high,10\n",
        );

        let err = load_probability_table(&path, "guest team table").unwrap_err();
        assert!(err.to_string().contains("'high'"));
    }

    #[test]
    fn rejects_missing_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "league.csv", ",probability,total_games\nX,0.5,3\n");

        let err = load_probability_table(&path, "league table").unwrap_err();
        assert!(err.to_string().contains("reliability"));
    }

    #[test]
    fn total_games_parsing() {
        assert_eq!(parse_total_games("42"), Ok(42));
        assert_eq!(parse_total_games("42.0"), Ok(42));
        assert!(parse_total_games("42.5").is_err());
        assert!(parse_total_games("-1").is_err());
    }

    #[test]
    fn history_keeps_all_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "history.csv",
            "date,league,home_team,guest_team,result\n2023-01-01,Serie A,Milan,Inter,1\n",
        );

        let history = load_history(&path).unwrap();
        assert_eq!(history.headers, vec!["date", "league", "home_team", "guest_team", "result"]);
        let m = &history.matches[0];
        assert_eq!(m.league, "Serie A");
        assert_eq!(m.home_team, "Milan");
        assert_eq!(m.guest_team, "Inter");
        assert_eq!(m.values[4], "1");
    }

    #[test]
    fn history_requires_key_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "history.csv", "league,home_team,result\nA,B,1\n");

        let err = load_history(&path).unwrap_err();
        assert!(err.to_string().contains("guest_team"));
    }

    #[test]
    fn dataset_fails_fast_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "league_probabilities.csv",
            ",probability,reliability,total_games\nA,0.5,High,1\n",
        );

        let err = load_dataset(dir.path(), &DataFiles::default(), &ProgressBar::hidden()).unwrap_err();
        match err {
            AppError::MissingFile(path) => assert!(path.ends_with("home_team_probabilities.csv")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
