use std::fs;
use std::path::{Path, PathBuf};

use approx::assert_relative_eq;
use bet_insights::analysis::blender::{ProbabilityTier, Recommendation, WeightVector, ZeroWeightPolicy};
use bet_insights::analysis::matchup::{eligible_away_teams, eligible_home_teams, leagues, resolve_matchup};
use bet_insights::data::files::DataFiles;
use bet_insights::data::loader::load_dataset;
use bet_insights::data::models::DataSet;
use bet_insights::error::{AppError, ErrorClass};
use indicatif::ProgressBar;

fn fixture_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path
}

fn fixture_data() -> DataSet {
    load_dataset(&fixture_dir(), &DataFiles::default(), &ProgressBar::hidden())
        .expect("fixtures should load")
}

fn calc(data: &DataSet, league: &str, home: &str, away: &str) -> Result<bet_insights::analysis::matchup::MatchupReport, AppError> {
    resolve_matchup(data, league, home, away, &WeightVector::default(), ZeroWeightPolicy::Reject)
}

#[test]
fn loads_all_fixture_tables() {
    let data = fixture_data();
    assert_eq!(data.leagues.len(), 3);
    assert_eq!(data.home.len(), 4);
    assert_eq!(data.guest.len(), 4);
    assert_eq!(data.history.matches.len(), 8);

    let names: Vec<&str> = leagues(&data).iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Eredivisie", "Ligue 1", "Serie A"]);
}

#[test]
fn strong_opportunity_with_head_to_head() {
    let data = fixture_data();
    let report = calc(&data, "Serie A", "Milan", "Inter").unwrap();

    assert_relative_eq!(report.blend.combined, 0.64, epsilon = 1e-9);
    assert_eq!(report.blend.tier, ProbabilityTier::High);
    assert_eq!(report.blend.recommendation, Recommendation::StrongOpportunity);

    let h2h = &report.head_to_head;
    assert_eq!(h2h.columns[0], "date");
    assert_eq!(h2h.rows.len(), 2);
    assert_eq!(h2h.rows[0][0], "2022-09-03");
    assert_eq!(h2h.rows[1][0], "2023-09-16");
}

#[test]
fn high_combined_with_medium_reliability_is_moderate() {
    let data = fixture_data();
    let report = calc(&data, "Serie A", "Juventus", "Napoli").unwrap();

    assert_relative_eq!(report.blend.combined, 0.64, epsilon = 1e-9);
    assert_eq!(report.blend.recommendation, Recommendation::Moderate);
    assert!(report.head_to_head.is_empty());
}

#[test]
fn risk_thresholds_on_real_tables() {
    let data = fixture_data();

    let lyon = calc(&data, "Ligue 1", "Lyon", "Lille").unwrap();
    assert_relative_eq!(lyon.blend.combined, 0.407, epsilon = 1e-9);
    assert_eq!(lyon.blend.tier, ProbabilityTier::Low);
    assert_eq!(lyon.blend.recommendation, Recommendation::Moderate);

    let nice = calc(&data, "Ligue 1", "Nice", "Lille").unwrap();
    assert_relative_eq!(nice.blend.combined, 0.392, epsilon = 1e-9);
    assert_eq!(nice.blend.recommendation, Recommendation::HighRisk);
}

#[test]
fn league_without_home_teams_reports_no_eligible_options() {
    let data = fixture_data();

    let err = eligible_home_teams(&data, "Eredivisie").unwrap_err();
    assert_eq!(err.class(), ErrorClass::NoEligibleOptions);
    assert_eq!(err.to_string(), "No home teams available for league 'Eredivisie'");

    assert_eq!(eligible_away_teams(&data, "Eredivisie").unwrap(), vec!["Ajax"]);
}

#[test]
fn unknown_team_is_missing_data() {
    let data = fixture_data();
    let err = calc(&data, "Serie A", "Roma", "Inter").unwrap_err();
    assert_eq!(err.class(), ErrorClass::MissingData);
    assert!(matches!(err, AppError::NotFound { table: "home team table", .. }));
}

#[test]
fn zero_weights_follow_policy() {
    let data = fixture_data();
    let zero = WeightVector::new(0.0, 0.0, 0.0);

    let err = resolve_matchup(&data, "Serie A", "Milan", "Inter", &zero, ZeroWeightPolicy::Reject)
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidWeights(_)));

    let report =
        resolve_matchup(&data, "Serie A", "Milan", "Inter", &zero, ZeroWeightPolicy::Equal).unwrap();
    assert_relative_eq!(report.blend.combined, (0.70 + 0.65 + 0.55) / 3.0, epsilon = 1e-9);
}

#[test]
fn report_serializes_to_json() {
    let data = fixture_data();
    let report = calc(&data, "Serie A", "Milan", "Inter").unwrap();
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["recommendation"], "Strong Betting Opportunity");
    assert_eq!(value["tier"], "high");
    assert_eq!(value["home"]["reliability"], "Very High");
    assert_eq!(value["league"]["total_games"], 380);
    assert_eq!(value["head_to_head"]["rows"].as_array().unwrap().len(), 2);
}

fn copy_fixtures_except(dir: &Path, skip: &str) {
    for name in [
        "league_probabilities.csv",
        "home_team_probabilities.csv",
        "guest_team_probabilities.csv",
        "clean_data_bet.csv",
    ] {
        if name != skip {
            fs::copy(fixture_dir().join(name), dir.join(name)).unwrap();
        }
    }
}

#[test]
fn missing_history_file_fails_before_loading() {
    let dir = tempfile::tempdir().unwrap();
    copy_fixtures_except(dir.path(), "clean_data_bet.csv");

    let err = load_dataset(dir.path(), &DataFiles::default(), &ProgressBar::hidden()).unwrap_err();
    assert_eq!(err.class(), ErrorClass::MissingData);
    assert!(err.to_string().contains("clean_data_bet.csv"));
    assert!(err.to_string().contains("run the data processing step first"));
}

#[test]
fn custom_file_names() {
    let dir = tempfile::tempdir().unwrap();
    copy_fixtures_except(dir.path(), "");
    fs::rename(
        dir.path().join("clean_data_bet.csv"),
        dir.path().join("matches.csv"),
    )
    .unwrap();

    let files = DataFiles {
        history: "matches.csv".to_string(),
        ..DataFiles::default()
    };
    let data = load_dataset(dir.path(), &files, &ProgressBar::hidden()).unwrap();
    assert_eq!(data.history.matches.len(), 8);
}
