use crate::analysis::blender::{WeightVector, ZeroWeightPolicy};
use crate::analysis::matchup::{
    eligible_away_teams, eligible_home_teams, leagues, resolve_matchup, MatchupReport,
};
use crate::data::models::{DataSet, ProbabilityTable};
use crate::display::output::{display_error, display_report, display_warning, selection_label};
use crate::error::{AppError, ErrorClass};
use colored::*;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use tracing::debug;

/// Prompt-driven session over an already loaded data set. Runs until the
/// user picks "Quit" in the league list; a failed round is reported and
/// the loop continues.
pub fn run_interactive(
    data: &DataSet,
    default_weights: WeightVector,
    policy: ZeroWeightPolicy,
) -> Result<(), AppError> {
    println!("{}", "🎲 Betting Probability Calculator".green().bold());
    println!("Pick a league and two teams to blend their probabilities.\n");

    let theme = ColorfulTheme::default();
    let mut weights = default_weights;

    loop {
        match play_round(&theme, data, &mut weights, policy) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => match e.class() {
                ErrorClass::NoEligibleOptions => display_warning(&e.to_string()),
                _ if matches!(e, AppError::PromptError(_)) => return Err(e),
                _ => display_error(&e.to_string()),
            },
        }
        println!();
    }

    println!("Goodbye!");
    Ok(())
}

/// One selection pass. Returns `Ok(false)` when the user chose to quit.
fn play_round(
    theme: &ColorfulTheme,
    data: &DataSet,
    weights: &mut WeightVector,
    policy: ZeroWeightPolicy,
) -> Result<bool, AppError> {
    let league_entries = leagues(data);
    let mut options: Vec<String> = league_entries.iter().map(|e| selection_label(e)).collect();
    options.push("Quit".to_string());

    let choice = Select::with_theme(theme)
        .with_prompt("Choose League")
        .items(&options)
        .default(0)
        .interact()?;
    let Some(league) = league_entries.get(choice).map(|e| e.name.clone()) else {
        return Ok(false);
    };

    let home_teams = eligible_home_teams(data, &league)?;
    let home = pick_team(theme, "Choose Home Team", &home_teams, &data.home)?;

    let away_teams = eligible_away_teams(data, &league)?;
    let away = pick_team(theme, "Choose Away Team", &away_teams, &data.guest)?;

    let entered = prompt_weights(theme, *weights)?;
    debug!(?entered, "weights entered");

    let report = settle_round(data, [&league, &home, &away], entered, weights, policy)?;
    display_report(&report);
    Ok(true)
}

/// Resolves the selection with the entered weights. They become the next
/// round's defaults only when the round succeeds.
fn settle_round(
    data: &DataSet,
    [league, home, away]: [&str; 3],
    entered: WeightVector,
    weights: &mut WeightVector,
    policy: ZeroWeightPolicy,
) -> Result<MatchupReport, AppError> {
    let report = resolve_matchup(data, league, home, away, &entered, policy)?;
    *weights = entered;
    Ok(report)
}

fn pick_team(
    theme: &ColorfulTheme,
    prompt: &str,
    teams: &[String],
    source: &ProbabilityTable,
) -> Result<String, AppError> {
    let labels = teams
        .iter()
        .map(|t| source.get(t).map(selection_label))
        .collect::<Result<Vec<_>, _>>()?;

    let idx = Select::with_theme(theme)
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(teams[idx].clone())
}

fn prompt_weights(theme: &ColorfulTheme, current: WeightVector) -> Result<WeightVector, AppError> {
    println!("{}", "Probability Weights (0.0 - 1.0)".bold());
    Ok(WeightVector {
        league: prompt_weight(theme, "League Weight", current.league)?,
        home: prompt_weight(theme, "Home Team Weight", current.home)?,
        away: prompt_weight(theme, "Away Team Weight", current.away)?,
    })
}

fn prompt_weight(theme: &ColorfulTheme, prompt: &str, default: f64) -> Result<f64, AppError> {
    let value = Input::<f64>::with_theme(theme)
        .with_prompt(prompt)
        .default(default)
        .validate_with(|v: &f64| -> Result<(), String> {
            if (0.0..=1.0).contains(v) {
                Ok(())
            } else {
                Err("weight must be between 0 and 1".to_string())
            }
        })
        .interact_text()?;
    Ok(value)
}
