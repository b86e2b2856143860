use crate::analysis::blender::{ProbabilityTier, Recommendation};
use crate::analysis::matchup::{HeadToHead, MatchupReport};
use crate::data::models::{ProbabilityEntry, ProbabilityTable};
use crate::error::AppError;
use colored::*;
use tabled::{builder::Builder, settings::Style, Table, Tabled};

#[derive(Tabled)]
struct EntryRow {
    name: String,
    probability: String,
    reliability: String,
    games: String,
}

#[derive(Tabled)]
struct SourceRow {
    source: String,
    name: String,
    probability: String,
    reliability: String,
    #[tabled(rename = "games analyzed")]
    games: String,
}

/// `0.6432` -> `"64.32%"`
pub fn format_percent(p: f64) -> String {
    format!("{:.2}%", p * 100.0)
}

/// Label used in selection lists, e.g. `"Serie A (Prob: 0.62)"`.
pub fn selection_label(entry: &ProbabilityEntry) -> String {
    format!("{} (Prob: {:.2})", entry.name, entry.probability)
}

fn tier_colored(text: &str, tier: ProbabilityTier) -> ColoredString {
    match tier {
        ProbabilityTier::High => text.green(),
        ProbabilityTier::Medium => text.yellow(),
        ProbabilityTier::Low => text.red(),
    }
}

pub fn display_error(error: &str) {
    eprintln!("{} {}", "❌ Error:".red().bold(), error);
}

pub fn display_warning(message: &str) {
    eprintln!("{} {}", "⚠️  Warning:".yellow().bold(), message);
}

pub fn display_info(message: &str) {
    println!("{} {}", "ℹ️".cyan(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

pub fn display_leagues(leagues: &[&ProbabilityEntry]) {
    println!("\n{}", "🏆 LEAGUES".bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());

    if leagues.is_empty() {
        println!("{}", "No leagues in the league table".yellow());
        return;
    }

    let rows: Vec<EntryRow> = leagues.iter().map(|e| entry_row(e)).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

pub fn display_teams(role: &str, league: &str, teams: &[String], source: &ProbabilityTable) {
    println!(
        "\n{}",
        format!("⚽ {} TEAMS in {}", role.to_uppercase(), league).bold().cyan()
    );
    println!("{}\n", "=".repeat(60).cyan());

    let rows: Vec<EntryRow> = teams
        .iter()
        .filter_map(|t| source.get(t).ok())
        .map(entry_row)
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

fn entry_row(e: &ProbabilityEntry) -> EntryRow {
    EntryRow {
        name: e.name.clone(),
        probability: format!("{:.2}", e.probability),
        reliability: e.reliability.to_string(),
        games: e.total_games.to_string(),
    }
}

pub fn display_report(report: &MatchupReport) {
    let blend = &report.blend;

    println!("\n{}", "-".repeat(60));
    let headline = format!("Combined Probability: {}", format_percent(blend.combined));
    println!("{}", tier_colored(&headline, blend.tier).bold());
    println!(
        "  weights: league {:.2} · home {:.2} · away {:.2}",
        blend.weights.league, blend.weights.home, blend.weights.away
    );
    println!("{}\n", "-".repeat(60));

    let sources = [
        ("League", &report.league),
        ("Home Team", &report.home),
        ("Away Team", &report.away),
    ];
    let rows: Vec<SourceRow> = sources
        .iter()
        .map(|(source, e)| SourceRow {
            source: source.to_string(),
            name: e.name.clone(),
            probability: format_percent(e.probability),
            reliability: e.reliability.to_string(),
            games: e.total_games.to_string(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);

    println!("\n{}", "Betting Recommendation".bold().yellow());
    display_recommendation(blend.recommendation);

    println!("\n{}", "Historical Performance".bold().yellow());
    display_head_to_head(&report.head_to_head);
    println!();
}

/// `"High Risk - Consider Avoiding"`, or just the label when there is no advice.
pub fn recommendation_line(rec: Recommendation) -> String {
    match rec.advice() {
        Some(advice) => format!("{} - {}", rec.label(), advice),
        None => rec.label().to_string(),
    }
}

fn display_recommendation(rec: Recommendation) {
    let line = recommendation_line(rec);
    match rec {
        Recommendation::StrongOpportunity => println!("  {} {}", "✅".green(), line.green().bold()),
        Recommendation::Moderate => println!("  {} {}", "⚠️".yellow(), line.yellow().bold()),
        Recommendation::HighRisk => println!("  {} {}", "⛔".red(), line.red().bold()),
    }
}

fn display_head_to_head(h2h: &HeadToHead) {
    if h2h.is_empty() {
        println!("  {}", "No historical matches found between these teams".cyan());
        return;
    }

    let mut builder = Builder::default();
    builder.push_record(h2h.columns.iter().cloned());
    for row in &h2h.rows {
        builder.push_record(row.iter().cloned());
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    println!("{}", table);
    println!("  {} match(es)", h2h.rows.len());
}

pub fn display_report_json(report: &MatchupReport) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| AppError::JsonError(format!("Failed to serialize report: {}", e)))?;
    println!("{}", json);
    Ok(())
}
