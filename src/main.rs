use bet_insights::analysis::blender::{WeightVector, ZeroWeightPolicy};
use bet_insights::analysis::matchup::{eligible_away_teams, eligible_home_teams, leagues, resolve_matchup};
use bet_insights::config::Config;
use bet_insights::data::loader::load_dataset;
use bet_insights::display::output::{
    display_error, display_info, display_leagues, display_report, display_report_json, display_success,
    display_teams, display_warning,
};
use bet_insights::error::{AppError, ErrorClass};
use bet_insights::interactive::run_interactive;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "Bet Insights")]
#[command(about = "Blend league and team probabilities into a betting recommendation", long_about = None)]
struct Args {
    /// Directory holding the generated probability tables (default: BET_DATA_DIR or .)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// What to do when all weights are zero: reject or equal
    #[arg(long, global = true, value_parser = parse_policy)]
    zero_weights: Option<ZeroWeightPolicy>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pick a matchup with prompts (default)
    Interactive,

    /// List leagues with their probability, reliability and games analyzed
    Leagues,

    /// List home and away teams eligible in a league
    Teams {
        #[arg(short, long)]
        league: String,
    },

    /// Compute the combined probability for one matchup
    Calc {
        #[arg(short, long)]
        league: String,

        #[arg(long)]
        home: String,

        #[arg(long)]
        away: String,

        /// League weight in [0, 1] (default: BET_LEAGUE_WEIGHT or 0.4)
        #[arg(long, value_parser = parse_weight)]
        league_weight: Option<f64>,

        /// Home team weight in [0, 1] (default: BET_HOME_WEIGHT or 0.3)
        #[arg(long, value_parser = parse_weight)]
        home_weight: Option<f64>,

        /// Away team weight in [0, 1] (default: BET_AWAY_WEIGHT or 0.3)
        #[arg(long, value_parser = parse_weight)]
        away_weight: Option<f64>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_weight(s: &str) -> Result<f64, String> {
    let w: f64 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    if !(0.0..=1.0).contains(&w) {
        return Err(format!("weight must be between 0 and 1, got {}", w));
    }
    Ok(w)
}

fn parse_policy(s: &str) -> Result<ZeroWeightPolicy, String> {
    s.parse()
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        match e.class() {
            ErrorClass::NoEligibleOptions => display_warning(&e.to_string()),
            _ => display_error(&e.to_string()),
        }
        std::process::exit(exit_code(&e));
    }
}

/// 2 when the data simply offers nothing to pick, 1 for every other failure.
fn exit_code(e: &AppError) -> i32 {
    match e.class() {
        ErrorClass::NoEligibleOptions => 2,
        _ => 1,
    }
}

fn run(args: Args) -> Result<(), AppError> {
    let mut config = Config::from_env()?;
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }
    if let Some(policy) = args.zero_weights {
        config.zero_weight_policy = policy;
    }
    debug!(?config, "configuration resolved");

    let pb = ProgressBar::new(4);
    pb.set_style(
        ProgressStyle::with_template("{spinner} {msg} [{pos}/{len}]")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    let data = load_dataset(&config.data_dir, &config.files, &pb);
    pb.finish_and_clear();
    let data = data?;

    match args.command.unwrap_or(Command::Interactive) {
        Command::Interactive => {
            display_info(&format!("Reading tables from {}", config.data_dir.display()));
            display_success(&format!(
                "Loaded {} leagues, {} home teams, {} away teams, {} historical matches",
                data.leagues.len(),
                data.home.len(),
                data.guest.len(),
                data.history.matches.len()
            ));
            run_interactive(&data, config.default_weights, config.zero_weight_policy)
        }
        Command::Leagues => {
            display_leagues(&leagues(&data));
            Ok(())
        }
        Command::Teams { league } => {
            data.leagues.get(&league)?;
            let home = eligible_home_teams(&data, &league);
            let away = eligible_away_teams(&data, &league);

            // Show whichever side has teams before reporting an empty one.
            if let Ok(teams) = &home {
                display_teams("home", &league, teams, &data.home);
            }
            if let Ok(teams) = &away {
                display_teams("away", &league, teams, &data.guest);
            }
            home?;
            away?;
            Ok(())
        }
        Command::Calc {
            league,
            home,
            away,
            league_weight,
            home_weight,
            away_weight,
            json,
        } => {
            let defaults = config.default_weights;
            let weights = WeightVector {
                league: league_weight.unwrap_or(defaults.league),
                home: home_weight.unwrap_or(defaults.home),
                away: away_weight.unwrap_or(defaults.away),
            };

            let report = resolve_matchup(&data, &league, &home, &away, &weights, config.zero_weight_policy)?;
            if json {
                display_report_json(&report)
            } else {
                display_report(&report);
                Ok(())
            }
        }
    }
}
