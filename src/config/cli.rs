use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Path to scraper configuration file
    #[arg(long, default_value = "scraper_config.json")]
    pub config_file: PathBuf,

    /// Directory to store output data
    #[arg(long, default_value = "output")]
    pub data_dir: PathBuf,

    /// Save the accumulated records every N entities (0 disables periodic saves)
    #[arg(long, env = "SQUADSCRAPE_CHECKPOINT_EVERY")]
    pub checkpoint_every: Option<usize>,

    /// Pause between player page requests, in milliseconds
    #[arg(long, env = "SQUADSCRAPE_DELAY_MS")]
    pub delay_ms: Option<u64>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(
        long,
        default_value = "info",
        value_parser = ["error", "warn", "info", "debug", "trace"]
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List the teams of a league for one season
    Teams {
        #[command(flatten)]
        league: LeagueArgs,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Fetch injury histories for the players listed in a CSV file
    Injuries {
        /// CSV with `Player` and `Player ID` columns
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Fetch per-season appearance statistics for the players listed in a CSV file
    Seasons {
        /// CSV with `Player` and `Player ID` columns
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Scrape the squad of every team in a league
    Roster {
        #[command(flatten)]
        league: LeagueArgs,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Squads of a league followed by the injury history of every player
    LeagueInjuries {
        #[command(flatten)]
        league: LeagueArgs,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Squads of a league followed by the season statistics of every player
    LeaguePerformance {
        #[command(flatten)]
        league: LeagueArgs,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct LeagueArgs {
    /// League name or code, e.g. "Premier League" or GB1
    #[arg(long, default_value = "Premier League")]
    pub league: String,

    /// First calendar year of the season (2024 for 2024/25)
    #[arg(long, default_value_t = 2024)]
    pub season: u16,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Teams { .. } => "teams",
            Command::Injuries { .. } => "injuries",
            Command::Seasons { .. } => "seasons",
            Command::Roster { .. } => "roster",
            Command::LeagueInjuries { .. } => "league-injuries",
            Command::LeaguePerformance { .. } => "league-performance",
        }
    }
}
