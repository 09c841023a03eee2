mod analysis;
mod api;
mod cache;
mod catalog;
mod config;
mod display;
mod error;
mod loader;
mod snapshot;

use analysis::draft::{parse_matches, teams_in_pool};
use analysis::hero_stats::{compute_hero_stats, TeamFilter, ALL_TEAMS};
use analysis::meta::{sort_rows, MetaSnapshot, SortColumn, DEFAULT_MIN_GAMES};
use anyhow::Context;
use api::client::LiquipediaClient;
use api::models::MatchRecord;
use api::MatchSource;
use cache::FetchCache;
use catalog::Catalog;
use clap::{Parser, Subcommand};
use config::Config;
use display::output::{
    display_catalog, display_error, display_hero_stats, display_info, display_meta_snapshot,
    display_notice, display_success, display_teams, display_warning,
};
use error::AppError;
use indicatif::{ProgressBar, ProgressStyle};
use loader::{pool, DataSource, TournamentLoader};
use snapshot::SnapshotStore;

const PRESENCE_CHART_SIZE: usize = 10;

#[derive(Parser, Debug)]
#[command(name = "MLBB Meta")]
#[command(about = "Hero pick, ban and win statistics for MLBB pro tournaments", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct Selection {
    /// Tournament to include (repeatable), e.g. -t "MPL ID Season 14"
    #[arg(short, long = "tournament")]
    tournaments: Vec<String>,

    /// Include every configured tournament
    #[arg(long, conflicts_with = "tournaments")]
    all: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the configured tournaments
    List,

    /// Hero statistics for the selected tournaments
    Stats {
        #[command(flatten)]
        selection: Selection,

        /// Only count matches involving this team
        #[arg(long, default_value = ALL_TEAMS)]
        team: String,

        /// Column to sort the table by
        #[arg(short, long, value_enum, default_value_t = SortColumn::Presence)]
        sort: SortColumn,

        /// Only show the first N heroes
        #[arg(long)]
        top: Option<usize>,

        /// Minimum picks for the highest win rate headline
        #[arg(long, default_value_t = DEFAULT_MIN_GAMES)]
        min_games: usize,
    },

    /// Teams that appear in the selected tournaments
    Teams {
        #[command(flatten)]
        selection: Selection,
    },

    /// Re-download an archived tournament and replace its snapshot
    Refresh {
        /// Tournament display name
        tournament: String,
    },
}

fn main() {
    sensible_env_logger::init!();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    let catalog = match &config.tournaments_file {
        Some(path) => Catalog::from_json_file(path)
            .with_context(|| format!("Failed to load tournaments from {}", path.display()))?,
        None => Catalog::builtin(),
    };

    let client = LiquipediaClient::new(&config);
    let loader = TournamentLoader::new(
        catalog,
        FetchCache::new(client, config.cache_ttl),
        SnapshotStore::new(&config.data_dir),
    );

    match cli.command {
        Command::List => {
            display_catalog(loader.catalog().tournaments());
        }
        Command::Stats {
            selection,
            team,
            sort,
            top,
            min_games,
        } => {
            let names = resolve_selection(loader.catalog(), &selection)?;
            let pooled = load_pool(&loader, &names);
            let filter = TeamFilter::from(team.as_str());

            if let TeamFilter::Team(name) = &filter {
                if !teams_in_pool(&pooled).contains(name) {
                    display_warning(&format!("{} did not play in the selected tournaments", name));
                }
            }

            let mut rows = compute_hero_stats(&pooled, &filter);
            let snapshot = MetaSnapshot::from_rows(&rows, min_games, PRESENCE_CHART_SIZE);
            display_meta_snapshot(&snapshot, parse_matches(&pooled).len(), names.len());

            sort_rows(&mut rows, sort);
            if let Some(n) = top {
                rows.truncate(n);
            }
            display_hero_stats(&rows, &filter);
        }
        Command::Teams { selection } => {
            let names = resolve_selection(loader.catalog(), &selection)?;
            let pooled = load_pool(&loader, &names);
            display_teams(&teams_in_pool(&pooled));
        }
        Command::Refresh { tournament } => {
            display_info(&format!("Refreshing {} from the API...", tournament));
            let (path, count) = loader.refresh(&tournament)?;
            display_success(&format!("Saved {} matches to {}", count, path.display()));
        }
    }

    Ok(())
}

fn resolve_selection(catalog: &Catalog, selection: &Selection) -> Result<Vec<String>, AppError> {
    if selection.all {
        return Ok(catalog.names());
    }
    if selection.tournaments.is_empty() {
        return Err(AppError::NoTournamentsSelected);
    }
    for name in &selection.tournaments {
        if catalog.get(name).is_none() {
            return Err(AppError::UnknownTournament(name.clone()));
        }
    }
    Ok(selection.tournaments.clone())
}

/// Loads tournaments one after another and pools whatever came back.
fn load_pool<S: MatchSource>(loader: &TournamentLoader<S>, names: &[String]) -> Vec<MatchRecord> {
    let pb = ProgressBar::new(names.len() as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} {msg}") {
        pb.set_style(style);
    }

    let mut loads = Vec::with_capacity(names.len());
    for name in names {
        pb.set_message(name.clone());
        let loaded = loader.load(name);
        pb.suspend(|| loaded.notices.iter().for_each(display_notice));
        loads.push(loaded);
        pb.inc(1);
    }
    pb.finish_and_clear();

    let from_disk = loads.iter().filter(|l| l.source == DataSource::Snapshot).count();
    let failed: Vec<&str> = loads
        .iter()
        .filter(|l| l.has_errors())
        .map(|l| l.tournament.as_str())
        .collect();
    if !failed.is_empty() {
        display_warning(&format!("No data for: {}", failed.join(", ")));
    }

    let pooled = pool(loads);
    display_success(&format!(
        "Loaded {} matches from {} tournament(s), {} from local snapshots",
        pooled.len(),
        names.len(),
        from_disk
    ));
    pooled
}
