use crate::analysis::hero_stats::{HeroStatsRow, TeamFilter};
use crate::analysis::meta::MetaSnapshot;
use crate::catalog::TournamentDescriptor;
use crate::loader::{Notice, NoticeLevel};
use colored::*;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct TournamentRow {
    name: String,
    region: String,
    year: u16,
    status: String,
}

#[derive(Tabled)]
struct HeroRow {
    #[tabled(rename = "#")]
    rank: String,
    hero: String,
    picks: usize,
    bans: usize,
    wins: usize,
    #[tabled(rename = "win rate")]
    win_rate: String,
    #[tabled(rename = "pick rate")]
    pick_rate: String,
    #[tabled(rename = "ban rate")]
    ban_rate: String,
    presence: String,
}

#[derive(Tabled)]
struct PresenceRow {
    hero: String,
    #[tabled(rename = "pick %")]
    pick_rate: String,
    #[tabled(rename = "ban %")]
    ban_rate: String,
    #[tabled(rename = "presence")]
    bar: String,
}

fn win_rate_cell(win_rate: Option<f64>) -> String {
    win_rate.map_or_else(|| "-".to_string(), percent)
}

fn percent(value: f64) -> String {
    format!("{:.1}%", value)
}

pub fn display_catalog(tournaments: &[TournamentDescriptor]) {
    println!("\n{}", "🏆 Tournaments".bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());

    let rows: Vec<TournamentRow> = tournaments
        .iter()
        .map(|t| TournamentRow {
            name: t.name.clone(),
            region: t.region.clone(),
            year: t.year,
            status: if t.live {
                "LIVE".green().to_string()
            } else {
                "archived".dimmed().to_string()
            },
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

pub fn display_meta_snapshot(snapshot: &MetaSnapshot, matches: usize, tournaments: usize) {
    println!(
        "\n{}",
        format!(
            "📊 Meta Snapshot: {} matches from {} tournament(s)",
            matches, tournaments
        )
        .bold()
        .cyan()
    );
    println!("{}\n", "=".repeat(60).cyan());

    if snapshot.is_empty() {
        println!(
            "{}",
            "Not enough completed match data to generate a meta snapshot.".yellow()
        );
        return;
    }

    if let Some(hero) = &snapshot.most_picked {
        println!("{} {} ({} games)", "Most Picked Hero:".bold(), hero.hero.green(), hero.picks);
    }
    if let Some(hero) = &snapshot.most_banned {
        println!("{} {} ({} times)", "Most Banned Hero:".bold(), hero.hero.red(), hero.bans);
    }
    match &snapshot.highest_win_rate {
        Some(hero) => println!(
            "{} {} ({})",
            format!("Highest Win Rate (>={} games):", snapshot.min_games).bold(),
            hero.hero.yellow(),
            win_rate_cell(hero.win_rate)
        ),
        None => println!(
            "{}",
            format!("No hero has {} or more picks yet", snapshot.min_games).dimmed()
        ),
    }

    if snapshot.top_presence.is_empty() {
        return;
    }

    println!(
        "\n{}",
        format!("Top {} Most Present Heroes (Pick % + Ban %)", snapshot.top_presence.len()).bold()
    );
    let rows: Vec<PresenceRow> = snapshot
        .top_presence
        .iter()
        .map(|r| PresenceRow {
            hero: r.hero.clone(),
            pick_rate: percent(r.pick_rate),
            ban_rate: percent(r.ban_rate),
            bar: format!(
                "{}{} {}",
                "█".repeat((r.pick_rate / 5.0).round() as usize).green(),
                "█".repeat((r.ban_rate / 5.0).round() as usize).red(),
                percent(r.presence)
            ),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

pub fn display_hero_stats(rows: &[HeroStatsRow], filter: &TeamFilter) {
    println!("\n{}", format!("🦸 Hero Statistics ({})", filter).bold().cyan());
    println!("{}\n", "=".repeat(80).cyan());

    if rows.is_empty() {
        println!("{}", "No completed games match this selection".yellow());
        return;
    }

    let table_rows: Vec<HeroRow> = rows
        .iter()
        .enumerate()
        .map(|(idx, r)| HeroRow {
            rank: format!("{}", idx + 1),
            hero: r.hero.clone(),
            picks: r.picks,
            bans: r.bans,
            wins: r.wins,
            win_rate: win_rate_cell(r.win_rate),
            pick_rate: percent(r.pick_rate),
            ban_rate: percent(r.ban_rate),
            presence: percent(r.presence),
        })
        .collect();

    let mut table = Table::new(table_rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

pub fn display_teams(teams: &[String]) {
    println!("\n{}", format!("👥 Teams ({})", teams.len()).bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());

    if teams.is_empty() {
        println!("{}", "No teams found in the loaded matches".yellow());
        return;
    }
    for team in teams {
        println!("  • {}", team);
    }
    println!();
}

pub fn display_notice(notice: &Notice) {
    match notice.level {
        NoticeLevel::Info => display_info(&notice.message),
        NoticeLevel::Success => display_success(&notice.message),
        NoticeLevel::Warning => display_warning(&notice.message),
        NoticeLevel::Error => display_error(&notice.message),
    }
}

pub fn display_error(error: &str) {
    eprintln!("{} {}", "❌ Error:".red().bold(), error);
}

pub fn display_warning(message: &str) {
    eprintln!("{} {}", "⚠️".yellow(), message);
}

pub fn display_info(message: &str) {
    println!("{} {}", "ℹ️".cyan(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}
