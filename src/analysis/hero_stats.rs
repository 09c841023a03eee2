use super::draft::{parse_matches, Side};
use crate::api::models::MatchRecord;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

pub const ALL_TEAMS: &str = "All Teams";

/// Which matches feed the aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamFilter {
    All,
    Team(String),
}

impl TeamFilter {
    pub fn accepts(&self, teams: &[String; 2]) -> bool {
        match self {
            TeamFilter::All => true,
            TeamFilter::Team(name) => teams.iter().any(|t| t == name),
        }
    }
}

impl From<&str> for TeamFilter {
    fn from(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s == ALL_TEAMS {
            TeamFilter::All
        } else {
            TeamFilter::Team(s.to_string())
        }
    }
}

impl FromStr for TeamFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(TeamFilter::from(s))
    }
}

impl fmt::Display for TeamFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamFilter::All => f.write_str(ALL_TEAMS),
            TeamFilter::Team(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeroStatsRow {
    pub hero: String,
    pub picks: usize,
    pub bans: usize,
    pub wins: usize,
    /// `None` for heroes that were only ever banned.
    pub win_rate: Option<f64>,
    pub pick_rate: f64,
    pub ban_rate: f64,
    pub presence: f64,
}

#[derive(Debug, Clone, Default)]
struct HeroCounts {
    picks: usize,
    bans: usize,
    wins: usize,
}

pub struct HeroStatsTracker {
    counts: HashMap<String, HeroCounts>,
    total_games: usize,
}

impl HeroStatsTracker {
    pub fn new() -> Self {
        HeroStatsTracker {
            counts: HashMap::new(),
            total_games: 0,
        }
    }

    pub fn add_game(&mut self, picks: &[Vec<String>; 2], bans: &[Vec<String>; 2], winner: Side) {
        self.total_games += 1;

        for (side, heroes) in picks.iter().enumerate() {
            let won = side == winner.index();
            for hero in heroes {
                let entry = self.counts.entry(hero.clone()).or_default();
                entry.picks += 1;
                if won {
                    entry.wins += 1;
                }
            }
        }

        for hero in bans.iter().flatten() {
            self.counts.entry(hero.clone()).or_default().bans += 1;
        }
    }

    /// Rates are relative to hero slots on both sides, i.e. 2x games played.
    pub fn rows(&self) -> Vec<HeroStatsRow> {
        if self.total_games == 0 {
            return Vec::new();
        }
        let slots = (2 * self.total_games) as f64;

        self.counts
            .iter()
            .map(|(hero, c)| {
                let pick_rate = c.picks as f64 / slots * 100.0;
                let ban_rate = c.bans as f64 / slots * 100.0;
                HeroStatsRow {
                    hero: hero.clone(),
                    picks: c.picks,
                    bans: c.bans,
                    wins: c.wins,
                    win_rate: (c.picks > 0).then(|| c.wins as f64 / c.picks as f64 * 100.0),
                    pick_rate,
                    ban_rate,
                    presence: pick_rate + ban_rate,
                }
            })
            .collect()
    }
}

/// Per-hero pick/ban/win table over every completed game in matches the
/// filter accepts. Heroes that were only ever banned get a row with no win
/// rate.
pub fn compute_hero_stats(matches: &[MatchRecord], filter: &TeamFilter) -> Vec<HeroStatsRow> {
    let mut tracker = HeroStatsTracker::new();

    for parsed in parse_matches(matches) {
        if !filter.accepts(&parsed.teams) {
            continue;
        }
        for game in parsed.completed_games() {
            if let Some(winner) = game.winner {
                tracker.add_game(&game.picks, &game.bans, winner);
            }
        }
    }

    tracker.rows()
}
