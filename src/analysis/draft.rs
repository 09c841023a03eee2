//! Tolerant reading of raw match records.
//!
//! Records come straight from the remote API with no schema guarantees.
//! Anything missing or malformed makes the match (or a single game) drop
//! out of the analysis instead of failing the batch.

use crate::api::models::MatchRecord;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Upper bound on per-side pick/ban slots read from `extradata`.
const MAX_DRAFT_SLOTS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    First,
    Second,
}

impl Side {
    pub fn index(self) -> usize {
        match self {
            Side::First => 0,
            Side::Second => 1,
        }
    }

    fn parse(value: &Value) -> Option<Self> {
        let n = match value {
            Value::String(s) => s.trim().parse::<u64>().ok()?,
            Value::Number(n) => n.as_u64()?,
            _ => return None,
        };
        match n {
            1 => Some(Side::First),
            2 => Some(Side::Second),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedGame {
    pub picks: [Vec<String>; 2],
    pub bans: [Vec<String>; 2],
    pub winner: Option<Side>,
}

impl ParsedGame {
    /// Counted only when it has a recorded winner and some draft data.
    pub fn is_completed(&self) -> bool {
        self.winner.is_some() && self.picks.iter().any(|p| !p.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedMatch {
    pub id: String,
    pub teams: [String; 2],
    pub games: Vec<ParsedGame>,
}

impl ParsedMatch {
    pub fn completed_games(&self) -> impl Iterator<Item = &ParsedGame> {
        self.games.iter().filter(|g| g.is_completed())
    }
}

/// `None` when the record doesn't identify two teams.
pub fn parse_match(record: &MatchRecord) -> Option<ParsedMatch> {
    let obj = record.as_object()?;

    let id = obj
        .get("match2id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let teams = [team_name(obj, 0)?, team_name(obj, 1)?];

    let games = obj
        .get("match2games")
        .and_then(Value::as_array)
        .map(|games| games.iter().filter_map(parse_game).collect())
        .unwrap_or_default();

    Some(ParsedMatch { id, teams, games })
}

/// Parses a pool, keeping the first copy of any match id seen twice (the
/// same tournament selected twice, or overlapping tournament paths).
pub fn parse_matches(records: &[MatchRecord]) -> Vec<ParsedMatch> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter_map(parse_match)
        .filter(|m| m.id.is_empty() || seen.insert(m.id.clone()))
        .collect()
}

fn team_name(obj: &Map<String, Value>, index: usize) -> Option<String> {
    let from_opponents = obj
        .get("match2opponents")
        .and_then(Value::as_array)
        .and_then(|opps| opps.get(index))
        .and_then(|opp| opp.get("name"))
        .and_then(non_empty_str);

    let legacy_key = if index == 0 { "opponent1" } else { "opponent2" };
    from_opponents
        .or_else(|| obj.get(legacy_key).and_then(non_empty_str))
        .map(str::to_string)
}

fn parse_game(game: &Value) -> Option<ParsedGame> {
    let obj = game.as_object()?;
    let winner = obj.get("winner").and_then(Side::parse);
    let extradata = obj.get("extradata").and_then(Value::as_object);

    let mut parsed = ParsedGame {
        winner,
        ..ParsedGame::default()
    };

    for side in [Side::First, Side::Second] {
        let team = side.index() + 1;
        let i = side.index();

        if let Some(extra) = extradata {
            parsed.picks[i] = slot_values(extra, &format!("team{}hero", team));
            if parsed.picks[i].is_empty() {
                parsed.picks[i] = slot_values(extra, &format!("team{}champion", team));
            }
            parsed.bans[i] = slot_values(extra, &format!("team{}ban", team));
        }

        if parsed.picks[i].is_empty() {
            parsed.picks[i] = player_heroes(obj, i);
        }
    }

    Some(parsed)
}

/// Collects `{prefix}1`, `{prefix}2`, ... skipping blanks.
fn slot_values(extra: &Map<String, Value>, prefix: &str) -> Vec<String> {
    (1..=MAX_DRAFT_SLOTS)
        .filter_map(|slot| extra.get(&format!("{}{}", prefix, slot)))
        .filter_map(non_empty_str)
        .map(str::to_string)
        .collect()
}

fn player_heroes(game: &Map<String, Value>, side: usize) -> Vec<String> {
    game.get("opponents")
        .and_then(Value::as_array)
        .and_then(|opps| opps.get(side))
        .and_then(|opp| opp.get("players"))
        .and_then(Value::as_array)
        .map(|players| {
            players
                .iter()
                .filter_map(|p| p.get("champion").or_else(|| p.get("hero")))
                .filter_map(non_empty_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().map(str::trim).filter(|s| !s.is_empty())
}

/// Distinct team names appearing in a pool, sorted.
pub fn teams_in_pool(records: &[MatchRecord]) -> Vec<String> {
    let mut teams: Vec<String> = parse_matches(records)
        .into_iter()
        .flat_map(|m| m.teams)
        .collect();
    teams.sort();
    teams.dedup();
    teams
}
