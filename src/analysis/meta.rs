use super::hero_stats::HeroStatsRow;
use clap::ValueEnum;
use std::cmp::Ordering;

pub const DEFAULT_MIN_GAMES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortColumn {
    Hero,
    Picks,
    Bans,
    Wins,
    WinRate,
    PickRate,
    BanRate,
    Presence,
}

impl SortColumn {
    /// Heroes sort alphabetically; every numeric column sorts highest first.
    /// Ties fall back to hero name so the order is stable. Rows without a win
    /// rate sort after every row that has one.
    pub fn compare(self, a: &HeroStatsRow, b: &HeroStatsRow) -> Ordering {
        let primary = match self {
            SortColumn::Hero => Ordering::Equal,
            SortColumn::Picks => b.picks.cmp(&a.picks),
            SortColumn::Bans => b.bans.cmp(&a.bans),
            SortColumn::Wins => b.wins.cmp(&a.wins),
            SortColumn::WinRate => match (a.win_rate, b.win_rate) {
                (Some(a), Some(b)) => b.total_cmp(&a),
                (a, b) => b.is_some().cmp(&a.is_some()),
            },
            SortColumn::PickRate => b.pick_rate.total_cmp(&a.pick_rate),
            SortColumn::BanRate => b.ban_rate.total_cmp(&a.ban_rate),
            SortColumn::Presence => b.presence.total_cmp(&a.presence),
        };
        primary.then_with(|| a.hero.cmp(&b.hero))
    }
}

pub fn sort_rows(rows: &mut [HeroStatsRow], column: SortColumn) {
    rows.sort_by(|a, b| column.compare(a, b));
}

fn top_by(rows: &[HeroStatsRow], column: SortColumn) -> Option<HeroStatsRow> {
    rows.iter().min_by(|a, b| column.compare(a, b)).cloned()
}

/// Headline numbers for a stats table.
#[derive(Debug, Clone, PartialEq)]
pub struct MetaSnapshot {
    pub most_picked: Option<HeroStatsRow>,
    pub most_banned: Option<HeroStatsRow>,
    /// Only picked heroes with at least `min_games` picks are eligible.
    pub highest_win_rate: Option<HeroStatsRow>,
    pub min_games: usize,
    pub top_presence: Vec<HeroStatsRow>,
}

impl MetaSnapshot {
    pub fn from_rows(rows: &[HeroStatsRow], min_games: usize, top_n: usize) -> Self {
        let eligible: Vec<HeroStatsRow> = rows
            .iter()
            .filter(|r| r.picks >= min_games && r.win_rate.is_some())
            .cloned()
            .collect();

        let mut top_presence = rows.to_vec();
        sort_rows(&mut top_presence, SortColumn::Presence);
        top_presence.truncate(top_n);

        MetaSnapshot {
            most_picked: top_by(rows, SortColumn::Picks),
            most_banned: top_by(rows, SortColumn::Bans),
            highest_win_rate: top_by(&eligible, SortColumn::WinRate),
            min_games,
            top_presence,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.most_picked.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(hero: &str, picks: usize, bans: usize, wins: usize, total_games: usize) -> HeroStatsRow {
        let slots = (2 * total_games) as f64;
        let pick_rate = picks as f64 / slots * 100.0;
        let ban_rate = bans as f64 / slots * 100.0;
        HeroStatsRow {
            hero: hero.to_string(),
            picks,
            bans,
            wins,
            win_rate: (picks > 0).then(|| wins as f64 / picks as f64 * 100.0),
            pick_rate,
            ban_rate,
            presence: pick_rate + ban_rate,
        }
    }

    fn table() -> Vec<HeroStatsRow> {
        vec![
            row("Ling", 30, 5, 18, 40),
            row("Fanny", 12, 25, 9, 40),
            row("Kaja", 4, 1, 4, 40),
            row("Joy", 30, 2, 12, 40),
        ]
    }

    #[test]
    fn headline_heroes() {
        let snapshot = MetaSnapshot::from_rows(&table(), DEFAULT_MIN_GAMES, 10);

        // Ling and Joy tie on picks; name breaks the tie
        assert_eq!(snapshot.most_picked.unwrap().hero, "Joy");
        assert_eq!(snapshot.most_banned.unwrap().hero, "Fanny");
        // Kaja is 100% but below the pick threshold
        assert_eq!(snapshot.highest_win_rate.unwrap().hero, "Fanny");
    }

    #[test]
    fn no_win_rate_leader_without_enough_games() {
        let snapshot = MetaSnapshot::from_rows(&table(), 50, 10);
        assert!(snapshot.highest_win_rate.is_none());
        assert!(snapshot.most_picked.is_some());
    }

    #[test]
    fn top_presence_is_sorted_and_truncated() {
        let snapshot = MetaSnapshot::from_rows(&table(), DEFAULT_MIN_GAMES, 2);
        let heroes: Vec<&str> = snapshot.top_presence.iter().map(|r| r.hero.as_str()).collect();
        assert_eq!(heroes, vec!["Fanny", "Ling"]);
    }

    #[test]
    fn banned_only_hero_in_headlines() {
        let mut rows = table();
        rows.push(row("Valentina", 0, 40, 0, 40));

        let snapshot = MetaSnapshot::from_rows(&rows, 0, 2);

        assert_eq!(snapshot.most_banned.unwrap().hero, "Valentina");
        assert_eq!(snapshot.top_presence[0].hero, "Valentina");
        // zero picks meets a zero threshold but has no win rate
        assert_eq!(snapshot.highest_win_rate.unwrap().hero, "Kaja");
    }

    #[test]
    fn rows_without_win_rate_sort_last() {
        let mut rows = table();
        rows.push(row("Valentina", 0, 40, 0, 40));
        rows.push(row("Arlott", 0, 1, 0, 40));

        sort_rows(&mut rows, SortColumn::WinRate);

        let heroes: Vec<&str> = rows.iter().map(|r| r.hero.as_str()).collect();
        assert_eq!(heroes, vec!["Kaja", "Fanny", "Ling", "Joy", "Arlott", "Valentina"]);
    }

    #[test]
    fn empty_table_gives_empty_snapshot() {
        let snapshot = MetaSnapshot::from_rows(&[], DEFAULT_MIN_GAMES, 10);
        assert!(snapshot.is_empty());
        assert!(snapshot.top_presence.is_empty());
    }

    #[test]
    fn sort_by_any_column() {
        let mut rows = table();

        sort_rows(&mut rows, SortColumn::Hero);
        let heroes: Vec<&str> = rows.iter().map(|r| r.hero.as_str()).collect();
        assert_eq!(heroes, vec!["Fanny", "Joy", "Kaja", "Ling"]);

        sort_rows(&mut rows, SortColumn::WinRate);
        assert_eq!(rows[0].hero, "Kaja");

        sort_rows(&mut rows, SortColumn::Bans);
        assert_eq!(rows[0].hero, "Fanny");
        assert_eq!(rows[3].hero, "Kaja");
    }
}
