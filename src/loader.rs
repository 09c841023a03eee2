use crate::api::endpoints;
use crate::api::models::MatchRecord;
use crate::api::MatchSource;
use crate::cache::FetchCache;
use crate::catalog::{Catalog, Mutability, TournamentDescriptor};
use crate::error::{AppError, SnapshotError};
use crate::snapshot::SnapshotStore;
use log::{error, warn};
use std::path::PathBuf;

/// What the snapshot store said about a tournament.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotState {
    Present,
    Absent,
    Unreadable,
}

impl SnapshotState {
    fn of(lookup: &Result<Option<Vec<MatchRecord>>, SnapshotError>) -> Self {
        match lookup {
            Ok(Some(_)) => SnapshotState::Present,
            Ok(None) => SnapshotState::Absent,
            Err(_) => SnapshotState::Unreadable,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadAction {
    UseSnapshot,
    FetchAndPersist,
    FetchOnly,
    GiveUp,
}

/// Cache-or-fetch policy. Live tournaments never consult the store, so
/// their snapshot state is `None`.
pub fn decide(mutability: Mutability, snapshot: Option<SnapshotState>) -> LoadAction {
    match (mutability, snapshot) {
        (Mutability::Live, _) => LoadAction::FetchOnly,
        (Mutability::Archived, Some(SnapshotState::Present)) => LoadAction::UseSnapshot,
        (Mutability::Archived, Some(SnapshotState::Absent) | None) => LoadAction::FetchAndPersist,
        (Mutability::Archived, Some(SnapshotState::Unreadable)) => LoadAction::GiveUp,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A message meant for the person running the tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn new(level: NoticeLevel, message: String) -> Self {
        Notice { level, message }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Snapshot,
    Remote,
    Unavailable,
}

#[derive(Debug, Clone)]
pub struct Loaded {
    pub tournament: String,
    pub records: Vec<MatchRecord>,
    pub source: DataSource,
    pub notices: Vec<Notice>,
}

impl Loaded {
    fn new(tournament: &str) -> Self {
        Loaded {
            tournament: tournament.to_string(),
            records: Vec::new(),
            source: DataSource::Unavailable,
            notices: Vec::new(),
        }
    }

    fn notify(&mut self, level: NoticeLevel, message: String) {
        self.notices.push(Notice::new(level, message));
    }

    pub fn has_errors(&self) -> bool {
        self.notices.iter().any(|n| n.level == NoticeLevel::Error)
    }
}

pub struct TournamentLoader<S> {
    catalog: Catalog,
    source: FetchCache<S>,
    store: SnapshotStore,
}

impl<S: MatchSource> TournamentLoader<S> {
    pub fn new(catalog: Catalog, source: FetchCache<S>, store: SnapshotStore) -> Self {
        TournamentLoader { catalog, source, store }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Never fails: every error path ends in an empty record list plus an
    /// error notice.
    pub fn load(&self, tournament_name: &str) -> Loaded {
        let mut loaded = Loaded::new(tournament_name);

        let Some(descriptor) = self.catalog.get(tournament_name) else {
            error!("Unknown tournament {}", tournament_name);
            loaded.notify(NoticeLevel::Error, format!("Unknown tournament: {}", tournament_name));
            return loaded;
        };

        let lookup = match descriptor.mutability() {
            Mutability::Archived => Some(self.store.read(tournament_name)),
            Mutability::Live => None,
        };
        let action = decide(descriptor.mutability(), lookup.as_ref().map(SnapshotState::of));

        match (action, lookup) {
            (LoadAction::UseSnapshot, Some(Ok(Some(records)))) => {
                loaded.notify(
                    NoticeLevel::Info,
                    format!("Loaded {} matches for {} from file.", records.len(), tournament_name),
                );
                loaded.records = records;
                loaded.source = DataSource::Snapshot;
            }
            (LoadAction::GiveUp, Some(Err(e))) => {
                error!("{}", e);
                loaded.notify(
                    NoticeLevel::Error,
                    format!("Error reading local file for {}: {}", tournament_name, e),
                );
            }
            (LoadAction::FetchAndPersist, _) => {
                loaded.notify(
                    NoticeLevel::Info,
                    format!("Local file for {} not found. Fetching from API...", tournament_name),
                );
                if self.fetch_into(descriptor, &mut loaded) {
                    self.persist(&mut loaded);
                }
            }
            (LoadAction::FetchOnly, _) => {
                if self.fetch_into(descriptor, &mut loaded) {
                    loaded.notify(
                        NoticeLevel::Info,
                        format!(
                            "Fetched {} live matches for {} from API.",
                            loaded.records.len(),
                            tournament_name
                        ),
                    );
                }
            }
            // decide() only yields UseSnapshot/GiveUp for the matching lookup
            (LoadAction::UseSnapshot | LoadAction::GiveUp, _) => {
                loaded.notify(
                    NoticeLevel::Error,
                    format!("Inconsistent snapshot state for {}", tournament_name),
                );
            }
        }

        loaded
    }

    fn fetch_into(&self, descriptor: &TournamentDescriptor, loaded: &mut Loaded) -> bool {
        match self.source.fetch(&descriptor.path) {
            Ok(records) => {
                if endpoints::may_be_truncated(records.len()) {
                    warn!("{} returned a full page of {} matches", descriptor.name, records.len());
                    loaded.notify(
                        NoticeLevel::Warning,
                        format!(
                            "{} returned {} matches, the API page limit. Some matches may be missing.",
                            descriptor.name,
                            records.len()
                        ),
                    );
                }
                loaded.records = records;
                loaded.source = DataSource::Remote;
                true
            }
            Err(e) => {
                error!("API error fetching {}: {}", descriptor.path, e);
                let what = match descriptor.mutability() {
                    Mutability::Live => "live data for ",
                    Mutability::Archived => "",
                };
                loaded.notify(
                    NoticeLevel::Error,
                    format!("Failed to fetch {}{}: {}", what, descriptor.name, e),
                );
                false
            }
        }
    }

    fn persist(&self, loaded: &mut Loaded) {
        match self.store.write(&loaded.tournament, &loaded.records) {
            Ok(_) => {
                let message = format!("Saved API data for {} locally.", loaded.tournament);
                loaded.notify(NoticeLevel::Success, message);
            }
            Err(e) => {
                warn!("{}", e);
                let message = format!("Could not save data for {}: {}", loaded.tournament, e);
                loaded.notify(NoticeLevel::Warning, message);
            }
        }
    }

    /// Re-fetches an archived tournament, skipping the time-bounded cache,
    /// and replaces its snapshot.
    pub fn refresh(&self, tournament_name: &str) -> Result<(PathBuf, usize), AppError> {
        let descriptor = self
            .catalog
            .get(tournament_name)
            .ok_or_else(|| AppError::UnknownTournament(tournament_name.to_string()))?;

        if descriptor.mutability() == Mutability::Live {
            return Err(AppError::NotArchived(tournament_name.to_string()));
        }

        let records = self.source.inner().fetch(&descriptor.path)?;
        let path = self.store.replace(tournament_name, &records)?;
        Ok((path, records.len()))
    }
}

/// Union of all selected tournaments' records.
pub fn pool<I>(loads: I) -> Vec<MatchRecord>
where
    I: IntoIterator<Item = Loaded>,
{
    loads.into_iter().flat_map(|l| l.records).collect()
}
