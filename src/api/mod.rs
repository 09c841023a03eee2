pub mod client;
pub mod endpoints;
pub mod models;

use crate::error::FetchError;
use models::MatchRecord;

/// Anything that can produce the match records for a tournament path.
pub trait MatchSource {
    fn fetch(&self, tournament_path: &str) -> Result<Vec<MatchRecord>, FetchError>;
}
