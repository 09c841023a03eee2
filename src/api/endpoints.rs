use crate::error::FetchError;

/// The remote API returns at most this many records per query. Pagination
/// is not implemented, so larger tournaments come back truncated.
pub const PAGE_LIMIT: usize = 500;

/// `conditions` filter scoping results to pages under `tournament_path`.
pub fn parent_condition(tournament_path: &str) -> String {
    format!("[[parent::{}]]", tournament_path)
}

/// Query parameters for one tournament's match listing.
pub fn match_query(wiki: &str, tournament_path: &str) -> Result<Vec<(&'static str, String)>, FetchError> {
    let tournament_path = tournament_path.trim();
    if tournament_path.is_empty() {
        return Err(FetchError::InvalidPath);
    }

    Ok(vec![
        ("wiki", wiki.to_string()),
        ("limit", PAGE_LIMIT.to_string()),
        ("conditions", parent_condition(tournament_path)),
    ])
}

/// A full page means the tournament may have more matches than we received.
pub fn may_be_truncated(record_count: usize) -> bool {
    record_count >= PAGE_LIMIT
}
