use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One match exactly as the remote API returned it. The shape is owned by
/// the source, so it is kept untyped and only interpreted by
/// `analysis::draft`.
pub type MatchRecord = Value;

// Match v3 response
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct MatchListResponse {
    #[serde(default)]
    pub result: Vec<MatchRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_result_is_empty() {
        let resp: MatchListResponse = serde_json::from_value(json!({"error": []})).unwrap();
        assert!(resp.result.is_empty());
    }

    #[test]
    fn records_are_kept_verbatim() {
        let record = json!({"match2id": "abc", "extra": {"nested": [1, 2, 3]}});
        let resp: MatchListResponse =
            serde_json::from_value(json!({"result": [record.clone()]})).unwrap();
        assert_eq!(resp.result, vec![record]);
    }
}
