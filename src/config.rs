use crate::error::AppError;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.liquipedia.net/api/v3/match";
pub const DEFAULT_WIKI: &str = "mobilelegends";
pub const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 20;
const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_url: String,
    pub wiki: String,
    pub data_dir: PathBuf,
    pub http_timeout: Duration,
    pub cache_ttl: Duration,
    pub tournaments_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests don't have to touch
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("LIQUIPEDIA_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                AppError::ConfigError("LIQUIPEDIA_API_KEY not found in .env file".to_string())
            })?;

        let api_url = lookup("LIQUIPEDIA_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let wiki = lookup("LIQUIPEDIA_WIKI").unwrap_or_else(|| DEFAULT_WIKI.to_string());
        let data_dir = lookup("MLBB_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let http_timeout = Duration::from_secs(parse_secs(
            &lookup,
            "MLBB_HTTP_TIMEOUT_SECS",
            DEFAULT_HTTP_TIMEOUT_SECS,
        )?);
        let cache_ttl = Duration::from_secs(parse_secs(
            &lookup,
            "MLBB_CACHE_TTL_SECS",
            DEFAULT_CACHE_TTL_SECS,
        )?);

        let tournaments_file = lookup("MLBB_TOURNAMENTS_FILE").map(PathBuf::from);

        Ok(Config {
            api_key,
            api_url,
            wiki,
            data_dir,
            http_timeout,
            cache_ttl,
            tournaments_file,
        })
    }
}

fn parse_secs<F>(lookup: &F, key: &str, default: u64) -> Result<u64, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| {
            AppError::ConfigError(format!("{} must be a whole number of seconds, got {:?}", key, raw))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let config = Config::from_lookup(lookup_from(&[("LIQUIPEDIA_API_KEY", "secret")])).unwrap();

        assert_eq!(config.api_key, "secret");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.wiki, "mobilelegends");
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.http_timeout, Duration::from_secs(20));
        assert_eq!(config.cache_ttl, Duration::from_secs(3600));
        assert!(config.tournaments_file.is_none());
    }

    #[test]
    fn missing_api_key_is_a_config_error() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));

        let err = Config::from_lookup(lookup_from(&[("LIQUIPEDIA_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[test]
    fn overrides_are_read() {
        let config = Config::from_lookup(lookup_from(&[
            ("LIQUIPEDIA_API_KEY", "secret"),
            ("LIQUIPEDIA_WIKI", "dota2"),
            ("MLBB_DATA_DIR", "/tmp/snapshots"),
            ("MLBB_HTTP_TIMEOUT_SECS", "5"),
            ("MLBB_CACHE_TTL_SECS", "60"),
            ("MLBB_TOURNAMENTS_FILE", "tournaments.json"),
        ]))
        .unwrap();

        assert_eq!(config.wiki, "dota2");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/snapshots"));
        assert_eq!(config.http_timeout, Duration::from_secs(5));
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.tournaments_file, Some(PathBuf::from("tournaments.json")));
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("LIQUIPEDIA_API_KEY", "secret"),
            ("MLBB_HTTP_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }
}
