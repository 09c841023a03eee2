use crate::config::Config;
use crate::error::FetchError;
use governor::{clock::DefaultClock, state::{InMemoryState, NotKeyed}, Quota, RateLimiter};
use log::{debug, info, warn};
use std::num::NonZeroU32;
use std::thread;
use std::time::Duration;

use super::endpoints;
use super::models::{MatchListResponse, MatchRecord};
use super::MatchSource;

const USER_AGENT: &str = concat!("mlbb_meta/", env!("CARGO_PKG_VERSION"));
const MAX_RETRIES: u32 = 3;

pub struct LiquipediaClient {
    agent: ureq::Agent,
    api_url: String,
    api_key: String,
    wiki: String,
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl LiquipediaClient {
    pub fn new(config: &Config) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.http_timeout)
            .user_agent(USER_AGENT)
            .build();

        // The match endpoint tolerates roughly one query per second per key
        let rate_limiter = RateLimiter::direct(Quota::per_second(NonZeroU32::MIN));

        LiquipediaClient {
            agent,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            wiki: config.wiki.clone(),
            rate_limiter,
        }
    }

    fn wait_for_permit(&self) {
        while self.rate_limiter.check().is_err() {
            thread::sleep(Duration::from_millis(100));
        }
    }

    fn execute_request(&self, query: &[(&str, String)]) -> Result<MatchListResponse, FetchError> {
        let mut retry_count = 0;

        loop {
            self.wait_for_permit();

            let mut request = self
                .agent
                .get(&self.api_url)
                .set("Authorization", &format!("Apikey {}", self.api_key));
            for (key, value) in query {
                request = request.query(key, value);
            }

            match request.call() {
                Ok(resp) => {
                    return resp
                        .into_json::<MatchListResponse>()
                        .map_err(|e| FetchError::Json(e.to_string()));
                }
                Err(ureq::Error::Status(429, _)) if retry_count < MAX_RETRIES => {
                    let wait_ms = 2000 * (retry_count + 1) as u64;
                    warn!("Rate limited by API, waiting {}ms before retry", wait_ms);
                    thread::sleep(Duration::from_millis(wait_ms));
                    retry_count += 1;
                }
                Err(ureq::Error::Status(code, resp)) => {
                    let message = resp
                        .into_string()
                        .unwrap_or_else(|_| "<unreadable body>".to_string());
                    return Err(FetchError::Status { code, message });
                }
                Err(e) => return Err(FetchError::Http(e.to_string())),
            }
        }
    }
}

impl MatchSource for LiquipediaClient {
    fn fetch(&self, tournament_path: &str) -> Result<Vec<MatchRecord>, FetchError> {
        let query = endpoints::match_query(&self.wiki, tournament_path)?;
        debug!("GET {} {:?}", self.api_url, query);

        let response = self.execute_request(&query)?;
        info!("Fetched {} matches for {}", response.result.len(), tournament_path);
        Ok(response.result)
    }
}
