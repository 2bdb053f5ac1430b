//! Shared blocking HTTP plumbing: one client shape, one retry policy.
//!
//! Every upstream GET goes through [`get_json`]. Timeouts, connection
//! failures, and HTTP 429 are retried with waits of 1s, 2s, 4s between
//! the four attempts; any other failure returns immediately.

use std::time::Duration;

use serde::de::DeserializeOwned;

use super::provider::MarketDataError;

const MAX_ATTEMPTS: u32 = 4;
const BASE_DELAY: Duration = Duration::from_secs(1);
const MAX_DELAY: Duration = Duration::from_secs(8);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub(crate) fn build_client() -> reqwest::blocking::Client {
    reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("momentum-rotator/", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("failed to build HTTP client")
}

pub(crate) fn get_json<T: DeserializeOwned>(
    client: &reqwest::blocking::Client,
    url: &str,
    query: &[(&str, &str)],
) -> Result<T, MarketDataError> {
    let mut last_error = None;

    for attempt in 0..MAX_ATTEMPTS {
        if attempt > 0 {
            let delay = BASE_DELAY * 2u32.pow(attempt - 1);
            std::thread::sleep(delay.min(MAX_DELAY));
        }

        match client.get(url).query(query).send() {
            Ok(resp) => {
                let status = resp.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    last_error = Some(MarketDataError::RateLimited);
                    continue;
                }

                if !status.is_success() {
                    return Err(MarketDataError::Status {
                        status: status.as_u16(),
                        endpoint: url.to_string(),
                    });
                }

                return resp
                    .json::<T>()
                    .map_err(|e| MarketDataError::Decode(format!("{url}: {e}")));
            }
            Err(e) if e.is_connect() || e.is_timeout() => {
                last_error = Some(MarketDataError::Network(e.to_string()));
            }
            Err(e) => return Err(MarketDataError::Network(e.to_string())),
        }
    }

    Err(last_error.unwrap_or_else(|| MarketDataError::Network("retries exhausted".to_string())))
}
