//! Telegram delivery.
//!
//! Best effort by design: failures are logged to stderr and counted,
//! never propagated. A run that screened and persisted correctly has
//! done its job even if a chat was unreachable.

use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const API_BASE: &str = "https://api.telegram.org";
const SEND_ATTEMPTS: u32 = 3;
/// Pause between recipients, to stay under the bot API's send rate.
const THROTTLE: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("network error: {0}")]
    Network(String),

    #[error("rate limited")]
    RateLimited,

    #[error("HTTP {0}")]
    Status(u16),

    #[error("malformed API response: {0}")]
    Decode(String),

    #[error("API rejected message: {0}")]
    Rejected(String),
}

/// Outcome of one broadcast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifySummary {
    pub sent: usize,
    pub failed: usize,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

pub struct TelegramNotifier {
    client: reqwest::blocking::Client,
    token: String,
}

impl TelegramNotifier {
    pub fn new(token: &str) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            token: token.to_string(),
        }
    }

    /// Send `text` to every chat id in turn, pausing between recipients.
    pub fn send_to_all(&self, chat_ids: &[String], text: &str) -> NotifySummary {
        let mut summary = NotifySummary::default();

        for (i, chat_id) in chat_ids.iter().enumerate() {
            if i > 0 {
                thread::sleep(THROTTLE);
            }
            match self.send_one(chat_id, text) {
                Ok(()) => summary.sent += 1,
                Err(err) => {
                    eprintln!("telegram send to chat {chat_id} failed: {err}");
                    summary.failed += 1;
                }
            }
        }

        summary
    }

    /// One message to one chat, with short retries on transient trouble.
    fn send_one(&self, chat_id: &str, text: &str) -> Result<(), NotifyError> {
        let url = format!("{API_BASE}/bot{}/sendMessage", self.token);
        let params = [
            ("chat_id", chat_id),
            ("text", text),
            ("disable_web_page_preview", "true"),
        ];

        let mut last_error = None;
        for attempt in 0..SEND_ATTEMPTS {
            if attempt > 0 {
                thread::sleep(Duration::from_secs(1u64 << (attempt - 1)));
            }

            match self.client.post(&url).form(&params).send() {
                Ok(resp) => {
                    let status = resp.status();

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(NotifyError::RateLimited);
                        continue;
                    }
                    if !status.is_success() {
                        return Err(NotifyError::Status(status.as_u16()));
                    }

                    let payload: ApiResponse = resp
                        .json()
                        .map_err(|e| NotifyError::Decode(e.to_string()))?;
                    if payload.ok {
                        return Ok(());
                    }
                    return Err(NotifyError::Rejected(
                        payload
                            .description
                            .unwrap_or_else(|| "no description".to_string()),
                    ));
                }
                Err(e) if e.is_connect() || e.is_timeout() => {
                    last_error = Some(NotifyError::Network(e.to_string()));
                }
                Err(e) => return Err(NotifyError::Network(e.to_string())),
            }
        }

        Err(last_error.unwrap_or(NotifyError::RateLimited))
    }
}
