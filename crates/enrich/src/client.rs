//! Search client for OpenAI-compatible chat completion endpoints.
//!
//! Blocking reqwest client (no Tokio runtime required). One request per
//! company; 429 and 5xx responses are retried with exponential backoff.

use std::thread;
use std::time::Duration;

use serde::Deserialize;
use xref_index::CoverageRecord;
use xref_io::AccountSeed;

use crate::batch::CoverageSource;
use crate::error::FetchError;
use crate::reply::{build_prompt, parse_reply};

const USER_AGENT: &str = concat!("analyst-xref/", env!("CARGO_PKG_VERSION"));
const SYSTEM_PROMPT: &str = "Be precise and concise.";

/// Connection and model settings for [`SearchClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
    pub timeout: Duration,
    pub search_domain_filter: Vec<String>,
    /// Retries after the first attempt for 429/5xx/network failures
    pub max_retries: u32,
    /// Wait before the first retry; doubles each attempt
    pub retry_backoff: Duration,
}

impl ClientConfig {
    pub fn new(endpoint: &str, model: &str, api_key: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            timeout: Duration::from_secs(60),
            search_domain_filter: Vec::new(),
            max_retries: 2,
            retry_backoff: Duration::from_secs(1),
        }
    }
}

/// Coverage lookup against a chat completions API (blocking).
#[derive(Clone)]
pub struct SearchClient {
    http: reqwest::blocking::Client,
    config: ClientConfig,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}

impl SearchClient {
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn payload(&self, company: &str) -> serde_json::Value {
        let mut payload = serde_json::json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": build_prompt(company) },
            ],
            "return_images": false,
            "return_related_questions": false,
            "stream": false,
        });
        if !self.config.search_domain_filter.is_empty() {
            payload["search_domain_filter"] = serde_json::json!(self.config.search_domain_filter);
        }
        payload
    }

    /// Send the request for `company` and return the assistant's reply text.
    pub fn ask(&self, company: &str) -> Result<String, FetchError> {
        let payload = self.payload(company);
        let mut backoff = self.config.retry_backoff;

        for attempt in 0..=self.config.max_retries {
            let last = attempt == self.config.max_retries;

            let response = match self
                .http
                .post(&self.config.endpoint)
                .bearer_auth(&self.config.api_key)
                .json(&payload)
                .send()
            {
                Ok(resp) => resp,
                Err(e) if !last => {
                    log::warn!("{}: network error, retrying in {:?}: {}", company, backoff, e);
                    thread::sleep(backoff);
                    backoff *= 2;
                    continue;
                }
                Err(e) => return Err(FetchError::Network(e.to_string())),
            };

            let status = response.status().as_u16();
            if status == 429 || status >= 500 {
                if !last {
                    log::warn!(
                        "{}: retry {}/{} in {:?} (HTTP {})",
                        company,
                        attempt + 1,
                        self.config.max_retries,
                        backoff,
                        status
                    );
                    thread::sleep(backoff);
                    backoff *= 2;
                    continue;
                }
                let body = response.text().unwrap_or_default();
                return Err(FetchError::Http(status, body));
            }
            if !response.status().is_success() {
                let body = response.text().unwrap_or_default();
                return Err(FetchError::Http(status, body));
            }

            let parsed: CompletionResponse = response
                .json()
                .map_err(|e| FetchError::Parse(format!("completion response: {}", e)))?;

            return parsed
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.message)
                .and_then(|m| m.content)
                .filter(|c| !c.trim().is_empty())
                .ok_or(FetchError::MissingContent);
        }

        // Loop always returns on its final attempt
        Err(FetchError::MissingContent)
    }
}

impl CoverageSource for SearchClient {
    fn fetch(&self, seed: &AccountSeed) -> Result<Vec<CoverageRecord>, FetchError> {
        let content = self.ask(&seed.company)?;
        log::debug!("{}: {} byte reply", seed.company, content.len());
        parse_reply(seed, &content)
    }
}
