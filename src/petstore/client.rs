//! Upstream HTTP client
//!
//! Issues `GET <base>pet/findByStatus?status=<status>` with
//! `Accept: application/json` and an optional bearer token.

use reqwest::header::ACCEPT;
use reqwest::redirect::{Attempt, Policy};
use reqwest::{Client, Url};
use std::time::Duration;

use super::{parse_pets, PetRecord, PetStatus, PetstoreError};
use crate::config::{Config, ConfigError};

const MAX_REDIRECTS: usize = 10;

/// Client for the pet-store API, shared read-only across requests
pub struct PetstoreClient {
    client: Client,
    base_url: Url,
    access_token: Option<String>,
}

impl PetstoreClient {
    /// Build a client for `base_url` (must end in `/`)
    ///
    /// A secure base URL pins the client to https, so neither the first
    /// request nor any redirect can fall back to plain http.
    pub fn new(
        base_url: Url,
        access_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .https_only(base_url.scheme() == "https")
            .redirect(Policy::custom(check_redirect))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url,
            access_token,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let base_url = config.petstore_base_url()?;
        Self::new(
            base_url,
            config.petstore.access_token.clone(),
            Duration::from_secs(config.petstore.timeout),
        )
        .map_err(ConfigError::Client)
    }

    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Upstream query URL for a status filter
    pub fn find_by_status_url(&self, status: PetStatus) -> String {
        format!("{}pet/findByStatus?status={}", self.base_url, status.as_str())
    }

    /// Fetch the pets with the given status, in upstream order
    pub async fn find_by_status(&self, status: PetStatus) -> Result<Vec<PetRecord>, PetstoreError> {
        self.fetch(self.find_by_status_url(status)).await
    }

    async fn fetch(&self, url: String) -> Result<Vec<PetRecord>, PetstoreError> {
        let mut request = self.client.get(&url).header(ACCEPT, "application/json");
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(PetstoreError::Request)?;
        let code = response.status();
        if !code.is_success() {
            return Err(PetstoreError::Status {
                url,
                status: code.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(PetstoreError::Request)?;
        parse_pets(&body)
    }
}

fn check_redirect(attempt: Attempt) -> reqwest::redirect::Action {
    if attempt.previous().len() >= MAX_REDIRECTS {
        attempt.error("too many redirects")
    } else if is_downgrade(attempt.previous(), attempt.url()) {
        attempt.error("refusing redirect from https to http")
    } else {
        attempt.follow()
    }
}

/// True when a chain that started on https would continue over http
fn is_downgrade(previous: &[Url], next: &Url) -> bool {
    previous.iter().any(|u| u.scheme() == "https") && next.scheme() != "https"
}
