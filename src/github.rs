//! GitHub REST client for the authenticated user's repositories.
//!
//! [`RepoClient`] is the seam the engine talks to; [`GitHubClient`] is the
//! real implementation over `reqwest`. Tests substitute a scripted client.

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use std::sync::OnceLock;

use crate::config::{Config, Credential};
use crate::error::{RepotidyError, Result};

const API_VERSION: &str = "2022-11-28";

/// Repository as returned by `GET /user/repos`, before normalization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub owner: Option<RawOwner>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOwner {
    pub login: String,
}

/// The account the credential belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Identity {
    pub login: String,
}

impl Identity {
    pub fn owns(&self, owner: &str) -> bool {
        self.login.eq_ignore_ascii_case(owner)
    }
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    message: String,
}

/// Remote operations the batch engine needs.
#[allow(async_fn_in_trait)]
pub trait RepoClient {
    /// Validate the credential and bind the identity used for mutations.
    async fn authenticate(&self) -> Result<Identity>;

    /// One page of repositories, most recently updated first. No retry.
    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<Vec<RawRecord>>;

    async fn set_visibility(&self, owner: &str, name: &str, private: bool) -> Result<()>;

    /// Irreversible. Confirmation happens before this is ever called.
    async fn delete(&self, owner: &str, name: &str) -> Result<()>;
}

pub struct GitHubClient {
    http: reqwest::Client,
    base_url: String,
    identity: OnceLock<Identity>,
}

impl GitHubClient {
    pub fn new(config: &Config, credential: &Credential) -> Result<Self> {
        Self::from_builder(config, Self::http_builder(config, credential)?)
    }

    fn http_builder(config: &Config, credential: &Credential) -> Result<reqwest::ClientBuilder> {
        if credential.is_empty() {
            return Err(RepotidyError::MissingCredential(config.token_env_var.clone()));
        }

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", credential.token()))
            .map_err(|_| RepotidyError::Auth("token contains invalid characters".to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("repotidy/", env!("CARGO_PKG_VERSION"))),
        );

        Ok(reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout()))
    }

    fn from_builder(config: &Config, builder: reqwest::ClientBuilder) -> Result<Self> {
        Ok(Self {
            http: builder.build()?,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            identity: OnceLock::new(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Reject mutations outside the authenticated account before any request is sent.
    fn check_owner(&self, owner: &str, name: &str) -> Result<()> {
        match self.identity.get() {
            Some(identity) if identity.owns(owner) => Ok(()),
            Some(identity) => Err(RepotidyError::mutation(
                name,
                format!("'{}' is not owned by '{}'", owner, identity.login),
            )),
            None => Err(RepotidyError::mutation(name, "client is not authenticated")),
        }
    }
}

/// Turn a non-2xx response into "HTTP <code>: <message>".
async fn describe_failure(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiMessage>(&body)
        .map(|m| m.message)
        .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown error").to_string());
    format!("HTTP {}: {}", status.as_u16(), message)
}

impl RepoClient for GitHubClient {
    async fn authenticate(&self) -> Result<Identity> {
        debug!("authenticate: GET /user");
        let response = self
            .http
            .get(self.url("/user"))
            .send()
            .await
            .map_err(|e| RepotidyError::Auth(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {
                let identity: Identity = response
                    .json()
                    .await
                    .map_err(|e| RepotidyError::Auth(e.to_string()))?;
                info!("authenticate: signed in as '{}'", identity.login);
                let _ = self.identity.set(identity.clone());
                Ok(identity)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                let message = describe_failure(response).await;
                warn!("authenticate: credential rejected ({})", message);
                Err(RepotidyError::Auth(format!("credential rejected ({})", message)))
            }
            _ => Err(RepotidyError::Auth(describe_failure(response).await)),
        }
    }

    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<Vec<RawRecord>> {
        debug!("fetch_page: page={} per_page={}", page, per_page);
        let response = self
            .http
            .get(self.url("/user/repos"))
            .query(&[
                ("per_page", per_page.to_string()),
                ("page", page.to_string()),
                ("sort", "updated".to_string()),
                ("direction", "desc".to_string()),
                ("affiliation", "owner".to_string()),
            ])
            .send()
            .await
            .map_err(|e| RepotidyError::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RepotidyError::Fetch(describe_failure(response).await));
        }

        response
            .json::<Vec<RawRecord>>()
            .await
            .map_err(|e| RepotidyError::Fetch(format!("page {}: {}", page, e)))
    }

    async fn set_visibility(&self, owner: &str, name: &str, private: bool) -> Result<()> {
        self.check_owner(owner, name)?;
        debug!("set_visibility: {}/{} private={}", owner, name, private);

        let response = self
            .http
            .patch(self.url(&format!("/repos/{}/{}", owner, name)))
            .json(&serde_json::json!({ "private": private }))
            .send()
            .await
            .map_err(|e| RepotidyError::mutation(name, e.to_string()))?;

        if !response.status().is_success() {
            return Err(RepotidyError::mutation(name, describe_failure(response).await));
        }
        Ok(())
    }

    async fn delete(&self, owner: &str, name: &str) -> Result<()> {
        self.check_owner(owner, name)?;
        debug!("delete: {}/{}", owner, name);

        let response = self
            .http
            .delete(self.url(&format!("/repos/{}/{}", owner, name)))
            .send()
            .await
            .map_err(|e| RepotidyError::mutation(name, e.to_string()))?;

        if !response.status().is_success() {
            return Err(RepotidyError::mutation(name, describe_failure(response).await));
        }
        Ok(())
    }
}
