//! Catalog accessor for the TVMaze-shaped show metadata API.
//!
//! Every payload is validated into an explicit type at this boundary; a
//! response that does not match the expected shape becomes
//! [`CatalogError::InvalidPayload`] instead of leaking into the engines.

use crate::constants::TBA;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "https://api.tvmaze.com";

/// Failure modes of a catalog call, kept distinct so callers can apply the
/// right policy: all of them are recoverable at per-show granularity.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("catalog returned status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("catalog payload malformed: {0}")]
    InvalidPayload(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogShow {
    pub id: i32,
    pub name: String,
    pub status: Option<String>,
    pub language: Option<String>,
    pub genres: Option<Vec<String>>,
    pub premiered: Option<String>,
    pub runtime: Option<i32>,
    pub summary: Option<String>,
    #[serde(rename = "officialSite")]
    pub official_site: Option<String>,
    pub image: Option<CatalogImage>,
    pub rating: Option<CatalogRating>,
    pub network: Option<CatalogNetwork>,
}

impl CatalogShow {
    /// Artwork reference with "no image" collapsed to `None`. Both a missing
    /// image object and an empty URL string count as absent.
    #[must_use]
    pub fn artwork(&self) -> Option<String> {
        self.image
            .as_ref()
            .and_then(|img| img.medium.as_deref().or(img.original.as_deref()))
            .filter(|url| !url.is_empty())
            .map(str::to_string)
    }

    #[must_use]
    pub fn rating_average(&self) -> Option<f32> {
        self.rating.as_ref().and_then(|r| r.average)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogImage {
    pub medium: Option<String>,
    pub original: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogRating {
    pub average: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogNetwork {
    pub name: String,
    pub country: Option<CatalogCountry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogCountry {
    pub name: Option<String>,
    pub code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSearchHit {
    pub score: Option<f64>,
    pub show: CatalogShow,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEpisode {
    pub id: i32,
    pub season: i32,
    pub number: Option<i32>,
    pub name: Option<String>,
    pub airdate: Option<String>,
    pub airtime: Option<String>,
    pub runtime: Option<i32>,
}

impl CatalogEpisode {
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_default()
    }

    /// Air date with a missing or empty value normalized to the sentinel.
    #[must_use]
    pub fn normalized_airdate(&self) -> String {
        normalize_tba(self.airdate.as_deref())
    }

    #[must_use]
    pub fn normalized_airtime(&self) -> String {
        normalize_tba(self.airtime.as_deref())
    }
}

fn normalize_tba(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => TBA.to_string(),
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogCastCredit {
    pub person: CatalogPerson,
    pub character: Option<CatalogCharacter>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogPerson {
    pub id: i32,
    pub name: String,
    pub image: Option<CatalogImage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogCharacter {
    pub name: Option<String>,
}

/// Read access to the external show catalog.
///
/// The engines only ever see this trait, so tests substitute a scripted
/// implementation and the HTTP client stays swappable.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Looks a show up by its catalog id. A catalog 404 is `Ok(None)`.
    async fn get_show(&self, id: i32) -> Result<Option<CatalogShow>, CatalogError>;

    async fn search_shows(&self, name: &str) -> Result<Vec<CatalogSearchHit>, CatalogError>;

    /// Fetches the full episode list of a show. A payload that is not a
    /// list is rejected as [`CatalogError::InvalidPayload`].
    async fn get_episodes(&self, show_id: i32) -> Result<Vec<CatalogEpisode>, CatalogError>;

    async fn get_cast(&self, show_id: i32) -> Result<Vec<CatalogCastCredit>, CatalogError>;
}

#[derive(Clone)]
pub struct TvMazeClient {
    client: Client,
    base_url: String,
}

impl Default for TvMazeClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, Duration::from_secs(30))
    }
}

impl TvMazeClient {
    #[must_use]
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn fetch_text(&self, url: &str) -> Result<Option<String>, CatalogError> {
        let response = self.client.get(url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Status { status, body });
        }

        Ok(Some(response.text().await?))
    }
}

fn parse_payload<T: DeserializeOwned>(body: &str) -> Result<T, CatalogError> {
    serde_json::from_str(body).map_err(|e| CatalogError::InvalidPayload(e.to_string()))
}

fn parse_episode_list(body: &str) -> Result<Vec<CatalogEpisode>, CatalogError> {
    let value: serde_json::Value = parse_payload(body)?;
    if !value.is_array() {
        return Err(CatalogError::InvalidPayload(
            "episodes payload is not a list".to_string(),
        ));
    }
    serde_json::from_value(value).map_err(|e| CatalogError::InvalidPayload(e.to_string()))
}

#[async_trait]
impl CatalogClient for TvMazeClient {
    async fn get_show(&self, id: i32) -> Result<Option<CatalogShow>, CatalogError> {
        let url = format!("{}/shows/{}", self.base_url, id);
        match self.fetch_text(&url).await? {
            Some(body) => Ok(Some(parse_payload(&body)?)),
            None => Ok(None),
        }
    }

    async fn search_shows(&self, name: &str) -> Result<Vec<CatalogSearchHit>, CatalogError> {
        let url = format!(
            "{}/search/shows?q={}",
            self.base_url,
            urlencoding::encode(name)
        );
        match self.fetch_text(&url).await? {
            Some(body) => parse_payload(&body),
            None => Ok(Vec::new()),
        }
    }

    async fn get_episodes(&self, show_id: i32) -> Result<Vec<CatalogEpisode>, CatalogError> {
        let url = format!("{}/shows/{}/episodes", self.base_url, show_id);
        match self.fetch_text(&url).await? {
            Some(body) => parse_episode_list(&body),
            None => Ok(Vec::new()),
        }
    }

    async fn get_cast(&self, show_id: i32) -> Result<Vec<CatalogCastCredit>, CatalogError> {
        let url = format!("{}/shows/{}/cast", self.base_url, show_id);
        match self.fetch_text(&url).await? {
            Some(body) => parse_payload(&body),
            None => Ok(Vec::new()),
        }
    }
}
