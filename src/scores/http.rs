//! HTTP client for the scores API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::ScoreSource;
use super::normalize::{ScoresResponse, normalize};
use crate::config::Config;
use crate::error::{RankboardError, Result, UNKNOWN_ERROR_MESSAGE};
use crate::settings::SettingsHandle;
use crate::types::{RecordId, ScoreMetadata, ScorePage, Scope, Selection};

pub struct HttpScoreSource {
    client: Client,
    base_url: Url,
    /// Source of starred ids for `Scope::Starred`
    starred: Option<SettingsHandle>,
}

impl HttpScoreSource {
    /// Create a source from configuration.
    ///
    /// Configures the HTTP client with the configured connect and total timeouts.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .build()?;
        Self::with_client(client, &config.effective_api_url())
    }

    pub fn with_client(client: Client, api_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(api_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            client,
            base_url,
            starred: None,
        })
    }

    /// Resolve starred selections from `settings` at fetch time.
    pub fn with_starred(mut self, settings: SettingsHandle) -> Self {
        self.starred = Some(settings);
        self
    }

    /// Endpoint for a country ranking, e.g. `{api}/scores/country/7?sort=1`.
    pub fn country_url(&self, selection: Selection) -> Result<Url> {
        let mut url = self
            .base_url
            .join(&format!("scores/country/{}", selection.region_id))?;
        url.query_pairs_mut()
            .append_pair("sort", &selection.sort_mode.to_string());
        Ok(url)
    }

    /// Endpoint for the global ranking, e.g. `{api}/scores?sort=0`.
    pub fn global_url(&self, sort_mode: u32) -> Result<Url> {
        let mut url = self.base_url.join("scores")?;
        url.query_pairs_mut()
            .append_pair("sort", &sort_mode.to_string());
        Ok(url)
    }

    /// Endpoint for a set of rows, e.g. `{api}/scores/users?users[]=1&users[]=2&sort=0`.
    pub fn users_url(&self, ids: &[RecordId], sort_mode: u32) -> Result<Url> {
        let mut url = self.base_url.join("scores/users")?;
        {
            let mut query = url.query_pairs_mut();
            for id in ids {
                query.append_pair("users[]", &id.to_string());
            }
            query.append_pair("sort", &sort_mode.to_string());
        }
        Ok(url)
    }

    fn starred_ids(&self) -> Result<Vec<RecordId>> {
        let settings = self.starred.as_ref().ok_or_else(|| {
            RankboardError::InvalidInput("starred rankings need saved settings".to_string())
        })?;
        Ok(settings.snapshot().starred_ids.iter().copied().collect())
    }
}

#[async_trait]
impl ScoreSource for HttpScoreSource {
    async fn fetch_scores(&self, selection: Selection) -> Result<ScorePage> {
        let url = match selection.scope {
            Scope::Country => self.country_url(selection)?,
            Scope::Global => self.global_url(selection.sort_mode)?,
            Scope::Starred => {
                let ids = self.starred_ids()?;
                if ids.is_empty() {
                    return Ok(ScorePage {
                        records: Vec::new(),
                        metadata: ScoreMetadata::default(),
                    });
                }
                self.users_url(&ids, selection.sort_mode)?
            }
        };
        tracing::debug!("GET {url}");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let envelope: Option<ScoresResponse> = serde_json::from_str(&body).ok();
        match envelope {
            Some(ScoresResponse {
                data: Some(data), ..
            }) if status.is_success() => Ok(normalize(data)),
            Some(ScoresResponse {
                message: Some(message),
                ..
            }) => Err(RankboardError::FetchFailure(message)),
            _ if !status.is_success() => Err(RankboardError::FetchFailure(format!(
                "Request failed with status code {}",
                status.as_u16()
            ))),
            _ => Err(RankboardError::FetchFailure(
                UNKNOWN_ERROR_MESSAGE.to_string(),
            )),
        }
    }
}
