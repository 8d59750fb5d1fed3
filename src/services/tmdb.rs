//! TMDB API client.

use crate::models::config::TmdbConfig;
use crate::models::media::{MediaCandidate, MediaKind};
use crate::services::MetadataSearch;
use crate::Result;
use chrono::NaiveDate;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::Deserialize;
use std::time::Duration;

const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Search response envelope shared by `search/tv` and `search/movie`.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchItem>,
}

/// One search hit. TV results carry `name`/`first_air_date`, movie results
/// carry `title`/`release_date`.
#[derive(Debug, Deserialize)]
struct SearchItem {
    id: u64,
    name: Option<String>,
    title: Option<String>,
    first_air_date: Option<String>,
    release_date: Option<String>,
    #[serde(default)]
    genre_ids: Vec<u64>,
}

impl SearchItem {
    fn into_candidate(self, kind: MediaKind) -> MediaCandidate {
        let (name, date) = match kind {
            MediaKind::Tv => (self.name.or(self.title), self.first_air_date),
            MediaKind::Movie => (self.title.or(self.name), self.release_date),
        };
        MediaCandidate {
            id: self.id,
            display_name: name.unwrap_or_default(),
            original_air_date: date
                .as_deref()
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
            genre_ids: self.genre_ids.into_iter().collect(),
        }
    }
}

/// TMDB API client.
pub struct TmdbClient {
    api_key: String,
    /// Bearer tokens (API v4 style) start with "eyJ".
    use_bearer: bool,
    languages: Vec<String>,
    base_url: String,
    client: reqwest::Client,
}

impl TmdbClient {
    /// Create a client from configuration.
    ///
    /// An empty key is accepted here; the pipeline rejects it per task.
    pub fn new(config: &TmdbConfig) -> Result<Self> {
        let api_key = config.api_key.trim().to_string();
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let languages = if config.languages.is_empty() {
            vec!["en-US".to_string()]
        } else {
            config.languages.clone()
        };

        Ok(Self {
            use_bearer: api_key.starts_with("eyJ"),
            api_key,
            languages,
            base_url: TMDB_BASE_URL.to_string(),
            client,
        })
    }

    /// Point the client at another API root (a proxy or a test server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build a request with proper authentication.
    fn build_request(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.client.get(url);
        if self.use_bearer {
            request.header("Authorization", format!("Bearer {}", self.api_key))
        } else {
            request
        }
    }

    /// Build URL with optional api_key parameter (only for v3 style).
    fn build_url(&self, path: &str, language: &str, extra_params: &str) -> String {
        if self.use_bearer {
            format!(
                "{}/{}?language={}{}",
                self.base_url, path, language, extra_params
            )
        } else {
            format!(
                "{}/{}?api_key={}&language={}{}",
                self.base_url, path, self.api_key, language, extra_params
            )
        }
    }

    /// Verify API key is valid.
    pub async fn verify_api_key(&self) -> Result<bool> {
        let url = if self.use_bearer {
            format!("{}/authentication", self.base_url)
        } else {
            format!("{}/authentication?api_key={}", self.base_url, self.api_key)
        };

        match self.build_request(&url).send().await {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// One search request. A non-success status counts as no results.
    async fn search_once(
        &self,
        kind: MediaKind,
        query: &str,
        language: &str,
        year: Option<u16>,
    ) -> Result<Vec<MediaCandidate>> {
        let year_param = match (kind, year) {
            (MediaKind::Tv, Some(y)) => format!("&first_air_date_year={}", y),
            (MediaKind::Movie, Some(y)) => format!("&year={}", y),
            (_, None) => String::new(),
        };
        let url = self.build_url(
            &format!("search/{}", kind.as_str()),
            language,
            &format!("&query={}{}", urlencoding::encode(query), year_param),
        );

        let resp = self.build_request(&url).send().await?;
        if !resp.status().is_success() {
            tracing::debug!("TMDB search {} returned {}", kind, resp.status());
            return Ok(Vec::new());
        }
        let body: SearchResponse = resp.json().await?;
        Ok(body
            .results
            .into_iter()
            .map(|item| item.into_candidate(kind))
            .collect())
    }

    /// Search in each language, with the year filter and then without it,
    /// returning the first non-empty list.
    pub async fn search_candidates(
        &self,
        kind: MediaKind,
        query: &str,
        year: Option<u16>,
    ) -> Result<Vec<MediaCandidate>> {
        for language in &self.languages {
            let attempts = if year.is_some() {
                vec![year, None]
            } else {
                vec![None]
            };
            for attempt in attempts {
                let results = self.search_once(kind, query, language, attempt).await?;
                if !results.is_empty() {
                    tracing::debug!(
                        "TMDB {} search {:?} ({}, year {:?}): {} results",
                        kind,
                        query,
                        language,
                        attempt,
                        results.len()
                    );
                    return Ok(results);
                }
            }
        }
        Ok(Vec::new())
    }

    /// Full TV or movie record; the first language that answers wins.
    pub async fn get_details(&self, kind: MediaKind, id: u64) -> Result<Option<serde_json::Value>> {
        for language in &self.languages {
            let url = self.build_url(&format!("{}/{}", kind.as_str(), id), language, "");
            let resp = self.build_request(&url).send().await?;
            if resp.status().is_success() {
                return Ok(Some(resp.json().await?));
            }
            if resp.status() == reqwest::StatusCode::NOT_FOUND {
                return Ok(None);
            }
        }
        Ok(None)
    }
}

impl MetadataSearch for TmdbClient {
    fn search<'a>(
        &'a self,
        kind: MediaKind,
        query: &'a str,
        year: Option<u16>,
    ) -> BoxFuture<'a, Result<Vec<MediaCandidate>>> {
        self.search_candidates(kind, query, year).boxed()
    }

    fn detail<'a>(
        &'a self,
        kind: MediaKind,
        id: u64,
    ) -> BoxFuture<'a, Result<Option<serde_json::Value>>> {
        self.get_details(kind, id).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(key: &str) -> TmdbConfig {
        TmdbConfig {
            api_key: key.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_url_v3_and_bearer() {
        let v3 = TmdbClient::new(&config("abc")).unwrap();
        assert_eq!(
            v3.build_url("search/tv", "zh-CN", "&query=x"),
            "https://api.themoviedb.org/3/search/tv?api_key=abc&language=zh-CN&query=x"
        );

        let bearer = TmdbClient::new(&config("eyJhbGciOi")).unwrap();
        assert!(bearer.use_bearer);
        assert_eq!(
            bearer.build_url("movie/1", "en-US", ""),
            "https://api.themoviedb.org/3/movie/1?language=en-US"
        );
    }

    #[test]
    fn test_search_item_mapping() {
        let json = r#"{"results": [
            {"id": 1, "name": "Frieren", "first_air_date": "2023-09-29", "genre_ids": [16, 18]},
            {"id": 2, "name": "Nameless", "first_air_date": ""}
        ]}"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        let candidates: Vec<MediaCandidate> = response
            .results
            .into_iter()
            .map(|item| item.into_candidate(MediaKind::Tv))
            .collect();

        assert_eq!(candidates[0].display_name, "Frieren");
        assert_eq!(candidates[0].year(), Some(2023));
        assert!(candidates[0].is_animation());
        assert_eq!(candidates[1].original_air_date, None);
        assert!(!candidates[1].is_animation());
    }

    #[test]
    fn test_movie_item_uses_title() {
        let item: SearchItem = serde_json::from_str(
            r#"{"id": 9, "title": "Your Name.", "release_date": "2016-08-26"}"#,
        )
        .unwrap();
        let candidate = item.into_candidate(MediaKind::Movie);
        assert_eq!(candidate.display_name, "Your Name.");
        assert_eq!(candidate.year(), Some(2016));
    }
}
