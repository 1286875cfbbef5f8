//! TMDB (The Movie Database) API client
//!
//! Search, popular, and trending listings for movies.
//! API docs: https://developer.themoviedb.org/docs
//!
//! The public surface never raises: failures are logged and become empty
//! results. The `try_*` variants expose the underlying `Result` for callers
//! that need to tell failure from a genuine miss.

use anyhow::Result;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::models::{parse_year, Movie, MovieId};

/// Base URL for poster images at a browsing-friendly width
const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Cap on combined search results across pages
const SEARCH_RESULT_CAP: usize = 40;

/// Cap on trending results
const TRENDING_CAP: usize = 10;

/// TMDB API error types
#[derive(Error, Debug)]
pub enum TmdbError {
    #[error("TMDB error {code}: {message}")]
    Api { code: i32, message: String },

    #[error("Server error: {0}")]
    ServerError(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

/// TMDB API client
pub struct TmdbClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl TmdbClient {
    /// Create a new TMDB client with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://api.themoviedb.org/3".to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Search movies matching a free-text query.
    ///
    /// Blank queries resolve to an empty list without a network call.
    /// Failures are logged and also resolve to an empty list.
    pub async fn search_many(&self, query: &str) -> Vec<Movie> {
        match self.try_search_many(query).await {
            Ok(movies) => movies,
            Err(e) => {
                warn!(query, error = %e, "TMDB search failed");
                Vec::new()
            }
        }
    }

    /// Fallible form of [`search_many`](Self::search_many).
    ///
    /// Fetches a second page when the first returned fewer than 40 items and
    /// more pages exist; a page-2 failure falls back to page 1 alone.
    pub async fn try_search_many(&self, query: &str) -> Result<Vec<Movie>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let first: SearchResponse = self.get(&self.search_endpoint(query, 1)).await?;
        let total_pages = first.total_pages.unwrap_or(1);
        let mut results = first.results.unwrap_or_default();

        if total_pages > 1 && results.len() < SEARCH_RESULT_CAP {
            match self.get::<SearchResponse>(&self.search_endpoint(query, 2)).await {
                Ok(second) => results.extend(second.results.unwrap_or_default()),
                Err(e) => {
                    warn!(query, error = %e, "TMDB page 2 fetch failed, keeping first page");
                }
            }
        }

        results.truncate(SEARCH_RESULT_CAP);
        Ok(results.into_iter().map(|r| r.into_movie()).collect())
    }

    /// The current popular-movies listing.
    pub async fn popular(&self) -> Vec<Movie> {
        match self.try_popular().await {
            Ok(movies) => movies,
            Err(e) => {
                warn!(error = %e, "TMDB popular fetch failed");
                Vec::new()
            }
        }
    }

    /// Fallible form of [`popular`](Self::popular).
    pub async fn try_popular(&self) -> Result<Vec<Movie>> {
        let endpoint = format!(
            "/movie/popular?api_key={}&language=en-US&page=1",
            self.api_key
        );
        let response: SearchResponse = self.get(&endpoint).await?;
        Ok(response
            .results
            .unwrap_or_default()
            .into_iter()
            .map(|r| r.into_movie())
            .collect())
    }

    /// This week's trending movies, capped to the first 10.
    pub async fn trending(&self) -> Vec<Movie> {
        match self.try_trending().await {
            Ok(movies) => movies,
            Err(e) => {
                warn!(error = %e, "TMDB trending fetch failed");
                Vec::new()
            }
        }
    }

    /// Fallible form of [`trending`](Self::trending).
    pub async fn try_trending(&self) -> Result<Vec<Movie>> {
        let endpoint = format!("/trending/movie/week?api_key={}&language=en-US", self.api_key);
        let response: SearchResponse = self.get(&endpoint).await?;
        let mut results = response.results.unwrap_or_default();
        results.truncate(TRENDING_CAP);
        Ok(results.into_iter().map(|r| r.into_movie()).collect())
    }

    fn search_endpoint(&self, query: &str, page: u32) -> String {
        format!(
            "/search/movie?api_key={}&language=en-US&query={}&page={}&include_adult=false",
            self.api_key,
            urlencoding::encode(query),
            page
        )
    }

    /// Make a GET request and surface upstream-reported errors
    async fn get<T: for<'de> Deserialize<'de>>(&self, endpoint: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self.client.get(&url).send().await.map_err(TmdbError::from)?;

        let status = response.status();
        let body = response.text().await.map_err(TmdbError::from)?;

        // TMDB reports request problems in the body, with or without an
        // HTTP error status
        if let Ok(err) = serde_json::from_str::<ApiErrorBody>(&body) {
            if let Some(code) = err.status_code {
                return Err(TmdbError::Api {
                    code,
                    message: err.status_message.unwrap_or_default(),
                }
                .into());
            }
        }

        match status {
            StatusCode::OK => serde_json::from_str(&body)
                .map_err(|e| TmdbError::InvalidResponse(format!("JSON parse error: {}", e)).into()),
            status => Err(TmdbError::ServerError(status.as_u16()).into()),
        }
    }
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

/// Error body TMDB attaches to failed requests
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    status_code: Option<i32>,
    status_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Option<Vec<MovieRaw>>,
    total_pages: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct MovieRaw {
    id: u64,
    title: Option<String>,
    release_date: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    vote_average: Option<f32>,
}

impl MovieRaw {
    fn into_movie(self) -> Movie {
        Movie {
            id: MovieId::Tmdb(self.id),
            title: self.title.unwrap_or_default(),
            year: self.release_date.as_deref().and_then(parse_year),
            poster_url: self
                .poster_path
                .map(|path| format!("{}{}", IMAGE_BASE_URL, path)),
            plot: self.overview,
            rating: self.vote_average,
        }
    }
}
