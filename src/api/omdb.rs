//! OMDB API client
//!
//! Title lookup and free-text search over the public OMDB API.
//! API docs: https://www.omdbapi.com
//!
//! Like the other metadata client, the public surface never raises: failures
//! are logged and become empty results, so a UI can always render whatever
//! came back. The `try_*` variants expose the underlying `Result` for
//! callers that need to tell failure from a genuine miss.

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::warn;

use crate::models::{parse_year, Movie, MovieId};

/// Value OMDB uses for fields it has no data for
const NOT_AVAILABLE: &str = "N/A";

/// OMDB API client
pub struct OmdbClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl OmdbClient {
    /// Create a new OMDB client with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://www.omdbapi.com".to_string(),
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

    /// Look up the best match for an exact title.
    ///
    /// Returns None when OMDB reports no match or the request fails.
    pub async fn search_single(&self, title: &str) -> Option<Movie> {
        match self.try_search_single(title).await {
            Ok(movie) => movie,
            Err(e) => {
                warn!(title, error = %e, "OMDB title lookup failed");
                None
            }
        }
    }

    /// Fallible form of [`search_single`](Self::search_single).
    pub async fn try_search_single(&self, title: &str) -> Result<Option<Movie>> {
        let url = format!(
            "{}/?apikey={}&t={}&type=movie",
            self.base_url,
            self.api_key,
            urlencoding::encode(title)
        );

        let data: TitleResponse = self.fetch(&url).await?;
        if data.response != "True" {
            return Ok(None);
        }
        Ok(Some(data.into_movie()))
    }

    /// Search movies matching a free-text query.
    ///
    /// Blank queries resolve to an empty list without a network call.
    /// Failures are logged and also resolve to an empty list.
    pub async fn search_many(&self, query: &str) -> Vec<Movie> {
        match self.try_search_many(query).await {
            Ok(movies) => movies,
            Err(e) => {
                warn!(query, error = %e, "OMDB search failed");
                Vec::new()
            }
        }
    }

    /// Fallible form of [`search_many`](Self::search_many).
    pub async fn try_search_many(&self, query: &str) -> Result<Vec<Movie>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let url = format!(
            "{}/?apikey={}&s={}&type=movie",
            self.base_url,
            self.api_key,
            urlencoding::encode(query)
        );

        let data: SearchResponse = self.fetch(&url).await?;
        if data.response != "True" {
            // OMDB reports "no results" as Response: "False" with an Error field
            return Ok(Vec::new());
        }

        Ok(data
            .search
            .into_iter()
            .flatten()
            .map(|item| item.into_movie())
            .collect())
    }

    async fn fetch<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to fetch from OMDB")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("OMDB returned HTTP {}", status);
        }

        let text = response
            .text()
            .await
            .context("Failed to read response body")?;
        serde_json::from_str(&text).context("Failed to parse JSON response")
    }
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

/// Map an OMDB field to None when it carries the "N/A" sentinel
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| v != NOT_AVAILABLE)
}

#[derive(Debug, Deserialize)]
struct TitleResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Title", default)]
    title: Option<String>,
    #[serde(rename = "Year", default)]
    year: Option<String>,
    #[serde(rename = "Poster", default)]
    poster: Option<String>,
    #[serde(rename = "Plot", default)]
    plot: Option<String>,
    #[serde(rename = "imdbID", default)]
    imdb_id: Option<String>,
    #[serde(rename = "imdbRating", default)]
    imdb_rating: Option<String>,
}

impl TitleResponse {
    fn into_movie(self) -> Movie {
        Movie {
            id: MovieId::Imdb(self.imdb_id.unwrap_or_default()),
            title: self.title.unwrap_or_default(),
            year: self.year.as_deref().and_then(parse_year),
            poster_url: present(self.poster),
            plot: present(self.plot),
            rating: present(self.imdb_rating).and_then(|r| r.parse().ok()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Search", default)]
    search: Option<Vec<SearchItem>>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(rename = "Title", default)]
    title: Option<String>,
    #[serde(rename = "Year", default)]
    year: Option<String>,
    #[serde(rename = "Poster", default)]
    poster: Option<String>,
    #[serde(rename = "imdbID", default)]
    imdb_id: Option<String>,
}

impl SearchItem {
    fn into_movie(self) -> Movie {
        // Search results carry no plot or rating; those stay absent
        Movie {
            id: MovieId::Imdb(self.imdb_id.unwrap_or_default()),
            title: self.title.unwrap_or_default(),
            year: self.year.as_deref().and_then(parse_year),
            poster_url: present(self.poster),
            plot: None,
            rating: None,
        }
    }
}
