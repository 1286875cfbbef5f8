//! Data structures and types for Cinedex
//!
//! Contains the shared models used across the application:
//! - **Movie**: the normalized record both metadata providers map into
//! - **Session**: the stored authentication pair (access token + user id)

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Movie Models
// =============================================================================

/// Identifier of a movie in its upstream provider's id space.
///
/// OMDB keys movies by IMDB id strings ("tt1877830"); TMDB uses numeric ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MovieId {
    Imdb(String),
    Tmdb(u64),
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MovieId::Imdb(id) => write!(f, "{}", id),
            MovieId::Tmdb(id) => write!(f, "{}", id),
        }
    }
}

/// Normalized movie record produced by the metadata clients.
///
/// Built fresh per API call and never persisted. `poster_url` is None when
/// the provider marks the poster unavailable, never a sentinel string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub year: Option<u16>,
    pub poster_url: Option<String>,
    pub plot: Option<String>,
    pub rating: Option<f32>,
}

impl fmt::Display for Movie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year_str = self.year.map(|y| format!(" ({})", y)).unwrap_or_default();
        match self.rating {
            Some(rating) => write!(f, "{}{} ★ {:.1}", self.title, year_str, rating),
            None => write!(f, "{}{}", self.title, year_str),
        }
    }
}

/// Extract a year from a provider date string.
///
/// Both providers lead with a 4-digit year ("2022-03-04", "2010–2015").
pub fn parse_year(date: &str) -> Option<u16> {
    date.get(..4).and_then(|s| s.parse().ok())
}

// =============================================================================
// Session Model
// =============================================================================

/// The stored authentication pair.
///
/// Both fields move together: a successful login writes both, logout and
/// gateway-detected invalidation clear both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: Option<String>,
    pub user_id: Option<String>,
}

impl Session {
    /// True iff an access token is present and non-empty.
    pub fn is_authenticated(&self) -> bool {
        self.access_token
            .as_deref()
            .map(|t| !t.is_empty())
            .unwrap_or(false)
    }

    /// True when neither field is set.
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.user_id.is_none()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
