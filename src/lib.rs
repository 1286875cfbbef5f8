//! Cinedex - client library for the Cinedex movie service
//!
//! A thin API-client layer: an authenticated HTTP gateway to the service
//! itself plus read-only wrappers over the public OMDB and TMDB APIs that
//! normalize both providers into one `Movie` record.
//!
//! # Modules
//!
//! - `models` - Normalized movie record and session pair
//! - `session` - Injectable session store (memory and file backed)
//! - `api` - Gateway, auth client, and the two metadata clients

pub mod api;
pub mod models;
pub mod session;

// Re-export commonly used types
pub use api::{AuthClient, Gateway, GatewayError, LoginResponse, OmdbClient, TmdbClient};
pub use models::{Movie, MovieId, Session};
pub use session::{FileSessionStore, MemorySessionStore, SessionStore};
