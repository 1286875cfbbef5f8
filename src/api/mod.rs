//! API clients for Cinedex
//!
//! - Gateway: authenticated HTTP pipeline to the Cinedex service
//! - Auth: registration, login, and session state
//! - OMDB / TMDB: public movie-metadata providers

pub mod auth;
pub mod gateway;
pub mod omdb;
pub mod tmdb;

pub use auth::{AuthClient, LoginResponse};
pub use gateway::{Gateway, GatewayError};
pub use omdb::OmdbClient;
pub use tmdb::TmdbClient;
