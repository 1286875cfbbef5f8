//! CLI Command Handlers
//!
//! Implements all CLI commands by wiring config, session store, and API
//! clients together. Each handler takes CLI args and Output, returns ExitCode.

use std::sync::Arc;

use serde::Serialize;

use crate::api::{AuthClient, Gateway, GatewayError, OmdbClient, TmdbClient};
use crate::cli::{
    ExitCode, LoginCmd, LookupCmd, Output, PopularCmd, Provider, RegisterCmd, SearchCmd,
    TrendingCmd,
};
use crate::config::Config;
use crate::session::{FileSessionStore, SessionStore};

// =============================================================================
// Metadata Commands
// =============================================================================

pub async fn search_cmd(cmd: SearchCmd, output: &Output) -> ExitCode {
    let config = Config::load();

    output.info(format!("Searching for: {}", cmd.query));

    let result = match cmd.provider {
        Provider::Tmdb => {
            let client = TmdbClient::new(config.get_tmdb_api_key());
            client.try_search_many(&cmd.query).await
        }
        Provider::Omdb => {
            let client = OmdbClient::new(config.get_omdb_api_key());
            client.try_search_many(&cmd.query).await
        }
    };

    match result {
        Ok(mut movies) => {
            movies.truncate(cmd.limit);
            if let Err(e) = output.print(&movies) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(format!("Search failed: {}", e), ExitCode::NetworkError),
    }
}

pub async fn lookup_cmd(cmd: LookupCmd, output: &Output) -> ExitCode {
    let config = Config::load();
    let client = OmdbClient::new(config.get_omdb_api_key());

    output.info(format!("Looking up: {}", cmd.title));

    match client.try_search_single(&cmd.title).await {
        Ok(Some(movie)) => {
            if let Err(e) = output.print(&movie) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Ok(None) => {
            output.info("No match found");
            if output.json {
                let _ = output.print(Option::<()>::None);
            }
            ExitCode::Success
        }
        Err(e) => output.error(format!("Lookup failed: {}", e), ExitCode::NetworkError),
    }
}

pub async fn popular_cmd(cmd: PopularCmd, output: &Output) -> ExitCode {
    let config = Config::load();
    let client = TmdbClient::new(config.get_tmdb_api_key());

    output.info("Fetching popular movies...");

    match client.try_popular().await {
        Ok(mut movies) => {
            movies.truncate(cmd.limit);
            if let Err(e) = output.print(&movies) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(format!("Popular fetch failed: {}", e), ExitCode::NetworkError),
    }
}

pub async fn trending_cmd(_cmd: TrendingCmd, output: &Output) -> ExitCode {
    let config = Config::load();
    let client = TmdbClient::new(config.get_tmdb_api_key());

    output.info("Fetching trending movies...");

    match client.try_trending().await {
        Ok(movies) => {
            if let Err(e) = output.print(&movies) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(format!("Trending fetch failed: {}", e), ExitCode::NetworkError),
    }
}

// =============================================================================
// Auth Commands
// =============================================================================

/// Authentication status shown by `status` and after login
#[derive(Debug, Serialize)]
struct AuthStatus {
    authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
}

/// Build the auth client over the durable session store.
///
/// The session-invalidated hook is the CLI's stand-in for the web app's
/// redirect-to-root: it tells the user their stored session is gone.
fn auth_client(output: &Output) -> anyhow::Result<AuthClient> {
    let config = Config::load();
    let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::open(
        FileSessionStore::default_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine session path"))?,
    ));

    let quiet = output.quiet;
    let gateway = Gateway::new(config.get_api_url(), store)?.on_session_invalidated(move || {
        if !quiet {
            eprintln!("Session rejected by the server; you have been logged out.");
        }
    });

    Ok(AuthClient::new(gateway))
}

/// Map an auth request failure to an exit code
fn auth_error_code(e: &anyhow::Error) -> ExitCode {
    match e.downcast_ref::<GatewayError>() {
        Some(GatewayError::Unauthorized) | Some(GatewayError::InvalidToken) => ExitCode::AuthFailed,
        Some(GatewayError::Network(_)) => ExitCode::NetworkError,
        _ => ExitCode::Error,
    }
}

pub async fn register_cmd(cmd: RegisterCmd, output: &Output) -> ExitCode {
    let auth = match auth_client(output) {
        Ok(auth) => auth,
        Err(e) => return output.error(e.to_string(), ExitCode::Error),
    };

    output.info(format!("Registering {}...", cmd.email));

    match auth.register(&cmd.email, &cmd.password).await {
        Ok(payload) => {
            if let Err(e) = output.print(&payload) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(format!("Registration failed: {}", e), auth_error_code(&e)),
    }
}

pub async fn login_cmd(cmd: LoginCmd, output: &Output) -> ExitCode {
    let auth = match auth_client(output) {
        Ok(auth) => auth,
        Err(e) => return output.error(e.to_string(), ExitCode::Error),
    };

    match auth.login(&cmd.email, &cmd.password).await {
        Ok(response) => {
            if response.access_token.is_none() || response.user_id.is_none() {
                return output.error(
                    "Login response missing access_token or user_id",
                    ExitCode::AuthFailed,
                );
            }
            output.info(format!("Logged in as {}", cmd.email));
            let status = AuthStatus {
                authenticated: true,
                user_id: response.user_id,
            };
            if let Err(e) = output.print(&status) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(format!("Login failed: {}", e), auth_error_code(&e)),
    }
}

pub fn logout_cmd(output: &Output) -> ExitCode {
    let auth = match auth_client(output) {
        Ok(auth) => auth,
        Err(e) => return output.error(e.to_string(), ExitCode::Error),
    };

    auth.logout();
    output.info("Logged out");
    let status = AuthStatus {
        authenticated: false,
        user_id: None,
    };
    if let Err(e) = output.print(&status) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

pub fn status_cmd(output: &Output) -> ExitCode {
    let auth = match auth_client(output) {
        Ok(auth) => auth,
        Err(e) => return output.error(e.to_string(), ExitCode::Error),
    };

    let status = AuthStatus {
        authenticated: auth.is_authenticated(),
        user_id: auth.user_id(),
    };
    if let Err(e) = output.print(&status) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}
