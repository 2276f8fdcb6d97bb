//! Environment/Auth bridge.
//!
//! The shell runs inside a hosting context it does not control. That
//! context tells the shell which environment it is in and hands out the
//! bearer token for API calls. This module is a one-way adapter: on
//! mount it reads the environment flag once, fixes the API base origin
//! for the session, and spawns the asynchronous token fetch that
//! forwards the token into shared auth state. Nothing is ever written
//! back into the host context.
//!
//! The token fetch is deliberately not awaited before first render: the
//! console may briefly issue unauthenticated requests, and callers must
//! tolerate that race.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use url::Url;

use crate::app_logger::LogLevel;
use crate::config::ShellConfig;
use crate::state::ShellState;

pub const PRODUCTION_ORIGIN: &str = "https://quay.io";
pub const STAGING_ORIGIN: &str = "https://stage.quay.io";

/// Environment variables the console binary adapts into an
/// [`ExecutionContext`].
pub const TOKEN_ENV: &str = "PORTSIDE_TOKEN";
pub const PRODUCTION_ENV: &str = "PORTSIDE_PRODUCTION";

pub type TokenFuture<'a> = Pin<Box<dyn Future<Output = Result<String, String>> + Send + 'a>>;

/// Host-supplied runtime information. Read-only from the shell's side.
pub trait ExecutionContext: Send + Sync {
    fn is_production(&self) -> bool;
    /// Request the bearer token from the host. Asynchronous; may take
    /// arbitrarily long to settle.
    fn token(&self) -> TokenFuture<'_>;
}

// ---------------------------------------------------------------------------
// Environment-variable host context
// ---------------------------------------------------------------------------

/// Execution context backed by process environment variables, used by
/// the console binary. A missing token variable means the host is not
/// ready yet — a valid transient state, not an error.
#[derive(Debug, Clone)]
pub struct EnvExecutionContext {
    production: bool,
    token: String,
}

impl EnvExecutionContext {
    /// Build from the environment. Returns `None` when [`TOKEN_ENV`] is
    /// unset (host not ready). `production_override` beats the
    /// environment flag when given.
    pub fn from_env(production_override: Option<bool>) -> Option<Self> {
        let token = std::env::var(TOKEN_ENV).ok()?;
        let production = production_override.unwrap_or_else(|| {
            std::env::var(PRODUCTION_ENV)
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false)
        });
        Some(Self { production, token })
    }

    #[cfg(test)]
    pub fn fixed(production: bool, token: &str) -> Self {
        Self {
            production,
            token: token.to_string(),
        }
    }
}

impl ExecutionContext for EnvExecutionContext {
    fn is_production(&self) -> bool {
        self.production
    }

    fn token(&self) -> TokenFuture<'_> {
        let token = self.token.clone();
        Box::pin(async move { Ok(token) })
    }
}

// ---------------------------------------------------------------------------
// Origin selection and mount
// ---------------------------------------------------------------------------

/// Pick the API base origin for the session: config override when
/// present, otherwise the built-in origin for the environment.
pub fn select_origin(config: &ShellConfig, production: bool) -> Result<Url, String> {
    let raw = if production {
        config
            .production_origin
            .clone()
            .unwrap_or_else(|| PRODUCTION_ORIGIN.to_string())
    } else {
        config
            .staging_origin
            .clone()
            .unwrap_or_else(|| STAGING_ORIGIN.to_string())
    };

    let origin = Url::parse(&raw).map_err(|e| format!("Invalid API origin \"{raw}\": {e}"))?;
    match origin.scheme() {
        "http" | "https" => {}
        scheme => return Err(format!("API origin \"{raw}\" has unsupported scheme \"{scheme}\"")),
    }
    if origin.host_str().is_none() {
        return Err(format!("API origin \"{raw}\" has no host"));
    }
    Ok(origin)
}

/// Mount the bridge: fix the base origin for the session and kick off
/// the token fetch. Must run inside a tokio runtime (the token fetch is
/// spawned, not awaited).
///
/// Returns the selected origin. Mounting twice on the same state is an
/// error — there is no environment switching mid-session.
pub fn mount(context: Arc<dyn ExecutionContext>, state: &Arc<ShellState>) -> Result<Url, String> {
    let production = context.is_production();
    let origin = select_origin(&state.config.read(), production)?;

    if !state.set_base_origin(origin.clone()) {
        return Err("base origin already set for this session".to_string());
    }

    state.log(
        LogLevel::Info,
        "bridge",
        format!(
            "environment resolved: {} ({})",
            origin,
            if production { "production" } else { "staging" }
        ),
    );

    let task_state = state.clone();
    tokio::spawn(async move {
        match context.token().await {
            Ok(token) => {
                task_state.set_bearer_token(token);
                tracing::debug!("bearer token resolved from host context");
            }
            Err(e) => {
                eprintln!("[bridge] token fetch failed: {e}");
                task_state.log(
                    LogLevel::Warn,
                    "bridge",
                    format!("token fetch failed: {e}"),
                );
            }
        }
    });

    Ok(origin)
}
