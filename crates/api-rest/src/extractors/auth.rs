//! Session player extractor.
//!
//! Game clients send their session token verbatim in the `Authorization`
//! header; a `Bearer ` prefix is accepted as well.

use crate::{error::ApiError, state::AppState};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use rankings_domain::PlayerId;
use tracing::{debug, warn};

/// Raw session token from the `Authorization` header, if any
pub fn session_token(parts: &Parts) -> Option<&str> {
    let value = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())?
        .trim();
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    (!token.is_empty()).then_some(token)
}

/// Optional signed-in player (allows anonymous access).
///
/// Missing, unknown and expired tokens all resolve to an anonymous caller.
/// A failing session lookup is logged and treated the same way, so reads
/// never fail because of it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaybePlayer(pub Option<PlayerId>);

impl MaybePlayer {
    /// Get the player if signed in
    pub fn player(&self) -> Option<&PlayerId> {
        self.0.as_ref()
    }

    /// Check if a token resolved to a player
    pub fn is_authenticated(&self) -> bool {
        self.0.is_some()
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybePlayer {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(parts) else {
            return Ok(Self(None));
        };

        match state.sessions.player_for_token(token).await {
            Ok(player) => {
                debug!(authenticated = player.is_some(), "Resolved session token");
                Ok(Self(player))
            }
            Err(e) => {
                warn!(error = %e, "Session lookup failed; continuing anonymously");
                Ok(Self(None))
            }
        }
    }
}
