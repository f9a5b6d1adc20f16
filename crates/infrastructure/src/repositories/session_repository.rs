//! Session token lookup.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::{debug, instrument};

use rankings_application::{ApplicationResult, SessionLookup};
use rankings_domain::PlayerId;

use crate::{query_optional, Error};

const PLAYER_FOR_SESSION_SQL: &str = r#"
    SELECT a.player_id
    FROM accounts a
    JOIN player_sessions ps ON ps.player_id = a.player_id
    JOIN players p ON p.player_id = a.player_id
    WHERE ps.session_id = $1 AND NOW() < ps.expiration
"#;

/// PostgreSQL implementation of SessionLookup.
pub struct PgSessionLookup {
    pool: PgPool,
}

impl PgSessionLookup {
    /// Create a new PostgreSQL session lookup.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionLookup for PgSessionLookup {
    #[instrument(skip(self, token))]
    async fn player_for_token(&self, token: &str) -> ApplicationResult<Option<PlayerId>> {
        if token.is_empty() {
            return Ok(None);
        }

        let row = query_optional!(&self.pool, PLAYER_FOR_SESSION_SQL, token)?;
        match row {
            Some(row) => {
                let player_id: String = row.try_get("player_id").map_err(Error::Database)?;
                Ok(Some(PlayerId::new(player_id)))
            }
            None => {
                debug!("No active session for token");
                Ok(None)
            }
        }
    }
}
