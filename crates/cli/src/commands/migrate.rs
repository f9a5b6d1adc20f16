//! Schema migrations

use anyhow::{Context, Result};

use crate::commands::CommandContext;

/// Apply pending migrations to the configured database
pub async fn run(ctx: &CommandContext) -> Result<()> {
    ctx.database()?
        .migrate()
        .await
        .context("Failed to apply migrations")
}
