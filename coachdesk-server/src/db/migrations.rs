//! Schema bootstrap for the coaching tables
//!
//! Every statement is idempotent, so running this on each start is safe.

use sqlx::PgPool;

/// Create tables and indexes if they do not exist yet.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running schema migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS team_members (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            picture_url TEXT,
            email TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS teams (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            logo_url TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    // No cascade on team_id: deleting a team clears its rows explicitly first.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS team_member_assignments (
            team_id BIGINT NOT NULL REFERENCES teams(id),
            member_id BIGINT NOT NULL REFERENCES team_members(id) ON DELETE CASCADE,
            PRIMARY KEY (team_id, member_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // target_id points into teams or team_members depending on target_type.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS feedbacks (
            id BIGSERIAL PRIMARY KEY,
            content TEXT NOT NULL,
            target_id BIGINT NOT NULL,
            target_type TEXT NOT NULL CHECK (target_type IN ('team', 'member'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    create_indexes(pool).await?;

    tracing::info!("Schema migrations complete");
    Ok(())
}

async fn create_indexes(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_team_member_assignments_member ON team_member_assignments(member_id)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_feedbacks_target ON feedbacks(target_type, target_id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
