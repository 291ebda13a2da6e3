//! Team repository
//!
//! Handles team CRUD and memberships:
//! - list/get: members loaded in one batch query for all teams (no N+1)
//! - delete: association clear and team delete in one transaction
//! - assign/remove: existence checks and the write share a transaction

use std::collections::HashMap;

use sqlx::{FromRow, PgConnection, PgPool};

use super::members::MemberRow;
use crate::db::DbError;
use crate::models::{Member, MemberId, NewTeam, Team, TeamId, TeamPatch};

/// Team record from database (without members)
#[derive(Debug, Clone, FromRow)]
struct TeamRow {
    id: i64,
    name: String,
    logo_url: Option<String>,
}

impl TeamRow {
    fn with_members(self, members: Vec<Member>) -> Team {
        Team {
            id: self.id,
            name: self.name,
            logo_url: self.logo_url,
            members,
        }
    }
}

/// Membership joined to its member
#[derive(Debug, FromRow)]
struct AssignmentRow {
    team_id: i64,
    #[sqlx(flatten)]
    member: MemberRow,
}

/// Team repository
pub struct TeamRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> TeamRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: NewTeam) -> Result<Team, DbError> {
        let row: TeamRow = sqlx::query_as(
            r#"
            INSERT INTO teams (name, logo_url)
            VALUES ($1, $2)
            RETURNING id, name, logo_url
            "#,
        )
        .bind(new.name.as_str())
        .bind(new.logo_url.as_deref())
        .fetch_one(self.pool)
        .await
        .map_err(|e| DbError::on_write(e, "team", "name"))?;

        Ok(row.with_members(Vec::new()))
    }

    /// List teams with members.
    ///
    /// Two queries regardless of team count: teams, then every membership
    /// of those teams.
    pub async fn list(&self) -> Result<Vec<Team>, DbError> {
        let rows: Vec<TeamRow> =
            sqlx::query_as("SELECT id, name, logo_url FROM teams ORDER BY id")
                .fetch_all(self.pool)
                .await?;

        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut members = self.members_for(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let team_members = members.remove(&row.id).unwrap_or_default();
                row.with_members(team_members)
            })
            .collect())
    }

    pub async fn get(&self, id: TeamId) -> Result<Team, DbError> {
        let row: TeamRow = sqlx::query_as("SELECT id, name, logo_url FROM teams WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("team", id))?;

        let mut members = self.members_for(&[id]).await?;
        Ok(row.with_members(members.remove(&id).unwrap_or_default()))
    }

    pub async fn update(&self, id: TeamId, patch: TeamPatch) -> Result<Team, DbError> {
        let (logo_supplied, logo_url) = match patch.logo_url {
            Some(value) => (true, value),
            None => (false, None),
        };

        let row: TeamRow = sqlx::query_as(
            r#"
            UPDATE teams SET
                name = COALESCE($2::text, name),
                logo_url = CASE WHEN $3::bool THEN $4::text ELSE logo_url END
            WHERE id = $1
            RETURNING id, name, logo_url
            "#,
        )
        .bind(id)
        .bind(patch.name.as_ref().map(|n| n.as_str()))
        .bind(logo_supplied)
        .bind(logo_url)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| DbError::on_write(e, "team", "name"))?
        .ok_or_else(|| DbError::not_found("team", id))?;

        let mut members = self.members_for(&[id]).await?;
        Ok(row.with_members(members.remove(&id).unwrap_or_default()))
    }

    /// Delete a team after clearing its memberships.
    ///
    /// If the clear fails the transaction is dropped and the team survives.
    pub async fn delete(&self, id: TeamId) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        lock_team(&mut *tx, id).await?;

        sqlx::query("DELETE FROM team_member_assignments WHERE team_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(DbError::AssociationClear)?;

        sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::debug!(team_id = id, "team deleted");
        Ok(())
    }

    /// Add a membership (idempotent via the composite primary key).
    pub async fn assign(&self, team: TeamId, member: MemberId) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        lock_team(&mut *tx, team).await?;
        lock_member(&mut *tx, member).await?;

        sqlx::query(
            r#"
            INSERT INTO team_member_assignments (team_id, member_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(team)
        .bind(member)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn remove(&self, team: TeamId, member: MemberId) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        lock_team(&mut *tx, team).await?;
        lock_member(&mut *tx, member).await?;

        sqlx::query("DELETE FROM team_member_assignments WHERE team_id = $1 AND member_id = $2")
            .bind(team)
            .bind(member)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Members of the given teams, grouped by team id.
    async fn members_for(&self, team_ids: &[i64]) -> Result<HashMap<i64, Vec<Member>>, DbError> {
        if team_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<AssignmentRow> = sqlx::query_as(
            r#"
            SELECT a.team_id, m.id, m.name, m.picture_url, m.email
            FROM team_member_assignments a
            JOIN team_members m ON m.id = a.member_id
            WHERE a.team_id = ANY($1)
            ORDER BY a.team_id, m.id
            "#,
        )
        .bind(team_ids)
        .fetch_all(self.pool)
        .await?;

        let mut grouped: HashMap<i64, Vec<Member>> = HashMap::new();
        for row in rows {
            grouped
                .entry(row.team_id)
                .or_default()
                .push(row.member.into());
        }

        Ok(grouped)
    }
}

/// Share-lock a team row for the rest of the transaction, or fail NotFound.
pub(crate) async fn lock_team(conn: &mut PgConnection, id: TeamId) -> Result<(), DbError> {
    sqlx::query("SELECT 1 FROM teams WHERE id = $1 FOR SHARE")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .map(|_| ())
        .ok_or_else(|| DbError::not_found("team", id))
}

pub(crate) async fn lock_member(conn: &mut PgConnection, id: MemberId) -> Result<(), DbError> {
    sqlx::query("SELECT 1 FROM team_members WHERE id = $1 FOR SHARE")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .map(|_| ())
        .ok_or_else(|| DbError::not_found("team member", id))
}
