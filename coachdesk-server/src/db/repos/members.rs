//! Team member repository
//!
//! - create: plain INSERT, unique email reported as a conflict
//! - update/delete: single statement, a missing row is NotFound

use sqlx::{FromRow, PgPool};

use crate::db::DbError;
use crate::models::{Member, MemberId, MemberPatch, NewMember};

/// Member record from database
#[derive(Debug, Clone, FromRow)]
pub(crate) struct MemberRow {
    pub id: i64,
    pub name: String,
    pub picture_url: Option<String>,
    pub email: String,
}

impl From<MemberRow> for Member {
    fn from(row: MemberRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            picture_url: row.picture_url,
            email: row.email,
        }
    }
}

/// Member repository
pub struct MemberRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> MemberRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: NewMember) -> Result<Member, DbError> {
        let row: MemberRow = sqlx::query_as(
            r#"
            INSERT INTO team_members (name, picture_url, email)
            VALUES ($1, $2, $3)
            RETURNING id, name, picture_url, email
            "#,
        )
        .bind(new.name.as_str())
        .bind(new.picture_url.as_deref())
        .bind(new.email.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(|e| DbError::on_write(e, "team member", "email"))?;

        Ok(row.into())
    }

    pub async fn list(&self) -> Result<Vec<Member>, DbError> {
        let rows: Vec<MemberRow> = sqlx::query_as(
            "SELECT id, name, picture_url, email FROM team_members ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Member::from).collect())
    }

    pub async fn get(&self, id: MemberId) -> Result<Member, DbError> {
        let row: MemberRow = sqlx::query_as(
            "SELECT id, name, picture_url, email FROM team_members WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("team member", id))?;

        Ok(row.into())
    }

    /// Merge supplied fields in one UPDATE.
    ///
    /// `$3` says whether the picture was supplied at all, so `NULL` in `$4`
    /// can mean "clear it".
    pub async fn update(&self, id: MemberId, patch: MemberPatch) -> Result<Member, DbError> {
        let (picture_supplied, picture_url) = match patch.picture_url {
            Some(value) => (true, value),
            None => (false, None),
        };

        let row: MemberRow = sqlx::query_as(
            r#"
            UPDATE team_members SET
                name = COALESCE($2::text, name),
                picture_url = CASE WHEN $3::bool THEN $4::text ELSE picture_url END,
                email = COALESCE($5::text, email)
            WHERE id = $1
            RETURNING id, name, picture_url, email
            "#,
        )
        .bind(id)
        .bind(patch.name.as_ref().map(|n| n.as_str()))
        .bind(picture_supplied)
        .bind(picture_url)
        .bind(patch.email.as_ref().map(|e| e.as_str()))
        .fetch_optional(self.pool)
        .await
        .map_err(|e| DbError::on_write(e, "team member", "email"))?
        .ok_or_else(|| DbError::not_found("team member", id))?;

        Ok(row.into())
    }

    /// Delete a member. Memberships go with it (ON DELETE CASCADE).
    pub async fn delete(&self, id: MemberId) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM team_members WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("team member", id));
        }

        Ok(())
    }
}
