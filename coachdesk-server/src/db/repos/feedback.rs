//! Feedback repository
//!
//! Feedback is append-only: create and list, nothing else.

use sqlx::{FromRow, PgPool};

use super::teams::{lock_member, lock_team};
use crate::db::store::target_resource;
use crate::db::DbError;
use crate::models::{Feedback, NewFeedback, Target, TargetKind};

/// Feedback record from database
#[derive(Debug, Clone, FromRow)]
struct FeedbackRow {
    id: i64,
    content: String,
    target_id: i64,
    target_type: String,
}

impl TryFrom<FeedbackRow> for Feedback {
    type Error = DbError;

    fn try_from(row: FeedbackRow) -> Result<Self, Self::Error> {
        let kind = TargetKind::parse(&row.target_type).map_err(|e| {
            DbError::Sqlx(sqlx::Error::ColumnDecode {
                index: "target_type".to_owned(),
                source: Box::new(e),
            })
        })?;

        Ok(Self {
            id: row.id,
            content: row.content,
            target: kind.with_id(row.target_id),
        })
    }
}

/// Feedback repository
pub struct FeedbackRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> FeedbackRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert feedback once its target is confirmed to exist.
    pub async fn create(&self, new: NewFeedback) -> Result<Feedback, DbError> {
        let mut tx = self.pool.begin().await?;

        let found = match new.target {
            Target::Team(id) => lock_team(&mut *tx, id).await,
            Target::Member(id) => lock_member(&mut *tx, id).await,
        };
        found.map_err(|e| match e {
            DbError::NotFound { id, .. } => DbError::not_found(target_resource(&new.target), id),
            other => other,
        })?;

        let row: FeedbackRow = sqlx::query_as(
            r#"
            INSERT INTO feedbacks (content, target_id, target_type)
            VALUES ($1, $2, $3)
            RETURNING id, content, target_id, target_type
            "#,
        )
        .bind(new.content.as_str())
        .bind(new.target.id())
        .bind(new.target.kind().as_str())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        row.try_into()
    }

    pub async fn list(&self, target: Option<Target>) -> Result<Vec<Feedback>, DbError> {
        let rows: Vec<FeedbackRow> = sqlx::query_as(
            r#"
            SELECT id, content, target_id, target_type
            FROM feedbacks
            WHERE $1::text IS NULL OR (target_type = $1 AND target_id = $2)
            ORDER BY id
            "#,
        )
        .bind(target.map(|t| t.kind().as_str()))
        .bind(target.map(|t| t.id()))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Feedback::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{connect, PoolSettings};

    #[test]
    fn unknown_target_type_fails_decode() {
        let row = FeedbackRow {
            id: 1,
            content: "ok".into(),
            target_id: 3,
            target_type: "coach".into(),
        };
        let err = Feedback::try_from(row).unwrap_err();
        assert!(matches!(err, DbError::Sqlx(sqlx::Error::ColumnDecode { .. })));
    }

    #[test]
    fn row_maps_to_target() {
        let row = FeedbackRow {
            id: 1,
            content: "ok".into(),
            target_id: 3,
            target_type: "team".into(),
        };
        assert_eq!(Feedback::try_from(row).unwrap().target, Target::Team(3));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn missing_target_is_not_found() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = connect(&url, &PoolSettings::default())
            .await
            .expect("connect failed");

        let new = NewFeedback::new(Some("hi".into()), Some(i64::MAX), Some("member".into()))
            .unwrap();
        let err = FeedbackRepo::new(&pool).create(new).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::NotFound {
                resource: "target member",
                ..
            }
        ));
    }
}
