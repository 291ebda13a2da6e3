//! PostgreSQL-backed [`Store`]

use async_trait::async_trait;
use sqlx::PgPool;

use super::repos::{FeedbackRepo, MemberRepo, TeamRepo};
use super::{DbError, Store};
use crate::models::{
    Feedback, Member, MemberId, MemberPatch, NewFeedback, NewMember, NewTeam, Target, Team,
    TeamId, TeamPatch,
};

/// Store over a shared connection pool; cheap to clone.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_member(&self, new: NewMember) -> Result<Member, DbError> {
        MemberRepo::new(&self.pool).create(new).await
    }

    async fn list_members(&self) -> Result<Vec<Member>, DbError> {
        MemberRepo::new(&self.pool).list().await
    }

    async fn get_member(&self, id: MemberId) -> Result<Member, DbError> {
        MemberRepo::new(&self.pool).get(id).await
    }

    async fn update_member(&self, id: MemberId, patch: MemberPatch) -> Result<Member, DbError> {
        MemberRepo::new(&self.pool).update(id, patch).await
    }

    async fn delete_member(&self, id: MemberId) -> Result<(), DbError> {
        MemberRepo::new(&self.pool).delete(id).await
    }

    async fn create_team(&self, new: NewTeam) -> Result<Team, DbError> {
        TeamRepo::new(&self.pool).create(new).await
    }

    async fn list_teams(&self) -> Result<Vec<Team>, DbError> {
        TeamRepo::new(&self.pool).list().await
    }

    async fn get_team(&self, id: TeamId) -> Result<Team, DbError> {
        TeamRepo::new(&self.pool).get(id).await
    }

    async fn update_team(&self, id: TeamId, patch: TeamPatch) -> Result<Team, DbError> {
        TeamRepo::new(&self.pool).update(id, patch).await
    }

    async fn delete_team(&self, id: TeamId) -> Result<(), DbError> {
        TeamRepo::new(&self.pool).delete(id).await
    }

    async fn assign_member(&self, team: TeamId, member: MemberId) -> Result<(), DbError> {
        TeamRepo::new(&self.pool).assign(team, member).await
    }

    async fn remove_member(&self, team: TeamId, member: MemberId) -> Result<(), DbError> {
        TeamRepo::new(&self.pool).remove(team, member).await
    }

    async fn create_feedback(&self, new: NewFeedback) -> Result<Feedback, DbError> {
        FeedbackRepo::new(&self.pool).create(new).await
    }

    async fn list_feedback(&self, target: Option<Target>) -> Result<Vec<Feedback>, DbError> {
        FeedbackRepo::new(&self.pool).list(target).await
    }
}
