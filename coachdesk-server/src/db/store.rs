//! Storage seam used by the HTTP handlers
//!
//! Handlers only ever see `Arc<dyn Store>`, so the Postgres backend and the
//! in-memory backend are interchangeable.

use async_trait::async_trait;

use super::DbError;
use crate::models::{
    Feedback, Member, MemberId, MemberPatch, NewFeedback, NewMember, NewTeam, Target, Team,
    TeamId, TeamPatch,
};

#[async_trait]
pub trait Store: Send + Sync + 'static {
    async fn create_member(&self, new: NewMember) -> Result<Member, DbError>;

    /// All members, ordered by id.
    async fn list_members(&self) -> Result<Vec<Member>, DbError>;

    async fn get_member(&self, id: MemberId) -> Result<Member, DbError>;

    /// Merge `patch` into the member and return the stored result.
    async fn update_member(&self, id: MemberId, patch: MemberPatch) -> Result<Member, DbError>;

    /// Remove a member and its team memberships. Feedback about the member is kept.
    async fn delete_member(&self, id: MemberId) -> Result<(), DbError>;

    async fn create_team(&self, new: NewTeam) -> Result<Team, DbError>;

    /// All teams with members embedded, ordered by id.
    async fn list_teams(&self) -> Result<Vec<Team>, DbError>;

    async fn get_team(&self, id: TeamId) -> Result<Team, DbError>;

    async fn update_team(&self, id: TeamId, patch: TeamPatch) -> Result<Team, DbError>;

    /// Clear the team's member associations, then remove the team.
    ///
    /// Either both happen or neither does.
    async fn delete_team(&self, id: TeamId) -> Result<(), DbError>;

    /// Add a membership. Assigning an existing member again is a no-op.
    async fn assign_member(&self, team: TeamId, member: MemberId) -> Result<(), DbError>;

    /// Drop a membership if present.
    async fn remove_member(&self, team: TeamId, member: MemberId) -> Result<(), DbError>;

    /// Persist feedback after checking its target exists.
    async fn create_feedback(&self, new: NewFeedback) -> Result<Feedback, DbError>;

    /// Feedback ordered by id, optionally restricted to one target.
    async fn list_feedback(&self, target: Option<Target>) -> Result<Vec<Feedback>, DbError>;
}

/// Not-found resource label for a feedback target.
pub(crate) fn target_resource(target: &Target) -> &'static str {
    match target {
        Target::Team(_) => "target team",
        Target::Member(_) => "target member",
    }
}
