//! In-memory [`Store`] for tests and database-less runs
//!
//! Mirrors the Postgres schema rules: unique member email and team name,
//! one row per membership, memberships dropped with their member, and
//! feedback left behind when its target goes away.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::store::target_resource;
use super::{DbError, Store};
use crate::models::{
    Feedback, FeedbackId, Member, MemberId, MemberPatch, NewFeedback, NewMember, NewTeam, Target,
    Team, TeamId, TeamPatch,
};

#[derive(Debug, Clone)]
struct TeamRecord {
    name: String,
    logo_url: Option<String>,
}

#[derive(Debug, Default)]
struct Tables {
    members: BTreeMap<MemberId, Member>,
    teams: BTreeMap<TeamId, TeamRecord>,
    assignments: BTreeSet<(TeamId, MemberId)>,
    feedback: BTreeMap<FeedbackId, Feedback>,
    next_member_id: MemberId,
    next_team_id: TeamId,
    next_feedback_id: FeedbackId,
}

impl Tables {
    fn email_taken(&self, email: &str, except: Option<MemberId>) -> bool {
        self.members
            .values()
            .any(|m| m.email == email && Some(m.id) != except)
    }

    fn team_name_taken(&self, name: &str, except: Option<TeamId>) -> bool {
        self.teams
            .iter()
            .any(|(id, t)| t.name == name && Some(*id) != except)
    }

    fn team(&self, id: TeamId) -> Result<Team, DbError> {
        let record = self
            .teams
            .get(&id)
            .ok_or_else(|| DbError::not_found("team", id))?;

        let members = self
            .assignments
            .range((id, MemberId::MIN)..=(id, MemberId::MAX))
            .filter_map(|(_, member_id)| self.members.get(member_id).cloned())
            .collect();

        Ok(Team {
            id,
            name: record.name.clone(),
            logo_url: record.logo_url.clone(),
            members,
        })
    }

    fn require_team(&self, id: TeamId) -> Result<(), DbError> {
        if self.teams.contains_key(&id) {
            Ok(())
        } else {
            Err(DbError::not_found("team", id))
        }
    }

    fn require_member(&self, id: MemberId) -> Result<(), DbError> {
        if self.members.contains_key(&id) {
            Ok(())
        } else {
            Err(DbError::not_found("team member", id))
        }
    }
}

/// Store holding everything behind one lock; ids start at 1.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_member(&self, new: NewMember) -> Result<Member, DbError> {
        let mut tables = self.tables.write().await;

        if tables.email_taken(new.email.as_str(), None) {
            return Err(DbError::Conflict {
                resource: "team member",
                field: "email",
            });
        }

        let member = Member {
            id: next_id(&mut tables.next_member_id),
            name: new.name.into_string(),
            picture_url: new.picture_url,
            email: new.email.into_string(),
        };
        tables.members.insert(member.id, member.clone());
        Ok(member)
    }

    async fn list_members(&self) -> Result<Vec<Member>, DbError> {
        Ok(self.tables.read().await.members.values().cloned().collect())
    }

    async fn get_member(&self, id: MemberId) -> Result<Member, DbError> {
        self.tables
            .read()
            .await
            .members
            .get(&id)
            .cloned()
            .ok_or_else(|| DbError::not_found("team member", id))
    }

    async fn update_member(&self, id: MemberId, patch: MemberPatch) -> Result<Member, DbError> {
        let mut tables = self.tables.write().await;
        tables.require_member(id)?;

        if let Some(email) = &patch.email {
            if tables.email_taken(email.as_str(), Some(id)) {
                return Err(DbError::Conflict {
                    resource: "team member",
                    field: "email",
                });
            }
        }

        let member = tables
            .members
            .get_mut(&id)
            .ok_or_else(|| DbError::not_found("team member", id))?;
        patch.apply(member);
        Ok(member.clone())
    }

    async fn delete_member(&self, id: MemberId) -> Result<(), DbError> {
        let mut tables = self.tables.write().await;

        tables
            .members
            .remove(&id)
            .ok_or_else(|| DbError::not_found("team member", id))?;
        tables.assignments.retain(|(_, member)| *member != id);
        Ok(())
    }

    async fn create_team(&self, new: NewTeam) -> Result<Team, DbError> {
        let mut tables = self.tables.write().await;

        if tables.team_name_taken(new.name.as_str(), None) {
            return Err(DbError::Conflict {
                resource: "team",
                field: "name",
            });
        }

        let id = next_id(&mut tables.next_team_id);
        tables.teams.insert(
            id,
            TeamRecord {
                name: new.name.into_string(),
                logo_url: new.logo_url,
            },
        );
        tables.team(id)
    }

    async fn list_teams(&self) -> Result<Vec<Team>, DbError> {
        let tables = self.tables.read().await;
        tables.teams.keys().map(|id| tables.team(*id)).collect()
    }

    async fn get_team(&self, id: TeamId) -> Result<Team, DbError> {
        self.tables.read().await.team(id)
    }

    async fn update_team(&self, id: TeamId, patch: TeamPatch) -> Result<Team, DbError> {
        let mut tables = self.tables.write().await;
        let mut team = tables.team(id)?;

        if let Some(name) = &patch.name {
            if tables.team_name_taken(name.as_str(), Some(id)) {
                return Err(DbError::Conflict {
                    resource: "team",
                    field: "name",
                });
            }
        }

        patch.apply(&mut team);
        tables.teams.insert(
            id,
            TeamRecord {
                name: team.name.clone(),
                logo_url: team.logo_url.clone(),
            },
        );
        Ok(team)
    }

    async fn delete_team(&self, id: TeamId) -> Result<(), DbError> {
        let mut tables = self.tables.write().await;
        tables.require_team(id)?;

        tables.assignments.retain(|(team, _)| *team != id);
        tables.teams.remove(&id);
        Ok(())
    }

    async fn assign_member(&self, team: TeamId, member: MemberId) -> Result<(), DbError> {
        let mut tables = self.tables.write().await;
        tables.require_team(team)?;
        tables.require_member(member)?;

        tables.assignments.insert((team, member));
        Ok(())
    }

    async fn remove_member(&self, team: TeamId, member: MemberId) -> Result<(), DbError> {
        let mut tables = self.tables.write().await;
        tables.require_team(team)?;
        tables.require_member(member)?;

        tables.assignments.remove(&(team, member));
        Ok(())
    }

    async fn create_feedback(&self, new: NewFeedback) -> Result<Feedback, DbError> {
        let mut tables = self.tables.write().await;

        let exists = match new.target {
            Target::Team(id) => tables.teams.contains_key(&id),
            Target::Member(id) => tables.members.contains_key(&id),
        };
        if !exists {
            return Err(DbError::not_found(
                target_resource(&new.target),
                new.target.id(),
            ));
        }

        let feedback = Feedback {
            id: next_id(&mut tables.next_feedback_id),
            content: new.content.into_string(),
            target: new.target,
        };
        tables.feedback.insert(feedback.id, feedback.clone());
        Ok(feedback)
    }

    async fn list_feedback(&self, target: Option<Target>) -> Result<Vec<Feedback>, DbError> {
        let tables = self.tables.read().await;

        Ok(tables
            .feedback
            .values()
            .filter(|f| target.map_or(true, |t| f.target == t))
            .cloned()
            .collect())
    }
}
