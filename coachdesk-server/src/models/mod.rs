//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod member;
pub mod team;
pub mod feedback;

pub use validation::ValidationError;
pub use member::{Email, Member, MemberId, MemberName, MemberPatch, NewMember};
pub use team::{NewTeam, Team, TeamId, TeamName, TeamPatch};
pub use feedback::{Feedback, FeedbackContent, FeedbackId, NewFeedback, Target, TargetKind};
