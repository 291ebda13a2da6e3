//! Feedback entries and their polymorphic target

use std::fmt;

use super::member::MemberId;
use super::team::TeamId;
use super::validation::bounded_text;
use super::ValidationError;

/// Database identity of a feedback entry
pub type FeedbackId = i64;

/// Maximum length for feedback content
const MAX_CONTENT_LEN: usize = 4000;

/// Which table a feedback target id points into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Team,
    Member,
}

impl TargetKind {
    /// Parse the wire tag (`"team"` or `"member"`), exact match.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value {
            "team" => Ok(Self::Team),
            "member" => Ok(Self::Member),
            other => Err(ValidationError::InvalidVariant {
                field: "targettype",
                value: other.to_owned(),
                expected: "'team' or 'member'",
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Team => "team",
            Self::Member => "member",
        }
    }

    /// Attach an id to this kind.
    pub fn with_id(self, id: i64) -> Target {
        match self {
            Self::Team => Target::Team(id),
            Self::Member => Target::Member(id),
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a feedback entry is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Team(TeamId),
    Member(MemberId),
}

impl Target {
    pub fn kind(&self) -> TargetKind {
        match self {
            Self::Team(_) => TargetKind::Team,
            Self::Member(_) => TargetKind::Member,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Self::Team(id) | Self::Member(id) => *id,
        }
    }
}

/// Validated feedback text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackContent(String);

impl FeedbackContent {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        bounded_text("content", s, MAX_CONTENT_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Stored feedback entry (append-only)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub id: FeedbackId,
    pub content: String,
    pub target: Target,
}

/// Input for creating feedback
#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub content: FeedbackContent,
    pub target: Target,
}

impl NewFeedback {
    /// Build from raw request fields.
    ///
    /// The target kind is checked before anything else so that a bad kind is
    /// always reported as such, whatever the id looks like.
    pub fn new(
        content: Option<String>,
        target_id: Option<i64>,
        target_type: Option<String>,
    ) -> Result<Self, ValidationError> {
        let kind = target_type
            .as_deref()
            .ok_or(ValidationError::Missing { field: "targettype" })
            .and_then(TargetKind::parse)?;
        let target_id = target_id.ok_or(ValidationError::Missing { field: "targetid" })?;
        let content = content.ok_or(ValidationError::Missing { field: "content" })?;

        Ok(Self {
            content: FeedbackContent::new(&content)?,
            target: kind.with_id(target_id),
        })
    }
}
