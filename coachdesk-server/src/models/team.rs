//! Team records and their validated inputs

use super::member::Member;
use super::validation::{bounded_text, optional_reference, patch_reference};
use super::ValidationError;

/// Database identity of a team
pub type TeamId = i64;

/// Maximum length for team names
const MAX_NAME_LEN: usize = 128;

/// Maximum length for logo references
const MAX_LOGO_LEN: usize = 2048;

/// Stored team with its members eagerly loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub logo_url: Option<String>,
    pub members: Vec<Member>,
}

/// Validated team name (unique across teams)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamName(String);

impl TeamName {
    /// Create a team name.
    ///
    /// # Rules
    /// - Non-empty (after trimming whitespace)
    /// - Max 128 characters
    ///
    /// # Example
    /// ```
    /// use coachdesk_server::models::TeamName;
    ///
    /// assert!(TeamName::new("Falcons").is_ok());
    /// assert!(TeamName::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        bounded_text("name", s, MAX_NAME_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Input for creating a team
#[derive(Debug, Clone)]
pub struct NewTeam {
    pub name: TeamName,
    pub logo_url: Option<String>,
}

impl NewTeam {
    pub fn new(name: Option<String>, logo_url: Option<String>) -> Result<Self, ValidationError> {
        let name = name.ok_or(ValidationError::Missing { field: "name" })?;

        Ok(Self {
            name: TeamName::new(&name)?,
            logo_url: optional_reference("logourl", logo_url, MAX_LOGO_LEN)?,
        })
    }
}

/// Presence-aware team update; `logo_url: Some(None)` clears the logo.
#[derive(Debug, Clone, Default)]
pub struct TeamPatch {
    pub name: Option<TeamName>,
    pub logo_url: Option<Option<String>>,
}

impl TeamPatch {
    pub fn new(
        name: Option<String>,
        logo_url: Option<Option<String>>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            name: name.as_deref().map(TeamName::new).transpose()?,
            logo_url: patch_reference("logourl", logo_url, MAX_LOGO_LEN)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.logo_url.is_none()
    }

    pub fn apply(&self, team: &mut Team) {
        if let Some(name) = &self.name {
            team.name = name.as_str().to_owned();
        }
        if let Some(logo_url) = &self.logo_url {
            team.logo_url = logo_url.clone();
        }
    }
}
