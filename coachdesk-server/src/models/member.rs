//! Team member records and their validated inputs

use super::validation::{bounded_text, optional_reference, patch_reference};
use super::ValidationError;

/// Database identity of a team member
pub type MemberId = i64;

/// Maximum length for member names
const MAX_NAME_LEN: usize = 128;

/// Maximum length for email addresses (RFC 5321 path limit)
const MAX_EMAIL_LEN: usize = 254;

/// Maximum length for picture references
const MAX_PICTURE_LEN: usize = 2048;

/// Stored team member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub picture_url: Option<String>,
    pub email: String,
}

/// Validated member display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberName(String);

impl MemberName {
    /// Create a member name.
    ///
    /// # Rules
    /// - Non-empty (after trimming whitespace)
    /// - Max 128 characters
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

/// Member email address.
///
/// Only emptiness and length are checked here; uniqueness is enforced by the
/// store and format is left to whoever sends the invitation mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        bounded_text("email", s, MAX_EMAIL_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Input for creating a member
#[derive(Debug, Clone)]
pub struct NewMember {
    pub name: MemberName,
    pub picture_url: Option<String>,
    pub email: Email,
}

impl NewMember {
    pub fn new(
        name: Option<String>,
        picture_url: Option<String>,
        email: Option<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.ok_or(ValidationError::Missing { field: "name" })?;
        let email = email.ok_or(ValidationError::Missing { field: "email" })?;

        Ok(Self {
            name: MemberName::new(&name)?,
            picture_url: optional_reference("pictureurl", picture_url, MAX_PICTURE_LEN)?,
            email: Email::new(&email)?,
        })
    }
}

/// Presence-aware member update.
///
/// `None` leaves a field untouched. For the picture, `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct MemberPatch {
    pub name: Option<MemberName>,
    pub picture_url: Option<Option<String>>,
    pub email: Option<Email>,
}

impl MemberPatch {
    pub fn new(
        name: Option<String>,
        picture_url: Option<Option<String>>,
        email: Option<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            name: name.as_deref().map(MemberName::new).transpose()?,
            picture_url: patch_reference("pictureurl", picture_url, MAX_PICTURE_LEN)?,
            email: email.as_deref().map(Email::new).transpose()?,
        })
    }

    /// True when the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.picture_url.is_none() && self.email.is_none()
    }

    /// Merge the supplied fields into an existing record.
    pub fn apply(&self, member: &mut Member) {
        if let Some(name) = &self.name {
            member.name = name.as_str().to_owned();
        }
        if let Some(picture_url) = &self.picture_url {
            member.picture_url = picture_url.clone();
        }
        if let Some(email) = &self.email {
            member.email = email.as_str().to_owned();
        }
    }
}
