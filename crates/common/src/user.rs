//! Directory user identifiers.
//!
//! A [`UserId`] ends up verbatim as a path segment under the shared home
//! root, so anything that could escape that segment is refused at
//! construction time.

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

/// Reasons a directory value cannot be used as a user identifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidUserId {
    #[error("user identifier is empty")]
    Empty,
    #[error("user identifier {0:?} is a relative path component")]
    Relative(String),
    #[error("user identifier {0:?} contains a path separator")]
    Separator(String),
    #[error("user identifier {0:?} contains a control character")]
    Control(String),
}

/// A validated user identifier, as read from the directory `uid` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Result<Self, InvalidUserId> {
        let value = value.into();
        if value.is_empty() {
            return Err(InvalidUserId::Empty);
        }
        if value == "." || value == ".." {
            return Err(InvalidUserId::Relative(value));
        }
        if value.contains(['/', '\\']) {
            return Err(InvalidUserId::Separator(value));
        }
        if value.chars().any(char::is_control) {
            return Err(InvalidUserId::Control(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for UserId {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromStr for UserId {
    type Err = InvalidUserId;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
