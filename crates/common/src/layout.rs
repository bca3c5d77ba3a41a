//! Filesystem namespace layout for provisioned users.
//!
//! ```text
//! /user                          shared root
//! /user/{uid}                    private home
//! /user/{uid}/s3credential       generated secret
//! ```

use std::fmt;

use crate::user::UserId;

/// Shared root holding every user home
pub const HOME_ROOT: &str = "/user";
/// File name of the per-user secret inside the home directory
pub const SECRET_FILE_NAME: &str = "s3credential";

/// An absolute path in the distributed filesystem namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourcePath(String);

impl ResourcePath {
    /// The shared home root
    pub fn root() -> Self {
        Self(HOME_ROOT.to_string())
    }

    /// Home directory of `user`
    pub fn home(user: &UserId) -> Self {
        Self::root().join(user)
    }

    /// Secret file of `user`
    pub fn secret(user: &UserId) -> Self {
        Self::home(user).join(SECRET_FILE_NAME)
    }

    fn join(&self, segment: &str) -> Self {
        Self(format!("{}/{}", self.0.trim_end_matches('/'), segment))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ResourcePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
