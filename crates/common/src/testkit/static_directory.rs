use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::directory::DirectorySource;
use crate::error::DirectoryError;
use crate::user::UserId;

/// A directory that answers with a fixed user list, or always fails.
#[derive(Debug, Default)]
pub struct StaticDirectory {
    users: Vec<UserId>,
    unreachable: bool,
    fetches: AtomicUsize,
}

impl StaticDirectory {
    /// # Panics
    ///
    /// Panics if any of `users` is not a valid identifier.
    pub fn with_users<I, S>(users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let users = users
            .into_iter()
            .map(|user| UserId::new(user).expect("test user identifiers must be valid"))
            .collect();
        Self {
            users,
            ..Default::default()
        }
    }

    /// A directory whose every fetch fails to connect
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Default::default()
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl DirectorySource for StaticDirectory {
    async fn fetch_users(&self) -> Result<Vec<UserId>, DirectoryError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.unreachable {
            return Err(DirectoryError::Connect {
                url: "ldap://unreachable.invalid".to_string(),
                source: Box::new(io::Error::new(
                    io::ErrorKind::ConnectionRefused,
                    "connection refused",
                )),
            });
        }
        Ok(self.users.clone())
    }
}
