use crate::error::DirectoryError;
use crate::user::UserId;

/// A source of authorized user identifiers (an LDAP server in production).
///
/// Implementations perform one query per call and hold no connection
/// between calls. The returned order carries no meaning.
#[async_trait::async_trait]
pub trait DirectorySource: Send + Sync {
    async fn fetch_users(&self) -> Result<Vec<UserId>, DirectoryError>;
}
