//! LDAP implementation of the directory capability.

use ldap3::{Ldap, LdapConnAsync, Scope, SearchEntry};

use common::prelude::{DirectoryError, DirectorySource, UserId};

use crate::config::LdapConfig;

/// Attribute carrying the user identifier
const UID_ATTRIBUTE: &str = "uid";

/// Fetches user identifiers with one simple bind and one subtree search.
#[derive(Debug, Clone)]
pub struct LdapDirectory {
    config: LdapConfig,
}

impl LdapDirectory {
    pub fn new(config: LdapConfig) -> Self {
        Self { config }
    }

    async fn search(&self, ldap: &mut Ldap) -> Result<Vec<UserId>, DirectoryError> {
        ldap.simple_bind(&self.config.bind_dn, &self.config.password)
            .await
            .and_then(|result| result.success())
            .map_err(|e| DirectoryError::Bind {
                principal: self.config.bind_dn.clone(),
                source: Box::new(e),
            })?;

        let (entries, _) = ldap
            .search(
                &self.config.search_base,
                Scope::Subtree,
                &self.config.filter,
                vec![UID_ATTRIBUTE],
            )
            .await
            .and_then(|result| result.success())
            .map_err(|e| DirectoryError::Search {
                base: self.config.search_base.clone(),
                source: Box::new(e),
            })?;

        Ok(users_from_entries(
            entries.into_iter().map(SearchEntry::construct),
        ))
    }
}

#[async_trait::async_trait]
impl DirectorySource for LdapDirectory {
    async fn fetch_users(&self) -> Result<Vec<UserId>, DirectoryError> {
        let (conn, mut ldap) = LdapConnAsync::new(&self.config.url)
            .await
            .map_err(|e| DirectoryError::Connect {
                url: self.config.url.clone(),
                source: Box::new(e),
            })?;
        ldap3::drive!(conn);

        let result = self.search(&mut ldap).await;

        // The outcome is already decided; a failed unbind must not replace it.
        if let Err(e) = ldap.unbind().await {
            tracing::warn!(error = %e, "failed to unbind from directory");
        }

        result
    }
}

/// First `uid` value of every entry that has one. Values that cannot be
/// used as a path segment are logged and dropped.
pub(crate) fn users_from_entries(entries: impl IntoIterator<Item = SearchEntry>) -> Vec<UserId> {
    entries
        .into_iter()
        .filter_map(|entry| {
            let uid = entry
                .attrs
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(UID_ATTRIBUTE))
                .and_then(|(_, values)| values.first())?;
            match UserId::new(uid.as_str()) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!(dn = %entry.dn, error = %e, "skipping directory entry");
                    None
                }
            }
        })
        .collect()
}
