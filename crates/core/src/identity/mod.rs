//! Who is making a request.
//!
//! Token parsing lives outside this subsystem; it only needs a resolver
//! that maps an opaque token to an [`Identity`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::draft::UserId;

/// Role granting administrative access to every draft.
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: UserId,
    pub roles: Vec<String>,
}

impl Identity {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            roles: Vec::new(),
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Resolves request tokens to identities.
pub trait IdentityResolver: Send + Sync {
    /// Returns `None` for unknown or absent tokens (anonymous viewer).
    fn resolve(&self, token: &str) -> Option<Identity>;

    fn is_admin(&self, identity: &Identity) -> bool {
        identity.has_role(ROLE_ADMIN)
    }
}

/// Resolver backed by a fixed token table.
#[derive(Debug, Clone, Default)]
pub struct TokenIdentityResolver {
    tokens: HashMap<String, Identity>,
}

impl TokenIdentityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: impl Into<String>, identity: Identity) -> Self {
        self.tokens.insert(token.into(), identity);
        self
    }
}

impl IdentityResolver for TokenIdentityResolver {
    fn resolve(&self, token: &str) -> Option<Identity> {
        self.tokens.get(token).cloned()
    }
}

/// Looks up display names for users.
pub trait UserDirectory: Send + Sync {
    /// Returns `None` when the user is unknown or has no public name.
    fn commish_name(&self, user_id: UserId) -> Option<String>;
}

/// Directory backed by a fixed id-to-name table.
#[derive(Debug, Clone, Default)]
pub struct StaticUserDirectory {
    names: HashMap<UserId, String>,
}

impl StaticUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user_id: UserId, name: impl Into<String>) -> Self {
        self.names.insert(user_id, name.into());
        self
    }
}

impl UserDirectory for StaticUserDirectory {
    fn commish_name(&self, user_id: UserId) -> Option<String> {
        self.names.get(&user_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> TokenIdentityResolver {
        TokenIdentityResolver::new()
            .with_token("commish-token", Identity::new(UserId(1)))
            .with_token("admin-token", Identity::new(UserId(2)).with_role(ROLE_ADMIN))
    }

    #[test]
    fn test_resolves_known_token() {
        let identity = resolver().resolve("commish-token").unwrap();
        assert_eq!(identity.user_id, UserId(1));
    }

    #[test]
    fn test_unknown_token_is_anonymous() {
        assert!(resolver().resolve("nope").is_none());
        assert!(resolver().resolve("").is_none());
    }

    #[test]
    fn test_admin_role() {
        let resolver = resolver();
        let admin = resolver.resolve("admin-token").unwrap();
        let commish = resolver.resolve("commish-token").unwrap();

        assert!(resolver.is_admin(&admin));
        assert!(!resolver.is_admin(&commish));
    }

    #[test]
    fn test_directory_names() {
        let directory = StaticUserDirectory::new().with_user(UserId(1), "Jordan");

        assert_eq!(directory.commish_name(UserId(1)).as_deref(), Some("Jordan"));
        assert_eq!(directory.commish_name(UserId(2)), None);
    }
}
