//! Resolved request principals

use crate::permission::Permission;
use std::collections::BTreeSet;

/// An authenticated administrator with their permission set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminPrincipal {
    /// Administrator account id
    pub admin_id: u32,
    /// Capabilities held by this administrator
    pub permissions: BTreeSet<Permission>,
}

impl AdminPrincipal {
    /// Create an administrator principal
    #[must_use]
    pub fn new(admin_id: u32, permissions: BTreeSet<Permission>) -> Self {
        Self {
            admin_id,
            permissions,
        }
    }

    /// Whether this administrator holds a permission
    #[must_use]
    pub fn has(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    /// Whether this administrator's set contains every permission in
    /// `requested`. Used for the grant-subset rule: an administrator may
    /// only grant permissions they hold themselves.
    #[must_use]
    pub fn holds_all(&self, requested: &BTreeSet<Permission>) -> bool {
        requested.is_subset(&self.permissions)
    }
}

/// Ephemeral token-scoped principal.
///
/// Built fresh on every authentication from the token's grant; never
/// persisted, and never carries administrator permissions regardless of
/// the underlying tutor's other roles. The scope is exactly the one
/// stage and team allow-list baked into the token at issuance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPrincipal {
    /// Tutor the token was issued to
    pub tutor_id: u32,
    /// The single stage this principal may review in
    pub stage_id: u32,
    /// Teams this principal may review
    pub team_ids: BTreeSet<u32>,
}

impl TokenPrincipal {
    /// Whether a team is inside this principal's allow-list
    #[must_use]
    pub fn allows_team(&self, team_id: u32) -> bool {
        self.team_ids.contains(&team_id)
    }
}

/// Any resolved actor: an administrator or a token-scoped tutor.
///
/// Passed explicitly to every evaluator and service call; there is no
/// ambient "current principal" anywhere in the system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    /// Administrator with a permission set
    Administrator(AdminPrincipal),
    /// Tutor scoped by a delegation token
    Tutor(TokenPrincipal),
}

impl From<AdminPrincipal> for Principal {
    fn from(admin: AdminPrincipal) -> Self {
        Self::Administrator(admin)
    }
}

impl From<TokenPrincipal> for Principal {
    fn from(tutor: TokenPrincipal) -> Self {
        Self::Tutor(tutor)
    }
}
