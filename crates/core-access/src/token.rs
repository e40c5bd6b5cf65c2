//! Delegation token records

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A scoped delegation token.
///
/// Binds one tutor to one stage and an explicit team allow-list. The
/// allow-list is fixed at creation; a token's capability can never be
/// widened. Once revoked, a token never becomes active again, but the
/// record is kept for administrative history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    id: String,
    tutor_id: u32,
    stage_id: u32,
    team_ids: BTreeSet<u32>,
    revoked: bool,
    created_at: u64,
}

impl Token {
    pub(crate) fn new(
        id: String,
        tutor_id: u32,
        stage_id: u32,
        team_ids: BTreeSet<u32>,
        created_at: u64,
    ) -> Self {
        Self {
            id,
            tutor_id,
            stage_id,
            team_ids,
            revoked: false,
            created_at,
        }
    }

    /// The opaque bearer identifier
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Tutor the token was issued to
    #[must_use]
    pub const fn tutor_id(&self) -> u32 {
        self.tutor_id
    }

    /// Stage the token is bound to
    #[must_use]
    pub const fn stage_id(&self) -> u32 {
        self.stage_id
    }

    /// The fixed team allow-list
    #[must_use]
    pub const fn team_ids(&self) -> &BTreeSet<u32> {
        &self.team_ids
    }

    /// Whether the token has been revoked
    #[must_use]
    pub const fn is_revoked(&self) -> bool {
        self.revoked
    }

    /// Unix timestamp of issuance
    #[must_use]
    pub const fn created_at(&self) -> u64 {
        self.created_at
    }

    pub(crate) fn revoke(&mut self) {
        self.revoked = true;
    }

    pub(crate) fn grant(&self) -> TokenGrant {
        TokenGrant {
            tutor_id: self.tutor_id,
            stage_id: self.stage_id,
            team_ids: self.team_ids.clone(),
        }
    }
}

/// The scope a resolved token grants.
///
/// Projection of an active token row handed to the authentication
/// resolver; carries no revocation or bookkeeping state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    /// Tutor the token was issued to
    pub tutor_id: u32,
    /// Stage the token is bound to
    pub stage_id: u32,
    /// Teams the token may review
    pub team_ids: BTreeSet<u32>,
}
