//! Bearer token to principal resolution

use crate::directory::TutorDirectory;
use crate::error::{AccessError, Result};
use crate::principal::TokenPrincipal;
use crate::registry::TokenRegistry;
use std::sync::Arc;
use tracing::{debug, info};

/// Resolves bearer credentials to ephemeral token-scoped principals.
///
/// The transport layer extracts the bearer string (header or parameter)
/// and hands it here. Resolution is two steps: registry lookup, then a
/// tutor-existence check against the directory. Both failure modes
/// collapse to `Unauthenticated` with no further detail.
///
/// The resulting principal is not a tutor session: it is scoped strictly
/// to the one stage and team allow-list baked into the token, and carries
/// no administrator permissions regardless of the tutor's other roles.
pub struct TokenAuthenticator {
    registry: Arc<TokenRegistry>,
    tutors: Arc<dyn TutorDirectory>,
}

impl TokenAuthenticator {
    /// Create an authenticator over a registry and tutor directory
    #[must_use]
    pub fn new(registry: Arc<TokenRegistry>, tutors: Arc<dyn TutorDirectory>) -> Self {
        Self { registry, tutors }
    }

    /// Resolve a bearer string to a token-scoped principal.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::Unauthenticated` for any failure: malformed
    /// or unknown bearer, revoked token, or a tutor that no longer
    /// exists. Never panics on arbitrary input.
    pub fn authenticate(&self, bearer: &str) -> Result<TokenPrincipal> {
        let grant = self.registry.resolve(bearer)?;

        if self.tutors.find_by_id(grant.tutor_id).is_none() {
            info!(tutor = grant.tutor_id, "token names a tutor that no longer exists");
            return Err(AccessError::Unauthenticated);
        }

        debug!(
            tutor = grant.tutor_id,
            stage = grant.stage_id,
            teams = grant.team_ids.len(),
            "authenticated token principal"
        );
        Ok(TokenPrincipal {
            tutor_id: grant.tutor_id,
            stage_id: grant.stage_id,
            team_ids: grant.team_ids,
        })
    }
}
