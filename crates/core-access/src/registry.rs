//! Token registry: issuance, resolution, revocation, and expiry sweep

use crate::directory::StageDirectory;
use crate::error::{AccessError, Result};
use crate::principal::AdminPrincipal;
use crate::token::{Token, TokenGrant};
use crate::{MAX_TEAMS_PER_TOKEN, TOKEN_ID_BYTES};
use parking_lot::RwLock;
use rand::rngs::OsRng;
use rand::RngCore;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

// Collision on 128 random bits is astronomically unlikely; the retry cap
// exists so a broken RNG cannot spin this loop forever.
const MAX_ID_RETRIES: usize = 16;

/// Registry of delegation tokens.
///
/// Issues, resolves, and revokes scoped tokens. All mutations take the
/// write lock, so identifier generation and insertion are atomic and two
/// concurrent issuances can never share an id. Revoked rows are kept as
/// administrative history and fail resolution forever after.
///
/// ## Example
///
/// ```
/// use std::collections::BTreeSet;
/// use std::sync::Arc;
/// use core_access::{
///     AdminPrincipal, InMemoryStages, Permission, Stage, TokenRegistry,
/// };
///
/// # fn example() -> core_access::Result<()> {
/// let stages = Arc::new(InMemoryStages::new());
/// stages.insert(Stage { id: 1, ends_at: 2_000_000_000 });
/// let registry = TokenRegistry::new(stages);
///
/// let issuer = AdminPrincipal::new(1, [Permission::ManageToken].into());
/// let token = registry.issue(42, 1, BTreeSet::from([100]), &issuer, 0)?;
///
/// let grant = registry.resolve(token.id())?;
/// assert_eq!(grant.tutor_id, 42);
/// # Ok(())
/// # }
/// ```
pub struct TokenRegistry {
    tokens: RwLock<BTreeMap<String, Token>>,
    stages: Arc<dyn StageDirectory>,
}

impl TokenRegistry {
    /// Create an empty registry over a stage directory
    #[must_use]
    pub fn new(stages: Arc<dyn StageDirectory>) -> Self {
        Self {
            tokens: RwLock::new(BTreeMap::new()),
            stages,
        }
    }

    /// Issue a token granting `tutor_id` review access to `team_ids`
    /// within `stage_id`.
    ///
    /// The identifier carries [`TOKEN_ID_BYTES`] bytes of OS entropy and
    /// is retried internally on collision; a collision never surfaces to
    /// the caller.
    ///
    /// # Errors
    ///
    /// - `AccessError::Forbidden` unless the actor holds `ManageToken`
    /// - `AccessError::InvalidArgument` for an empty or oversized team
    ///   set, or an unknown stage
    pub fn issue(
        &self,
        tutor_id: u32,
        stage_id: u32,
        team_ids: BTreeSet<u32>,
        actor: &AdminPrincipal,
        now: u64,
    ) -> Result<Token> {
        if !actor.has(crate::Permission::ManageToken) {
            warn!(admin = actor.admin_id, "rejected token issuance without ManageToken");
            return Err(AccessError::Forbidden);
        }
        if team_ids.is_empty() {
            return Err(AccessError::InvalidArgument(
                "token team set must not be empty".into(),
            ));
        }
        if team_ids.len() > MAX_TEAMS_PER_TOKEN {
            return Err(AccessError::InvalidArgument(format!(
                "token team set exceeds maximum {MAX_TEAMS_PER_TOKEN} teams (size: {})",
                team_ids.len()
            )));
        }
        if self.stages.find_by_id(stage_id).is_none() {
            return Err(AccessError::InvalidArgument(format!(
                "unknown stage {stage_id}"
            )));
        }

        // Generate and insert under one write-lock hold so concurrent
        // issuances cannot race the same identifier.
        let mut tokens = self.tokens.write();
        for _ in 0..MAX_ID_RETRIES {
            let id = generate_token_id();
            if tokens.contains_key(&id) {
                debug!("token identifier collision, retrying");
                continue;
            }
            let token = Token::new(id.clone(), tutor_id, stage_id, team_ids, now);
            tokens.insert(id, token.clone());
            info!(
                tutor = tutor_id,
                stage = stage_id,
                teams = token.team_ids().len(),
                "issued token"
            );
            return Ok(token);
        }
        Err(AccessError::IdGeneration)
    }

    /// Resolve a bearer string to the scope it grants.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::Unauthenticated` for unknown, malformed, and
    /// revoked tokens alike; the error never reveals which. Never panics
    /// on arbitrary input.
    pub fn resolve(&self, bearer: &str) -> Result<TokenGrant> {
        let tokens = self.tokens.read();
        match tokens.get(bearer) {
            Some(token) if !token.is_revoked() => Ok(token.grant()),
            Some(_) => {
                debug!("resolution of revoked token rejected");
                Err(AccessError::Unauthenticated)
            }
            None => Err(AccessError::Unauthenticated),
        }
    }

    /// Revoke a token. Idempotent on an already-revoked token.
    ///
    /// # Errors
    ///
    /// - `AccessError::Forbidden` unless the actor holds `ManageToken`
    /// - `AccessError::NotFound` for an unknown identifier
    pub fn revoke(&self, bearer: &str, actor: &AdminPrincipal) -> Result<()> {
        if !actor.has(crate::Permission::ManageToken) {
            warn!(admin = actor.admin_id, "rejected token revocation without ManageToken");
            return Err(AccessError::Forbidden);
        }
        let mut tokens = self.tokens.write();
        let token = tokens.get_mut(bearer).ok_or(AccessError::NotFound)?;
        token.revoke();
        info!(tutor = token.tutor_id(), stage = token.stage_id(), "revoked token");
        Ok(())
    }

    /// All unrevoked tokens, ordered by identifier
    #[must_use]
    pub fn list_active(&self) -> Vec<Token> {
        let tokens = self.tokens.read();
        tokens.values().filter(|t| !t.is_revoked()).cloned().collect()
    }

    /// All revoked tokens (history), ordered by identifier
    #[must_use]
    pub fn list_revoked(&self) -> Vec<Token> {
        let tokens = self.tokens.read();
        tokens.values().filter(|t| t.is_revoked()).cloned().collect()
    }

    /// Revoke every token whose stage has ended, returning the count.
    ///
    /// A token bound to a stage the directory no longer knows is treated
    /// as expired. Safe to run concurrently with issue/resolve/revoke
    /// traffic; intended for a low-frequency periodic task.
    pub fn sweep_expired(&self, now: u64) -> usize {
        let mut tokens = self.tokens.write();
        let mut swept = 0;
        for token in tokens.values_mut().filter(|t| !t.is_revoked()) {
            let ended = match self.stages.find_by_id(token.stage_id()) {
                Some(stage) => stage.has_ended(now),
                None => true,
            };
            if ended {
                token.revoke();
                swept += 1;
            }
        }
        if swept > 0 {
            info!(count = swept, "revoked tokens for ended stages");
        }
        swept
    }
}

fn generate_token_id() -> String {
    let mut bytes = [0u8; TOKEN_ID_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_id_shape() {
        let id = generate_token_id();
        // 16 bytes hex-encoded: 32 URL-safe characters
        assert_eq!(id.len(), TOKEN_ID_BYTES * 2);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
