//! Review workflow service

use crate::error::Result;
use core_access::{
    evaluate, AccessError, AccessRequest, Permission, Principal, TeamDirectory, Token,
    TokenAuthenticator, TokenRegistry, TutorDirectory,
};
use core_review::{Review, ReviewActor, ReviewKey, ReviewStore};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Composed review workflow.
///
/// Wires the token registry, authentication resolver, review store, and
/// the tutor and team directories behind the operations the outer
/// surfaces call. Each
/// operation maps to one [`AccessRequest`] shape, so the authorization
/// rules live in one place instead of at every call site.
///
/// ## Example
///
/// ```
/// use std::collections::BTreeSet;
/// use std::sync::Arc;
/// use core_access::{
///     AdminPrincipal, InMemoryStages, InMemoryTeams, InMemoryTutors,
///     Permission, Principal, Stage, Team, TokenRegistry, Tutor,
/// };
/// use core_credential::Credential;
/// use core_review::{ReviewKey, ReviewStore};
/// use review_engine::ReviewService;
///
/// # fn example() -> review_engine::Result<()> {
/// let stages = Arc::new(InMemoryStages::new());
/// stages.insert(Stage { id: 1, ends_at: 2_000_000_000 });
/// let tutors = Arc::new(InMemoryTutors::new());
/// tutors.insert(Tutor {
///     id: 42,
///     username: "mentor".into(),
///     display_name: "Mentor".into(),
///     email: None,
///     phone: None,
///     credential: Credential::from(String::new()),
/// });
/// let teams = Arc::new(InMemoryTeams::new());
/// teams.insert(Team { id: 100, name: "rustaceans".into() });
///
/// let service = ReviewService::new(
///     Arc::new(TokenRegistry::new(stages)),
///     Arc::new(ReviewStore::new()),
///     tutors,
///     teams,
/// );
///
/// let issuer = Principal::Administrator(AdminPrincipal::new(
///     1,
///     [Permission::ManageToken].into(),
/// ));
/// let token = service.issue_token(&issuer, 42, 1, BTreeSet::from([100]), 0)?;
///
/// let principal = service.authenticate(token.id())?;
/// let key = ReviewKey::new(100, 1, 42, false);
/// service.score_review(&principal, key, 8, Some("solid demo".into()))?;
/// service.submit_review(&principal, key)?;
/// # Ok(())
/// # }
/// ```
pub struct ReviewService {
    registry: Arc<TokenRegistry>,
    authenticator: TokenAuthenticator,
    store: Arc<ReviewStore>,
    tutors: Arc<dyn TutorDirectory>,
    teams: Arc<dyn TeamDirectory>,
}

impl ReviewService {
    /// Compose a service over a registry, store, and the account
    /// directories
    #[must_use]
    pub fn new(
        registry: Arc<TokenRegistry>,
        store: Arc<ReviewStore>,
        tutors: Arc<dyn TutorDirectory>,
        teams: Arc<dyn TeamDirectory>,
    ) -> Self {
        let authenticator = TokenAuthenticator::new(Arc::clone(&registry), Arc::clone(&tutors));
        Self {
            registry,
            authenticator,
            store,
            tutors,
            teams,
        }
    }

    /// Resolve a bearer credential to a token-scoped principal.
    ///
    /// # Errors
    ///
    /// `AccessError::Unauthenticated` for any bad, revoked, or orphaned
    /// bearer, with no further detail.
    pub fn authenticate(&self, bearer: &str) -> Result<Principal> {
        let principal = self.authenticator.authenticate(bearer)?;
        Ok(Principal::Tutor(principal))
    }

    /// Record or update the score on one review.
    ///
    /// Token principals write only their own non-admin review rows inside
    /// the token's scope. Administrators write their own admin-flagged
    /// rows freely and anyone else's with `ManageReview`.
    pub fn score_review(
        &self,
        principal: &Principal,
        key: ReviewKey,
        rank: i32,
        text: Option<String>,
    ) -> Result<Review> {
        evaluate(principal, &Self::review_request(principal, key))?;
        let actor = Self::review_actor(principal);
        Ok(self.store.upsert_score(key, rank, text, &actor)?)
    }

    /// Finalize one review; the score and text become immutable.
    pub fn submit_review(&self, principal: &Principal, key: ReviewKey) -> Result<Review> {
        evaluate(principal, &Self::review_request(principal, key))?;
        let actor = Self::review_actor(principal);
        Ok(self.store.submit(key, &actor)?)
    }

    /// Fetch one review: its owner may always read it, anyone else needs
    /// `ViewReport`.
    pub fn get_review(&self, principal: &Principal, key: ReviewKey) -> Result<Review> {
        if evaluate(principal, &Self::review_request(principal, key)).is_err() {
            evaluate(principal, &AccessRequest::permission(Permission::ViewReport))?;
        }
        Ok(self.store.get(key)?)
    }

    /// Every viewer's review of one team in one stage, tutors first.
    /// Requires `ViewReport`.
    pub fn team_reviews(
        &self,
        principal: &Principal,
        team_id: u32,
        stage_id: u32,
    ) -> Result<Vec<Review>> {
        evaluate(principal, &AccessRequest::permission(Permission::ViewReport))?;
        Ok(self.store.list_by_team_and_stage(team_id, stage_id))
    }

    /// Issue a delegation token for a tutor. Requires `ManageToken`; the
    /// tutor and every scoped team must exist.
    pub fn issue_token(
        &self,
        principal: &Principal,
        tutor_id: u32,
        stage_id: u32,
        team_ids: BTreeSet<u32>,
        now: u64,
    ) -> Result<Token> {
        let admin = Self::require_admin(principal)?;
        if self.tutors.find_by_id(tutor_id).is_none() {
            return Err(AccessError::InvalidArgument(format!("unknown tutor {tutor_id}")).into());
        }
        if let Some(team_id) = team_ids.iter().find(|id| self.teams.find_by_id(**id).is_none()) {
            return Err(AccessError::InvalidArgument(format!("unknown team {team_id}")).into());
        }
        Ok(self.registry.issue(tutor_id, stage_id, team_ids, admin, now)?)
    }

    /// Revoke a delegation token. Requires `ManageToken`.
    pub fn revoke_token(&self, principal: &Principal, bearer: &str) -> Result<()> {
        let admin = Self::require_admin(principal)?;
        Ok(self.registry.revoke(bearer, admin)?)
    }

    /// All active tokens. Requires `ManageToken`.
    pub fn active_tokens(&self, principal: &Principal) -> Result<Vec<Token>> {
        evaluate(principal, &AccessRequest::permission(Permission::ManageToken))?;
        Ok(self.registry.list_active())
    }

    /// All revoked tokens (history). Requires `ManageToken`.
    pub fn revoked_tokens(&self, principal: &Principal) -> Result<Vec<Token>> {
        evaluate(principal, &AccessRequest::permission(Permission::ManageToken))?;
        Ok(self.registry.list_revoked())
    }

    /// Revoke every token whose stage has ended; returns the count.
    /// Intended for a periodic low-frequency task, not a request path.
    pub fn sweep_expired_tokens(&self, now: u64) -> usize {
        self.registry.sweep_expired(now)
    }

    // One request shape per review identity: tutors are matched against
    // the token scope; administrators pass for their own admin-flagged
    // row or with the override permission.
    fn review_request(principal: &Principal, key: ReviewKey) -> AccessRequest {
        let request = AccessRequest::review_write(
            key.team_id,
            key.stage_id,
            key.viewer_id,
            key.viewer_is_admin,
        );
        match principal {
            Principal::Tutor(_) => request,
            Principal::Administrator(_) => {
                let request = request.with_permission(Permission::ManageReview);
                if key.viewer_is_admin {
                    request.or_self(key.viewer_id)
                } else {
                    request
                }
            }
        }
    }

    fn review_actor(principal: &Principal) -> ReviewActor {
        match principal {
            Principal::Tutor(scope) => ReviewActor::new(scope.tutor_id, false),
            Principal::Administrator(admin) => {
                if admin.has(Permission::ManageReview) {
                    ReviewActor::with_override(admin.admin_id, true)
                } else {
                    ReviewActor::new(admin.admin_id, true)
                }
            }
        }
    }

    fn require_admin(principal: &Principal) -> Result<&core_access::AdminPrincipal> {
        match principal {
            Principal::Administrator(admin) => Ok(admin),
            Principal::Tutor(scope) => {
                debug!(tutor = scope.tutor_id, "token principal denied administrative call");
                Err(AccessError::Forbidden.into())
            }
        }
    }
}
