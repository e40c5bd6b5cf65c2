//! Shared review store enforcing identity and submission invariants

use crate::error::{ReviewError, Result};
use crate::key::ReviewKey;
use crate::review::Review;
use crate::MAX_REVIEW_TEXT_LENGTH;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Acting viewer for a store mutation.
///
/// The store never consults ambient state: every mutating call names the
/// viewer performing it. `can_override` is granted by the caller's
/// authorization layer (administrators holding the review-management
/// permission) and allows writes to reviews the actor does not own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewActor {
    /// Id of the acting viewer
    pub viewer_id: u32,
    /// Whether the actor is an administrator
    pub is_admin: bool,
    /// Whether the actor may mutate reviews owned by other viewers
    pub can_override: bool,
}

impl ReviewActor {
    /// An actor with no override capability
    #[must_use]
    pub const fn new(viewer_id: u32, is_admin: bool) -> Self {
        Self {
            viewer_id,
            is_admin,
            can_override: false,
        }
    }

    /// An actor allowed to mutate reviews it does not own
    #[must_use]
    pub const fn with_override(viewer_id: u32, is_admin: bool) -> Self {
        Self {
            viewer_id,
            is_admin,
            can_override: true,
        }
    }

    fn owns(&self, key: &ReviewKey) -> bool {
        self.viewer_id == key.viewer_id && self.is_admin == key.viewer_is_admin
    }
}

/// Store of review records keyed by identity tuple.
///
/// All mutations take the write lock, so the read-check-write sequence for
/// the submitted invariant is atomic with respect to concurrent writers on
/// the same identity. Two racing `upsert_score` calls for one key produce
/// exactly one record, and no writer can slip past a concurrent `submit`.
///
/// ## Example
///
/// ```
/// use core_review::{ReviewActor, ReviewKey, ReviewStore};
///
/// # fn example() -> core_review::Result<()> {
/// let store = ReviewStore::new();
/// let key = ReviewKey::new(100, 1, 42, false);
/// let actor = ReviewActor::new(42, false);
///
/// store.upsert_score(key, 8, Some("solid demo".into()), &actor)?;
/// store.submit(key, &actor)?;
///
/// // The record is now final
/// assert!(store.upsert_score(key, 9, None, &actor).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ReviewStore {
    reviews: RwLock<BTreeMap<ReviewKey, Review>>,
}

impl ReviewStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the review for an identity tuple.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::NotFound` if no review exists for the key.
    pub fn get(&self, key: ReviewKey) -> Result<Review> {
        let reviews = self.reviews.read();
        reviews.get(&key).cloned().ok_or(ReviewError::NotFound)
    }

    /// Record or update a score, creating the review on first write.
    ///
    /// # Errors
    ///
    /// - `ReviewError::Forbidden` unless the actor owns the identity tuple
    ///   or carries the override capability
    /// - `ReviewError::AlreadySubmitted` if the review is finalized
    /// - `ReviewError::TextTooLong` if the comment exceeds
    ///   [`MAX_REVIEW_TEXT_LENGTH`]
    ///
    /// A failed call leaves the prior record (or absence) untouched.
    pub fn upsert_score(
        &self,
        key: ReviewKey,
        rank: i32,
        text: Option<String>,
        actor: &ReviewActor,
    ) -> Result<Review> {
        if !actor.owns(&key) && !actor.can_override {
            warn!(
                viewer = actor.viewer_id,
                team = key.team_id,
                stage = key.stage_id,
                "rejected score write by non-owner"
            );
            return Err(ReviewError::Forbidden);
        }

        if let Some(text) = &text {
            if text.len() > MAX_REVIEW_TEXT_LENGTH {
                return Err(ReviewError::TextTooLong {
                    max: MAX_REVIEW_TEXT_LENGTH,
                    length: text.len(),
                });
            }
        }

        let mut reviews = self.reviews.write();
        let review = reviews.entry(key).or_insert_with(|| {
            debug!(
                team = key.team_id,
                stage = key.stage_id,
                viewer = key.viewer_id,
                "created review record"
            );
            Review::new(key)
        });

        if review.is_submitted() {
            return Err(ReviewError::AlreadySubmitted);
        }

        review.set_score(rank, text);
        debug!(
            team = key.team_id,
            stage = key.stage_id,
            viewer = key.viewer_id,
            rank,
            "recorded review score"
        );
        Ok(review.clone())
    }

    /// Finalize a review so its score and text can no longer change.
    ///
    /// A second submit on the same identity is an explicit error rather
    /// than an idempotent success, so callers can surface the double
    /// submission to the evaluator.
    ///
    /// # Errors
    ///
    /// - `ReviewError::NotFound` if no review exists for the key
    /// - `ReviewError::Forbidden` unless the actor owns the identity tuple
    ///   or carries the override capability
    /// - `ReviewError::AlreadySubmitted` if already finalized
    pub fn submit(&self, key: ReviewKey, actor: &ReviewActor) -> Result<Review> {
        if !actor.owns(&key) && !actor.can_override {
            warn!(
                viewer = actor.viewer_id,
                team = key.team_id,
                stage = key.stage_id,
                "rejected submit by non-owner"
            );
            return Err(ReviewError::Forbidden);
        }

        let mut reviews = self.reviews.write();
        let review = reviews.get_mut(&key).ok_or(ReviewError::NotFound)?;

        if review.is_submitted() {
            return Err(ReviewError::AlreadySubmitted);
        }

        review.mark_submitted();
        info!(
            team = key.team_id,
            stage = key.stage_id,
            viewer = key.viewer_id,
            admin = key.viewer_is_admin,
            "review submitted"
        );
        Ok(review.clone())
    }

    /// All reviews for one team and stage, tutors first, then
    /// administrators, each ordered by ascending viewer id.
    ///
    /// Used by administrators aggregating every viewer's score for a team.
    #[must_use]
    pub fn list_by_team_and_stage(&self, team_id: u32, stage_id: u32) -> Vec<Review> {
        let reviews = self.reviews.read();
        let lo = ReviewKey::new(team_id, stage_id, 0, false);
        let hi = ReviewKey::new(team_id, stage_id, u32::MAX, true);
        reviews.range(lo..=hi).map(|(_, r)| r.clone()).collect()
    }

    /// Number of reviews currently held
    #[must_use]
    pub fn len(&self) -> usize {
        self.reviews.read().len()
    }

    /// Whether the store holds no reviews
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
