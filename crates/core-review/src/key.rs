//! Composite review identity

use serde::{Deserialize, Serialize};

/// Identity tuple naming exactly one review record.
///
/// Administrators and tutors may each review the same team in the same
/// stage, and an administrator id may coincide with a tutor id, so the
/// `viewer_is_admin` flag is part of the identity.
///
/// Equality, hashing, and ordering are structural over all four fields.
/// The field order encodes the listing tie-break: reviews for one team and
/// stage sort tutors before administrators, then by ascending viewer id.
///
/// ## Example
///
/// ```
/// use core_review::ReviewKey;
///
/// let tutor = ReviewKey::new(100, 1, 42, false);
/// let admin = ReviewKey::new(100, 1, 42, true);
/// assert_ne!(tutor, admin);
/// assert!(tutor < admin);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ReviewKey {
    /// Team under review
    pub team_id: u32,
    /// Evaluation stage
    pub stage_id: u32,
    /// Whether the viewer is an administrator
    pub viewer_is_admin: bool,
    /// Reviewing viewer (tutor or administrator id)
    pub viewer_id: u32,
}

impl ReviewKey {
    /// Create a new review identity
    #[must_use]
    pub const fn new(team_id: u32, stage_id: u32, viewer_id: u32, viewer_is_admin: bool) -> Self {
        Self {
            team_id,
            stage_id,
            viewer_is_admin,
            viewer_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of(key: &ReviewKey) -> u64 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_structural_equality() {
        let a = ReviewKey::new(1, 2, 3, false);
        let b = ReviewKey::new(1, 2, 3, false);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_each_field_distinguishes() {
        let base = ReviewKey::new(1, 2, 3, false);
        assert_ne!(base, ReviewKey::new(9, 2, 3, false));
        assert_ne!(base, ReviewKey::new(1, 9, 3, false));
        assert_ne!(base, ReviewKey::new(1, 2, 9, false));
        assert_ne!(base, ReviewKey::new(1, 2, 3, true));
    }

    #[test]
    fn test_no_cross_field_collision() {
        // Fields do not bleed into each other the way a shifted-int hash
        // would allow: swapping values across fields changes the key.
        let a = ReviewKey::new(2, 1, 3, false);
        let b = ReviewKey::new(1, 2, 3, false);
        assert_ne!(a, b);
    }

    #[test]
    fn test_ordering_tutors_before_admins() {
        let tutor = ReviewKey::new(100, 1, 7, false);
        let admin = ReviewKey::new(100, 1, 1, true);
        assert!(tutor < admin);

        let earlier = ReviewKey::new(100, 1, 3, false);
        assert!(earlier < tutor);
    }
}
