//! Review record

use crate::key::ReviewKey;
use serde::{Deserialize, Serialize};

/// One evaluator's scored review of one team in one stage.
///
/// Created the first time a viewer writes a score for a team and stage;
/// the rank is unset until the viewer records one. Once `submitted` is
/// set the record is final and the store rejects further mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    key: ReviewKey,
    rank: Option<i32>,
    text: Option<String>,
    submitted: bool,
}

impl Review {
    /// Create an unscored, unsubmitted review for an identity tuple
    #[must_use]
    pub const fn new(key: ReviewKey) -> Self {
        Self {
            key,
            rank: None,
            text: None,
            submitted: false,
        }
    }

    /// The identity tuple of this review
    #[must_use]
    pub const fn key(&self) -> ReviewKey {
        self.key
    }

    /// The evaluator's numeric score, if one has been recorded
    #[must_use]
    pub const fn rank(&self) -> Option<i32> {
        self.rank
    }

    /// The evaluator's free-form comment, if any
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Whether this review has been finalized
    #[must_use]
    pub const fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub(crate) fn set_score(&mut self, rank: i32, text: Option<String>) {
        self.rank = Some(rank);
        self.text = text;
    }

    pub(crate) fn mark_submitted(&mut self) {
        self.submitted = true;
    }
}
