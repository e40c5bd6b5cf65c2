// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Review Gate Team

//! # core-review
//!
//! Review data model and store for staged team evaluations.
//!
//! This crate provides the core domain types for scored reviews:
//! - `ReviewKey`: the (team, stage, viewer, viewer-is-admin) identity tuple
//! - `Review`: one evaluator's scored review of one team in one stage
//! - `ReviewStore`: shared store enforcing identity and submission invariants
//!
//! ## Invariants
//!
//! - At most one `Review` exists per identity tuple at any time
//! - Identity fields are immutable after creation
//! - Once a review is submitted, its score and text can no longer change
//!
//! ## Security Constraints
//!
//! - `MAX_REVIEW_TEXT_LENGTH` (4096): maximum comment length in bytes

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod key;
mod review;
mod store;

pub use error::{ReviewError, Result};
pub use key::ReviewKey;
pub use review::Review;
pub use store::{ReviewActor, ReviewStore};

/// Maximum byte length for review comment text (resource exhaustion
/// mitigation); the bound is on encoded size, not character count
pub const MAX_REVIEW_TEXT_LENGTH: usize = 4096;
