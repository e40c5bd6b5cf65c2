// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Review Gate Team

//! # review-gate
//!
//! Scoped review access and token delegation for staged team evaluations.
//!
//! This crate provides a unified API for the Review Gate core functionality:
//!
//! - **Review Store**: at-most-one review per (team, stage, viewer) identity
//!   with a submit-once workflow
//! - **Access Control**: opaque-token delegation for tutors, administrator
//!   permission sets, and a uniform authorization evaluator
//! - **Credential Codec**: salted-hash password encoding and verification
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use review_gate::review::ReviewStore;
//!
//! let store = ReviewStore::new();
//! ```
//!
//! ## Architecture
//!
//! This facade crate re-exports the following modules:
//!
//! - [`review`] - Review records and store (from `core-review`)
//! - [`access`] - Tokens, principals, and authorization (from `core-access`)
//! - [`credential`] - Salted-hash credential codec (from `core-credential`)
//! - [`engine`] - Service layer composing the above (from `review-engine`)
//!
//! ## Security
//!
//! - Token identifiers carry 128 bits of OS-sourced entropy
//! - Authentication and authorization failures present a single uniform
//!   "access denied" message to prevent scope probing
//! - Credentials are hashed with Argon2id via the `argon2` crate

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Review records and store.
///
/// Re-exports `core_review` for the review data model and store.
pub mod review {
    pub use core_review::*;
}

/// Access control module.
///
/// Re-exports `core_access` for tokens, principals, and authorization.
pub mod access {
    pub use core_access::*;
}

/// Credential codec module.
///
/// Re-exports `core_credential` for salted-hash password handling.
pub mod credential {
    pub use core_credential::*;
}

/// Service layer module.
///
/// Re-exports `review_engine` for the composed review workflow.
pub mod engine {
    pub use review_engine::*;
}

// Convenience re-exports at root level
pub use core_access::{Permission, Principal, TokenRegistry};
pub use core_review::{Review, ReviewKey, ReviewStore};
pub use review_engine::ReviewService;
