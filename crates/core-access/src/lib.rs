// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Review Gate Team

//! # core-access
//!
//! Token delegation, principals, and authorization for staged team
//! evaluations.
//!
//! This crate provides the access-control core:
//! - `Permission`: the closed administrator capability set
//! - `Token` / `TokenRegistry`: opaque scoped tokens with revocation
//! - `TokenAuthenticator`: bearer string to ephemeral principal
//! - `evaluate`: the uniform authorization decision for every operation
//! - directory traits for the tutor, team, and stage collaborators
//!
//! ## Security
//!
//! - Token identifiers carry [`TOKEN_ID_BYTES`] bytes (128 bits) of
//!   OS-sourced entropy, hex-encoded and URL-safe
//! - `resolve` answers uniformly for unknown, malformed, and revoked
//!   tokens so a probing client learns nothing about token existence
//! - `Unauthenticated` and `Forbidden` display the identical message
//! - `MAX_TEAMS_PER_TOKEN` (256): bound on the issuance allow-list

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod directory;
mod error;
mod evaluator;
mod permission;
mod principal;
mod registry;
mod resolver;
mod token;

pub use directory::{
    Administrator, InMemoryAdministrators, InMemoryStages, InMemoryTeams, InMemoryTutors, Stage,
    StageDirectory, Team, TeamDirectory, Tutor, TutorDirectory, TutorUpdate,
};
pub use error::{AccessError, Result};
pub use evaluator::{evaluate, AccessRequest};
pub use permission::Permission;
pub use principal::{AdminPrincipal, Principal, TokenPrincipal};
pub use registry::TokenRegistry;
pub use resolver::TokenAuthenticator;
pub use token::{Token, TokenGrant};

/// Number of random bytes in a token identifier (128 bits of entropy)
pub const TOKEN_ID_BYTES: usize = 16;

/// Maximum number of team ids in one token's allow-list
pub const MAX_TEAMS_PER_TOKEN: usize = 256;
