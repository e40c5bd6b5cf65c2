// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Review Gate Team

//! # review-engine
//!
//! Service layer composing the review store, token registry, and account
//! directories into the operations the administrative and tutor-facing
//! surfaces consume.
//!
//! Every operation takes an explicit [`core_access::Principal`] and runs
//! it through the authorization evaluator before touching any state; the
//! engine holds no ambient notion of "the current user".

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod accounts;
mod error;
mod service;

pub use accounts::{AccountService, NewAdministrator, NewTutor};
pub use error::{EngineError, Result};
pub use service::ReviewService;
