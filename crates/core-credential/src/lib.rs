// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Review Gate Team

//! # core-credential
//!
//! Salted-hash credential codec for account services.
//!
//! This crate provides the password-handling capability consumed by the
//! administrator and tutor account services. Callers treat it as a black
//! box with two operations: encode a raw password to an opaque credential
//! string, and check a raw password against a stored credential.
//!
//! ## Security
//!
//! - Argon2id key derivation via the `argon2` crate
//! - A fresh OS-sourced salt per encoding, so equal passwords never produce
//!   equal credentials
//! - Verification is failure-closed: a malformed stored credential never
//!   matches and never panics
//!
//! ## Example
//!
//! ```
//! use core_credential::{Argon2Codec, CredentialCodec};
//!
//! # fn example() -> Result<(), core_credential::CredentialError> {
//! let codec = Argon2Codec::default();
//! let credential = codec.encode("hunter2")?;
//!
//! assert!(codec.matches("hunter2", &credential));
//! assert!(!codec.matches("wrong", &credential));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;

pub use error::{CredentialError, Result};

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use serde::{Deserialize, Serialize};

/// Opaque salted-hash credential string.
///
/// The inner representation is a PHC-format string carrying the algorithm,
/// parameters, salt, and hash. It is safe to persist and to log lengths of,
/// but never reveals the raw password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    /// Returns the stored credential string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Credential {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Codec trait for salted-hash credentials
///
/// This trait abstracts the hashing algorithm used for stored credentials,
/// so account services depend on the capability rather than a concrete
/// primitive. Tests can substitute a cheap implementation.
pub trait CredentialCodec: Send + Sync {
    /// Encode a raw password into an opaque credential.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::EmptyPassword` for an empty input and
    /// `CredentialError::Encoding` if the underlying hasher fails.
    fn encode(&self, raw: &str) -> Result<Credential>;

    /// Check a raw password against a stored credential.
    ///
    /// Returns `false` for non-matching passwords and for credentials that
    /// fail to parse. Never panics.
    fn matches(&self, raw: &str, credential: &Credential) -> bool;
}

/// Default Argon2id credential codec
///
/// Uses the `argon2` crate's default parameters, which are tuned for
/// interactive logins. Each encoding draws a fresh salt from the OS CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Codec;

impl CredentialCodec for Argon2Codec {
    fn encode(&self, raw: &str) -> Result<Credential> {
        if raw.is_empty() {
            return Err(CredentialError::EmptyPassword);
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(raw.as_bytes(), &salt)
            .map_err(|e| CredentialError::Encoding(e.to_string()))?;

        Ok(Credential(hash.to_string()))
    }

    fn matches(&self, raw: &str, credential: &Credential) -> bool {
        match PasswordHash::new(credential.as_str()) {
            Ok(parsed) => Argon2::default()
                .verify_password(raw.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_matches_round_trip() {
        let codec = Argon2Codec;
        let credential = codec.encode("correct horse").unwrap();

        assert!(codec.matches("correct horse", &credential));
        assert!(!codec.matches("battery staple", &credential));
    }

    #[test]
    fn test_fresh_salt_per_encoding() {
        let codec = Argon2Codec;
        let first = codec.encode("same password").unwrap();
        let second = codec.encode("same password").unwrap();

        // Distinct salts produce distinct credentials for equal passwords
        assert_ne!(first, second);
        assert!(codec.matches("same password", &first));
        assert!(codec.matches("same password", &second));
    }

    #[test]
    fn test_empty_password_rejected() {
        let codec = Argon2Codec;
        assert!(matches!(
            codec.encode(""),
            Err(CredentialError::EmptyPassword)
        ));
    }

    #[test]
    fn test_malformed_credential_never_matches() {
        let codec = Argon2Codec;
        let garbage = Credential::from("not-a-phc-string".to_string());

        assert!(!codec.matches("anything", &garbage));
        assert!(!codec.matches("", &garbage));
    }
}
