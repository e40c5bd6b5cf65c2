//! Property-Based Tests for token resolution
//!
//! These tests use proptest to generate random inputs and verify that
//! resolution invariants are ALWAYS maintained:
//!
//! 1. Resolving an arbitrary bearer string never panics
//! 2. A bearer that was never issued always resolves to Unauthenticated
//! 3. Issued identifiers are URL-safe and fixed-width

use core_access::{
    AccessError, AdminPrincipal, InMemoryStages, Permission, Stage, TokenRegistry,
    TOKEN_ID_BYTES,
};
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;

fn registry() -> TokenRegistry {
    let stages = Arc::new(InMemoryStages::new());
    stages.insert(Stage {
        id: 1,
        ends_at: 2_000_000_000,
    });
    TokenRegistry::new(stages)
}

fn issuer() -> AdminPrincipal {
    AdminPrincipal::new(1, [Permission::ManageToken].into())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    /// Resolving any arbitrary string must not panic and must answer
    /// with the uniform authentication failure.
    #[test]
    fn prop_resolve_never_panics(bearer in "\\PC*") {
        let registry = registry();
        prop_assert_eq!(
            registry.resolve(&bearer),
            Err(AccessError::Unauthenticated)
        );
    }

    /// Even with tokens present, an unissued bearer resolves uniformly.
    #[test]
    fn prop_unissued_bearer_rejected(bearer in "[0-9a-f]{0,64}") {
        let registry = registry();
        let token = registry
            .issue(42, 1, BTreeSet::from([100]), &issuer(), 0)
            .unwrap();

        prop_assume!(bearer != token.id());
        prop_assert_eq!(
            registry.resolve(&bearer),
            Err(AccessError::Unauthenticated)
        );
    }

    /// Issued identifiers are fixed-width lowercase hex (URL-safe).
    #[test]
    fn prop_issued_ids_url_safe(tutor in 0u32..10_000) {
        let registry = registry();
        let token = registry
            .issue(tutor, 1, BTreeSet::from([100]), &issuer(), 0)
            .unwrap();

        prop_assert_eq!(token.id().len(), TOKEN_ID_BYTES * 2);
        prop_assert!(token
            .id()
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
