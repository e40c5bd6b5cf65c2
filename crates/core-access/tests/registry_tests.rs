//! Integration tests for TokenRegistry

use core_access::{
    AccessError, AdminPrincipal, InMemoryStages, Permission, Stage, StageDirectory, TokenRegistry,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;

const STAGE_END: u64 = 2_000_000_000;

fn registry_with_stage(stage_id: u32) -> TokenRegistry {
    let stages = Arc::new(InMemoryStages::new());
    stages.insert(Stage {
        id: stage_id,
        ends_at: STAGE_END,
    });
    TokenRegistry::new(stages)
}

fn issuer() -> AdminPrincipal {
    AdminPrincipal::new(1, [Permission::ManageToken].into())
}

#[test]
fn test_issue_and_resolve() {
    let registry = registry_with_stage(1);
    let token = registry
        .issue(42, 1, BTreeSet::from([100, 101]), &issuer(), 1000)
        .unwrap();

    assert_eq!(token.tutor_id(), 42);
    assert_eq!(token.stage_id(), 1);
    assert_eq!(token.created_at(), 1000);
    assert!(!token.is_revoked());

    let grant = registry.resolve(token.id()).unwrap();
    assert_eq!(grant.tutor_id, 42);
    assert_eq!(grant.stage_id, 1);
    assert_eq!(grant.team_ids, BTreeSet::from([100, 101]));
}

#[test]
fn test_issue_requires_manage_token() {
    let registry = registry_with_stage(1);
    let unprivileged = AdminPrincipal::new(1, [Permission::ViewReport].into());

    let result = registry.issue(42, 1, BTreeSet::from([100]), &unprivileged, 0);
    assert_eq!(result, Err(AccessError::Forbidden));
    assert!(registry.list_active().is_empty());
}

#[test]
fn test_issue_empty_team_set() {
    let registry = registry_with_stage(1);
    let result = registry.issue(42, 1, BTreeSet::new(), &issuer(), 0);
    assert!(matches!(result, Err(AccessError::InvalidArgument(_))));
    // No row created on a failed issuance
    assert!(registry.list_active().is_empty());
    assert!(registry.list_revoked().is_empty());
}

#[test]
fn test_issue_unknown_stage() {
    let registry = registry_with_stage(1);
    let result = registry.issue(42, 9, BTreeSet::from([100]), &issuer(), 0);
    assert!(matches!(result, Err(AccessError::InvalidArgument(_))));
}

#[test]
fn test_resolve_unknown_and_malformed() {
    let registry = registry_with_stage(1);
    registry
        .issue(42, 1, BTreeSet::from([100]), &issuer(), 0)
        .unwrap();

    for bearer in ["", "deadbeef", "not hex at all!", "0", &"f".repeat(4096)] {
        assert_eq!(
            registry.resolve(bearer),
            Err(AccessError::Unauthenticated),
            "bearer {bearer:?} must resolve uniformly"
        );
    }
}

#[test]
fn test_revoked_token_fails_resolve_but_stays_listed() {
    let registry = registry_with_stage(1);
    let token = registry
        .issue(42, 1, BTreeSet::from([100]), &issuer(), 0)
        .unwrap();

    registry.revoke(token.id(), &issuer()).unwrap();

    assert_eq!(registry.resolve(token.id()), Err(AccessError::Unauthenticated));
    assert!(registry.list_active().is_empty());

    let revoked = registry.list_revoked();
    assert_eq!(revoked.len(), 1);
    assert_eq!(revoked[0].id(), token.id());
    assert!(revoked[0].is_revoked());
}

#[test]
fn test_revoke_is_idempotent_and_permissioned() {
    let registry = registry_with_stage(1);
    let token = registry
        .issue(42, 1, BTreeSet::from([100]), &issuer(), 0)
        .unwrap();

    let unprivileged = AdminPrincipal::new(2, BTreeSet::new());
    assert_eq!(
        registry.revoke(token.id(), &unprivileged),
        Err(AccessError::Forbidden)
    );
    assert!(registry.resolve(token.id()).is_ok());

    registry.revoke(token.id(), &issuer()).unwrap();
    // Second revocation of the same token is fine
    registry.revoke(token.id(), &issuer()).unwrap();

    assert_eq!(
        registry.revoke("0000000000000000", &issuer()),
        Err(AccessError::NotFound)
    );
}

#[test]
fn test_concurrent_issuance_distinct_ids() {
    let registry = Arc::new(registry_with_stage(1));
    let threads = 8;
    let per_thread = 1250; // 10_000 tokens total

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                for i in 0..per_thread {
                    registry
                        .issue(i, 1, BTreeSet::from([100]), &issuer(), 0)
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let active = registry.list_active();
    assert_eq!(active.len(), threads * per_thread as usize);

    let ids: BTreeSet<_> = active.iter().map(|t| t.id().to_string()).collect();
    assert_eq!(ids.len(), active.len(), "token identifiers must be pairwise distinct");
}

#[test]
fn test_sweep_revokes_ended_stages_only() {
    let stages = Arc::new(InMemoryStages::new());
    stages.insert(Stage { id: 1, ends_at: 500 });
    stages.insert(Stage { id: 2, ends_at: 1500 });
    let registry = TokenRegistry::new(stages);

    let ended = registry
        .issue(42, 1, BTreeSet::from([100]), &issuer(), 0)
        .unwrap();
    let live = registry
        .issue(43, 2, BTreeSet::from([100]), &issuer(), 0)
        .unwrap();

    assert_eq!(registry.sweep_expired(1000), 1);
    assert_eq!(registry.resolve(ended.id()), Err(AccessError::Unauthenticated));
    assert!(registry.resolve(live.id()).is_ok());

    // Already-revoked tokens are not swept twice
    assert_eq!(registry.sweep_expired(1000), 0);

    // At the second stage's deadline the remaining token expires
    assert_eq!(registry.sweep_expired(1500), 1);
    assert_eq!(registry.resolve(live.id()), Err(AccessError::Unauthenticated));
}

#[test]
fn test_sweep_treats_deleted_stage_as_ended() {
    let stages = Arc::new(InMemoryStages::new());
    stages.insert(Stage { id: 1, ends_at: STAGE_END });
    let directory: Arc<dyn StageDirectory> = stages.clone();
    let registry = TokenRegistry::new(directory);

    let token = registry
        .issue(42, 1, BTreeSet::from([100]), &issuer(), 0)
        .unwrap();
    assert_eq!(registry.sweep_expired(0), 0);

    // A stage deleted after issuance orphans its tokens; the sweep
    // treats them as expired.
    stages.remove(1);
    assert_eq!(registry.sweep_expired(0), 1);
    assert_eq!(registry.resolve(token.id()), Err(AccessError::Unauthenticated));
}

#[test]
fn test_sweep_runs_concurrently_with_traffic() {
    let registry = Arc::new(registry_with_stage(1));

    let sweeper = {
        let registry = Arc::clone(&registry);
        thread::spawn(move || {
            for _ in 0..100 {
                // Stage has not ended; sweep must never revoke anything
                assert_eq!(registry.sweep_expired(0), 0);
            }
        })
    };
    let traffic = {
        let registry = Arc::clone(&registry);
        thread::spawn(move || {
            for i in 0..100 {
                let token = registry
                    .issue(i, 1, BTreeSet::from([100]), &issuer(), 0)
                    .unwrap();
                registry.resolve(token.id()).unwrap();
            }
        })
    };

    sweeper.join().unwrap();
    traffic.join().unwrap();
    assert_eq!(registry.list_active().len(), 100);
}
