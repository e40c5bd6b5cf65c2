//! Integration tests for the authorization evaluator

use core_access::{
    evaluate, AccessError, AccessRequest, AdminPrincipal, Permission, Principal, TokenPrincipal,
};
use std::collections::BTreeSet;

fn admin(id: u32, permissions: impl IntoIterator<Item = Permission>) -> Principal {
    Principal::Administrator(AdminPrincipal::new(id, permissions.into_iter().collect()))
}

fn tutor_scope(tutor_id: u32, stage_id: u32, teams: impl IntoIterator<Item = u32>) -> Principal {
    Principal::Tutor(TokenPrincipal {
        tutor_id,
        stage_id,
        team_ids: teams.into_iter().collect(),
    })
}

#[test]
fn test_admin_permission_check() {
    let actor = admin(1, [Permission::ManageToken]);

    assert!(evaluate(&actor, &AccessRequest::permission(Permission::ManageToken)).is_ok());
    assert_eq!(
        evaluate(&actor, &AccessRequest::permission(Permission::ManageTutor)),
        Err(AccessError::Forbidden)
    );
}

#[test]
fn test_admin_self_service_without_permission() {
    let actor = admin(7, []);

    // Own account: admitted even without ManageAdministrator
    let own = AccessRequest::permission(Permission::ManageAdministrator).or_self(7);
    assert!(evaluate(&actor, &own).is_ok());

    // Someone else's account: denied
    let other = AccessRequest::permission(Permission::ManageAdministrator).or_self(8);
    assert_eq!(evaluate(&actor, &other), Err(AccessError::Forbidden));

    // Holding the permission admits regardless of target
    let manager = admin(1, [Permission::ManageAdministrator]);
    assert!(evaluate(&manager, &other).is_ok());
}

#[test]
fn test_admin_denied_plain_review_write() {
    // A review-write request carries no permission and no self target,
    // so an administrator needs the caller to attach one.
    let actor = admin(1, [Permission::ViewReport]);
    let request = AccessRequest::review_write(100, 1, 42, false);
    assert_eq!(evaluate(&actor, &request), Err(AccessError::Forbidden));

    let overseer = admin(1, [Permission::ManageReview]);
    let request =
        AccessRequest::review_write(100, 1, 42, false).with_permission(Permission::ManageReview);
    assert!(evaluate(&overseer, &request).is_ok());
}

#[test]
fn test_token_scope_matrix() {
    // Token issued for teams {5, 7} in stage 2
    let actor = tutor_scope(42, 2, [5, 7]);

    assert!(evaluate(&actor, &AccessRequest::review_write(5, 2, 42, false)).is_ok());
    assert!(evaluate(&actor, &AccessRequest::review_write(7, 2, 42, false)).is_ok());

    // Wrong team
    assert_eq!(
        evaluate(&actor, &AccessRequest::review_write(9, 2, 42, false)),
        Err(AccessError::Forbidden)
    );
    // Wrong stage
    assert_eq!(
        evaluate(&actor, &AccessRequest::review_write(5, 3, 42, false)),
        Err(AccessError::Forbidden)
    );
    // Wrong viewer: token holders write only under their own identity
    assert_eq!(
        evaluate(&actor, &AccessRequest::review_write(5, 2, 43, false)),
        Err(AccessError::Forbidden)
    );
    // An admin-flagged row is foreign to a token principal even under
    // its own tutor id
    assert_eq!(
        evaluate(&actor, &AccessRequest::review_write(5, 2, 42, true)),
        Err(AccessError::Forbidden)
    );
}

#[test]
fn test_token_principal_never_passes_permission_gates() {
    let actor = tutor_scope(42, 2, [5]);

    for permission in [
        Permission::RegisterAdministrator,
        Permission::ManageAdministrator,
        Permission::ManageTutor,
        Permission::ManageToken,
        Permission::ManageReview,
        Permission::CreateTask,
        Permission::ViewReport,
        Permission::ResetPassword,
    ] {
        assert_eq!(
            evaluate(&actor, &AccessRequest::permission(permission)),
            Err(AccessError::Forbidden),
            "token principal must not satisfy {permission}"
        );
    }

    // Nor self-service shapes
    assert_eq!(
        evaluate(&actor, &AccessRequest::self_service(42)),
        Err(AccessError::Forbidden)
    );
}

#[test]
fn test_denials_are_indistinguishable() {
    let actor = tutor_scope(42, 2, [5]);

    let wrong_team = evaluate(&actor, &AccessRequest::review_write(9, 2, 42, false)).unwrap_err();
    let wrong_stage = evaluate(&actor, &AccessRequest::review_write(5, 3, 42, false)).unwrap_err();
    let no_permission = evaluate(
        &admin(1, []),
        &AccessRequest::permission(Permission::ViewReport),
    )
    .unwrap_err();

    assert_eq!(wrong_team.to_string(), wrong_stage.to_string());
    assert_eq!(wrong_team.to_string(), no_permission.to_string());
    // And the authentication failure presents identically
    assert_eq!(
        AccessError::Unauthenticated.to_string(),
        AccessError::Forbidden.to_string()
    );
}

#[test]
fn test_empty_request_denies_everyone() {
    let request = AccessRequest::default();
    assert_eq!(
        evaluate(&admin(1, [Permission::ManageToken]), &request),
        Err(AccessError::Forbidden)
    );
    assert_eq!(
        evaluate(&tutor_scope(42, 2, [5]), &request),
        Err(AccessError::Forbidden)
    );
    let subset: BTreeSet<Permission> = BTreeSet::new();
    assert!(AdminPrincipal::new(1, [Permission::ViewReport].into()).holds_all(&subset));
}
