//! Authorization policy evaluation
//!
//! Every operation in the system is described as an [`AccessRequest`]
//! and decided by [`evaluate`]. The decision is data-driven: callers
//! declare what an operation targets instead of embedding permission
//! predicates at the call site.

use crate::error::{AccessError, Result};
use crate::permission::Permission;
use crate::principal::Principal;
use tracing::debug;

/// Description of a requested operation.
///
/// - `required_permission`: capability an administrator must hold
/// - `team_id` / `stage_id` / `viewer_id` / `viewer_is_admin`: the review
///   target, checked against a token principal's scope
/// - `self_admin_id`: for self-service operations, the account being
///   acted on; an administrator is admitted to their own account even
///   without the permission
///
/// ## Example
///
/// ```
/// use core_access::{evaluate, AccessRequest, AdminPrincipal, Permission, Principal};
///
/// let admin = Principal::Administrator(AdminPrincipal::new(
///     1,
///     [Permission::ViewReport].into(),
/// ));
/// let request = AccessRequest::permission(Permission::ViewReport);
/// assert!(evaluate(&admin, &request).is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessRequest {
    required_permission: Option<Permission>,
    team_id: Option<u32>,
    stage_id: Option<u32>,
    viewer_id: Option<u32>,
    viewer_is_admin: Option<bool>,
    self_admin_id: Option<u32>,
}

impl AccessRequest {
    /// An operation gated on an administrator capability
    #[must_use]
    pub const fn permission(permission: Permission) -> Self {
        Self {
            required_permission: Some(permission),
            team_id: None,
            stage_id: None,
            viewer_id: None,
            viewer_is_admin: None,
            self_admin_id: None,
        }
    }

    /// A review write targeting one (team, stage, viewer, is-admin)
    /// identity
    #[must_use]
    pub const fn review_write(
        team_id: u32,
        stage_id: u32,
        viewer_id: u32,
        viewer_is_admin: bool,
    ) -> Self {
        Self {
            required_permission: None,
            team_id: Some(team_id),
            stage_id: Some(stage_id),
            viewer_id: Some(viewer_id),
            viewer_is_admin: Some(viewer_is_admin),
            self_admin_id: None,
        }
    }

    /// A self-service operation on one administrator account
    #[must_use]
    pub const fn self_service(admin_id: u32) -> Self {
        Self {
            required_permission: None,
            team_id: None,
            stage_id: None,
            viewer_id: None,
            viewer_is_admin: None,
            self_admin_id: Some(admin_id),
        }
    }

    /// Also admit the named administrator acting on their own account
    #[must_use]
    pub const fn or_self(mut self, admin_id: u32) -> Self {
        self.self_admin_id = Some(admin_id);
        self
    }

    /// Also require an administrator capability
    #[must_use]
    pub const fn with_permission(mut self, permission: Permission) -> Self {
        self.required_permission = Some(permission);
        self
    }
}

/// Decide whether a principal may perform the described operation.
///
/// Administrator path: admitted when the permission set contains the
/// required permission, or when the request's self-service target is the
/// administrator's own account.
///
/// Token path: admitted only for non-admin review writes whose stage
/// equals the principal's stage, whose team is in the allow-list, and
/// whose viewer is the principal's own tutor id; a token principal is
/// definitionally not an administrator, so an admin-flagged target row
/// is always foreign to it. Any required permission denies a token
/// principal outright.
///
/// # Errors
///
/// Returns `AccessError::Forbidden` in every other case. Wrong team,
/// wrong stage, and missing permission are indistinguishable externally;
/// the error carries no detail a probing client could use to map scope
/// boundaries.
pub fn evaluate(principal: &Principal, request: &AccessRequest) -> Result<()> {
    match principal {
        Principal::Administrator(admin) => {
            if let Some(target) = request.self_admin_id {
                if target == admin.admin_id {
                    return Ok(());
                }
            }
            match request.required_permission {
                Some(permission) if admin.has(permission) => Ok(()),
                _ => {
                    debug!(admin = admin.admin_id, "administrator denied");
                    Err(AccessError::Forbidden)
                }
            }
        }
        Principal::Tutor(scope) => {
            if request.required_permission.is_some() || request.self_admin_id.is_some() {
                return Err(AccessError::Forbidden);
            }
            match (request.team_id, request.stage_id, request.viewer_id) {
                (Some(team), Some(stage), Some(viewer))
                    if stage == scope.stage_id
                        && scope.allows_team(team)
                        && viewer == scope.tutor_id
                        && request.viewer_is_admin == Some(false) =>
                {
                    Ok(())
                }
                _ => {
                    debug!(tutor = scope.tutor_id, "token principal denied");
                    Err(AccessError::Forbidden)
                }
            }
        }
    }
}
