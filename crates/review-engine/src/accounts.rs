//! Administrator and tutor account services

use crate::error::Result;
use core_access::{
    evaluate, AccessError, AccessRequest, Administrator, InMemoryAdministrators, InMemoryTutors,
    Permission, Principal, Tutor, TutorDirectory, TutorUpdate,
};
use core_credential::CredentialCodec;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Registration data for a new administrator
#[derive(Debug, Clone)]
pub struct NewAdministrator {
    /// Account id
    pub id: u32,
    /// Login username
    pub username: String,
    /// Raw password, encoded before storage
    pub password: String,
    /// Permissions granted to the new account
    pub permissions: BTreeSet<Permission>,
}

/// Registration data for a new tutor
#[derive(Debug, Clone)]
pub struct NewTutor {
    /// Account id
    pub id: u32,
    /// Login username
    pub username: String,
    /// Display name
    pub display_name: String,
    /// Contact email, if provided
    pub email: Option<String>,
    /// Contact phone number, if provided
    pub phone: Option<String>,
    /// Raw password, encoded before storage
    pub password: String,
}

/// Account management for administrators and tutors.
///
/// Passwords never touch storage raw: registration and password changes
/// go through the credential codec. Interactive login/session handling
/// is an outer concern; this service only maintains the records.
pub struct AccountService {
    administrators: Arc<InMemoryAdministrators>,
    tutors: Arc<InMemoryTutors>,
    codec: Arc<dyn CredentialCodec>,
}

impl AccountService {
    /// Compose an account service over directories and a codec
    #[must_use]
    pub fn new(
        administrators: Arc<InMemoryAdministrators>,
        tutors: Arc<InMemoryTutors>,
        codec: Arc<dyn CredentialCodec>,
    ) -> Self {
        Self {
            administrators,
            tutors,
            codec,
        }
    }

    /// Register a new administrator.
    ///
    /// Requires `RegisterAdministrator`, and the granted permission set
    /// must be a subset of the actor's own: an administrator cannot hand
    /// out capabilities they do not hold.
    ///
    /// # Errors
    ///
    /// `AccessError::Forbidden` on a missing permission or a subset
    /// violation; `AccessError::InvalidArgument` on a taken id/username.
    pub fn register_administrator(
        &self,
        dto: NewAdministrator,
        actor: &Principal,
    ) -> Result<Administrator> {
        evaluate(
            actor,
            &AccessRequest::permission(Permission::RegisterAdministrator),
        )?;
        let Principal::Administrator(granting) = actor else {
            return Err(AccessError::Forbidden.into());
        };
        if !granting.holds_all(&dto.permissions) {
            warn!(
                admin = granting.admin_id,
                "rejected registration granting permissions beyond the actor's own"
            );
            return Err(AccessError::Forbidden.into());
        }

        let administrator = Administrator {
            id: dto.id,
            username: dto.username,
            credential: self.codec.encode(&dto.password)?,
            permissions: dto.permissions,
        };
        if !self.administrators.insert(administrator.clone()) {
            return Err(AccessError::InvalidArgument(format!(
                "administrator {} already exists",
                administrator.username
            ))
            .into());
        }
        info!(admin = administrator.id, "registered administrator");
        Ok(administrator)
    }

    /// Register a new tutor. Requires `ManageTutor`.
    pub fn register_tutor(&self, dto: NewTutor, actor: &Principal) -> Result<Tutor> {
        evaluate(actor, &AccessRequest::permission(Permission::ManageTutor))?;

        let tutor = Tutor {
            id: dto.id,
            username: dto.username,
            display_name: dto.display_name,
            email: dto.email,
            phone: dto.phone,
            credential: self.codec.encode(&dto.password)?,
        };
        if !self.tutors.insert(tutor.clone()) {
            return Err(AccessError::InvalidArgument(format!(
                "tutor {} already exists",
                tutor.username
            ))
            .into());
        }
        info!(tutor = tutor.id, "registered tutor");
        Ok(tutor)
    }

    /// Change an administrator's password, verifying the old one.
    ///
    /// Self-service: the account's owner may always change their own
    /// password; anyone else needs `ManageAdministrator`. A wrong old
    /// password is an authentication failure.
    pub fn update_administrator_password(
        &self,
        admin_id: u32,
        old_password: &str,
        new_password: &str,
        actor: &Principal,
    ) -> Result<()> {
        evaluate(
            actor,
            &AccessRequest::permission(Permission::ManageAdministrator).or_self(admin_id),
        )?;
        let account = self
            .administrators
            .find_by_id(admin_id)
            .ok_or(AccessError::NotFound)?;
        if !self.codec.matches(old_password, &account.credential) {
            warn!(admin = admin_id, "password change with wrong old password");
            return Err(AccessError::Unauthenticated.into());
        }
        self.administrators
            .update_credential(admin_id, self.codec.encode(new_password)?);
        info!(admin = admin_id, "administrator password updated");
        Ok(())
    }

    /// Update a tutor's profile fields (username, display name, email,
    /// phone). Requires `ManageTutor`; a new username must not belong to
    /// another tutor.
    pub fn update_tutor(
        &self,
        tutor_id: u32,
        update: TutorUpdate,
        actor: &Principal,
    ) -> Result<Tutor> {
        evaluate(actor, &AccessRequest::permission(Permission::ManageTutor))?;
        let tutor = self.tutors.update_profile(tutor_id, update)?;
        info!(tutor = tutor_id, "tutor profile updated");
        Ok(tutor)
    }

    /// Delete a tutor account. Requires `ManageTutor`. The tutor's
    /// outstanding tokens stop authenticating once the account is gone.
    pub fn delete_tutor(&self, tutor_id: u32, actor: &Principal) -> Result<()> {
        evaluate(actor, &AccessRequest::permission(Permission::ManageTutor))?;
        if !self.tutors.remove(tutor_id) {
            return Err(AccessError::NotFound.into());
        }
        info!(tutor = tutor_id, "deleted tutor");
        Ok(())
    }

    /// Delete an administrator account. Requires `ManageAdministrator`.
    pub fn delete_administrator(&self, admin_id: u32, actor: &Principal) -> Result<()> {
        evaluate(
            actor,
            &AccessRequest::permission(Permission::ManageAdministrator),
        )?;
        if !self.administrators.remove(admin_id) {
            return Err(AccessError::NotFound.into());
        }
        info!(admin = admin_id, "deleted administrator");
        Ok(())
    }

    /// Change a tutor's password, verifying the old one. Requires
    /// `ManageTutor` (tutors have no interactive principal here).
    pub fn update_tutor_password(
        &self,
        tutor_id: u32,
        old_password: &str,
        new_password: &str,
        actor: &Principal,
    ) -> Result<()> {
        evaluate(actor, &AccessRequest::permission(Permission::ManageTutor))?;
        let account = self
            .tutors
            .find_by_id(tutor_id)
            .ok_or(AccessError::NotFound)?;
        if !self.codec.matches(old_password, &account.credential) {
            warn!(tutor = tutor_id, "password change with wrong old password");
            return Err(AccessError::Unauthenticated.into());
        }
        self.tutors
            .update_credential(tutor_id, self.codec.encode(new_password)?);
        info!(tutor = tutor_id, "tutor password updated");
        Ok(())
    }

    /// Reset a tutor's password without the old one. Requires both
    /// `ResetPassword` and `ManageTutor`.
    pub fn reset_tutor_password(
        &self,
        tutor_id: u32,
        new_password: &str,
        actor: &Principal,
    ) -> Result<()> {
        evaluate(actor, &AccessRequest::permission(Permission::ResetPassword))?;
        evaluate(actor, &AccessRequest::permission(Permission::ManageTutor))?;
        if !self
            .tutors
            .update_credential(tutor_id, self.codec.encode(new_password)?)
        {
            return Err(AccessError::NotFound.into());
        }
        info!(tutor = tutor_id, "tutor password reset");
        Ok(())
    }

    /// Reset an administrator's password without the old one. Requires
    /// both `ResetPassword` and `ManageAdministrator`.
    pub fn reset_administrator_password(
        &self,
        admin_id: u32,
        new_password: &str,
        actor: &Principal,
    ) -> Result<()> {
        evaluate(actor, &AccessRequest::permission(Permission::ResetPassword))?;
        evaluate(
            actor,
            &AccessRequest::permission(Permission::ManageAdministrator),
        )?;
        if !self
            .administrators
            .update_credential(admin_id, self.codec.encode(new_password)?)
        {
            return Err(AccessError::NotFound.into());
        }
        info!(admin = admin_id, "administrator password reset");
        Ok(())
    }

    /// Find a tutor by id
    #[must_use]
    pub fn find_tutor(&self, id: u32) -> Option<Tutor> {
        self.tutors.find_by_id(id)
    }

    /// Find an administrator by id
    #[must_use]
    pub fn find_administrator(&self, id: u32) -> Option<Administrator> {
        self.administrators.find_by_id(id)
    }
}
