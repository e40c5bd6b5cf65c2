//! Directories for the tutor, team, stage, and administrator collaborators
//!
//! Persistence technology is out of scope here, so each directory is a
//! lookup trait plus an in-memory implementation. The in-memory variants
//! back the account services and double as test fixtures.

use crate::error::{AccessError, Result};
use crate::permission::Permission;
use core_credential::Credential;
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};

/// A tutor account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tutor {
    /// Account id
    pub id: u32,
    /// Login username, unique across tutors
    pub username: String,
    /// Display name shown to evaluators
    pub display_name: String,
    /// Contact email, if provided
    pub email: Option<String>,
    /// Contact phone number, if provided
    pub phone: Option<String>,
    /// Stored salted-hash credential
    pub credential: Credential,
}

/// Partial tutor profile update; `None` fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct TutorUpdate {
    /// New login username
    pub username: Option<String>,
    /// New display name
    pub display_name: Option<String>,
    /// New contact email
    pub email: Option<String>,
    /// New contact phone number
    pub phone: Option<String>,
}

/// A team under evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    /// Team id
    pub id: u32,
    /// Team name
    pub name: String,
}

/// A timed evaluation stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage {
    /// Stage id
    pub id: u32,
    /// Unix timestamp after which the stage is over
    pub ends_at: u64,
}

impl Stage {
    /// Whether the stage deadline has passed
    #[must_use]
    pub const fn has_ended(&self, now: u64) -> bool {
        now >= self.ends_at
    }
}

/// An administrator account with its permission set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Administrator {
    /// Account id
    pub id: u32,
    /// Login username, unique across administrators
    pub username: String,
    /// Stored salted-hash credential
    pub credential: Credential,
    /// Capabilities held by this administrator
    pub permissions: BTreeSet<Permission>,
}

/// Lookup interface for tutor accounts
pub trait TutorDirectory: Send + Sync {
    /// Find a tutor by account id
    fn find_by_id(&self, id: u32) -> Option<Tutor>;
    /// Find a tutor by username
    fn find_by_username(&self, username: &str) -> Option<Tutor>;
}

/// Lookup interface for teams
pub trait TeamDirectory: Send + Sync {
    /// Find a team by id
    fn find_by_id(&self, id: u32) -> Option<Team>;
}

/// Lookup interface for evaluation stages
pub trait StageDirectory: Send + Sync {
    /// Find a stage by id
    fn find_by_id(&self, id: u32) -> Option<Stage>;
}

/// In-memory tutor directory
#[derive(Debug, Default)]
pub struct InMemoryTutors {
    tutors: RwLock<BTreeMap<u32, Tutor>>,
}

impl InMemoryTutors {
    /// Create an empty directory
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tutor. Returns `false` without inserting when the id or
    /// username is already taken.
    pub fn insert(&self, tutor: Tutor) -> bool {
        let mut tutors = self.tutors.write();
        if tutors.contains_key(&tutor.id) || tutors.values().any(|t| t.username == tutor.username)
        {
            return false;
        }
        tutors.insert(tutor.id, tutor);
        true
    }

    /// Replace a tutor's stored credential. Returns `false` if the id is
    /// unknown.
    pub fn update_credential(&self, id: u32, credential: Credential) -> bool {
        let mut tutors = self.tutors.write();
        match tutors.get_mut(&id) {
            Some(tutor) => {
                tutor.credential = credential;
                true
            }
            None => false,
        }
    }

    /// Apply a partial profile update, returning the updated record.
    ///
    /// The duplicate check and the write happen under one lock hold, so a
    /// username can never be taken by two tutors through racing updates.
    ///
    /// # Errors
    ///
    /// `AccessError::NotFound` for an unknown id;
    /// `AccessError::InvalidArgument` when the new username belongs to
    /// another tutor.
    pub fn update_profile(&self, id: u32, update: TutorUpdate) -> Result<Tutor> {
        let mut tutors = self.tutors.write();
        if let Some(username) = &update.username {
            if tutors.values().any(|t| t.id != id && &t.username == username) {
                return Err(AccessError::InvalidArgument(format!(
                    "tutor {username} already exists"
                )));
            }
        }
        let tutor = tutors.get_mut(&id).ok_or(AccessError::NotFound)?;
        if let Some(username) = update.username {
            tutor.username = username;
        }
        if let Some(display_name) = update.display_name {
            tutor.display_name = display_name;
        }
        if let Some(email) = update.email {
            tutor.email = Some(email);
        }
        if let Some(phone) = update.phone {
            tutor.phone = Some(phone);
        }
        Ok(tutor.clone())
    }

    /// Remove a tutor by id
    pub fn remove(&self, id: u32) -> bool {
        self.tutors.write().remove(&id).is_some()
    }
}

impl TutorDirectory for InMemoryTutors {
    fn find_by_id(&self, id: u32) -> Option<Tutor> {
        self.tutors.read().get(&id).cloned()
    }

    fn find_by_username(&self, username: &str) -> Option<Tutor> {
        self.tutors
            .read()
            .values()
            .find(|t| t.username == username)
            .cloned()
    }
}

/// In-memory team directory
#[derive(Debug, Default)]
pub struct InMemoryTeams {
    teams: RwLock<BTreeMap<u32, Team>>,
}

impl InMemoryTeams {
    /// Create an empty directory
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a team
    pub fn insert(&self, team: Team) {
        self.teams.write().insert(team.id, team);
    }
}

impl TeamDirectory for InMemoryTeams {
    fn find_by_id(&self, id: u32) -> Option<Team> {
        self.teams.read().get(&id).cloned()
    }
}

/// In-memory stage directory
#[derive(Debug, Default)]
pub struct InMemoryStages {
    stages: RwLock<BTreeMap<u32, Stage>>,
}

impl InMemoryStages {
    /// Create an empty directory
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a stage
    pub fn insert(&self, stage: Stage) {
        self.stages.write().insert(stage.id, stage);
    }

    /// Remove a stage by id
    pub fn remove(&self, id: u32) -> bool {
        self.stages.write().remove(&id).is_some()
    }
}

impl StageDirectory for InMemoryStages {
    fn find_by_id(&self, id: u32) -> Option<Stage> {
        self.stages.read().get(&id).copied()
    }
}

/// In-memory administrator directory
#[derive(Debug, Default)]
pub struct InMemoryAdministrators {
    administrators: RwLock<BTreeMap<u32, Administrator>>,
}

impl InMemoryAdministrators {
    /// Create an empty directory
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an administrator. Returns `false` without inserting when
    /// the id or username is already taken.
    pub fn insert(&self, administrator: Administrator) -> bool {
        let mut administrators = self.administrators.write();
        if administrators.contains_key(&administrator.id)
            || administrators
                .values()
                .any(|a| a.username == administrator.username)
        {
            return false;
        }
        administrators.insert(administrator.id, administrator);
        true
    }

    /// Find an administrator by account id
    pub fn find_by_id(&self, id: u32) -> Option<Administrator> {
        self.administrators.read().get(&id).cloned()
    }

    /// Find an administrator by username
    pub fn find_by_username(&self, username: &str) -> Option<Administrator> {
        self.administrators
            .read()
            .values()
            .find(|a| a.username == username)
            .cloned()
    }

    /// Replace an administrator's stored credential. Returns `false` if
    /// the id is unknown.
    pub fn update_credential(&self, id: u32, credential: Credential) -> bool {
        let mut administrators = self.administrators.write();
        match administrators.get_mut(&id) {
            Some(administrator) => {
                administrator.credential = credential;
                true
            }
            None => false,
        }
    }

    /// Remove an administrator by id
    pub fn remove(&self, id: u32) -> bool {
        self.administrators.write().remove(&id).is_some()
    }
}
