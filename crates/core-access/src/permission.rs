//! Administrator capability set

use serde::{Deserialize, Serialize};
use std::fmt;

/// Named administrator capability.
///
/// The set is closed and the serialized names are stable across versions;
/// renaming a variant is a breaking change for persisted permission sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Permission {
    /// Register new administrator accounts
    RegisterAdministrator,
    /// Edit or delete administrator accounts other than one's own
    ManageAdministrator,
    /// Register, edit, or delete tutor accounts
    ManageTutor,
    /// Issue and revoke delegation tokens
    ManageToken,
    /// Mutate reviews owned by other viewers
    ManageReview,
    /// Create and edit evaluation stages
    CreateTask,
    /// Aggregate review results across viewers
    ViewReport,
    /// Reset account passwords without the old password
    ResetPassword,
}

impl Permission {
    /// The stable serialized name of this permission
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::RegisterAdministrator => "RegisterAdministrator",
            Self::ManageAdministrator => "ManageAdministrator",
            Self::ManageTutor => "ManageTutor",
            Self::ManageToken => "ManageToken",
            Self::ManageReview => "ManageReview",
            Self::CreateTask => "CreateTask",
            Self::ViewReport => "ViewReport",
            Self::ResetPassword => "ResetPassword",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
