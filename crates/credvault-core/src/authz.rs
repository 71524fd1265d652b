//! The authorization engine.
//!
//! A single pure decision function gates every credential and
//! administration operation in the system. Callers build an [`Action`]
//! describing what they want to do and ask [`can_access`] for a
//! [`Decision`]; a `Deny` is a value the caller turns into a
//! `Forbidden` error, never a panic or an exception.
//!
//! Division membership is always compared by id equality.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::{Role, User};

/// The resolved identity of the caller for one request.
///
/// Built by the identity layer from a verified token plus a fresh read
/// of the user record, and trusted verbatim for the duration of that
/// request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: Uuid,
    pub role: Role,
    pub divisions: HashSet<Uuid>,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn has_division(&self, division_id: Uuid) -> bool {
        self.divisions.contains(&division_id)
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Principal {
            user_id: user.id,
            role: user.role,
            divisions: user.divisions.iter().copied().collect(),
        }
    }
}

/// An action on a target entity. Credential actions carry the id of
/// the division that owns (or would own) the credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ReadCredential { division_id: Uuid },
    CreateCredential { division_id: Uuid },
    UpdateCredential { division_id: Uuid },
    DeleteCredential { division_id: Uuid },
    /// Mutating user↔division / user↔OU assignments.
    Assign,
    /// Overwriting a user's role.
    ChangeRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        *self == Decision::Allow
    }
}

/// Decide whether `principal` may perform `action`.
///
/// Rules, in precedence order:
/// 1. Admins may do everything.
/// 2. Read/create on a credential requires membership in its division.
/// 3. Normal users never update or delete, even in their own divisions.
/// 4. Management users may update/delete within their own divisions.
/// 5. Assignment and role changes are admin-only.
pub fn can_access(principal: &Principal, action: &Action) -> Decision {
    if principal.is_admin() {
        return Decision::Allow;
    }

    match *action {
        Action::ReadCredential { division_id } | Action::CreateCredential { division_id } => {
            if principal.has_division(division_id) {
                Decision::Allow
            } else {
                Decision::Deny
            }
        }
        Action::UpdateCredential { division_id } | Action::DeleteCredential { division_id } => {
            match principal.role {
                Role::Management if principal.has_division(division_id) => Decision::Allow,
                _ => Decision::Deny,
            }
        }
        Action::Assign | Action::ChangeRole => Decision::Deny,
    }
}
