//! Role-scoped visibility and authorization.
//!
//! The access rule is defined exactly once here and consumed by every
//! repository operation and by the reporting layer: an admin sees and mutates
//! every row, a standard user only their own.

use recibo_shared::{Claims, Role};
use uuid::Uuid;

/// The caller's visibility scope, derived from an identity claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope {
    subject: Uuid,
    role: Role,
}

impl Scope {
    /// Builds a scope from an externally-verified claim.
    #[must_use]
    pub const fn from_claims(claims: &Claims) -> Self {
        Self {
            subject: claims.sub,
            role: claims.role,
        }
    }

    /// Builds a scope from raw parts.
    #[must_use]
    pub const fn new(subject: Uuid, role: Role) -> Self {
        Self { subject, role }
    }

    /// The calling user's id.
    #[must_use]
    pub const fn subject(&self) -> Uuid {
        self.subject
    }

    /// The calling user's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Row filter for list queries.
    ///
    /// `None` means unrestricted (admin); `Some(id)` restricts results to
    /// rows with `owner_id = id`.
    #[must_use]
    pub const fn owner_filter(&self) -> Option<Uuid> {
        match self.role {
            Role::Admin => None,
            Role::StandardUser => Some(self.subject),
        }
    }

    /// Single-row authorization: allow iff the caller is an admin or owns
    /// the row.
    #[must_use]
    pub fn can_access(&self, owner_id: Uuid) -> bool {
        self.role.is_admin() || owner_id == self.subject
    }
}
