//! Identity claims and authentication payload types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User role, as a closed enumeration.
///
/// The database stores the lowercase string values (`admin` / `user`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Administrator: sees and mutates every user's rows.
    #[serde(rename = "admin")]
    Admin,
    /// Regular user: restricted to their own rows.
    #[serde(rename = "user")]
    StandardUser,
}

impl Role {
    /// Convert to database string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::StandardUser => "user",
        }
    }

    /// Parse from database string value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "user" => Some(Self::StandardUser),
            _ => None,
        }
    }

    /// Returns true for [`Role::Admin`].
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// Identity claim attached to every authenticated request.
///
/// Produced by the token layer; the rest of the system treats it as an
/// externally-verified `{subject, role}` pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// The subject's role.
    pub role: Role,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(user_id: Uuid, role: Role, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub: user_id,
            role,
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Username.
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

/// Registration request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// Username.
    pub username: String,
    /// Plaintext password.
    pub password: String,
    /// Requested role; defaults to a standard user.
    #[serde(default = "default_role")]
    pub role: Role,
}

const fn default_role() -> Role {
    Role::StandardUser
}

/// Change password request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangePasswordRequest {
    /// Current password, re-verified before the change.
    #[serde(rename = "currentPassword")]
    pub current_password: String,
    /// New password.
    #[serde(rename = "newPassword")]
    pub new_password: String,
}

/// User info returned in auth responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    /// User ID.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Role.
    pub role: Role,
}

/// Login response payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Signed access token.
    pub token: String,
    /// Authenticated user info.
    pub user: UserInfo,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Role::Admin, "admin")]
    #[case(Role::StandardUser, "user")]
    fn test_role_roundtrip(#[case] role: Role, #[case] db_value: &str) {
        assert_eq!(role.as_str(), db_value);
        assert_eq!(Role::parse(db_value), Some(role));
    }

    #[test]
    fn test_role_unknown() {
        assert_eq!(Role::parse("superuser"), None);
    }

    #[test]
    fn test_role_serde_uses_db_strings() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(
            serde_json::to_string(&Role::StandardUser).unwrap(),
            "\"user\""
        );
    }

    #[test]
    fn test_claims_carry_subject_and_role() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(
            user_id,
            Role::StandardUser,
            Utc::now() + chrono::Duration::hours(1),
        );

        assert_eq!(claims.user_id(), user_id);
        assert!(!claims.role.is_admin());
        assert!(claims.exp > claims.iat);
    }
}
