//! Database enum mappings.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// `user_role` database enum.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
pub enum UserRole {
    /// Administrator.
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Standard user.
    #[sea_orm(string_value = "user")]
    User,
}
