//! User repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};
use uuid::Uuid;

use crate::entities::{sea_orm_active_enums::UserRole, users};
use recibo_shared::Role;

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        username: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<users::Model, DbErr> {
        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(username.to_string()),
            password_hash: Set(password_hash.to_string()),
            role: Set(to_db_role(role)),
            created_at: Set(chrono::Utc::now().into()),
        };

        user.insert(&self.db).await
    }

    /// Updates a user's password hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), DbErr> {
        users::Entity::update_many()
            .col_expr(
                users::Column::PasswordHash,
                sea_orm::sea_query::Expr::value(password_hash),
            )
            .filter(users::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        Ok(())
    }

    /// Checks if a username is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn username_exists(&self, username: &str) -> Result<bool, DbErr> {
        let count = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }
}

/// Convert domain role to database enum.
#[must_use]
pub fn to_db_role(role: Role) -> UserRole {
    match role {
        Role::Admin => UserRole::Admin,
        Role::StandardUser => UserRole::User,
    }
}

/// Convert database enum to domain role.
#[must_use]
pub fn from_db_role(role: &UserRole) -> Role {
    match role {
        UserRole::Admin => Role::Admin,
        UserRole::User => Role::StandardUser,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_mapping_roundtrip() {
        for role in [Role::Admin, Role::StandardUser] {
            assert_eq!(from_db_role(&to_db_role(role)), role);
        }
    }
}
