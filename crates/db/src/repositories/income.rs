//! Income repository with role-scoped access.
//!
//! Same shape as the expense repository, without the receipt dimension.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::incomes;
use recibo_core::access::Scope;
use recibo_core::ledger::{Income, NewIncome};

/// Error types for income operations.
#[derive(Debug, thiserror::Error)]
pub enum IncomeError {
    /// No income row with that id exists at all.
    #[error("Income not found: {0}")]
    NotFound(Uuid),

    /// The row exists but is owned by another user and the caller is not an
    /// admin.
    #[error("Not authorized")]
    Forbidden,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Income repository implementation.
#[derive(Debug, Clone)]
pub struct IncomeRepository {
    db: DatabaseConnection,
}

impl IncomeRepository {
    /// Creates a new income repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists incomes visible to the caller, newest business date first,
    /// creation time as tie-break.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, scope: &Scope) -> Result<Vec<Income>, IncomeError> {
        let mut query = incomes::Entity::find();

        if let Some(owner) = scope.owner_filter() {
            query = query.filter(incomes::Column::UserId.eq(owner));
        }

        let models = query
            .order_by_desc(incomes::Column::IncomeDate)
            .order_by_desc(incomes::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(to_domain).collect())
    }

    /// Fetches a single income.
    ///
    /// # Errors
    ///
    /// `NotFound` when no row with that id exists; `Forbidden` when the row
    /// exists but fails the caller's scope.
    pub async fn get(&self, id: Uuid, scope: &Scope) -> Result<Income, IncomeError> {
        let model = incomes::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(IncomeError::NotFound(id))?;

        if !scope.can_access(model.user_id) {
            return Err(IncomeError::Forbidden);
        }

        Ok(to_domain(model))
    }

    /// Inserts a new income owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, owner_id: Uuid, input: &NewIncome) -> Result<Income, IncomeError> {
        let model = incomes::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(owner_id),
            source: Set(input.source.clone()),
            amount: Set(input.amount),
            income_date: Set(input.income_date),
            description: Set(input.description.clone()),
            created_at: Set(Utc::now().into()),
        };

        let inserted = model.insert(&self.db).await?;
        Ok(to_domain(inserted))
    }

    /// Updates an income's fields in a single row write.
    ///
    /// # Errors
    ///
    /// `NotFound`/`Forbidden` per the fixed precedence, or a database error.
    pub async fn update(
        &self,
        id: Uuid,
        scope: &Scope,
        input: &NewIncome,
    ) -> Result<Income, IncomeError> {
        let model = incomes::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(IncomeError::NotFound(id))?;

        if !scope.can_access(model.user_id) {
            return Err(IncomeError::Forbidden);
        }

        let mut active: incomes::ActiveModel = model.into();
        active.source = Set(input.source.clone());
        active.amount = Set(input.amount);
        active.income_date = Set(input.income_date);
        active.description = Set(input.description.clone());

        let updated = active.update(&self.db).await?;
        Ok(to_domain(updated))
    }

    /// Deletes an income row.
    ///
    /// # Errors
    ///
    /// `NotFound`/`Forbidden` per the fixed precedence, or a database error.
    pub async fn delete(&self, id: Uuid, scope: &Scope) -> Result<(), IncomeError> {
        let model = incomes::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(IncomeError::NotFound(id))?;

        if !scope.can_access(model.user_id) {
            return Err(IncomeError::Forbidden);
        }

        incomes::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }
}

/// Convert database model to domain model.
fn to_domain(model: incomes::Model) -> Income {
    Income {
        id: model.id,
        owner_id: model.user_id,
        source: model.source,
        amount: model.amount,
        income_date: model.income_date,
        description: model.description,
        created_at: model.created_at.with_timezone(&chrono::Utc),
    }
}
