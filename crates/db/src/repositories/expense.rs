//! Expense repository with role-scoped access.
//!
//! The single point of truth binding an expense row to at most one receipt
//! path. Receipt files themselves are created and destroyed by the receipt
//! store; this repository only persists the reference.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::expenses;
use recibo_core::access::Scope;
use recibo_core::ledger::{Expense, NewExpense, compute_total};
use recibo_core::receipt::ReceiptHandle;

/// Error types for expense operations.
#[derive(Debug, thiserror::Error)]
pub enum ExpenseError {
    /// No expense row with that id exists at all.
    #[error("Expense not found: {0}")]
    NotFound(Uuid),

    /// The row exists but is owned by another user and the caller is not an
    /// admin.
    #[error("Access denied")]
    Forbidden,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Expense repository implementation.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    db: DatabaseConnection,
}

impl ExpenseRepository {
    /// Creates a new expense repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists expenses visible to the caller, newest business date first,
    /// creation time as tie-break.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, scope: &Scope) -> Result<Vec<Expense>, ExpenseError> {
        let mut query = expenses::Entity::find();

        if let Some(owner) = scope.owner_filter() {
            query = query.filter(expenses::Column::UserId.eq(owner));
        }

        let models = query
            .order_by_desc(expenses::Column::ExpenseDate)
            .order_by_desc(expenses::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(to_domain).collect())
    }

    /// Fetches a single expense.
    ///
    /// # Errors
    ///
    /// `NotFound` when no row with that id exists; `Forbidden` when the row
    /// exists but fails the caller's scope.
    pub async fn get(&self, id: Uuid, scope: &Scope) -> Result<Expense, ExpenseError> {
        let model = expenses::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ExpenseError::NotFound(id))?;

        if !scope.can_access(model.user_id) {
            return Err(ExpenseError::Forbidden);
        }

        Ok(to_domain(model))
    }

    /// Inserts a new expense owned by `owner_id`.
    ///
    /// The line total is computed here, never taken from the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        owner_id: Uuid,
        input: &NewExpense,
        receipt: Option<&ReceiptHandle>,
    ) -> Result<Expense, ExpenseError> {
        let model = expenses::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(owner_id),
            product_name: Set(input.product_name.clone()),
            quantity: Set(input.quantity),
            unit_price: Set(input.unit_price),
            total: Set(compute_total(input.quantity, input.unit_price)),
            receipt_image: Set(receipt.map(|r| r.storage_path().to_string())),
            expense_date: Set(input.expense_date),
            created_at: Set(Utc::now().into()),
        };

        let inserted = model.insert(&self.db).await?;
        Ok(to_domain(inserted))
    }

    /// Updates an expense's fields in a single row write.
    ///
    /// When `new_receipt` is present the stored reference is swapped to it;
    /// otherwise the existing reference is kept untouched. The total is
    /// recomputed from the submitted fields.
    ///
    /// # Errors
    ///
    /// `NotFound`/`Forbidden` per the fixed precedence, or a database error.
    pub async fn update(
        &self,
        id: Uuid,
        scope: &Scope,
        input: &NewExpense,
        new_receipt: Option<&ReceiptHandle>,
    ) -> Result<Expense, ExpenseError> {
        let model = expenses::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ExpenseError::NotFound(id))?;

        if !scope.can_access(model.user_id) {
            return Err(ExpenseError::Forbidden);
        }

        let mut active: expenses::ActiveModel = model.into();
        active.product_name = Set(input.product_name.clone());
        active.quantity = Set(input.quantity);
        active.unit_price = Set(input.unit_price);
        active.total = Set(compute_total(input.quantity, input.unit_price));
        active.expense_date = Set(input.expense_date);
        if let Some(receipt) = new_receipt {
            active.receipt_image = Set(Some(receipt.storage_path().to_string()));
        }

        let updated = active.update(&self.db).await?;
        Ok(to_domain(updated))
    }

    /// Deletes an expense row.
    ///
    /// The caller is responsible for discarding the row's receipt file
    /// beforehand; this only removes the row and proceeds regardless of any
    /// file-system outcome.
    ///
    /// # Errors
    ///
    /// `NotFound`/`Forbidden` per the fixed precedence, or a database error.
    pub async fn delete(&self, id: Uuid, scope: &Scope) -> Result<(), ExpenseError> {
        let model = expenses::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ExpenseError::NotFound(id))?;

        if !scope.can_access(model.user_id) {
            return Err(ExpenseError::Forbidden);
        }

        expenses::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }
}

/// Convert database model to domain model.
fn to_domain(model: expenses::Model) -> Expense {
    Expense {
        id: model.id,
        owner_id: model.user_id,
        product_name: model.product_name,
        quantity: model.quantity,
        unit_price: model.unit_price,
        total: model.total,
        receipt: model.receipt_image.map(ReceiptHandle::from_stored),
        expense_date: model.expense_date,
        created_at: model.created_at.with_timezone(&chrono::Utc),
    }
}
