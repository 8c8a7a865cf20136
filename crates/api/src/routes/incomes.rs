//! Income routes. Plain JSON CRUD, no file handling.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser, response::error_response};
use recibo_core::ledger::{Income, NewIncome, validate_income};
use recibo_db::IncomeRepository;
use recibo_db::repositories::IncomeError;
use recibo_shared::AppError;

/// Creates the income routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/incomes", get(list_incomes))
        .route("/incomes", post(create_income))
        .route("/incomes/{id}", get(get_income))
        .route("/incomes/{id}", put(update_income))
        .route("/incomes/{id}", delete(delete_income))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating or updating an income.
#[derive(Debug, Deserialize)]
pub struct IncomeRequest {
    /// Where the money came from.
    pub source: String,
    /// Amount received.
    pub amount: Decimal,
    /// Business date (YYYY-MM-DD).
    pub income_date: NaiveDate,
    /// Free-form note.
    pub description: Option<String>,
}

impl IncomeRequest {
    fn into_validated(self) -> Result<NewIncome, Response> {
        let input = NewIncome {
            source: self.source,
            amount: self.amount,
            income_date: self.income_date,
            description: self.description,
        };

        validate_income(&input)
            .map_err(|e| error_response(&AppError::Validation(e.to_string())))?;

        Ok(input)
    }
}

/// Response for an income row.
#[derive(Debug, Serialize)]
pub struct IncomeResponse {
    /// Income ID.
    pub id: Uuid,
    /// Owning user ID.
    pub user_id: Uuid,
    /// Source of the income.
    pub source: String,
    /// Amount.
    pub amount: String,
    /// Business date.
    pub income_date: String,
    /// Free-form note.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
}

impl From<Income> for IncomeResponse {
    fn from(income: Income) -> Self {
        Self {
            id: income.id,
            user_id: income.owner_id,
            source: income.source,
            amount: income.amount.to_string(),
            income_date: income.income_date.to_string(),
            description: income.description,
            created_at: income.created_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/incomes` - List incomes visible to the caller.
async fn list_incomes(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = IncomeRepository::new((*state.db).clone());

    match repo.list(&auth.scope()).await {
        Ok(incomes) => {
            let rows: Vec<IncomeResponse> = incomes.into_iter().map(IncomeResponse::from).collect();
            (StatusCode::OK, Json(rows)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list incomes");
            income_error_response(&e)
        }
    }
}

/// GET `/incomes/{id}` - Fetch a single income.
async fn get_income(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = IncomeRepository::new((*state.db).clone());

    match repo.get(id, &auth.scope()).await {
        Ok(income) => (StatusCode::OK, Json(IncomeResponse::from(income))).into_response(),
        Err(e) => income_error_response(&e),
    }
}

/// POST `/incomes` - Create a new income.
async fn create_income(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<IncomeRequest>,
) -> impl IntoResponse {
    let input = match payload.into_validated() {
        Ok(input) => input,
        Err(response) => return response,
    };

    let repo = IncomeRepository::new((*state.db).clone());

    match repo.create(auth.user_id(), &input).await {
        Ok(income) => {
            info!(income_id = %income.id, user_id = %auth.user_id(), "Income created");
            (StatusCode::CREATED, Json(IncomeResponse::from(income))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create income");
            income_error_response(&e)
        }
    }
}

/// PUT `/incomes/{id}` - Update an income.
async fn update_income(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<IncomeRequest>,
) -> impl IntoResponse {
    let input = match payload.into_validated() {
        Ok(input) => input,
        Err(response) => return response,
    };

    let repo = IncomeRepository::new((*state.db).clone());

    match repo.update(id, &auth.scope(), &input).await {
        Ok(_) => {
            info!(income_id = %id, user_id = %auth.user_id(), "Income updated");
            (
                StatusCode::OK,
                Json(json!({ "message": "Income updated successfully" })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to update income");
            income_error_response(&e)
        }
    }
}

/// DELETE `/incomes/{id}` - Delete an income.
async fn delete_income(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = IncomeRepository::new((*state.db).clone());

    match repo.delete(id, &auth.scope()).await {
        Ok(()) => {
            info!(income_id = %id, user_id = %auth.user_id(), "Income deleted");
            (
                StatusCode::OK,
                Json(json!({ "message": "Income deleted successfully" })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to delete income");
            income_error_response(&e)
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn income_error_response(e: &IncomeError) -> Response {
    match e {
        IncomeError::NotFound(_) => {
            error_response(&AppError::NotFound("Income not found".to_string()))
        }
        IncomeError::Forbidden => {
            error_response(&AppError::Forbidden("Not authorized".to_string()))
        }
        IncomeError::Database(_) => {
            error_response(&AppError::Database("An error occurred".to_string()))
        }
    }
}
