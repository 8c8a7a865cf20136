//! Expense routes with receipt-image handling.
//!
//! Mutating handlers own the ordering between the receipt lifecycle and the
//! row write: the new file must exist before the row references it, an old
//! file is only discarded once its replacement is durable, and a failed row
//! write discards the file it would have referenced.

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;
use std::str::FromStr;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser, response::error_response};
use recibo_core::ledger::{Expense, NewExpense, validate_expense};
use recibo_core::receipt::{ReceiptError, ReceiptUpload};
use recibo_db::ExpenseRepository;
use recibo_db::repositories::ExpenseError;
use recibo_shared::AppError;

/// Creates the expense routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", get(list_expenses))
        .route("/expenses", post(create_expense))
        .route("/expenses/{id}", get(get_expense))
        .route("/expenses/{id}", put(update_expense))
        .route("/expenses/{id}", delete(delete_expense))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response for an expense row.
#[derive(Debug, Serialize)]
pub struct ExpenseResponse {
    /// Expense ID.
    pub id: Uuid,
    /// Owning user ID.
    pub user_id: Uuid,
    /// Product name.
    pub product_name: String,
    /// Quantity.
    pub quantity: String,
    /// Unit price.
    pub unit_price: String,
    /// Computed total.
    pub total: String,
    /// Public path of the receipt image, if any.
    pub receipt_image: Option<String>,
    /// Business date.
    pub expense_date: String,
    /// Creation timestamp.
    pub created_at: String,
}

impl From<Expense> for ExpenseResponse {
    fn from(expense: Expense) -> Self {
        Self {
            id: expense.id,
            user_id: expense.owner_id,
            product_name: expense.product_name,
            quantity: expense.quantity.to_string(),
            unit_price: expense.unit_price.to_string(),
            total: expense.total.to_string(),
            receipt_image: expense
                .receipt
                .map(|r| r.storage_path().to_string()),
            expense_date: expense.expense_date.to_string(),
            created_at: expense.created_at.to_rfc3339(),
        }
    }
}

/// Parsed multipart form: validated expense fields plus an optional receipt
/// upload.
struct ExpenseForm {
    input: NewExpense,
    upload: Option<ReceiptUpload>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/expenses` - List expenses visible to the caller.
async fn list_expenses(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = ExpenseRepository::new((*state.db).clone());

    match repo.list(&auth.scope()).await {
        Ok(expenses) => {
            let rows: Vec<ExpenseResponse> =
                expenses.into_iter().map(ExpenseResponse::from).collect();
            (StatusCode::OK, Json(rows)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list expenses");
            expense_error_response(&e)
        }
    }
}

/// GET `/expenses/{id}` - Fetch a single expense.
async fn get_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = ExpenseRepository::new((*state.db).clone());

    match repo.get(id, &auth.scope()).await {
        Ok(expense) => (StatusCode::OK, Json(ExpenseResponse::from(expense))).into_response(),
        Err(e) => expense_error_response(&e),
    }
}

/// POST `/expenses` - Create a new expense, optionally with a receipt image.
async fn create_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> impl IntoResponse {
    let form = match read_expense_form(multipart).await {
        Ok(form) => form,
        Err(response) => return response,
    };

    // The receipt chain runs to completion before the row is written, so the
    // row never references a file that failed to promote.
    let receipt = match form.upload {
        Some(upload) => match state.receipts.store(upload).await {
            Ok(handle) => Some(handle),
            Err(e) => return receipt_error_response(&e),
        },
        None => None,
    };

    let repo = ExpenseRepository::new((*state.db).clone());

    match repo
        .create(auth.user_id(), &form.input, receipt.as_ref())
        .await
    {
        Ok(expense) => {
            info!(expense_id = %expense.id, user_id = %auth.user_id(), "Expense created");
            (
                StatusCode::CREATED,
                Json(json!({
                    "message": "Expense created successfully",
                    "id": expense.id
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create expense");
            // Compensating action: the promoted file has no owning row.
            if let Some(handle) = receipt {
                state.receipts.discard(&handle).await;
            }
            expense_error_response(&e)
        }
    }
}

/// PUT `/expenses/{id}` - Update an expense, optionally replacing its receipt.
async fn update_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> impl IntoResponse {
    let form = match read_expense_form(multipart).await {
        Ok(form) => form,
        Err(response) => return response,
    };

    let scope = auth.scope();
    let repo = ExpenseRepository::new((*state.db).clone());

    let existing = match repo.get(id, &scope).await {
        Ok(expense) => expense,
        Err(e) => return expense_error_response(&e),
    };

    let new_receipt = match form.upload {
        Some(upload) => match state
            .receipts
            .replace(existing.receipt.as_ref(), upload)
            .await
        {
            Ok(handle) => Some(handle),
            Err(e) => return receipt_error_response(&e),
        },
        None => None,
    };

    match repo
        .update(id, &scope, &form.input, new_receipt.as_ref())
        .await
    {
        Ok(_) => {
            info!(expense_id = %id, user_id = %auth.user_id(), "Expense updated");
            (
                StatusCode::OK,
                Json(json!({ "message": "Expense updated successfully" })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to update expense");
            if let Some(handle) = new_receipt {
                state.receipts.discard(&handle).await;
            }
            expense_error_response(&e)
        }
    }
}

/// DELETE `/expenses/{id}` - Delete an expense and its receipt file.
async fn delete_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let scope = auth.scope();
    let repo = ExpenseRepository::new((*state.db).clone());

    let existing = match repo.get(id, &scope).await {
        Ok(expense) => expense,
        Err(e) => return expense_error_response(&e),
    };

    // File first, then row; discard never fails the request, so the row
    // deletion proceeds regardless of the file-system outcome.
    if let Some(receipt) = &existing.receipt {
        state.receipts.discard(receipt).await;
    }

    match repo.delete(id, &scope).await {
        Ok(()) => {
            info!(expense_id = %id, user_id = %auth.user_id(), "Expense deleted");
            (
                StatusCode::OK,
                Json(json!({ "message": "Expense deleted successfully" })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to delete expense");
            expense_error_response(&e)
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Reads and validates the multipart expense form.
///
/// Field parsing rejects with 400 before any storage is touched.
async fn read_expense_form(mut multipart: Multipart) -> Result<ExpenseForm, Response> {
    let mut product_name: Option<String> = None;
    let mut quantity: Option<String> = None;
    let mut unit_price: Option<String> = None;
    let mut expense_date: Option<String> = None;
    let mut upload: Option<ReceiptUpload> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return Err(validation_error(&format!("Invalid form data: {e}")));
            }
        };

        let Some(name) = field.name().map(ToString::to_string) else {
            continue;
        };

        match name.as_str() {
            "product_name" => product_name = read_text_field(field).await?,
            "quantity" => quantity = read_text_field(field).await?,
            "unit_price" => unit_price = read_text_field(field).await?,
            "expense_date" => expense_date = read_text_field(field).await?,
            "receipt" => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| validation_error(&format!("Invalid form data: {e}")))?;

                // An empty file part means "no receipt".
                if !data.is_empty() {
                    upload = Some(ReceiptUpload::new(data.to_vec(), content_type));
                }
            }
            _ => {}
        }
    }

    let product_name =
        product_name.ok_or_else(|| validation_error("Product name is required"))?;
    let quantity = parse_decimal(quantity, "Quantity must be greater than 0")?;
    let unit_price = parse_decimal(unit_price, "Unit price must be greater than 0")?;
    let expense_date = expense_date
        .as_deref()
        .and_then(|s| NaiveDate::from_str(s).ok())
        .ok_or_else(|| validation_error("Valid date is required"))?;

    let input = NewExpense {
        product_name,
        quantity,
        unit_price,
        expense_date,
    };

    validate_expense(&input).map_err(|e| validation_error(&e.to_string()))?;

    Ok(ExpenseForm { input, upload })
}

async fn read_text_field(
    field: axum::extract::multipart::Field<'_>,
) -> Result<Option<String>, Response> {
    field
        .text()
        .await
        .map(Some)
        .map_err(|e| validation_error(&format!("Invalid form data: {e}")))
}

fn parse_decimal(value: Option<String>, message: &str) -> Result<Decimal, Response> {
    value
        .as_deref()
        .and_then(|s| Decimal::from_str(s.trim()).ok())
        .ok_or_else(|| validation_error(message))
}

fn validation_error(message: &str) -> Response {
    error_response(&AppError::Validation(message.to_string()))
}

fn expense_error_response(e: &ExpenseError) -> Response {
    match e {
        ExpenseError::NotFound(_) => {
            error_response(&AppError::NotFound("Expense not found".to_string()))
        }
        ExpenseError::Forbidden => {
            error_response(&AppError::Forbidden("Access denied".to_string()))
        }
        ExpenseError::Database(_) => {
            error_response(&AppError::Database("An error occurred".to_string()))
        }
    }
}

fn receipt_error_response(e: &ReceiptError) -> Response {
    if e.is_validation() {
        return error_response(&AppError::Validation(e.to_string()));
    }

    error!(error = %e, "Receipt lifecycle failure");
    match e {
        ReceiptError::Decode(_) => error_response(&AppError::Processing(
            "Failed to process receipt image".to_string(),
        )),
        _ => error_response(&AppError::Internal("An error occurred".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_decimal_accepts_trimmed_numbers() {
        assert_eq!(
            parse_decimal(Some("10.50".to_string()), "msg").unwrap(),
            dec!(10.50)
        );
        assert_eq!(
            parse_decimal(Some("  2 ".to_string()), "msg").unwrap(),
            dec!(2)
        );
    }

    #[test]
    fn test_parse_decimal_rejects_garbage_and_missing() {
        assert!(parse_decimal(Some("ten".to_string()), "msg").is_err());
        assert!(parse_decimal(None, "msg").is_err());
    }

    #[test]
    fn test_expense_response_exposes_receipt_path() {
        use recibo_core::receipt::ReceiptHandle;

        let expense = Expense {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            product_name: "Coffee".to_string(),
            quantity: dec!(2),
            unit_price: dec!(10.50),
            total: dec!(21.00),
            receipt: Some(ReceiptHandle::from_stored(
                "uploads/receipts/receipt-abc.jpg",
            )),
            expense_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            created_at: chrono::Utc::now(),
        };

        let response = ExpenseResponse::from(expense);
        assert_eq!(response.total, "21.00");
        assert_eq!(
            response.receipt_image.as_deref(),
            Some("uploads/receipts/receipt-abc.jpg")
        );
        assert_eq!(response.expense_date, "2024-01-15");
    }
}
