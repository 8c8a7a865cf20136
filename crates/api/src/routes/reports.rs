//! Report routes: period-filtered expense views and summary statistics.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::routes::expenses::ExpenseResponse;
use crate::{AppState, middleware::AuthUser, response::error_response};
use recibo_core::report::{Period, PeriodRef, ReportAggregator};
use recibo_db::{ExpenseRepository, IncomeRepository};
use recibo_shared::AppError;

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports", get(period_report))
        .route("/reports/summary", get(summary))
}

/// Query parameters for the period report.
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    /// Granularity: `day`, `month`, or `year`.
    pub period: Option<String>,
    /// Reference date: ISO day, `YYYY-MM`, or `YYYY` to match the period.
    pub date: Option<String>,
}

/// GET `/reports` - Expenses filtered by calendar period.
///
/// Without `period`+`date` the caller's whole scope is returned.
async fn period_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ReportQuery>,
) -> impl IntoResponse {
    let window = match parse_window(&query) {
        Ok(window) => window,
        Err(response) => return response,
    };

    let repo = ExpenseRepository::new((*state.db).clone());
    let expenses = match repo.list(&auth.scope()).await {
        Ok(expenses) => expenses,
        Err(e) => {
            error!(error = %e, "Failed to load expenses for report");
            return internal_error();
        }
    };

    let filtered = match &window {
        Some(window) => ReportAggregator::filter_by_period(expenses, window),
        None => expenses,
    };
    let subtotal = ReportAggregator::subtotal(&filtered);
    let count = filtered.len();

    let rows: Vec<ExpenseResponse> = filtered.into_iter().map(ExpenseResponse::from).collect();

    (
        StatusCode::OK,
        Json(json!({
            "expenses": rows,
            "subtotal": subtotal.to_string(),
            "period": query.period,
            "date": query.date,
            "count": count
        })),
    )
        .into_response()
}

/// GET `/reports/summary` - Summary statistics over the caller's scope.
async fn summary(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let scope = auth.scope();

    let expense_repo = ExpenseRepository::new((*state.db).clone());
    let expenses = match expense_repo.list(&scope).await {
        Ok(expenses) => expenses,
        Err(e) => {
            error!(error = %e, "Failed to load expenses for summary");
            return internal_error();
        }
    };

    let income_repo = IncomeRepository::new((*state.db).clone());
    let incomes = match income_repo.list(&scope).await {
        Ok(incomes) => incomes,
        Err(e) => {
            error!(error = %e, "Failed to load incomes for summary");
            return internal_error();
        }
    };

    let today = chrono::Utc::now().date_naive();
    let summary = ReportAggregator::summarize(&expenses, &incomes, today);

    (StatusCode::OK, Json(summary)).into_response()
}

/// Parses the optional period window; both parameters must be present
/// together.
fn parse_window(query: &ReportQuery) -> Result<Option<PeriodRef>, Response> {
    let (Some(period), Some(date)) = (query.period.as_deref(), query.date.as_deref()) else {
        return Ok(None);
    };

    let period = Period::parse(period).map_err(|e| validation_error(&e.to_string()))?;
    let window = PeriodRef::parse(period, date).map_err(|e| validation_error(&e.to_string()))?;

    Ok(Some(window))
}

fn validation_error(message: &str) -> Response {
    error_response(&AppError::Validation(message.to_string()))
}

fn internal_error() -> Response {
    error_response(&AppError::Database("An error occurred".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn query(period: Option<&str>, date: Option<&str>) -> ReportQuery {
        ReportQuery {
            period: period.map(ToString::to_string),
            date: date.map(ToString::to_string),
        }
    }

    #[test]
    fn test_missing_params_mean_unfiltered() {
        assert!(parse_window(&query(None, None)).unwrap().is_none());
        assert!(parse_window(&query(Some("day"), None)).unwrap().is_none());
        assert!(
            parse_window(&query(None, Some("2024-01-15")))
                .unwrap()
                .is_none()
        );
    }

    #[rstest]
    #[case("day", "2024-01-15")]
    #[case("month", "2024-01")]
    #[case("year", "2024")]
    fn test_valid_windows_parse(#[case] period: &str, #[case] date: &str) {
        let window = parse_window(&query(Some(period), Some(date))).unwrap();
        assert!(window.is_some());
    }

    #[rstest]
    #[case("week", "2024-01-15")]
    #[case("day", "2024-01")]
    #[case("month", "January")]
    fn test_invalid_windows_rejected(#[case] period: &str, #[case] date: &str) {
        assert!(parse_window(&query(Some(period), Some(date))).is_err());
    }
}
