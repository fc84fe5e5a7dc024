//! Financial transaction HTTP handlers.
//!
//! This module implements the transaction-related API endpoints:
//! - POST /financial-transactions - Create transaction
//! - GET /financial-transactions - List with filters and pagination
//! - GET /financial-transactions/stats - Aggregate statistics
//! - GET /financial-transactions/{id} - Get transaction by ID
//! - PUT|PATCH /financial-transactions/{id} - Update transaction
//! - DELETE /financial-transactions/{id} - Delete transaction
//!
//! Every operation is scoped to the authenticated owner. A transaction that
//! belongs to someone else answers exactly like a missing one (404).

use crate::{
    error::AppError,
    middleware::auth::AuthContext,
    models::financial_transaction::{
        CreateTransactionRequest, ListTransactionsQuery, Pagination, StatsQuery, StatsResponse,
        TransactionListResponse, TransactionResponse, UpdateTransactionRequest,
    },
    services::transaction_service,
    state::AppState,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

/// Create a new financial transaction owned by the caller.
///
/// # Request Body
///
/// ```json
/// {
///   "valor": 123.456,
///   "empresa": "Acme Ltda",
///   "data": "2025-06-01T12:00:00Z",
///   "tipo": "Receita"
/// }
/// ```
///
/// # Response (201)
///
/// The stored record, with `valor` as a plain JSON number carrying the
/// exact decimal digits.
pub async fn create_transaction(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<TransactionResponse>), AppError> {
    let new_transaction = request.validate()?;

    let transaction =
        transaction_service::create(&state.pool, auth.user_id, new_transaction).await?;

    Ok((StatusCode::CREATED, Json(transaction.into())))
}

/// List the caller's transactions with optional filters and pagination.
///
/// # Query Parameters
///
/// `?page=1&limit=10&tipo=Despesa&empresa=acme&startDate=...&endDate=...`
///
/// # Response (200)
///
/// ```json
/// {
///   "transactions": [ ... ],
///   "pagination": { "page": 1, "limit": 10, "total": 42, "totalPages": 5 }
/// }
/// ```
///
/// A page past the end of the data returns an empty array with correct
/// totals, not an error.
pub async fn list_transactions(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ListTransactionsQuery>,
) -> Result<Json<TransactionListResponse>, AppError> {
    let filter = query.validate()?;

    let (transactions, total) =
        transaction_service::list(&state.pool, auth.user_id, &filter).await?;

    let pagination = Pagination {
        page: filter.page,
        limit: filter.limit,
        total,
        total_pages: filter.total_pages(total),
    };

    Ok(Json(TransactionListResponse {
        transactions: transactions.into_iter().map(Into::into).collect(),
        pagination,
    }))
}

/// Aggregate statistics over the caller's transactions.
///
/// # Response (200)
///
/// ```json
/// {
///   "stats": {
///     "totalTransactions": 12,
///     "totalReceitas": { "amount": 1000.5, "count": 7 },
///     "totalDespesas": { "amount": 250, "count": 5 },
///     "saldo": 750.5
///   }
/// }
/// ```
pub async fn get_transaction_stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<StatsResponse>, AppError> {
    let filter = query.validate()?;

    let stats = transaction_service::stats(&state.pool, auth.user_id, &filter).await?;

    Ok(Json(StatsResponse { stats }))
}

/// Get a single transaction by ID.
///
/// # Security
///
/// The query filters by BOTH `id` AND the authenticated owner, so a
/// transaction owned by another user yields the same 404 as a missing one.
pub async fn get_transaction(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<TransactionResponse>, AppError> {
    let transaction = transaction_service::find_by_id(&state.pool, auth.user_id, transaction_id)
        .await?
        .ok_or(AppError::TransactionNotFound)?;

    Ok(Json(transaction.into()))
}

/// Update a transaction, applying only the fields present in the payload.
///
/// Serves both PUT and PATCH; a full payload and a partial one follow the
/// same per-field rules.
pub async fn update_transaction(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(transaction_id): Path<Uuid>,
    Json(request): Json<UpdateTransactionRequest>,
) -> Result<Json<TransactionResponse>, AppError> {
    let patch = request.validate()?;

    let transaction =
        transaction_service::update(&state.pool, auth.user_id, transaction_id, patch)
            .await?
            .ok_or(AppError::TransactionNotFound)?;

    Ok(Json(transaction.into()))
}

/// Delete a transaction.
///
/// Responds 204 with an empty body; deleting an id that does not exist (or
/// is not owned by the caller) is a clean 404.
pub async fn delete_transaction(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(transaction_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = transaction_service::delete(&state.pool, auth.user_id, transaction_id).await?;

    if !deleted {
        return Err(AppError::TransactionNotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}
