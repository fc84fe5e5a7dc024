//! Transaction service - persistence operations for financial transactions.
//!
//! Every query here is scoped to the owning user: the `user_id` column is
//! part of each WHERE clause, so a transaction that exists but belongs to
//! someone else is indistinguishable from one that does not exist.
//!
//! Optional filters use the `($n IS NULL OR column ...)` pattern so a single
//! prepared statement serves every filter combination.

use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        financial_transaction::{
            FinancialTransaction, NewTransaction, StatsBucket, StatsFilter, TransactionFilter,
            TransactionPatch, TransactionStats,
        },
        user_id::UserId,
    },
};

/// Persist a new transaction owned by `owner`.
pub async fn create(
    pool: &DbPool,
    owner: UserId,
    transaction: NewTransaction,
) -> Result<FinancialTransaction, AppError> {
    let created = sqlx::query_as::<_, FinancialTransaction>(
        r#"
        INSERT INTO financial_transactions (valor, empresa, data, tipo, user_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, valor, empresa, data, tipo, user_id, created_at, updated_at
        "#,
    )
    .bind(transaction.valor)
    .bind(&transaction.empresa)
    .bind(transaction.data)
    .bind(transaction.tipo)
    .bind(owner.as_uuid())
    .fetch_one(pool)
    .await?;

    Ok(created)
}

/// Fetch one page of the owner's transactions plus the total count of
/// matching rows.
///
/// Ordering is always by transaction date, newest first. The page and the
/// count share the same filter so the pagination block stays consistent.
pub async fn list(
    pool: &DbPool,
    owner: UserId,
    filter: &TransactionFilter,
) -> Result<(Vec<FinancialTransaction>, i64), AppError> {
    let transactions = sqlx::query_as::<_, FinancialTransaction>(
        r#"
        SELECT id, valor, empresa, data, tipo, user_id, created_at, updated_at
        FROM financial_transactions
        WHERE user_id = $1
          AND ($2::transaction_type IS NULL OR tipo = $2)
          AND ($3::text IS NULL OR empresa ILIKE '%' || $3 || '%')
          AND ($4::timestamptz IS NULL OR data >= $4)
          AND ($5::timestamptz IS NULL OR data <= $5)
        ORDER BY data DESC
        LIMIT $6 OFFSET $7
        "#,
    )
    .bind(owner.as_uuid())
    .bind(filter.tipo)
    .bind(&filter.empresa)
    .bind(filter.start_date)
    .bind(filter.end_date)
    .bind(filter.limit)
    .bind(filter.offset())
    .fetch_all(pool)
    .await?;

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM financial_transactions
        WHERE user_id = $1
          AND ($2::transaction_type IS NULL OR tipo = $2)
          AND ($3::text IS NULL OR empresa ILIKE '%' || $3 || '%')
          AND ($4::timestamptz IS NULL OR data >= $4)
          AND ($5::timestamptz IS NULL OR data <= $5)
        "#,
    )
    .bind(owner.as_uuid())
    .bind(filter.tipo)
    .bind(&filter.empresa)
    .bind(filter.start_date)
    .bind(filter.end_date)
    .fetch_one(pool)
    .await?;

    Ok((transactions, total))
}

/// Fetch a single transaction scoped to its owner.
pub async fn find_by_id(
    pool: &DbPool,
    owner: UserId,
    id: Uuid,
) -> Result<Option<FinancialTransaction>, AppError> {
    let transaction = sqlx::query_as::<_, FinancialTransaction>(
        r#"
        SELECT id, valor, empresa, data, tipo, user_id, created_at, updated_at
        FROM financial_transactions
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(owner.as_uuid())
    .fetch_optional(pool)
    .await?;

    Ok(transaction)
}

/// Apply a partial update to an owned transaction.
///
/// COALESCE keeps the stored value for every field the patch leaves out.
/// Returns `None` when the id does not exist or belongs to another user.
pub async fn update(
    pool: &DbPool,
    owner: UserId,
    id: Uuid,
    patch: TransactionPatch,
) -> Result<Option<FinancialTransaction>, AppError> {
    let updated = sqlx::query_as::<_, FinancialTransaction>(
        r#"
        UPDATE financial_transactions
        SET valor = COALESCE($3, valor),
            empresa = COALESCE($4, empresa),
            data = COALESCE($5, data),
            tipo = COALESCE($6, tipo),
            updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING id, valor, empresa, data, tipo, user_id, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(owner.as_uuid())
    .bind(patch.valor)
    .bind(patch.empresa)
    .bind(patch.data)
    .bind(patch.tipo)
    .fetch_optional(pool)
    .await?;

    Ok(updated)
}

/// Delete an owned transaction. Returns whether a row was actually removed.
pub async fn delete(pool: &DbPool, owner: UserId, id: Uuid) -> Result<bool, AppError> {
    let deleted = sqlx::query("DELETE FROM financial_transactions WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(owner.as_uuid())
        .execute(pool)
        .await?
        .rows_affected();

    Ok(deleted > 0)
}

/// Row shape produced by the aggregate statistics query.
#[derive(Debug, sqlx::FromRow)]
struct StatsRow {
    total_transactions: i64,
    receitas_count: i64,
    total_receitas: rust_decimal::Decimal,
    despesas_count: i64,
    total_despesas: rust_decimal::Decimal,
}

/// Compute sum and count per category plus the overall count, scoped to the
/// owner and the optional empresa/date filters.
///
/// An empty result set aggregates to zeros, so `saldo` is always a number.
pub async fn stats(
    pool: &DbPool,
    owner: UserId,
    filter: &StatsFilter,
) -> Result<TransactionStats, AppError> {
    let row = sqlx::query_as::<_, StatsRow>(
        r#"
        SELECT COUNT(*) AS total_transactions,
               COUNT(*) FILTER (WHERE tipo = 'Receita') AS receitas_count,
               COALESCE(SUM(valor) FILTER (WHERE tipo = 'Receita'), 0) AS total_receitas,
               COUNT(*) FILTER (WHERE tipo = 'Despesa') AS despesas_count,
               COALESCE(SUM(valor) FILTER (WHERE tipo = 'Despesa'), 0) AS total_despesas
        FROM financial_transactions
        WHERE user_id = $1
          AND ($2::text IS NULL OR empresa ILIKE '%' || $2 || '%')
          AND ($3::timestamptz IS NULL OR data >= $3)
          AND ($4::timestamptz IS NULL OR data <= $4)
        "#,
    )
    .bind(owner.as_uuid())
    .bind(&filter.empresa)
    .bind(filter.start_date)
    .bind(filter.end_date)
    .fetch_one(pool)
    .await?;

    let saldo = row.total_receitas - row.total_despesas;

    Ok(TransactionStats {
        total_transactions: row.total_transactions,
        total_receitas: StatsBucket {
            amount: row.total_receitas,
            count: row.receitas_count,
        },
        total_despesas: StatsBucket {
            amount: row.total_despesas,
            count: row.despesas_count,
        },
        saldo,
    })
}
