//! Financial transaction data models and API request/response types.
//!
//! This module defines:
//! - `FinancialTransaction`: Database entity representing a transaction
//! - Request types for create, update, listing, and statistics, with the
//!   validation rules that turn them into normalized values
//! - Response types including pagination and aggregate statistics
//!
//! Monetary amounts are `rust_decimal::Decimal` end to end (JSON number ->
//! `NUMERIC(15,3)` -> JSON number) so values like `123.456` round-trip
//! without floating-point drift.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, FieldError};

/// Maximum accepted length for the `empresa` field.
const MAX_EMPRESA_LENGTH: usize = 255;

/// Maximum number of decimal digits for `valor`.
const MAX_VALOR_SCALE: u32 = 3;

/// First page when the query does not say otherwise.
const DEFAULT_PAGE: i64 = 1;

/// Page size when the query does not say otherwise.
const DEFAULT_LIMIT: i64 = 10;

/// Upper bound on the page size.
const MAX_LIMIT: i64 = 100;

/// Transaction category.
///
/// Stored in Postgres as the `transaction_type` enum; the database and the
/// API use the same two spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::Type)]
#[sqlx(type_name = "transaction_type")]
pub enum TransactionType {
    /// Expense
    Despesa,
    /// Income
    Receita,
}

impl TransactionType {
    /// Parse the exact category spelling; anything else is rejected.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Despesa" => Some(Self::Despesa),
            "Receita" => Some(Self::Receita),
            _ => None,
        }
    }
}

/// Represents a financial transaction record from the database.
///
/// # Database Table
///
/// Maps to the `financial_transactions` table. Every transaction belongs to
/// exactly one user (`user_id`); all reads and writes are scoped to that
/// owner.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FinancialTransaction {
    /// Unique identifier for this transaction
    pub id: Uuid,

    /// Monetary amount, always positive, at most 3 decimal digits
    pub valor: Decimal,

    /// Company or counterparty name, 1-255 characters
    pub empresa: String,

    /// When the transaction took place
    pub data: DateTime<Utc>,

    /// Category: expense or income
    pub tipo: TransactionType,

    /// Owning user
    pub user_id: Uuid,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last modified
    pub updated_at: DateTime<Utc>,
}

/// Request to create a financial transaction.
///
/// # JSON Example
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
/// `data` and `tipo` arrive as plain strings so that a malformed value is
/// reported as a field violation alongside the others instead of failing
/// the whole deserialization.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub valor: Decimal,
    pub empresa: String,
    pub data: String,
    pub tipo: String,
}

/// A [`CreateTransactionRequest`] that passed validation.
#[derive(Debug)]
pub struct NewTransaction {
    pub valor: Decimal,
    pub empresa: String,
    pub data: DateTime<Utc>,
    pub tipo: TransactionType,
}

impl CreateTransactionRequest {
    /// Check every field and produce either a normalized value or the full
    /// list of violations.
    ///
    /// # Rules
    ///
    /// - `valor` strictly positive, at most 3 decimal digits
    /// - `empresa` 1-255 characters
    /// - `data` a valid ISO-8601 / RFC 3339 datetime
    /// - `tipo` exactly `"Despesa"` or `"Receita"`
    pub fn validate(self) -> Result<NewTransaction, AppError> {
        let mut errors = Vec::new();

        validate_valor(&self.valor, &mut errors);
        validate_empresa(&self.empresa, &mut errors);
        let data = parse_datetime(&self.data, "data", &mut errors);
        let tipo = parse_tipo(&self.tipo, &mut errors);

        match (data, tipo) {
            (Some(data), Some(tipo)) if errors.is_empty() => Ok(NewTransaction {
                valor: self.valor,
                empresa: self.empresa,
                data,
                tipo,
            }),
            _ => Err(AppError::Validation(errors)),
        }
    }
}

/// Request to partially update a financial transaction.
///
/// Every field is optional; absent fields are left untouched. Present
/// fields follow the same rules as creation.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTransactionRequest {
    #[serde(default, with = "rust_decimal::serde::arbitrary_precision_option")]
    pub valor: Option<Decimal>,
    pub empresa: Option<String>,
    pub data: Option<String>,
    pub tipo: Option<String>,
}

/// Validated partial update. `None` fields keep their stored value.
#[derive(Debug, Default)]
pub struct TransactionPatch {
    pub valor: Option<Decimal>,
    pub empresa: Option<String>,
    pub data: Option<DateTime<Utc>>,
    pub tipo: Option<TransactionType>,
}

impl UpdateTransactionRequest {
    pub fn validate(self) -> Result<TransactionPatch, AppError> {
        let mut errors = Vec::new();

        if let Some(valor) = &self.valor {
            validate_valor(valor, &mut errors);
        }
        if let Some(empresa) = &self.empresa {
            validate_empresa(empresa, &mut errors);
        }
        let data = self
            .data
            .as_deref()
            .and_then(|value| parse_datetime(value, "data", &mut errors));
        let tipo = self
            .tipo
            .as_deref()
            .and_then(|value| parse_tipo(value, &mut errors));

        if errors.is_empty() {
            Ok(TransactionPatch {
                valor: self.valor,
                empresa: self.empresa,
                data,
                tipo,
            })
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

/// Query parameters accepted by `GET /financial-transactions`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTransactionsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub tipo: Option<String>,
    pub empresa: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Validated, normalized listing filter.
///
/// All filters are conjunctive: exact match on `tipo`, case-insensitive
/// substring match on `empresa`, inclusive range on the transaction date.
#[derive(Debug, Clone)]
pub struct TransactionFilter {
    pub page: i64,
    pub limit: i64,
    pub tipo: Option<TransactionType>,
    pub empresa: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl TransactionFilter {
    /// Number of rows skipped before the requested page.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    /// Total number of pages for `total` matching rows.
    pub fn total_pages(&self, total: i64) -> i64 {
        (total + self.limit - 1) / self.limit
    }
}

impl ListTransactionsQuery {
    /// # Rules
    ///
    /// - `page` >= 1, defaults to 1
    /// - `limit` between 1 and 100, defaults to 10
    /// - optional `tipo`, `startDate`, `endDate` follow the creation rules
    pub fn validate(self) -> Result<TransactionFilter, AppError> {
        let mut errors = Vec::new();

        let page = self.page.unwrap_or(DEFAULT_PAGE);
        if page < 1 {
            errors.push(FieldError::new("page", "Page must be at least 1"));
        }

        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        if !(1..=MAX_LIMIT).contains(&limit) {
            errors.push(FieldError::new("limit", "Limit must be between 1 and 100"));
        }

        let tipo = self
            .tipo
            .as_deref()
            .and_then(|value| parse_tipo(value, &mut errors));
        let start_date = self
            .start_date
            .as_deref()
            .and_then(|value| parse_datetime(value, "startDate", &mut errors));
        let end_date = self
            .end_date
            .as_deref()
            .and_then(|value| parse_datetime(value, "endDate", &mut errors));

        if errors.is_empty() {
            Ok(TransactionFilter {
                page,
                limit,
                tipo,
                empresa: self.empresa,
                start_date,
                end_date,
            })
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

/// Query parameters accepted by `GET /financial-transactions/stats`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    pub empresa: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Validated statistics filter.
#[derive(Debug, Clone)]
pub struct StatsFilter {
    pub empresa: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl StatsQuery {
    pub fn validate(self) -> Result<StatsFilter, AppError> {
        let mut errors = Vec::new();

        let start_date = self
            .start_date
            .as_deref()
            .and_then(|value| parse_datetime(value, "startDate", &mut errors));
        let end_date = self
            .end_date
            .as_deref()
            .and_then(|value| parse_datetime(value, "endDate", &mut errors));

        if errors.is_empty() {
            Ok(StatsFilter {
                empresa: self.empresa,
                start_date,
                end_date,
            })
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

fn validate_valor(valor: &Decimal, errors: &mut Vec<FieldError>) {
    if *valor <= Decimal::ZERO {
        errors.push(FieldError::new("valor", "Valor must be positive"));
    } else if valor.normalize().scale() > MAX_VALOR_SCALE {
        errors.push(FieldError::new(
            "valor",
            "Valor can have at most 3 decimal places",
        ));
    }
}

fn validate_empresa(empresa: &str, errors: &mut Vec<FieldError>) {
    if empresa.is_empty() {
        errors.push(FieldError::new("empresa", "Empresa is required"));
    } else if empresa.chars().count() > MAX_EMPRESA_LENGTH {
        errors.push(FieldError::new(
            "empresa",
            "Empresa must be at most 255 characters",
        ));
    }
}

fn parse_datetime(
    value: &str,
    field: &'static str,
    errors: &mut Vec<FieldError>,
) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(value) {
        Ok(parsed) => Some(parsed.with_timezone(&Utc)),
        Err(_) => {
            errors.push(FieldError::new(
                field,
                "Must be a valid ISO-8601 datetime",
            ));
            None
        }
    }
}

fn parse_tipo(value: &str, errors: &mut Vec<FieldError>) -> Option<TransactionType> {
    match TransactionType::parse(value) {
        Some(tipo) => Some(tipo),
        None => {
            errors.push(FieldError::new(
                "tipo",
                r#"Tipo must be either "Despesa" or "Receita""#,
            ));
            None
        }
    }
}

/// Response returned for single-transaction operations.
///
/// The owning user id stays internal; `valor` serializes as a plain JSON
/// number with its exact decimal digits.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub id: Uuid,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub valor: Decimal,
    pub empresa: String,
    pub data: DateTime<Utc>,
    pub tipo: TransactionType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FinancialTransaction> for TransactionResponse {
    fn from(transaction: FinancialTransaction) -> Self {
        Self {
            id: transaction.id,
            valor: transaction.valor,
            empresa: transaction.empresa,
            data: transaction.data,
            tipo: transaction.tipo,
            created_at: transaction.created_at,
            updated_at: transaction.updated_at,
        }
    }
}

/// Pagination block returned alongside transaction listings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

/// Response for `GET /financial-transactions`.
#[derive(Debug, Serialize)]
pub struct TransactionListResponse {
    pub transactions: Vec<TransactionResponse>,
    pub pagination: Pagination,
}

/// Aggregate sum and count for one transaction category.
#[derive(Debug, Serialize)]
pub struct StatsBucket {
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal,
    pub count: i64,
}

/// Aggregate statistics over a filtered set of transactions.
///
/// `saldo` is income minus expenses; an empty set yields zeros, never nulls.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionStats {
    pub total_transactions: i64,
    pub total_receitas: StatsBucket,
    pub total_despesas: StatsBucket,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub saldo: Decimal,
}

/// Response for `GET /financial-transactions/stats`.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub stats: TransactionStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decimal(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn create_request(valor: &str, empresa: &str, data: &str, tipo: &str) -> CreateTransactionRequest {
        CreateTransactionRequest {
            valor: decimal(valor),
            empresa: empresa.to_string(),
            data: data.to_string(),
            tipo: tipo.to_string(),
        }
    }

    #[test]
    fn valid_creation_passes() {
        let request = create_request("123.456", "Acme Ltda", "2025-06-01T12:00:00Z", "Receita");
        let transaction = request.validate().unwrap();

        assert_eq!(transaction.valor, decimal("123.456"));
        assert_eq!(transaction.tipo, TransactionType::Receita);
        assert_eq!(transaction.data.to_rfc3339(), "2025-06-01T12:00:00+00:00");
    }

    #[test]
    fn negative_valor_is_rejected() {
        let request = create_request("-5", "X", "2025-06-01T12:00:00Z", "Receita");
        let AppError::Validation(details) = request.validate().unwrap_err() else {
            panic!("expected a validation error");
        };
        assert_eq!(details[0].field, "valor");
    }

    #[test]
    fn zero_valor_is_rejected() {
        let request = create_request("0", "X", "2025-06-01T12:00:00Z", "Despesa");
        assert!(request.validate().is_err());
    }

    #[test]
    fn more_than_three_decimal_places_is_rejected() {
        let request = create_request("1.2345", "X", "2025-06-01T12:00:00Z", "Despesa");
        assert!(request.validate().is_err());
    }

    #[test]
    fn trailing_zeros_beyond_three_places_are_fine() {
        // 1.2500 normalizes to 1.25
        let request = create_request("1.2500", "X", "2025-06-01T12:00:00Z", "Despesa");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn empresa_bounds_are_enforced() {
        let request = create_request("1", "", "2025-06-01T12:00:00Z", "Despesa");
        assert!(request.validate().is_err());

        let long = "x".repeat(256);
        let request = create_request("1", &long, "2025-06-01T12:00:00Z", "Despesa");
        assert!(request.validate().is_err());

        let exactly_255 = "x".repeat(255);
        let request = create_request("1", &exactly_255, "2025-06-01T12:00:00Z", "Despesa");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn tipo_must_match_exactly() {
        for tipo in ["despesa", "RECEITA", "Renda", ""] {
            let request = create_request("1", "X", "2025-06-01T12:00:00Z", tipo);
            assert!(request.validate().is_err(), "{tipo:?} should be rejected");
        }
    }

    #[test]
    fn malformed_data_is_a_field_violation() {
        let request = create_request("1", "X", "yesterday", "Despesa");
        let AppError::Validation(details) = request.validate().unwrap_err() else {
            panic!("expected a validation error");
        };
        assert_eq!(details[0].field, "data");
    }

    #[test]
    fn all_violations_are_aggregated() {
        let request = create_request("-1", "", "nope", "Renda");
        let AppError::Validation(details) = request.validate().unwrap_err() else {
            panic!("expected a validation error");
        };
        let fields: Vec<_> = details.iter().map(|d| d.field).collect();
        assert_eq!(fields, vec!["valor", "empresa", "data", "tipo"]);
    }

    #[test]
    fn valor_round_trips_exactly_through_json() {
        let body = r#"{"valor":123.456,"empresa":"X","data":"2025-06-01T12:00:00Z","tipo":"Receita"}"#;
        let request: CreateTransactionRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.valor, decimal("123.456"));

        let response = TransactionResponse {
            id: Uuid::nil(),
            valor: request.valor,
            empresa: "X".to_string(),
            data: Utc::now(),
            tipo: TransactionType::Receita,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let serialized = serde_json::to_string(&response).unwrap();
        assert!(serialized.contains(r#""valor":123.456"#), "{serialized}");
    }

    #[test]
    fn empty_update_is_a_valid_noop_patch() {
        let patch = UpdateTransactionRequest::default().validate().unwrap();
        assert!(patch.valor.is_none());
        assert!(patch.empresa.is_none());
        assert!(patch.data.is_none());
        assert!(patch.tipo.is_none());
    }

    #[test]
    fn update_rules_apply_only_to_present_fields() {
        let request = UpdateTransactionRequest {
            valor: Some(decimal("-1")),
            ..Default::default()
        };
        let AppError::Validation(details) = request.validate().unwrap_err() else {
            panic!("expected a validation error");
        };
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].field, "valor");
    }

    #[test]
    fn list_query_defaults() {
        let filter = ListTransactionsQuery::default().validate().unwrap();
        assert_eq!(filter.page, 1);
        assert_eq!(filter.limit, 10);
        assert!(filter.tipo.is_none());
    }

    #[test]
    fn list_query_bounds() {
        for (page, limit) in [(Some(0), None), (None, Some(0)), (None, Some(101))] {
            let query = ListTransactionsQuery {
                page,
                limit,
                ..Default::default()
            };
            assert!(query.validate().is_err(), "page={page:?} limit={limit:?}");
        }
    }

    #[test]
    fn list_query_parses_filters() {
        let query = ListTransactionsQuery {
            tipo: Some("Despesa".to_string()),
            empresa: Some("acme".to_string()),
            start_date: Some("2025-01-01T00:00:00Z".to_string()),
            end_date: Some("2025-12-31T23:59:59Z".to_string()),
            ..Default::default()
        };
        let filter = query.validate().unwrap();

        assert_eq!(filter.tipo, Some(TransactionType::Despesa));
        assert_eq!(filter.empresa.as_deref(), Some("acme"));
        assert!(filter.start_date.unwrap() < filter.end_date.unwrap());
    }

    #[test]
    fn pagination_math() {
        let filter = ListTransactionsQuery {
            page: Some(3),
            limit: Some(10),
            ..Default::default()
        }
        .validate()
        .unwrap();

        assert_eq!(filter.offset(), 20);
        assert_eq!(filter.total_pages(0), 0);
        assert_eq!(filter.total_pages(1), 1);
        assert_eq!(filter.total_pages(10), 1);
        assert_eq!(filter.total_pages(11), 2);
        assert_eq!(filter.total_pages(95), 10);
    }

    #[test]
    fn stats_query_rejects_bad_dates() {
        let query = StatsQuery {
            start_date: Some("not-a-date".to_string()),
            ..Default::default()
        };
        assert!(query.validate().is_err());
    }
}
