//! # Persistence Gateway
//!
//! Runs one parameterized statement against the pool or an open transaction.
//!
//! ## Statement Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  execute(&pool, "SELECT ... WHERE user_id = ?", &[SqlParam::Int(7)])   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  arguments() ← every value bound positionally, never interpolated      │
//! │       │                                                                 │
//! │       ├── SELECT / WITH / PRAGMA / VALUES / ... RETURNING              │
//! │       │         └──► Outcome::Rows(Vec<Row>)   (column → JSON value)   │
//! │       │                                                                 │
//! │       └── INSERT / UPDATE / DELETE / DDL                               │
//! │                 └──► Outcome::Ack { rows_affected }                    │
//! │                                                                         │
//! │  Any sqlx failure ──► Err(DbError), logged, never a panic              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Executors
//! Every function takes anything implementing `sqlx::Executor` for SQLite:
//! - `&SqlitePool`: each write commits on its own
//! - `&mut *tx`: the statement joins the open transaction
//!
//! An empty result set is `Ok(Outcome::Rows(vec![]))`, never an error.

use chrono::NaiveDate;
use serde_json::{Map, Value};
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Arguments, Column, Executor, FromRow, Row as _, Sqlite, TypeInfo, ValueRef};
use tracing::{debug, error};

use crate::error::{DbError, DbResult};

/// One result row: column name → value, in the order the store returned them.
pub type Row = Map<String, Value>;

// =============================================================================
// Parameters
// =============================================================================

/// A positional statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Null,
    Int(i64),
    Real(f64),
    Text(String),
    /// Bound as ISO `YYYY-MM-DD` text, so dates compare lexically.
    Date(NaiveDate),
}

impl From<i64> for SqlParam {
    fn from(value: i64) -> Self {
        SqlParam::Int(value)
    }
}

impl From<f64> for SqlParam {
    fn from(value: f64) -> Self {
        SqlParam::Real(value)
    }
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        SqlParam::Text(value.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        SqlParam::Text(value)
    }
}

impl From<NaiveDate> for SqlParam {
    fn from(value: NaiveDate) -> Self {
        SqlParam::Date(value)
    }
}

impl<T: Into<SqlParam>> From<Option<T>> for SqlParam {
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlParam::Null, Into::into)
    }
}

// =============================================================================
// Outcome
// =============================================================================

/// What a statement produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Rows from a row-producing statement (possibly none).
    Rows(Vec<Row>),
    /// Acknowledgement of a mutation.
    Ack { rows_affected: u64 },
}

impl Outcome {
    /// Rows of the outcome; an `Ack` has none.
    pub fn into_rows(self) -> Vec<Row> {
        match self {
            Outcome::Rows(rows) => rows,
            Outcome::Ack { .. } => Vec::new(),
        }
    }

    /// Rows affected by a mutation, or rows returned by a query.
    pub fn rows_affected(&self) -> u64 {
        match self {
            Outcome::Rows(rows) => rows.len() as u64,
            Outcome::Ack { rows_affected } => *rows_affected,
        }
    }
}

// =============================================================================
// Execution
// =============================================================================

/// True for statements whose results should be fetched as rows.
pub fn returns_rows(statement: &str) -> bool {
    let head = statement
        .trim_start()
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_ascii_uppercase();

    matches!(head.as_str(), "SELECT" | "WITH" | "PRAGMA" | "VALUES")
        || statement
            .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .any(|word| word.eq_ignore_ascii_case("RETURNING"))
}

/// Binds `params` in order.
fn arguments<'q>(params: &[SqlParam]) -> DbResult<SqliteArguments<'q>> {
    let mut args = SqliteArguments::default();

    for param in params {
        let bound = match param {
            SqlParam::Null => args.add(Option::<i64>::None),
            SqlParam::Int(value) => args.add(*value),
            SqlParam::Real(value) => args.add(*value),
            SqlParam::Text(value) => args.add(value.clone()),
            SqlParam::Date(value) => args.add(*value),
        };
        bound.map_err(|e| DbError::QueryFailed(format!("cannot bind parameter: {}", e)))?;
    }

    Ok(args)
}

/// Executes one statement with positional parameters.
///
/// ## Example
/// ```rust,ignore
/// let outcome = execute(
///     db.pool(),
///     "SELECT product_id, product_name FROM products WHERE user_id = ?",
///     &[SqlParam::Int(7)],
/// )
/// .await?;
/// ```
pub async fn execute<'c, E>(executor: E, statement: &str, params: &[SqlParam]) -> DbResult<Outcome>
where
    E: Executor<'c, Database = Sqlite>,
{
    debug!(statement = %statement.trim(), params = params.len(), "Executing statement");

    let query = sqlx::query_with(statement, arguments(params)?);

    let outcome = if returns_rows(statement) {
        query
            .fetch_all(executor)
            .await
            .map_err(|e| log_failure(statement, e))?
            .iter()
            .map(decode_row)
            .collect::<DbResult<Vec<_>>>()
            .map(Outcome::Rows)?
    } else {
        let result = query
            .execute(executor)
            .await
            .map_err(|e| log_failure(statement, e))?;
        Outcome::Ack {
            rows_affected: result.rows_affected(),
        }
    };

    Ok(outcome)
}

/// Fetches every row as `T`.
pub async fn fetch_all_as<'c, E, T>(
    executor: E,
    statement: &str,
    params: &[SqlParam],
) -> DbResult<Vec<T>>
where
    E: Executor<'c, Database = Sqlite>,
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    sqlx::query_as_with::<_, T, _>(statement, arguments(params)?)
        .fetch_all(executor)
        .await
        .map_err(|e| log_failure(statement, e))
}

/// Fetches at most one row as `T`.
pub async fn fetch_optional_as<'c, E, T>(
    executor: E,
    statement: &str,
    params: &[SqlParam],
) -> DbResult<Option<T>>
where
    E: Executor<'c, Database = Sqlite>,
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    sqlx::query_as_with::<_, T, _>(statement, arguments(params)?)
        .fetch_optional(executor)
        .await
        .map_err(|e| log_failure(statement, e))
}

/// Fetches the first column of exactly one row.
pub async fn fetch_scalar<'c, E, T>(
    executor: E,
    statement: &str,
    params: &[SqlParam],
) -> DbResult<T>
where
    E: Executor<'c, Database = Sqlite>,
    (T,): for<'r> FromRow<'r, SqliteRow>,
    T: Send + Unpin,
{
    sqlx::query_scalar_with::<_, T, _>(statement, arguments(params)?)
        .fetch_one(executor)
        .await
        .map_err(|e| log_failure(statement, e))
}

/// Fetches the first column of at most one row.
pub async fn fetch_optional_scalar<'c, E, T>(
    executor: E,
    statement: &str,
    params: &[SqlParam],
) -> DbResult<Option<T>>
where
    E: Executor<'c, Database = Sqlite>,
    (T,): for<'r> FromRow<'r, SqliteRow>,
    T: Send + Unpin,
{
    sqlx::query_scalar_with::<_, T, _>(statement, arguments(params)?)
        .fetch_optional(executor)
        .await
        .map_err(|e| log_failure(statement, e))
}

// =============================================================================
// Helpers
// =============================================================================

fn log_failure(statement: &str, err: sqlx::Error) -> DbError {
    let err = DbError::from(err);
    error!(statement = %statement.trim(), error = %err, "Statement failed");
    err
}

/// Converts a row using the storage class of each value.
fn decode_row(row: &SqliteRow) -> DbResult<Row> {
    let mut out = Map::with_capacity(row.columns().len());

    for column in row.columns() {
        let index = column.ordinal();
        let raw = row.try_get_raw(index)?;

        let value = if raw.is_null() {
            Value::Null
        } else {
            let storage = raw.type_info().name().to_string();
            match storage.as_str() {
                "INTEGER" => Value::from(row.try_get_unchecked::<i64, _>(index)?),
                "REAL" => Value::from(row.try_get_unchecked::<f64, _>(index)?),
                "BLOB" => Value::from(row.try_get_unchecked::<Vec<u8>, _>(index)?),
                _ => Value::from(row.try_get_unchecked::<String, _>(index)?),
            }
        };

        out.insert(column.name().to_string(), value);
    }

    Ok(out)
}

// =============================================================================
// Unit Tests
// =============================================================================
