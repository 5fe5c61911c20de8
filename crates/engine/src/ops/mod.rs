use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};

use crate::{EngineError, ResultEngine};

mod attendance;
mod daily;
mod directory;
mod distribution;
mod ledger;
mod notifications;
mod requests;

pub use attendance::{AttendanceOutcome, EmployeeDashboard, MonthlyAttendanceSummary};
pub use daily::DailyReport;
pub use directory::LocationStats;
pub use distribution::{DistributionOutcome, ReceiptDecision};
pub use ledger::SellerDailySummary;
pub use requests::{BorrowDirection, BorrowLendEntry};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

fn normalize_required(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Map a unique-index violation to an integrity error, anything else to a
/// database error.
fn integrity_guard(err: sea_orm::DbErr, what: &str) -> EngineError {
    match err.sql_err() {
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => {
            EngineError::Integrity(format!("{what} already exists"))
        }
        _ => EngineError::Database(err),
    }
}

/// Allocate the next id of a named sequence, e.g. `manager001` or `EMP001`.
///
/// The increment is a single UPDATE on the counter row, so two transactions
/// allocating from the same sequence serialize on the row instead of both
/// reading the same "last" value.
async fn next_sequence_id<C: ConnectionTrait>(
    db: &C,
    name: &str,
    prefix: &str,
) -> ResultEngine<String> {
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO id_sequences (name, next) VALUES (?, 0) ON CONFLICT (name) DO NOTHING",
        vec![name.into()],
    ))
    .await?;
    db.execute(Statement::from_sql_and_values(
        backend,
        "UPDATE id_sequences SET next = next + 1 WHERE name = ?",
        vec![name.into()],
    ))
    .await?;
    let row = db
        .query_one(Statement::from_sql_and_values(
            backend,
            "SELECT next FROM id_sequences WHERE name = ?",
            vec![name.into()],
        ))
        .await?;
    let next: i64 = row.and_then(|r| r.try_get("", "next").ok()).unwrap_or(1);
    Ok(format!("{prefix}{next:03}"))
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
