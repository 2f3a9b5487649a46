//! Core error types for the taxfolio engine.
//!
//! Every failure in this crate is a local precondition violation surfaced
//! synchronously to the triggering caller; nothing is retried or suppressed
//! internally. The replay engine propagates handler errors unmodified, so a
//! transaction ledger that cannot fully replay is reported as invalid rather
//! than partially applied.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the portfolio engine.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Effective date violation: {0}")]
    EffectiveDate(#[from] EffectiveDateError),

    #[error("Ledger operation failed: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Transaction rejected: {0}")]
    Transaction(#[from] TransactionError),

    #[error("Instrument '{0}' not found")]
    InstrumentNotFound(String),

    #[error("Price unavailable for instrument '{instrument_id}' on {date}")]
    PriceNotFound {
        instrument_id: String,
        date: NaiveDate,
    },

    #[error("Input validation failed: {0}")]
    Validation(String),
}

/// Temporal ordering violations raised by effective-lifetime entities and
/// temporal property stores.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EffectiveDateError {
    /// `start` was called on an entity whose current period is still open.
    #[error("entity already started and still effective")]
    AlreadyStarted,

    /// `end` was called before any period was opened.
    #[error("entity has not been started")]
    NotStarted,

    /// `end` was called on an already-closed period.
    #[error("entity already ended")]
    AlreadyEnded,

    /// The requested end date precedes the open period's start.
    #[error("end date {end} precedes effective start {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },

    /// A property change was requested before the latest record's start.
    /// Values must be set in non-decreasing date order.
    #[error("change date {date} precedes latest record start {latest}")]
    ChangeBeforeLatest { date: NaiveDate, latest: NaiveDate },

    /// A point query fell outside the covered range.
    #[error("no value effective on {date}")]
    OutOfRange { date: NaiveDate },
}

/// Structural failures in date-ordered, id-indexed ledgers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("entry with id {0} already exists")]
    DuplicateId(Uuid),

    #[error("no entry with id {0}")]
    IdNotFound(Uuid),

    #[error("index {index} out of range for ledger of {len} entries")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Precondition failures raised while applying portfolio transactions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    /// The transaction targets a holding that is not effective at the
    /// required date (including never-opened holdings).
    #[error("no shares of '{instrument_id}' owned on {date}")]
    NoSharesOwned {
        instrument_id: String,
        date: NaiveDate,
    },

    /// A disposal or adjustment requested more units than are owned.
    #[error("not enough shares for disposal: requested {requested}, owned {available}")]
    NotEnoughShares { requested: i64, available: i64 },

    /// A handler received a transaction of a kind it does not service.
    #[error("handler for {expected} received a {actual} transaction")]
    WrongKind {
        expected: &'static str,
        actual: &'static str,
    },

    /// No handler is registered for the transaction's kind.
    #[error("no handler registered for transaction kind {0}")]
    UnhandledKind(String),

    /// Malformed transaction arguments (negative resulting balances,
    /// zero-unit adjustments and similar).
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),
}

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(err.to_string())
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
