use chrono::NaiveDate;
use uuid::Uuid;

/// A dated, uniquely identified record. Cash transactions, portfolio
/// transactions, corporate actions and CGT events all satisfy this contract,
/// letting them share the [`OrderedLedger`](crate::ledger::OrderedLedger)
/// machinery.
pub trait LedgerEntry {
    fn id(&self) -> Uuid;
    fn date(&self) -> NaiveDate;
}
