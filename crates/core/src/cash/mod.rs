//! Cash accounting - transaction model and balance-tracking ledger.

mod cash_ledger;
mod cash_model;


pub use cash_ledger::{CashLedger, EffectiveBalances};
pub use cash_model::{CashTransaction, CashTransactionType};
