//! Date-ordered, id-indexed ledger collections.

mod ledger_traits;
mod ordered_ledger;


pub use ledger_traits::LedgerEntry;
pub use ordered_ledger::{OrderedLedger, TieBreak};
