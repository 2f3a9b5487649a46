use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ledger::LedgerEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CashTransactionType {
    Deposit,
    Withdrawal,
    Fee,
    Interest,
    Transfer,
}

impl CashTransactionType {
    /// Outflow types store a negated magnitude even when supplied positive.
    pub fn is_outflow(&self) -> bool {
        matches!(
            self,
            CashTransactionType::Withdrawal | CashTransactionType::Fee
        )
    }

    pub fn default_description(&self) -> &'static str {
        match self {
            CashTransactionType::Deposit => "Deposit",
            CashTransactionType::Withdrawal => "Withdrawal",
            CashTransactionType::Fee => "Fee",
            CashTransactionType::Interest => "Interest",
            CashTransactionType::Transfer => "Transfer",
        }
    }
}

impl std::fmt::Display for CashTransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.default_description())
    }
}

/// One cash movement. Each entry carries its own post-transaction balance so
/// point-in-time balance queries resolve without summing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashTransaction {
    pub id: Uuid,
    pub date: NaiveDate,
    pub transaction_type: CashTransactionType,
    pub description: String,
    /// Signed amount; outflows are negative.
    pub amount: Decimal,
    /// Account balance after this entry.
    pub balance: Decimal,
}

impl LedgerEntry for CashTransaction {
    fn id(&self) -> Uuid {
        self.id
    }

    fn date(&self) -> NaiveDate {
        self.date
    }
}
