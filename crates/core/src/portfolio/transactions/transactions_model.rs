use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cash::CashTransactionType;
use crate::ledger::LedgerEntry;
use crate::portfolio::cgt::ParcelSelectionMethod;

/// Tag identifying a transaction's kind, used for handler dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransactionKind {
    Acquisition,
    Disposal,
    IncomeReceived,
    OpeningBalance,
    ReturnOfCapital,
    CostBaseAdjustment,
    UnitCountAdjustment,
    CashTransaction,
}

impl TransactionKind {
    pub fn name(&self) -> &'static str {
        match self {
            TransactionKind::Acquisition => "Acquisition",
            TransactionKind::Disposal => "Disposal",
            TransactionKind::IncomeReceived => "IncomeReceived",
            TransactionKind::OpeningBalance => "OpeningBalance",
            TransactionKind::ReturnOfCapital => "ReturnOfCapital",
            TransactionKind::CostBaseAdjustment => "CostBaseAdjustment",
            TransactionKind::UnitCountAdjustment => "UnitCountAdjustment",
            TransactionKind::CashTransaction => "CashTransaction",
        }
    }

    /// Every kind except a pure cash movement targets an instrument holding.
    pub fn requires_instrument(&self) -> bool {
        !matches!(self, TransactionKind::CashTransaction)
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind-specific payload of a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TransactionDetails {
    #[serde(rename_all = "camelCase")]
    Acquisition {
        units: i64,
        average_price: Decimal,
        transaction_costs: Decimal,
        create_cash_transaction: bool,
    },
    #[serde(rename_all = "camelCase")]
    Disposal {
        units: i64,
        average_price: Decimal,
        transaction_costs: Decimal,
        selection_method: ParcelSelectionMethod,
        create_cash_transaction: bool,
    },
    #[serde(rename_all = "camelCase")]
    IncomeReceived {
        franked_amount: Decimal,
        unfranked_amount: Decimal,
        franking_credits: Decimal,
        interest: Decimal,
        tax_deferred: Decimal,
        record_date: NaiveDate,
        /// The DRP sub-account balance after this distribution, as stated by
        /// the registry; the handler posts the delta.
        drp_cash_balance: Decimal,
        create_cash_transaction: bool,
    },
    /// Carries an externally established position into the portfolio; the
    /// acquisition date may long precede the transaction date.
    #[serde(rename_all = "camelCase")]
    OpeningBalance {
        units: i64,
        cost_base: Decimal,
        acquisition_date: NaiveDate,
    },
    #[serde(rename_all = "camelCase")]
    ReturnOfCapital {
        amount: Decimal,
        record_date: NaiveDate,
        create_cash_transaction: bool,
    },
    /// Reduces the holding's cost base to `percentage` of itself.
    #[serde(rename_all = "camelCase")]
    CostBaseAdjustment { percentage: Decimal },
    /// Rescales unit counts by `new_units / original_units`.
    #[serde(rename_all = "camelCase")]
    UnitCountAdjustment { original_units: i64, new_units: i64 },
    #[serde(rename_all = "camelCase")]
    CashTransaction {
        cash_type: CashTransactionType,
        amount: Decimal,
        description: Option<String>,
    },
}

impl TransactionDetails {
    pub fn kind(&self) -> TransactionKind {
        match self {
            TransactionDetails::Acquisition { .. } => TransactionKind::Acquisition,
            TransactionDetails::Disposal { .. } => TransactionKind::Disposal,
            TransactionDetails::IncomeReceived { .. } => TransactionKind::IncomeReceived,
            TransactionDetails::OpeningBalance { .. } => TransactionKind::OpeningBalance,
            TransactionDetails::ReturnOfCapital { .. } => TransactionKind::ReturnOfCapital,
            TransactionDetails::CostBaseAdjustment { .. } => TransactionKind::CostBaseAdjustment,
            TransactionDetails::UnitCountAdjustment { .. } => {
                TransactionKind::UnitCountAdjustment
            }
            TransactionDetails::CashTransaction { .. } => TransactionKind::CashTransaction,
        }
    }
}

/// One entry of the durable transaction ledger - the only source of truth
/// this core holds. Holdings, cash and CGT events are derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub date: NaiveDate,
    pub instrument_id: Option<String>,
    pub details: TransactionDetails,
}

impl Transaction {
    pub fn new(
        date: NaiveDate,
        instrument_id: Option<String>,
        details: TransactionDetails,
    ) -> Self {
        Transaction {
            id: Uuid::new_v4(),
            date,
            instrument_id,
            details,
        }
    }

    pub fn kind(&self) -> TransactionKind {
        self.details.kind()
    }
}

impl LedgerEntry for Transaction {
    fn id(&self) -> Uuid {
        self.id
    }

    fn date(&self) -> NaiveDate {
        self.date
    }
}
