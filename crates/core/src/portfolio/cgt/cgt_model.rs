use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{indexation_cutoff, DISCOUNT_HOLDING_DAYS};
use crate::ledger::LedgerEntry;
use crate::utils::decimal_utils::round_cents;

/// The CGT treatment a consumed parcel attracts at a disposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CgtMethod {
    /// Acquired before the indexation cutoff.
    Indexation,
    /// Held for more than a year; positive gains are halved.
    Discount,
    Other,
}

/// Classifies a parcel by acquisition date and disposal/event date.
pub fn cgt_method(acquisition_date: NaiveDate, event_date: NaiveDate) -> CgtMethod {
    if acquisition_date < indexation_cutoff() {
        CgtMethod::Indexation
    } else if (event_date - acquisition_date).num_days() > DISCOUNT_HOLDING_DAYS {
        CgtMethod::Discount
    } else {
        CgtMethod::Other
    }
}

/// Applies the discount rule: positive gains under the Discount method are
/// halved and rounded to cents; losses and other methods pass through.
pub fn discounted_cgt(capital_gain: Decimal, method: CgtMethod) -> Decimal {
    if method == CgtMethod::Discount && capital_gain > Decimal::ZERO {
        round_cents(capital_gain / dec!(2))
    } else {
        capital_gain
    }
}

/// A realized capital gains event, one per parcel consumed by a disposal or
/// cost-base exhaustion. Collected in a read-only, date-range-queryable
/// ledger for downstream tax-liability reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CgtEvent {
    pub id: Uuid,
    pub date: NaiveDate,
    pub instrument_id: String,
    pub parcel_id: Uuid,
    pub units: i64,
    pub cost_base: Decimal,
    pub amount_received: Decimal,
    pub capital_gain: Decimal,
    pub method: CgtMethod,
    pub discounted_gain: Decimal,
    /// The transaction that triggered this event.
    pub transaction_id: Uuid,
}

impl LedgerEntry for CgtEvent {
    fn id(&self) -> Uuid {
        self.id
    }

    fn date(&self) -> NaiveDate {
        self.date
    }
}
