use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::errors::{Result, TransactionError};
use crate::portfolio::cgt::{cgt_method, discounted_cgt, CgtMethod, ParcelComparator};
use crate::portfolio::parcel::{Parcel, ParcelProperties};
use crate::utils::decimal_utils::round_cents;

/// Snapshot of an open parcel as the calculator sees it at the disposal
/// date.
#[derive(Debug, Clone, Copy)]
pub struct OpenParcel {
    pub id: Uuid,
    pub acquisition_date: NaiveDate,
    pub properties: ParcelProperties,
}

impl OpenParcel {
    pub fn from_parcel(parcel: &Parcel, date: NaiveDate) -> Result<Self> {
        Ok(OpenParcel {
            id: parcel.id(),
            acquisition_date: parcel.acquisition_date(),
            properties: *parcel.properties_at(date)?,
        })
    }
}

/// The outcome for one parcel consumed by a disposal.
#[derive(Debug, Clone, PartialEq)]
pub struct ParcelSale {
    pub parcel_id: Uuid,
    pub acquisition_date: NaiveDate,
    pub units_consumed: i64,
    /// This parcel's share of the sale proceeds.
    pub apportioned_amount: Decimal,
    /// This parcel's share of its own cost base.
    pub apportioned_cost_base: Decimal,
    pub capital_gain: Decimal,
    pub method: CgtMethod,
    pub discounted_gain: Decimal,
    /// Whether the disposal consumes the parcel entirely.
    pub closes_parcel: bool,
}

/// Selects and consumes parcels for a disposal, apportioning proceeds and
/// cost bases and classifying each consumed parcel's gain.
pub struct CgtCalculator;

impl CgtCalculator {
    /// Orders `open_parcels` by `comparator` and greedily consumes up to
    /// `units_sold`.
    ///
    /// Each parcel's share of the proceeds is `units consumed / units sold`
    /// of the original amount, rounded to cents; the running remainder is
    /// reduced by subtraction rather than recomputed, and the final parcel
    /// receives the remainder exactly, so the shares always re-sum to
    /// `amount_received`. The split is therefore dependent on the comparator
    /// order, which downstream figures are pinned to.
    pub fn calculate(
        open_parcels: &[OpenParcel],
        disposal_date: NaiveDate,
        units_sold: i64,
        amount_received: Decimal,
        comparator: &dyn ParcelComparator,
    ) -> Result<Vec<ParcelSale>> {
        if units_sold <= 0 {
            return Err(TransactionError::InvalidTransaction(format!(
                "disposal must consume positive units, got {units_sold}"
            ))
            .into());
        }

        let mut candidates: Vec<OpenParcel> = open_parcels
            .iter()
            .filter(|p| p.properties.units > 0)
            .copied()
            .collect();
        candidates.sort_by(|a, b| comparator.compare(a, b, disposal_date));

        let available: i64 = candidates.iter().map(|p| p.properties.units).sum();
        if available < units_sold {
            return Err(TransactionError::NotEnoughShares {
                requested: units_sold,
                available,
            }
            .into());
        }

        let mut sales = Vec::new();
        let mut remaining_units = units_sold;
        let mut remaining_amount = amount_received;

        for parcel in &candidates {
            if remaining_units == 0 {
                break;
            }
            let held = parcel.properties.units;
            let consumed = held.min(remaining_units);

            let apportioned_amount = if consumed == remaining_units {
                remaining_amount
            } else {
                round_cents(
                    amount_received * Decimal::from(consumed) / Decimal::from(units_sold),
                )
            };
            remaining_amount -= apportioned_amount;
            remaining_units -= consumed;

            let closes_parcel = consumed == held;
            let apportioned_cost_base = if closes_parcel {
                parcel.properties.cost_base
            } else {
                round_cents(
                    parcel.properties.cost_base * Decimal::from(consumed) / Decimal::from(held),
                )
            };

            let capital_gain = apportioned_amount - apportioned_cost_base;
            let method = cgt_method(parcel.acquisition_date, disposal_date);
            sales.push(ParcelSale {
                parcel_id: parcel.id,
                acquisition_date: parcel.acquisition_date,
                units_consumed: consumed,
                apportioned_amount,
                apportioned_cost_base,
                capital_gain,
                method,
                discounted_gain: discounted_cgt(capital_gain, method),
                closes_parcel,
            });
        }

        Ok(sales)
    }
}
