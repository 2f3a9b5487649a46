use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::portfolio::cgt::cgt_calculator::OpenParcel;
use crate::portfolio::cgt::{cgt_method, CgtMethod};

/// A total order over the open parcels of a holding at a disposal date,
/// deciding which parcels a disposal consumes first.
pub trait ParcelComparator {
    fn compare(&self, a: &OpenParcel, b: &OpenParcel, disposal_date: NaiveDate) -> Ordering;
}

/// Ascending acquisition date.
pub struct FirstInFirstOut;

impl ParcelComparator for FirstInFirstOut {
    fn compare(&self, a: &OpenParcel, b: &OpenParcel, _disposal_date: NaiveDate) -> Ordering {
        a.acquisition_date.cmp(&b.acquisition_date)
    }
}

/// Descending acquisition date.
pub struct LastInFirstOut;

impl ParcelComparator for LastInFirstOut {
    fn compare(&self, a: &OpenParcel, b: &OpenParcel, _disposal_date: NaiveDate) -> Ordering {
        b.acquisition_date.cmp(&a.acquisition_date)
    }
}

fn discount_eligible(parcel: &OpenParcel, disposal_date: NaiveDate) -> bool {
    cgt_method(parcel.acquisition_date, disposal_date) == CgtMethod::Discount
}

/// Discount-eligible parcels first, then cheapest unit cost base, ties by
/// acquisition date ascending.
pub struct MaximizeGain;

impl ParcelComparator for MaximizeGain {
    fn compare(&self, a: &OpenParcel, b: &OpenParcel, disposal_date: NaiveDate) -> Ordering {
        let (ea, eb) = (
            discount_eligible(a, disposal_date),
            discount_eligible(b, disposal_date),
        );
        eb.cmp(&ea)
            .then(a.properties.unit_cost_base().cmp(&b.properties.unit_cost_base()))
            .then(a.acquisition_date.cmp(&b.acquisition_date))
    }
}

/// Ineligible parcels first, then dearest unit cost base, ties by
/// acquisition date ascending.
pub struct MinimizeGain;

impl ParcelComparator for MinimizeGain {
    fn compare(&self, a: &OpenParcel, b: &OpenParcel, disposal_date: NaiveDate) -> Ordering {
        let (ea, eb) = (
            discount_eligible(a, disposal_date),
            discount_eligible(b, disposal_date),
        );
        ea.cmp(&eb)
            .then(b.properties.unit_cost_base().cmp(&a.properties.unit_cost_base()))
            .then(a.acquisition_date.cmp(&b.acquisition_date))
    }
}

/// Serializable selection of a built-in comparator, carried by disposal
/// transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParcelSelectionMethod {
    #[default]
    FirstInFirstOut,
    LastInFirstOut,
    MaximizeGain,
    MinimizeGain,
}

impl ParcelSelectionMethod {
    pub fn comparator(&self) -> &'static dyn ParcelComparator {
        match self {
            ParcelSelectionMethod::FirstInFirstOut => &FirstInFirstOut,
            ParcelSelectionMethod::LastInFirstOut => &LastInFirstOut,
            ParcelSelectionMethod::MaximizeGain => &MaximizeGain,
            ParcelSelectionMethod::MinimizeGain => &MinimizeGain,
        }
    }
}
