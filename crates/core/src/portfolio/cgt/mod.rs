//! Capital gains tax - method classification, parcel selection and
//! disposal apportionment.

mod cgt_calculator;
mod cgt_comparators;
mod cgt_model;

#[cfg(test)]
mod cgt_calculator_tests;

pub use cgt_calculator::{CgtCalculator, OpenParcel, ParcelSale};
pub use cgt_comparators::{
    FirstInFirstOut, LastInFirstOut, MaximizeGain, MinimizeGain, ParcelComparator,
    ParcelSelectionMethod,
};
pub use cgt_model::{cgt_method, discounted_cgt, CgtEvent, CgtMethod};
