//! Temporal versioning primitives - effective periods, property stores and
//! entity lifetimes.

mod effective_period;
mod lifetime;
mod property_store;

#[cfg(test)]
mod property_store_tests;

#[cfg(test)]
mod lifetime_tests;

pub use effective_period::EffectivePeriod;
pub use lifetime::{EffectiveLifetime, HasLifetime};
pub use property_store::{TemporalRecord, TemporalStore};
