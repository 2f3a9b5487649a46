//! Parcels - discrete lots of acquired units tracked for cost-base and tax
//! purposes.

mod parcel_model;


pub use parcel_model::{Parcel, ParcelAuditRecord, ParcelProperties};
