//! Performance measures over portfolio cash flows.

mod irr_calculator;

#[cfg(test)]
mod irr_calculator_tests;

pub use irr_calculator::irr;
