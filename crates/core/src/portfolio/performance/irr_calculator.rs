use std::collections::BTreeMap;

use chrono::NaiveDate;
use num_traits::ToPrimitive;
use rust_decimal::Decimal;

const INITIAL_GUESS: f64 = 0.10;
const CONVERGENCE_THRESHOLD: f64 = 1e-6;
const MAX_ITERATIONS: u32 = 100;
const DAYS_PER_YEAR: f64 = 365.0;

/// Annualized internal rate of return between two valuation anchors with an
/// irregular map of external cash flows (contributions positive,
/// withdrawals negative) in between.
///
/// Periods are Actual/365 year-fractions from `start_date`. The rate is
/// root-found with Newton-Raphson on the NPV function and its analytic
/// derivative, seeded at 10% and converging at a 1e-6 absolute step within
/// 100 iterations. Any non-finite intermediate yields 0.
pub fn irr(
    start_date: NaiveDate,
    start_value: Decimal,
    end_date: NaiveDate,
    end_value: Decimal,
    cash_flows: &BTreeMap<NaiveDate, Decimal>,
) -> f64 {
    let year_fraction =
        |date: NaiveDate| (date - start_date).num_days() as f64 / DAYS_PER_YEAR;

    let mut values = Vec::with_capacity(cash_flows.len() + 2);
    let mut periods = Vec::with_capacity(cash_flows.len() + 2);

    values.push(start_value.to_f64().unwrap_or(0.0));
    periods.push(0.0);
    for (&date, &amount) in cash_flows {
        values.push(amount.to_f64().unwrap_or(0.0));
        periods.push(year_fraction(date));
    }
    // The closing value is what the invested flows grew into.
    values.push(-end_value.to_f64().unwrap_or(0.0));
    periods.push(year_fraction(end_date));

    let mut rate = INITIAL_GUESS;
    for _ in 0..MAX_ITERATIONS {
        let mut npv = 0.0;
        let mut derivative = 0.0;
        let base = 1.0 + rate;
        for (&value, &t) in values.iter().zip(&periods) {
            let discount = base.powf(-t);
            npv += value * discount;
            derivative -= t * value * base.powf(-t - 1.0);
        }

        let step = npv / derivative;
        if !step.is_finite() {
            return 0.0;
        }
        rate -= step;
        if !rate.is_finite() {
            return 0.0;
        }
        if step.abs() < CONVERGENCE_THRESHOLD {
            break;
        }
    }
    rate
}
