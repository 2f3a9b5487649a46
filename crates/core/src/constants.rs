use chrono::NaiveDate;

/// Assets acquired before this date fall under the indexation method.
pub const INDEXATION_CUTOFF: (i32, u32, u32) = (1999, 9, 21);

/// Minimum holding period (exclusive, in days) for the CGT discount.
pub const DISCOUNT_HOLDING_DAYS: i64 = 365;

/// Decimal places carried by monetary amounts.
pub const CENTS_DECIMAL_PLACES: u32 = 2;

/// Acquisitions before this date qualify for indexation rather than the
/// discount method.
pub fn indexation_cutoff() -> NaiveDate {
    let (y, m, d) = INDEXATION_CUTOFF;
    NaiveDate::from_ymd_opt(y, m, d).expect("static cutoff date is valid")
}
