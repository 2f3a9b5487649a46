#[cfg(test)]
mod tests {
    use crate::portfolio::performance::irr;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn growth_with_no_interim_flows() {
        let rate = irr(
            date(2000, 1, 1),
            dec!(1000),
            date(2005, 12, 31),
            dec!(1500),
            &BTreeMap::new(),
        );

        assert!((rate - 0.0699).abs() < 1e-3, "rate was {rate}");
        // The solver's own convergence is much tighter than the displayed
        // precision.
        let implied = (1.0 + rate).powf(2191.0 / 365.0);
        assert!((implied - 1.5).abs() < 1e-6);
    }

    #[test]
    fn interim_contribution_lowers_the_rate() {
        let plain = irr(
            date(2020, 1, 1),
            dec!(1000),
            date(2021, 1, 1),
            dec!(1500),
            &BTreeMap::new(),
        );

        let mut flows = BTreeMap::new();
        flows.insert(date(2020, 7, 1), dec!(300));
        let with_contribution = irr(
            date(2020, 1, 1),
            dec!(1000),
            date(2021, 1, 1),
            dec!(1500),
            &flows,
        );

        assert!(with_contribution < plain);
        assert!(with_contribution > 0.0);
    }

    #[test]
    fn flat_value_yields_zero_rate() {
        let rate = irr(
            date(2020, 1, 1),
            dec!(1000),
            date(2021, 1, 1),
            dec!(1000),
            &BTreeMap::new(),
        );
        assert!(rate.abs() < 1e-6, "rate was {rate}");
    }

    #[test]
    fn degenerate_inputs_return_zero() {
        let rate = irr(
            date(2020, 1, 1),
            dec!(0),
            date(2021, 1, 1),
            dec!(0),
            &BTreeMap::new(),
        );
        assert_eq!(rate, 0.0);
    }

    #[test]
    fn losses_produce_a_negative_rate() {
        let rate = irr(
            date(2020, 1, 1),
            dec!(1000),
            date(2022, 1, 1),
            dec!(640),
            &BTreeMap::new(),
        );
        assert!((rate + 0.2).abs() < 1e-3, "rate was {rate}");
    }
}
