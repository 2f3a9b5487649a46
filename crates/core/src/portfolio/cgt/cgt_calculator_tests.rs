#[cfg(test)]
mod tests {
    use crate::errors::{Error, TransactionError};
    use crate::portfolio::cgt::{
        cgt_method, discounted_cgt, CgtCalculator, CgtMethod, FirstInFirstOut, LastInFirstOut,
        MaximizeGain, MinimizeGain, OpenParcel,
    };
    use crate::portfolio::parcel::ParcelProperties;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn open_parcel(acquired: NaiveDate, units: i64, cost_base: Decimal) -> OpenParcel {
        OpenParcel {
            id: Uuid::new_v4(),
            acquisition_date: acquired,
            properties: ParcelProperties {
                units,
                amount: cost_base,
                cost_base,
            },
        }
    }

    #[test]
    fn method_classification_boundaries() {
        let disposal = date(2020, 2, 1);
        assert_eq!(
            cgt_method(date(1999, 9, 20), disposal),
            CgtMethod::Indexation
        );
        assert_eq!(cgt_method(date(1999, 9, 21), disposal), CgtMethod::Discount);

        // Held exactly a year is not discount-eligible; one more day is.
        assert_eq!(
            cgt_method(date(2019, 2, 1), date(2020, 2, 1)),
            CgtMethod::Other
        );
        assert_eq!(
            cgt_method(date(2019, 1, 31), date(2020, 2, 1)),
            CgtMethod::Discount
        );
    }

    #[test]
    fn discount_halves_positive_gains_only() {
        assert_eq!(discounted_cgt(dec!(480.05), CgtMethod::Discount), dec!(240.03));
        assert_eq!(discounted_cgt(dec!(-100), CgtMethod::Discount), dec!(-100));
        assert_eq!(discounted_cgt(dec!(480.05), CgtMethod::Other), dec!(480.05));
        assert_eq!(
            discounted_cgt(dec!(480.05), CgtMethod::Indexation),
            dec!(480.05)
        );
    }

    #[test]
    fn single_parcel_disposal_matches_discount_example() {
        let parcels = vec![open_parcel(date(2007, 1, 1), 100, dec!(1500))];
        let sales = CgtCalculator::calculate(
            &parcels,
            date(2020, 2, 1),
            100,
            dec!(1980.05),
            &FirstInFirstOut,
        )
        .unwrap();

        assert_eq!(sales.len(), 1);
        let sale = &sales[0];
        assert_eq!(sale.units_consumed, 100);
        assert_eq!(sale.apportioned_amount, dec!(1980.05));
        assert_eq!(sale.apportioned_cost_base, dec!(1500));
        assert_eq!(sale.capital_gain, dec!(480.05));
        assert_eq!(sale.method, CgtMethod::Discount);
        assert_eq!(sale.discounted_gain, dec!(240.03));
        assert!(sale.closes_parcel);
    }

    #[test]
    fn apportioned_amounts_resum_to_the_cent() {
        let parcels = vec![
            open_parcel(date(2015, 1, 1), 3, dec!(30)),
            open_parcel(date(2016, 1, 1), 3, dec!(45)),
            open_parcel(date(2017, 1, 1), 3, dec!(60)),
        ];
        // 100.00 over 9 units in 3/3/3 chunks forces rounding on every chunk.
        let sales =
            CgtCalculator::calculate(&parcels, date(2020, 1, 1), 9, dec!(100), &FirstInFirstOut)
                .unwrap();

        let total: Decimal = sales.iter().map(|s| s.apportioned_amount).sum();
        assert_eq!(total, dec!(100));
        assert_eq!(sales[0].apportioned_amount, dec!(33.33));
        assert_eq!(sales[1].apportioned_amount, dec!(33.33));
        // Final parcel takes the remainder by subtraction.
        assert_eq!(sales[2].apportioned_amount, dec!(33.34));
    }

    #[test]
    fn partial_consumption_apportions_cost_base_by_units() {
        let parcels = vec![open_parcel(date(2015, 1, 1), 100, dec!(1019.95))];
        let sales = CgtCalculator::calculate(
            &parcels,
            date(2020, 1, 1),
            40,
            dec!(800),
            &FirstInFirstOut,
        )
        .unwrap();

        let sale = &sales[0];
        assert_eq!(sale.units_consumed, 40);
        assert!(!sale.closes_parcel);
        assert_eq!(sale.apportioned_cost_base, dec!(407.98));
        assert_eq!(sale.apportioned_amount, dec!(800));
    }

    #[test]
    fn fifo_and_lifo_order_by_acquisition_date() {
        let old = open_parcel(date(2015, 1, 1), 10, dec!(100));
        let new = open_parcel(date(2018, 1, 1), 10, dec!(200));
        let parcels = vec![new, old];

        let fifo =
            CgtCalculator::calculate(&parcels, date(2020, 1, 1), 10, dec!(500), &FirstInFirstOut)
                .unwrap();
        assert_eq!(fifo[0].parcel_id, old.id);

        let lifo =
            CgtCalculator::calculate(&parcels, date(2020, 1, 1), 10, dec!(500), &LastInFirstOut)
                .unwrap();
        assert_eq!(lifo[0].parcel_id, new.id);
    }

    #[test]
    fn maximize_gain_prefers_eligible_then_cheapest_units() {
        let disposal = date(2020, 6, 1);
        // Ineligible (recent), cheap.
        let recent_cheap = open_parcel(date(2020, 1, 1), 10, dec!(10));
        // Eligible, dear.
        let old_dear = open_parcel(date(2015, 1, 1), 10, dec!(500));
        // Eligible, cheap - the best gain.
        let old_cheap = open_parcel(date(2016, 1, 1), 10, dec!(50));
        let parcels = vec![recent_cheap, old_dear, old_cheap];

        let sales =
            CgtCalculator::calculate(&parcels, disposal, 20, dec!(2000), &MaximizeGain).unwrap();
        assert_eq!(sales[0].parcel_id, old_cheap.id);
        assert_eq!(sales[1].parcel_id, old_dear.id);
    }

    #[test]
    fn minimize_gain_prefers_ineligible_then_dearest_units() {
        let disposal = date(2020, 6, 1);
        let recent_cheap = open_parcel(date(2020, 1, 1), 10, dec!(10));
        let recent_dear = open_parcel(date(2020, 2, 1), 10, dec!(400));
        let old_dear = open_parcel(date(2015, 1, 1), 10, dec!(500));
        let parcels = vec![recent_cheap, recent_dear, old_dear];

        let sales =
            CgtCalculator::calculate(&parcels, disposal, 20, dec!(2000), &MinimizeGain).unwrap();
        assert_eq!(sales[0].parcel_id, recent_dear.id);
        assert_eq!(sales[1].parcel_id, recent_cheap.id);
    }

    #[test]
    fn insufficient_units_are_rejected() {
        let parcels = vec![open_parcel(date(2015, 1, 1), 10, dec!(100))];
        let err = CgtCalculator::calculate(
            &parcels,
            date(2020, 1, 1),
            25,
            dec!(500),
            &FirstInFirstOut,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            Error::Transaction(TransactionError::NotEnoughShares {
                requested: 25,
                available: 10,
            })
        ));
    }
}
