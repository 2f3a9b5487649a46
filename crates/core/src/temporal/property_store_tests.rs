#[cfg(test)]
mod tests {
    use crate::errors::EffectiveDateError;
    use crate::temporal::{EffectivePeriod, TemporalStore};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn change_opens_first_record() {
        let mut store = TemporalStore::new();
        store.change(date(2020, 1, 1), 10).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.value(date(2020, 1, 1)).unwrap(), &10);
        assert_eq!(store.value(date(2024, 6, 30)).unwrap(), &10);
        assert!(store.records()[0].period.is_open());
    }

    #[test]
    fn change_closes_previous_record_at_day_before() {
        let mut store = TemporalStore::new();
        store.change(date(2020, 1, 1), 10).unwrap();
        store.change(date(2020, 3, 15), 25).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.records()[0].period.to_date, date(2020, 3, 14));
        assert_eq!(store.value(date(2020, 3, 14)).unwrap(), &10);
        assert_eq!(store.value(date(2020, 3, 15)).unwrap(), &25);
    }

    #[test]
    fn change_on_same_start_date_replaces_in_place() {
        let mut store = TemporalStore::new();
        store.change(date(2020, 1, 1), 10).unwrap();
        store.change(date(2020, 3, 15), 25).unwrap();
        store.change(date(2020, 3, 15), 30).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.value(date(2020, 3, 15)).unwrap(), &30);
    }

    #[test]
    fn change_before_latest_start_is_rejected() {
        let mut store = TemporalStore::new();
        store.change(date(2020, 3, 15), 25).unwrap();

        let err = store.change(date(2020, 1, 1), 10).unwrap_err();
        assert_eq!(
            err,
            EffectiveDateError::ChangeBeforeLatest {
                date: date(2020, 1, 1),
                latest: date(2020, 3, 15),
            }
        );
    }

    #[test]
    fn end_closes_open_record() {
        let mut store = TemporalStore::new();
        store.change(date(2020, 1, 1), 10).unwrap();
        store.end(date(2020, 6, 30)).unwrap();

        assert_eq!(store.records()[0].period.to_date, date(2020, 6, 30));
        assert_eq!(store.value(date(2020, 6, 30)).unwrap(), &10);
        assert!(store.value(date(2020, 7, 1)).is_err());
        assert!(store.current().is_none());
    }

    #[test]
    fn end_without_open_record_fails() {
        let mut store: TemporalStore<i32> = TemporalStore::new();
        assert_eq!(
            store.end(date(2020, 1, 1)).unwrap_err(),
            EffectiveDateError::NotStarted
        );

        store.change(date(2020, 1, 1), 10).unwrap();
        store.end(date(2020, 6, 30)).unwrap();
        assert_eq!(
            store.end(date(2020, 12, 31)).unwrap_err(),
            EffectiveDateError::AlreadyEnded
        );
    }

    #[test]
    fn end_before_record_start_fails() {
        let mut store = TemporalStore::new();
        store.change(date(2020, 6, 1), 10).unwrap();

        let err = store.end(date(2020, 1, 1)).unwrap_err();
        assert_eq!(
            err,
            EffectiveDateError::EndBeforeStart {
                start: date(2020, 6, 1),
                end: date(2020, 1, 1),
            }
        );
    }

    #[test]
    fn value_outside_covered_range_fails() {
        let mut store = TemporalStore::new();
        store.change(date(2020, 1, 1), 10).unwrap();

        let err = store.value(date(2019, 12, 31)).unwrap_err();
        assert_eq!(
            err,
            EffectiveDateError::OutOfRange {
                date: date(2019, 12, 31)
            }
        );
    }

    #[test]
    fn reopen_after_end_starts_new_record() {
        let mut store = TemporalStore::new();
        store.change(date(2020, 1, 1), 10).unwrap();
        store.end(date(2020, 6, 30)).unwrap();
        store.change(date(2021, 1, 1), 40).unwrap();

        assert_eq!(store.len(), 2);
        assert!(store.value(date(2020, 9, 1)).is_err());
        assert_eq!(store.value(date(2021, 2, 1)).unwrap(), &40);
    }

    #[test]
    fn change_inside_closed_record_fails() {
        let mut store = TemporalStore::new();
        store.change(date(2020, 1, 1), 10).unwrap();
        store.end(date(2020, 6, 30)).unwrap();

        assert_eq!(
            store.change(date(2020, 3, 1), 20).unwrap_err(),
            EffectiveDateError::AlreadyEnded
        );
    }

    #[test]
    fn closest_to_clamps_to_boundaries() {
        let mut store = TemporalStore::new();
        store.change(date(2020, 1, 1), 10).unwrap();
        store.change(date(2020, 7, 1), 20).unwrap();
        store.end(date(2020, 12, 31)).unwrap();

        assert_eq!(store.closest_to(date(2019, 1, 1)), Some(&10));
        assert_eq!(store.closest_to(date(2020, 8, 1)), Some(&20));
        assert_eq!(store.closest_to(date(2025, 1, 1)), Some(&20));

        let empty: TemporalStore<i32> = TemporalStore::new();
        assert_eq!(empty.closest_to(date(2020, 1, 1)), None);
    }

    #[test]
    fn matches_filters_by_point_and_range() {
        let mut store = TemporalStore::new();
        store.change(date(2020, 1, 1), 10).unwrap();
        store.change(date(2020, 7, 1), 20).unwrap();

        assert!(store.matches(|v| *v == 10));
        assert!(!store.matches(|v| *v == 99));

        assert!(store.matches_at(|v| *v == 10, date(2020, 3, 1)));
        assert!(!store.matches_at(|v| *v == 20, date(2020, 3, 1)));
        assert!(!store.matches_at(|v| *v == 10, date(2019, 1, 1)));

        let range = EffectivePeriod::new(date(2020, 6, 1), date(2020, 8, 1));
        assert!(store.matches_during(|v| *v == 20, &range));
        assert!(store.matches_during(|v| *v == 10, &range));
        let early = EffectivePeriod::new(date(2020, 1, 1), date(2020, 2, 1));
        assert!(!store.matches_during(|v| *v == 20, &early));
    }
}
