#[cfg(test)]
mod tests {
    use crate::errors::EffectiveDateError;
    use crate::temporal::{EffectiveLifetime, EffectivePeriod};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn start_then_end_bounds_effectiveness() {
        let mut lifetime = EffectiveLifetime::new();
        assert!(!lifetime.is_effective());

        lifetime.start(date(2020, 1, 1)).unwrap();
        assert!(lifetime.is_effective());
        assert!(lifetime.is_effective_at(date(2022, 5, 5)));
        assert!(!lifetime.is_effective_at(date(2019, 12, 31)));

        lifetime.end(date(2020, 12, 31)).unwrap();
        assert!(!lifetime.is_effective());
        assert!(lifetime.is_effective_at(date(2020, 12, 31)));
        assert!(!lifetime.is_effective_at(date(2021, 1, 1)));
        assert_eq!(lifetime.end_date(), Some(date(2020, 12, 31)));
    }

    #[test]
    fn start_twice_fails() {
        let mut lifetime = EffectiveLifetime::starting(date(2020, 1, 1));
        assert_eq!(
            lifetime.start(date(2021, 1, 1)).unwrap_err(),
            EffectiveDateError::AlreadyStarted
        );
    }

    #[test]
    fn end_violations() {
        let mut lifetime = EffectiveLifetime::new();
        assert_eq!(
            lifetime.end(date(2020, 1, 1)).unwrap_err(),
            EffectiveDateError::NotStarted
        );

        lifetime.start(date(2020, 6, 1)).unwrap();
        assert_eq!(
            lifetime.end(date(2020, 1, 1)).unwrap_err(),
            EffectiveDateError::EndBeforeStart {
                start: date(2020, 6, 1),
                end: date(2020, 1, 1),
            }
        );

        lifetime.end(date(2020, 12, 31)).unwrap();
        assert_eq!(
            lifetime.end(date(2021, 6, 1)).unwrap_err(),
            EffectiveDateError::AlreadyEnded
        );
    }

    #[test]
    fn reopen_creates_second_period() {
        let mut lifetime = EffectiveLifetime::starting(date(2020, 1, 1));
        lifetime.end(date(2020, 6, 30)).unwrap();
        lifetime.start(date(2021, 1, 1)).unwrap();

        assert_eq!(lifetime.periods().len(), 2);
        assert!(lifetime.is_effective());
        assert!(!lifetime.is_effective_at(date(2020, 9, 1)));
        assert!(lifetime.is_effective_at(date(2021, 3, 1)));
        assert_eq!(lifetime.start_date(), Some(date(2020, 1, 1)));
    }

    #[test]
    fn range_overlap_queries() {
        let mut lifetime = EffectiveLifetime::starting(date(2020, 1, 1));
        lifetime.end(date(2020, 6, 30)).unwrap();

        let overlapping = EffectivePeriod::new(date(2020, 6, 1), date(2020, 9, 1));
        let disjoint = EffectivePeriod::new(date(2020, 7, 1), date(2020, 9, 1));
        assert!(lifetime.is_effective_during(&overlapping));
        assert!(!lifetime.is_effective_during(&disjoint));
    }
}
