//! Reference clock: owns the fixed "now" every time window is measured from.
//!
//! RULE: Nothing in the generator reads the wall clock.
//! A run's "now" is chosen once (config or CLI) and threaded through,
//! so the same seed and reference time give byte-identical tables.

use crate::rng::TableRng;
use chrono::{Duration, NaiveDate, NaiveDateTime};

const SECONDS_PER_YEAR: f64 = 365.25 * 86_400.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceClock {
    now: NaiveDateTime,
}

impl ReferenceClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now }
    }

    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    /// Uniform timestamp in [now - years, now].
    pub fn past_within_years(&self, rng: &mut TableRng, years: f64) -> NaiveDateTime {
        let span = years_to_seconds(years);
        self.now - Duration::seconds(rng.int_inclusive(0, span))
    }

    /// Uniform timestamp in (now, now + years].
    pub fn future_within_years(&self, rng: &mut TableRng, years: f64) -> NaiveDateTime {
        let span = years_to_seconds(years).max(1);
        self.now + Duration::seconds(rng.int_inclusive(1, span))
    }

    /// Birth date for someone aged between min_age and max_age years today.
    pub fn date_of_birth(&self, rng: &mut TableRng, min_age: u32, max_age: u32) -> NaiveDate {
        let youngest = self.now - Duration::seconds(years_to_seconds(min_age as f64));
        let oldest = self.now - Duration::seconds(years_to_seconds(max_age as f64));
        let span = (youngest - oldest).num_seconds().max(0);
        (oldest + Duration::seconds(rng.int_inclusive(0, span))).date()
    }
}

fn years_to_seconds(years: f64) -> i64 {
    (years * SECONDS_PER_YEAR) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{RngBank, TableSlot};

    fn clock() -> ReferenceClock {
        let now = NaiveDate::from_ymd_opt(2025, 6, 30)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .expect("valid reference time");
        ReferenceClock::new(now)
    }

    #[test]
    fn past_window_stays_behind_now() {
        let clock = clock();
        let mut rng = RngBank::new(1).for_table(TableSlot::Accounts);
        let floor = clock.now() - Duration::days(3653);
        for _ in 0..1_000 {
            let t = clock.past_within_years(&mut rng, 10.0);
            assert!(t <= clock.now() && t >= floor, "{t} outside 10y window");
        }
    }

    #[test]
    fn future_window_is_strictly_ahead() {
        let clock = clock();
        let mut rng = RngBank::new(2).for_table(TableSlot::Transactions);
        let ceiling = clock.now() + Duration::days(366);
        for _ in 0..1_000 {
            let t = clock.future_within_years(&mut rng, 1.0);
            assert!(t > clock.now() && t <= ceiling, "{t} outside next-year window");
        }
    }

    #[test]
    fn birth_dates_give_adult_ages() {
        let clock = clock();
        let mut rng = RngBank::new(3).for_table(TableSlot::Customers);
        for _ in 0..1_000 {
            let dob = clock.date_of_birth(&mut rng, 18, 80);
            let age_days = (clock.now().date() - dob).num_days();
            assert!(age_days >= 18 * 365, "too young: {dob}");
            assert!(age_days <= 81 * 365, "too old: {dob}");
        }
    }
}
