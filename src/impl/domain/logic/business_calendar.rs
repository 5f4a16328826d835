use chrono::{DateTime, Datelike, Duration, TimeZone, Timelike, Utc, Weekday};

const MAX_ATTEMPTS: i64 = 1000;

/// Opening hours of the collection desks over the campaign window, in UTC.
///
/// Mon-Fri 09:00-17:30, Sat 08:30-14:00, closed on Sunday.
#[derive(Debug, Clone, Copy)]
pub struct BusinessCalendar {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Default for BusinessCalendar {
    fn default() -> Self {
        Self {
            start: Utc
                .with_ymd_and_hms(2026, 1, 15, 9, 0, 0)
                .single()
                .expect("hardcoded campaign start should be a valid date"),
            end: Utc
                .with_ymd_and_hms(2026, 2, 7, 14, 0, 0)
                .single()
                .expect("hardcoded campaign end should be a valid date"),
        }
    }
}

impl BusinessCalendar {
    pub fn is_within_business_hours(&self, date: DateTime<Utc>) -> bool {
        let minutes = date.hour() * 60 + date.minute();
        match date.weekday() {
            Weekday::Sun => false,
            Weekday::Sat => (8 * 60 + 30..=14 * 60).contains(&minutes),
            _ => (9 * 60..=17 * 60 + 30).contains(&minutes),
        }
    }

    /// Deterministic date inside the window that falls within opening
    /// hours. Each attempt jumps through the window with an LCG-style salt;
    /// after the last attempt the last candidate is returned as is.
    pub fn generate_valid_date(&self, seed: i64) -> DateTime<Utc> {
        let range = (self.end - self.start).num_milliseconds().max(1);
        let mut candidate = self.start;
        for attempt in 0..MAX_ATTEMPTS {
            let salt = attempt
                .wrapping_mul(1_664_525)
                .wrapping_add(1_013_904_223);
            let offset = ((seed ^ salt) % range).abs();
            candidate = self.start + Duration::milliseconds(offset);
            if self.is_within_business_hours(candidate) {
                return candidate;
            }
        }
        candidate
    }

    /// `now` when the desks are open, otherwise a valid date seeded by it.
    pub fn now_or_business_hours(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        if self.is_within_business_hours(now) {
            now
        } else {
            self.generate_valid_date(now.timestamp_millis())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn weekday_hours() {
        let cal = BusinessCalendar::default();
        // 2026-01-15 is a Thursday.
        assert!(cal.is_within_business_hours(at(2026, 1, 15, 9, 0)));
        assert!(cal.is_within_business_hours(at(2026, 1, 15, 17, 30)));
        assert!(!cal.is_within_business_hours(at(2026, 1, 15, 17, 31)));
        assert!(!cal.is_within_business_hours(at(2026, 1, 15, 8, 59)));
    }

    #[test]
    fn saturday_and_sunday() {
        let cal = BusinessCalendar::default();
        assert!(cal.is_within_business_hours(at(2026, 1, 17, 8, 30)));
        assert!(!cal.is_within_business_hours(at(2026, 1, 17, 14, 1)));
        assert!(!cal.is_within_business_hours(at(2026, 1, 18, 12, 0)));
    }

    #[test]
    fn generated_dates_are_valid_and_deterministic() {
        let cal = BusinessCalendar::default();
        for seed in [0, 1, 42, 1_700_000_000_000, -99] {
            let d = cal.generate_valid_date(seed);
            assert!(cal.is_within_business_hours(d), "seed {seed} gave {d}");
            assert!(d >= cal.start && d <= cal.end);
            assert_eq!(d, cal.generate_valid_date(seed));
        }
    }

    #[test]
    fn now_is_kept_when_open() {
        let cal = BusinessCalendar::default();
        let open = at(2026, 1, 20, 10, 15);
        assert_eq!(cal.now_or_business_hours(open), open);
        let closed = at(2026, 1, 18, 10, 15);
        assert!(cal.is_within_business_hours(cal.now_or_business_hours(closed)));
    }
}
