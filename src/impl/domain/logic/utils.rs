use std::{convert::Infallible, str::FromStr, sync::LazyLock};

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use regex::Regex;

use crate::entities::{DateWindow, Declaration, DeclarationFilter, VehicleInfo, Weight};

static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:[.,]\d+)?)").expect("hardcoded regex should be valid")
});

/// First number found in a free-text measurement ("11 CV", "1,5 tonnes").
pub(crate) fn parse_leading_number(s: &str) -> Option<f64> {
    LEADING_NUMBER
        .captures(s)
        .and_then(|caps| caps[1].replace(',', ".").parse::<f64>().ok())
}

impl Weight {
    /// Lenient read of a captured weight ("10 tonnes", "1,5 T"). Text without
    /// a number reads as 0 t.
    pub fn parse(s: &str) -> Self {
        Weight(parse_leading_number(s).unwrap_or(0.0))
    }
}

impl FromStr for Weight {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Weight::parse(s))
    }
}

impl From<&str> for Weight {
    fn from(s: &str) -> Self {
        Weight::parse(s)
    }
}

impl VehicleInfo {
    /// Fiscal power in CV; 0 when the captured text carries no number.
    pub fn fiscal_power_cv(&self) -> f64 {
        parse_leading_number(&self.fiscal_power).unwrap_or(0.0)
    }

    /// Weight in tonnes; 0 when the captured text carries no number.
    pub fn weight_tonnes(&self) -> Weight {
        Weight::parse(&self.weight)
    }
}

/// Kinshasa runs on West Africa Time, UTC+1 all year.
pub(crate) fn kinshasa_time(date: DateTime<Utc>) -> DateTime<FixedOffset> {
    let offset = FixedOffset::east_opt(3600).expect("hardcoded offset should be valid");
    date.with_timezone(&offset)
}

fn kinshasa_day(date: DateTime<Utc>) -> NaiveDate {
    kinshasa_time(date).date_naive()
}

impl DateWindow {
    pub fn contains(&self, date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let (day, today) = (kinshasa_day(date), kinshasa_day(now));
        match self {
            DateWindow::All => true,
            DateWindow::Today => day == today,
            DateWindow::Yesterday => day == today - Duration::days(1),
            DateWindow::Week => day >= today - Duration::days(7),
            DateWindow::Month => day >= today - Duration::days(30),
        }
    }
}

impl DeclarationFilter {
    pub fn matches(&self, declaration: &Declaration, now: DateTime<Utc>) -> bool {
        self.matches_query(declaration) && self.window.contains(declaration.created_at, now)
    }

    fn matches_query(&self, declaration: &Declaration) -> bool {
        let query = match self.query.as_deref().map(str::trim) {
            None | Some("") => return true,
            Some(q) => q.to_lowercase(),
        };
        let name = declaration
            .taxpayer
            .as_ref()
            .map(|t| t.name.as_str())
            .unwrap_or_default();
        [declaration.id.as_str(), declaration.vehicle.plate.as_str(), name]
            .iter()
            .any(|field| field.to_lowercase().contains(&query))
    }
}

/// Upper-cased first word of a name ("josuah kitona" -> "JOSUAH").
pub(crate) fn first_name_upper(full_name: &str) -> String {
    full_name
        .split_whitespace()
        .next()
        .unwrap_or("CLIENT")
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;
    use crate::domain::logic::declaration_generator::DeclarationGenerator;

    #[test]
    fn leading_number_is_extracted() {
        assert_eq!(parse_leading_number("11 CV"), Some(11.0));
        assert_eq!(parse_leading_number("1,5 tonnes"), Some(1.5));
        assert_eq!(parse_leading_number("poids: 12.25 T"), Some(12.25));
        assert_eq!(parse_leading_number("-"), None);
        assert_eq!(parse_leading_number(""), None);
    }

    #[test]
    fn weight_reads_free_text() {
        assert_eq!(Weight::parse("10 tonnes"), Weight(10.0));
        assert_eq!(Weight::parse("1.5 T"), Weight(1.5));
        assert_eq!(Weight::parse("1,5"), Weight(1.5));
        assert_eq!(Weight::parse(""), Weight(0.0));
        assert_eq!(Weight::parse("-"), Weight(0.0));
        assert_eq!("15 tonnes".parse::<Weight>(), Ok(Weight(15.0)));
        assert_eq!(Weight::from("2 T"), Weight(2.0));
    }

    fn declaration(sequence: u64, created_at: DateTime<Utc>) -> Declaration {
        let mut d = DeclarationGenerator::new(2355.0).generate(sequence);
        d.created_at = created_at;
        d
    }

    #[test]
    fn filter_query_matches_id_plate_or_name() {
        let now = Utc.with_ymd_and_hms(2026, 1, 22, 10, 0, 0).unwrap();
        let d = declaration(12, now);
        let name = d.taxpayer.as_ref().unwrap().name.clone();
        let by = |q: &str| DeclarationFilter {
            query: Some(q.to_string()),
            ..Default::default()
        };

        assert!(by(&d.id.to_lowercase()).matches(&d, now));
        assert!(by(&d.vehicle.plate[..4]).matches(&d, now));
        assert!(by(&name.to_uppercase()).matches(&d, now));
        assert!(by("  ").matches(&d, now));
        assert!(!by("zzz-no-such-thing").matches(&d, now));
        assert!(DeclarationFilter::default().matches(&d, now));
    }

    #[test]
    fn date_windows_count_kinshasa_days() {
        // 00:30 in Kinshasa on the 22nd.
        let now = Utc.with_ymd_and_hms(2026, 1, 21, 23, 30, 0).unwrap();
        let late_on_the_21st = Utc.with_ymd_and_hms(2026, 1, 21, 22, 0, 0).unwrap();
        let early_on_the_22nd = Utc.with_ymd_and_hms(2026, 1, 21, 23, 10, 0).unwrap();

        assert!(DateWindow::Today.contains(early_on_the_22nd, now));
        assert!(!DateWindow::Today.contains(late_on_the_21st, now));
        assert!(DateWindow::Yesterday.contains(late_on_the_21st, now));
        assert!(!DateWindow::Yesterday.contains(early_on_the_22nd, now));

        let eight_days_back = now - Duration::days(8);
        assert!(DateWindow::Week.contains(now - Duration::days(7), now));
        assert!(!DateWindow::Week.contains(eight_days_back, now));
        assert!(DateWindow::Month.contains(eight_days_back, now));
        assert!(!DateWindow::Month.contains(now - Duration::days(31), now));
        assert!(DateWindow::All.contains(now - Duration::days(400), now));
    }

    #[test]
    fn first_name_defaults_to_client() {
        assert_eq!(first_name_upper("  josuah kitona "), "JOSUAH");
        assert_eq!(first_name_upper(""), "CLIENT");
    }
}
