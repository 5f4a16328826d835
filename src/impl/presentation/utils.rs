use chrono::{DateTime, Datelike as _, Utc};
use num_format::{Locale, ToFormattedString as _};

pub(crate) use crate::domain::logic::utils::kinshasa_time;
use crate::entities::TaxCurrency;

const MONTHS_FR: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

/// Standard number decimal places for the given currency (USD = 2, CDF = 2).
fn decimal_places(currency: TaxCurrency) -> usize {
    currency.iso().exponent().unwrap_or(0) as usize
}

fn currency_label(currency: TaxCurrency) -> &'static str {
    match currency {
        TaxCurrency::Usd => "USD",
        TaxCurrency::Fc => "FC",
    }
}

/// Integer and fractional digits, en locale ("148,365" and "00").
fn split_amount(amount: f64, decimal_places: usize) -> (String, String) {
    let scale = 10f64.powi(decimal_places as i32);
    let cents = (amount.abs() * scale).round() as i64;
    let sign = if amount < 0.0 && cents != 0 { "-" } else { "" };
    let integer = (cents / scale as i64).to_formatted_string(&Locale::en);
    let fraction = format!(
        "{:0width$}",
        cents % scale as i64,
        width = decimal_places
    );
    (format!("{}{}", sign, integer), fraction)
}

/// Amount with the currency label, en locale (`1,234.50 USD`).
///
/// Bank slips print amounts this way whatever the currency.
pub(crate) fn format_amount(amount: f64, currency: TaxCurrency) -> String {
    format!("{} {}", format_number(amount, currency), currency_label(currency))
}

/// Amount without label, en locale.
pub(crate) fn format_number(amount: f64, currency: TaxCurrency) -> String {
    let places = decimal_places(currency);
    let (integer, fraction) = split_amount(amount, places);
    if places == 0 {
        integer
    } else {
        format!("{}.{}", integer, fraction)
    }
}

/// French grouping for receipts: `148 365,00 FC`.
pub(crate) fn format_amount_fr(amount: f64, currency: TaxCurrency) -> String {
    let places = decimal_places(currency);
    let (integer, fraction) = split_amount(amount, places);
    let integer = integer.replace(',', " ");
    if places == 0 {
        format!("{} {}", integer, currency_label(currency))
    } else {
        format!("{},{} {}", integer, fraction, currency_label(currency))
    }
}


/// `dd/mm/yyyy`, Kinshasa time.
pub(crate) fn short_date(date: DateTime<Utc>) -> String {
    kinshasa_time(date).format("%d/%m/%Y").to_string()
}

/// `HH:MM`, Kinshasa time.
pub(crate) fn short_time(date: DateTime<Utc>) -> String {
    kinshasa_time(date).format("%H:%M").to_string()
}

/// `15 janvier 2026`, Kinshasa time.
pub(crate) fn long_date(date: DateTime<Utc>) -> String {
    let local = kinshasa_time(date);
    format!(
        "{:02} {} {}",
        local.day(),
        MONTHS_FR[local.month0() as usize],
        local.year()
    )
}

/// `label : value` lines, wrapping long values under the value column. Links
/// and ids are never split.
pub(crate) fn field(out: &mut String, label: &str, value: &str, label_width: usize, width: usize) {
    let indent = " ".repeat(label_width + 3);
    let options = textwrap::Options::new(width.max(label_width + 13))
        .subsequent_indent(&indent)
        .break_words(false);
    let first = format!("{:<label_width$} : {}", label, value);
    for line in textwrap::wrap(&first, options) {
        out.push_str(&line);
        out.push('\n');
    }
}

pub(crate) fn rule(out: &mut String, c: char, width: usize) {
    out.extend(std::iter::repeat(c).take(width));
    out.push('\n');
}

pub(crate) fn centered(out: &mut String, text: &str, width: usize) {
    out.push_str(&format!("{:^width$}", text).trim_end().to_string());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;

    #[test]
    fn amounts_use_en_grouping() {
        assert_eq!(format_amount(63.0, TaxCurrency::Usd), "63.00 USD");
        assert_eq!(format_amount(148_365.0, TaxCurrency::Fc), "148,365.00 FC");
        assert_eq!(format_amount(58.7, TaxCurrency::Usd), "58.70 USD");
        assert_eq!(format_number(1_234_567.891, TaxCurrency::Usd), "1,234,567.89");
    }

    #[test]
    fn receipts_use_french_grouping() {
        assert_eq!(format_amount_fr(148_365.0, TaxCurrency::Fc), "148 365,00 FC");
        assert_eq!(format_amount_fr(0.5, TaxCurrency::Fc), "0,50 FC");
    }

    #[test]
    fn dates_are_shown_in_kinshasa_time() {
        // 23:30 UTC is already the next day in Kinshasa.
        let late = Utc.with_ymd_and_hms(2026, 1, 14, 23, 30, 0).unwrap();
        assert_eq!(short_date(late), "15/01/2026");
        assert_eq!(short_time(late), "00:30");
        assert_eq!(long_date(late), "15 janvier 2026");
        let aug = Utc.with_ymd_and_hms(2026, 8, 3, 10, 0, 0).unwrap();
        assert_eq!(long_date(aug), "03 août 2026");
    }

    #[test]
    fn long_values_wrap_under_the_value_column() {
        let mut out = String::new();
        field(
            &mut out,
            "Adresse",
            "12 Avenue de la Libération, Quartier Socimat, Gombe, Kinshasa",
            10,
            40,
        );
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines.len() > 1);
        assert!(lines[0].starts_with("Adresse    : 12"));
        assert!(lines[1].starts_with("             "));
        assert!(lines.iter().all(|l| l.chars().count() <= 40));
    }
}
