// Money and date helpers shared by the booking and billing flows

use chrono::NaiveDate;
use thiserror::Error;

/// Fixed tax rate applied to every reservation subtotal.
pub const TAX_RATE: f64 = 0.16;

#[derive(Error, Debug, PartialEq)]
pub enum DateRangeError {
    #[error("invalid date range: check-out {check_out} must be after check-in {check_in}")]
    InvalidDateRange {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },
}

/// Subtotal/tax/total breakdown for a stay, rounded to currency precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

/// Whole-day difference between check-in and check-out.
///
/// Works on calendar dates rather than wall-clock instants, so a stay
/// spanning a daylight-saving switch still counts exact nights. The
/// minimum bookable stay is one night; `check_out <= check_in` is an error.
pub fn nights_between(check_in: NaiveDate, check_out: NaiveDate) -> Result<i64, DateRangeError> {
    let nights = (check_out - check_in).num_days();
    if nights < 1 {
        return Err(DateRangeError::InvalidDateRange {
            check_in,
            check_out,
        });
    }
    Ok(nights)
}

/// Round to `decimals` places, half-up (0.005 -> 0.01).
pub fn round_half_up(amount: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (amount * factor + 0.5).floor() / factor
}

/// Compute the billing breakdown for a stay.
///
/// `tax = subtotal * TAX_RATE`, both rounded to 2 decimals half-up;
/// the total is the sum of the rounded parts so the printed invoice
/// lines always add up.
pub fn compute_totals(nightly_rate: f64, nights: i64) -> Totals {
    let subtotal = round_half_up(nightly_rate * nights as f64, 2);
    let tax = round_half_up(subtotal * TAX_RATE, 2);
    Totals {
        subtotal,
        tax,
        total: round_half_up(subtotal + tax, 2),
    }
}

/// Display formatting for amounts. Grouping and decimal symbols follow the
/// locale; the numeric value is only rounded for display, never mutated.
pub fn format_currency(amount: f64, locale: &str, currency_code: &str) -> String {
    // Locales we render for; everything else falls back to en-style symbols.
    let (group_sep, decimal_sep) = match locale.split(['-', '_']).next().unwrap_or("en") {
        "es" | "de" | "it" => ('.', ','),
        _ => (',', '.'),
    };

    let symbol = match currency_code {
        "USD" | "MXN" | "CAD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        other => return format_with_separators(amount, group_sep, decimal_sep, other, true),
    };
    format_with_separators(amount, group_sep, decimal_sep, symbol, false)
}

fn format_with_separators(
    amount: f64,
    group_sep: char,
    decimal_sep: char,
    prefix: &str,
    space_after_prefix: bool,
) -> String {
    let rounded = round_half_up(amount.abs(), 2);
    let whole = rounded.trunc() as u64;
    let cents = ((rounded - rounded.trunc()) * 100.0).round() as u64;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(group_sep);
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    let gap = if space_after_prefix { " " } else { "" };
    format!("{sign}{prefix}{gap}{grouped}{decimal_sep}{cents:02}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test_case(date(2025, 6, 1), date(2025, 6, 2), 1; "single night")]
    #[test_case(date(2025, 6, 1), date(2025, 6, 5), 4; "four nights")]
    #[test_case(date(2025, 12, 30), date(2026, 1, 2), 3; "across year boundary")]
    // A stay over the last Sunday of March crosses the CET/CEST switch;
    // calendar-day math must not lose a night to the missing hour.
    #[test_case(date(2025, 3, 29), date(2025, 3, 31), 2; "across dst switch")]
    fn nights_between_counts_whole_days(check_in: NaiveDate, check_out: NaiveDate, expected: i64) {
        assert_eq!(nights_between(check_in, check_out), Ok(expected));
    }

    #[test]
    fn nights_between_rejects_same_day_and_inverted_ranges() {
        let day = date(2025, 6, 1);
        assert!(matches!(
            nights_between(day, day),
            Err(DateRangeError::InvalidDateRange { .. })
        ));
        assert!(matches!(
            nights_between(date(2025, 6, 5), date(2025, 6, 1)),
            Err(DateRangeError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn compute_totals_applies_sixteen_percent_tax() {
        let totals = compute_totals(1200.0, 3);
        assert_eq!(totals.subtotal, 3600.0);
        assert_eq!(totals.tax, 576.0);
        assert_eq!(totals.total, 4176.0);
    }

    #[test_case(799.99, 1, 128.0; "rounds tax half up")]
    #[test_case(0.0, 5, 0.0; "free stay has no tax")]
    #[test_case(1050.50, 2, 336.16; "fractional rate")]
    fn compute_totals_rounds_to_cents(rate: f64, nights: i64, expected_tax: f64) {
        let totals = compute_totals(rate, nights);
        assert!((totals.tax - expected_tax).abs() < 1e-9);
        assert!((totals.total - (totals.subtotal + totals.tax)).abs() < 1e-9);
    }

    #[test]
    fn totals_match_direct_formula_for_sampled_rates() {
        for rate in [0.0, 1.0, 99.99, 450.25, 1200.0, 8999.5] {
            for nights in 1..=14 {
                let totals = compute_totals(rate, nights);
                let expected = round_half_up(
                    round_half_up(rate * nights as f64, 2) * (1.0 + TAX_RATE),
                    2,
                );
                assert!(
                    (totals.total - expected).abs() < 0.011,
                    "rate {rate} nights {nights}: {} vs {expected}",
                    totals.total
                );
            }
        }
    }

    #[test_case(4176.0, "en-US", "USD", "$4,176.00"; "us dollars")]
    #[test_case(4176.0, "es-MX", "MXN", "$4.176,00"; "mexican pesos")]
    #[test_case(1299.5, "en-GB", "GBP", "£1,299.50"; "british pounds")]
    #[test_case(0.05, "en-US", "USD", "$0.05"; "cents only")]
    #[test_case(1234567.89, "es-ES", "EUR", "€1.234.567,89"; "large euro amount")]
    #[test_case(12.0, "en-US", "CHF", "CHF 12.00"; "unmapped currency uses code")]
    fn format_currency_is_locale_aware(amount: f64, locale: &str, code: &str, expected: &str) {
        assert_eq!(format_currency(amount, locale, code), expected);
    }

    #[test]
    fn formatting_does_not_mutate_value() {
        let amount = 100.004999;
        let _ = format_currency(amount, "en-US", "USD");
        // Display rounding happens on a copy; recomputing still sees the raw value.
        assert_eq!(round_half_up(amount, 2), 100.0);
    }
}
