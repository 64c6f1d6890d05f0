//! Display formatting for grid cells and summaries.

use chrono::{DateTime, Utc};

/// Placeholder for missing values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Rupee amount with thousands separators and two decimals
/// (`₹1,234.50`). Non-finite values render as [`NOT_AVAILABLE`].
#[must_use]
pub fn currency(amount: f64) -> String {
    if !amount.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}₹{}.{fraction}", group_thousands(whole))
}

/// Ratio rendered as a percentage with one decimal (`0.036` → `3.6%`).
#[must_use]
pub fn percent(ratio: f64) -> String {
    if ratio.is_finite() {
        format!("{:.1}%", ratio * 100.0)
    } else {
        NOT_AVAILABLE.to_string()
    }
}

/// Calendar date such as `Aug 4, 2025`.
#[must_use]
pub fn date(value: Option<&DateTime<Utc>>) -> String {
    value.map_or_else(
        || NOT_AVAILABLE.to_string(),
        |d| d.format("%b %-d, %Y").to_string(),
    )
}

/// Date and time such as `Aug 4, 2025, 09:05 AM`.
#[must_use]
pub fn date_time(value: Option<&DateTime<Utc>>) -> String {
    value.map_or_else(
        || NOT_AVAILABLE.to_string(),
        |d| d.format("%b %-d, %Y, %I:%M %p").to_string(),
    )
}

/// Upper-cases the first character (`status` → `Status`).
#[must_use]
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(currency(1234.5), "₹1,234.50");
        assert_eq!(currency(0.0), "₹0.00");
        assert_eq!(currency(999.999), "₹1,000.00");
        assert_eq!(currency(1_250_000.0), "₹1,250,000.00");
        assert_eq!(currency(-42.0), "-₹42.00");
        assert_eq!(currency(f64::NAN), NOT_AVAILABLE);
    }

    #[test]
    fn percent_has_one_decimal() {
        assert_eq!(percent(0.036), "3.6%");
        assert_eq!(percent(1.0), "100.0%");
        assert_eq!(percent(f64::INFINITY), NOT_AVAILABLE);
    }

    #[test]
    fn dates_use_short_month() {
        let Some(d) = Utc.with_ymd_and_hms(2025, 8, 4, 9, 5, 0).single() else {
            panic!("valid date");
        };
        assert_eq!(date(Some(&d)), "Aug 4, 2025");
        assert_eq!(date_time(Some(&d)), "Aug 4, 2025, 09:05 AM");
        assert_eq!(date(None), NOT_AVAILABLE);
    }

    #[test]
    fn capitalize_first_letter() {
        assert_eq!(capitalize("status"), "Status");
        assert_eq!(capitalize(""), "");
    }
}
