//! Display formatting and colour-class lookups
//!
//! Pure helpers shared by every page view. Lookups take the wire key of
//! an enum so unknown values coming from the back office still render,
//! with a neutral default.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Placeholder shown for a missing amount
pub const MISSING_AMOUNT: &str = "--";

const NEUTRAL: &str = "bg-gray-100 text-gray-800";

/// Format an optional amount as US dollars; `None` renders as `--`.
pub fn format_currency(amount: Option<Decimal>) -> String {
    match amount {
        Some(a) => format_money(a),
        None => MISSING_AMOUNT.to_string(),
    }
}

/// `$1,250,000`, `-$1,250`, `$12.50`. Cents only appear when non-zero.
pub fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let abs = rounded.abs();
    let whole = abs.trunc();
    let cents = ((abs - whole) * Decimal::ONE_HUNDRED)
        .round()
        .to_u32()
        .unwrap_or(0);
    let digits = group_thousands(&whole.normalize().to_string());

    if cents == 0 {
        format!("{sign}${digits}")
    } else {
        format!("{sign}${digits}.{cents:02}")
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `Jan 15, 2024`; a missing date renders as an empty string.
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%b %-d, %Y").to_string())
        .unwrap_or_default()
}

pub fn format_datetime(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.format("%b %-d, %Y %H:%M").to_string())
        .unwrap_or_default()
}

/// One decimal place, e.g. `12.3%`.
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// Signed change with an explicit `+`, e.g. `+0.0125` or `-1.20%`.
pub fn format_signed(value: Decimal, dp: u32, suffix: &str) -> String {
    let v = value.round_dp(dp);
    if v.is_sign_positive() && !v.is_zero() {
        format!("+{v:.prec$}{suffix}", prec = dp as usize)
    } else {
        format!("{v:.prec$}{suffix}", prec = dp as usize)
    }
}

/// Badge classes for any workflow status key.
pub fn status_color(status: &str) -> &'static str {
    match status {
        "completed" | "resolved" | "matched" | "connected" | "active" => {
            "bg-green-100 text-green-800"
        }
        "in_progress" | "in-progress" | "running" | "fieldwork" => "bg-blue-100 text-blue-800",
        "review" | "pending" | "scheduled" | "planning" => "bg-yellow-100 text-yellow-800",
        "on_hold" | "paused" => "bg-orange-100 text-orange-800",
        "failed" | "error" | "disputed" | "open" => "bg-red-100 text-red-800",
        "not_started" | "unmatched" | "disconnected" => NEUTRAL,
        _ => NEUTRAL,
    }
}

/// Badge classes for a priority key.
pub fn priority_color(priority: &str) -> &'static str {
    match priority {
        "low" => "bg-green-100 text-green-800",
        "medium" => "bg-yellow-100 text-yellow-800",
        "high" => "bg-orange-100 text-orange-800",
        "critical" | "urgent" => "bg-red-100 text-red-800",
        _ => NEUTRAL,
    }
}

/// Text classes for a risk level key.
pub fn risk_color(risk: &str) -> &'static str {
    match risk {
        "low" => "text-green-600",
        "medium" => "text-yellow-600",
        "high" => "text-orange-600",
        "critical" => "text-red-600",
        _ => "text-gray-600",
    }
}

/// Badge classes for a finding severity key.
pub fn severity_color(severity: &str) -> &'static str {
    priority_color(severity)
}

/// Text class for a signed movement: up is green, down is red.
pub fn trend_color(change: Decimal) -> &'static str {
    if change.is_zero() {
        "text-gray-600"
    } else if change.is_sign_positive() {
        "text-green-600"
    } else {
        "text-red-600"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(Some(dec!(1250000))), "$1,250,000");
        assert_eq!(format_currency(Some(dec!(999))), "$999");
        assert_eq!(format_currency(Some(dec!(1000))), "$1,000");
        assert_eq!(format_currency(Some(dec!(0))), "$0");
    }

    #[test]
    fn currency_keeps_non_zero_cents_and_sign() {
        assert_eq!(format_money(dec!(12.5)), "$12.50");
        assert_eq!(format_money(dec!(-1250)), "-$1,250");
        assert_eq!(format_money(dec!(1234567.891)), "$1,234,567.89");
        assert_eq!(format_money(dec!(-0.001)), "$0");
    }

    #[test]
    fn missing_amount_renders_placeholder() {
        assert_eq!(format_currency(None), "--");
    }

    #[test]
    fn dates_use_short_month() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(format_date(Some(d)), "Jan 5, 2024");
        assert_eq!(format_date(None), "");
    }

    #[test]
    fn signed_values_carry_explicit_plus() {
        assert_eq!(format_signed(dec!(0.0125), 4, ""), "+0.0125");
        assert_eq!(format_signed(dec!(-1.2), 2, "%"), "-1.20%");
        assert_eq!(format_signed(dec!(0), 2, "%"), "0.00%");
    }

    #[test]
    fn percent_has_one_decimal() {
        assert_eq!(format_percent(12.345), "12.3%");
    }

    #[test]
    fn status_colors_cover_every_known_key() {
        for key in ["completed", "resolved", "matched", "connected", "active"] {
            assert_eq!(status_color(key), "bg-green-100 text-green-800", "{key}");
        }
        for key in ["in_progress", "in-progress", "running", "fieldwork"] {
            assert_eq!(status_color(key), "bg-blue-100 text-blue-800", "{key}");
        }
        for key in ["review", "pending", "scheduled", "planning"] {
            assert_eq!(status_color(key), "bg-yellow-100 text-yellow-800", "{key}");
        }
        for key in ["on_hold", "paused"] {
            assert_eq!(status_color(key), "bg-orange-100 text-orange-800", "{key}");
        }
        for key in ["failed", "error", "disputed", "open"] {
            assert_eq!(status_color(key), "bg-red-100 text-red-800", "{key}");
        }
        for key in ["not_started", "unmatched", "disconnected", "archived", ""] {
            assert_eq!(status_color(key), NEUTRAL, "{key}");
        }
    }

    #[test]
    fn priority_and_risk_colors_have_defaults() {
        assert_eq!(priority_color("low"), "bg-green-100 text-green-800");
        assert_eq!(priority_color("medium"), "bg-yellow-100 text-yellow-800");
        assert_eq!(priority_color("high"), "bg-orange-100 text-orange-800");
        assert_eq!(priority_color("critical"), "bg-red-100 text-red-800");
        assert_eq!(priority_color("whenever"), NEUTRAL);

        assert_eq!(risk_color("low"), "text-green-600");
        assert_eq!(risk_color("medium"), "text-yellow-600");
        assert_eq!(risk_color("high"), "text-orange-600");
        assert_eq!(risk_color("critical"), "text-red-600");
        assert_eq!(risk_color("unknown"), "text-gray-600");
        assert_eq!(severity_color("high"), priority_color("high"));
    }

    #[test]
    fn trend_color_follows_sign() {
        assert_eq!(trend_color(dec!(0.5)), "text-green-600");
        assert_eq!(trend_color(dec!(-0.5)), "text-red-600");
        assert_eq!(trend_color(dec!(0)), "text-gray-600");
    }
}
