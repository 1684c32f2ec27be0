//! Text formatting for Key Result values and progress.
//!
//! Values are rendered with US digit grouping; the Key Result type decides
//! the unit only.

use crate::model::objective::KeyResultType;

const NUMERIC_MAX_FRACTION_DIGITS: i32 = 3;

/// Formats a Key Result value for display.
///
/// - `Currency`: `$1,235` (rounded to whole units).
/// - `Percentage`: one decimal, `4.2%`.
/// - `Numeric`: grouped, up to three fraction digits, `1,500` / `99.85`.
pub fn format_value(value: f64, kind: KeyResultType) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    match kind {
        KeyResultType::Currency => {
            let rounded = value.abs().round();
            let sign = if value < 0.0 && rounded > 0.0 { "-" } else { "" };
            format!("{sign}${}", group_thousands(&format!("{rounded:.0}")))
        }
        KeyResultType::Percentage => format!("{value:.1}%"),
        KeyResultType::Numeric => format_grouped(value, NUMERIC_MAX_FRACTION_DIGITS),
    }
}

/// Rounds a percentage to a whole-number label such as `75%`.
pub fn progress_label(progress: f64) -> String {
    format!("{}%", progress.round() as i64)
}

fn format_grouped(value: f64, max_fraction_digits: i32) -> String {
    let scale = 10f64.powi(max_fraction_digits);
    let magnitude = (value.abs() * scale).round() / scale;
    let rendered = format!("{magnitude:.prec$}", prec = max_fraction_digits as usize);
    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part.trim_end_matches('0')),
        None => (rendered.as_str(), ""),
    };

    let mut out = String::new();
    if value < 0.0 && magnitude > 0.0 {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
