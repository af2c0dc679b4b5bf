//! Number and text formatting for display.

/// Currency prefix used by [`format_money`] callers that have no preference.
pub const DEFAULT_CURRENCY: &str = "¥";

const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format `num` with exactly `decimals` fraction digits and `,` between
/// thousands groups. Non-finite values are returned unformatted.
pub fn format_number(num: f64, decimals: usize) -> String {
    if !num.is_finite() {
        return num.to_string();
    }

    let fixed = format!("{:.*}", decimals, num.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(frac_part) = frac_part {
        grouped.push('.');
        grouped.push_str(frac_part);
    }

    let is_zero = fixed.chars().all(|c| c == '0' || c == '.');
    if num.is_sign_negative() && !is_zero {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// `currency` followed by `amount` with two decimals, e.g. `¥1,234.50`.
pub fn format_money(amount: f64, currency: &str) -> String {
    format!("{}{}", currency, format_number(amount, 2))
}

/// Ratio as a percentage: `0.256` with one decimal is `25.6%`.
pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, value * 100.0)
}

/// Human-readable byte count in 1024-based units, up to two decimals with
/// trailing zeros dropped.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut unit = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let fixed = format!("{:.2}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, SIZE_UNITS[unit])
}

/// Cut `text` to at most `max_length` characters, ending with `suffix`
/// when anything was removed. Lengths count chars, not bytes.
pub fn truncate(text: &str, max_length: usize, suffix: &str) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }

    let keep = max_length.saturating_sub(suffix.chars().count());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(suffix);
    out
}
