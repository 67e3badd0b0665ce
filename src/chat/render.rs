//! Shared formatting helpers for rendered replies

/// Format a count with thousands separators: 1234567 -> "1,234,567"
pub fn fmt_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format a dollar amount with separators and two decimals:
/// 1234567.5 -> "$1,234,567.50"
pub fn fmt_money(value: f64) -> String {
    let cents = format!("{:.2}", value.abs());
    let (whole, frac) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));
    let sign = if value < 0.0 { "-" } else { "" };
    let grouped = fmt_count(whole.parse::<u64>().unwrap_or(0));
    format!("{}${}.{}", sign, grouped, frac)
}

/// Format a percentage to one decimal place: 25.04 -> "25.0%"
pub fn fmt_percent(value: f64) -> String {
    format!("{:.1}%", value)
}
