//! Display helpers for integer currency amounts.

/// Short form used in lists: `$1.2b`, `$3.4m`, `$12,345`.
#[must_use]
pub fn format_compact(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let magnitude = amount.unsigned_abs();
    if magnitude >= 1_000_000_000 {
        format!("{sign}${:.1}b", magnitude as f64 / 1_000_000_000.0)
    } else if magnitude >= 1_000_000 {
        format!("{sign}${:.1}m", magnitude as f64 / 1_000_000.0)
    } else {
        format!("{sign}${}", group_thousands(magnitude))
    }
}

/// Full amount with thousands separators: `$12,345,678`.
#[must_use]
pub fn format_full(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    format!("{sign}${}", group_thousands(amount.unsigned_abs()))
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
