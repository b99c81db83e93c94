// Deal value parsing and formatting. Amounts are stored as integer cents.

use anyhow::Result;

/// Parse an amount into cents
///
/// Accepts plain or decimal numbers, an optional `$` prefix,
/// `,` thousands separators, and `k`/`m` suffixes: `5000`, `12.50`,
/// `$1,200`, `5k`, `1.5m`.
pub fn parse_money(expr: &str) -> Result<i64> {
    let trimmed = expr.trim();
    let cleaned: String = trimmed
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();
    let lower = cleaned.to_lowercase();

    let (number, multiplier) = if let Some(n) = lower.strip_suffix('k') {
        (n, 1_000i64)
    } else if let Some(n) = lower.strip_suffix('m') {
        (n, 1_000_000i64)
    } else {
        (lower.as_str(), 1i64)
    };

    if number.is_empty() || number.starts_with('-') {
        anyhow::bail!("Invalid amount '{}'. Use a non-negative number like 5000, 12.50 or 5k.", expr);
    }

    let (whole, frac) = match number.split_once('.') {
        Some((w, f)) => (w, f),
        None => (number, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        anyhow::bail!("Invalid amount '{}'. Use a non-negative number like 5000, 12.50 or 5k.", expr);
    }
    let valid_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !valid_digits(whole) || !valid_digits(frac) || frac.len() > 6 {
        anyhow::bail!("Invalid amount '{}'. Use a non-negative number like 5000, 12.50 or 5k.", expr);
    }

    let whole_value: i64 = if whole.is_empty() {
        0
    } else {
        whole
            .parse()
            .map_err(|_| anyhow::anyhow!("Amount '{}' is too large", expr))?
    };

    // Scale the fractional part to millionths so k/m suffixes keep their precision
    let frac_millionths: i64 = format!("{:0<6}", frac).parse().unwrap_or(0);

    let cents = whole_value
        .checked_mul(multiplier)
        .and_then(|v| v.checked_mul(100))
        .and_then(|v| v.checked_add(frac_millionths * multiplier / 10_000))
        .ok_or_else(|| anyhow::anyhow!("Amount '{}' is too large", expr))?;

    Ok(cents)
}

/// Format cents for display: `$1,234` or `$1,234.50`
pub fn format_money(cents: i64) -> String {
    let negative = cents < 0;
    let abs = cents.unsigned_abs();
    let whole = abs / 100;
    let frac = abs % 100;

    let digits = whole.to_string();
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    if frac == 0 {
        format!("{}${}", sign, grouped)
    } else {
        format!("{}${}.{:02}", sign, grouped, frac)
    }
}

/// Compact display for narrow board columns: `$950`, `$12.5k`, `$1.2m`
pub fn format_money_short(cents: i64) -> String {
    let dollars = cents as f64 / 100.0;
    if dollars.abs() >= 1_000_000.0 {
        format!("${:.1}m", dollars / 1_000_000.0)
    } else if dollars.abs() >= 1_000.0 {
        format!("${:.1}k", dollars / 1_000.0)
    } else {
        format!("${:.0}", dollars)
    }
}
