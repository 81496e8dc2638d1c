//! Money and file-size formatting for the status page and the dashboard.
//!
//! Amounts are carried as integer cents everywhere; formatting follows the
//! Brazilian locale (period as thousands separator, comma as decimal).

/// Format cents as a plain Brazilian Real amount, e.g. `R$ 1.234,56`.
/// Negative amounts get a leading minus sign.
pub fn format_brl(cents: i64) -> String {
    let is_negative = cents < 0;
    let abs_cents = cents.abs();
    let whole = abs_cents / 100;
    let fractional = abs_cents % 100;

    let whole_str = format_with_thousands(whole, '.');

    if is_negative {
        format!("-R$ {},{:02}", whole_str, fractional)
    } else {
        format!("R$ {},{:02}", whole_str, fractional)
    }
}

/// Format cents as a bare decimal number in currency units, e.g. `1234.56`.
/// Used where a chart or workbook cell needs a numeric value.
pub fn cents_to_units(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// Format a file size in KB with one decimal, e.g. `12.3 KB`.
pub fn format_file_size(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

/// Format a number with thousands separators.
fn format_with_thousands(n: i64, sep: char) -> String {
    if n == 0 {
        return "0".to_string();
    }

    let s = n.to_string();
    let chars: Vec<char> = s.chars().rev().collect();
    let mut result = Vec::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(sep);
        }
        result.push(*c);
    }

    result.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_amount() {
        assert_eq!(format_brl(12345), "R$ 123,45");
    }

    #[test]
    fn test_negative_amount() {
        assert_eq!(format_brl(-12345), "-R$ 123,45");
    }

    #[test]
    fn test_zero_amount() {
        assert_eq!(format_brl(0), "R$ 0,00");
    }

    #[test]
    fn test_thousands_separator() {
        assert_eq!(format_brl(123456789), "R$ 1.234.567,89");
    }

    #[test]
    fn test_cents_to_units() {
        assert_eq!(cents_to_units(12345), 123.45);
        assert_eq!(cents_to_units(-50), -0.5);
    }

    #[test]
    fn test_file_size() {
        assert_eq!(format_file_size(2048), "2.0 KB");
        assert_eq!(format_file_size(1331), "1.3 KB");
    }
}
