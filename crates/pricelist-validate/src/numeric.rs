//! Number and boolean parsing for supplier-entered text.

/// A parsed decimal with digit counts taken from the text, not the float.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedDecimal {
    pub value: f64,
    /// Integer digits without leading zeros.
    pub integer_digits: usize,
    /// Fractional digits without trailing zeros.
    pub decimal_digits: usize,
}

/// Parse `raw` with the given decimal separator (`,` or `.`).
///
/// The other separator is accepted as thousands grouping only when it groups
/// correctly (`1.234.567,5`); anything else fails.
pub fn parse_decimal(raw: &str, decimal_separator: char) -> Option<ParsedDecimal> {
    let thousands = if decimal_separator == ',' { '.' } else { ',' };
    let text = raw.trim();
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let mut parts = unsigned.split(decimal_separator);
    let integer = parts.next().unwrap_or_default();
    let fraction = parts.next();
    if parts.next().is_some() {
        return None;
    }

    let integer = if integer.contains(thousands) {
        ungroup(integer, thousands)?
    } else {
        integer.to_string()
    };
    if !integer.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let fraction = match fraction {
        Some(fraction) if fraction.is_empty() || !fraction.chars().all(|c| c.is_ascii_digit()) => {
            return None;
        }
        Some(fraction) => fraction,
        None => "",
    };
    if integer.is_empty() && fraction.is_empty() {
        return None;
    }

    let literal = format!(
        "{}{}.{}",
        if negative { "-" } else { "" },
        if integer.is_empty() { "0" } else { &integer },
        if fraction.is_empty() { "0" } else { fraction }
    );
    let value: f64 = literal.parse().ok()?;
    Some(ParsedDecimal {
        value,
        integer_digits: integer.trim_start_matches('0').len(),
        decimal_digits: fraction.trim_end_matches('0').len(),
    })
}

/// `1.234.567` with `.` grouping becomes `1234567`; misplaced groups fail.
fn ungroup(integer: &str, thousands: char) -> Option<String> {
    let mut groups = integer.split(thousands);
    let head = groups.next()?;
    if head.is_empty() || head.len() > 3 {
        return None;
    }
    let mut digits = head.to_string();
    for group in groups {
        if group.len() != 3 {
            return None;
        }
        digits.push_str(group);
    }
    Some(digits)
}

/// Whether `raw` parses with either decimal separator.
pub fn is_numeric(raw: &str) -> bool {
    parse_decimal(raw, '.').is_some() || parse_decimal(raw, ',').is_some()
}

/// Parse a number whose decimal separator is unknown.
///
/// With both separators present the last one is decimal. A single separator
/// occurring once is decimal; occurring more than once it is grouping.
pub fn parse_number(raw: &str) -> Option<f64> {
    let text = raw.trim();
    let last_dot = text.rfind('.');
    let last_comma = text.rfind(',');
    let decimal = match (last_dot, last_comma) {
        (Some(dot), Some(comma)) => {
            if dot > comma {
                '.'
            } else {
                ','
            }
        }
        (Some(_), None) if text.matches('.').count() > 1 => ',',
        (None, Some(_)) if text.matches(',').count() > 1 => '.',
        (None, Some(_)) => ',',
        _ => '.',
    };
    parse_decimal(text, decimal).map(|parsed| parsed.value)
}

pub const BOOLEAN_TRUE: &[&str] = &["1", "true", "yes", "ja", "y", "j"];
pub const BOOLEAN_FALSE: &[&str] = &["0", "false", "no", "nee", "n"];

/// Parse a boolean literal, case-insensitively.
pub fn parse_boolean(raw: &str) -> Option<bool> {
    let folded = raw.trim().to_lowercase();
    if BOOLEAN_TRUE.contains(&folded.as_str()) {
        Some(true)
    } else if BOOLEAN_FALSE.contains(&folded.as_str()) {
        Some(false)
    } else {
        None
    }
}
