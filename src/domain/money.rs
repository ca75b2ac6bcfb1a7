use thiserror::Error;

/// Amounts are stored as integer cents so that sums stay exact.
/// "12.50" is kept as 1250.
pub type Cents = i64;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseCentsError {
    #[error("amount is empty")]
    Empty,

    #[error("invalid amount format: {0}")]
    InvalidFormat(String),

    #[error("amount has more than two decimal places: {0}")]
    TooPrecise(String),
}

/// Render cents as a decimal string, e.g. 1250 -> "12.50", -5 -> "-0.05".
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// Parse a decimal string into cents.
///
/// Accepts "12", "12.5", "12.50", ".5" and a leading minus sign.
/// Anything finer than a cent is rejected rather than silently truncated.
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ParseCentsError::Empty);
    }

    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let invalid = || ParseCentsError::InvalidFormat(trimmed.to_string());

    let (units_str, fraction_str) = match digits.split_once('.') {
        Some((units, fraction)) => (units, fraction),
        None => (digits, ""),
    };

    if units_str.is_empty() && fraction_str.is_empty() {
        return Err(invalid());
    }
    if !units_str.chars().all(|c| c.is_ascii_digit())
        || !fraction_str.chars().all(|c| c.is_ascii_digit())
    {
        return Err(invalid());
    }
    if fraction_str.len() > 2 {
        return Err(ParseCentsError::TooPrecise(trimmed.to_string()));
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str.parse().map_err(|_| invalid())?
    };
    let fraction: i64 = match fraction_str.len() {
        0 => 0,
        1 => fraction_str.parse::<i64>().map_err(|_| invalid())? * 10,
        _ => fraction_str.parse().map_err(|_| invalid())?,
    };

    let cents = units
        .checked_mul(100)
        .and_then(|c| c.checked_add(fraction))
        .ok_or_else(invalid)?;

    Ok(if negative { -cents } else { cents })
}
