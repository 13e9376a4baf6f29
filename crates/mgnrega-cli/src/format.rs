/// Format a number with a fixed number of decimals.
/// Results of 1000 and above, after rounding, get thousands separators.
pub fn format_number(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }

    let fixed = format!("{:.*}", decimals, value.abs());
    // Values that round to zero never carry a sign
    let negative = value < 0.0 && fixed.bytes().any(|b| (b'1'..=b'9').contains(&b));
    let int_digits = fixed.split('.').next().map_or(0, str::len);
    let body = if int_digits > 3 {
        group_thousands(&fixed)
    } else {
        fixed
    };

    if negative {
        format!("-{}", body)
    } else {
        body
    }
}

/// Format a year-over-year change: explicit `+` for increases, plain zero
/// for no change.
pub fn format_change(diff: f64, decimals: usize) -> String {
    if diff == 0.0 {
        format!("{:.*}", decimals, 0.0)
    } else if diff > 0.0 {
        format!("+{}", format_number(diff, decimals))
    } else {
        format_number(diff, decimals)
    }
}

/// Insert commas every three digits of the integer part
fn group_thousands(fixed: &str) -> String {
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 4);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac_part {
        Some(f) => format!("{}.{}", grouped, f),
        None => grouped,
    }
}

/// Pad `s` on the left to `width` characters
pub fn pad_left(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        s.to_string()
    } else {
        format!("{}{}", " ".repeat(width - len), s)
    }
}

/// Pad `s` on the right to `width` characters
pub fn pad_right(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - len))
    }
}
