//! Number formatting for explanation prose

/// Group the integer part with commas and keep up to three fraction digits,
/// trailing zeros trimmed: `12345.5` -> `12,345.5`.
pub fn format_grouped(value: f64) -> String {
    let negative = value < 0.0;
    let scaled = (value.abs() * 1000.0).round() as u64;
    let whole = scaled / 1000;
    let frac = scaled % 1000;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if frac > 0 {
        let frac = format!("{:03}", frac);
        grouped.push('.');
        grouped.push_str(frac.trim_end_matches('0'));
    }

    if negative && scaled > 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// `12.34` -> `12.3`
pub fn format_percent(value: f64) -> String {
    format!("{:.1}", value)
}

/// Whole degrees print without a fraction, like `28°F`
pub fn format_temperature(value: f64) -> String {
    format!("{}°F", value)
}

pub fn pluralize_days(days: i64) -> &'static str {
    if days == 1 {
        "day"
    } else {
        "days"
    }
}
