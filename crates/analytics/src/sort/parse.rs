//! Magnitude parsing for string-valued sort columns

const SECONDS_PER_MINUTE: f64 = 60.0;
const SECONDS_PER_HOUR: f64 = 3_600.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Total seconds of a duration string like `2d 3h`, `5m 10s` or `45s`
///
/// Only the units present contribute. Unknown units are ignored and an
/// unparseable string reads as 0.
pub fn parse_duration(s: &str) -> f64 {
    let mut total = 0.0;
    let mut number = String::new();

    for ch in s.chars() {
        if ch.is_ascii_digit() || ch == '.' {
            number.push(ch);
            continue;
        }

        let unit = match ch.to_ascii_lowercase() {
            'd' => SECONDS_PER_DAY,
            'h' => SECONDS_PER_HOUR,
            'm' => SECONDS_PER_MINUTE,
            's' => 1.0,
            _ => {
                if !ch.is_whitespace() {
                    number.clear();
                }
                continue;
            }
        };

        if let Ok(value) = number.parse::<f64>() {
            total += value * unit;
        }
        number.clear();
    }

    total
}

/// Representative magnitude of a range label like `10-50`, `100+` or `1.2M`
///
/// Ranges use their upper bound. `,`, `$` and letters are stripped; a
/// trailing `M` multiplies by 1e6 and `B` by 1e9; a trailing `+` adds 1.
/// Unparseable input reads as 0.
pub fn parse_range_numeric(s: &str) -> f64 {
    let trimmed = s.trim();
    let upper = match trimmed.get(1..).and_then(|rest| rest.rfind('-')) {
        Some(pos) => &trimmed[pos + 2..],
        None => trimmed,
    };

    let upper = upper.trim();
    let plus = upper.ends_with('+');
    let body = upper.trim_end_matches('+').trim_end();

    let multiplier = match body.chars().last().map(|c| c.to_ascii_uppercase()) {
        Some('M') => 1e6,
        Some('B') => 1e9,
        _ => 1.0,
    };

    let digits: String = body
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    match digits.parse::<f64>() {
        Ok(value) => value * multiplier + if plus { 1.0 } else { 0.0 },
        Err(_) => 0.0,
    }
}
