//! Lenient parsing of human-written numbers.
//!
//! Chilean sources and users write thousands with dots ("900.000") while
//! spreadsheets exported elsewhere use commas ("900,000"); both must parse to
//! the same value, and a lone separator followed by something other than
//! three digits is a decimal mark ("2,5 millones").

/// Parses a number tolerant of comma- or dot-grouped thousands.
///
/// Currency symbols, letters and spaces around the digits are ignored.
/// Returns `None` when no digit is present or the result is not finite.
pub fn parse_grouped_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',' || *c == '-')
        .collect();
    let cleaned = cleaned.trim_matches(|c| c == '.' || c == ',');
    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let dots = cleaned.matches('.').count();
    let commas = cleaned.matches(',').count();

    let canonical = match (dots, commas) {
        (0, 0) => cleaned.to_string(),
        (_, 0) => resolve_single_separator(cleaned, '.', dots),
        (0, _) => resolve_single_separator(cleaned, ',', commas),
        _ => {
            // Both present: whichever comes last is the decimal mark.
            let last_dot = cleaned.rfind('.').unwrap_or(0);
            let last_comma = cleaned.rfind(',').unwrap_or(0);
            if last_comma > last_dot {
                cleaned.replace('.', "").replace(',', ".")
            } else {
                cleaned.replace(',', "")
            }
        }
    };

    canonical.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn resolve_single_separator(s: &str, sep: char, count: usize) -> String {
    if count > 1 {
        return s.replace(sep, "");
    }
    let digits_after = s
        .rsplit(sep)
        .next()
        .map(|tail| tail.chars().filter(|c| c.is_ascii_digit()).count())
        .unwrap_or(0);
    if digits_after == 3 {
        s.replace(sep, "")
    } else {
        s.replace(sep, ".")
    }
}
