/// Parse the leading number of `input`, ignoring anything after it.
///
/// `"3.5h"` → 3.5, `" 8 "` → 8, `"-2"` → -2, `"abc"` → None. A comma is
/// accepted as the decimal separator.
pub fn parse_lenient(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (i, c) in trimmed.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' | ',' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }
    if !seen_digit {
        return None;
    }
    let number = trimmed[..end].trim_end_matches(['.', ',']).replace(',', ".");
    number.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Render a numeric field without a trailing `.0` for whole numbers.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_numbers() {
        assert_eq!(parse_lenient("5"), Some(5.0));
        assert_eq!(parse_lenient(" 2.5 "), Some(2.5));
        assert_eq!(parse_lenient("-1"), Some(-1.0));
        assert_eq!(parse_lenient("3,5"), Some(3.5));
    }

    #[test]
    fn ignores_trailing_text() {
        assert_eq!(parse_lenient("8h"), Some(8.0));
        assert_eq!(parse_lenient("1.5 days"), Some(1.5));
        assert_eq!(parse_lenient("4."), Some(4.0));
    }

    #[test]
    fn rejects_non_numeric() {
        assert_eq!(parse_lenient(""), None);
        assert_eq!(parse_lenient("abc"), None);
        assert_eq!(parse_lenient("-"), None);
        assert_eq!(parse_lenient("."), None);
    }

    #[test]
    fn formats_whole_and_fractional() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(2.5), "2.5");
    }
}
