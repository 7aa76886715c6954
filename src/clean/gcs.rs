//! GCS Score Extractor Module
//! Pulls the total score out of cells like "E4V5M6=15" or plain numbers.

/// Extract a Glasgow Coma Scale score. Component notation wins: the first
/// `=<digits>` group in the text is the total. Otherwise the whole cell must
/// be numeric. Total; failure yields `None`.
pub fn parse_gcs(raw: &str) -> Option<i64> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    for (pos, _) in value.match_indices('=') {
        let digits: String = value[pos + 1..]
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();
        if !digits.is_empty() {
            return digits.parse().ok();
        }
    }

    value
        .parse::<i64>()
        .ok()
        .or_else(|| value.parse::<f64>().ok().map(|score| score as i64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_notation_yields_the_total() {
        assert_eq!(parse_gcs("E4V5M6=15"), Some(15));
        assert_eq!(parse_gcs("e3v4m5=12"), Some(12));
    }

    #[test]
    fn digits_must_follow_the_equals_sign() {
        assert_eq!(parse_gcs("e3v4m5 = 12"), None);
    }

    #[test]
    fn plain_numbers_parse_directly() {
        assert_eq!(parse_gcs("7"), Some(7));
        assert_eq!(parse_gcs("7.0"), Some(7));
    }

    #[test]
    fn garbage_is_null() {
        assert_eq!(parse_gcs("bad"), None);
        assert_eq!(parse_gcs("="), None);
        assert_eq!(parse_gcs(""), None);
    }
}
