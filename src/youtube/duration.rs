//! Compact ISO 8601 durations as returned in `contentDetails.duration`.

use once_cell::sync::Lazy;
use regex::Regex;

static DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)(?:\.\d+)?S)?)?$")
        .expect("static duration pattern")
});

/// Parse a `PT#H#M#S` duration into whole seconds.
///
/// Any component may be omitted and counts as zero. A leading day component
/// (`P1DT2H`) is accepted; fractional seconds are truncated. Unparseable
/// input yields 0.
pub fn parse_duration(duration: &str) -> u64 {
    let Some(captures) = DURATION.captures(duration.trim()) else {
        return 0;
    };

    let component = |index: usize| -> u64 {
        captures
            .get(index)
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(0)
    };

    component(1)
        .saturating_mul(86_400)
        .saturating_add(component(2).saturating_mul(3_600))
        .saturating_add(component(3).saturating_mul(60))
        .saturating_add(component(4))
}

/// Format seconds as `H:MM:SS` or `M:SS`
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_duration() {
        assert_eq!(parse_duration("PT1H2M3S"), 3723);
    }

    #[test]
    fn test_omitted_components() {
        let cases = [
            (Some(2), None, None),
            (None, Some(15), None),
            (None, None, Some(42)),
            (Some(1), None, Some(5)),
            (None, Some(4), Some(13)),
            (Some(3), Some(59), None),
        ];

        for (hours, minutes, seconds) in cases {
            let mut text = String::from("PT");
            if let Some(h) = hours {
                text.push_str(&format!("{}H", h));
            }
            if let Some(m) = minutes {
                text.push_str(&format!("{}M", m));
            }
            if let Some(s) = seconds {
                text.push_str(&format!("{}S", s));
            }

            let expected =
                hours.unwrap_or(0) * 3600 + minutes.unwrap_or(0) * 60 + seconds.unwrap_or(0);
            assert_eq!(parse_duration(&text), expected, "duration {}", text);
        }
    }

    #[test]
    fn test_all_absent_is_zero() {
        assert_eq!(parse_duration("PT"), 0);
        assert_eq!(parse_duration("P0D"), 0);
    }

    #[test]
    fn test_days_and_fractions() {
        assert_eq!(parse_duration("P1DT2H"), 93_600);
        assert_eq!(parse_duration("PT10.5S"), 10);
    }

    #[test]
    fn test_huge_components_saturate() {
        assert_eq!(parse_duration("P300000000000000D"), u64::MAX);
        assert_eq!(parse_duration("PT18446744073709551615S"), u64::MAX);
        assert_eq!(parse_duration("PT99999999999999999H1S"), u64::MAX);
    }

    #[test]
    fn test_garbage_is_zero() {
        assert_eq!(parse_duration(""), 0);
        assert_eq!(parse_duration("1:02:03"), 0);
        assert_eq!(parse_duration("PTXM"), 0);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(3723), "1:02:03");
        assert_eq!(format_duration(65), "1:05");
        assert_eq!(format_duration(0), "0:00");
    }
}
