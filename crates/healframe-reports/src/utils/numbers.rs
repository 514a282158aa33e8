const UNITS: [(usize, &str); 3] = [(1_000_000_000, "B"), (1_000_000, "M"), (1_000, "K")];

/// Short human form of a count: `4.5K`, `2.3M`. Small counts are printed as is.
pub fn format_numbers(n: usize) -> String {
    UNITS
        .iter()
        .find(|(scale, _)| n >= *scale)
        .map(|(scale, suffix)| format!("{:.1}{}", n as f64 / *scale as f64, suffix))
        .unwrap_or_else(|| n.to_string())
}

/// Percentage with two decimals, `-` when there was nothing to measure.
pub fn format_percent(value: f64, total: usize) -> String {
    if total == 0 {
        "-".to_string()
    } else {
        format!("{:.2}%", value)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_format_billions() {
        assert_eq!(format_numbers(2_736_123_123), "2.7B");
    }

    #[test]
    fn test_format_millions() {
        assert_eq!(format_numbers(2_336_123), "2.3M");
    }

    #[test]
    fn test_format_thousands_boundary() {
        assert_eq!(format_numbers(1_000), "1.0K");
        assert_eq!(format_numbers(4_536), "4.5K");
    }

    #[test]
    fn test_format_small() {
        assert_eq!(format_numbers(999), "999");
        assert_eq!(format_numbers(0), "0");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(20.0, 5), "20.00%");
        assert_eq!(format_percent(0.0, 0), "-");
    }
}
