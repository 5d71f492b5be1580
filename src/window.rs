use chrono::{Duration, NaiveDate};

#[derive(Debug, Clone, Copy)]
pub struct WindowConfig {
    pub days: i64,
    pub min_avg_cpd: i64,
}

pub const WINDOW_3D: WindowConfig = WindowConfig { days: 3, min_avg_cpd: 500 };
pub const WINDOW_7D: WindowConfig = WindowConfig { days: 7, min_avg_cpd: 600 };
pub const WINDOW_30D: WindowConfig = WindowConfig { days: 30, min_avg_cpd: 550 };

// Trailing window of `days` calendar days ending at `end`, inclusive on both ends.
pub fn in_range(date: NaiveDate, end: NaiveDate, days: i64) -> bool {
    let start = end - Duration::days(days - 1);
    date >= start && date <= end
}

// Empty input averages to 0, so downstream code treats "no data" and
// "all-zero data" identically.
pub fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn window_includes_both_boundaries() {
        let end = day(2025, 9, 2);
        assert!(in_range(day(2025, 9, 2), end, 7));
        assert!(in_range(day(2025, 8, 27), end, 7));
    }

    #[test]
    fn window_excludes_one_day_outside() {
        let end = day(2025, 9, 2);
        assert!(!in_range(day(2025, 8, 26), end, 7));
        assert!(!in_range(day(2025, 9, 3), end, 7));
    }

    #[test]
    fn one_day_window_is_exactly_the_end_date() {
        let end = day(2025, 9, 2);
        assert!(in_range(end, end, 1));
        assert!(!in_range(day(2025, 9, 1), end, 1));
    }

    #[test]
    fn average_of_empty_slice_is_zero() {
        assert_eq!(average(&[]), 0.0);
    }

    #[test]
    fn average_is_arithmetic_mean() {
        assert_eq!(average(&[600.0, 700.0]), 650.0);
        assert_eq!(average(&[0.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn thresholds_match_requirements() {
        assert_eq!(WINDOW_3D.min_avg_cpd, 500);
        assert_eq!(WINDOW_7D.min_avg_cpd, 600);
        assert_eq!(WINDOW_30D.min_avg_cpd, 550);
    }
}
