//! Number formatting for the text reports.
//!
//! All rates and shares printed to stdout go through this module so the
//! ability and damage reports stay consistent with each other.

/// Format a rate (per second, per hour) with two decimal places.
///
/// # Examples
/// ```
/// use eqlog_types::formatting::format_rate;
/// assert_eq!(format_rate(12.345), "12.35");
/// assert_eq!(format_rate(0.0), "0.00");
/// ```
pub fn format_rate(n: f64) -> String {
    format!("{:.2}", n)
}

/// Format a percentage value with no decimal places.
///
/// # Examples
/// ```
/// use eqlog_types::formatting::format_pct_whole;
/// assert_eq!(format_pct_whole(42.7), "43%");
/// assert_eq!(format_pct_whole(100.0), "100%");
/// ```
pub fn format_pct_whole(n: f64) -> String {
    format!("{:.0}%", n)
}

/// Share of `part` in `total` as a percentage. Zero when `total` is zero.
///
/// # Examples
/// ```
/// use eqlog_types::formatting::pct_of;
/// assert_eq!(pct_of(1, 4), 25.0);
/// assert_eq!(pct_of(5, 0), 0.0);
/// ```
pub fn pct_of(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 / total as f64 * 100.0
}

/// Format the melee/direct/dot split of a damage total.
///
/// Each share is listed only when it is non-zero, comma separated.
///
/// # Examples
/// ```
/// use eqlog_types::formatting::format_origin_breakdown;
/// assert_eq!(format_origin_breakdown(60, 0, 40), "60% melee, 40% dot");
/// assert_eq!(format_origin_breakdown(0, 10, 0), "100% direct");
/// assert_eq!(format_origin_breakdown(0, 0, 0), "");
/// ```
pub fn format_origin_breakdown(melee: u64, direct: u64, dot: u64) -> String {
    let total = melee + direct + dot;
    [(melee, "melee"), (direct, "direct"), (dot, "dot")]
        .into_iter()
        .filter(|(amount, _)| *amount > 0)
        .map(|(amount, label)| format!("{} {}", format_pct_whole(pct_of(amount, total)), label))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Format a duration in seconds as minutes with two decimal places.
///
/// # Examples
/// ```
/// use eqlog_types::formatting::format_minutes;
/// assert_eq!(format_minutes(90.0), "1.50");
/// ```
pub fn format_minutes(secs: f64) -> String {
    format_rate(secs / 60.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(0.0), "0.00");
        assert_eq!(format_rate(1.0 / 3.0), "0.33");
        assert_eq!(format_rate(1_500.5), "1500.50");
    }

    #[test]
    fn test_format_pct_whole() {
        assert_eq!(format_pct_whole(0.4), "0%");
        assert_eq!(format_pct_whole(33.333), "33%");
        assert_eq!(format_pct_whole(66.666), "67%");
    }

    #[test]
    fn test_origin_breakdown_skips_empty_shares() {
        assert_eq!(format_origin_breakdown(50, 50, 0), "50% melee, 50% direct");
        assert_eq!(format_origin_breakdown(0, 1, 3), "25% direct, 75% dot");
        assert_eq!(format_origin_breakdown(7, 0, 0), "100% melee");
    }

    #[test]
    fn test_origin_breakdown_tiny_share_still_listed() {
        assert_eq!(format_origin_breakdown(999, 0, 1), "100% melee, 0% dot");
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(0.0), "0.00");
        assert_eq!(format_minutes(30.0), "0.50");
    }
}
