/// Format a duration in seconds as a human-readable string.
///
/// * `< 60` seconds → `"42.0s"`
/// * `< 3600` seconds → `"12.5m"`
/// * otherwise → `"1.25h"`
///
/// The unit flips exactly at 60 s and 3600 s.
///
/// # Examples
///
/// ```
/// use aw_core::formatting::format_duration;
///
/// assert_eq!(format_duration(30.5), "30.5s");
/// assert_eq!(format_duration(150.0), "2.5m");
/// assert_eq!(format_duration(3599.0), "60.0m");
/// assert_eq!(format_duration(3600.0), "1.00h");
/// ```
pub fn format_duration(seconds: f64) -> String {
    if seconds < 60.0 {
        format!("{:.1}s", seconds)
    } else if seconds < 3600.0 {
        format!("{:.1}m", seconds / 60.0)
    } else {
        format!("{:.2}h", seconds / 3600.0)
    }
}
