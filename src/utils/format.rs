//! Display formatting helpers.

/// Format a megabyte quantity for display: gigabytes with one decimal from
/// 1024 MB up, whole megabytes below.
pub fn format_mb(mb: f64) -> String {
    if mb >= 1024.0 {
        format!("{:.1} GB", mb / 1024.0)
    } else {
        format!("{:.0} MB", mb)
    }
}
