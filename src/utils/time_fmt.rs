// src/utils/time_fmt.rs

/// Formats whole seconds as `H:MM:SS`, e.g. `0:02:05` or `1:00:00`.
/// Fractions are truncated and negative input is treated as zero.
#[must_use]
pub fn format_elapsed(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    format!("{}:{:02}:{:02}", h, m, s)
}
