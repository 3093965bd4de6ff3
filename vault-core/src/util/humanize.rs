//! src/util/humanize.rs

const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Base-1024 size with at most two decimals and no trailing zeros.
/// Anything past gigabytes stays in GB.
#[must_use]
pub fn format_file_size(size: u64) -> String {
    if size == 0 {
        return "0 Bytes".to_string();
    }

    let mut size_f: f64 = size as f64;
    let mut unit_idx: usize = 0;

    while size_f >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size_f /= 1024.0;
        unit_idx += 1;
    }

    let rounded = (size_f * 100.0).round() / 100.0;
    // `{}` on f64 already drops trailing zeros ("1.5", "2")
    format!("{} {}", rounded, UNITS[unit_idx])
}

/// Share of `limit` taken by `used`, in percent. Zero limit reads as 0%.
#[must_use]
pub fn percent_of(used: u64, limit: u64) -> f64 {
    if limit == 0 {
        return 0.0;
    }
    used as f64 / limit as f64 * 100.0
}
