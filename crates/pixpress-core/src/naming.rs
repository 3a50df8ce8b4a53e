//! Download names and human-readable sizes for the presentation layer.

/// Suffix appended to the base name of every compressed download.
pub const OUTPUT_SUFFIX: &str = "-compressed.jpg";

/// Base used when the original name has nothing before its first dot.
const FALLBACK_BASE: &str = "compressed";

/// Download file name for a compressed copy of `original_name`.
///
/// Everything from the first `.` on is dropped, so `photo.final.png` becomes
/// `photo-compressed.jpg`. The extension is always `.jpg`.
pub fn output_file_name(original_name: &str) -> String {
    let base = original_name.split('.').next().unwrap_or_default().trim();
    let base = if base.is_empty() { FALLBACK_BASE } else { base };
    format!("{base}{OUTPUT_SUFFIX}")
}

/// Format a byte count as `Bytes`, `KB` or `MB` with two decimals.
///
/// Units step by 1024. Sizes of a gigabyte or more stay in MB.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 3] = ["Bytes", "KB", "MB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{value:.2} {}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name("cat.png"), "cat-compressed.jpg");
        assert_eq!(output_file_name("cat.jpeg"), "cat-compressed.jpg");
        assert_eq!(output_file_name("scan"), "scan-compressed.jpg");
        assert_eq!(output_file_name("beach.PNG"), "beach-compressed.jpg");
    }

    #[test]
    fn test_output_file_name_cuts_at_first_dot() {
        assert_eq!(output_file_name("trip.day1.jpg"), "trip-compressed.jpg");
    }

    #[test]
    fn test_output_file_name_fallback() {
        assert_eq!(output_file_name(""), "compressed-compressed.jpg");
        assert_eq!(output_file_name(".hidden.png"), "compressed-compressed.jpg");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 Bytes");
        assert_eq!(format_bytes(512), "512.00 Bytes");
        assert_eq!(format_bytes(1024), "1.00 KB");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.00 MB");
    }

    #[test]
    fn test_format_bytes_caps_at_mb() {
        assert_eq!(format_bytes(2 * 1024 * 1024 * 1024), "2048.00 MB");
    }
}
