//! Display formatting shared by the controller and terminal surfaces.

/// `"42.3%"`.
pub fn percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// Whole megabytes, e.g. `"2048 MB"`.
pub fn megabytes(value: f64) -> String {
    format!("{value:.0} MB")
}

/// Gigabytes with two decimals, e.g. `"12.50 GB"`.
pub fn gigabytes(value: f64) -> String {
    format!("{value:.2} GB")
}

/// Throughput in MB/s with two decimals.
pub fn rate(mb_per_sec: f64) -> String {
    format!("{mb_per_sec:.2} MB/s")
}

/// Convert a byte count to MB (1024²).
pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

/// Convert a byte count to GB (1024³).
pub fn bytes_to_gb(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0 * 1024.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_one_decimal() {
        assert_eq!(percent(42.0), "42.0%");
        assert_eq!(percent(0.04), "0.0%");
    }

    #[test]
    fn sizes_and_rates() {
        assert_eq!(megabytes(2047.6), "2048 MB");
        assert_eq!(gigabytes(12.5), "12.50 GB");
        assert_eq!(rate(0.126), "0.13 MB/s");
    }

    #[test]
    fn byte_conversions() {
        assert_eq!(bytes_to_mb(512 * 1024 * 1024), 512.0);
        assert_eq!(bytes_to_gb(8 * 1024 * 1024 * 1024), 8.0);
        assert_eq!(bytes_to_mb(0), 0.0);
    }
}
