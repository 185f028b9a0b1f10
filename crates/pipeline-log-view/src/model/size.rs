const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;
const GIB: u64 = 1024 * MIB;

/// Formats a byte count with binary units and two decimals.
///
/// Sizes below 1 KiB are printed as plain bytes (`"512B"`).
pub fn pretty_size(size: u64) -> String {
    if size < KIB {
        format!("{}B", size)
    } else if size < MIB {
        format!("{:.2}KiB", size as f64 / KIB as f64)
    } else if size < GIB {
        format!("{:.2}MiB", size as f64 / MIB as f64)
    } else {
        format!("{:.2}GiB", size as f64 / GIB as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_boundaries() {
        assert_eq!(pretty_size(0), "0B");
        assert_eq!(pretty_size(1023), "1023B");
        assert_eq!(pretty_size(1024), "1.00KiB");
        assert_eq!(pretty_size(1_048_576), "1.00MiB");
        assert_eq!(pretty_size(1_073_741_824), "1.00GiB");
    }

    #[test]
    fn test_two_decimal_rounding() {
        assert_eq!(pretty_size(1536), "1.50KiB");
        assert_eq!(pretty_size(153_600), "150.00KiB");
        assert_eq!(pretty_size(1_048_575), "1024.00KiB");
        assert_eq!(pretty_size(5 * GIB + GIB / 4), "5.25GiB");
    }

    #[test]
    fn test_no_thousands_separator() {
        assert_eq!(pretty_size(2048 * GIB), "2048.00GiB");
    }
}
