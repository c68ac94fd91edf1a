//! Price text normalization.
//!
//! Turns storefront price strings such as `₹1,299` into integers. Absence is
//! the only failure signal so one malformed field never aborts a batch.

/// Extract the digits of `text` as a non-negative integer.
///
/// Every non-digit character is dropped, so currency symbols, thousands
/// separators and labels disappear and the remaining digits are read in
/// order. Returns `None` when no digit remains (including the `N/A`
/// sentinel) or when the digits overflow `u64`.
pub fn normalize_price(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rupee_with_separator() {
        assert_eq!(normalize_price("₹1,299"), Some(1299));
    }

    #[test]
    fn test_short_price() {
        assert_eq!(normalize_price("₹45"), Some(45));
    }

    #[test]
    fn test_sentinel_is_absent() {
        assert_eq!(normalize_price("N/A"), None);
    }

    #[test]
    fn test_non_digit_texts_are_absent() {
        for text in ["", "   ", "₹", "Price unavailable", "--", "₹,.", "not available"] {
            assert_eq!(normalize_price(text), None, "{text:?}");
        }
    }

    #[test]
    fn test_arbitrary_separators_concatenate() {
        assert_eq!(normalize_price("₹ 1 00 000"), Some(100_000));
        assert_eq!(normalize_price("Rs.2.499"), Some(2499));
        assert_eq!(normalize_price("$12,34,567"), Some(1_234_567));
    }

    #[test]
    fn test_genuine_zero() {
        assert_eq!(normalize_price("₹0"), Some(0));
    }

    #[test]
    fn test_ten_digit_price() {
        assert_eq!(normalize_price("₹9,999,999,999"), Some(9_999_999_999));
    }

    #[test]
    fn test_overflow_is_absent() {
        assert_eq!(normalize_price("99999999999999999999999"), None);
    }

    #[test]
    fn test_non_ascii_digits_ignored() {
        assert_eq!(normalize_price("₹١٢٣"), None);
    }
}
