//! Phone number normalisation for the login field

/// Calling code every stored number is prefixed with
pub const COUNTRY_CODE: &str = "+91";

/// Digits in a national mobile number
pub const NATIONAL_DIGITS: usize = 10;

/// Length of a complete stored number, prefix included
pub const PHONE_LENGTH: usize = COUNTRY_CODE.len() + NATIONAL_DIGITS;

/// Normalise the text of the phone field after a keystroke or paste.
///
/// `previous` is the currently stored value and `raw` the new field text.
/// A leading country code in `raw` is dropped, every non-digit is stripped
/// and the rest is stored behind [`COUNTRY_CODE`]. An empty field stores
/// an empty string. Once ten digits are stored, further input that would
/// exceed the cap is rejected and `previous` is kept; otherwise overlong
/// input (a paste) is cut to ten digits.
pub fn normalize_phone_input(previous: &str, raw: &str) -> String {
    let raw = raw.trim_start();
    let raw = raw.strip_prefix(COUNTRY_CODE).unwrap_or(raw);
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

    if digits.is_empty() {
        return String::new();
    }
    if digits.len() > NATIONAL_DIGITS {
        if is_complete(previous) {
            return previous.to_string();
        }
        return format!("{}{}", COUNTRY_CODE, &digits[..NATIONAL_DIGITS]);
    }
    format!("{}{}", COUNTRY_CODE, digits)
}

/// The stored value without the country code, as shown in the field.
pub fn national_digits(stored: &str) -> &str {
    stored.strip_prefix(COUNTRY_CODE).unwrap_or(stored)
}

/// Whether the stored value is a full number that can receive a code.
pub fn is_complete(stored: &str) -> bool {
    stored.len() == PHONE_LENGTH
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_digits(input: &str) -> String {
        let mut stored = String::new();
        let mut field = String::new();
        for c in input.chars() {
            field.push(c);
            stored = normalize_phone_input(&stored, &field);
            field = national_digits(&stored).to_string();
        }
        stored
    }

    #[test]
    fn test_typed_digit_by_digit() {
        let stored = type_digits("9876543210");
        assert_eq!(stored, "+919876543210");
        assert_eq!(stored.len(), PHONE_LENGTH);
        assert!(is_complete(&stored));
    }

    #[test]
    fn test_strips_non_digits() {
        assert_eq!(normalize_phone_input("", "98-76 54(321)"), "+91987654321");
        assert_eq!(normalize_phone_input("", "abc"), "");
        assert_eq!(normalize_phone_input("+919", ""), "");
    }

    #[test]
    fn test_drops_echoed_country_code() {
        assert_eq!(
            normalize_phone_input("", "+91 98765 43210"),
            "+919876543210"
        );
        assert_eq!(normalize_phone_input("", "+91"), "");
    }

    #[test]
    fn test_caps_digits() {
        // paste into an empty field is truncated
        assert_eq!(
            normalize_phone_input("", "987654321012345"),
            "+919876543210"
        );
        // extra keystroke into a full field is rejected
        assert_eq!(
            normalize_phone_input("+919876543210", "98765543210"),
            "+919876543210"
        );
        assert_eq!(type_digits("98765432109999"), "+919876543210");
    }

    #[test]
    fn test_prefix_and_length_invariant() {
        let inputs = [
            "",
            "0",
            "+",
            "+91",
            "91",
            "٣٤٥",
            "12345678901234567890",
            "phone: 98765",
            "+1 (555) 010-9999",
        ];
        for previous in ["", "+91987", "+919876543210"] {
            for raw in inputs {
                let stored = normalize_phone_input(previous, raw);
                assert!(stored.len() <= PHONE_LENGTH, "{:?} -> {:?}", raw, stored);
                if !stored.is_empty() {
                    assert!(stored.starts_with(COUNTRY_CODE), "{:?} -> {:?}", raw, stored);
                }
            }
        }
    }

    #[test]
    fn test_national_digits() {
        assert_eq!(national_digits("+919876543210"), "9876543210");
        assert_eq!(national_digits(""), "");
        assert!(!is_complete("+9198765"));
    }
}
