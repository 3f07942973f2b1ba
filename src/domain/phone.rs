//! Phone number normalization
//!
//! Turns free-form user input into the canonical digit string used for
//! dialing plus a display form for humans. Inputs that don't look like a
//! North American number pass through as stripped digits instead of being
//! rejected.

use serde::{Deserialize, Serialize};

use super::shared::DomainError;

/// Country code prepended to bare 10-digit numbers
pub const DEFAULT_COUNTRY_CODE: char = '1';

const NATIONAL_NUMBER_LEN: usize = 10;

/// Canonical and display forms of a phone number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedPhone {
    /// Country-code-prefixed digits, e.g. `18778406250`
    pub canonical: String,
    /// `(877) 840-6250`, or the raw input when it can't be formatted
    pub display: String,
}

impl NormalizedPhone {
    /// Normalize a raw phone string
    pub fn parse(raw: &str) -> Self {
        let canonical = canonicalize(raw);
        let display = format_display(&canonical).unwrap_or_else(|| raw.to_string());

        Self { canonical, display }
    }

    /// `true` when there is at least one digit to dial
    pub fn is_dialable(&self) -> bool {
        !self.canonical.is_empty()
    }

    /// Reports input that yielded nothing dialable
    pub fn check_dialable(&self, raw: &str) -> Result<(), DomainError> {
        if self.is_dialable() {
            Ok(())
        } else {
            Err(DomainError::MalformedInput(format!(
                "no dialable digits in phone number {:?}",
                raw
            )))
        }
    }
}

/// Strip everything but digits and apply the country-code rules.
pub fn canonicalize(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    match digits.len() {
        NATIONAL_NUMBER_LEN => format!("{}{}", DEFAULT_COUNTRY_CODE, digits),
        // 11 digits with a leading country code, and any other length, are
        // used as-is
        _ => digits,
    }
}

/// `(AAA) EEE-NNNN` from the last ten digits.
pub fn format_display(canonical: &str) -> Option<String> {
    if canonical.len() < NATIONAL_NUMBER_LEN || !canonical.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let national = &canonical[canonical.len() - NATIONAL_NUMBER_LEN..];
    Some(format!(
        "({}) {}-{}",
        &national[0..3],
        &national[3..6],
        &national[6..10]
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toll_free_example() {
        let phone = NormalizedPhone::parse("(877) 840-6250");
        assert_eq!(phone.canonical, "18778406250");
        assert_eq!(phone.display, "(877) 840-6250");
    }

    #[test]
    fn test_punctuation_variants_share_canonical_form() {
        let inputs = [
            "9547939065",
            "954-793-9065",
            "(954) 793-9065",
            "954.793.9065",
            " 954 793 9065 ",
            "19547939065",
            "+1 (954) 793-9065",
            "1-954-793-9065",
        ];

        for input in inputs {
            assert_eq!(
                NormalizedPhone::parse(input).canonical,
                "19547939065",
                "input {:?}",
                input
            );
        }
    }

    #[test]
    fn test_normalization_is_idempotent() {
        for input in ["(877) 840-6250", "18778406250", "+44 20 7946 0958", "12345"] {
            let once = NormalizedPhone::parse(input);
            let twice = NormalizedPhone::parse(&once.canonical);
            assert_eq!(once.canonical, twice.canonical, "input {:?}", input);
        }
    }

    #[test]
    fn test_other_lengths_pass_through() {
        let international = NormalizedPhone::parse("+44 20 7946 0958");
        assert_eq!(international.canonical, "442079460958");
        assert_eq!(international.display, "(207) 946-0958");

        // 11 digits without a leading 1 stay untouched
        let odd = NormalizedPhone::parse("29547939065");
        assert_eq!(odd.canonical, "29547939065");
    }

    #[test]
    fn test_short_input_keeps_raw_display() {
        let phone = NormalizedPhone::parse("ext. 123");
        assert_eq!(phone.canonical, "123");
        assert_eq!(phone.display, "ext. 123");
        assert!(phone.is_dialable());
    }

    #[test]
    fn test_empty_input_is_not_dialable() {
        let phone = NormalizedPhone::parse("call me");
        assert_eq!(phone.canonical, "");
        assert_eq!(phone.display, "call me");
        assert!(!phone.is_dialable());
        assert!(matches!(
            phone.check_dialable("call me"),
            Err(DomainError::MalformedInput(_))
        ));
    }
}
