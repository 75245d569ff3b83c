use crate::domain::table::Cell;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MIN_PHONE_DIGITS: usize = 7;
pub const MAX_PHONE_DIGITS: usize = 15;

const NATIONAL_DIGITS: usize = 10;

/// Canonicalizes a raw field into a digit-only matching key.
///
/// Returns an empty string for missing values and for text without digits.
/// A leading US country code (`1` in front of more than ten digits) is dropped.
pub fn normalize_phone(cell: &Cell) -> String {
    match cell {
        Cell::Empty => String::new(),
        Cell::Int(value) => normalize_phone_text(&value.to_string()),
        Cell::Float(value) => {
            if value.is_finite() && value.fract() == 0.0 {
                normalize_phone_text(&format!("{value:.0}"))
            } else {
                normalize_phone_text(&value.to_string())
            }
        }
        Cell::Text(value) => normalize_phone_text(value),
    }
}

pub fn normalize_phone_text(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let source = integral_literal(trimmed);
    let mut digits: String = source.chars().filter(char::is_ascii_digit).collect();

    while digits.starts_with('1') && digits.len() > NATIONAL_DIGITS {
        digits.remove(0);
    }
    digits
}

/// Spreadsheet exports turn `5551234567` into `5551234567.0` or `5.551234567E9`.
/// Such literals are reduced to their integer digits before stripping. A short
/// integer part (`555.0000`) is a dotted number, not a float artifact.
fn integral_literal(text: &str) -> std::borrow::Cow<'_, str> {
    if let Some((whole, fraction)) = text.split_once('.') {
        let whole_digits = whole.strip_prefix(['+', '-']).unwrap_or(whole);
        if whole_digits.len() >= DEFAULT_MIN_PHONE_DIGITS
            && whole_digits.chars().all(|ch| ch.is_ascii_digit())
            && fraction.chars().all(|ch| ch == '0')
        {
            return std::borrow::Cow::Borrowed(whole);
        }
    }

    if text.contains(['e', 'E']) {
        if let Ok(value) = text.parse::<f64>() {
            if value.is_finite() && value.fract() == 0.0 {
                return std::borrow::Cow::Owned(format!("{value:.0}"));
            }
        }
    }

    std::borrow::Cow::Borrowed(text)
}

/// Decides which normalized values are eligible for counting and matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhonePolicy {
    pub min_digits: usize,
}

impl Default for PhonePolicy {
    fn default() -> Self {
        Self {
            min_digits: DEFAULT_MIN_PHONE_DIGITS,
        }
    }
}

impl PhonePolicy {
    pub fn is_valid(&self, normalized: &str) -> bool {
        !normalized.is_empty() && normalized.len() >= self.min_digits
    }

    /// Normalized key for `cell`, or `None` when it is too short to be a phone.
    pub fn key(&self, cell: &Cell) -> Option<String> {
        let normalized = normalize_phone(cell);
        self.is_valid(&normalized).then_some(normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_phone, normalize_phone_text, PhonePolicy};
    use crate::domain::table::Cell;

    #[test]
    fn normalize_strips_formatting_and_country_code() {
        assert_eq!(normalize_phone_text("+1 (555) 123-4567"), "5551234567");
        assert_eq!(normalize_phone_text("15551234567"), "5551234567");
        assert_eq!(normalize_phone_text("555.123.4567"), "5551234567");
    }

    #[test]
    fn normalize_keeps_ten_digit_numbers_starting_with_one() {
        assert_eq!(normalize_phone_text("1234567890"), "1234567890");
    }

    #[test]
    fn normalize_handles_missing_and_garbage() {
        assert_eq!(normalize_phone(&Cell::Empty), "");
        assert_eq!(normalize_phone_text(""), "");
        assert_eq!(normalize_phone_text("   "), "");
        assert_eq!(normalize_phone_text("n/a"), "");
        assert_eq!(normalize_phone(&Cell::Float(f64::NAN)), "");
    }

    #[test]
    fn normalize_truncates_spreadsheet_float_artifacts() {
        assert_eq!(normalize_phone_text("5551234567.0"), "5551234567");
        assert_eq!(normalize_phone_text("15551234567.00"), "5551234567");
        assert_eq!(normalize_phone_text("5.551234567E9"), "5551234567");
        assert_eq!(normalize_phone(&Cell::Float(15551234567.0)), "5551234567");
        assert_eq!(normalize_phone(&Cell::Int(5551234567)), "5551234567");
    }

    #[test]
    fn normalize_keeps_dotted_short_groups() {
        assert_eq!(normalize_phone_text("555.0000"), "5550000");
        assert_eq!(normalize_phone_text("555.000.0000"), "5550000000");
        assert_eq!(
            PhonePolicy::default().key(&Cell::text("555.0000")),
            Some("5550000".to_string())
        );
    }

    #[test]
    fn normalize_is_idempotent() {
        let samples = [
            "+1 (555) 123-4567",
            "115551234567",
            "5551234567.0",
            "1",
            "",
            "ext. 42",
            "+44 20 7946 0958",
        ];
        for sample in samples {
            let once = normalize_phone_text(sample);
            let twice = normalize_phone_text(&once);
            assert_eq!(once, twice, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn policy_rejects_short_codes() {
        let policy = PhonePolicy::default();
        assert_eq!(policy.key(&Cell::text("611")), None);
        assert_eq!(policy.key(&Cell::text("")), None);
        assert_eq!(
            policy.key(&Cell::text("555-1234")),
            Some("5551234".to_string())
        );

        let strict = PhonePolicy { min_digits: 10 };
        assert_eq!(strict.key(&Cell::text("555-1234")), None);
    }
}
