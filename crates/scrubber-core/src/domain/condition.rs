use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Title-cases a log type label: `"voice MAIL"` becomes `"Voice Mail"`.
pub fn canonical_log_type(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_alpha = false;
    for ch in raw.trim().chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogType(String);

impl LogType {
    pub fn new(raw: &str) -> Result<Self, CoreError> {
        let canonical = canonical_log_type(raw);
        if canonical.is_empty() {
            return Err(CoreError::EmptyLogType);
        }
        Ok(Self(canonical))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Phones seen at least `threshold` times under `log_type` are excluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Condition {
    pub log_type: LogType,
    pub threshold: u32,
}

impl Condition {
    pub fn new(log_type: &str, threshold: u32) -> Result<Self, CoreError> {
        let log_type = LogType::new(log_type)?;
        if threshold == 0 {
            return Err(CoreError::InvalidThreshold {
                log_type: log_type.0,
                threshold,
            });
        }
        Ok(Self {
            log_type,
            threshold,
        })
    }

    /// Parses `Voicemail=3` or `Voicemail:3`.
    pub fn parse(spec: &str) -> Result<Self, CoreError> {
        let invalid = || CoreError::InvalidConditionSpec(spec.to_string());
        let (log_type, threshold) = spec
            .rsplit_once(['=', ':'])
            .ok_or_else(invalid)?;
        let threshold: u32 = threshold.trim().parse().map_err(|_| invalid())?;
        Self::new(log_type, threshold)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.log_type, self.threshold)
    }
}

/// Non-empty, duplicate-free list of conditions. Input order is preserved and
/// decides which condition is credited when several match the same phone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionSet(Vec<Condition>);

impl ConditionSet {
    pub fn new(conditions: Vec<Condition>) -> Result<Self, CoreError> {
        if conditions.is_empty() {
            return Err(CoreError::NoConditions);
        }
        let mut seen = HashSet::new();
        for condition in &conditions {
            if !seen.insert(condition.log_type.as_str()) {
                return Err(CoreError::DuplicateCondition(
                    condition.log_type.to_string(),
                ));
            }
        }
        Ok(Self(conditions))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Condition> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a ConditionSet {
    type Item = &'a Condition;
    type IntoIter = std::slice::Iter<'a, Condition>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{canonical_log_type, Condition, ConditionSet, LogType};
    use crate::error::CoreError;

    #[test]
    fn canonical_log_type_title_cases_words() {
        assert_eq!(canonical_log_type("voicemail"), "Voicemail");
        assert_eq!(canonical_log_type("  CALL "), "Call");
        assert_eq!(canonical_log_type("voice MAIL"), "Voice Mail");
        assert_eq!(canonical_log_type("no-answer"), "No-Answer");
    }

    #[test]
    fn log_type_rejects_blank() {
        assert_eq!(LogType::new("  "), Err(CoreError::EmptyLogType));
    }

    #[test]
    fn condition_rejects_zero_threshold() {
        assert!(matches!(
            Condition::new("Call", 0),
            Err(CoreError::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn condition_parse_accepts_both_separators() {
        let condition = Condition::parse("voicemail=3").unwrap();
        assert_eq!(condition.log_type.as_str(), "Voicemail");
        assert_eq!(condition.threshold, 3);

        let condition = Condition::parse("Call: 2").unwrap();
        assert_eq!(condition.log_type.as_str(), "Call");
        assert_eq!(condition.threshold, 2);
    }

    #[test]
    fn condition_parse_rejects_garbage() {
        assert!(matches!(
            Condition::parse("Call"),
            Err(CoreError::InvalidConditionSpec(_))
        ));
        assert!(matches!(
            Condition::parse("Call=many"),
            Err(CoreError::InvalidConditionSpec(_))
        ));
        assert_eq!(Condition::parse("=2"), Err(CoreError::EmptyLogType));
    }

    #[test]
    fn condition_set_rejects_case_insensitive_duplicates() {
        let conditions = vec![
            Condition::new("Voicemail", 3).unwrap(),
            Condition::new("VOICEMAIL", 5).unwrap(),
        ];
        assert_eq!(
            ConditionSet::new(conditions),
            Err(CoreError::DuplicateCondition("Voicemail".to_string()))
        );
    }

    #[test]
    fn condition_set_rejects_empty() {
        assert_eq!(ConditionSet::new(Vec::new()), Err(CoreError::NoConditions));
    }
}
