use crate::error::invalid_input;
use anyhow::{Context as _, Result};
use chrono::{Local, NaiveDate};
use scrubber_config::AppConfig;
use scrubber_core::domain::{Condition, ConditionSet};

pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

pub fn parse_run_date(raw: Option<&str>) -> Result<NaiveDate> {
    let Some(raw) = raw else {
        return Ok(today_local());
    };
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| invalid_input(format!("invalid date {raw:?}: expected YYYY-MM-DD")))
}

/// Conditions given on the command line replace the configured ones.
pub fn resolve_conditions(specs: &[String], config: &AppConfig) -> Result<ConditionSet> {
    if specs.is_empty() {
        return match config.condition_set() {
            Some(set) => set.with_context(|| "configured conditions"),
            None => Err(invalid_input(
                "no conditions given: pass --condition TYPE=N or add [[conditions]] to the config",
            )),
        };
    }

    let conditions = specs
        .iter()
        .map(|spec| Condition::parse(spec).with_context(|| format!("parse condition {spec:?}")))
        .collect::<Result<Vec<_>>>()?;
    ConditionSet::new(conditions).with_context(|| "build condition set")
}

#[cfg(test)]
mod tests {
    use super::{parse_run_date, resolve_conditions};
    use chrono::NaiveDate;
    use scrubber_config::AppConfig;
    use scrubber_core::domain::Condition;

    #[test]
    fn parse_run_date_accepts_iso_dates() {
        assert_eq!(
            parse_run_date(Some(" 2026-10-15 ")).expect("date"),
            NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
        );
        assert!(parse_run_date(Some("10/15/2026")).is_err());
    }

    #[test]
    fn command_line_conditions_replace_configured_ones() {
        let config = AppConfig {
            conditions: vec![Condition::new("Call", 5).unwrap()],
            ..AppConfig::default()
        };
        let set = resolve_conditions(&["voicemail=3".to_string()], &config).expect("set");
        let types: Vec<&str> = set.iter().map(|c| c.log_type.as_str()).collect();
        assert_eq!(types, vec!["Voicemail"]);

        let set = resolve_conditions(&[], &config).expect("configured");
        assert_eq!(set.iter().next().map(|c| c.threshold), Some(5));
    }

    #[test]
    fn missing_or_duplicate_conditions_are_rejected() {
        assert!(resolve_conditions(&[], &AppConfig::default()).is_err());
        let specs = vec!["Call=1".to_string(), "call=2".to_string()];
        assert!(resolve_conditions(&specs, &AppConfig::default()).is_err());
    }
}
