use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("{dataset}: missing required column {column:?}")]
    MissingColumn { dataset: String, column: String },
    #[error("{dataset}: row {row} has {found} fields but the header has {expected}")]
    RaggedRow {
        dataset: String,
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("log type is required")]
    EmptyLogType,
    #[error("invalid threshold for {log_type}: {threshold}")]
    InvalidThreshold { log_type: String, threshold: u32 },
    #[error("duplicate condition for log type {0}")]
    DuplicateCondition(String),
    #[error("at least one condition is required")]
    NoConditions,
    #[error("invalid condition {0:?}: expected TYPE=THRESHOLD")]
    InvalidConditionSpec(String),
}
