pub mod columns;
pub mod condition;
pub mod phone;
pub mod table;

pub use columns::{
    classify_phone_columns, default_phone_keywords, PhoneColumn, PhoneColumns,
    DEFAULT_PHONE_KEYWORDS,
};
pub use condition::{canonical_log_type, Condition, ConditionSet, LogType};
pub use phone::{
    normalize_phone, normalize_phone_text, PhonePolicy, DEFAULT_MIN_PHONE_DIGITS,
    MAX_PHONE_DIGITS,
};
pub use table::{Cell, Row, Table};
