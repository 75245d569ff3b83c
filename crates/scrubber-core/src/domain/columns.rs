use serde::Serialize;

pub const DEFAULT_PHONE_KEYWORDS: [&str; 9] = [
    "mobile", "phone", "number", "tel", "contact", "ph", "landline", "voip", "cell",
];

pub fn default_phone_keywords() -> Vec<String> {
    DEFAULT_PHONE_KEYWORDS
        .iter()
        .map(|keyword| keyword.to_string())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhoneColumn {
    pub index: usize,
    pub name: String,
}

/// Result of scanning a header for phone-capable columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhoneColumns {
    Found(Vec<PhoneColumn>),
    NoneFound,
}

impl PhoneColumns {
    pub fn as_slice(&self) -> &[PhoneColumn] {
        match self {
            PhoneColumns::Found(columns) => columns,
            PhoneColumns::NoneFound => &[],
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, PhoneColumns::Found(_))
    }

    pub fn contains(&self, index: usize) -> bool {
        self.as_slice().iter().any(|column| column.index == index)
    }
}

/// Picks the columns whose trimmed, lowercased name contains any keyword.
/// Returned names keep the header's original spelling.
pub fn classify_phone_columns<S: AsRef<str>>(columns: &[String], keywords: &[S]) -> PhoneColumns {
    let keywords: Vec<String> = keywords
        .iter()
        .map(|keyword| keyword.as_ref().trim().to_lowercase())
        .filter(|keyword| !keyword.is_empty())
        .collect();

    let found: Vec<PhoneColumn> = columns
        .iter()
        .enumerate()
        .filter(|(_, name)| {
            let folded = name.trim().to_lowercase();
            keywords
                .iter()
                .any(|keyword| folded.contains(keyword.as_str()))
        })
        .map(|(index, name)| PhoneColumn {
            index,
            name: name.clone(),
        })
        .collect();

    if found.is_empty() {
        PhoneColumns::NoneFound
    } else {
        PhoneColumns::Found(found)
    }
}

#[cfg(test)]
mod tests {
    use super::{classify_phone_columns, PhoneColumns, DEFAULT_PHONE_KEYWORDS};

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn classify_matches_keywords_and_keeps_casing() {
        let columns = header(&["Name", " Mobile Number ", "Alt_PHONE", "Notes", "CellNo"]);
        let found = classify_phone_columns(&columns, &DEFAULT_PHONE_KEYWORDS);
        let names: Vec<&str> = found
            .as_slice()
            .iter()
            .map(|column| column.name.as_str())
            .collect();
        assert_eq!(names, vec![" Mobile Number ", "Alt_PHONE", "CellNo"]);
        assert_eq!(found.as_slice()[0].index, 1);
    }

    #[test]
    fn classify_signals_when_nothing_matches() {
        let columns = header(&["Name", "Email", "Date"]);
        let found = classify_phone_columns(&columns, &DEFAULT_PHONE_KEYWORDS);
        assert_eq!(found, PhoneColumns::NoneFound);
        assert!(found.as_slice().is_empty());
    }

    #[test]
    fn classify_uses_custom_keywords() {
        let columns = header(&["Caller", "Callee", "Phone"]);
        let found = classify_phone_columns(&columns, &["call"]);
        assert_eq!(found.as_slice().len(), 2);
        assert!(!found.contains(2));
    }
}
