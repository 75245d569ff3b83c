use crate::error::CoreError;
use std::fmt;

/// A single field value as it arrived from the source dataset.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(value) => value.is_empty(),
            Cell::Float(value) => value.is_nan(),
            Cell::Int(_) => false,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(value) => f.write_str(value),
            Cell::Int(value) => write!(f, "{value}"),
            Cell::Float(value) if value.is_nan() => Ok(()),
            Cell::Float(value) if value.is_finite() && value.fract() == 0.0 => {
                write!(f, "{value:.0}")
            }
            Cell::Float(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Float(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Empty)
    }
}

/// A record together with its zero-based position in the source dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub index: usize,
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn get(&self, column: usize) -> &Cell {
        static EMPTY: Cell = Cell::Empty;
        self.cells.get(column).unwrap_or(&EMPTY)
    }

    pub fn set(&mut self, column: usize, value: Cell) {
        if let Some(cell) = self.cells.get_mut(column) {
            *cell = value;
        }
    }

    pub fn blank(&mut self, column: usize) {
        self.set(column, Cell::Empty);
    }
}

/// An in-memory dataset: a header plus rows in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub label: String,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(label: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            label: label.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Builds a table from header and row values, assigning row identities in order.
    pub fn from_rows<I, R>(
        label: impl Into<String>,
        columns: Vec<String>,
        rows: I,
    ) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = Cell>,
    {
        let mut table = Self::new(label, columns);
        for row in rows {
            table.push_row(row.into_iter().collect())?;
        }
        Ok(table)
    }

    /// Appends a row, padding it to the header width. Rows wider than the
    /// header are rejected.
    pub fn push_row(&mut self, mut cells: Vec<Cell>) -> Result<(), CoreError> {
        let index = self.rows.len();
        if cells.len() > self.columns.len() {
            return Err(CoreError::RaggedRow {
                dataset: self.label.clone(),
                row: index + 1,
                expected: self.columns.len(),
                found: cells.len(),
            });
        }
        cells.resize(self.columns.len(), Cell::Empty);
        self.rows.push(Row { index, cells });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Same label and header, no rows.
    pub fn empty_like(&self) -> Self {
        Self::new(self.label.clone(), self.columns.clone())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Looks a column up by exact name, falling back to a comparison that
    /// ignores case, whitespace and underscores (`Log Type` ~ `log_type` ~ `LogType`).
    pub fn find_column(&self, name: &str) -> Option<usize> {
        if let Some(index) = self.column_index(name) {
            return Some(index);
        }
        let wanted = compact_name(name);
        if wanted.is_empty() {
            return None;
        }
        self.columns
            .iter()
            .position(|column| compact_name(column) == wanted)
    }

    pub fn require_column(&self, name: &str) -> Result<usize, CoreError> {
        self.find_column(name)
            .ok_or_else(|| CoreError::MissingColumn {
                dataset: self.label.clone(),
                column: name.to_string(),
            })
    }
}

fn compact_name(name: &str) -> String {
    name.chars()
        .filter(|ch| !ch.is_whitespace() && *ch != '_' && *ch != '-')
        .flat_map(char::to_lowercase)
        .collect()
}
