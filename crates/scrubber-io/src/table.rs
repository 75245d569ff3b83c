use crate::error::{IoError, Result};
use scrubber_core::domain::{Cell, Table};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

const UTF8_BOM: char = '\u{feff}';

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Field values treated as missing, e.g. `nan` left behind by dataframe exports.
    pub null_markers: Vec<String>,
}

/// Reads a delimited file with a header row. The table label is the file name.
pub fn read_table(path: &Path, options: &ReadOptions) -> Result<Table> {
    let label = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let file = File::open(path)?;
    read_table_from(file, label, options)
}

pub fn read_table_from<R: Read>(
    reader: R,
    label: impl Into<String>,
    options: &ReadOptions,
) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<String> = reader
        .byte_headers()?
        .iter()
        .enumerate()
        .map(|(idx, raw)| {
            let name = String::from_utf8_lossy(raw);
            if idx == 0 {
                name.trim_start_matches(UTF8_BOM).to_string()
            } else {
                name.into_owned()
            }
        })
        .collect();

    let mut table = Table::new(label, columns);
    for record in reader.byte_records() {
        let record = record?;
        let cells = record
            .iter()
            .map(|raw| to_cell(&String::from_utf8_lossy(raw), options))
            .collect();
        table.push_row(cells)?;
    }
    Ok(table)
}

fn to_cell(raw: &str, options: &ReadOptions) -> Cell {
    if raw.is_empty() || options.null_markers.iter().any(|marker| marker == raw) {
        Cell::Empty
    } else {
        Cell::text(raw)
    }
}

/// Serializes a table as CSV. Every record is exactly as wide as the header.
pub fn write_table(table: &Table) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    write_table_to(table, &mut out)?;
    Ok(out)
}

pub fn write_table_to<W: Write>(table: &Table, writer: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().from_writer(writer);
    writer.write_record(&table.columns)?;
    let width = table.columns.len();
    for row in &table.rows {
        let fields = (0..width).map(|column| row.get(column).to_string());
        writer.write_record(fields)?;
    }
    writer.flush().map_err(IoError::from)
}

#[cfg(test)]
mod tests {
    use super::{read_table_from, write_table, ReadOptions};
    use crate::error::IoError;
    use scrubber_core::domain::{Cell, Table};
    use scrubber_core::CoreError;

    fn options() -> ReadOptions {
        ReadOptions {
            null_markers: vec!["nan".to_string(), "NaN".to_string()],
        }
    }

    #[test]
    fn read_table_strips_bom_and_maps_null_markers() {
        let data = "\u{feff}Name,Phone\nAda,nan\nGrace,555-111-2222\n";
        let table = read_table_from(data.as_bytes(), "list.csv", &options()).expect("read");
        assert_eq!(table.columns, vec!["Name", "Phone"]);
        assert_eq!(table.rows[0].cells[1], Cell::Empty);
        assert_eq!(table.rows[1].cells[1], Cell::text("555-111-2222"));
        assert_eq!(table.rows[1].index, 1);
    }

    #[test]
    fn read_table_pads_short_rows() {
        let data = "Name,Phone,Notes\nAda\n";
        let table = read_table_from(data.as_bytes(), "list.csv", &options()).expect("read");
        assert_eq!(table.rows[0].cells.len(), 3);
        assert_eq!(table.rows[0].cells[2], Cell::Empty);
    }

    #[test]
    fn read_table_rejects_wide_rows() {
        let data = "Name,Phone\nAda,1,extra\n";
        let err = read_table_from(data.as_bytes(), "list.csv", &options()).unwrap_err();
        assert!(matches!(
            err,
            IoError::Core(CoreError::RaggedRow { row: 1, .. })
        ));
    }

    #[test]
    fn write_table_quotes_and_keeps_width() {
        let mut table = Table::new(
            "calls.csv",
            vec!["Agent".to_string(), "Notes".to_string(), "Phone".to_string()],
        );
        table
            .push_row(vec![Cell::text("amy"), Cell::text("said \"hi\", left")])
            .expect("row");
        let written = String::from_utf8(write_table(&table).expect("write")).expect("utf8");
        assert_eq!(written, "Agent,Notes,Phone\namy,\"said \"\"hi\"\", left\",\n");
    }

    #[test]
    fn written_tables_read_back_unchanged() {
        let data = "Agent,Phone\namy,\"555,111,2222\"\nbob,\n";
        let table = read_table_from(data.as_bytes(), "calls.csv", &options()).expect("read");
        let written = write_table(&table).expect("write");
        let again = read_table_from(written.as_slice(), "calls.csv", &options()).expect("reread");
        assert_eq!(table, again);
    }
}
