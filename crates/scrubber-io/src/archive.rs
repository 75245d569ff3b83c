use crate::error::Result;
use crate::export::ExportFile;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Packs export files into a single ZIP archive. Entry timestamps are pinned
/// so the same outcome always yields the same bytes.
pub fn bundle_zip(files: &[ExportFile]) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(0o644);

    for file in files {
        writer.start_file(file.name.as_str(), options)?;
        writer.write_all(&file.data)?;
    }

    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::bundle_zip;
    use crate::export::ExportFile;
    use crate::upload::Destination;
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    fn file(name: &str, data: &str) -> ExportFile {
        ExportFile {
            name: name.to_string(),
            destination: Destination::Scrubbed,
            rows: 1,
            data: data.as_bytes().to_vec(),
        }
    }

    #[test]
    fn bundle_zip_keeps_entry_order_and_content() {
        let files = vec![
            file("Updated_List_File_20261015.csv", "LogType,Phone\n"),
            file("Scrubbed_calls_20261015.csv", "Phone\n5551112222\n"),
        ];
        let bytes = bundle_zip(&files).expect("zip");

        let mut archive = ZipArchive::new(Cursor::new(bytes)).expect("archive");
        assert_eq!(archive.len(), 2);
        let mut entry = archive.by_index(1).expect("entry");
        assert_eq!(entry.name(), "Scrubbed_calls_20261015.csv");
        let mut text = String::new();
        entry.read_to_string(&mut text).expect("read");
        assert_eq!(text, "Phone\n5551112222\n");
    }

    #[test]
    fn bundle_zip_is_deterministic() {
        let files = vec![file("a.csv", "x\n1\n")];
        assert_eq!(
            bundle_zip(&files).expect("first"),
            bundle_zip(&files).expect("second")
        );
    }
}
