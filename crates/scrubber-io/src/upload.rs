use crate::error::{IoError, Result};
use crate::export::ExportFile;

/// Which remote folder an export file belongs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    /// Updated list and every removed-records file.
    Removed,
    /// Scrubbed copies of the logs.
    Scrubbed,
}

impl Destination {
    pub fn as_str(self) -> &'static str {
        match self {
            Destination::Removed => "removed",
            Destination::Scrubbed => "scrubbed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folders {
    pub removed: String,
    pub scrubbed: String,
}

impl Folders {
    pub fn folder_for(&self, destination: Destination) -> &str {
        match destination {
            Destination::Removed => &self.removed,
            Destination::Scrubbed => &self.scrubbed,
        }
    }
}

pub trait UploadTarget {
    fn target_name(&self) -> &'static str;
    /// Stores one file and returns where it ended up.
    fn upload(&self, folder: &str, file_name: &str, data: &[u8]) -> Result<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uploaded {
    pub file: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFailure {
    pub file: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReport {
    pub uploaded: Vec<Uploaded>,
    pub failed: Vec<UploadFailure>,
}

impl UploadReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Uploads every file, continuing past individual failures.
pub fn upload_all(
    target: &dyn UploadTarget,
    folders: &Folders,
    files: &[ExportFile],
) -> UploadReport {
    let mut report = UploadReport::default();
    for file in files {
        let folder = folders.folder_for(file.destination);
        match target.upload(folder, &file.name, &file.data) {
            Ok(location) => {
                tracing::debug!(
                    backend = target.target_name(),
                    file = %file.name,
                    %location,
                    "uploaded"
                );
                report.uploaded.push(Uploaded {
                    file: file.name.clone(),
                    location,
                });
            }
            Err(err) => {
                tracing::warn!(
                    backend = target.target_name(),
                    file = %file.name,
                    error = %err,
                    "upload failed"
                );
                report.failed.push(UploadFailure {
                    file: file.name.clone(),
                    error: err.to_string(),
                });
            }
        }
    }
    report
}

/// Rejects folder or file names that could escape the target root.
pub(crate) fn validate_segment(kind: &str, value: &str) -> Result<()> {
    let trimmed = value.trim();
    if trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || trimmed.contains(['/', '\\'])
        || trimmed.chars().any(char::is_control)
    {
        return Err(IoError::InvalidTarget(format!("invalid {kind} name: {value:?}")));
    }
    Ok(())
}
