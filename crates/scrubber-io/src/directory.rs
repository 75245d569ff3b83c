use crate::error::Result;
use crate::upload::{validate_segment, UploadTarget};
use std::fs;
use std::path::PathBuf;

/// Uploads into folders under a local (or mounted) directory.
#[derive(Debug, Clone)]
pub struct DirectoryTarget {
    root: PathBuf,
}

impl DirectoryTarget {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl UploadTarget for DirectoryTarget {
    fn target_name(&self) -> &'static str {
        "directory"
    }

    fn upload(&self, folder: &str, file_name: &str, data: &[u8]) -> Result<String> {
        validate_segment("folder", folder)?;
        validate_segment("file", file_name)?;
        let dir = self.root.join(folder.trim());
        fs::create_dir_all(&dir)?;
        let path = dir.join(file_name.trim());
        fs::write(&path, data)?;
        Ok(path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::DirectoryTarget;
    use crate::error::IoError;
    use crate::upload::UploadTarget;

    #[test]
    fn upload_creates_folder_and_overwrites() {
        let temp = tempfile::tempdir().expect("tempdir");
        let target = DirectoryTarget::new(temp.path());

        target.upload("Removed", "a.csv", b"first").expect("upload");
        let location = target.upload("Removed", "a.csv", b"second").expect("upload");

        let path = temp.path().join("Removed").join("a.csv");
        assert_eq!(location, path.display().to_string());
        assert_eq!(std::fs::read(path).expect("read"), b"second");
    }

    #[test]
    fn upload_rejects_escaping_names() {
        let temp = tempfile::tempdir().expect("tempdir");
        let target = DirectoryTarget::new(temp.path());
        let err = target.upload("..", "a.csv", b"x").unwrap_err();
        assert!(matches!(err, IoError::InvalidTarget(_)));
    }
}
