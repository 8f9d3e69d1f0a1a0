//! Notification and download presentation.
//!
//! The service never renders anything itself; it hands messages and finished
//! export documents to a `Presenter`.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::types::errors::PresenterError;

/// Shows notifications and saves files on the user's behalf.
pub trait Presenter {
    fn notify(&self, title: &str, message: &str) -> Result<(), PresenterError>;
    /// Saves `contents` under `filename`. Returns an identifier of the saved download.
    fn save_file(&self, filename: &str, contents: &str) -> Result<String, PresenterError>;
}

/// Presenter that logs notifications and writes downloads into a directory.
pub struct FsPresenter {
    export_dir: PathBuf,
}

impl FsPresenter {
    pub fn new<P: AsRef<Path>>(export_dir: P) -> Self {
        Self {
            export_dir: export_dir.as_ref().to_path_buf(),
        }
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }
}

/// Accepts bare file names only.
fn validate_filename(filename: &str) -> Result<(), PresenterError> {
    let bad = filename.is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains('/')
        || filename.contains('\\');
    if bad {
        return Err(PresenterError::InvalidFilename(filename.to_string()));
    }
    Ok(())
}

impl Presenter for FsPresenter {
    fn notify(&self, title: &str, message: &str) -> Result<(), PresenterError> {
        info!("[notify] {}: {}", title, message.replace('\n', " | "));
        Ok(())
    }

    fn save_file(&self, filename: &str, contents: &str) -> Result<String, PresenterError> {
        validate_filename(filename)?;
        fs::create_dir_all(&self.export_dir).map_err(|e| {
            PresenterError::IoError(format!("Failed to create export directory: {}", e))
        })?;
        let path = self.export_dir.join(filename);
        fs::write(&path, contents)
            .map_err(|e| PresenterError::IoError(format!("Failed to write {}: {}", filename, e)))?;
        info!("saved {} ({} bytes)", path.display(), contents.len());
        Ok(path.to_string_lossy().to_string())
    }
}
