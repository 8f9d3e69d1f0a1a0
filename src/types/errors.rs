use std::fmt;

// === StoreError ===

/// Errors raised by the bookmark store and the key-value store.
#[derive(Debug)]
pub enum StoreError {
    /// Node with the given ID was not found.
    NotFound(String),
    /// The folder still has children and cannot be removed.
    FolderNotEmpty(String),
    /// The parent folder does not exist or is not a folder.
    InvalidParent(String),
    /// Database operation failed.
    DatabaseError(String),
    /// A stored value could not be encoded or decoded.
    SerializationError(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(id) => write!(f, "Bookmark not found: {}", id),
            StoreError::FolderNotEmpty(id) => write!(f, "Bookmark folder not empty: {}", id),
            StoreError::InvalidParent(id) => write!(f, "Invalid parent folder: {}", id),
            StoreError::DatabaseError(msg) => write!(f, "Store database error: {}", msg),
            StoreError::SerializationError(msg) => {
                write!(f, "Store serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::DatabaseError(e.to_string())
    }
}

// === SyncError ===

/// Errors raised while building or persisting a snapshot.
#[derive(Debug)]
pub enum SyncError {
    /// Reading the bookmark tree failed.
    ReadFailed(String),
    /// Writing the snapshot or the stats failed.
    PersistFailed(String),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::ReadFailed(msg) => write!(f, "Failed to read bookmark tree: {}", msg),
            SyncError::PersistFailed(msg) => write!(f, "Failed to persist snapshot: {}", msg),
        }
    }
}

impl std::error::Error for SyncError {}

// === ExportError ===

/// Errors raised while rendering or saving an export.
#[derive(Debug)]
pub enum ExportError {
    /// Rendering the export document failed.
    SerializationError(String),
    /// Handing the document to the presenter failed.
    SaveFailed(String),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::SerializationError(msg) => {
                write!(f, "Export serialization error: {}", msg)
            }
            ExportError::SaveFailed(msg) => write!(f, "Export save failed: {}", msg),
        }
    }
}

impl std::error::Error for ExportError {}

// === PresenterError ===

/// Errors raised by notification or download presentation.
#[derive(Debug)]
pub enum PresenterError {
    /// Writing a file to disk failed.
    IoError(String),
    /// The filename would escape the export directory.
    InvalidFilename(String),
}

impl fmt::Display for PresenterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresenterError::IoError(msg) => write!(f, "Presenter I/O error: {}", msg),
            PresenterError::InvalidFilename(name) => write!(f, "Invalid filename: {}", name),
        }
    }
}

impl std::error::Error for PresenterError {}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}
