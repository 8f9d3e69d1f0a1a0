use marksync::types::errors::*;

// === StoreError Tests ===

#[test]
fn store_error_not_found_display() {
    let err = StoreError::NotFound("bm-1".to_string());
    assert_eq!(err.to_string(), "Bookmark not found: bm-1");
}

#[test]
fn store_error_folder_not_empty_display() {
    let err = StoreError::FolderNotEmpty("f-1".to_string());
    assert_eq!(err.to_string(), "Bookmark folder not empty: f-1");
}

#[test]
fn store_error_invalid_parent_display() {
    let err = StoreError::InvalidParent("bm-2".to_string());
    assert_eq!(err.to_string(), "Invalid parent folder: bm-2");
}

#[test]
fn store_error_from_rusqlite() {
    let err: StoreError = rusqlite::Error::QueryReturnedNoRows.into();
    assert!(matches!(err, StoreError::DatabaseError(_)));
    assert!(err.to_string().starts_with("Store database error: "));
}

#[test]
fn store_error_implements_error_trait() {
    let err: Box<dyn std::error::Error> = Box::new(StoreError::NotFound("id".to_string()));
    assert!(err.source().is_none());
}

// === SyncError Tests ===

#[test]
fn sync_error_display() {
    assert_eq!(
        SyncError::ReadFailed("locked".to_string()).to_string(),
        "Failed to read bookmark tree: locked"
    );
    assert_eq!(
        SyncError::PersistFailed("disk full".to_string()).to_string(),
        "Failed to persist snapshot: disk full"
    );
}

// === ExportError Tests ===

#[test]
fn export_error_display() {
    assert_eq!(
        ExportError::SerializationError("bad".to_string()).to_string(),
        "Export serialization error: bad"
    );
    assert_eq!(
        ExportError::SaveFailed("denied".to_string()).to_string(),
        "Export save failed: denied"
    );
}

// === PresenterError Tests ===

#[test]
fn presenter_error_display() {
    assert_eq!(
        PresenterError::IoError("nope".to_string()).to_string(),
        "Presenter I/O error: nope"
    );
    assert_eq!(
        PresenterError::InvalidFilename("../x".to_string()).to_string(),
        "Invalid filename: ../x"
    );
}

// === SettingsError Tests ===

#[test]
fn settings_error_display() {
    assert_eq!(
        SettingsError::InvalidKey("foo".to_string()).to_string(),
        "Invalid settings key: foo"
    );
    assert_eq!(
        SettingsError::InvalidValue("bar".to_string()).to_string(),
        "Invalid settings value: bar"
    );
    assert_eq!(
        SettingsError::IoError("io".to_string()).to_string(),
        "Settings I/O error: io"
    );
}
