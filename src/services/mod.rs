// marksync services
// Snapshot building, duplicate analysis and cleanup, exports, library queries, scheduling and settings.

pub mod analyzer;
pub mod cleanup;
pub mod exporter;
pub mod library_view;
pub mod presenter;
pub mod reader;
pub mod scheduler;
pub mod settings_engine;
pub mod sync_engine;
