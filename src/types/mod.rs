// marksync shared type definitions
// Each submodule defines types used across the service, the command bus and the exporters.

pub mod bookmark;
pub mod command;
pub mod errors;
pub mod settings;
pub mod snapshot;
pub mod stats;
