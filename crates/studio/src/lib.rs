//! Application state for the storyboard studio.
//!
//! [`Studio`] holds the current project, the global error and loading
//! flags, the selected credentials and the assistant transcript, and
//! exposes one method per user action.

pub mod blobs;
pub mod controller;
pub mod error;

pub use blobs::BlobStore;
pub use controller::{BulkOutcome, Studio, StudioSnapshot};
pub use error::StudioError;
