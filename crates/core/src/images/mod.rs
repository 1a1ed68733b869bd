pub mod cleanup;
pub mod files;
pub mod tracker;

pub use cleanup::{CleanupReport, CleanupScanner, ScanReport};
pub use files::ImageStore;
