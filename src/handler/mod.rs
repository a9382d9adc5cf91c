//! Request handler module
//!
//! Responsible for request routing dispatch: health probes, the update site
//! index page, and downloads of the files it lists.

pub mod index;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
