//! Welcome page and browsable directory index for an Eclipse update site.
//!
//! The [`site`] module renders the index; the remaining modules wrap it in a
//! small HTTP server that also serves the listed artifacts.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
pub mod site;
