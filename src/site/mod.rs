//! Update site index module
//!
//! Everything needed to turn a `dir` request parameter into the browsable
//! index page: path parsing, directory listing and HTML rendering.

pub mod listing;
pub mod page;
pub mod path;
pub mod render;

pub use listing::{read_listing, DirectoryListing, ListingOptions, ScriptFilter};
pub use page::render_index;
pub use path::RequestedPath;
pub use render::{escape_html, render_tree, write_tree};
