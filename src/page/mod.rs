//! Page module: the document the harvester works on
//!
//! This module contains:
//! - The page snapshot and its anchor elements
//! - Loading snapshots from saved files or over HTTP

mod loader;
mod snapshot;

pub use loader::{build_http_client, load_page, PageSource};
pub use snapshot::{AnchorElement, AnchorId, PageSnapshot};
