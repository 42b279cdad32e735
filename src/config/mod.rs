//! Configuration module for Takeout Harvester
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every table is optional, so running without a file uses the defaults.
//!
//! # Example
//!
//! ```no_run
//! use takeout_harvester::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvester.toml")).unwrap();
//! println!("Download marker: {}", config.classifier.marker);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ClassifierConfig, Config, DispatcherConfig, HighlightConfig, PageConfig, ResolveAt,
    DEFAULT_DOWNLOAD_PATH, DEFAULT_MARKER, DEFAULT_REDOWNLOAD_PHRASES,
};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default, parse_config};
