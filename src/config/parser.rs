use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use takeout_harvester::config::load_config;
///
/// let config = load_config(Path::new("harvester.toml")).unwrap();
/// println!("Interval: {}ms", config.dispatcher.interval_ms);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;

    validate(&config)?;

    Ok(config)
}

/// Loads the configuration file if one was given, otherwise the defaults
pub fn load_config_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(Config::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::ResolveAt;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r##"
[classifier]
marker = "xYzAbC"
download-path = "/takeout/download"
redownload-phrases = ["download again", "erneut herunterladen"]

[dispatcher]
interval-ms = 250
resolve-at = "schedule"

[highlight]
border = "1px dashed red"
background-color = "#fff"
padding = "0"

[page]
base-url = "https://takeout.google.com/manage/archive/abc"
auto-highlight = false
"##;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.classifier.marker, "xYzAbC");
        assert_eq!(config.classifier.redownload_phrases.len(), 2);
        assert_eq!(config.dispatcher.interval_ms, 250);
        assert_eq!(config.dispatcher.resolve_at, ResolveAt::Schedule);
        assert_eq!(config.highlight.border, "1px dashed red");
        assert!(!config.page.auto_highlight);
        assert_eq!(
            config.page.archive_path,
            "takeout.google.com/manage/archive"
        );
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();

        assert_eq!(config.classifier.marker, "hSRGPd");
        assert_eq!(config.classifier.download_path, "/download");
        assert_eq!(config.classifier.redownload_phrases.len(), 5);
        assert_eq!(config.dispatcher.interval_ms, 1000);
        assert_eq!(config.dispatcher.resolve_at, ResolveAt::Trigger);
        assert!(config.page.auto_highlight);
    }

    #[test]
    fn test_partial_table_keeps_other_defaults() {
        let config = parse_config("[dispatcher]\ninterval-ms = 50\n").unwrap();

        assert_eq!(config.dispatcher.interval_ms, 50);
        assert_eq!(config.dispatcher.resolve_at, ResolveAt::Trigger);
    }

    #[test]
    fn test_load_config_or_default_without_path() {
        let config = load_config_or_default(None).unwrap();
        assert_eq!(config.highlight.padding, "2px 4px");
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/harvester.toml"));
        assert!(matches!(result.unwrap_err(), ConfigError::Io(_)));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_unknown_resolve_at_is_rejected() {
        let result = parse_config("[dispatcher]\nresolve-at = \"later\"\n");
        assert!(matches!(result.unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config("[dispatcher]\ninterval-ms = 0\n");
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }
}
