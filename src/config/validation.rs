use crate::config::types::{
    ClassifierConfig, Config, DispatcherConfig, HighlightConfig, PageConfig,
};
use crate::ConfigError;
use url::Url;

/// Longest accepted pause between two download triggers (one hour)
const MAX_INTERVAL_MS: u64 = 3_600_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_classifier_config(&config.classifier)?;
    validate_dispatcher_config(&config.dispatcher)?;
    validate_highlight_config(&config.highlight)?;
    validate_page_config(&config.page)?;
    Ok(())
}

/// Validates classification rules
fn validate_classifier_config(config: &ClassifierConfig) -> Result<(), ConfigError> {
    if config.marker.trim().is_empty() {
        return Err(ConfigError::Validation(
            "classifier marker cannot be empty".to_string(),
        ));
    }

    if config.download_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "download_path cannot be empty".to_string(),
        ));
    }

    if config.redownload_phrases.is_empty() {
        return Err(ConfigError::Validation(
            "redownload_phrases must contain at least one phrase".to_string(),
        ));
    }

    // An empty phrase would match every aria-label
    if let Some(index) = config
        .redownload_phrases
        .iter()
        .position(|p| p.trim().is_empty())
    {
        return Err(ConfigError::Validation(format!(
            "redownload_phrases[{}] cannot be empty",
            index
        )));
    }

    Ok(())
}

/// Validates download pacing
fn validate_dispatcher_config(config: &DispatcherConfig) -> Result<(), ConfigError> {
    if config.interval_ms < 1 || config.interval_ms > MAX_INTERVAL_MS {
        return Err(ConfigError::Validation(format!(
            "interval_ms must be between 1 and {}, got {}",
            MAX_INTERVAL_MS, config.interval_ms
        )));
    }

    Ok(())
}

/// Validates the highlight style
fn validate_highlight_config(config: &HighlightConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("border", &config.border),
        ("background_color", &config.background_color),
        ("padding", &config.padding),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "highlight {} cannot be empty",
                name
            )));
        }
    }

    Ok(())
}

/// Validates page settings
fn validate_page_config(config: &PageConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' must use HTTP or HTTPS",
            config.base_url
        )));
    }

    if config.archive_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "archive_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
