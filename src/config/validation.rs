use crate::config::types::{Config, CrawlerConfig, FilterConfig, UserAgentConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_filter_config(&config.filter)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > 100 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 100, got {}",
            config.workers
        )));
    }

    if config.request_timeout == 0 {
        return Err(ConfigError::Validation(
            "request_timeout must be at least 1 second".to_string(),
        ));
    }

    if config.connect_timeout == 0 {
        return Err(ConfigError::Validation(
            "connect_timeout must be at least 1 second".to_string(),
        ));
    }

    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max_pages must be >= 1 when set".to_string(),
        ));
    }

    if config.crawl_deadline == Some(0) {
        return Err(ConfigError::Validation(
            "crawl_deadline must be >= 1 second when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.value.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user agent cannot be empty".to_string(),
        ));
    }

    // Must be usable as an HTTP header value
    if config.value.chars().any(|c| c.is_control()) {
        return Err(ConfigError::Validation(format!(
            "user agent contains control characters: {:?}",
            config.value
        )));
    }

    Ok(())
}

/// Validates link filter configuration
fn validate_filter_config(config: &FilterConfig) -> Result<(), ConfigError> {
    if config.max_url_length < 10 {
        return Err(ConfigError::Validation(format!(
            "max_url_length must be >= 10, got {}",
            config.max_url_length
        )));
    }

    for ext in &config.denied_extensions {
        validate_extension(ext)?;
    }

    Ok(())
}

/// Validates one denylist entry: bare, lowercase, alphanumeric
fn validate_extension(ext: &str) -> Result<(), ConfigError> {
    if ext.is_empty() {
        return Err(ConfigError::Validation(
            "denied extension cannot be empty".to_string(),
        ));
    }

    if ext.starts_with('.') {
        return Err(ConfigError::Validation(format!(
            "denied extension '{}' must be given without the leading dot",
            ext
        )));
    }

    if !ext
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    {
        return Err(ConfigError::Validation(format!(
            "denied extension '{}' must be lowercase alphanumeric",
            ext
        )));
    }

    Ok(())
}
