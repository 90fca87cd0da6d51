use std::time::Duration;

use crate::domain::ContentError;

/// Credential value that marks a provider as not configured. Deployment
/// templates ship this literal, so it must never be sent to a backend.
pub(crate) const PLACEHOLDER_API_KEY: &str = "your-api-key-here";

pub(crate) fn read_env_var(name: &str) -> Result<Option<String>, ContentError> {
    match std::env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(error) => Err(ContentError::validation(format!(
            "{name} could not be read: {error}"
        ))),
    }
}

/// Reads a provider credential, preferring the ARTIZEN-prefixed variable over
/// the provider's conventional one. Returns `None` when the provider is
/// unconfigured: both variables absent, blank, or set to the placeholder.
pub(crate) fn read_api_key(
    primary: &str,
    fallback: &str,
) -> Result<Option<String>, ContentError> {
    let key = usable_api_key(read_env_var(primary)?)
        .or(usable_api_key(read_env_var(fallback)?));
    Ok(key)
}

pub(crate) fn usable_api_key(value: Option<String>) -> Option<String> {
    let value = value?;
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == PLACEHOLDER_API_KEY {
        return None;
    }
    Some(trimmed.to_string())
}

pub(crate) fn parse_timeout_seconds(name: &str, value: &str) -> Result<Duration, ContentError> {
    let parsed = value.trim().parse::<u64>().map_err(|_| {
        ContentError::validation(format!("{name} must be a positive integer in seconds"))
    })?;
    if parsed == 0 {
        return Err(ContentError::validation(format!(
            "{name} must be greater than 0 seconds"
        )));
    }
    Ok(Duration::from_secs(parsed))
}

pub(crate) fn read_timeout_from_env(name: &str) -> Result<Option<Duration>, ContentError> {
    let Some(value) = read_env_var(name)? else {
        return Ok(None);
    };
    Ok(Some(parse_timeout_seconds(name, &value)?))
}

pub(crate) fn resolve_timeout_with_global_fallback<F>(
    provider_timeout: Option<Duration>,
    read_global_timeout: F,
    default_timeout: Duration,
) -> Result<Duration, ContentError>
where
    F: FnOnce() -> Result<Option<Duration>, ContentError>,
{
    if let Some(timeout) = provider_timeout {
        return Ok(timeout);
    }

    Ok(read_global_timeout()?.unwrap_or(default_timeout))
}
