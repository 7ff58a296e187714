//! Operator-configured automation engine settings.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineSettings {
    /// Webhook URL of the external automation engine. `None` until set.
    #[serde(default)]
    pub webhook_url: Option<String>,
}

impl EngineSettings {
    /// The configured webhook URL, if it is set and non-blank.
    pub fn webhook_url(&self) -> Option<&str> {
        self.webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }
}

/// Validate an operator-supplied webhook URL.
///
/// Blank input clears the setting. Anything else must be an absolute
/// `http` or `https` URL with a host.
pub fn normalize_webhook_url(input: Option<&str>) -> Result<Option<String>, CoreError> {
    let Some(url) = input.map(str::trim).filter(|u| !u.is_empty()) else {
        return Ok(None);
    };

    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| {
            CoreError::Validation(format!("Webhook URL must start with http:// or https://: {url}"))
        })?;

    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() {
        return Err(CoreError::Validation(format!("Webhook URL has no host: {url}")));
    }

    Ok(Some(url.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_clears() {
        assert_eq!(normalize_webhook_url(None).unwrap(), None);
        assert_eq!(normalize_webhook_url(Some("   ")).unwrap(), None);
    }

    #[test]
    fn accepts_http_and_https() {
        assert_eq!(
            normalize_webhook_url(Some(" https://n8n.example.fr/webhook/pige ")).unwrap(),
            Some("https://n8n.example.fr/webhook/pige".to_string())
        );
        assert!(normalize_webhook_url(Some("http://localhost:5678/webhook")).is_ok());
    }

    #[test]
    fn rejects_other_schemes_and_missing_host() {
        assert!(normalize_webhook_url(Some("ftp://host/x")).is_err());
        assert!(normalize_webhook_url(Some("n8n.example.fr")).is_err());
        assert!(normalize_webhook_url(Some("https:///path")).is_err());
    }

    #[test]
    fn blank_stored_url_counts_as_unset() {
        let settings = EngineSettings {
            webhook_url: Some(" ".into()),
        };
        assert_eq!(settings.webhook_url(), None);
    }
}
