#![deny(missing_docs)]

//! # Document Configuration
//!
//! Metadata stamped onto generated documents: the `info` block and the
//! serving origin (`host` / `basePath`).

use crate::error::{AppError, AppResult};
use crate::oas::models::Info;
use url::Url;

/// Document-level settings for OpenAPI generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentConfig {
    /// The title of the API.
    pub title: String,
    /// Optional description for the API.
    pub description: Option<String>,
    /// The version of the API document.
    pub version: String,
    /// Serving host, `host[:port]`.
    pub host: String,
    /// Serving base path.
    pub base_path: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            title: "Content API".to_string(),
            description: None,
            version: "1.0".to_string(),
            host: "localhost".to_string(),
            base_path: "/".to_string(),
        }
    }
}

impl DocumentConfig {
    /// Creates a config with a title and version.
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    /// Sets an optional description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the serving host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the serving base path.
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Derives `host` and `basePath` from the origin the documents are served from.
    ///
    /// e.g. `https://example.com:8443/api/` -> host `example.com:8443`, base path `/api`.
    pub fn with_origin(mut self, origin: &Url) -> AppResult<Self> {
        let host = origin
            .host_str()
            .ok_or_else(|| AppError::General(format!("Origin has no host: {}", origin)))?;
        self.host = match origin.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        let path = origin.path().trim_end_matches('/');
        self.base_path = if path.is_empty() {
            "/".to_string()
        } else {
            path.to_string()
        };
        Ok(self)
    }

    /// Parses an origin string and applies [`DocumentConfig::with_origin`].
    pub fn with_origin_str(self, origin: &str) -> AppResult<Self> {
        let url = Url::parse(origin)
            .map_err(|e| AppError::General(format!("Invalid origin '{}': {}", origin, e)))?;
        self.with_origin(&url)
    }

    /// The `info` block for this config.
    pub fn info(&self) -> Info {
        Info {
            title: self.title.clone(),
            description: self.description.clone(),
            version: self.version.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_with_port_and_path() {
        let config = DocumentConfig::default()
            .with_origin_str("https://example.com:8443/api/")
            .unwrap();
        assert_eq!(config.host, "example.com:8443");
        assert_eq!(config.base_path, "/api");
    }

    #[test]
    fn test_origin_root() {
        let config = DocumentConfig::default()
            .with_origin_str("http://cms.local")
            .unwrap();
        assert_eq!(config.host, "cms.local");
        assert_eq!(config.base_path, "/");
    }

    #[test]
    fn test_invalid_origin() {
        assert!(DocumentConfig::default().with_origin_str("not a url").is_err());
        assert!(DocumentConfig::default()
            .with_origin_str("data:text/plain,hi")
            .is_err());
    }

    #[test]
    fn test_builder() {
        let config = DocumentConfig::new("Site API", "2.1").with_description("All content");
        let info = config.info();
        assert_eq!(info.title, "Site API");
        assert_eq!(info.version, "2.1");
        assert_eq!(info.description.as_deref(), Some("All content"));
        assert_eq!(config.host, "localhost");
    }
}
