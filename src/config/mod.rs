pub mod file;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_positive_number, validate_url, Validate};
use crate::config::file::FileConfig;
use std::path::Path;

/// The two hosted mock-API collections the original deployment points at.
pub const DEFAULT_USERS_URL: &str = "https://68dc054e7cd1948060a93310.mockapi.io/users/users";
pub const DEFAULT_COMERCIOS_URL: &str = "https://68dc054e7cd1948060a93310.mockapi.io/users/comercio";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Explicit per-flag overrides, typically parsed from the command line.
/// `None` falls through to the config file, then to the defaults.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub users_url: Option<String>,
    pub comercios_url: Option<String>,
    pub session_path: Option<String>,
    pub timeout_secs: Option<u64>,
    pub session_ttl_hours: Option<i64>,
}

/// Fully resolved application settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub users_url: String,
    pub comercios_url: String,
    pub session_path: String,
    pub timeout_secs: u64,
    pub session_ttl_hours: i64,
}

impl Settings {
    /// Resolution order: override flag, then config file value, then default.
    pub fn resolve(overrides: Overrides, file: Option<&FileConfig>) -> Result<Self> {
        let settings = Self {
            users_url: overrides
                .users_url
                .or_else(|| file.and_then(|f| f.api.users_url.clone()))
                .unwrap_or_else(|| DEFAULT_USERS_URL.to_string()),
            comercios_url: overrides
                .comercios_url
                .or_else(|| file.and_then(|f| f.api.comercios_url.clone()))
                .unwrap_or_else(|| DEFAULT_COMERCIOS_URL.to_string()),
            session_path: overrides
                .session_path
                .or_else(|| file.and_then(|f| f.session.path.clone()))
                .unwrap_or_else(default_session_path),
            timeout_secs: overrides
                .timeout_secs
                .or_else(|| file.and_then(|f| f.api.timeout_seconds))
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            session_ttl_hours: overrides
                .session_ttl_hours
                .or_else(|| file.and_then(|f| f.session.ttl_hours))
                .unwrap_or(crate::core::session::DEFAULT_TTL_HOURS),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Convenience for `resolve` with a file loaded from `path` when given.
    pub fn load(overrides: Overrides, config_path: Option<&Path>) -> Result<Self> {
        let file = match config_path {
            Some(path) => Some(FileConfig::from_file(path)?),
            None => None,
        };
        Self::resolve(overrides, file.as_ref())
    }
}

fn default_session_path() -> String {
    match std::env::var("HOME") {
        Ok(home) => format!("{}/.linkcomercs/session.json", home),
        Err(_) => ".linkcomercs/session.json".to_string(),
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_url("api.users_url", &self.users_url)?;
        validate_url("api.comercios_url", &self.comercios_url)?;
        validate_positive_number("api.timeout_seconds", self.timeout_secs, 1)?;
        validate_positive_number(
            "session.ttl_hours",
            u64::try_from(self.session_ttl_hours).unwrap_or(0),
            1,
        )?;
        if self.session_path.is_empty() {
            return Err(crate::utils::error::DirectoryError::InvalidConfigValue {
                field: "session.path".to_string(),
                value: self.session_path.clone(),
                reason: "Path cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

impl ConfigProvider for Settings {
    fn users_endpoint(&self) -> &str {
        &self.users_url
    }

    fn comercios_endpoint(&self) -> &str {
        &self.comercios_url
    }

    fn session_path(&self) -> &str {
        &self.session_path
    }

    fn request_timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    fn session_ttl_hours(&self) -> i64 {
        self.session_ttl_hours
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_hosted_collections() {
        let settings = Settings::resolve(Overrides::default(), None).unwrap();
        assert_eq!(settings.users_url, DEFAULT_USERS_URL);
        assert_eq!(settings.comercios_url, DEFAULT_COMERCIOS_URL);
        assert_eq!(settings.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(settings.session_ttl_hours, 24);
    }

    #[test]
    fn overrides_win_over_file_values() {
        let file = FileConfig::from_toml_str(
            r#"
[api]
users_url = "https://file.example.com/users"
comercios_url = "https://file.example.com/comercio"
timeout_seconds = 10

[session]
path = "/tmp/file-session.json"
"#,
        )
        .unwrap();

        let overrides = Overrides {
            users_url: Some("https://flag.example.com/users".to_string()),
            ..Default::default()
        };
        let settings = Settings::resolve(overrides, Some(&file)).unwrap();

        assert_eq!(settings.users_url, "https://flag.example.com/users");
        assert_eq!(settings.comercios_url, "https://file.example.com/comercio");
        assert_eq!(settings.timeout_secs, 10);
        assert_eq!(settings.session_path, "/tmp/file-session.json");
    }

    #[test]
    fn invalid_endpoint_fails_validation() {
        let overrides = Overrides {
            users_url: Some("not-a-url".to_string()),
            ..Default::default()
        };
        assert!(Settings::resolve(overrides, None).is_err());
    }

    #[test]
    fn zero_timeout_fails_validation() {
        let overrides = Overrides {
            timeout_secs: Some(0),
            ..Default::default()
        };
        assert!(Settings::resolve(overrides, None).is_err());
    }
}
