// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Application configuration.
//!
//! This module manages the application configuration file. Fields missing
//! from the file take their default values.

use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    api::{Credentials, RetryPolicy},
    player::controller::RestartPolicy,
};

pub(crate) const CONFIG_NAME: &str = "pitunes-tui";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub(crate) version: u32,

    /// Root URL of the piTunes server, the API lives under `/api`.
    pub(crate) server_url: String,

    /// Restart the current track whenever the queue changes, even when the
    /// track playing stays the same.
    pub(crate) restart_on_queue_update: bool,

    pub(crate) request_timeout_secs: u64,

    /// Attempts per library request, the first one included.
    pub(crate) request_attempts: u32,

    /// Server user. Without one no credentials are sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) password: Option<String>,

    /// Default log filter, `PITUNES_LOG` takes precedence.
    pub(crate) log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server_url: "http://localhost:8080".to_string(),
            restart_on_queue_update: true,
            request_timeout_secs: 30,
            request_attempts: 4,
            username: None,
            password: None,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub(crate) fn api_base(&self) -> String {
        format!("{}/api", self.server_url.trim_end_matches('/'))
    }

    pub(crate) fn restart_policy(&self) -> RestartPolicy {
        if self.restart_on_queue_update {
            RestartPolicy::EveryUpdate
        } else {
            RestartPolicy::HeadChange
        }
    }

    pub(crate) fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub(crate) fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.request_attempts)
    }

    pub(crate) fn credentials(&self) -> Option<Credentials> {
        self.username
            .as_deref()
            .filter(|username| !username.is_empty())
            .map(|username| Credentials::new(username, self.password.clone()))
    }
}

pub(crate) fn load_config() -> Result<AppConfig, confy::ConfyError> {
    confy::load(CONFIG_NAME, None)
}

/// The directory holding the configuration file, also used for the log file.
pub(crate) fn config_dir() -> Option<PathBuf> {
    confy::get_configuration_file_path(CONFIG_NAME, None)
        .ok()?
        .parent()
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn defaults() {
        let config = AppConfig::default();

        assert_eq!(config.api_base(), "http://localhost:8080/api");
        assert_eq!(config.restart_policy(), RestartPolicy::EveryUpdate);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.retry_policy().attempts, 4);
        assert_eq!(config.credentials(), None);
    }

    #[test]
    fn credentials_need_a_username() {
        let config = AppConfig {
            username: Some("admin".to_string()),
            password: Some("secret".to_string()),
            ..AppConfig::default()
        };
        assert_eq!(
            config.credentials(),
            Some(Credentials::new("admin", Some("secret".to_string())))
        );

        let config = AppConfig {
            username: Some(String::new()),
            password: Some("secret".to_string()),
            ..AppConfig::default()
        };
        assert_eq!(config.credentials(), None);
    }

    #[test]
    fn api_base_ignores_trailing_slash() {
        let config = AppConfig {
            server_url: "http://pi.local:8080/".to_string(),
            ..AppConfig::default()
        };

        assert_eq!(config.api_base(), "http://pi.local:8080/api");
    }

    #[test]
    fn partial_file_takes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "server_url = \"http://pi.local\"\nrestart_on_queue_update = false\nusername = \"admin\"\n",
        )
        .unwrap();

        let config: AppConfig = confy::load_path(&path).unwrap();

        assert_eq!(config.server_url, "http://pi.local");
        assert_eq!(config.restart_policy(), RestartPolicy::HeadChange);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.credentials(), Some(Credentials::new("admin", None)));
    }

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config: AppConfig = confy::load_path(&path).unwrap();

        assert_eq!(config, AppConfig::default());
        assert!(path.exists());
    }
}
