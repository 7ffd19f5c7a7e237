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

use thiserror::Error;

/// Errors raised while talking to the piTunes server.
#[derive(Error, Debug)]
pub(crate) enum ApiError {
    #[error("invalid server URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server rejected the configured credentials, or none were given.
    #[error("not authorised, check the username and password")]
    Unauthorized,

    /// The server answered with a non-success status.
    #[error("server error ({status}): {message}")]
    Status { status: u16, message: String },

    /// The GraphQL response carried an `errors` list.
    #[error("query failed: {0}")]
    GraphQl(String),

    #[error("response has no {0}")]
    MissingData(String),

    #[error("failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An upload location that does not name an `.mp3` track resource.
    #[error("unexpected upload location: {0}")]
    InvalidLocation(String),
}

impl ApiError {
    /// Maps a non-success HTTP status to an error.
    pub(crate) fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => ApiError::Unauthorized,
            _ => ApiError::Status { status, message },
        }
    }

    /// Whether repeating the same request may succeed: connection problems,
    /// timeouts, rate limiting and server side errors.
    pub(crate) fn is_transient(&self) -> bool {
        match self {
            ApiError::Request(e) => e.is_timeout() || e.is_connect(),
            ApiError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorised_status_has_its_own_error() {
        assert!(matches!(
            ApiError::from_status(401, String::new()),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(404, "nope".to_string()),
            ApiError::Status { status: 404, .. }
        ));
    }

    #[test]
    fn only_server_side_statuses_are_transient() {
        for status in [429, 500, 502, 503] {
            assert!(ApiError::from_status(status, String::new()).is_transient(), "{status}");
        }
        for status in [400, 401, 403, 404] {
            assert!(!ApiError::from_status(status, String::new()).is_transient(), "{status}");
        }
        assert!(!ApiError::GraphQl("bad".to_string()).is_transient());
        assert!(!ApiError::MissingData("album".to_string()).is_transient());
    }
}
