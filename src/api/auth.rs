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


//! HTTP basic authentication against the piTunes server.
//!
//! The server guards every route, media streams included, so the same
//! credentials go to the API client and to the player.

use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::blocking::RequestBuilder;

/// A piTunes user. Users without a password send only their name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Credentials {
    pub(crate) username: String,
    pub(crate) password: Option<String>,
}

impl Credentials {
    pub(crate) fn new(username: impl Into<String>, password: Option<String>) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    /// The `Authorization` header value, for clients that set headers
    /// themselves.
    pub(crate) fn header_value(&self) -> String {
        let password = self.password.as_deref().unwrap_or_default();
        let token = STANDARD.encode(format!("{}:{}", self.username, password));
        format!("Basic {}", token)
    }

    pub(crate) fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(&self.username, self.password.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_encodes_name_and_password() {
        let credentials = Credentials::new("admin", Some("secret".to_string()));

        assert_eq!(credentials.header_value(), "Basic YWRtaW46c2VjcmV0");
    }

    #[test]
    fn header_without_password_keeps_separator() {
        let credentials = Credentials::new("guest", None);

        assert_eq!(credentials.header_value(), "Basic Z3Vlc3Q6");
    }

    #[test]
    fn request_carries_same_header() {
        let credentials = Credentials::new("admin", Some("secret".to_string()));
        let client = reqwest::blocking::Client::new();

        let request = credentials
            .apply(client.get("http://pi.local/api/graphql"))
            .build()
            .unwrap();

        let header = request.headers().get(reqwest::header::AUTHORIZATION).unwrap();
        assert_eq!(header.to_str().unwrap(), credentials.header_value());
    }
}
