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

//! Client for the piTunes server API.
//!
//! All library data comes from a single GraphQL endpoint at
//! `<api_base>/graphql`. Audio is not fetched here: the player streams it
//! directly from the URI returned by [`media_uri`].
//!
//! Every call blocks, so the client is only used from the task worker.
//! Queries are retried on transient failures; uploads are sent once, since
//! repeating one could create the same tracks twice.

mod auth;
mod error;
pub(crate) mod queries;
mod retry;

pub(crate) use auth::Credentials;
pub(crate) use error::ApiError;
pub(crate) use retry::RetryPolicy;

use std::{path::Path, time::Duration};

use reqwest::{
    StatusCode,
    blocking::{Client, RequestBuilder, multipart::Form},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};

use crate::{
    api::queries::Operation,
    model::{CollectionKind, IdName, Track, TrackId},
};

/// Location of the audio stream of a track.
pub(crate) fn media_uri(api_base: &str, id: &TrackId) -> String {
    format!("{}/tracks/{}.mp3", api_base.trim_end_matches('/'), id)
}

/// Extracts the track id from a location returned by an upload, for example
/// `/api/tracks/42.mp3`.
pub(crate) fn parse_track_id(location: &str) -> Result<TrackId, ApiError> {
    let invalid = || ApiError::InvalidLocation(location.to_string());

    let (_, file_name) = location.rsplit_once('/').ok_or_else(invalid)?;
    let id = file_name.strip_suffix(".mp3").ok_or_else(invalid)?;
    if id.is_empty() {
        return Err(invalid());
    }

    Ok(TrackId::new(id))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlRequest<'a> {
    query: &'a str,
    operation_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    variables: Option<Value>,
}

#[derive(Deserialize)]
struct GraphQlResponse {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct WithTracks {
    tracks: Vec<Track>,
}

/// Decodes a GraphQL response body and extracts the top level `field` of its
/// `data`.
///
/// An `errors` list fails the whole response even when partial data came
/// with it.
fn decode_response<T: DeserializeOwned>(body: &str, field: &str) -> Result<T, ApiError> {
    let response: GraphQlResponse = serde_json::from_str(body)?;

    if !response.errors.is_empty() {
        let messages: Vec<String> = response.errors.into_iter().map(|e| e.message).collect();
        return Err(ApiError::GraphQl(messages.join("; ")));
    }

    let value = response
        .data
        .and_then(|mut data| data.get_mut(field).map(Value::take))
        .filter(|value| !value.is_null())
        .ok_or_else(|| ApiError::MissingData(field.to_string()))?;

    Ok(serde_json::from_value(value)?)
}

pub(crate) struct PiTunesClient {
    http: Client,
    api_base: String,
    credentials: Option<Credentials>,
    retry: RetryPolicy,
}

impl PiTunesClient {
    /// Creates a client for the API rooted at `api_base`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] unless `api_base` is an `http` or
    /// `https` URL.
    pub(crate) fn new(api_base: &str, timeout: Duration) -> Result<Self, ApiError> {
        let api_base = api_base.trim_end_matches('/').to_string();
        if !api_base.starts_with("http://") && !api_base.starts_with("https://") {
            return Err(ApiError::InvalidUrl(api_base));
        }

        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("pitunes-tui/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_base,
            credentials: None,
            retry: RetryPolicy::none(),
        })
    }

    pub(crate) fn with_credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.credentials = credentials;
        self
    }

    pub(crate) fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub(crate) fn api_base(&self) -> &str {
        &self.api_base
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some(credentials) => credentials.apply(request),
            None => request,
        }
    }

    /// Lists the items of a grouping collection. A collection of plain
    /// tracks has no items.
    pub(crate) fn collection(&self, kind: CollectionKind) -> Result<Vec<IdName>, ApiError> {
        match queries::items(kind) {
            Some(operation) => self.query(&operation, None),
            None => Ok(Vec::new()),
        }
    }

    /// Lists the tracks of one item of a grouping collection, or all tracks
    /// for [`CollectionKind::Tracks`].
    pub(crate) fn collection_tracks(
        &self,
        kind: CollectionKind,
        id: &str,
    ) -> Result<Vec<Track>, ApiError> {
        match queries::item_tracks(kind) {
            Some(operation) => {
                let item: WithTracks = self.query(&operation, Some(json!({ "id": id })))?;
                Ok(item.tracks)
            }
            None => self.tracks(),
        }
    }

    pub(crate) fn tracks(&self) -> Result<Vec<Track>, ApiError> {
        self.query(&queries::TRACKS, None)
    }

    pub(crate) fn track(&self, id: &TrackId) -> Result<Track, ApiError> {
        self.query(&queries::TRACK, Some(json!({ "id": id.as_str() })))
    }

    /// Uploads an audio file, returning the ids of the tracks the server
    /// created from it.
    pub(crate) fn upload(&self, path: &Path) -> Result<Vec<TrackId>, ApiError> {
        if !path.is_file() {
            return Err(ApiError::FileNotFound(path.display().to_string()));
        }

        log::debug!("Uploading {}", path.display());

        let form = Form::new().file("file", path)?;
        let response = self
            .authorize(self.http.post(format!("{}/tracks", self.api_base)))
            .multipart(form)
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if status != StatusCode::CREATED {
            return Err(ApiError::from_status(status.as_u16(), body));
        }

        let locations: Vec<String> = serde_json::from_str(&body)?;
        let ids = locations
            .iter()
            .map(|location| parse_track_id(location))
            .collect::<Result<Vec<_>, _>>()?;

        log::info!("Uploaded {} as {} track(s)", path.display(), ids.len());

        Ok(ids)
    }

    fn query<T: DeserializeOwned>(
        &self,
        operation: &Operation,
        variables: Option<Value>,
    ) -> Result<T, ApiError> {
        let request = GraphQlRequest {
            query: operation.query,
            operation_name: operation.name,
            variables,
        };

        log::trace!("GraphQL {}", operation.name);

        let body = self.retry.run(operation.name, || self.post_graphql(&request))?;

        decode_response(&body, operation.field)
    }

    fn post_graphql(&self, request: &GraphQlRequest<'_>) -> Result<String, ApiError> {
        let response = self
            .authorize(self.http.post(format!("{}/graphql", self.api_base)))
            .json(request)
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(ApiError::from_status(status.as_u16(), body));
        }

        Ok(body)
    }
}
