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

//! Domain models and core data structures.
//!
//! This module defines the library entities served by the piTunes server
//! (albums, artists, genres, playlists and tracks) as they arrive in GraphQL
//! responses. The server is the source of truth, so these values are never
//! edited in place; a refresh replaces them wholesale.

pub(crate) mod queue;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque, stable identifier of a track.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct TrackId(String);

impl TrackId {
    pub(crate) fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An identifier and display name pair, the shape shared by albums, artists,
/// genres and playlists.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct IdName {
    pub(crate) id: String,
    pub(crate) name: String,
}

/// A playable track.
///
/// Relations to album, artist and genre are optional; a track with none of
/// them is still playable because the media location depends on `id` alone.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Track {
    pub(crate) id: TrackId,
    pub(crate) name: String,
    #[serde(rename = "duration", default)]
    pub(crate) duration_ms: u64,
    #[serde(default)]
    pub(crate) album: Option<IdName>,
    #[serde(default)]
    pub(crate) artist: Option<IdName>,
    #[serde(default)]
    pub(crate) genre: Option<IdName>,
    #[serde(default)]
    pub(crate) track_number: Option<i32>,
}

// Same track iff same id, metadata may differ between fetches.
impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Track {}

impl Track {
    pub(crate) fn artist_name(&self) -> Option<&str> {
        self.artist.as_ref().map(|artist| artist.name.as_str())
    }

    pub(crate) fn album_name(&self) -> Option<&str> {
        self.album.as_ref().map(|album| album.name.as_str())
    }
}

/// The top level collections exposed by the library browser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub(crate) enum CollectionKind {
    #[default]
    Albums,
    Artists,
    Genres,
    Playlists,
    Tracks,
}

impl CollectionKind {
    pub(crate) const ALL: [CollectionKind; 5] = [
        CollectionKind::Albums,
        CollectionKind::Artists,
        CollectionKind::Genres,
        CollectionKind::Playlists,
        CollectionKind::Tracks,
    ];

    pub(crate) fn title(&self) -> &'static str {
        match self {
            CollectionKind::Albums => "Albums",
            CollectionKind::Artists => "Artists",
            CollectionKind::Genres => "Genres",
            CollectionKind::Playlists => "Playlists",
            CollectionKind::Tracks => "Tracks",
        }
    }

    /// Whether this collection groups tracks under named items, as opposed to
    /// listing tracks directly.
    pub(crate) fn has_items(&self) -> bool {
        !matches!(self, CollectionKind::Tracks)
    }
}

#[cfg(test)]
pub(crate) fn track(id: &str, duration_ms: u64) -> Track {
    Track {
        id: TrackId::new(id),
        name: format!("Track {id}"),
        duration_ms,
        album: None,
        artist: None,
        genre: None,
        track_number: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_decodes_with_missing_relations() {
        let json = r#"{"id":"7","name":"Intro","duration":61000,"artist":null}"#;
        let track: Track = serde_json::from_str(json).unwrap();

        assert_eq!(track.id.as_str(), "7");
        assert_eq!(track.duration_ms, 61000);
        assert!(track.artist_name().is_none());
        assert!(track.album_name().is_none());
        assert!(track.track_number.is_none());
    }

    #[test]
    fn track_decodes_relations_and_track_number() {
        let json = r#"{
            "id": "3",
            "name": "Song",
            "duration": 1000,
            "album": {"id": "1", "name": "Record"},
            "artist": {"id": "2", "name": "Band"},
            "trackNumber": 4
        }"#;
        let track: Track = serde_json::from_str(json).unwrap();

        assert_eq!(track.album_name(), Some("Record"));
        assert_eq!(track.artist_name(), Some("Band"));
        assert_eq!(track.track_number, Some(4));
    }

    #[test]
    fn tracks_are_equal_by_id_only() {
        let a = track("1", 1000);
        let mut b = track("1", 2000);
        b.name = "Renamed".to_string();

        assert_eq!(a, b);
        assert_ne!(a, track("2", 1000));
    }
}
