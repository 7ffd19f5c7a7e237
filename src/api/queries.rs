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

//! GraphQL operations issued by the client.
//!
//! Only the fields the client displays or plays are requested.

use crate::model::CollectionKind;

macro_rules! track_fields {
    () => {
        "id name duration trackNumber album { id name } artist { id name } genre { id name }"
    };
}

/// A named GraphQL operation and the top level `data` field it answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Operation {
    pub(crate) name: &'static str,
    pub(crate) query: &'static str,
    pub(crate) field: &'static str,
}

pub(crate) const ALBUMS: Operation = Operation {
    name: "AlbumsQuery",
    query: "query AlbumsQuery { albums { id name } }",
    field: "albums",
};

pub(crate) const ARTISTS: Operation = Operation {
    name: "ArtistsQuery",
    query: "query ArtistsQuery { artists { id name } }",
    field: "artists",
};

pub(crate) const GENRES: Operation = Operation {
    name: "GenresQuery",
    query: "query GenresQuery { genres { id name } }",
    field: "genres",
};

pub(crate) const PLAYLISTS: Operation = Operation {
    name: "PlaylistsQuery",
    query: "query PlaylistsQuery { playlists { id name } }",
    field: "playlists",
};

pub(crate) const TRACKS: Operation = Operation {
    name: "TracksQuery",
    query: concat!("query TracksQuery { tracks { ", track_fields!(), " } }"),
    field: "tracks",
};

pub(crate) const ALBUM_TRACKS: Operation = Operation {
    name: "AlbumTracksQuery",
    query: concat!(
        "query AlbumTracksQuery($id: ID!) { album(id: $id) { id name tracks { ",
        track_fields!(),
        " } } }"
    ),
    field: "album",
};

pub(crate) const ARTIST_TRACKS: Operation = Operation {
    name: "ArtistTracksQuery",
    query: concat!(
        "query ArtistTracksQuery($id: ID!) { artist(id: $id) { id name tracks { ",
        track_fields!(),
        " } } }"
    ),
    field: "artist",
};

pub(crate) const GENRE_TRACKS: Operation = Operation {
    name: "GenreTracksQuery",
    query: concat!(
        "query GenreTracksQuery($id: ID!) { genre(id: $id) { id name tracks { ",
        track_fields!(),
        " } } }"
    ),
    field: "genre",
};

pub(crate) const PLAYLIST_TRACKS: Operation = Operation {
    name: "PlaylistTracksQuery",
    query: concat!(
        "query PlaylistTracksQuery($id: ID!) { playlist(id: $id) { id name tracks { ",
        track_fields!(),
        " } } }"
    ),
    field: "playlist",
};

pub(crate) const TRACK: Operation = Operation {
    name: "TrackQuery",
    query: concat!("query TrackQuery($id: ID!) { track(id: $id) { ", track_fields!(), " } }"),
    field: "track",
};

/// The operation listing the items of `kind`, or `None` for a collection that
/// lists tracks directly.
pub(crate) fn items(kind: CollectionKind) -> Option<Operation> {
    match kind {
        CollectionKind::Albums => Some(ALBUMS),
        CollectionKind::Artists => Some(ARTISTS),
        CollectionKind::Genres => Some(GENRES),
        CollectionKind::Playlists => Some(PLAYLISTS),
        CollectionKind::Tracks => None,
    }
}

/// The operation listing the tracks of one item of `kind`.
pub(crate) fn item_tracks(kind: CollectionKind) -> Option<Operation> {
    match kind {
        CollectionKind::Albums => Some(ALBUM_TRACKS),
        CollectionKind::Artists => Some(ARTIST_TRACKS),
        CollectionKind::Genres => Some(GENRE_TRACKS),
        CollectionKind::Playlists => Some(PLAYLIST_TRACKS),
        CollectionKind::Tracks => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_names_match_query_text() {
        let all = [
            ALBUMS,
            ARTISTS,
            GENRES,
            PLAYLISTS,
            TRACKS,
            ALBUM_TRACKS,
            ARTIST_TRACKS,
            GENRE_TRACKS,
            PLAYLIST_TRACKS,
            TRACK,
        ];

        for operation in all {
            let prefix = format!("query {}", operation.name);
            assert!(operation.query.starts_with(&prefix), "{}", operation.name);
            assert!(operation.query.contains(operation.field), "{}", operation.name);
        }
    }

    #[test]
    fn every_grouping_kind_has_both_operations() {
        for kind in CollectionKind::ALL {
            assert_eq!(items(kind).is_some(), kind.has_items());
            assert_eq!(item_tracks(kind).is_some(), kind.has_items());
        }
    }

    #[test]
    fn track_queries_request_duration() {
        assert!(TRACKS.query.contains("duration"));
        assert!(PLAYLIST_TRACKS.query.contains("tracks { id name duration"));
    }
}
