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

//! Media browser state management.
//!
//! This module provides state for the library browser widget: the selected
//! collection (albums, artists and so on), the items of that collection and
//! the tracks of the selected item, and navigation between the three panes.
//!
//! The browser also issues the fetch tasks that fill its panes, so that every
//! request carries a ticket from the slot of the pane it fills.

use ratatui::widgets::ListState;

use crate::{
    model::{CollectionKind, IdName, Track},
    tasks::{AppTask, RequestSlot, Ticket},
};

/// Where the displayed tracks came from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum TracksSource {
    Unloaded,
    Library,
    Item(String),
}

#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub(crate) enum MediaBrowserPane {
    #[default]
    Collection,
    Item,
    Track,
}

pub(crate) struct MediaBrowser {
    pub(crate) active_pane: MediaBrowserPane,

    pub(crate) items: Vec<IdName>,
    pub(crate) tracks: Vec<Track>,

    pub(crate) collections_state: ListState,
    pub(crate) items_state: ListState,
    pub(crate) tracks_state: ListState,

    tracks_source: TracksSource,

    items_slot: RequestSlot,
    tracks_slot: RequestSlot,
}

impl Default for MediaBrowser {
    fn default() -> Self {
        Self {
            active_pane: MediaBrowserPane::default(),
            items: Vec::new(),
            tracks: Vec::new(),
            collections_state: ListState::default().with_selected(Some(0)),
            items_state: ListState::default(),
            tracks_state: ListState::default(),
            tracks_source: TracksSource::Unloaded,
            items_slot: RequestSlot::new(),
            tracks_slot: RequestSlot::new(),
        }
    }
}

impl MediaBrowser {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn selected_kind(&self) -> CollectionKind {
        self.collections_state
            .selected()
            .and_then(|index| CollectionKind::ALL.get(index).copied())
            .unwrap_or_default()
    }

    pub(crate) fn selected_item(&self) -> Option<&IdName> {
        let index = self.items_state.selected()?;
        self.items.get(index)
    }

    pub(crate) fn selected_track_index(&self) -> Option<usize> {
        self.tracks_state
            .selected()
            .filter(|&index| index < self.tracks.len())
    }

    /// Whether the displayed tracks belong to the selected item, or to the
    /// whole library when plain tracks are selected.
    pub(crate) fn tracks_match_selection(&self) -> bool {
        match &self.tracks_source {
            TracksSource::Unloaded => false,
            TracksSource::Library => !self.selected_kind().has_items(),
            TracksSource::Item(id) => {
                self.selected_kind().has_items()
                    && self.selected_item().map(|item| item.id.as_str()) == Some(id.as_str())
            }
        }
    }

    pub(crate) fn next_pane(&mut self) {
        let has_items = self.selected_kind().has_items();
        self.active_pane = match self.active_pane {
            MediaBrowserPane::Collection if has_items => MediaBrowserPane::Item,
            MediaBrowserPane::Collection => MediaBrowserPane::Track,
            MediaBrowserPane::Item => MediaBrowserPane::Track,
            MediaBrowserPane::Track => MediaBrowserPane::Collection,
        };
    }

    pub(crate) fn previous_pane(&mut self) {
        let has_items = self.selected_kind().has_items();
        self.active_pane = match self.active_pane {
            MediaBrowserPane::Collection => MediaBrowserPane::Track,
            MediaBrowserPane::Item => MediaBrowserPane::Collection,
            MediaBrowserPane::Track if has_items => MediaBrowserPane::Item,
            MediaBrowserPane::Track => MediaBrowserPane::Collection,
        };
    }

    /// Moves the selection of the active pane down, returning the fetch task
    /// the new selection needs, if any.
    pub(crate) fn next(&mut self) -> Option<AppTask> {
        self.step(move_next)
    }

    /// Moves the selection of the active pane up, returning the fetch task
    /// the new selection needs, if any.
    pub(crate) fn previous(&mut self) -> Option<AppTask> {
        self.step(move_previous)
    }

    fn step(&mut self, mv: fn(&mut ListState, usize)) -> Option<AppTask> {
        match self.active_pane {
            MediaBrowserPane::Collection => {
                mv(&mut self.collections_state, CollectionKind::ALL.len());
                Some(self.request_collection())
            }
            MediaBrowserPane::Item => {
                let before = self.items_state.selected();
                mv(&mut self.items_state, self.items.len());
                (self.items_state.selected() != before)
                    .then(|| self.request_tracks())
                    .flatten()
            }
            MediaBrowserPane::Track => {
                mv(&mut self.tracks_state, self.tracks.len());
                None
            }
        }
    }

    /// Starts loading the selected collection, superseding any collection or
    /// track request still in flight.
    pub(crate) fn request_collection(&mut self) -> AppTask {
        let kind = self.selected_kind();
        self.items_slot.cancel();
        self.tracks_slot.cancel();

        if kind.has_items() {
            AppTask::LoadCollection {
                ticket: self.items_slot.issue(),
                kind,
            }
        } else {
            self.set_collection_items(Vec::new());
            AppTask::LoadTracks {
                ticket: self.tracks_slot.issue(),
                kind,
                item_id: None,
            }
        }
    }

    /// Starts loading the tracks of the selected item, superseding any track
    /// request still in flight.
    pub(crate) fn request_tracks(&mut self) -> Option<AppTask> {
        let kind = self.selected_kind();
        let item_id = self.selected_item().map(|item| item.id.clone())?;

        Some(AppTask::LoadTracks {
            ticket: self.tracks_slot.issue(),
            kind,
            item_id: Some(item_id),
        })
    }

    /// Applies a fetched collection. Returns `false` for a superseded result
    /// or one for a collection that is no longer selected.
    pub(crate) fn set_items(
        &mut self,
        ticket: &Ticket,
        kind: CollectionKind,
        items: Vec<IdName>,
    ) -> bool {
        if !ticket.is_current() || kind != self.selected_kind() {
            return false;
        }

        self.set_collection_items(items);
        true
    }

    /// Applies fetched tracks. Returns `false` for a superseded result.
    pub(crate) fn set_tracks(
        &mut self,
        ticket: &Ticket,
        item_id: Option<String>,
        tracks: Vec<Track>,
    ) -> bool {
        if !ticket.is_current() {
            return false;
        }

        self.tracks = tracks;
        self.tracks_source = item_id.map_or(TracksSource::Library, TracksSource::Item);
        self.tracks_state
            .select((!self.tracks.is_empty()).then_some(0));
        true
    }

    /// Shows a new collection. Its tracks are loaded separately, so the
    /// tracks of the previous collection go.
    fn set_collection_items(&mut self, items: Vec<IdName>) {
        self.items = items;
        self.items_state.select((!self.items.is_empty()).then_some(0));

        self.tracks.clear();
        self.tracks_source = TracksSource::Unloaded;
        self.tracks_state.select(None);
    }
}

fn move_next(state: &mut ListState, len: usize) {
    if len == 0 {
        return;
    }
    let i = match state.selected() {
        Some(i) if i + 1 < len => i + 1,
        _ => 0,
    };
    state.select(Some(i));
}

fn move_previous(state: &mut ListState, len: usize) {
    if len == 0 {
        return;
    }
    let i = match state.selected() {
        Some(i) if i > 0 && i < len => i - 1,
        Some(0) => len - 1,
        _ => 0,
    };
    state.select(Some(i));
}
