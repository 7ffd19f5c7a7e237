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

//! Playback queue management.
//!
//! This module provides state for the playback queue: an ordered list of
//! tracks where the first track is the one playing now. Moving to the next or
//! previous track is a rotation of the list, so the queue is conceptually
//! circular.
//!
//! Every structural change bumps an update stamp. The stamp strictly
//! increases, which lets consumers detect that the queue changed even when the
//! head track stayed the same.

use crate::model::Track;

pub(crate) struct Queue {
    items: Vec<Track>,
    updated_at: u64,
}

impl Queue {
    pub(crate) fn new() -> Self {
        Self {
            items: Vec::new(),
            updated_at: 0,
        }
    }

    /// Replaces the whole queue. Duplicate tracks are kept as given.
    pub(crate) fn replace(&mut self, items: Vec<Track>) {
        self.items = items;
        self.touch();
    }

    /// Rotates the queue left by `offset` positions, so `1` moves to the next
    /// track and `-1` brings the last track to the front.
    ///
    /// Rotating an empty queue does nothing.
    pub(crate) fn rotate(&mut self, offset: i64) {
        if self.items.is_empty() {
            return;
        }

        rotate_left(&mut self.items, offset);
        self.touch();
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
        self.touch();
    }

    /// The track playing now, if any.
    pub(crate) fn current(&self) -> Option<&Track> {
        self.items.first()
    }

    pub(crate) fn items(&self) -> &[Track] {
        &self.items
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn updated_at(&self) -> u64 {
        self.updated_at
    }

    pub(crate) fn total_duration_ms(&self) -> u64 {
        self.items.iter().map(|track| track.duration_ms).sum()
    }

    fn touch(&mut self) {
        self.updated_at += 1;
    }
}

/// Cyclic left rotation by `((offset mod len) + len) mod len` positions.
///
/// Negative offsets rotate right. An empty slice is left untouched.
pub(crate) fn rotate_left<T>(items: &mut [T], offset: i64) {
    let len = items.len();
    if len == 0 {
        return;
    }

    let shift = offset.rem_euclid(len as i64) as usize;
    items.rotate_left(shift);
}
