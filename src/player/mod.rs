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

//! Audio playback control and state management.
//!
//! This module is layered from the bottom up:
//!
//! * [`AudioBackend`] is the narrow interface to the one underlying playback
//!   resource. [`AudioPlayer`] implements it by forwarding commands to a
//!   background worker thread that owns an MPV handle, so that audio
//!   operations never block the main application thread.
//! * [`resource::AudioResource`] adapts a backend into the operations the
//!   rest of the application uses (play, pause toggle, seek) and mirrors the
//!   state reported back by the resource.
//! * [`controller::PlaybackController`] keeps the resource in step with the
//!   playback queue.

mod commands;
pub(crate) mod controller;
pub(crate) mod resource;

use std::sync::mpsc;

use anyhow::Result;
use thiserror::Error;

use crate::{events::AppEvent, player::commands::AudioPlayerCommand};

/// Represents the current playback status of the audio resource.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum PlayerState {
    Playing,
    Paused,
    Stopped,
}

/// Native notifications raised by the playback resource.
///
/// End and failure events carry the number of the load they belong to, as
/// given to [`AudioBackend::load`], so that a late event for a source that has
/// since been replaced can be told apart from one for the current source.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PlayerEvent {
    PauseChanged(bool),
    TimeChanged(f64),
    DurationChanged(f64),
    /// The source of `load` played through to its end.
    Ended { load: u64 },
    /// The source of `load` could not be played.
    Failed { load: u64, error: ResourceError },
}

/// Reasons a source could not be played.
#[derive(Debug, Clone, PartialEq, Error)]
pub(crate) enum ResourceError {
    /// The source could not be fetched or opened. Selecting the track again
    /// may succeed.
    #[error("failed to load media: {0}")]
    Load(String),

    /// The source was fetched but is not playable audio.
    #[error("media is not playable: {0}")]
    Decode(String),
}

impl ResourceError {
    pub(crate) fn is_recoverable(&self) -> bool {
        matches!(self, ResourceError::Load(_))
    }
}

/// The primitive operations of the single playback resource.
pub(crate) trait AudioBackend {
    /// Sets the source and starts playback from the beginning.
    ///
    /// `load` numbers this request; the end or failure of the source is
    /// reported with the same number.
    fn load(&mut self, uri: &str, load: u64) -> Result<()>;

    fn set_paused(&mut self, paused: bool) -> Result<()>;

    /// Moves to an absolute position in seconds.
    fn seek_to(&mut self, seconds: f64) -> Result<()>;

    /// Unloads the current source.
    fn stop(&mut self) -> Result<()>;
}

/// A handle to the MPV audio engine.
///
/// This struct acts as a command proxy; it does not perform audio processing
/// itself but instead sends instructions to a background worker thread.
pub(crate) struct AudioPlayer {
    /// Channel for sending commands to the background worker thread.
    command_tx: mpsc::Sender<AudioPlayerCommand>,
}

impl AudioPlayer {
    /// Spawns the audio worker thread and returns a new player handle.
    ///
    /// # Arguments
    ///
    /// * `event_tx` - A channel to send resource events (progress, pause
    ///   changes, end of track, failures) back to the main event loop.
    /// * `authorization` - Value of the `Authorization` header sent with every
    ///   media request, if the server needs one.
    pub(crate) fn new(event_tx: mpsc::Sender<AppEvent>, authorization: Option<String>) -> Result<Self> {
        let (command_tx, command_rx) = mpsc::channel::<AudioPlayerCommand>();

        commands::spawn_player_worker(command_rx, event_tx, authorization);

        Ok(Self { command_tx })
    }
}

impl AudioBackend for AudioPlayer {
    fn load(&mut self, uri: &str, load: u64) -> Result<()> {
        self.command_tx.send(AudioPlayerCommand::Load {
            uri: uri.to_string(),
            load,
        })?;
        Ok(())
    }

    fn set_paused(&mut self, paused: bool) -> Result<()> {
        self.command_tx
            .send(AudioPlayerCommand::SetPaused(paused))?;
        Ok(())
    }

    fn seek_to(&mut self, seconds: f64) -> Result<()> {
        self.command_tx.send(AudioPlayerCommand::SeekTo(seconds))?;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.command_tx.send(AudioPlayerCommand::Stop)?;
        Ok(())
    }
}
