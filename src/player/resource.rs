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

//! Adapter over the single playback resource.
//!
//! [`AudioResource`] is the only owner of an [`AudioBackend`]. It translates
//! playback intent into backend calls and keeps a mirror of the state the
//! resource reports (paused flag, position, duration), which is what the
//! user interface reads.
//!
//! Every call to [`AudioResource::play`] starts a new numbered load. End and
//! failure events for any other load are stale and are dropped.

use anyhow::Result;

use crate::player::{AudioBackend, PlayerEvent, PlayerState, ResourceError};

/// Notable resource events surfaced to the playback controller.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ResourceSignal {
    Ended,
    Failed(ResourceError),
}

pub(crate) struct AudioResource<B: AudioBackend> {
    backend: B,
    source: Option<String>,
    paused: bool,
    current_time: f64,
    duration: Option<f64>,
    ended: bool,
    failed: bool,
    load: u64,
}

impl<B: AudioBackend> AudioResource<B> {
    pub(crate) fn new(backend: B) -> Self {
        Self {
            backend,
            source: None,
            paused: true,
            current_time: 0.0,
            duration: None,
            ended: false,
            failed: false,
            load: 0,
        }
    }

    /// Sets the source to `uri` and asks the resource to start playing it.
    ///
    /// Playback may still not start (for example while the stream buffers);
    /// that shows up through [`AudioResource::paused`] rather than as an
    /// error.
    pub(crate) fn play(&mut self, uri: &str) -> Result<()> {
        self.source = Some(uri.to_string());
        self.current_time = 0.0;
        self.duration = None;
        self.ended = false;
        self.failed = false;
        self.load += 1;

        self.backend.load(uri, self.load)
    }

    /// Resumes when paused, pauses otherwise. Does nothing without a source.
    pub(crate) fn toggle_paused(&mut self) -> Result<()> {
        if self.source.is_none() {
            return Ok(());
        }

        self.backend.set_paused(!self.paused)
    }

    /// Moves to `seconds`, clamped to the loaded duration. Does nothing until
    /// a duration is known.
    pub(crate) fn seek(&mut self, seconds: f64) -> Result<()> {
        let Some(duration) = self.duration else {
            return Ok(());
        };

        let position = seconds.clamp(0.0, duration);
        self.current_time = position;
        self.backend.seek_to(position)
    }

    /// Puts the position back to zero.
    ///
    /// A source that already played to its end, or failed to play, is loaded
    /// again.
    pub(crate) fn rewind(&mut self) -> Result<()> {
        let Some(uri) = self.source.clone() else {
            return Ok(());
        };

        if self.ended || self.failed {
            return self.play(&uri);
        }

        self.current_time = 0.0;
        self.backend.seek_to(0.0)
    }

    /// Unbinds the current source.
    pub(crate) fn stop(&mut self) -> Result<()> {
        if self.source.take().is_none() {
            return Ok(());
        }

        self.current_time = 0.0;
        self.duration = None;
        self.ended = false;
        self.failed = false;

        self.backend.stop()
    }

    /// Mirrors a native resource event into the observable state.
    pub(crate) fn handle_event(&mut self, event: PlayerEvent) -> Option<ResourceSignal> {
        match event {
            PlayerEvent::PauseChanged(paused) => {
                self.paused = paused;
                None
            }
            PlayerEvent::TimeChanged(seconds) => {
                self.current_time = seconds;
                None
            }
            PlayerEvent::DurationChanged(duration) => {
                self.duration = Some(duration);
                None
            }
            PlayerEvent::Ended { load } => {
                if !self.is_current(load) {
                    return None;
                }
                self.ended = true;
                if let Some(duration) = self.duration {
                    self.current_time = duration;
                }
                Some(ResourceSignal::Ended)
            }
            PlayerEvent::Failed { load, error } => {
                if !self.is_current(load) {
                    return None;
                }
                self.failed = true;
                Some(ResourceSignal::Failed(error))
            }
        }
    }

    fn is_current(&self, load: u64) -> bool {
        let current = self.source.is_some() && load == self.load;
        if !current {
            log::debug!("Dropping event for load {}, current is {}", load, self.load);
        }
        current
    }

    /// Number of the latest load, matching the events it produces.
    pub(crate) fn load(&self) -> u64 {
        self.load
    }

    pub(crate) fn paused(&self) -> bool {
        self.paused
    }

    pub(crate) fn current_time(&self) -> f64 {
        self.current_time
    }

    pub(crate) fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub(crate) fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub(crate) fn ended(&self) -> bool {
        self.ended
    }

    pub(crate) fn failed(&self) -> bool {
        self.failed
    }

    pub(crate) fn state(&self) -> PlayerState {
        if self.source().is_none() || self.ended() || self.failed() {
            PlayerState::Stopped
        } else if self.paused() {
            PlayerState::Paused
        } else {
            PlayerState::Playing
        }
    }

    #[cfg(test)]
    pub(crate) fn backend(&self) -> &B {
        &self.backend
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use anyhow::Result;

    use crate::player::AudioBackend;

    /// A backend call, as observed by [`RecordingBackend`].
    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum Call {
        Load(String),
        SetPaused(bool),
        SeekTo(f64),
        Stop,
    }

    /// Backend double that records every call in order.
    #[derive(Default)]
    pub(crate) struct RecordingBackend {
        pub(crate) calls: Vec<Call>,
    }

    impl RecordingBackend {
        pub(crate) fn last(&self) -> Option<&Call> {
            self.calls.last()
        }
    }

    impl AudioBackend for RecordingBackend {
        fn load(&mut self, uri: &str, _load: u64) -> Result<()> {
            self.calls.push(Call::Load(uri.to_string()));
            Ok(())
        }

        fn set_paused(&mut self, paused: bool) -> Result<()> {
            self.calls.push(Call::SetPaused(paused));
            Ok(())
        }

        fn seek_to(&mut self, seconds: f64) -> Result<()> {
            self.calls.push(Call::SeekTo(seconds));
            Ok(())
        }

        fn stop(&mut self) -> Result<()> {
            self.calls.push(Call::Stop);
            Ok(())
        }
    }
}
