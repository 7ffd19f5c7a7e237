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

//! MPV-backed playback resource and event processing.
//!
//! This module owns the one `libmpv` context used by the application. MPV
//! streams the derived track URIs straight from the server, so no download or
//! decoding happens here. A background worker thread bridges the
//! application's command-based interface and MPV's property observation
//! system.
//!
//! # Architecture
//!
//! The engine operates using a dual-channel communication pattern:
//! 1. **Command Channel**: Receives [`AudioPlayerCommand`]s (load, pause,
//!    seek, stop).
//! 2. **Event Channel**: Broadcasts [`PlayerEvent`]s wrapped in
//!    [`AppEvent::Player`] so the main loop can mirror resource state.
//!
//! MPV reports the end of a file without saying which file it was. The worker
//! matches each `StartFile` event to the oldest load request not yet started,
//! so end and failure events go out tagged with the load they belong to.

use anyhow::{Context, Result};
use mpv::Format;
use std::{
    collections::VecDeque,
    sync::mpsc::{self, Receiver, Sender, TryRecvError},
    thread,
};

use crate::{
    events::AppEvent,
    player::{PlayerEvent, ResourceError},
};

#[derive(Debug)]
pub(crate) enum AudioPlayerCommand {
    Load { uri: String, load: u64 },
    SetPaused(bool),
    SeekTo(f64),
    Stop,
}

/// Follows which load request MPV is currently playing.
#[derive(Debug, Default)]
struct LoadTracker {
    pending: VecDeque<u64>,
    current: Option<u64>,
}

impl LoadTracker {
    fn requested(&mut self, load: u64) {
        self.pending.push_back(load);
    }

    /// A load request was rejected before MPV started it.
    fn rejected(&mut self, load: u64) {
        self.pending.retain(|pending| *pending != load);
    }

    fn started(&mut self) {
        if let Some(load) = self.pending.pop_front() {
            self.current = Some(load);
        }
    }

    fn current(&self) -> Option<u64> {
        self.current
    }
}

/// Spawns the audio worker thread to process playback commands.
///
/// If the internal worker returns an error, it is caught here and broadcast as
/// a fatal application event. The worker exits normally once every
/// [`AudioPlayer`](crate::player::AudioPlayer) handle has been dropped.
///
/// # Arguments
///
/// * `command_rx` - The receiving end of the player command channel.
/// * `event_tx` - The channel used to broadcast playback updates and errors.
/// * `authorization` - `Authorization` header value for media requests.
pub(crate) fn spawn_player_worker(
    command_rx: Receiver<AudioPlayerCommand>,
    event_tx: Sender<AppEvent>,
    authorization: Option<String>,
) {
    let error_tx = event_tx.clone();

    thread::spawn(move || {
        if let Err(e) = audio_player_worker(command_rx, event_tx, authorization) {
            log::error!("MPV worker failure: {:?}", e);
            let _ = error_tx.send(AppEvent::FatalError(format!("MPV worker failure: {:?}", e)));
        }
    });
}

/// The primary execution loop for the audio player backend.
///
/// # Errors
///
/// Returns an error if the MPV context fails to initialize or if a command
/// cannot be applied.
fn audio_player_worker(
    command_rx: Receiver<AudioPlayerCommand>,
    event_tx: Sender<AppEvent>,
    authorization: Option<String>,
) -> Result<()> {
    let mut handler = (|| {
        let mut builder = mpv::MpvHandlerBuilder::new().context("Failed to create MPV builder")?;
        builder
            .set_option("vo", "null")
            .context("Failed to set no video output")?;
        if let Some(authorization) = &authorization {
            let header = format!("Authorization: {}", authorization);
            builder
                .set_option("http-header-fields", header.as_str())
                .context("Failed to set HTTP headers")?;
        }
        builder.build().context("Failed to build MPV handler")
    })()?;

    handler
        .observe_property::<f64>("duration", 0)
        .context("Failed to observe duration")?;
    handler
        .observe_property::<bool>("pause", 0)
        .context("Failed to observe pause")?;
    handler
        .observe_property::<f64>("time-pos", 0)
        .context("Failed to observe time-pos")?;

    log::debug!("MPV worker started");

    let mut loads = LoadTracker::default();

    while process_commands(&mut handler, &command_rx, &event_tx, &mut loads)? {
        process_mpv_events(&mut handler, &event_tx, &mut loads)?;
    }

    log::debug!("MPV worker stopped");

    Ok(())
}

/// Drains and executes all pending commands from the application channel.
///
/// Returns `false` once the command channel has been closed.
fn process_commands(
    handler: &mut mpv::MpvHandler,
    command_rx: &mpsc::Receiver<AudioPlayerCommand>,
    event_tx: &mpsc::Sender<AppEvent>,
    loads: &mut LoadTracker,
) -> Result<bool> {
    loop {
        let command = match command_rx.try_recv() {
            Ok(command) => command,
            Err(TryRecvError::Empty) => return Ok(true),
            Err(TryRecvError::Disconnected) => return Ok(false),
        };

        log::trace!("MPV command {:?}", command);

        match command {
            AudioPlayerCommand::Load { uri, load } => {
                loads.requested(load);
                if let Err(e) = handler.command(&["loadfile", &uri, "replace"]) {
                    log::warn!("Failed to load {}: {:?}", uri, e);
                    loads.rejected(load);
                    event_tx
                        .send(AppEvent::Player(PlayerEvent::Failed {
                            load,
                            error: classify_error(e),
                        }))
                        .context("Failed to send player event")?;
                    continue;
                }
                handler
                    .set_property("pause", false)
                    .context("Failed to start playback")?;
            }
            AudioPlayerCommand::SetPaused(paused) => {
                handler
                    .set_property("pause", paused)
                    .context("Failed to set pause")?;
            }
            AudioPlayerCommand::SeekTo(seconds) => {
                // Seeking while nothing is loaded is rejected by MPV, which
                // is harmless here.
                if let Err(e) = handler.command(&["seek", &seconds.to_string(), "absolute"]) {
                    log::debug!("Seek to {} ignored: {:?}", seconds, e);
                }
            }
            AudioPlayerCommand::Stop => {
                handler.command(&["stop"]).context("Failed to stop")?;
            }
        }
    }
}

/// Polls for MPV events and forwards them to the application.
///
/// This function waits for up to 50ms for an event from the MPV context.
fn process_mpv_events(
    handler: &mut mpv::MpvHandler,
    event_tx: &mpsc::Sender<AppEvent>,
    loads: &mut LoadTracker,
) -> Result<()> {
    if let Some(mpv_event) = handler.wait_event(0.05) {
        let player_event = match mpv_event {
            mpv::Event::PropertyChange { name, change, .. } => match (name, change) {
                ("duration", Format::Double(duration)) => {
                    Some(PlayerEvent::DurationChanged(duration))
                }
                ("pause", Format::Flag(pause)) => Some(PlayerEvent::PauseChanged(pause)),
                ("time-pos", Format::Double(seconds)) if seconds >= 0.0 => {
                    Some(PlayerEvent::TimeChanged(seconds))
                }
                _ => None,
            },
            mpv::Event::StartFile => {
                loads.started();
                None
            }
            mpv::Event::EndFile(result) => match loads.current() {
                Some(load) => end_file_event(load, result),
                None => {
                    log::trace!("End of file without a load request");
                    None
                }
            },
            _ => None,
        };

        if let Some(event) = player_event {
            event_tx
                .send(AppEvent::Player(event))
                .context("Failed to send player event")?;
        }
    }

    Ok(())
}

fn end_file_event(load: u64, result: mpv::Result<mpv::EndFileReason>) -> Option<PlayerEvent> {
    match result {
        Ok(mpv::EndFileReason::MPV_END_FILE_REASON_EOF) => Some(PlayerEvent::Ended { load }),
        Ok(mpv::EndFileReason::MPV_END_FILE_REASON_ERROR) => Some(PlayerEvent::Failed {
            load,
            error: ResourceError::Load("playback aborted".to_string()),
        }),
        Ok(_) => None,
        Err(e) => Some(PlayerEvent::Failed {
            load,
            error: classify_error(e),
        }),
    }
}

// Format problems mean the file itself is bad, anything else may be transient.
fn classify_error(error: mpv::Error) -> ResourceError {
    let description = format!("{:?}", error);
    match error {
        mpv::Error::MPV_ERROR_UNKNOWN_FORMAT
        | mpv::Error::MPV_ERROR_NOTHING_TO_PLAY
        | mpv::Error::MPV_ERROR_UNSUPPORTED => ResourceError::Decode(description),
        _ => ResourceError::Load(description),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_events_follow_request_order() {
        let mut loads = LoadTracker::default();
        assert_eq!(loads.current(), None);

        loads.requested(1);
        loads.requested(2);
        assert_eq!(loads.current(), None);

        loads.started();
        assert_eq!(loads.current(), Some(1));
        loads.started();
        assert_eq!(loads.current(), Some(2));

        // A stray start keeps the last known load
        loads.started();
        assert_eq!(loads.current(), Some(2));
    }

    #[test]
    fn rejected_request_is_never_current() {
        let mut loads = LoadTracker::default();
        loads.requested(1);
        loads.requested(2);

        loads.rejected(1);
        loads.started();

        assert_eq!(loads.current(), Some(2));
    }

    #[test]
    fn end_of_file_is_tagged_with_load() {
        assert_eq!(
            end_file_event(3, Ok(mpv::EndFileReason::MPV_END_FILE_REASON_EOF)),
            Some(PlayerEvent::Ended { load: 3 })
        );
        assert_eq!(
            end_file_event(3, Ok(mpv::EndFileReason::MPV_END_FILE_REASON_STOP)),
            None
        );
        assert_eq!(
            end_file_event(4, Err(mpv::Error::MPV_ERROR_UNKNOWN_FORMAT)),
            Some(PlayerEvent::Failed {
                load: 4,
                error: ResourceError::Decode("MPV_ERROR_UNKNOWN_FORMAT".to_string()),
            })
        );
    }
}
