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

use anyhow::Result;

use crate::{
    App, StatusMessage,
    browser::MediaBrowserPane,
    commander::Command,
    events::AppEvent,
    model::{CollectionKind, IdName, Track},
    player::{PlayerEvent, controller::PlaybackSignal},
    tasks::{AppTask, Ticket},
};

pub(super) fn handle_tick(_app: &mut App) {}

pub(super) fn handle_player_event(app: &mut App, event: PlayerEvent) -> Result<()> {
    if let Some(PlaybackSignal::Failed { track_id, error }) =
        app.controller.handle_player_event(event)?
    {
        let hint = if error.is_recoverable() {
            "select it again to retry"
        } else {
            "press n to skip"
        };
        app.status = Some(StatusMessage::error(format!(
            "Cannot play track {}: {} ({})",
            track_id, error, hint
        )));
    }

    Ok(())
}

pub(super) fn handle_command(app: &mut App, command: Command) -> Result<()> {
    match command {
        Command::Quit => app.event_tx.send(AppEvent::ExitApplication)?,
        Command::Next => {
            app.controller.next()?;
            log::debug!("Skipped forward, now {:?}", app.controller.state());
        }
        Command::Previous => {
            app.controller.previous()?;
            log::debug!("Skipped back, now {:?}", app.controller.state());
        }
        Command::TogglePause => app.controller.toggle_paused()?,
        Command::Clear => {
            app.controller.clear()?;
            app.status = Some(StatusMessage::info("Queue cleared"));
        }
        Command::Refresh => {
            let task = app.media_browser.request_collection();
            app.task_tx.send(task)?;
        }
        Command::Seek(seconds) => app.controller.seek(seconds)?,
        Command::SeekBy(delta) => app.controller.seek_by(delta)?,
        Command::Upload(path) => {
            app.status = Some(StatusMessage::info(format!("Uploading {}", path.display())));
            app.task_tx.send(AppTask::Upload(path))?;
        }
    }

    Ok(())
}

/// Plays from the browser selection.
///
/// On a track, the displayed list plays from that track on and wraps around to
/// the tracks before it. On a collection item, its tracks play from the
/// first.
pub(super) fn handle_play_selection(app: &mut App) -> Result<()> {
    let browser = &mut app.media_browser;

    match browser.active_pane {
        MediaBrowserPane::Collection => browser.next_pane(),
        MediaBrowserPane::Item => {
            if !browser.tracks_match_selection() {
                app.status = Some(StatusMessage::info("Tracks are still loading"));
            } else if !browser.tracks.is_empty() {
                let tracks = browser.tracks.clone();
                log::info!("Playing {} track(s) from the start", tracks.len());
                app.controller.play_from(tracks, 0)?;
            }
        }
        MediaBrowserPane::Track => {
            if !browser.tracks_match_selection() {
                app.status = Some(StatusMessage::info("Tracks are still loading"));
            } else if let Some(index) = browser.selected_track_index() {
                let tracks = browser.tracks.clone();
                log::info!("Playing {} track(s) from index {}", tracks.len(), index);
                app.controller.play_from(tracks, index)?;
            }
        }
    }

    Ok(())
}

pub(super) fn handle_collection_loaded(
    app: &mut App,
    ticket: Ticket,
    kind: CollectionKind,
    items: Vec<IdName>,
) -> Result<()> {
    if !app.media_browser.set_items(&ticket, kind, items) {
        log::debug!("Ignoring stale {} result", kind.title());
        return Ok(());
    }

    if let Some(task) = app.media_browser.request_tracks() {
        app.task_tx.send(task)?;
    }

    Ok(())
}

pub(super) fn handle_tracks_loaded(
    app: &mut App,
    ticket: Ticket,
    item_id: Option<String>,
    tracks: Vec<Track>,
) {
    if !app.media_browser.set_tracks(&ticket, item_id, tracks) {
        log::debug!("Ignoring stale track result");
    }
}

pub(super) fn handle_uploaded(app: &mut App, tracks: Vec<Track>) -> Result<()> {
    let names: Vec<&str> = tracks.iter().map(|track| track.name.as_str()).collect();
    app.status = Some(StatusMessage::info(format!(
        "Uploaded {} track(s): {}",
        names.len(),
        names.join(", ")
    )));

    // New tracks may add albums, artists or genres too
    let task = app.media_browser.request_collection();
    app.task_tx.send(task)?;

    Ok(())
}

pub(super) fn handle_error(app: &mut App, message: String) {
    app.status = Some(StatusMessage::error(message));
}
