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

//! Application event handling.
//!
//! Every input to the application (keys, ticks, player notifications and
//! task results) arrives as an [`AppEvent`] on a single channel. The main
//! thread consumes that channel in [`process_events`], which is therefore the
//! only place the playback controller is driven from. Queue mutations never
//! interleave.

mod handlers;
mod key_handlers;

use std::io::Stdout;

use anyhow::{Result, anyhow};
use crossterm::event::KeyEvent;
use ratatui::{Terminal, prelude::CrosstermBackend};

use crate::{
    App,
    commander::Command,
    model::{CollectionKind, IdName, Track},
    player::PlayerEvent,
    render::draw,
    tasks::Ticket,
};

use handlers::*;
use key_handlers::process_key_event;

#[derive(Debug)]
pub(crate) enum AppEvent {
    Key(KeyEvent),

    Tick,

    Player(PlayerEvent),

    Command(Command),

    CollectionLoaded {
        ticket: Ticket,
        kind: CollectionKind,
        items: Vec<IdName>,
    },
    TracksLoaded {
        ticket: Ticket,
        item_id: Option<String>,
        tracks: Vec<Track>,
    },

    Uploaded(Vec<Track>),

    ExitApplication,

    Error(String),
    FatalError(String),
}

/// Runs the main application loop, handling events and rendering the UI in the
/// terminal.
///
/// This function loops until a quit event is received or the event channel
/// is closed.
///
/// # Errors
///
/// Returns an error on a fatal worker failure, or if an event cannot be
/// applied.
pub(crate) fn process_events(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> Result<()> {
    terminal.draw(|f| draw(f, app))?;

    while let Ok(event) = app.event_rx.recv() {
        match event {
            AppEvent::ExitApplication => break,
            AppEvent::FatalError(message) => return Err(anyhow!(message)),

            AppEvent::Key(key) => process_key_event(app, key)?,
            AppEvent::Tick => handle_tick(app),
            AppEvent::Player(player_event) => handle_player_event(app, player_event)?,
            AppEvent::Command(command) => handle_command(app, command)?,
            AppEvent::CollectionLoaded {
                ticket,
                kind,
                items,
            } => handle_collection_loaded(app, ticket, kind, items)?,
            AppEvent::TracksLoaded {
                ticket,
                item_id,
                tracks,
            } => handle_tracks_loaded(app, ticket, item_id, tracks),
            AppEvent::Uploaded(tracks) => handle_uploaded(app, tracks)?,
            AppEvent::Error(message) => handle_error(app, message),
        }

        terminal.draw(|f| draw(f, app))?;
    }

    Ok(())
}
