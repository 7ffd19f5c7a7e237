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

//! User interface rendering logic.
//!
//! This module handles the translation of the [`App`] state into visual
//! widgets using the `ratatui` framework. It is responsible for layout
//! management, widget styling, and terminal frame composition.
//!
//! The primary entry point is the [`draw`] function, which is called after
//! every application event, including the periodic tick.

mod browser;
mod commander;
mod icons;
mod player;
mod queue;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::{
    App, MainView,
    render::{
        browser::draw_browser,
        commander::{draw_commander, draw_status},
        player::draw_player,
        queue::draw_queue,
    },
};

/// Renders the user interface to the terminal frame.
///
/// The screen is split into the main view (library browser or queue), the
/// player bar, and a bottom line that shows the command line while it is
/// active and the latest status message otherwise.
///
/// # Arguments
///
/// * `f` - The current terminal frame used for drawing.
/// * `app` - A mutable reference to the application state, allowing list
///   widgets to update their scroll positions.
pub(crate) fn draw(f: &mut Frame, app: &mut App) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(6),
            Constraint::Length(1),
        ])
        .split(f.area());

    match app.main_view {
        MainView::Browse => draw_browser(f, outer[0], &mut app.media_browser, &app.theme),
        MainView::Queue => draw_queue(f, outer[0], app.controller.queue(), &app.theme),
    }

    draw_player(f, outer[1], app);

    if app.commander.active() {
        draw_commander(f, outer[2], app);
    } else {
        draw_status(f, outer[2], app);
    }
}
