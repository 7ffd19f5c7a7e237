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
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};

use crate::{
    App, MainView,
    commander::Command,
    events::{
        AppEvent,
        handlers::{handle_command, handle_play_selection},
    },
};

const FINE_SEEK_DELTA: f64 = 5.0;
const SEEK_DELTA: f64 = 20.0;

/// Maps keyboard input to application actions and playback commands.
///
/// The command line gets the first chance to consume the key. Otherwise the
/// key is one of:
///
/// * **Application Control**: quitting and switching the main view.
/// * **Navigation**: moving between collections, items and tracks in the
///   media browser.
/// * **Playback**: playing the selection, pause, seek, next and previous.
/// * **Queue Management**: clearing the queue, refreshing the library.
///
/// # Errors
///
/// Returns an error if a task fails to send to the background worker or if
/// the playback controller cannot reach the player.
pub(super) fn process_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    if key.kind != KeyEventKind::Press {
        return Ok(());
    }

    if app.commander.handle_event(&Event::Key(key), &app.event_tx)? {
        return Ok(());
    }

    process_global_key_event(app, key)
}

/// Keys that act on the media browser, which only the browse view shows.
fn is_browser_key(code: KeyCode) -> bool {
    matches!(
        code,
        KeyCode::Char('j' | 'k' | 'h' | 'l')
            | KeyCode::Down
            | KeyCode::Up
            | KeyCode::Left
            | KeyCode::Right
            | KeyCode::Enter
    )
}

fn key_applies_to_view(view: MainView, code: KeyCode) -> bool {
    view == MainView::Browse || !is_browser_key(code)
}

fn process_global_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    if !key_applies_to_view(app.main_view, key.code) {
        return Ok(());
    }

    match key.code {
        KeyCode::Char('q') => app.event_tx.send(AppEvent::ExitApplication)?,

        KeyCode::Char('1') => app.main_view = MainView::Browse,
        KeyCode::Char('2') => app.main_view = MainView::Queue,
        KeyCode::Tab => {
            app.main_view = match app.main_view {
                MainView::Browse => MainView::Queue,
                MainView::Queue => MainView::Browse,
            }
        }

        // Navigation: Down / j
        KeyCode::Char('j') | KeyCode::Down => {
            if let Some(task) = app.media_browser.next() {
                app.task_tx.send(task)?;
            }
        }

        // Navigation: Up / k
        KeyCode::Char('k') | KeyCode::Up => {
            if let Some(task) = app.media_browser.previous() {
                app.task_tx.send(task)?;
            }
        }

        // Pane Navigation
        KeyCode::Char('h') | KeyCode::Left => app.media_browser.previous_pane(),
        KeyCode::Char('l') | KeyCode::Right => app.media_browser.next_pane(),

        KeyCode::Enter => handle_play_selection(app)?,

        KeyCode::Char(',') => handle_command(app, Command::SeekBy(-FINE_SEEK_DELTA))?,
        KeyCode::Char('.') => handle_command(app, Command::SeekBy(FINE_SEEK_DELTA))?,
        KeyCode::Char('<') => handle_command(app, Command::SeekBy(-SEEK_DELTA))?,
        KeyCode::Char('>') => handle_command(app, Command::SeekBy(SEEK_DELTA))?,
        KeyCode::Char(' ') => handle_command(app, Command::TogglePause)?,
        KeyCode::Char('n') => handle_command(app, Command::Next)?,
        KeyCode::Char('p') => handle_command(app, Command::Previous)?,

        // Queue Management
        KeyCode::Char('c') => handle_command(app, Command::Clear)?,
        KeyCode::Char('r') => handle_command(app, Command::Refresh)?,

        _ => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn browser_keys_only_apply_to_browse_view() {
        for code in [KeyCode::Char('j'), KeyCode::Up, KeyCode::Char('l'), KeyCode::Enter] {
            assert!(key_applies_to_view(MainView::Browse, code), "{code:?}");
            assert!(!key_applies_to_view(MainView::Queue, code), "{code:?}");
        }
    }

    #[test]
    fn playback_keys_apply_to_every_view() {
        for code in [KeyCode::Char(' '), KeyCode::Char('n'), KeyCode::Char('q'), KeyCode::Tab] {
            assert!(key_applies_to_view(MainView::Browse, code), "{code:?}");
            assert!(key_applies_to_view(MainView::Queue, code), "{code:?}");
        }
    }
}
