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

//! Command-line input logic and state management.
//!
//! This module implements the `:` command line: a text input component that,
//! when a command is submitted, parses it and dispatches the corresponding
//! application event.

use std::{path::PathBuf, sync::mpsc::Sender};

use anyhow::Result;
use crossterm::event::{Event, KeyCode};
use tui_input::{Input, backend::crossterm::EventHandler};

use crate::events::AppEvent;

/// Playback and library commands, shared by the command line and the key
/// bindings.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Command {
    Quit,
    Next,
    Previous,
    TogglePause,
    Clear,
    Refresh,
    /// Absolute position in seconds.
    Seek(f64),
    /// Relative offset in seconds.
    SeekBy(f64),
    Upload(PathBuf),
}

/// Parses a submitted command line.
pub(crate) fn parse_command(buffer: &str) -> Result<Command, String> {
    let parts: Vec<&str> = buffer.split_whitespace().collect();

    match parts.as_slice() {
        ["q"] | ["quit"] => Ok(Command::Quit),
        ["next"] => Ok(Command::Next),
        ["prev"] => Ok(Command::Previous),
        ["pause"] => Ok(Command::TogglePause),
        ["clear"] => Ok(Command::Clear),
        ["refresh"] => Ok(Command::Refresh),

        ["seek", seconds] => match seconds.parse::<f64>() {
            Ok(seconds) if seconds.is_finite() && seconds >= 0.0 => Ok(Command::Seek(seconds)),
            _ => Err(format!("Invalid seek position: {}", seconds)),
        },
        ["seek", ..] => Err("Usage: seek <seconds>".to_string()),

        // Paths may contain spaces
        ["upload", _, ..] => {
            let path = buffer.trim_start()["upload".len()..].trim();
            Ok(Command::Upload(PathBuf::from(path)))
        }
        ["upload"] => Err("Usage: upload <path>".to_string()),

        [] => Err("Empty command".to_string()),
        [cmd, ..] => Err(format!("Unknown command: {}", cmd)),
    }
}

pub(crate) struct Commander {
    active: bool,
    pub(crate) input: Input,
}

impl Commander {
    pub(crate) fn new() -> Self {
        Self {
            active: false,
            input: Input::default(),
        }
    }

    pub(crate) fn active(&self) -> bool {
        self.active
    }

    /// Handles a terminal event, returning `true` if the command line
    /// consumed it.
    ///
    /// While inactive only `:` is consumed, which activates the command line.
    /// While active every key is consumed; `Esc` cancels and `Enter` submits.
    pub(crate) fn handle_event(&mut self, event: &Event, event_tx: &Sender<AppEvent>) -> Result<bool> {
        let Event::Key(key_event) = event else {
            return Ok(false);
        };

        if !self.active {
            if key_event.code == KeyCode::Char(':') {
                self.active = true;
                return Ok(true);
            }
            return Ok(false);
        }

        match key_event.code {
            KeyCode::Esc => {
                self.input.reset();
                self.active = false;
            }

            KeyCode::Enter => {
                let buffer = self.input.value().trim().to_string();
                self.input.reset();
                self.active = false;

                if !buffer.is_empty() {
                    let event = match parse_command(&buffer) {
                        Ok(Command::Quit) => AppEvent::ExitApplication,
                        Ok(command) => AppEvent::Command(command),
                        Err(message) => AppEvent::Error(message),
                    };
                    event_tx.send(event)?;
                }
            }

            _ => {
                // Delegate all other key events to the managed input component.
                self.input.handle_event(event);
            }
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use crossterm::event::{KeyEvent, KeyModifiers};

    use super::*;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_line(commander: &mut Commander, tx: &Sender<AppEvent>, line: &str) {
        for c in line.chars() {
            assert!(commander.handle_event(&key(KeyCode::Char(c)), tx).unwrap());
        }
    }

    #[test]
    fn parses_commands() {
        assert_eq!(parse_command("q"), Ok(Command::Quit));
        assert_eq!(parse_command("next"), Ok(Command::Next));
        assert_eq!(parse_command("prev"), Ok(Command::Previous));
        assert_eq!(parse_command("pause"), Ok(Command::TogglePause));
        assert_eq!(parse_command("clear"), Ok(Command::Clear));
        assert_eq!(parse_command("refresh"), Ok(Command::Refresh));
        assert_eq!(parse_command("seek 42.5"), Ok(Command::Seek(42.5)));
    }

    #[test]
    fn upload_keeps_spaces_in_path() {
        assert_eq!(
            parse_command("upload /music/My Song.mp3"),
            Ok(Command::Upload(PathBuf::from("/music/My Song.mp3")))
        );
    }

    #[test]
    fn rejects_bad_commands() {
        assert!(parse_command("seek").is_err());
        assert!(parse_command("seek -1").is_err());
        assert!(parse_command("seek soon").is_err());
        assert!(parse_command("upload").is_err());
        assert_eq!(parse_command("dance"), Err("Unknown command: dance".to_string()));
    }

    #[test]
    fn ignores_keys_until_activated() {
        let (tx, rx) = mpsc::channel();
        let mut commander = Commander::new();

        assert!(!commander.handle_event(&key(KeyCode::Char('n')), &tx).unwrap());
        assert!(commander.handle_event(&key(KeyCode::Char(':')), &tx).unwrap());
        assert!(commander.active());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn submitting_sends_command_and_deactivates() {
        let (tx, rx) = mpsc::channel();
        let mut commander = Commander::new();

        commander.handle_event(&key(KeyCode::Char(':')), &tx).unwrap();
        type_line(&mut commander, &tx, "seek 10");
        commander.handle_event(&key(KeyCode::Enter), &tx).unwrap();

        assert!(!commander.active());
        assert_eq!(commander.input.value(), "");
        assert!(matches!(rx.try_recv(), Ok(AppEvent::Command(Command::Seek(s))) if s == 10.0));
    }

    #[test]
    fn quit_maps_to_exit() {
        let (tx, rx) = mpsc::channel();
        let mut commander = Commander::new();

        commander.handle_event(&key(KeyCode::Char(':')), &tx).unwrap();
        type_line(&mut commander, &tx, "q");
        commander.handle_event(&key(KeyCode::Enter), &tx).unwrap();

        assert!(matches!(rx.try_recv(), Ok(AppEvent::ExitApplication)));
    }

    #[test]
    fn unknown_command_reports_error() {
        let (tx, rx) = mpsc::channel();
        let mut commander = Commander::new();

        commander.handle_event(&key(KeyCode::Char(':')), &tx).unwrap();
        type_line(&mut commander, &tx, "bogus");
        commander.handle_event(&key(KeyCode::Enter), &tx).unwrap();

        assert!(matches!(rx.try_recv(), Ok(AppEvent::Error(message)) if message.contains("bogus")));
    }

    #[test]
    fn escape_cancels_without_sending() {
        let (tx, rx) = mpsc::channel();
        let mut commander = Commander::new();

        commander.handle_event(&key(KeyCode::Char(':')), &tx).unwrap();
        type_line(&mut commander, &tx, "next");
        commander.handle_event(&key(KeyCode::Esc), &tx).unwrap();

        assert!(!commander.active());
        assert_eq!(commander.input.value(), "");
        assert!(rx.try_recv().is_err());
    }
}
