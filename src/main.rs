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

//! # piTunes TUI.
//!
//! A terminal client for a piTunes music server: browse the library, play
//! tracks from a queue, and upload new audio files.
//!
//! This application coordinates a TUI frontend built with `ratatui` and a
//! background processing layer.
//!
//! It uses an event-driven architecture where:
//!
//! * The **Main Thread** manages the terminal lifecycle, UI rendering and the
//!   playback queue.
//! * **Background Workers** run server requests and drive the MPV player, so
//!   neither blocks the UI.
//! * **Event Loops** capture user input and system ticks to drive the UI
//!   state.
//!
//! ## Architecture
//!
//! The application follows a strict setup-run-teardown pattern to ensure the
//! terminal state is preserved even in the event of an error. Communication
//! between the UI and background workers is handled via `std::sync::mpsc`
//! channels.

mod api;
mod browser;
mod commander;
mod config;
mod events;
mod model;
mod player;
mod render;
mod tasks;
mod theme;
mod util;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use env_logger::{Env, Target};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    fs::{self, OpenOptions},
    io::{self},
    path::PathBuf,
    sync::mpsc::{self, Receiver, Sender},
    thread,
    time::Duration,
};

use crate::{
    api::PiTunesClient,
    browser::MediaBrowser,
    commander::{Command, Commander},
    config::AppConfig,
    events::{AppEvent, process_events},
    player::{AudioPlayer, controller::PlaybackController},
    tasks::AppTask,
    theme::Theme,
};

const LOG_FILE_NAME: &str = "pitunes-tui.log";

#[derive(Parser)]
#[command(version, about = "Terminal client for a piTunes music server")]
struct Cli {
    /// Server URL, overriding the configuration file
    #[arg(short, long, value_name = "URL")]
    server: Option<String>,

    /// Server user, overriding the configuration file
    #[arg(short, long)]
    user: Option<String>,

    /// Log file, defaults to pitunes-tui.log beside the configuration file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum MainView {
    Browse,
    Queue,
}

/// A one line message for the bottom of the screen.
struct StatusMessage {
    text: String,
    is_error: bool,
}

impl StatusMessage {
    fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Application state.
struct App {
    pub theme: Theme,
    pub main_view: MainView,

    pub event_tx: Sender<AppEvent>,
    pub event_rx: Receiver<AppEvent>,

    pub task_tx: Sender<AppTask>,

    pub controller: PlaybackController<AudioPlayer>,

    pub commander: Commander,
    pub media_browser: MediaBrowser,

    pub status: Option<StatusMessage>,
}


impl App {
    /// Create a new instance of application state.
    ///
    /// This starts the MPV worker, whose single player is owned by the
    /// playback controller from here on.
    pub fn new(config: &AppConfig, task_tx: Sender<AppTask>) -> Result<Self> {
        let (event_tx, event_rx) = mpsc::channel();

        let authorization = config.credentials().map(|c| c.header_value());
        let audio_player = AudioPlayer::new(event_tx.clone(), authorization)?;
        let controller =
            PlaybackController::new(audio_player, config.api_base(), config.restart_policy());

        Ok(Self {
            theme: Theme::default(),
            main_view: MainView::Browse,
            event_tx,
            event_rx,
            task_tx,
            controller,
            commander: Commander::new(),
            media_browser: MediaBrowser::new(),
            status: None,
        })
    }
}

/// The entry point of the application.
///
/// Loads the configuration, starts logging, sets up the communication
/// channels, initializes the application state, manages the terminal
/// lifecycle, and returns an error if any part of the execution fails.
fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mut config, config_error) = match config::load_config() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    if let Some(server) = cli.server {
        config.server_url = server;
    }
    if let Some(user) = cli.user {
        config.username = Some(user);
    }

    let log_path = init_logging(&config, cli.log_file).context("Failed to initialise logging")?;
    if let Some(e) = config_error {
        log::warn!("Failed to load configuration, using defaults: {}", e);
    }
    log::info!(
        "Starting {} {}, server {}, logging to {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        config.server_url,
        log_path.display()
    );

    let client = PiTunesClient::new(&config.api_base(), config.request_timeout())
        .context("Failed to create server client")?
        .with_credentials(config.credentials())
        .with_retry(config.retry_policy());

    let (task_tx, task_rx) = mpsc::channel();

    let mut app = App::new(&config, task_tx).context("Failed to initialise application")?;

    let mut terminal = setup_terminal(&app)?;
    let res = run(&mut terminal, &mut app, client, task_rx);
    restore_terminal(&mut terminal);

    if let Err(e) = &res {
        log::error!("Application error: {:#}", e);
    }
    log::info!("Stopped");

    res.context("Application error occurred")
}

/// Sends log output to a file, the terminal belongs to the interface.
///
/// The filter is taken from `PITUNES_LOG` when set, otherwise from the
/// configured log level. Returns the path of the log file.
fn init_logging(config: &AppConfig, log_file: Option<PathBuf>) -> Result<PathBuf> {
    let path = log_file.unwrap_or_else(|| {
        config::config_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(LOG_FILE_NAME)
    });

    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    env_logger::Builder::from_env(Env::new().filter_or("PITUNES_LOG", &config.log_level))
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .context("Failed to install logger")?;

    Ok(path)
}

/// Prepares the terminal for the TUI application.
///
/// This function performs the following side effects:
/// * Sets the terminal background color based on the provided theme.
/// * Enables raw mode to capture all keyboard input.
/// * Switches the terminal to the alternate screen buffer.
///
/// # Errors
///
/// Returns an error if raw mode cannot be enabled or if the alternate screen
/// cannot be entered.
fn setup_terminal(app: &App) -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    if let Some(hex) = Theme::to_hex(app.theme.background_colour) {
        if let Err(e) = util::term::set_terminal_bg(&hex) {
            log::debug!("Failed to set terminal background: {}", e);
        }
    }

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    Ok(terminal)
}

/// Restores the terminal to its original state.
///
/// This reverses the changes made by [`setup_terminal`], including disabling
/// raw mode, leaving the alternate screen, and resetting the background color.
/// It also ensures the cursor is made visible again.
///
/// Every step is best-effort, as this runs during cleanup.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) {
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    util::term::reset_terminal_bg().ok();
    terminal.show_cursor().ok();
}

/// Starts the application's background workers and enters the main event loop.
///
/// This function spawns several long-running background threads:
/// * A task worker to run server requests.
/// * An input thread to poll for system keyboard events.
/// * A tick thread to trigger periodic UI refreshes.
///
/// After spawning the workers, it requests the first library listing and
/// hands control to [`process_events`] to manage the UI and state updates.
///
/// # Errors
///
/// Returns an error if the event processing loop encounters an unrecoverable
/// application error.
fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    client: PiTunesClient,
    task_rx: Receiver<AppTask>,
) -> Result<()> {
    tasks::spawn_task_worker(client, task_rx, app.event_tx.clone());

    // Spawn a thread to translate raw key events to application events.
    let tx_keys = app.event_tx.clone();
    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(event::Event::Key(key)) => {
                    if tx_keys.send(AppEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    log::error!("Failed to read terminal input: {}", e);
                    let _ = tx_keys.send(AppEvent::FatalError(format!("Terminal input failed: {}", e)));
                    break;
                }
            }
        }
    });

    // Spawn a thread to send a periodic tick application event, this is
    // effectively the minimum "frame rate" for rendering the TUI application.
    let tx_tick = app.event_tx.clone();
    thread::spawn(move || {
        while tx_tick.send(AppEvent::Tick).is_ok() {
            thread::sleep(Duration::from_millis(250));
        }
    });

    // Initial trigger to populate the media browser
    app.event_tx
        .send(AppEvent::Command(Command::Refresh))
        .context("Failed to request library")?;

    process_events(terminal, app)
}
