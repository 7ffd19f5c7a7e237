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

//! Render the music player interface.
//!
//! This module renders the track at the head of the queue, the playback
//! state, the elapsed and remaining time, the next track, and a progress bar.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Padding, Paragraph},
};

use crate::{
    App,
    player::PlayerState,
    render::icons::{ICON_NEXT, ICON_PAUSE, ICON_PLAY, ICON_STOP},
    util::format::{format_time, progress_ratio},
};

/// Renders the main player widget including track info and progress.
pub(crate) fn draw_player(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::TOP | Borders::BOTTOM)
        .border_style(Style::default().fg(app.theme.border_colour))
        .padding(Padding::horizontal(1));

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner_area);

    let info_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(24)])
        .split(chunks[0]);

    let controller = &app.controller;
    let resource = controller.resource();
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let Some(track) = controller.now_playing() else {
        let idle = Line::from(vec![
            Span::styled(format!(" {} ", ICON_STOP), bold).fg(Color::White),
            Span::raw("Nothing playing, press Enter on a track to start"),
        ]);
        f.render_widget(Paragraph::new(idle), info_chunks[0]);
        return;
    };

    let icon = match resource.state() {
        PlayerState::Playing => ICON_PLAY,
        PlayerState::Paused => ICON_PAUSE,
        PlayerState::Stopped => ICON_STOP,
    };

    let track_line = Line::from(vec![
        Span::styled(format!(" {} ", icon), bold).fg(Color::White),
        Span::styled(track.name.as_str(), bold).fg(app.theme.accent_colour),
    ]);
    f.render_widget(Paragraph::new(track_line), info_chunks[0]);

    // The library duration is known before the stream reports its own
    let duration_ms = match track.duration_ms {
        0 => resource.duration().map_or(0, |secs| (secs * 1000.0) as u64),
        ms => ms,
    };
    let time = resource.current_time().max(0.0) as u64;
    let duration = duration_ms / 1000;
    let remaining = duration.saturating_sub(time);

    let time_line = Line::from(vec![
        Span::styled(format_time(time), bold).fg(app.theme.accent_colour),
        Span::styled(" / ", bold).fg(Color::White),
        Span::styled(format_time(duration), bold).fg(app.theme.accent_colour),
        Span::styled(" (-", bold).fg(Color::White),
        Span::styled(format_time(remaining), bold).fg(app.theme.accent_colour),
        Span::styled(")", bold).fg(Color::White),
    ]);
    f.render_widget(
        Paragraph::new(time_line).alignment(Alignment::Right),
        info_chunks[1],
    );

    let mut details = Vec::new();
    if let Some(artist) = track.artist_name() {
        details.push(Span::raw("   by "));
        details.push(Span::styled(artist, Style::default().fg(app.theme.table_artist_fg)));
    }
    if let Some(album) = track.album_name() {
        details.push(Span::raw(" from "));
        details.push(Span::styled(album, Style::default().fg(app.theme.table_album_fg)));
    }
    if let Some(genre) = &track.genre {
        details.push(Span::raw(format!(" [{}]", genre.name)));
    }
    f.render_widget(Paragraph::new(Line::from(details)), chunks[1]);

    if let Some(next) = controller.queue().items().get(1) {
        let next_line = Line::from(vec![
            Span::styled(format!(" {} ", ICON_NEXT), Style::default().fg(app.theme.table_time_fg)),
            Span::styled(next.name.as_str(), Style::default().fg(app.theme.table_time_fg)),
        ]);
        f.render_widget(Paragraph::new(next_line), chunks[2]);
    }

    let position_gauge = Gauge::default()
        .gauge_style(
            Style::default()
                .fg(app.theme.accent_colour)
                .bg(app.theme.gauge_track_colour),
        )
        .ratio(progress_ratio(resource.current_time(), duration_ms))
        .label("")
        .use_unicode(true);

    f.render_widget(position_gauge, chunks[3]);
}
