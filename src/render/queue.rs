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

//! Render the playback queue.
//!
//! The queue is shown in playback order; the first entry is the track playing
//! now and is marked as such.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

use crate::{
    model::queue::Queue,
    render::icons::ICON_PLAY,
    theme::Theme,
    util::format::format_duration_ms,
};

/// Renders the queue widget, current track first.
pub(crate) fn draw_queue(f: &mut Frame, area: Rect, queue: &Queue, theme: &Theme) {
    let mut items: Vec<ListItem> = queue
        .items()
        .iter()
        .enumerate()
        .map(|(index, track)| {
            let (marker, name_style) = if index == 0 {
                (
                    format!(" {} ", ICON_PLAY),
                    Style::default()
                        .fg(theme.accent_colour)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                ("   ".to_string(), Style::default().fg(theme.table_track_fg))
            };

            let mut spans = vec![Span::raw(marker), Span::styled(track.name.as_str(), name_style)];
            if let Some(artist) = track.artist_name() {
                spans.push(Span::styled(
                    format!("  {}", artist),
                    Style::default().fg(theme.table_artist_fg),
                ));
            }
            if let Some(album) = track.album_name() {
                spans.push(Span::styled(
                    format!("  {}", album),
                    Style::default().fg(theme.table_album_fg),
                ));
            }
            spans.push(Span::styled(
                format!("  {}", format_duration_ms(track.duration_ms)),
                Style::default().fg(theme.table_time_fg),
            ));

            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = format!(
        " Queue ({} tracks, {}) ",
        queue.len(),
        format_duration_ms(queue.total_duration_ms())
    );

    if queue.is_empty() {
        items.push(ListItem::new(Span::styled(
            "   Queue is empty",
            Style::default().fg(theme.table_time_fg),
        )));
    }

    let list = List::new(items).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border_colour)),
    );

    f.render_widget(list, area);
}
