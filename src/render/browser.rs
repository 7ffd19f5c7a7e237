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

//! Render the media browser interface.
//!
//! This module renders the library as three panes: the collections
//! (albums, artists and so on), the items of the selected collection, and
//! the tracks of the selected item.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};

use crate::{
    browser::{MediaBrowser, MediaBrowserPane},
    model::CollectionKind,
    theme::Theme,
    util::format::format_duration_ms,
};

/// Renders the media browser widget including collection, item, and track
/// panes.
pub(crate) fn draw_browser(f: &mut Frame, area: Rect, browser: &mut MediaBrowser, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(16),
            Constraint::Percentage(35),
            Constraint::Min(0),
        ])
        .split(area);

    let collection_items: Vec<ListItem> = CollectionKind::ALL
        .iter()
        .map(|kind| ListItem::new(kind.title()))
        .collect();

    render_list(
        f,
        chunks[0],
        " Library ",
        collection_items,
        &mut browser.collections_state,
        browser.active_pane == MediaBrowserPane::Collection,
        theme,
    );

    let kind = browser.selected_kind();
    let item_title = format!(" {} ", kind.title());
    let items: Vec<ListItem> = browser
        .items
        .iter()
        .map(|item| ListItem::new(item.name.as_str()))
        .collect();

    render_list(
        f,
        chunks[1],
        &item_title,
        items,
        &mut browser.items_state,
        browser.active_pane == MediaBrowserPane::Item,
        theme,
    );

    let width = browser.tracks.len().to_string().len().max(2);
    let track_items: Vec<ListItem> = browser
        .tracks
        .iter()
        .enumerate()
        .map(|(index, track)| {
            // Playlists and plain track lists have no album order
            let number = match (kind, track.track_number) {
                (CollectionKind::Albums, Some(n)) => format!("{:0width$}", n),
                _ => format!("{:0width$}", index + 1),
            };

            let mut spans = vec![
                Span::styled(number, Style::default().fg(theme.table_track_number_fg)),
                Span::raw(" "),
                Span::styled(track.name.as_str(), Style::default().fg(theme.table_track_fg)),
            ];
            if let Some(artist) = track.artist_name() {
                spans.push(Span::styled(
                    format!("  {}", artist),
                    Style::default().fg(theme.table_artist_fg),
                ));
            }
            spans.push(Span::styled(
                format!("  {}", format_duration_ms(track.duration_ms)),
                Style::default().fg(theme.table_time_fg),
            ));

            ListItem::new(Line::from(spans))
        })
        .collect();

    render_list(
        f,
        chunks[2],
        " Tracks ",
        track_items,
        &mut browser.tracks_state,
        browser.active_pane == MediaBrowserPane::Track,
        theme,
    );
}

fn render_list(
    f: &mut Frame,
    area: Rect,
    title: &str,
    items: Vec<ListItem>,
    state: &mut ListState,
    is_active: bool,
    theme: &Theme,
) {
    let style = if is_active {
        Style::default()
            .fg(theme.active_border_colour)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.border_colour)
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(style),
        )
        .highlight_style(Style::default().bg(theme.highlight_bg))
        .highlight_symbol(">> ");

    f.render_stateful_widget(list, area, state);
}
