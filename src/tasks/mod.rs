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

//! Asynchronous application task processing.
//!
//! This module implements the command pattern used to offload blocking
//! requests to the piTunes server from the main UI thread. It provides a
//! dedicated worker loop that translates [`AppTask`] requests into API calls
//! and broadcasts the results back to the application via [`AppEvent`]s.
//!
//! Browser fetches carry a [`Ticket`]. Issuing a newer ticket from the same
//! [`RequestSlot`] supersedes the older request: the worker skips it if it has
//! not started yet and drops its result if it has.

use std::{
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
        mpsc::{Receiver, Sender},
    },
    thread,
};

use anyhow::{Context, Result};

use crate::{
    api::PiTunesClient,
    events::AppEvent,
    model::{CollectionKind, Track},
};

/// Issues tickets for one kind of request; only the latest ticket is current.
#[derive(Debug, Clone, Default)]
pub(crate) struct RequestSlot {
    generation: Arc<AtomicU64>,
}

impl RequestSlot {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Supersedes every outstanding ticket and returns the new current one.
    pub(crate) fn issue(&self) -> Ticket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        Ticket {
            generation,
            slot: Arc::clone(&self.generation),
        }
    }

    /// Supersedes every outstanding ticket without issuing a new one.
    pub(crate) fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Ticket {
    generation: u64,
    slot: Arc<AtomicU64>,
}

impl Ticket {
    pub(crate) fn is_current(&self) -> bool {
        self.slot.load(Ordering::SeqCst) == self.generation
    }
}

#[derive(Debug)]
pub(crate) enum AppTask {
    /// Lists the items of a grouping collection.
    LoadCollection {
        ticket: Ticket,
        kind: CollectionKind,
    },

    /// Lists tracks, either of one collection item or, without an item, of
    /// the whole library.
    LoadTracks {
        ticket: Ticket,
        kind: CollectionKind,
        item_id: Option<String>,
    },

    Upload(PathBuf),
}

/// Spawns a background thread to process application tasks.
///
/// The worker owns the API client and blocks on the task channel until every
/// sender has been dropped.
///
/// # Arguments
///
/// * `client` - The client used for every request.
/// * `task_rx` - The receiving end of the task channel.
/// * `event_tx` - The sending end of the channel for broadcasting results.
pub(crate) fn spawn_task_worker(
    client: PiTunesClient,
    task_rx: Receiver<AppTask>,
    event_tx: Sender<AppEvent>,
) {
    thread::spawn(move || {
        log::debug!("Task worker started for {}", client.api_base());

        while let Ok(task) = task_rx.recv() {
            let ctx = TaskContext {
                client: &client,
                event_tx: &event_tx,
            };

            if let Err(e) = handle_task(task, &ctx) {
                log::warn!("Task failed: {:#}", e);
                let _ = event_tx.send(AppEvent::Error(format!("{:#}", e)));
            }
        }

        log::debug!("Task worker stopped");
    });
}

/// Bundles shared resources required by task handlers to simplify resource
/// passing when invoking those handler functions.
struct TaskContext<'a> {
    client: &'a PiTunesClient,
    event_tx: &'a Sender<AppEvent>,
}

/// Executes a single task and sends its result back through the application
/// event channel.
fn handle_task(task: AppTask, ctx: &TaskContext) -> Result<()> {
    match task {
        AppTask::LoadCollection { ticket, kind } => load_collection(ctx, ticket, kind),
        AppTask::LoadTracks {
            ticket,
            kind,
            item_id,
        } => load_tracks(ctx, ticket, kind, item_id),
        AppTask::Upload(path) => upload(ctx, path),
    }
}

fn load_collection(ctx: &TaskContext, ticket: Ticket, kind: CollectionKind) -> Result<()> {
    if !ticket.is_current() {
        log::debug!("Skipping superseded {} request", kind.title());
        return Ok(());
    }

    let items = ctx
        .client
        .collection(kind)
        .with_context(|| format!("Failed to load {}", kind.title().to_lowercase()))?;

    if !ticket.is_current() {
        log::debug!("Dropping superseded {} result", kind.title());
        return Ok(());
    }

    ctx.event_tx
        .send(AppEvent::CollectionLoaded {
            ticket,
            kind,
            items,
        })
        .context("Failed to send collection")?;

    Ok(())
}

fn load_tracks(
    ctx: &TaskContext,
    ticket: Ticket,
    kind: CollectionKind,
    item_id: Option<String>,
) -> Result<()> {
    if !ticket.is_current() {
        log::debug!("Skipping superseded track request");
        return Ok(());
    }

    let tracks = match &item_id {
        Some(id) => ctx.client.collection_tracks(kind, id),
        None => ctx.client.tracks(),
    }
    .context("Failed to load tracks")?;

    if !ticket.is_current() {
        log::debug!("Dropping superseded track result");
        return Ok(());
    }

    ctx.event_tx
        .send(AppEvent::TracksLoaded {
            ticket,
            item_id,
            tracks,
        })
        .context("Failed to send tracks")?;

    Ok(())
}

fn upload(ctx: &TaskContext, path: PathBuf) -> Result<()> {
    let ids = ctx
        .client
        .upload(&path)
        .with_context(|| format!("Failed to upload {}", path.display()))?;

    // Fetch each new track so the status can name them
    let tracks = ids
        .iter()
        .map(|id| ctx.client.track(id))
        .collect::<Result<Vec<Track>, _>>()
        .context("Failed to fetch uploaded tracks")?;

    ctx.event_tx
        .send(AppEvent::Uploaded(tracks))
        .context("Failed to send upload result")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{sync::mpsc, time::Duration};

    use super::*;

    #[test]
    fn newest_ticket_is_current() {
        let slot = RequestSlot::new();

        let first = slot.issue();
        assert!(first.is_current());

        let second = slot.issue();
        assert!(!first.is_current());
        assert!(second.is_current());
    }

    #[test]
    fn cancel_supersedes_outstanding_tickets() {
        let slot = RequestSlot::new();
        let ticket = slot.issue();

        slot.cancel();

        assert!(!ticket.is_current());
        assert!(slot.issue().is_current());
    }

    #[test]
    fn slots_are_independent() {
        let items = RequestSlot::new();
        let tracks = RequestSlot::new();
        let items_ticket = items.issue();
        let tracks_ticket = tracks.issue();

        items.issue();

        assert!(!items_ticket.is_current());
        assert!(tracks_ticket.is_current());
    }

    #[test]
    fn cloned_slot_shares_generation() {
        let slot = RequestSlot::new();
        let ticket = slot.issue();

        slot.clone().issue();

        assert!(!ticket.is_current());
    }

    #[test]
    fn superseded_requests_are_skipped_without_contacting_server() {
        // Nothing listens on the discard port, so a request would fail.
        let client = PiTunesClient::new("http://127.0.0.1:9/api", Duration::from_millis(200)).unwrap();
        let (event_tx, event_rx) = mpsc::channel();
        let ctx = TaskContext {
            client: &client,
            event_tx: &event_tx,
        };
        let slot = RequestSlot::new();
        let stale = slot.issue();
        slot.issue();

        handle_task(
            AppTask::LoadCollection {
                ticket: stale.clone(),
                kind: CollectionKind::Albums,
            },
            &ctx,
        )
        .unwrap();
        handle_task(
            AppTask::LoadTracks {
                ticket: stale,
                kind: CollectionKind::Albums,
                item_id: Some("1".to_string()),
            },
            &ctx,
        )
        .unwrap();

        assert!(event_rx.try_recv().is_err());
    }
}
