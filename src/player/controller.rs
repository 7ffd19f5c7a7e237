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

//! Playback queue controller.
//!
//! The [`PlaybackController`] owns the playback [`Queue`] and the
//! [`AudioResource`], and is the only code that mutates either. After every
//! queue mutation it re-synchronizes the resource with the head of the queue:
//!
//! * queue becomes empty: the resource is stopped and the controller is
//!   [`PlaybackState::Idle`];
//! * head track changed: the resource is bound to the new head's media URI
//!   and playback starts from zero;
//! * head track unchanged: the position goes back to zero, subject to the
//!   configured [`RestartPolicy`]. A head that ended or failed to play is
//!   always loaded again, which is how a failed track is retried.
//!
//! When the resource reports the end of a track the queue advances by one,
//! so a single-track queue loops.

use anyhow::Result;

use crate::{
    api::media_uri,
    model::{
        Track, TrackId,
        queue::{Queue, rotate_left},
    },
    player::{
        AudioBackend, PlayerEvent, ResourceError,
        resource::{AudioResource, ResourceSignal},
    },
};

/// What happens to the playback position when the queue changes but the
/// head track does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RestartPolicy {
    /// Every queue update restarts the current track.
    EveryUpdate,
    /// Only a different head track restarts playback.
    HeadChange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PlaybackState {
    Idle,
    Loaded { track_id: TrackId },
}

/// Signals for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PlaybackSignal {
    Failed {
        track_id: TrackId,
        error: ResourceError,
    },
}

pub(crate) struct PlaybackController<B: AudioBackend> {
    queue: Queue,
    resource: AudioResource<B>,
    api_base: String,
    restart_policy: RestartPolicy,
    state: PlaybackState,
}

impl<B: AudioBackend> PlaybackController<B> {
    /// Creates an idle controller driving `backend`.
    ///
    /// # Arguments
    ///
    /// * `backend` - The single playback resource of the application.
    /// * `api_base` - Base URL that media URIs are derived from.
    /// * `restart_policy` - Position handling for updates that keep the head.
    pub(crate) fn new(backend: B, api_base: impl Into<String>, restart_policy: RestartPolicy) -> Self {
        Self {
            queue: Queue::new(),
            resource: AudioResource::new(backend),
            api_base: api_base.into(),
            restart_policy,
            state: PlaybackState::Idle,
        }
    }

    /// Replaces the queue; the first track becomes the one playing.
    pub(crate) fn replace(&mut self, items: Vec<Track>) -> Result<()> {
        self.queue.replace(items);
        self.sync()
    }

    /// Plays `items` starting at `index`, continuing through the rest of the
    /// list and wrapping around to the tracks before it.
    pub(crate) fn play_from(&mut self, mut items: Vec<Track>, index: usize) -> Result<()> {
        rotate_left(&mut items, index as i64);
        self.replace(items)
    }

    pub(crate) fn rotate(&mut self, offset: i64) -> Result<()> {
        let before = self.queue.updated_at();
        self.queue.rotate(offset);

        if self.queue.updated_at() == before {
            return Ok(());
        }

        self.sync()
    }

    pub(crate) fn next(&mut self) -> Result<()> {
        self.rotate(1)
    }

    pub(crate) fn previous(&mut self) -> Result<()> {
        self.rotate(-1)
    }

    /// Empties the queue and stops playback.
    pub(crate) fn clear(&mut self) -> Result<()> {
        self.queue.clear();
        self.sync()
    }

    pub(crate) fn toggle_paused(&mut self) -> Result<()> {
        self.resource.toggle_paused()
    }

    pub(crate) fn seek(&mut self, seconds: f64) -> Result<()> {
        self.resource.seek(seconds)
    }

    /// Seeks relative to the current position.
    pub(crate) fn seek_by(&mut self, delta_seconds: f64) -> Result<()> {
        let target = self.resource.current_time() + delta_seconds;
        self.resource.seek(target)
    }

    /// Applies a native resource event.
    ///
    /// The end of a track advances the queue. A failure to play the bound
    /// track is returned as a [`PlaybackSignal`] for display; the queue is
    /// left as it is so the user can retry or skip.
    pub(crate) fn handle_player_event(&mut self, event: PlayerEvent) -> Result<Option<PlaybackSignal>> {
        let Some(signal) = self.resource.handle_event(event) else {
            return Ok(None);
        };

        let PlaybackState::Loaded { track_id } = &self.state else {
            return Ok(None);
        };

        match signal {
            ResourceSignal::Ended => {
                log::debug!("Track {} ended, advancing queue", track_id);
                self.rotate(1)?;
                Ok(None)
            }
            ResourceSignal::Failed(error) => {
                log::warn!("Playback of track {} failed: {}", track_id, error);
                Ok(Some(PlaybackSignal::Failed {
                    track_id: track_id.clone(),
                    error,
                }))
            }
        }
    }

    pub(crate) fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub(crate) fn queue(&self) -> &Queue {
        &self.queue
    }

    pub(crate) fn resource(&self) -> &AudioResource<B> {
        &self.resource
    }

    pub(crate) fn now_playing(&self) -> Option<&Track> {
        self.queue.current()
    }

    fn sync(&mut self) -> Result<()> {
        let head = self.queue.current().map(|track| track.id.clone());
        let bound = match &self.state {
            PlaybackState::Loaded { track_id } => Some(track_id.clone()),
            PlaybackState::Idle => None,
        };

        match (head, bound) {
            (None, None) => {}
            (None, Some(track_id)) => {
                log::debug!("Queue emptied, unbinding track {}", track_id);
                self.resource.stop()?;
                self.state = PlaybackState::Idle;
            }
            (Some(head), Some(bound)) if head == bound => {
                if self.restart_policy == RestartPolicy::EveryUpdate
                    || self.resource.ended()
                    || self.resource.failed()
                {
                    self.resource.rewind()?;
                }
            }
            (Some(head), _) => {
                let uri = media_uri(&self.api_base, &head);
                log::debug!("Binding track {} to {}", head, uri);
                self.resource.play(&uri)?;
                self.state = PlaybackState::Loaded { track_id: head };
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::track,
        player::resource::testing::{Call, RecordingBackend},
    };

    const API: &str = "http://pi.local/api";

    fn controller(policy: RestartPolicy) -> PlaybackController<RecordingBackend> {
        PlaybackController::new(RecordingBackend::default(), API, policy)
    }

    fn head_id<B: AudioBackend>(controller: &PlaybackController<B>) -> Option<&str> {
        controller.now_playing().map(|t| t.id.as_str())
    }

    fn calls(controller: &PlaybackController<RecordingBackend>) -> &[Call] {
        &controller.resource().backend().calls
    }

    fn load(id: &str) -> Call {
        Call::Load(format!("{API}/tracks/{id}.mp3"))
    }

    fn ended(controller: &PlaybackController<RecordingBackend>) -> PlayerEvent {
        PlayerEvent::Ended {
            load: controller.resource().load(),
        }
    }

    fn failed(controller: &PlaybackController<RecordingBackend>, error: ResourceError) -> PlayerEvent {
        PlayerEvent::Failed {
            load: controller.resource().load(),
            error,
        }
    }

    #[test]
    fn starts_idle() {
        let controller = controller(RestartPolicy::EveryUpdate);

        assert_eq!(controller.state(), &PlaybackState::Idle);
        assert!(controller.resource().source().is_none());
    }

    #[test]
    fn replace_binds_head_uri() {
        let mut controller = controller(RestartPolicy::EveryUpdate);

        controller
            .replace(vec![track("1", 1000), track("2", 2000)])
            .unwrap();

        assert_eq!(
            controller.resource().source(),
            Some("http://pi.local/api/tracks/1.mp3")
        );
        assert_eq!(
            controller.state(),
            &PlaybackState::Loaded { track_id: TrackId::new("1") }
        );
        assert_eq!(calls(&controller), &[load("1")]);
    }

    #[test]
    fn replace_with_empty_sequence_stays_idle() {
        let mut controller = controller(RestartPolicy::EveryUpdate);

        controller.replace(vec![]).unwrap();

        assert_eq!(controller.state(), &PlaybackState::Idle);
        assert!(calls(&controller).is_empty());
    }

    #[test]
    fn replace_with_empty_sequence_unbinds_resource() {
        let mut controller = controller(RestartPolicy::EveryUpdate);
        controller.replace(vec![track("1", 1000)]).unwrap();

        controller.replace(vec![]).unwrap();

        assert_eq!(controller.state(), &PlaybackState::Idle);
        assert!(controller.resource().source().is_none());
        assert_eq!(calls(&controller).last(), Some(&Call::Stop));
    }

    #[test]
    fn next_and_previous_rebind_source() {
        let mut controller = controller(RestartPolicy::EveryUpdate);
        controller
            .replace(vec![track("1", 1000), track("2", 2000)])
            .unwrap();

        controller.next().unwrap();
        assert_eq!(head_id(&controller), Some("2"));
        assert_eq!(
            controller.resource().source(),
            Some("http://pi.local/api/tracks/2.mp3")
        );
        assert_eq!(controller.resource().current_time(), 0.0);

        controller.previous().unwrap();
        assert_eq!(head_id(&controller), Some("1"));
        assert_eq!(calls(&controller), &[load("1"), load("2"), load("1")]);
    }

    #[test]
    fn head_change_resets_position() {
        let mut controller = controller(RestartPolicy::HeadChange);
        controller
            .replace(vec![track("1", 1000), track("2", 2000)])
            .unwrap();
        controller
            .handle_player_event(PlayerEvent::TimeChanged(0.7))
            .unwrap();

        controller.next().unwrap();

        assert_eq!(controller.resource().current_time(), 0.0);
        assert_eq!(calls(&controller).last(), Some(&load("2")));
    }

    #[test]
    fn same_head_update_restarts_position_by_default() {
        let mut controller = controller(RestartPolicy::EveryUpdate);
        controller.replace(vec![track("1", 1000)]).unwrap();
        controller
            .handle_player_event(PlayerEvent::TimeChanged(0.5))
            .unwrap();

        controller.rotate(1).unwrap();

        assert_eq!(controller.resource().current_time(), 0.0);
        assert_eq!(
            controller.resource().source(),
            Some("http://pi.local/api/tracks/1.mp3")
        );
        assert_eq!(calls(&controller), &[load("1"), Call::SeekTo(0.0)]);
    }

    #[test]
    fn same_head_update_keeps_position_with_head_change_policy() {
        let mut controller = controller(RestartPolicy::HeadChange);
        controller
            .replace(vec![track("1", 1000), track("2", 1000)])
            .unwrap();
        controller
            .handle_player_event(PlayerEvent::TimeChanged(0.5))
            .unwrap();

        controller
            .replace(vec![track("1", 1000), track("3", 1000)])
            .unwrap();

        assert_eq!(controller.resource().current_time(), 0.5);
        assert_eq!(calls(&controller), &[load("1")]);
    }

    #[test]
    fn ended_advances_by_one() {
        let mut controller = controller(RestartPolicy::EveryUpdate);
        controller
            .replace(vec![track("1", 1000), track("2", 2000), track("3", 500)])
            .unwrap();

        let signal = controller.handle_player_event(ended(&controller)).unwrap();

        assert!(signal.is_none());
        let ids: Vec<&str> = controller.queue().items().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3", "1"]);
        assert_eq!(calls(&controller).last(), Some(&load("2")));
    }

    #[test]
    fn single_item_queue_loops_on_end() {
        for policy in [RestartPolicy::EveryUpdate, RestartPolicy::HeadChange] {
            let mut controller = controller(policy);
            controller.replace(vec![track("1", 1000)]).unwrap();
            controller
                .handle_player_event(PlayerEvent::DurationChanged(1.0))
                .unwrap();

            controller.handle_player_event(ended(&controller)).unwrap();

            assert_eq!(head_id(&controller), Some("1"));
            assert_eq!(controller.resource().current_time(), 0.0);
            assert_eq!(calls(&controller), &[load("1"), load("1")], "{policy:?}");
        }
    }

    #[test]
    fn ended_while_idle_is_ignored() {
        let mut controller = controller(RestartPolicy::EveryUpdate);

        let signal = controller
            .handle_player_event(PlayerEvent::Ended { load: 0 })
            .unwrap();

        assert!(signal.is_none());
        assert_eq!(controller.state(), &PlaybackState::Idle);
        assert!(calls(&controller).is_empty());
    }

    #[test]
    fn rotate_on_empty_queue_is_safe() {
        let mut controller = controller(RestartPolicy::EveryUpdate);

        controller.next().unwrap();
        controller.previous().unwrap();

        assert!(controller.queue().is_empty());
        assert!(calls(&controller).is_empty());
    }

    #[test]
    fn play_from_rotates_selection_to_front() {
        let mut controller = controller(RestartPolicy::EveryUpdate);
        let list = vec![track("a", 1), track("b", 1), track("c", 1), track("d", 1)];

        controller.play_from(list, 2).unwrap();

        let ids: Vec<&str> = controller.queue().items().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "d", "a", "b"]);
        assert_eq!(calls(&controller), &[load("c")]);
    }

    #[test]
    fn clear_returns_to_idle() {
        let mut controller = controller(RestartPolicy::EveryUpdate);
        controller.replace(vec![track("1", 1000)]).unwrap();

        controller.clear().unwrap();

        assert_eq!(controller.state(), &PlaybackState::Idle);
        assert!(controller.now_playing().is_none());
        assert_eq!(calls(&controller), &[load("1"), Call::Stop]);
    }

    #[test]
    fn failure_is_reported_for_bound_track() {
        let mut controller = controller(RestartPolicy::EveryUpdate);
        controller
            .replace(vec![track("9", 1000), track("10", 1000)])
            .unwrap();

        let signal = controller
            .handle_player_event(failed(&controller, ResourceError::Load("404".to_string())))
            .unwrap();

        assert_eq!(
            signal,
            Some(PlaybackSignal::Failed {
                track_id: TrackId::new("9"),
                error: ResourceError::Load("404".to_string()),
            })
        );
        assert_eq!(head_id(&controller), Some("9"));
    }

    #[test]
    fn selecting_failed_track_again_reloads_it() {
        for policy in [RestartPolicy::EveryUpdate, RestartPolicy::HeadChange] {
            let mut controller = controller(policy);
            let list = vec![track("1", 1000), track("2", 1000)];
            controller.replace(list.clone()).unwrap();
            controller
                .handle_player_event(failed(&controller, ResourceError::Load("404".to_string())))
                .unwrap();

            controller.play_from(list, 0).unwrap();

            assert_eq!(calls(&controller), &[load("1"), load("1")], "{policy:?}");
            assert!(!controller.resource().failed());
        }
    }

    #[test]
    fn late_end_of_replaced_track_does_not_advance() {
        let mut controller = controller(RestartPolicy::EveryUpdate);
        controller
            .replace(vec![track("a", 1000), track("b", 1000), track("c", 1000)])
            .unwrap();
        let stale = ended(&controller);

        controller.next().unwrap();
        let signal = controller.handle_player_event(stale).unwrap();

        assert!(signal.is_none());
        assert_eq!(head_id(&controller), Some("b"));
        assert_eq!(calls(&controller), &[load("a"), load("b")]);
    }

    #[test]
    fn late_failure_is_not_blamed_on_new_track() {
        let mut controller = controller(RestartPolicy::EveryUpdate);
        controller
            .replace(vec![track("a", 1000), track("b", 1000)])
            .unwrap();
        let stale = failed(&controller, ResourceError::Load("timeout".to_string()));

        controller.next().unwrap();
        let signal = controller.handle_player_event(stale).unwrap();

        assert!(signal.is_none());
        assert!(!controller.resource().failed());
    }

    #[test]
    fn head_without_relations_still_plays() {
        let mut controller = controller(RestartPolicy::EveryUpdate);
        let bare = track("42", 0);
        assert!(bare.artist.is_none() && bare.album.is_none() && bare.genre.is_none());

        controller.replace(vec![bare]).unwrap();

        assert_eq!(
            controller.resource().source(),
            Some("http://pi.local/api/tracks/42.mp3")
        );
    }

    #[test]
    fn seek_by_is_relative_to_current_time() {
        let mut controller = controller(RestartPolicy::EveryUpdate);
        controller.replace(vec![track("1", 60000)]).unwrap();
        controller
            .handle_player_event(PlayerEvent::DurationChanged(60.0))
            .unwrap();
        controller
            .handle_player_event(PlayerEvent::TimeChanged(10.0))
            .unwrap();

        controller.seek_by(5.0).unwrap();
        assert_eq!(calls(&controller).last(), Some(&Call::SeekTo(15.0)));

        controller.seek_by(-20.0).unwrap();
        assert_eq!(calls(&controller).last(), Some(&Call::SeekTo(0.0)));
    }

    #[test]
    fn toggle_paused_follows_resource_state() {
        let mut controller = controller(RestartPolicy::EveryUpdate);
        controller.toggle_paused().unwrap();
        assert!(calls(&controller).is_empty());

        controller.replace(vec![track("1", 1000)]).unwrap();
        controller
            .handle_player_event(PlayerEvent::PauseChanged(false))
            .unwrap();
        controller.toggle_paused().unwrap();

        assert_eq!(calls(&controller).last(), Some(&Call::SetPaused(true)));
    }
}
