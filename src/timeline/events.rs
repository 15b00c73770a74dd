/*!
 * Notifications emitted after successful timeline mutations.
 *
 * Events are published on a tokio broadcast channel; rendering and
 * persistence layers subscribe and receive every event in order.
 */

use std::time::Duration;
use log::debug;
use tokio::sync::broadcast;

use crate::timeline::store::ConflictResolution;

/// Channel capacity; slow subscribers lag rather than block the editor
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Something that happened to the timeline
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineEvent {
    SubtitlesLoaded {
        count: usize,
    },
    SubtitleEdited {
        id: String,
        text: String,
        /// Time taken to apply the edit
        latency: Duration,
    },
    TimelineUpdated {
        /// Entry that was moved, `None` for whole-timeline passes
        id: Option<String>,
        conflicts: Vec<ConflictResolution>,
    },
    StyleUpdated {
        id: String,
    },
    SubtitleSplit {
        original: String,
        parts: [String; 2],
    },
    SubtitlesMerged {
        merged: Vec<String>,
        into: String,
    },
    Undo {
        entry_ids: Vec<String>,
    },
    Redo {
        entry_ids: Vec<String>,
    },
}

impl TimelineEvent {
    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            Self::SubtitlesLoaded { .. } => "subtitles:loaded",
            Self::SubtitleEdited { .. } => "subtitle:edited",
            Self::TimelineUpdated { .. } => "timeline:updated",
            Self::StyleUpdated { .. } => "style:updated",
            Self::SubtitleSplit { .. } => "subtitle:split",
            Self::SubtitlesMerged { .. } => "subtitles:merged",
            Self::Undo { .. } => "undo",
            Self::Redo { .. } => "redo",
        }
    }
}

/// Fan-out publisher for timeline events
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<TimelineEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TimelineEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publish an event; having no subscribers is not an error
    pub fn publish(&self, event: TimelineEvent) {
        debug!("event {}", event.name());
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
