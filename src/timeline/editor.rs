/*!
 * The edit session facade.
 *
 * `SubtitleEditor` owns one `Timeline` and its `EditHistory`. Every
 * user-initiated mutation goes through here so that it is recorded as a single
 * undoable command and announced on the event bus after it succeeds. Failed
 * commands leave the timeline, the history and the bus untouched.
 */

use std::time::Instant;
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::Serialize;
use tokio::sync::broadcast;

use crate::alignment::AlignmentSource;
use crate::app_config::{Config, TimingConfig};
use crate::errors::{EditError, EditResult};
use crate::export::{ass, ExportFormat, Exporter};
use crate::language_utils;
use crate::particles::ParticleSelector;
use crate::subtitle::{Position, SubtitleEntry, SubtitleStyle, TimeRange};
use crate::timeline::events::{EventBus, TimelineEvent};
use crate::timeline::history::{EditCommand, EditEvent, EditHistory, FieldChange};
use crate::timeline::store::{ConflictResolution, MoveOutcome, StructuralChange, Timeline};
use crate::validation::validate_subtitles;

/// Rendered preview of one entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtitlePreview {
    pub id: String,
    pub start_ms: u64,
    pub end_ms: u64,
    /// Text with ASS override tags applied
    pub markup: String,
}

/// One editing session over a timeline
pub struct SubtitleEditor {
    timeline: Timeline,
    history: EditHistory,
    events: EventBus,
    timing: TimingConfig,
    exporter: Exporter,
    korean: bool,
    auto_correct_particles: bool,
}

impl SubtitleEditor {
    pub fn new(config: &Config) -> Self {
        Self {
            timeline: Timeline::new(config.editor.overlap_policy, config.editor.conflict_gap_ms),
            history: EditHistory::new(config.editor.history_limit),
            events: EventBus::new(),
            timing: config.timing.clone(),
            exporter: Exporter::new(config.export.generator_name.clone()),
            korean: language_utils::is_korean(&config.language),
            auto_correct_particles: config.editor.auto_correct_particles,
        }
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn entries(&self) -> &[SubtitleEntry] {
        self.timeline.entries()
    }

    pub fn get(&self, id: &str) -> Option<&SubtitleEntry> {
        self.timeline.get(id)
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TimelineEvent> {
        self.events.subscribe()
    }

    /// Replace the session content. History starts over.
    pub fn load(&mut self, entries: Vec<SubtitleEntry>) -> EditResult<()> {
        self.timeline.insert_or_replace(entries)?;
        self.history.clear();

        let count = self.timeline.len();
        info!("Loaded {} subtitles into the editor", count);
        self.events.publish(TimelineEvent::SubtitlesLoaded { count });
        Ok(())
    }

    /// Replace an entry's text. Korean sessions normalize particles first.
    pub fn edit_text(&mut self, id: &str, new_text: &str) -> EditResult<()> {
        let started = Instant::now();

        if !self.timeline.contains(id) {
            return Err(EditError::EntryNotFound(id.to_string()));
        }
        let trimmed = new_text.trim();
        if trimmed.is_empty() {
            return Err(EditError::EmptyText(id.to_string()));
        }

        let text = if self.korean && self.auto_correct_particles {
            ParticleSelector::process_text(trimmed)
        } else {
            trimmed.to_string()
        };

        let old = self.timeline.set_text(id, &text)?;
        self.history.record(EditCommand::Fields(vec![EditEvent::new(
            id,
            FieldChange::Text { old, new: text.clone() },
        )]));

        self.events.publish(TimelineEvent::SubtitleEdited {
            id: id.to_string(),
            text,
            latency: started.elapsed(),
        });
        Ok(())
    }

    /// Move an entry, pushing first-order conflicts forward
    pub fn move_entry(&mut self, id: &str, new_start_ms: u64) -> EditResult<MoveOutcome> {
        let outcome = self.timeline.move_entry(id, new_start_ms)?;

        let mut events = vec![EditEvent::new(
            id,
            FieldChange::Timing { old: outcome.old, new: outcome.new },
        )];
        events.extend(outcome.resolved.iter().map(timing_event));
        self.history.record(EditCommand::Fields(events));

        self.events.publish(TimelineEvent::TimelineUpdated {
            id: Some(id.to_string()),
            conflicts: outcome.resolved.clone(),
        });
        Ok(outcome)
    }

    pub fn update_style(&mut self, id: &str, style: Option<SubtitleStyle>) -> EditResult<()> {
        let old = self.timeline.set_style(id, style.clone())?;
        self.history.record(EditCommand::Fields(vec![EditEvent::new(
            id,
            FieldChange::Style { old, new: style },
        )]));
        self.events.publish(TimelineEvent::StyleUpdated { id: id.to_string() });
        Ok(())
    }

    pub fn update_position(&mut self, id: &str, position: Option<Position>) -> EditResult<()> {
        let old = self.timeline.set_position(id, position)?;
        self.history.record(EditCommand::Fields(vec![EditEvent::new(
            id,
            FieldChange::Position { old, new: position },
        )]));
        self.events.publish(TimelineEvent::StyleUpdated { id: id.to_string() });
        Ok(())
    }

    /// Split an entry into `<id>_1` and `<id>_2`
    pub fn split_at(&mut self, id: &str, char_offset: usize) -> EditResult<StructuralChange> {
        let change = self.timeline.split_at(id, char_offset)?;
        self.record_structural(&change);

        let parts = [change.inserted[0].id.clone(), change.inserted[1].id.clone()];
        self.events.publish(TimelineEvent::SubtitleSplit {
            original: id.to_string(),
            parts,
        });
        Ok(change)
    }

    /// Merge entries into the earliest one
    pub fn merge(&mut self, ids: &[&str]) -> EditResult<StructuralChange> {
        let change = self.timeline.merge(ids)?;
        self.record_structural(&change);

        let into = change.inserted[0].id.clone();
        self.events.publish(TimelineEvent::SubtitlesMerged {
            merged: change.removed.iter().map(|e| e.id.clone()).collect(),
            into: into.clone(),
        });
        if !change.resolved.is_empty() {
            self.events.publish(TimelineEvent::TimelineUpdated {
                id: Some(into),
                conflicts: change.resolved.clone(),
            });
        }
        Ok(change)
    }

    /// Revert the last command. Returns `false` when there was nothing to undo.
    pub fn undo(&mut self) -> EditResult<bool> {
        match self.history.undo(&mut self.timeline)? {
            Some(command) => {
                self.events.publish(TimelineEvent::Undo { entry_ids: command.entry_ids() });
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Re-apply the last undone command. Returns `false` when there was nothing to redo.
    pub fn redo(&mut self) -> EditResult<bool> {
        match self.history.redo(&mut self.timeline)? {
            Some(command) => {
                self.events.publish(TimelineEvent::Redo { entry_ids: command.entry_ids() });
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn search(&self, query: &str) -> Vec<&SubtitleEntry> {
        self.timeline.search(query)
    }

    /// Normalize particles in every entry as one undoable command.
    /// Returns the number of entries changed.
    pub fn auto_correct(&mut self) -> EditResult<usize> {
        let started = Instant::now();

        let corrections: Vec<(String, String, String)> = self
            .timeline
            .entries()
            .iter()
            .filter_map(|entry| {
                let corrected = ParticleSelector::process_text(&entry.text);
                (corrected != entry.text).then(|| (entry.id.clone(), entry.text.clone(), corrected))
            })
            .collect();

        if corrections.is_empty() {
            return Ok(0);
        }

        let mut events = Vec::with_capacity(corrections.len());
        for (id, old, new) in &corrections {
            self.timeline.set_text(id, new)?;
            events.push(EditEvent::new(
                id.as_str(),
                FieldChange::Text { old: old.clone(), new: new.clone() },
            ));
        }
        self.history.record(EditCommand::Fields(events));

        let latency = started.elapsed();
        for (id, _, new) in corrections.iter() {
            self.events.publish(TimelineEvent::SubtitleEdited {
                id: id.clone(),
                text: new.clone(),
                latency,
            });
        }
        debug!("Auto-correct changed {} entries", corrections.len());
        Ok(corrections.len())
    }

    /// Push every overlapping entry after its predecessor, cascading
    pub fn resolve_all_overlaps(&mut self) -> Vec<ConflictResolution> {
        let resolved = self.timeline.resolve_all_overlaps();
        if resolved.is_empty() {
            return resolved;
        }

        self.history.record(EditCommand::Fields(resolved.iter().map(timing_event).collect()));
        self.events.publish(TimelineEvent::TimelineUpdated {
            id: None,
            conflicts: resolved.clone(),
        });
        resolved
    }

    /// Advisory warnings for the current timeline
    pub fn validate(&self) -> Vec<String> {
        validate_subtitles(self.timeline.entries(), &self.timing)
    }

    pub fn export(&self, format: ExportFormat) -> Result<String> {
        self.exporter.export(self.timeline.entries(), format)
    }

    pub fn export_at(&self, format: ExportFormat, generated: DateTime<Utc>) -> Result<String> {
        self.exporter.export_at(self.timeline.entries(), format, generated)
    }

    /// Build the styled preview for one entry without touching the timeline
    pub async fn generate_preview(&self, id: &str) -> EditResult<SubtitlePreview> {
        let entry = self
            .timeline
            .get(id)
            .cloned()
            .ok_or_else(|| EditError::EntryNotFound(id.to_string()))?;

        tokio::task::yield_now().await;

        Ok(SubtitlePreview {
            markup: format!("{}{}", ass::override_tags(&entry), entry.text.replace('\n', "\\N")),
            id: entry.id,
            start_ms: entry.start_time_ms,
            end_ms: entry.end_time_ms,
        })
    }

    /// Nudge every entry by the offsets `source` proposes.
    ///
    /// Nothing is written until all offsets are known; they are then applied
    /// in one pass, keeping start order and clamping each entry so it starts
    /// no earlier than 0 and no earlier than its predecessor's new end.
    /// Returns the number of entries whose timing changed.
    pub async fn auto_align(&mut self, source: &dyn AlignmentSource) -> Result<usize> {
        let snapshot: Vec<SubtitleEntry> = self.timeline.entries().to_vec();
        if snapshot.is_empty() {
            return Ok(0);
        }

        let offsets = source.offsets(&snapshot).await?;
        if offsets.len() != snapshot.len() {
            return Err(anyhow!(
                "Alignment source returned {} offsets for {} entries",
                offsets.len(),
                snapshot.len()
            ));
        }

        let mut previous_end = 0u64;
        let mut events = Vec::new();
        let mut changes = Vec::new();
        for (entry, offset) in snapshot.iter().zip(offsets) {
            let old = entry.time_range();
            let shifted = i64::try_from(old.start_ms).unwrap_or(i64::MAX).saturating_add(offset).max(0) as u64;
            let start = shifted.max(previous_end);
            let end = start
                .checked_add(old.duration_ms().max(1))
                .ok_or(EditError::InvalidTimeRange { start_ms: start, end_ms: u64::MAX })?;
            let new = TimeRange::new(start, end);
            previous_end = new.end_ms;

            if new != old {
                changes.push((entry.id.clone(), new));
                events.push(EditEvent::new(entry.id.as_str(), FieldChange::Timing { old, new }));
            }
        }

        if changes.is_empty() {
            return Ok(0);
        }

        self.timeline.set_timings(&changes)?;
        self.history.record(EditCommand::Fields(events));
        self.events.publish(TimelineEvent::TimelineUpdated {
            id: None,
            conflicts: Vec::new(),
        });

        info!("Auto-align adjusted {} of {} entries", changes.len(), snapshot.len());
        Ok(changes.len())
    }

    fn record_structural(&mut self, change: &StructuralChange) {
        self.history.record(EditCommand::Replace {
            removed: change.removed.clone(),
            inserted: change.inserted.clone(),
            pushed: change.resolved.clone(),
            timestamp: Utc::now(),
        });
    }
}

fn timing_event(resolution: &ConflictResolution) -> EditEvent {
    EditEvent::new(
        resolution.id.as_str(),
        FieldChange::Timing { old: resolution.old, new: resolution.new },
    )
}
