/*!
 * Undo/redo history as a log of reversible commands.
 *
 * Each user-initiated mutation records one `EditCommand`. Field commands hold
 * typed old/new values per field, so reverting never needs to guess a value's
 * type; replace commands hold the entries a split or merge removed and inserted.
 */

use std::collections::VecDeque;
use chrono::{DateTime, Utc};
use log::debug;

use crate::errors::{EditError, EditResult};
use crate::subtitle::{Position, SubtitleEntry, SubtitleStyle, TimeRange};
use crate::timeline::store::{ConflictResolution, Timeline};

/// Which field an edit touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Text,
    /// Start and end time together
    Timing,
    Style,
    Position,
}

/// Old and new value of one field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldChange {
    Text { old: String, new: String },
    Timing { old: TimeRange, new: TimeRange },
    Style { old: Option<SubtitleStyle>, new: Option<SubtitleStyle> },
    Position { old: Option<Position>, new: Option<Position> },
}

impl FieldChange {
    pub fn field(&self) -> EditField {
        match self {
            Self::Text { .. } => EditField::Text,
            Self::Timing { .. } => EditField::Timing,
            Self::Style { .. } => EditField::Style,
            Self::Position { .. } => EditField::Position,
        }
    }

    /// The same change running the other way
    pub fn inverted(&self) -> Self {
        match self.clone() {
            Self::Text { old, new } => Self::Text { old: new, new: old },
            Self::Timing { old, new } => Self::Timing { old: new, new: old },
            Self::Style { old, new } => Self::Style { old: new, new: old },
            Self::Position { old, new } => Self::Position { old: new, new: old },
        }
    }
}

/// One field edit on one entry
#[derive(Debug, Clone, PartialEq)]
pub struct EditEvent {
    pub entry_id: String,
    pub change: FieldChange,
    pub timestamp: DateTime<Utc>,
}

impl EditEvent {
    pub fn new(entry_id: impl Into<String>, change: FieldChange) -> Self {
        Self {
            entry_id: entry_id.into(),
            change,
            timestamp: Utc::now(),
        }
    }

    pub fn field(&self) -> EditField {
        self.change.field()
    }
}

/// A reversible unit of work
#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    /// Field edits applied together (a move and the conflicts it pushed, for example)
    Fields(Vec<EditEvent>),
    /// Entries removed and inserted by a split or merge, plus the entries
    /// the inserted ones pushed aside
    Replace {
        removed: Vec<SubtitleEntry>,
        inserted: Vec<SubtitleEntry>,
        pushed: Vec<ConflictResolution>,
        timestamp: DateTime<Utc>,
    },
}

impl EditCommand {
    /// Ids of every entry the command touches
    pub fn entry_ids(&self) -> Vec<String> {
        match self {
            Self::Fields(events) => {
                let mut ids: Vec<String> = Vec::with_capacity(events.len());
                for event in events {
                    if !ids.contains(&event.entry_id) {
                        ids.push(event.entry_id.clone());
                    }
                }
                ids
            }
            Self::Replace { removed, inserted, pushed, .. } => removed
                .iter()
                .chain(inserted.iter())
                .map(|e| e.id.clone())
                .chain(pushed.iter().map(|r| r.id.clone()))
                .collect(),
        }
    }

    /// Write the command's new values into the timeline
    pub fn apply(&self, timeline: &mut Timeline) -> EditResult<()> {
        match self {
            Self::Fields(events) => {
                let changes: Vec<(String, FieldChange)> = events
                    .iter()
                    .map(|e| (e.entry_id.clone(), e.change.clone()))
                    .collect();
                write_changes(timeline, &changes)
            }
            Self::Replace { removed, inserted, pushed, .. } => {
                let timings: Vec<(String, TimeRange)> = pushed.iter().map(|r| (r.id.clone(), r.new)).collect();
                ensure_present(timeline, &timings)?;

                let ids: Vec<String> = removed.iter().map(|e| e.id.clone()).collect();
                timeline.replace(&ids, inserted.clone())?;
                if !timings.is_empty() {
                    timeline.set_timings(&timings)?;
                }
                Ok(())
            }
        }
    }

    /// Write the command's old values back into the timeline
    pub fn revert(&self, timeline: &mut Timeline) -> EditResult<()> {
        match self {
            Self::Fields(events) => {
                let changes: Vec<(String, FieldChange)> = events
                    .iter()
                    .rev()
                    .map(|e| (e.entry_id.clone(), e.change.inverted()))
                    .collect();
                write_changes(timeline, &changes)
            }
            Self::Replace { removed, inserted, pushed, .. } => {
                let timings: Vec<(String, TimeRange)> = pushed.iter().map(|r| (r.id.clone(), r.old)).collect();
                ensure_present(timeline, &timings)?;

                let ids: Vec<String> = inserted.iter().map(|e| e.id.clone()).collect();
                timeline.replace(&ids, removed.clone())?;
                if !timings.is_empty() {
                    timeline.set_timings(&timings)?;
                }
                Ok(())
            }
        }
    }
}

/// Fail before a structural write if a pushed entry has gone missing
fn ensure_present(timeline: &Timeline, timings: &[(String, TimeRange)]) -> EditResult<()> {
    match timings.iter().find(|(id, _)| !timeline.contains(id)) {
        Some((id, _)) => Err(EditError::EntryNotFound(id.clone())),
        None => Ok(()),
    }
}

/// Apply field changes, writing all timing changes in one batch so no
/// intermediate state is observed
fn write_changes(timeline: &mut Timeline, changes: &[(String, FieldChange)]) -> EditResult<()> {
    let mut timings = Vec::new();
    for (id, change) in changes {
        match change {
            FieldChange::Text { new, .. } => {
                timeline.set_text(id, new)?;
            }
            FieldChange::Timing { new, .. } => timings.push((id.clone(), *new)),
            FieldChange::Style { new, .. } => {
                timeline.set_style(id, new.clone())?;
            }
            FieldChange::Position { new, .. } => {
                timeline.set_position(id, *new)?;
            }
        }
    }

    if !timings.is_empty() {
        timeline.set_timings(&timings)?;
    }
    Ok(())
}

/// Two-stack undo/redo log with a bounded undo depth
#[derive(Debug, Clone)]
pub struct EditHistory {
    undo_stack: VecDeque<EditCommand>,
    redo_stack: Vec<EditCommand>,
    limit: usize,
}

impl EditHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Record a new user-initiated command; clears the redo stack
    pub fn record(&mut self, command: EditCommand) {
        self.redo_stack.clear();
        self.undo_stack.push_back(command);
        if self.undo_stack.len() > self.limit {
            self.undo_stack.pop_front();
        }
    }

    /// Revert the most recent command. `Ok(None)` when there is nothing to undo.
    pub fn undo(&mut self, timeline: &mut Timeline) -> EditResult<Option<EditCommand>> {
        let Some(command) = self.undo_stack.pop_back() else {
            return Ok(None);
        };

        if let Err(e) = command.revert(timeline) {
            self.undo_stack.push_back(command);
            return Err(e);
        }

        debug!("Undid command touching {:?}", command.entry_ids());
        self.redo_stack.push(command.clone());
        Ok(Some(command))
    }

    /// Re-apply the most recently undone command. `Ok(None)` when there is nothing to redo.
    pub fn redo(&mut self, timeline: &mut Timeline) -> EditResult<Option<EditCommand>> {
        let Some(command) = self.redo_stack.pop() else {
            return Ok(None);
        };

        if let Err(e) = command.apply(timeline) {
            self.redo_stack.push(command);
            return Err(e);
        }

        debug!("Redid command touching {:?}", command.entry_ids());
        self.undo_stack.push_back(command.clone());
        Ok(Some(command))
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new(100)
    }
}
