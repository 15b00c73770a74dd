/*!
 * The ordered subtitle store for one editing session.
 *
 * Entries are kept in a vector sorted by `(start, id)` with a side index from
 * id to slot, rebuilt after every mutation that can reorder entries. Insertion
 * order never stands in for temporal order.
 */

use std::collections::{HashMap, HashSet};
use log::debug;
use serde::Serialize;

use crate::app_config::OverlapPolicy;
use crate::errors::{EditError, EditResult};
use crate::subtitle::{Position, SubtitleEntry, SubtitleStyle, TimeRange};

/// An entry pushed aside to resolve an overlap
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictResolution {
    pub id: String,
    pub old: TimeRange,
    pub new: TimeRange,
}

/// Result of moving an entry
#[derive(Debug, Clone, PartialEq)]
pub struct MoveOutcome {
    pub old: TimeRange,
    pub new: TimeRange,
    /// Entries that overlapped the moved entry and were pushed forward
    pub resolved: Vec<ConflictResolution>,
}

/// Entries removed and inserted by a structural edit (split or merge)
#[derive(Debug, Clone, PartialEq)]
pub struct StructuralChange {
    pub removed: Vec<SubtitleEntry>,
    pub inserted: Vec<SubtitleEntry>,
    /// Untouched entries pushed aside because the inserted ones covered them
    pub resolved: Vec<ConflictResolution>,
}

/// Ordered, id-indexed collection of subtitle entries
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    entries: Vec<SubtitleEntry>,
    index: HashMap<String, usize>,
    policy: OverlapPolicy,
    conflict_gap_ms: u64,
}

impl Timeline {
    pub fn new(policy: OverlapPolicy, conflict_gap_ms: u64) -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            policy,
            conflict_gap_ms,
        }
    }

    pub fn policy(&self) -> OverlapPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: OverlapPolicy) {
        self.policy = policy;
    }

    pub fn conflict_gap_ms(&self) -> u64 {
        self.conflict_gap_ms
    }

    /// Entries in start-time order
    pub fn entries(&self) -> &[SubtitleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&SubtitleEntry> {
        self.index.get(id).map(|&slot| &self.entries[slot])
    }

    /// Replace the whole timeline content. Ids must be unique.
    pub fn insert_or_replace(&mut self, entries: Vec<SubtitleEntry>) -> EditResult<()> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.id.as_str()) {
                return Err(EditError::DuplicateEntryId(entry.id.clone()));
            }
        }

        self.entries = entries;
        self.reindex();
        debug!("Timeline loaded with {} entries", self.entries.len());
        Ok(())
    }

    /// Replace an entry's text, returning the previous text
    pub fn set_text(&mut self, id: &str, text: &str) -> EditResult<String> {
        let entry = self.get_mut(id)?;
        Ok(std::mem::replace(&mut entry.text, text.to_string()))
    }

    /// Replace an entry's style, returning the previous style
    pub fn set_style(&mut self, id: &str, style: Option<SubtitleStyle>) -> EditResult<Option<SubtitleStyle>> {
        let entry = self.get_mut(id)?;
        Ok(std::mem::replace(&mut entry.style, style))
    }

    /// Replace an entry's position, returning the previous position
    pub fn set_position(&mut self, id: &str, position: Option<Position>) -> EditResult<Option<Position>> {
        let entry = self.get_mut(id)?;
        Ok(std::mem::replace(&mut entry.position, position))
    }

    /// Write several intervals at once, without conflict resolution.
    ///
    /// All ids are checked before anything is written.
    pub fn set_timings(&mut self, changes: &[(String, TimeRange)]) -> EditResult<()> {
        for (id, range) in changes {
            if !self.contains(id) {
                return Err(EditError::EntryNotFound(id.clone()));
            }
            if range.end_ms <= range.start_ms {
                return Err(EditError::InvalidTimeRange {
                    start_ms: range.start_ms,
                    end_ms: range.end_ms,
                });
            }
        }

        for (id, range) in changes {
            let slot = self.index[id.as_str()];
            self.entries[slot].start_time_ms = range.start_ms;
            self.entries[slot].end_time_ms = range.end_ms;
        }
        self.reindex();
        Ok(())
    }

    /// Ids of entries whose interval intersects `range`, other than `exclude`
    pub fn detect_conflicts(&self, range: TimeRange, exclude: &str) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.id != exclude)
            .filter(|e| e.start_time_ms < range.end_ms && range.start_ms < e.end_time_ms)
            .map(|e| e.id.clone())
            .collect()
    }

    /// Shift an entry to `new_start_ms`, keeping its duration.
    ///
    /// Under `OverlapPolicy::Resolve`, every entry overlapping the new interval
    /// is pushed forward in start order: the first starts at the moved entry's
    /// end plus the conflict gap, each following one after its predecessor.
    /// Only these first-order conflicts are resolved; entries they land on are
    /// left for `resolve_all_overlaps`.
    pub fn move_entry(&mut self, id: &str, new_start_ms: u64) -> EditResult<MoveOutcome> {
        let old = self
            .get(id)
            .map(SubtitleEntry::time_range)
            .ok_or_else(|| EditError::EntryNotFound(id.to_string()))?;
        let new_end_ms = new_start_ms
            .checked_add(old.duration_ms())
            .ok_or(EditError::InvalidTimeRange { start_ms: new_start_ms, end_ms: u64::MAX })?;
        let new = TimeRange::new(new_start_ms, new_end_ms);

        let resolved = self.plan_pushes(new, &[id])?;
        let mut changes = vec![(id.to_string(), new)];
        changes.extend(resolved.iter().map(|r| (r.id.clone(), r.new)));

        self.set_timings(&changes)?;
        if !resolved.is_empty() {
            debug!("Move of {} pushed {} conflicting entries", id, resolved.len());
        }

        Ok(MoveOutcome { old, new, resolved })
    }

    /// Where each entry overlapping `range` goes under `OverlapPolicy::Resolve`.
    ///
    /// Conflicts are chained in start order from `range.end_ms` plus the gap.
    /// Nothing is written; an interval past `u64::MAX` fails the whole plan.
    fn plan_pushes(&self, range: TimeRange, exclude: &[&str]) -> EditResult<Vec<ConflictResolution>> {
        if self.policy != OverlapPolicy::Resolve {
            return Ok(Vec::new());
        }

        let overflow = |start_ms: u64| EditError::InvalidTimeRange { start_ms, end_ms: u64::MAX };
        let mut cursor = range
            .end_ms
            .checked_add(self.conflict_gap_ms)
            .ok_or_else(|| overflow(range.end_ms))?;
        let mut resolved = Vec::new();

        for other in &self.entries {
            if exclude.contains(&other.id.as_str())
                || other.end_time_ms <= range.start_ms
                || range.end_ms <= other.start_time_ms
            {
                continue;
            }

            let end = cursor.checked_add(other.duration_ms()).ok_or_else(|| overflow(cursor))?;
            let pushed = TimeRange::new(cursor, end);
            cursor = end.checked_add(self.conflict_gap_ms).ok_or_else(|| overflow(end))?;

            resolved.push(ConflictResolution {
                id: other.id.clone(),
                old: other.time_range(),
                new: pushed,
            });
        }
        Ok(resolved)
    }

    /// Sweep the whole timeline, pushing each entry that overlaps its predecessor
    /// to start after it. Cascades through the timeline in one pass.
    pub fn resolve_all_overlaps(&mut self) -> Vec<ConflictResolution> {
        let mut resolved = Vec::new();
        let mut previous_end: Option<u64> = None;

        for entry in &mut self.entries {
            if let Some(prev_end) = previous_end {
                if entry.start_time_ms < prev_end {
                    let old = entry.time_range();
                    let start = prev_end.saturating_add(self.conflict_gap_ms);
                    entry.start_time_ms = start;
                    entry.end_time_ms = start.saturating_add(old.duration_ms());
                    resolved.push(ConflictResolution {
                        id: entry.id.clone(),
                        old,
                        new: entry.time_range(),
                    });
                }
            }
            previous_end = Some(entry.end_time_ms);
        }

        self.reindex();
        resolved
    }

    /// Split an entry at a character offset into `<id>_1` and `<id>_2`.
    ///
    /// The text is cut at `char_offset` and both halves are trimmed; the time
    /// range is cut at its midpoint. Style and position are inherited.
    pub fn split_at(&mut self, id: &str, char_offset: usize) -> EditResult<StructuralChange> {
        let original = self
            .get(id)
            .cloned()
            .ok_or_else(|| EditError::EntryNotFound(id.to_string()))?;

        let len = original.char_count();
        let invalid = || EditError::InvalidSplitOffset {
            id: id.to_string(),
            offset: char_offset,
            len,
        };

        if char_offset == 0 || char_offset >= len {
            return Err(invalid());
        }

        let byte_offset = original
            .text
            .char_indices()
            .nth(char_offset)
            .map(|(index, _)| index)
            .ok_or_else(invalid)?;
        let head = original.text[..byte_offset].trim();
        let tail = original.text[byte_offset..].trim();
        if head.is_empty() || tail.is_empty() {
            return Err(invalid());
        }

        if original.duration_ms() < 2 {
            return Err(EditError::InvalidTimeRange {
                start_ms: original.start_time_ms,
                end_ms: original.end_time_ms,
            });
        }
        let midpoint = original.start_time_ms + original.duration_ms() / 2;

        let mut first = original.clone();
        first.id = format!("{}_1", id);
        first.end_time_ms = midpoint;
        first.text = head.to_string();

        let mut second = original.clone();
        second.id = format!("{}_2", id);
        second.start_time_ms = midpoint;
        second.text = tail.to_string();

        self.replace(&[id.to_string()], vec![first, second])
    }

    /// Merge two or more entries into one.
    ///
    /// Entries are ordered by start time; texts are joined with single spaces,
    /// the interval spans the earliest start to the latest end, and the merged
    /// entry keeps the earliest entry's id, style and position.
    ///
    /// Entries lying between non-adjacent merged ones end up inside the merged
    /// interval; under `OverlapPolicy::Resolve` they are pushed past its end
    /// the same way `move_entry` pushes its conflicts.
    pub fn merge(&mut self, ids: &[&str]) -> EditResult<StructuralChange> {
        if ids.len() < 2 {
            return Err(EditError::InsufficientEntries { given: ids.len() });
        }

        let mut unique: Vec<&str> = Vec::with_capacity(ids.len());
        for &id in ids {
            if !self.contains(id) {
                return Err(EditError::EntryNotFound(id.to_string()));
            }
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        if unique.len() < 2 {
            return Err(EditError::InsufficientEntries { given: unique.len() });
        }

        let mut parts: Vec<&SubtitleEntry> = unique.iter().filter_map(|id| self.get(id)).collect();
        parts.sort_by(|a, b| {
            a.start_time_ms
                .cmp(&b.start_time_ms)
                .then_with(|| a.id.cmp(&b.id))
        });

        let earliest = parts[0];
        let mut merged = earliest.clone();
        merged.end_time_ms = parts.iter().map(|e| e.end_time_ms).max().unwrap_or(earliest.end_time_ms);
        merged.text = parts
            .iter()
            .map(|e| e.text.trim())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        let removed: Vec<String> = parts.iter().map(|e| e.id.clone()).collect();
        let exclude: Vec<&str> = removed.iter().map(String::as_str).collect();
        let resolved = self.plan_pushes(merged.time_range(), &exclude)?;

        let mut change = self.replace(&removed, vec![merged])?;
        if !resolved.is_empty() {
            let timings: Vec<(String, TimeRange)> = resolved.iter().map(|r| (r.id.clone(), r.new)).collect();
            self.set_timings(&timings)?;
            debug!("Merge into {} pushed {} covered entries", change.inserted[0].id, resolved.len());
        }
        change.resolved = resolved;
        Ok(change)
    }

    /// Atomically remove some entries and insert others.
    ///
    /// Fails without writing anything if a removed id is missing or an
    /// inserted id would collide with a remaining entry.
    pub fn replace(&mut self, remove: &[String], insert: Vec<SubtitleEntry>) -> EditResult<StructuralChange> {
        for id in remove {
            if !self.contains(id) {
                return Err(EditError::EntryNotFound(id.clone()));
            }
        }

        let mut incoming = HashSet::with_capacity(insert.len());
        for entry in &insert {
            let taken = self.contains(&entry.id) && !remove.contains(&entry.id);
            if taken || !incoming.insert(entry.id.as_str()) {
                return Err(EditError::DuplicateEntryId(entry.id.clone()));
            }
        }

        let (removed, kept): (Vec<SubtitleEntry>, Vec<SubtitleEntry>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|e| remove.contains(&e.id));

        self.entries = kept;
        self.entries.extend(insert.iter().cloned());
        self.reindex();

        Ok(StructuralChange { removed, inserted: insert, resolved: Vec::new() })
    }

    /// Case-insensitive substring search over entry text, in timeline order
    pub fn search(&self, query: &str) -> Vec<&SubtitleEntry> {
        let needle = query.to_lowercase();
        self.entries
            .iter()
            .filter(|e| e.text.to_lowercase().contains(&needle))
            .collect()
    }

    fn get_mut(&mut self, id: &str) -> EditResult<&mut SubtitleEntry> {
        match self.index.get(id) {
            Some(&slot) => Ok(&mut self.entries[slot]),
            None => Err(EditError::EntryNotFound(id.to_string())),
        }
    }

    fn reindex(&mut self) {
        self.entries.sort_by(|a, b| {
            a.start_time_ms
                .cmp(&b.start_time_ms)
                .then_with(|| a.id.cmp(&b.id))
        });
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(slot, entry)| (entry.id.clone(), slot))
            .collect();
    }
}
