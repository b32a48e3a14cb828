//! Entry Registry. Owns every repeatable entry of a form session.
//!
//! Each section kind has its own id counter, its own ordered sequence of live ids
//! and its own entries. The order sequence is the only source of render order.
//! Every operation validates before it mutates, so a failed call leaves the form
//! exactly as it was and emits no event.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::form::entry::{Entry, EntryControls, EntryId};
use crate::form::error::FormError;
use crate::form::personal::PersonalInfo;
use crate::form::section::SectionKind;

// ────────────────────────────────────────────────────────────────────────────
// Render events
// ────────────────────────────────────────────────────────────────────────────

/// What changed inside a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SectionChange {
    Added { id: EntryId },
    Edited { id: EntryId, field: String },
    MovedUp { id: EntryId },
    MovedDown { id: EntryId },
    Removed { id: EntryId },
    VisibilityToggled { id: EntryId, visible: bool },
}

/// Re-render signal scoped to the part of the form that changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FormEvent {
    SectionChanged {
        kind: SectionKind,
        change: SectionChange,
    },
    PersonalInfoChanged {
        field: String,
    },
    Reset,
}

// ────────────────────────────────────────────────────────────────────────────
// State
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
struct SectionState {
    /// Highest id ever assigned; never decremented.
    last_id: EntryId,
    order: Vec<EntryId>,
    entries: BTreeMap<EntryId, Entry>,
}

impl SectionState {
    fn position(&self, id: EntryId) -> Option<usize> {
        self.order.iter().position(|&live| live == id)
    }
}

/// The whole form of one editing session.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    sections: BTreeMap<SectionKind, SectionState>,
    personal: PersonalInfo,
    events: Vec<FormEvent>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh form with one blank entry in every section, the way the form opens.
    pub fn seeded() -> Self {
        let mut state = Self::new();
        for kind in SectionKind::ALL {
            let id = state.next_id(kind);
            state.insert_entry(kind, id);
        }
        state.events.clear();
        state
    }

    // ── Entry operations ────────────────────────────────────────────────────

    /// Appends a blank entry to `kind`.
    ///
    /// Rejected with `RejectedEmptyAdd` when the most recently created entry of
    /// `kind` is still live and blank. Only that one entry is inspected: an older
    /// blank entry does not block the add.
    pub fn add_entry(&mut self, kind: SectionKind) -> Result<&Entry, FormError> {
        if let Some(last) = self.last_created(kind) {
            if last.is_empty() {
                return Err(FormError::RejectedEmptyAdd {
                    kind,
                    id: last.id(),
                });
            }
        }
        let id = self.next_id(kind);
        Ok(self.insert_entry(kind, id))
    }

    /// Sets a declared field. Date edits on work entries refresh the duration.
    pub fn edit_field(
        &mut self,
        kind: SectionKind,
        id: EntryId,
        field: &str,
        value: impl Into<String>,
    ) -> Result<&Entry, FormError> {
        let entry = self
            .sections
            .get_mut(&kind)
            .and_then(|s| s.entries.get_mut(&id))
            .ok_or(FormError::NotFound { kind, id })?;
        if kind.field(field).is_none() {
            return Err(FormError::InvalidOperation(format!(
                "{kind} entries have no field '{field}'"
            )));
        }

        entry.set_field(field, value.into());
        self.events.push(FormEvent::SectionChanged {
            kind,
            change: SectionChange::Edited {
                id,
                field: field.to_string(),
            },
        });
        Ok(entry)
    }

    /// Swaps `id` with its predecessor. Returns `false` when it is already first.
    pub fn move_up(&mut self, kind: SectionKind, id: EntryId) -> Result<bool, FormError> {
        let not_found = FormError::NotFound { kind, id };
        let section = self.sections.get_mut(&kind).ok_or(not_found.clone())?;
        let pos = section.position(id).ok_or(not_found)?;
        if pos == 0 {
            return Ok(false);
        }
        section.order.swap(pos - 1, pos);
        self.events.push(FormEvent::SectionChanged {
            kind,
            change: SectionChange::MovedUp { id },
        });
        Ok(true)
    }

    /// Swaps `id` with its successor. Returns `false` when it is already last.
    pub fn move_down(&mut self, kind: SectionKind, id: EntryId) -> Result<bool, FormError> {
        let not_found = FormError::NotFound { kind, id };
        let section = self.sections.get_mut(&kind).ok_or(not_found.clone())?;
        let pos = section.position(id).ok_or(not_found)?;
        if pos + 1 == section.order.len() {
            return Ok(false);
        }
        section.order.swap(pos, pos + 1);
        self.events.push(FormEvent::SectionChanged {
            kind,
            change: SectionChange::MovedDown { id },
        });
        Ok(true)
    }

    /// Deletes the entry and its order slot. Removing an absent id is a no-op
    /// and returns `false`.
    pub fn remove(&mut self, kind: SectionKind, id: EntryId) -> bool {
        let Some(section) = self.sections.get_mut(&kind) else {
            return false;
        };
        let Some(pos) = section.position(id) else {
            return false;
        };
        section.order.remove(pos);
        section.entries.remove(&id);
        self.events.push(FormEvent::SectionChanged {
            kind,
            change: SectionChange::Removed { id },
        });
        true
    }

    /// Flips the entry's visibility and returns the new value.
    pub fn toggle_visibility(&mut self, kind: SectionKind, id: EntryId) -> Result<bool, FormError> {
        if !kind.is_visibility_bearing() {
            return Err(FormError::InvalidOperation(format!(
                "{kind} entries have no visibility toggle"
            )));
        }
        let entry = self
            .sections
            .get_mut(&kind)
            .and_then(|s| s.entries.get_mut(&id))
            .ok_or(FormError::NotFound { kind, id })?;

        let visible = entry.toggle_visible();
        self.events.push(FormEvent::SectionChanged {
            kind,
            change: SectionChange::VisibilityToggled { id, visible },
        });
        Ok(visible)
    }

    // ── Personal section ────────────────────────────────────────────────────

    pub fn set_personal_field(
        &mut self,
        field: &str,
        value: impl Into<String>,
    ) -> Result<(), FormError> {
        self.personal.set(field, value.into())?;
        self.events.push(FormEvent::PersonalInfoChanged {
            field: field.to_string(),
        });
        Ok(())
    }

    /// Emits an event only when the flag actually changes.
    pub fn set_show_photo(&mut self, show: bool) -> bool {
        if self.personal.show_photo == show {
            return false;
        }
        self.personal.show_photo = show;
        self.events.push(FormEvent::PersonalInfoChanged {
            field: "show_photo".to_string(),
        });
        true
    }

    pub fn personal(&self) -> &PersonalInfo {
        &self.personal
    }

    /// Discards every entry, counter and personal value.
    pub fn reset(&mut self) {
        self.sections.clear();
        self.personal = PersonalInfo::default();
        self.events.clear();
        self.events.push(FormEvent::Reset);
    }

    // ── Queries ─────────────────────────────────────────────────────────────

    pub fn entry(&self, kind: SectionKind, id: EntryId) -> Option<&Entry> {
        self.sections.get(&kind).and_then(|s| s.entries.get(&id))
    }

    /// Live ids of `kind` in render order.
    pub fn order(&self, kind: SectionKind) -> &[EntryId] {
        self.sections
            .get(&kind)
            .map(|s| s.order.as_slice())
            .unwrap_or(&[])
    }

    /// Live entries of `kind` in render order.
    pub fn entries(&self, kind: SectionKind) -> impl Iterator<Item = &Entry> + '_ {
        let section = self.sections.get(&kind);
        section
            .into_iter()
            .flat_map(|s| s.order.iter().filter_map(move |id| s.entries.get(id)))
    }

    pub fn len(&self, kind: SectionKind) -> usize {
        self.order(kind).len()
    }

    pub fn is_visible(&self, kind: SectionKind, id: EntryId) -> Result<bool, FormError> {
        self.entry(kind, id)
            .map(Entry::is_visible)
            .ok_or(FormError::NotFound { kind, id })
    }

    /// Takes the pending render events, oldest first.
    pub fn drain_events(&mut self) -> Vec<FormEvent> {
        std::mem::take(&mut self.events)
    }

    /// Serializable view of the whole form for a UI to redraw from.
    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            personal_info: self.personal.clone(),
            sections: SectionKind::ALL
                .into_iter()
                .map(|kind| SectionSnapshot {
                    kind,
                    title: kind.title().to_string(),
                    order: self.order(kind).to_vec(),
                    entries: self.entries(kind).map(EntryView::from).collect(),
                })
                .collect(),
        }
    }

    // ── Internals ───────────────────────────────────────────────────────────

    fn last_created(&self, kind: SectionKind) -> Option<&Entry> {
        let section = self.sections.get(&kind)?;
        section.entries.get(&section.last_id)
    }

    fn next_id(&self, kind: SectionKind) -> EntryId {
        self.sections.get(&kind).map(|s| s.last_id).unwrap_or(0) + 1
    }

    fn insert_entry(&mut self, kind: SectionKind, id: EntryId) -> &Entry {
        let section = self.sections.entry(kind).or_default();
        section.last_id = id;
        section.order.push(id);
        self.events.push(FormEvent::SectionChanged {
            kind,
            change: SectionChange::Added { id },
        });
        section.entries.entry(id).or_insert(Entry::new(kind, id))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Snapshot types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct EntryView {
    #[serde(flatten)]
    pub entry: Entry,
    pub controls: EntryControls,
}

impl From<&Entry> for EntryView {
    fn from(entry: &Entry) -> Self {
        Self {
            entry: entry.clone(),
            controls: entry.controls(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionSnapshot {
    pub kind: SectionKind,
    pub title: String,
    pub order: Vec<EntryId>,
    pub entries: Vec<EntryView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormSnapshot {
    pub personal_info: PersonalInfo,
    pub sections: Vec<SectionSnapshot>,
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
