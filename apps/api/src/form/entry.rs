use std::collections::BTreeMap;

use serde::Serialize;

use crate::form::duration::compute_duration;
use crate::form::section::{SectionKind, END_DATE, START_DATE};

/// Identifier of an entry within its section. Starts at 1, never reused.
pub type EntryId = u32;

/// A single repeatable row of a form section.
///
/// Every declared field of the kind is present (default empty). `visible` is
/// only set for visibility-bearing kinds. `duration` is derived and cannot be
/// edited directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    kind: SectionKind,
    id: EntryId,
    fields: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<String>,
}

/// Presentation hints carried over from the form UI: only the first entry of a
/// visibility-bearing section shows an eye toggle, and the first entry of any
/// section has no delete button. The registry does not enforce either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntryControls {
    pub visibility_toggle: bool,
    pub deletable: bool,
}

impl Entry {
    pub(crate) fn new(kind: SectionKind, id: EntryId) -> Self {
        let fields = kind
            .fields()
            .iter()
            .map(|f| (f.name.to_string(), String::new()))
            .collect();
        Self {
            kind,
            id,
            fields,
            visible: kind.is_visibility_bearing().then_some(true),
            duration: None,
        }
    }

    pub fn kind(&self) -> SectionKind {
        self.kind
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    /// Raw value of a field; undeclared fields read as empty.
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    /// Absent flags (skills, hobbies) count as visible.
    pub fn is_visible(&self) -> bool {
        self.visible.unwrap_or(true)
    }

    pub fn duration(&self) -> Option<&str> {
        self.duration.as_deref()
    }

    /// All required fields of the kind are blank or whitespace.
    pub fn is_empty(&self) -> bool {
        self.kind
            .required_fields()
            .iter()
            .all(|name| self.field(name).trim().is_empty())
    }

    pub fn controls(&self) -> EntryControls {
        EntryControls {
            visibility_toggle: self.kind.is_visibility_bearing() && self.id == 1,
            deletable: self.id > 1,
        }
    }

    pub(crate) fn set_field(&mut self, name: &str, value: String) {
        self.fields.insert(name.to_string(), value);
        if self.kind.drives_duration(name) {
            self.refresh_duration();
        }
    }

    /// Flips the flag and returns the new value. Callers check the kind first.
    pub(crate) fn toggle_visible(&mut self) -> bool {
        let next = !self.is_visible();
        self.visible = Some(next);
        next
    }

    fn refresh_duration(&mut self) {
        let computed = compute_duration(Some(self.field(START_DATE)), Some(self.field(END_DATE)));
        self.duration = (!computed.is_empty()).then_some(computed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry_has_every_declared_field_blank() {
        let entry = Entry::new(SectionKind::Education, 1);
        assert_eq!(entry.fields().len(), SectionKind::Education.fields().len());
        assert!(entry.fields().values().all(String::is_empty));
        assert!(entry.is_empty());
    }

    #[test]
    fn test_visibility_flag_only_on_bearing_kinds() {
        assert_eq!(Entry::new(SectionKind::Project, 1).visible, Some(true));
        assert_eq!(Entry::new(SectionKind::Hobby, 1).visible, None);
        assert!(Entry::new(SectionKind::Hobby, 1).is_visible());
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        let mut entry = Entry::new(SectionKind::WorkExperience, 1);
        entry.set_field("company", "   ".to_string());
        entry.set_field("start_date", "2020-01-01".to_string());
        assert!(entry.is_empty(), "dates alone do not make a work entry non-empty");

        entry.set_field("role", "Engineer".to_string());
        assert!(!entry.is_empty());
    }

    #[test]
    fn test_date_edits_refresh_duration() {
        let mut entry = Entry::new(SectionKind::WorkExperience, 1);
        entry.set_field("start_date", "2020-01-01".to_string());
        assert_eq!(entry.duration(), None);

        entry.set_field("end_date", "2022-04-01".to_string());
        assert_eq!(entry.duration(), Some("2 years 3 months"));

        entry.set_field("end_date", "2019-01-01".to_string());
        assert_eq!(entry.duration(), None, "stale duration must be cleared");
    }

    #[test]
    fn test_controls_follow_first_entry_rule() {
        let first = Entry::new(SectionKind::Certification, 1).controls();
        assert!(first.visibility_toggle);
        assert!(!first.deletable);

        let second = Entry::new(SectionKind::Certification, 2).controls();
        assert!(!second.visibility_toggle);
        assert!(second.deletable);

        let skill = Entry::new(SectionKind::TechnicalSkill, 1).controls();
        assert!(!skill.visibility_toggle);
    }

    #[test]
    fn test_toggle_visible_flips() {
        let mut entry = Entry::new(SectionKind::WorkExperience, 3);
        assert!(!entry.toggle_visible());
        assert!(!entry.is_visible());
        assert!(entry.toggle_visible());
    }
}
