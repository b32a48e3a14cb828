//! Collection Assembler: the read-only document handed to preview, export and
//! save.
//!
//! Sections appear in canonical order, always all of them. Within a section only
//! live entries appear, in render order, skipping hidden entries and entries whose
//! required fields are all blank. Values are trimmed and blank fields dropped.
//! Pure: two calls without a mutation in between give equal documents.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::form::entry::{Entry, EntryId};
use crate::form::personal::PersonalInfo;
use crate::form::registry::FormState;
use crate::form::section::SectionKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentEntry {
    pub id: EntryId,
    pub fields: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

impl DocumentEntry {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

impl From<&Entry> for DocumentEntry {
    fn from(entry: &Entry) -> Self {
        let fields = entry
            .fields()
            .iter()
            .filter_map(|(name, value)| {
                let value = value.trim();
                (!value.is_empty()).then(|| (name.clone(), value.to_string()))
            })
            .collect();
        Self {
            id: entry.id(),
            fields,
            duration: entry.duration().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSection {
    pub section: SectionKind,
    pub title: String,
    pub entries: Vec<DocumentEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeDocument {
    pub personal_info: PersonalInfo,
    pub sections: Vec<DocumentSection>,
}

impl ResumeDocument {
    pub fn section(&self, kind: SectionKind) -> &[DocumentEntry] {
        self.sections
            .iter()
            .find(|s| s.section == kind)
            .map(|s| s.entries.as_slice())
            .unwrap_or(&[])
    }
}

/// Included iff visible (or not visibility-bearing) and not blank.
fn is_assembled(entry: &Entry) -> bool {
    entry.is_visible() && !entry.is_empty()
}

pub fn assemble(state: &FormState) -> ResumeDocument {
    let sections = SectionKind::ALL
        .into_iter()
        .map(|kind| DocumentSection {
            section: kind,
            title: kind.title().to_string(),
            entries: state
                .entries(kind)
                .filter(|e| is_assembled(e))
                .map(DocumentEntry::from)
                .collect(),
        })
        .collect();

    ResumeDocument {
        personal_info: state.personal().clone(),
        sections,
    }
}

impl FormState {
    pub fn assemble(&self) -> ResumeDocument {
        assemble(self)
    }
}
