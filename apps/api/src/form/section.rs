use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::form::error::FormError;

/// Field names shared with the derived duration computation.
pub const START_DATE: &str = "start_date";
pub const END_DATE: &str = "end_date";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    WorkExperience,
    Education,
    Project,
    ProfessionalSkill,
    TechnicalSkill,
    PersonalSkill,
    Hobby,
    Certification,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Date,
    Number,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field_type: FieldType,
}

const fn text(name: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        field_type: FieldType::Text,
    }
}

const fn date(name: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        field_type: FieldType::Date,
    }
}

const fn number(name: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        field_type: FieldType::Number,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Field declarations
// ────────────────────────────────────────────────────────────────────────────

const WORK_FIELDS: &[FieldSpec] = &[
    text("company"),
    text("role"),
    date(START_DATE),
    date(END_DATE),
];
const EDUCATION_FIELDS: &[FieldSpec] = &[
    text("college"),
    text("course"),
    number("year"),
    text("percentage"),
];
const PROJECT_FIELDS: &[FieldSpec] = &[text("name"), text("description"), text("link")];
const NAME_ONLY_FIELDS: &[FieldSpec] = &[text("name")];
const CERTIFICATION_FIELDS: &[FieldSpec] =
    &[text("name"), text("organization"), number("year")];

/// An entry counts as empty when every one of these is blank. The add-guard and
/// the assembler both read this table.
const WORK_REQUIRED: &[&str] = &["company", "role"];
const EDUCATION_REQUIRED: &[&str] = &["college", "course"];
const PROJECT_REQUIRED: &[&str] = &["name", "description"];
const NAME_REQUIRED: &[&str] = &["name"];
const CERTIFICATION_REQUIRED: &[&str] = &["name", "organization"];

impl SectionKind {
    /// Canonical section order used for rendering and assembly.
    pub const ALL: [SectionKind; 8] = [
        SectionKind::WorkExperience,
        SectionKind::Education,
        SectionKind::Project,
        SectionKind::ProfessionalSkill,
        SectionKind::TechnicalSkill,
        SectionKind::PersonalSkill,
        SectionKind::Hobby,
        SectionKind::Certification,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SectionKind::WorkExperience => "work_experience",
            SectionKind::Education => "education",
            SectionKind::Project => "project",
            SectionKind::ProfessionalSkill => "professional_skill",
            SectionKind::TechnicalSkill => "technical_skill",
            SectionKind::PersonalSkill => "personal_skill",
            SectionKind::Hobby => "hobby",
            SectionKind::Certification => "certification",
        }
    }

    /// Human-readable heading for the section.
    pub fn title(self) -> &'static str {
        match self {
            SectionKind::WorkExperience => "Work Experience",
            SectionKind::Education => "Education",
            SectionKind::Project => "Projects",
            SectionKind::ProfessionalSkill => "Professional Skills",
            SectionKind::TechnicalSkill => "Technical Skills",
            SectionKind::PersonalSkill => "Personal Skills",
            SectionKind::Hobby => "Hobbies",
            SectionKind::Certification => "Certifications",
        }
    }

    /// Whether entries of this kind carry their own `visible` flag.
    pub fn is_visibility_bearing(self) -> bool {
        matches!(
            self,
            SectionKind::WorkExperience
                | SectionKind::Education
                | SectionKind::Project
                | SectionKind::Certification
        )
    }

    pub fn is_skill(self) -> bool {
        matches!(
            self,
            SectionKind::ProfessionalSkill | SectionKind::TechnicalSkill | SectionKind::PersonalSkill
        )
    }

    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            SectionKind::WorkExperience => WORK_FIELDS,
            SectionKind::Education => EDUCATION_FIELDS,
            SectionKind::Project => PROJECT_FIELDS,
            SectionKind::ProfessionalSkill
            | SectionKind::TechnicalSkill
            | SectionKind::PersonalSkill
            | SectionKind::Hobby => NAME_ONLY_FIELDS,
            SectionKind::Certification => CERTIFICATION_FIELDS,
        }
    }

    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            SectionKind::WorkExperience => WORK_REQUIRED,
            SectionKind::Education => EDUCATION_REQUIRED,
            SectionKind::Project => PROJECT_REQUIRED,
            SectionKind::ProfessionalSkill
            | SectionKind::TechnicalSkill
            | SectionKind::PersonalSkill
            | SectionKind::Hobby => NAME_REQUIRED,
            SectionKind::Certification => CERTIFICATION_REQUIRED,
        }
    }

    pub fn field(self, name: &str) -> Option<&'static FieldSpec> {
        self.fields().iter().find(|f| f.name == name)
    }

    /// True for the fields whose edits refresh the derived duration.
    pub fn drives_duration(self, field: &str) -> bool {
        self == SectionKind::WorkExperience && (field == START_DATE || field == END_DATE)
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionKind {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| FormError::InvalidOperation(format!("Unknown section kind '{s}'")))
    }
}
