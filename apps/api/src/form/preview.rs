//! Preview gate and markdown rendering of an assembled resume.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::form::assembler::{DocumentEntry, ResumeDocument};
use crate::form::duration::parse_date;
use crate::form::personal::{has_http_scheme, is_valid_age, is_valid_email, is_valid_phone, label};
use crate::form::registry::FormState;
use crate::form::section::{SectionKind, END_DATE, START_DATE};

/// Personal fields that must be filled before a preview is produced.
const REQUIRED_PERSONAL: &[&str] = &[
    "full_name",
    "email",
    "date_of_birth",
    "phone",
    "location",
    "objective",
    "signature",
];

/// Sections needing at least one filled entry, with their error message.
const REQUIRED_SECTIONS: &[(SectionKind, &str)] = &[
    (
        SectionKind::ProfessionalSkill,
        "At least one Professional Skill is required",
    ),
    (
        SectionKind::TechnicalSkill,
        "At least one Technical Skill is required",
    ),
    (
        SectionKind::PersonalSkill,
        "At least one Personal Skill is required",
    ),
    (SectionKind::Hobby, "At least one Hobby is required"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewValidation {
    pub passed: bool,
    pub errors: Vec<String>,
}

/// Checks the whole form before previewing. Collects every failure rather than
/// stopping at the first.
pub fn validate_for_preview(state: &FormState, today: NaiveDate) -> PreviewValidation {
    let info = state.personal();
    let mut errors = Vec::new();

    for field in REQUIRED_PERSONAL {
        if info.get(field).unwrap_or("").trim().is_empty() {
            errors.push(format!("{} is required", label(field)));
        }
    }

    let email = info.email.trim();
    if !email.is_empty() && !is_valid_email(email) {
        errors.push("Email format is invalid".to_string());
    }

    let phone = info.phone.trim();
    if !phone.is_empty() && !is_valid_phone(phone) {
        errors.push("Phone number must be exactly 10 digits".to_string());
    }

    let dob = info.date_of_birth.trim();
    if !dob.is_empty() && !is_valid_age(dob, today) {
        errors.push("Age must be between 18-100 years".to_string());
    }

    let linkedin = info.linkedin.trim();
    if !linkedin.is_empty() {
        if !has_http_scheme(linkedin) {
            errors.push("LinkedIn URL must start with http:// or https://".to_string());
        } else if !linkedin.contains("linkedin.com") {
            errors.push("Must be a valid LinkedIn URL".to_string());
        }
    }

    let social = info.social.trim();
    if !social.is_empty() && !has_http_scheme(social) {
        errors.push("GitHub/Portfolio URL must start with http:// or https://".to_string());
    }

    for (kind, message) in REQUIRED_SECTIONS {
        if !state.entries(*kind).any(|e| !e.is_empty()) {
            errors.push(message.to_string());
        }
    }

    PreviewValidation {
        passed: errors.is_empty(),
        errors,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Markdown rendering
// ────────────────────────────────────────────────────────────────────────────

fn display_date(raw: &str) -> String {
    parse_date(raw)
        .map(|d| d.format("%d %b %Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn render_work(md: &mut String, entry: &DocumentEntry) {
    if let Some(role) = entry.field("role") {
        md.push_str(&format!("### {role}\n"));
    }
    if let Some(company) = entry.field("company") {
        md.push_str(&format!("**{company}**\n"));
    }
    if let (Some(start), Some(end)) = (entry.field(START_DATE), entry.field(END_DATE)) {
        md.push_str(&format!("{} – {}", display_date(start), display_date(end)));
        if let Some(duration) = &entry.duration {
            md.push_str(&format!(" _(Experience: {duration})_"));
        }
        md.push('\n');
    }
}

fn render_education(md: &mut String, entry: &DocumentEntry) {
    if let Some(course) = entry.field("course") {
        md.push_str(&format!("### {course}\n"));
    }
    if let Some(college) = entry.field("college") {
        md.push_str(&format!("{college}\n"));
    }
    let details: Vec<String> = [
        entry.field("year").map(|y| format!("Year: {y}")),
        entry.field("percentage").map(|p| format!("Score: {p}")),
    ]
    .into_iter()
    .flatten()
    .collect();
    if !details.is_empty() {
        md.push_str(&details.join(" | "));
        md.push('\n');
    }
}

fn render_project(md: &mut String, entry: &DocumentEntry) {
    if let Some(name) = entry.field("name") {
        md.push_str(&format!("### {name}\n"));
    }
    if let Some(description) = entry.field("description") {
        md.push_str(&format!("{description}\n"));
    }
    if let Some(link) = entry.field("link") {
        md.push_str(&format!("<{link}>\n"));
    }
}

fn render_certification(md: &mut String, entry: &DocumentEntry) {
    if let Some(name) = entry.field("name") {
        md.push_str(&format!("#### {name}\n"));
    }
    if let Some(organization) = entry.field("organization") {
        md.push_str(&format!("{organization}\n"));
    }
    if let Some(year) = entry.field("year") {
        md.push_str(&format!("Year: {year}\n"));
    }
}

fn render_names(md: &mut String, entries: &[DocumentEntry]) {
    for name in entries.iter().filter_map(|e| e.field("name")) {
        md.push_str(&format!("- {name}\n"));
    }
}

/// Renders the document the way the resume preview lays it out. Empty sections
/// are left out; the date of birth never appears.
pub fn render_markdown(doc: &ResumeDocument) -> String {
    let info = &doc.personal_info;
    let mut md = format!("# {}\n\n", info.full_name.trim());

    if !info.location.trim().is_empty() {
        md.push_str(&format!("{}\n\n", info.location.trim()));
    }

    let contact: Vec<&str> = [&info.email, &info.phone, &info.linkedin, &info.social]
        .into_iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect();
    if !contact.is_empty() {
        md.push_str(&format!("{}\n\n", contact.join(" · ")));
    }

    if !info.objective.trim().is_empty() {
        md.push_str(&format!("## Career Objective\n\n{}\n\n", info.objective.trim()));
    }

    let skills_present = SectionKind::ALL
        .into_iter()
        .any(|k| k.is_skill() && !doc.section(k).is_empty());

    for section in &doc.sections {
        let kind = section.section;
        if kind == SectionKind::ProfessionalSkill && skills_present {
            md.push_str("## Skills\n\n");
        }
        if section.entries.is_empty() {
            continue;
        }

        if kind.is_skill() {
            md.push_str(&format!("### {}\n", section.title));
            render_names(&mut md, &section.entries);
            md.push('\n');
            continue;
        }

        md.push_str(&format!("## {}\n\n", section.title));
        if kind == SectionKind::Hobby {
            render_names(&mut md, &section.entries);
            md.push('\n');
            continue;
        }
        for entry in &section.entries {
            match kind {
                SectionKind::WorkExperience => render_work(&mut md, entry),
                SectionKind::Education => render_education(&mut md, entry),
                SectionKind::Project => render_project(&mut md, entry),
                SectionKind::Certification => render_certification(&mut md, entry),
                _ => {}
            }
            md.push('\n');
        }
    }

    if !info.signature.trim().is_empty() {
        md.push_str(&format!("---\n\n{}\n", info.signature.trim()));
    }
    md
}
