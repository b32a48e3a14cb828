//! Wire shape handed to the persistence collaborator on save.
//!
//! Built from a `ResumeDocument` only, so hidden and blank entries never reach
//! storage. Absent values serialize as `null`.

use serde::{Deserialize, Serialize};

use crate::form::assembler::{DocumentEntry, ResumeDocument};
use crate::form::personal::is_valid_email;
use crate::form::section::{SectionKind, END_DATE, START_DATE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfoPayload {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub date_of_birth: String,
    pub location: String,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub career_objective: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkExperiencePayload {
    pub company_name: Option<String>,
    pub job_role: Option<String>,
    pub date_of_join: Option<String>,
    pub last_working_date: Option<String>,
    pub experience: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationPayload {
    pub college: Option<String>,
    pub university: Option<String>,
    pub course: Option<String>,
    pub year: Option<i32>,
    pub cgpa: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectPayload {
    pub project_title: Option<String>,
    pub project_link: Option<String>,
    pub organization: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillType {
    Professional,
    Technical,
    Personal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillPayload {
    pub skill_type: SkillType,
    pub skill_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificationPayload {
    pub certification_name: String,
    pub organization: Option<String>,
    pub year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestPayload {
    pub interest_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavePayload {
    pub personal_info: PersonalInfoPayload,
    pub work_experience: Vec<WorkExperiencePayload>,
    pub education: Vec<EducationPayload>,
    pub projects: Vec<ProjectPayload>,
    pub skills: Vec<SkillPayload>,
    pub certifications: Vec<CertificationPayload>,
    pub interests: Vec<InterestPayload>,
    pub resume_title: String,
    pub signature: String,
}

fn owned(entry: &DocumentEntry, field: &str) -> Option<String> {
    entry.field(field).map(str::to_string)
}

fn year(entry: &DocumentEntry) -> Option<i32> {
    entry.field("year").and_then(|y| y.parse().ok())
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl SavePayload {
    pub fn from_document(doc: &ResumeDocument) -> Self {
        let info = &doc.personal_info;

        let skills = [
            (SectionKind::ProfessionalSkill, SkillType::Professional),
            (SectionKind::TechnicalSkill, SkillType::Technical),
            (SectionKind::PersonalSkill, SkillType::Personal),
        ]
        .into_iter()
        .flat_map(|(kind, skill_type)| {
            doc.section(kind).iter().filter_map(move |e| {
                e.field("name").map(|name| SkillPayload {
                    skill_type,
                    skill_name: name.to_string(),
                })
            })
        })
        .collect();

        Self {
            personal_info: PersonalInfoPayload {
                full_name: info.full_name.clone(),
                email: info.email.clone(),
                phone_number: info.phone.clone(),
                date_of_birth: info.date_of_birth.clone(),
                location: info.location.clone(),
                linkedin_url: non_blank(&info.linkedin),
                github_url: non_blank(&info.social),
                career_objective: info.objective.clone(),
            },
            work_experience: doc
                .section(SectionKind::WorkExperience)
                .iter()
                .map(|e| WorkExperiencePayload {
                    company_name: owned(e, "company"),
                    job_role: owned(e, "role"),
                    date_of_join: owned(e, START_DATE),
                    last_working_date: owned(e, END_DATE),
                    experience: e.duration.clone(),
                })
                .collect(),
            education: doc
                .section(SectionKind::Education)
                .iter()
                .map(|e| EducationPayload {
                    college: owned(e, "college"),
                    university: None,
                    course: owned(e, "course"),
                    year: year(e),
                    cgpa: owned(e, "percentage"),
                })
                .collect(),
            projects: doc
                .section(SectionKind::Project)
                .iter()
                .map(|e| ProjectPayload {
                    project_title: owned(e, "name"),
                    project_link: owned(e, "link"),
                    organization: None,
                    description: owned(e, "description"),
                })
                .collect(),
            skills,
            certifications: doc
                .section(SectionKind::Certification)
                .iter()
                .filter_map(|e| {
                    owned(e, "name").map(|certification_name| CertificationPayload {
                        certification_name,
                        organization: owned(e, "organization"),
                        year: year(e),
                    })
                })
                .collect(),
            interests: doc
                .section(SectionKind::Hobby)
                .iter()
                .filter_map(|e| owned(e, "name"))
                .map(|interest_name| InterestPayload { interest_name })
                .collect(),
            resume_title: format!("{}'s Resume", info.full_name.trim()),
            signature: info.signature.clone(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Storage rules
// ────────────────────────────────────────────────────────────────────────────

const NAME_CHARS: std::ops::RangeInclusive<usize> = 2..=100;
const PHONE_CHARS: std::ops::RangeInclusive<usize> = 10..=15;
const MAX_LOCATION_CHARS: usize = 100;

impl SavePayload {
    /// Checks the rules storage enforces before accepting a resume. Returns
    /// every violation, not just the first.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let info = &self.personal_info;
        let mut errors = Vec::new();

        if !NAME_CHARS.contains(&info.full_name.trim().chars().count()) {
            errors.push("Full name must be between 2 and 100 characters".to_string());
        }
        if !is_valid_email(info.email.trim()) {
            errors.push("Email format is invalid".to_string());
        }
        if !PHONE_CHARS.contains(&info.phone_number.trim().chars().count()) {
            errors.push("Phone number must be between 10 and 15 characters".to_string());
        }
        if info.location.trim().chars().count() > MAX_LOCATION_CHARS {
            errors.push("Location must be at most 100 characters".to_string());
        }

        for (value, label) in [
            (&info.date_of_birth, "Date of birth"),
            (&info.location, "Location"),
            (&info.career_objective, "Career objective"),
            (&self.signature, "Signature"),
        ] {
            if value.trim().is_empty() {
                errors.push(format!("{label} is required"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::registry::FormState;
    use serde_json::json;

    fn sample_state() -> FormState {
        let mut state = FormState::new();
        state.set_personal_field("full_name", "Jane Doe").unwrap();
        state.set_personal_field("linkedin", "  ").unwrap();
        state.set_personal_field("social", "https://github.com/jane").unwrap();

        let work = SectionKind::WorkExperience;
        state.add_entry(work).unwrap();
        state.edit_field(work, 1, "role", "Engineer").unwrap();
        state.edit_field(work, 1, "start_date", "2020-01-01").unwrap();
        state.edit_field(work, 1, "end_date", "2021-07-01").unwrap();

        let edu = SectionKind::Education;
        state.add_entry(edu).unwrap();
        state.edit_field(edu, 1, "college", "IIT").unwrap();
        state.edit_field(edu, 1, "year", "2019").unwrap();

        for (kind, name) in [
            (SectionKind::TechnicalSkill, "Rust"),
            (SectionKind::ProfessionalSkill, "Leadership"),
            (SectionKind::Hobby, "Chess"),
        ] {
            state.add_entry(kind).unwrap();
            state.edit_field(kind, 1, "name", name).unwrap();
        }

        let cert = SectionKind::Certification;
        state.add_entry(cert).unwrap();
        state.edit_field(cert, 1, "organization", "AWS").unwrap();
        state.edit_field(cert, 1, "year", "twenty").unwrap();
        state
    }

    #[test]
    fn test_payload_shape() {
        let payload = SavePayload::from_document(&sample_state().assemble());
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["resume_title"], json!("Jane Doe's Resume"));
        assert_eq!(value["personal_info"]["linkedin_url"], json!(null));
        assert_eq!(
            value["personal_info"]["github_url"],
            json!("https://github.com/jane")
        );
        assert_eq!(
            value["work_experience"][0],
            json!({
                "company_name": null,
                "job_role": "Engineer",
                "date_of_join": "2020-01-01",
                "last_working_date": "2021-07-01",
                "experience": "1 year 6 months"
            })
        );
        assert_eq!(value["education"][0]["year"], json!(2019));
        assert_eq!(value["education"][0]["university"], json!(null));
        assert_eq!(value["interests"], json!([{ "interest_name": "Chess" }]));
    }

    #[test]
    fn test_skills_grouped_professional_first() {
        let payload = SavePayload::from_document(&sample_state().assemble());
        let types: Vec<_> = payload.skills.iter().map(|s| s.skill_type).collect();
        assert_eq!(types, vec![SkillType::Professional, SkillType::Technical]);
        assert_eq!(
            serde_json::to_value(SkillType::Technical).unwrap(),
            json!("Technical")
        );
    }

    #[test]
    fn test_certification_without_name_is_skipped() {
        let payload = SavePayload::from_document(&sample_state().assemble());
        assert!(payload.certifications.is_empty());
    }

    #[test]
    fn test_unparseable_year_becomes_null() {
        let mut state = sample_state();
        let cert = SectionKind::Certification;
        state.edit_field(cert, 1, "name", "Solutions Architect").unwrap();

        let payload = SavePayload::from_document(&state.assemble());
        let value = serde_json::to_value(&payload.certifications).unwrap();
        assert_eq!(
            value,
            json!([{
                "certification_name": "Solutions Architect",
                "organization": "AWS",
                "year": null
            }])
        );
    }

    fn complete_state() -> FormState {
        let mut state = sample_state();
        for (field, value) in [
            ("email", "jane@example.com"),
            ("phone", "9876543210"),
            ("date_of_birth", "1995-04-12"),
            ("location", "Pune"),
            ("objective", "Build reliable systems"),
            ("signature", "Jane Doe"),
        ] {
            state.set_personal_field(field, value).unwrap();
        }
        state
    }

    #[test]
    fn test_complete_payload_passes_validation() {
        let payload = SavePayload::from_document(&complete_state().assemble());
        assert_eq!(payload.validate(), Ok(()));
    }

    #[test]
    fn test_blank_payload_reports_every_violation() {
        let payload = SavePayload::from_document(&FormState::new().assemble());
        let errors = payload.validate().unwrap_err();
        assert_eq!(errors.len(), 7);
        assert_eq!(errors[0], "Full name must be between 2 and 100 characters");
        assert!(errors.contains(&"Signature is required".to_string()));
    }

    #[test]
    fn test_phone_length_and_single_letter_name_rejected() {
        let mut state = complete_state();
        state.set_personal_field("full_name", "J").unwrap();
        state.set_personal_field("phone", "+91 98765 43210 00").unwrap();
        let errors = SavePayload::from_document(&state.assemble())
            .validate()
            .unwrap_err();
        assert_eq!(
            errors,
            vec![
                "Full name must be between 2 and 100 characters".to_string(),
                "Phone number must be between 10 and 15 characters".to_string(),
            ]
        );
    }

    #[test]
    fn test_hidden_entries_not_saved() {
        let mut state = sample_state();
        state
            .toggle_visibility(SectionKind::WorkExperience, 1)
            .unwrap();
        let payload = SavePayload::from_document(&state.assemble());
        assert!(payload.work_experience.is_empty());
    }
}
