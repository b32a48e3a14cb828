//! Persistence seam: where assembled resumes go when the user saves.
//!
//! `AppState` carries an `Arc<dyn ResumeStore>`. The default backend keeps saved
//! payloads in memory; a database-backed store implements the same trait.

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

use crate::errors::AppError;
use crate::form::payload::SavePayload;

/// Every stored resume starts out as a draft.
pub const DRAFT_STATUS: &str = "Draft";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedResume {
    pub resume_id: u64,
    pub resume_title: String,
}

/// One row of the saved-resume listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeSummary {
    pub resume_id: u64,
    pub title: String,
    pub status: String,
    pub created_date: DateTime<Utc>,
    pub full_name: String,
    pub email: String,
}

#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn save(&self, payload: SavePayload) -> Result<SavedResume, AppError>;

    async fn get(&self, resume_id: u64) -> Result<Option<SavePayload>, AppError>;

    /// Newest first.
    async fn list(&self) -> Result<Vec<ResumeSummary>, AppError>;
}

struct StoredResume {
    payload: SavePayload,
    created_date: DateTime<Utc>,
}

/// Keeps every saved payload for the life of the process. Ids start at 1.
#[derive(Default)]
pub struct InMemoryResumeStore {
    resumes: RwLock<Vec<StoredResume>>,
}

#[async_trait]
impl ResumeStore for InMemoryResumeStore {
    async fn save(&self, payload: SavePayload) -> Result<SavedResume, AppError> {
        let mut resumes = self.resumes.write().await;
        let resume_id = u64::try_from(resumes.len() + 1).context("resume id overflow")?;
        let saved = SavedResume {
            resume_id,
            resume_title: payload.resume_title.clone(),
        };
        resumes.push(StoredResume {
            payload,
            created_date: Utc::now(),
        });
        info!("Saved resume {resume_id} ('{}')", saved.resume_title);
        Ok(saved)
    }

    async fn get(&self, resume_id: u64) -> Result<Option<SavePayload>, AppError> {
        let Some(index) = resume_id.checked_sub(1) else {
            return Ok(None);
        };
        let resumes = self.resumes.read().await;
        Ok(usize::try_from(index)
            .ok()
            .and_then(|i| resumes.get(i))
            .map(|stored| stored.payload.clone()))
    }

    async fn list(&self) -> Result<Vec<ResumeSummary>, AppError> {
        let resumes = self.resumes.read().await;
        resumes
            .iter()
            .enumerate()
            .rev()
            .map(|(index, stored)| -> Result<ResumeSummary, AppError> {
                let info = &stored.payload.personal_info;
                Ok(ResumeSummary {
                    resume_id: u64::try_from(index + 1).context("resume id overflow")?,
                    title: stored.payload.resume_title.clone(),
                    status: DRAFT_STATUS.to_string(),
                    created_date: stored.created_date,
                    full_name: info.full_name.clone(),
                    email: info.email.clone(),
                })
            })
            .collect()
    }
}
