//! Axum route handlers for the Form Session API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::form::assembler::ResumeDocument;
use crate::form::entry::EntryId;
use crate::form::payload::SavePayload;
use crate::form::personal::validate_field;
use crate::form::preview::{render_markdown, validate_for_preview, PreviewValidation};
use crate::form::registry::{EntryView, FormEvent, FormSnapshot};
use crate::form::section::SectionKind;
use crate::persistence::{ResumeSummary, SavedResume};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct FieldUpdate {
    pub field: String,
    pub value: String,
}

/// Result of a mutating call plus the render events it produced.
#[derive(Debug, Serialize)]
pub struct Mutation<T> {
    pub result: T,
    pub events: Vec<FormEvent>,
}

impl<T> Mutation<T> {
    fn new((result, events): (T, Vec<FormEvent>)) -> Json<Self> {
        Json(Self { result, events })
    }
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub form: FormSnapshot,
}

#[derive(Debug, Deserialize)]
pub struct ShowPhotoUpdate {
    pub show_photo: bool,
}

#[derive(Debug, Serialize)]
pub struct PersonalFieldResult {
    pub field: String,
    /// Inline warning for the new value, if any.
    pub field_error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OrderResult {
    pub changed: bool,
    pub order: Vec<EntryId>,
}

#[derive(Debug, Serialize)]
pub struct VisibilityResult {
    pub id: EntryId,
    pub visible: bool,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub validation: PreviewValidation,
    pub markdown: String,
    pub document: ResumeDocument,
}

#[derive(Debug, Serialize)]
pub struct ResumeList {
    pub count: usize,
    pub data: Vec<ResumeSummary>,
}

fn parse_kind(raw: &str) -> Result<SectionKind, AppError> {
    raw.parse::<SectionKind>().map_err(AppError::from)
}

// ────────────────────────────────────────────────────────────────────────────
// Session lifecycle
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionResponse>) {
    let (session_id, form) = state.sessions.create(state.config.seed_entries).await;
    (
        StatusCode::CREATED,
        Json(SessionResponse {
            session_id,
            form: form.snapshot(),
        }),
    )
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let form = state.sessions.read(session_id, |s| s.snapshot()).await?;
    Ok(Json(SessionResponse { session_id, form }))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_end_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.end(session_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {session_id} not found")))
    }
}

/// POST /api/v1/sessions/:id/reset
pub async fn handle_reset(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Mutation<()>>, AppError> {
    let outcome = state
        .sessions
        .update(session_id, |s| {
            s.reset();
            Ok(())
        })
        .await?;
    Ok(Mutation::new(outcome))
}

// ────────────────────────────────────────────────────────────────────────────
// Personal section
// ────────────────────────────────────────────────────────────────────────────

/// PATCH /api/v1/sessions/:id/personal
///
/// Stores the value and reports the same inline warning the form shows on blur.
pub async fn handle_set_personal(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<FieldUpdate>,
) -> Result<Json<Mutation<PersonalFieldResult>>, AppError> {
    let today = Utc::now().naive_utc().date();
    let field_error = validate_field(&req.field, &req.value, today).map(str::to_string);
    let FieldUpdate { field, value } = req;

    let outcome = state
        .sessions
        .update(session_id, |s| {
            s.set_personal_field(&field, value)?;
            Ok(PersonalFieldResult {
                field,
                field_error,
            })
        })
        .await?;
    Ok(Mutation::new(outcome))
}

/// PUT /api/v1/sessions/:id/personal/show-photo
pub async fn handle_set_show_photo(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<ShowPhotoUpdate>,
) -> Result<Json<Mutation<bool>>, AppError> {
    let outcome = state
        .sessions
        .update(session_id, |s| Ok(s.set_show_photo(req.show_photo)))
        .await?;
    Ok(Mutation::new(outcome))
}

// ────────────────────────────────────────────────────────────────────────────
// Entries
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions/:id/sections/:kind/entries
pub async fn handle_add_entry(
    State(state): State<AppState>,
    Path((session_id, kind)): Path<(Uuid, String)>,
) -> Result<(StatusCode, Json<Mutation<EntryView>>), AppError> {
    let kind = parse_kind(&kind)?;
    let outcome = state
        .sessions
        .update(session_id, |s| s.add_entry(kind).map(EntryView::from))
        .await?;
    Ok((StatusCode::CREATED, Mutation::new(outcome)))
}

/// PATCH /api/v1/sessions/:id/sections/:kind/entries/:entry_id
pub async fn handle_edit_field(
    State(state): State<AppState>,
    Path((session_id, kind, entry_id)): Path<(Uuid, String, EntryId)>,
    Json(req): Json<FieldUpdate>,
) -> Result<Json<Mutation<EntryView>>, AppError> {
    let kind = parse_kind(&kind)?;
    let outcome = state
        .sessions
        .update(session_id, |s| {
            s.edit_field(kind, entry_id, &req.field, req.value)
                .map(EntryView::from)
        })
        .await?;
    Ok(Mutation::new(outcome))
}

/// POST /api/v1/sessions/:id/sections/:kind/entries/:entry_id/move-up
pub async fn handle_move_up(
    State(state): State<AppState>,
    Path((session_id, kind, entry_id)): Path<(Uuid, String, EntryId)>,
) -> Result<Json<Mutation<OrderResult>>, AppError> {
    let kind = parse_kind(&kind)?;
    let outcome = state
        .sessions
        .update(session_id, |s| {
            let changed = s.move_up(kind, entry_id)?;
            Ok(OrderResult {
                changed,
                order: s.order(kind).to_vec(),
            })
        })
        .await?;
    Ok(Mutation::new(outcome))
}

/// POST /api/v1/sessions/:id/sections/:kind/entries/:entry_id/move-down
pub async fn handle_move_down(
    State(state): State<AppState>,
    Path((session_id, kind, entry_id)): Path<(Uuid, String, EntryId)>,
) -> Result<Json<Mutation<OrderResult>>, AppError> {
    let kind = parse_kind(&kind)?;
    let outcome = state
        .sessions
        .update(session_id, |s| {
            let changed = s.move_down(kind, entry_id)?;
            Ok(OrderResult {
                changed,
                order: s.order(kind).to_vec(),
            })
        })
        .await?;
    Ok(Mutation::new(outcome))
}

/// DELETE /api/v1/sessions/:id/sections/:kind/entries/:entry_id
///
/// Idempotent: deleting an entry that is already gone succeeds with `changed: false`.
pub async fn handle_remove_entry(
    State(state): State<AppState>,
    Path((session_id, kind, entry_id)): Path<(Uuid, String, EntryId)>,
) -> Result<Json<Mutation<OrderResult>>, AppError> {
    let kind = parse_kind(&kind)?;
    let outcome = state
        .sessions
        .update(session_id, |s| {
            let changed = s.remove(kind, entry_id);
            Ok(OrderResult {
                changed,
                order: s.order(kind).to_vec(),
            })
        })
        .await?;
    Ok(Mutation::new(outcome))
}

/// POST /api/v1/sessions/:id/sections/:kind/entries/:entry_id/visibility
pub async fn handle_toggle_visibility(
    State(state): State<AppState>,
    Path((session_id, kind, entry_id)): Path<(Uuid, String, EntryId)>,
) -> Result<Json<Mutation<VisibilityResult>>, AppError> {
    let kind = parse_kind(&kind)?;
    let outcome = state
        .sessions
        .update(session_id, |s| {
            let visible = s.toggle_visibility(kind, entry_id)?;
            Ok(VisibilityResult {
                id: entry_id,
                visible,
            })
        })
        .await?;
    Ok(Mutation::new(outcome))
}

// ────────────────────────────────────────────────────────────────────────────
// Read-only views
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/sessions/:id/document
pub async fn handle_document(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ResumeDocument>, AppError> {
    let document = state.sessions.read(session_id, |s| s.assemble()).await?;
    Ok(Json(document))
}

/// GET /api/v1/sessions/:id/preview
///
/// Runs the preview gate first; a failing form is a 422 carrying every error.
pub async fn handle_preview(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<PreviewResponse>, AppError> {
    let today = Utc::now().naive_utc().date();
    let (validation, document) = state
        .sessions
        .read(session_id, |s| (validate_for_preview(s, today), s.assemble()))
        .await?;
    if !validation.passed {
        warn!(
            "Preview blocked for session {session_id}: {} error(s)",
            validation.errors.len()
        );
        return Err(AppError::UnprocessableEntity(validation.errors));
    }
    let markdown = render_markdown(&document);
    Ok(Json(PreviewResponse {
        validation,
        markdown,
        document,
    }))
}

/// GET /api/v1/sessions/:id/payload
pub async fn handle_payload(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SavePayload>, AppError> {
    let document = state.sessions.read(session_id, |s| s.assemble()).await?;
    Ok(Json(SavePayload::from_document(&document)))
}

// ────────────────────────────────────────────────────────────────────────────
// Persistence
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions/:id/save
///
/// The payload must pass the storage rules first; a rejected save is a 400 listing
/// every violation.
pub async fn handle_save(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<(StatusCode, Json<SavedResume>), AppError> {
    let document = state.sessions.read(session_id, |s| s.assemble()).await?;
    let payload = SavePayload::from_document(&document);
    if let Err(errors) = payload.validate() {
        warn!(
            "Save rejected for session {session_id}: {} error(s)",
            errors.len()
        );
        return Err(AppError::InvalidResume(errors));
    }
    let saved = state.resumes.save(payload).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
) -> Result<Json<ResumeList>, AppError> {
    let data = state.resumes.list().await?;
    Ok(Json(ResumeList {
        count: data.len(),
        data,
    }))
}

/// GET /api/v1/resumes/:resume_id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<u64>,
) -> Result<Json<SavePayload>, AppError> {
    state
        .resumes
        .get(resume_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))
}
