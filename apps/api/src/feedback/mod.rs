//! Interview feedback: role resolution, note composition, submission to the
//! backend, and the local draft / saved-record keys.

pub mod handlers;
pub mod roles;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::backend::{BackendError, RecruiterBackend};
use crate::local_store::LocalStore;
use crate::models::interview::{InterviewNote, NewInterview};
use crate::models::role::RoleSummary;

pub const MAX_STARS: u8 = 5;

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("Please add positives or negatives")]
    EmptyFeedback,

    #[error("Role not found or unspecified; please pick a role before saving feedback")]
    RoleUnresolved,

    #[error("Fit score must be between 1 and 5 (got {0})")]
    FitScoreOutOfRange(u8),

    #[error("Company ID and Title are required.")]
    MissingRoleFields,

    #[error("Requirement level must be between 1 and 5 (got {0})")]
    LevelOutOfRange(i32),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("Local store error: {0}")]
    Store(anyhow::Error),
}

/// What the recruiter filled in on the feedback form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackForm {
    pub candidate_id: i64,
    /// Role from the page link: a numeric id or a title/slug.
    #[serde(default)]
    pub role: Option<String>,
    /// Role picked from the dropdown, used when `role` does not resolve.
    #[serde(default)]
    pub selected_role_id: Option<i64>,
    #[serde(default)]
    pub positives: String,
    #[serde(default)]
    pub negatives: String,
    #[serde(default)]
    pub fit_score: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedbackDraft {
    pub notes: String,
    pub fit_score: Option<u8>,
    pub updated: i64, // ms since epoch
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavedFeedback {
    pub notes: String,
    pub fit_score: Option<u8>,
    pub interview_id: i64,
    pub role_id: i64,
    pub role_title: Option<String>,
    pub saved_at: i64, // ms since epoch
}

#[derive(Debug, Clone, Serialize)]
pub struct SavedPreview {
    pub role_title: Option<String>,
    pub stars: Option<String>,
    pub positives: String,
    pub negatives: String,
}

impl From<&SavedFeedback> for SavedPreview {
    fn from(saved: &SavedFeedback) -> Self {
        let (positives, negatives) = split_notes(&saved.notes);
        SavedPreview {
            role_title: saved.role_title.clone(),
            stars: saved.fit_score.map(render_stars),
            positives,
            negatives,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackReceipt {
    pub interview_id: i64,
    pub role_id: i64,
    pub status: String,
}

pub fn draft_key(candidate_id: i64, role: Option<&str>) -> String {
    format!("feedback_draft:{candidate_id}:{}", role.unwrap_or(""))
}

pub fn saved_key(candidate_id: i64, role: Option<&str>) -> String {
    format!("feedback_saved:{candidate_id}:{}", role.unwrap_or(""))
}

/// Joins positives and negatives with a blank line, only when both are present.
pub fn compose_notes(positives: &str, negatives: &str) -> String {
    let (positives, negatives) = (positives.trim(), negatives.trim());
    match (positives.is_empty(), negatives.is_empty()) {
        (false, false) => format!("{positives}\n\n{negatives}"),
        (false, true) => positives.to_string(),
        _ => negatives.to_string(),
    }
}

/// Splits stored notes back into positives and negatives at the first blank line.
pub fn split_notes(notes: &str) -> (String, String) {
    match notes.split_once("\n\n") {
        Some((positives, negatives)) => (positives.to_string(), negatives.to_string()),
        None => (notes.to_string(), String::new()),
    }
}

/// Filled and empty stars out of five; out-of-range scores are clamped.
pub fn render_stars(fit_score: u8) -> String {
    let filled = fit_score.min(MAX_STARS) as usize;
    format!(
        "{}{}",
        "★".repeat(filled),
        "☆".repeat(MAX_STARS as usize - filled)
    )
}

/// Finds the role a feedback link refers to. Numeric values are ids; anything
/// else is matched against role titles, exact first-come, then by substring.
pub fn resolve_role_in(role: &str, roles: &[RoleSummary]) -> Option<i64> {
    let lower = role.to_lowercase();
    roles
        .iter()
        .find(|r| {
            let title = r.title.to_lowercase();
            title == lower || title.contains(&lower) || r.role_id.to_string() == role
        })
        .map(|r| r.role_id)
}

fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

/// Resolves the form's role to an id and a display title. The title comes
/// from the backend's role list when it can be found there, otherwise it is
/// the raw role value from the link.
pub async fn resolve_role(
    backend: &dyn RecruiterBackend,
    form: &FeedbackForm,
) -> Result<(i64, Option<String>), FeedbackError> {
    let role = form.role.as_deref().map(str::trim).filter(|r| !r.is_empty());

    // Lookup failures fall through to the numeric id or the picked role.
    let roles = backend.list_roles().await.unwrap_or_else(|e| {
        warn!("Role lookup failed: {e}");
        vec![]
    });
    let title_for = |id: i64| {
        roles
            .iter()
            .find(|r| r.role_id == id)
            .map(|r| r.title.clone())
            .or_else(|| role.map(str::to_string))
    };

    if let Some(role) = role {
        if is_numeric(role) {
            if let Ok(id) = role.parse::<i64>() {
                return Ok((id, title_for(id)));
            }
        }
        if let Some(id) = resolve_role_in(role, &roles) {
            return Ok((id, title_for(id)));
        }
    }

    match form.selected_role_id {
        Some(id) => Ok((id, title_for(id))),
        None => Err(FeedbackError::RoleUnresolved),
    }
}

/// Validates the form, creates the interview, posts its note, and records the
/// saved feedback locally. Inputs are never cleared. Once the backend has the
/// note, a failed local record is only logged.
pub async fn submit_feedback(
    backend: &dyn RecruiterBackend,
    store: &LocalStore,
    form: &FeedbackForm,
) -> Result<FeedbackReceipt, FeedbackError> {
    let notes = compose_notes(&form.positives, &form.negatives);
    if notes.is_empty() {
        return Err(FeedbackError::EmptyFeedback);
    }
    if let Some(score) = form.fit_score {
        if !(1..=MAX_STARS).contains(&score) {
            return Err(FeedbackError::FitScoreOutOfRange(score));
        }
    }

    let (role_id, role_title) = resolve_role(backend, form).await?;

    let created = backend
        .create_interview(&NewInterview {
            candidate_id: form.candidate_id,
            role_id,
        })
        .await?;
    backend
        .post_interview_note(
            created.interview_id,
            &InterviewNote {
                notes: notes.clone(),
                fit_score: form.fit_score,
                role_id,
            },
        )
        .await?;

    info!(
        "Feedback saved for candidate {} (interview {}, role {role_id})",
        form.candidate_id, created.interview_id
    );

    let record = SavedFeedback {
        notes,
        fit_score: form.fit_score,
        interview_id: created.interview_id,
        role_id,
        role_title,
        saved_at: Utc::now().timestamp_millis(),
    };
    if let Err(e) = store
        .set(&saved_key(form.candidate_id, form.role.as_deref()), &record)
        .await
    {
        warn!(
            "Could not record saved feedback for interview {}: {e:#}",
            created.interview_id
        );
    }

    Ok(FeedbackReceipt {
        interview_id: created.interview_id,
        role_id,
        status: "Feedback saved — your inputs are preserved".to_string(),
    })
}

pub async fn save_draft(store: &LocalStore, form: &FeedbackForm) -> Result<FeedbackDraft, FeedbackError> {
    let draft = FeedbackDraft {
        notes: compose_notes(&form.positives, &form.negatives),
        fit_score: form.fit_score,
        updated: Utc::now().timestamp_millis(),
    };
    store
        .set(&draft_key(form.candidate_id, form.role.as_deref()), &draft)
        .await
        .map_err(FeedbackError::Store)?;
    Ok(draft)
}

pub async fn clear_draft(
    store: &LocalStore,
    candidate_id: i64,
    role: Option<&str>,
) -> Result<(), FeedbackError> {
    store
        .remove(&draft_key(candidate_id, role))
        .await
        .map_err(FeedbackError::Store)
}

pub fn load_draft(store: &LocalStore, candidate_id: i64, role: Option<&str>) -> Option<FeedbackDraft> {
    store.get(&draft_key(candidate_id, role))
}

pub fn load_saved(store: &LocalStore, candidate_id: i64, role: Option<&str>) -> Option<SavedFeedback> {
    store.get(&saved_key(candidate_id, role))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fake::FakeBackend;

    fn roles() -> Vec<RoleSummary> {
        vec![
            RoleSummary {
                role_id: 3,
                company_id: Some(1),
                title: "Backend Engineer".to_string(),
                description: None,
                requirements: vec![],
            },
            RoleSummary {
                role_id: 8,
                company_id: Some(1),
                title: "Data Platform".to_string(),
                description: None,
                requirements: vec![],
            },
        ]
    }

    fn form(role: Option<&str>) -> FeedbackForm {
        FeedbackForm {
            candidate_id: 42,
            role: role.map(str::to_string),
            selected_role_id: None,
            positives: "Clear communicator".to_string(),
            negatives: "Light on testing".to_string(),
            fit_score: Some(4),
        }
    }

    fn store() -> (tempfile::TempDir, LocalStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path().join("local.json")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_compose_and_split_notes() {
        assert_eq!(compose_notes(" good ", " bad "), "good\n\nbad");
        assert_eq!(compose_notes("good", ""), "good");
        assert_eq!(compose_notes("", "bad"), "bad");
        assert_eq!(compose_notes(" ", ""), "");

        assert_eq!(
            split_notes("good\n\nbad\n\nworse"),
            ("good".to_string(), "bad\n\nworse".to_string())
        );
        assert_eq!(split_notes("only"), ("only".to_string(), String::new()));
    }

    #[test]
    fn test_render_stars_clamps() {
        assert_eq!(render_stars(3), "★★★☆☆");
        assert_eq!(render_stars(0), "☆☆☆☆☆");
        assert_eq!(render_stars(9), "★★★★★");
    }

    #[test]
    fn test_resolve_role_by_title() {
        let roles = roles();
        assert_eq!(resolve_role_in("backend engineer", &roles), Some(3));
        assert_eq!(resolve_role_in("data", &roles), Some(8));
        assert_eq!(resolve_role_in("8", &roles), Some(8));
        assert_eq!(resolve_role_in("frontend", &roles), None);
    }

    #[test]
    fn test_keys_use_candidate_and_role() {
        assert_eq!(draft_key(42, Some("backend")), "feedback_draft:42:backend");
        assert_eq!(saved_key(42, None), "feedback_saved:42:");
    }

    #[tokio::test]
    async fn test_numeric_role_works_offline_with_raw_title() {
        let backend = FakeBackend::offline();
        let (id, title) = resolve_role(&backend, &form(Some("17"))).await.unwrap();
        assert_eq!(id, 17);
        assert_eq!(title.as_deref(), Some("17"));
    }

    #[tokio::test]
    async fn test_numeric_and_picked_roles_take_backend_title() {
        let backend = FakeBackend::default();
        *backend.roles.lock().await = roles();

        let (id, title) = resolve_role(&backend, &form(Some("8"))).await.unwrap();
        assert_eq!(id, 8);
        assert_eq!(title.as_deref(), Some("Data Platform"));

        let mut picked = form(None);
        picked.selected_role_id = Some(3);
        let (id, title) = resolve_role(&backend, &picked).await.unwrap();
        assert_eq!(id, 3);
        assert_eq!(title.as_deref(), Some("Backend Engineer"));
    }

    #[tokio::test]
    async fn test_slug_role_resolves_through_backend() {
        let backend = FakeBackend::default();
        *backend.roles.lock().await = roles();
        let (id, title) = resolve_role(&backend, &form(Some("backend"))).await.unwrap();
        assert_eq!(id, 3);
        assert_eq!(title.as_deref(), Some("Backend Engineer"));
    }

    #[tokio::test]
    async fn test_unresolved_role_uses_picked_role_or_fails() {
        let backend = FakeBackend::offline();
        let err = resolve_role(&backend, &form(Some("backend"))).await.unwrap_err();
        assert!(matches!(err, FeedbackError::RoleUnresolved));

        let mut picked = form(Some("backend"));
        picked.selected_role_id = Some(8);
        let (id, _) = resolve_role(&backend, &picked).await.unwrap();
        assert_eq!(id, 8);
    }

    #[tokio::test]
    async fn test_submit_creates_interview_posts_note_and_records() {
        let backend = FakeBackend::default();
        let (_dir, store) = store();

        let receipt = submit_feedback(&backend, &store, &form(Some("3"))).await.unwrap();
        assert_eq!(receipt.role_id, 3);
        assert_eq!(receipt.status, "Feedback saved — your inputs are preserved");

        let interviews = backend.interviews.lock().await;
        assert_eq!(
            *interviews,
            vec![NewInterview {
                candidate_id: 42,
                role_id: 3
            }]
        );
        let notes = backend.notes.lock().await;
        assert_eq!(notes[0].0, receipt.interview_id);
        assert_eq!(notes[0].1.notes, "Clear communicator\n\nLight on testing");
        assert_eq!(notes[0].1.fit_score, Some(4));

        let saved = load_saved(&store, 42, Some("3")).unwrap();
        assert_eq!(saved.interview_id, receipt.interview_id);
        assert_eq!(saved.role_title.as_deref(), Some("3"));
        let preview = SavedPreview::from(&saved);
        assert_eq!(preview.stars.as_deref(), Some("★★★★☆"));
        assert_eq!(preview.negatives, "Light on testing");
    }

    #[tokio::test]
    async fn test_submit_rejects_empty_feedback_before_network() {
        let backend = FakeBackend::default();
        let (_dir, store) = store();
        let mut empty = form(Some("3"));
        empty.positives = "  ".to_string();
        empty.negatives = String::new();

        let err = submit_feedback(&backend, &store, &empty).await.unwrap_err();
        assert!(matches!(err, FeedbackError::EmptyFeedback));
        assert!(backend.interviews.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_submit_surfaces_backend_detail() {
        let backend = FakeBackend::offline();
        let (_dir, store) = store();
        let err = submit_feedback(&backend, &store, &form(Some("3"))).await.unwrap_err();
        match err {
            FeedbackError::Backend(e) => assert_eq!(e.user_message(), "Service unavailable"),
            other => panic!("expected backend error, got {other:?}"),
        }
        assert!(load_saved(&store, 42, Some("3")).is_none());
    }

    #[tokio::test]
    async fn test_local_record_failure_still_reports_success() {
        let backend = FakeBackend::default();
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path().join("missing_dir").join("local.json")).unwrap();

        let receipt = submit_feedback(&backend, &store, &form(Some("3"))).await.unwrap();
        assert_eq!(receipt.status, "Feedback saved — your inputs are preserved");
        assert_eq!(backend.interviews.lock().await.len(), 1);
        assert_eq!(backend.notes.lock().await.len(), 1);
        assert!(load_saved(&store, 42, Some("3")).is_none());
    }

    #[tokio::test]
    async fn test_draft_round_trip() {
        let (_dir, store) = store();
        let saved = save_draft(&store, &form(Some("backend"))).await.unwrap();
        assert_eq!(load_draft(&store, 42, Some("backend")), Some(saved));
        assert_eq!(load_draft(&store, 42, Some("data")), None);

        clear_draft(&store, 42, Some("backend")).await.unwrap();
        assert_eq!(load_draft(&store, 42, Some("backend")), None);
    }
}
