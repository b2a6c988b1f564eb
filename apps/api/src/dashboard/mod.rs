// Recruiter Pipeline Dashboard
// Implements: match scoring, candidate filtering/sorting, the review drawer,
// and the session-local availability / notes / bookings stores.
// `Dashboard::handle` mutates state, `Dashboard::render` produces the view.

pub mod drawer;
pub mod filter;
pub mod fixtures;
pub mod handlers;
pub mod loader;
pub mod scoring;
pub mod store;
pub mod view;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::dashboard::drawer::DrawerState;
use crate::dashboard::filter::{Controls, DomainFilter, SortKey};
use crate::dashboard::loader::PipelineData;
use crate::dashboard::store::{AvailabilitySlot, AvailabilityStore, BookingLedger, NoteBook};
use crate::models::pipeline::{Candidate, Job};

/// Rejections of dashboard actions. Display strings are shown to the recruiter.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Please enter start and end time.")]
    MissingSlotTimes,

    #[error("Time '{0}' must be in HH:MM format.")]
    InvalidSlotTime(String),

    #[error("End time must be after start time.")]
    SlotEndNotAfterStart,

    #[error("Please choose a day for the slot.")]
    MissingSlotDay,

    #[error("Availability slot '{0}' not found.")]
    SlotNotFound(String),

    #[error("Slot '{slot_id}' has {count} booked interview(s); it cannot be removed.")]
    SlotHasBookings { slot_id: String, count: usize },

    #[error("Add a rating and notes before saving.")]
    IncompleteNote,

    #[error("Rating must be between 1 and 10 (got {0}).")]
    RatingOutOfRange(i64),

    #[error("Rating must be a whole number (got '{0}').")]
    InvalidRating(String),

    #[error("No slot selected.")]
    NoSlotSelected,

    #[error("Already booked for this candidate + job (demo).")]
    AlreadyBooked { candidate_id: String, job_id: String },

    #[error("Open a candidate before saving notes or booking.")]
    DrawerClosed,

    #[error("Candidate '{0}' not found.")]
    CandidateNotFound(String),

    #[error("Job '{0}' not found.")]
    JobNotFound(String),

    #[error("No job selected.")]
    NoJobSelected,
}

/// Where a dataset came from on the last load.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Backend,
    Mock,
}

/// Everything a recruiter can do on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    SelectJob { job_id: String },
    SetMinScore { min_score: u32 },
    SetDomain { domain: DomainFilter },
    SetSearch { query: String },
    SetSort { sort: SortKey },
    Refresh,
    OpenCandidate { candidate_id: String },
    CloseDrawer,
    SaveNote {
        #[serde(default)]
        rating: Option<RatingInput>,
        #[serde(default)]
        notes: String,
    },
    BookInterview {
        #[serde(default)]
        slot_id: Option<String>,
    },
    AddSlot { day: String, start: String, end: String },
    RemoveSlot { slot_id: String },
}

/// Rating as sent by a form: a number, or the text of a number input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RatingInput {
    Number(i64),
    Text(String),
}

impl RatingInput {
    /// Blank text counts as no rating.
    fn value(&self) -> Result<Option<i64>, DashboardError> {
        match self {
            RatingInput::Number(n) => Ok(Some(*n)),
            RatingInput::Text(text) if text.trim().is_empty() => Ok(None),
            RatingInput::Text(text) => text
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| DashboardError::InvalidRating(text.clone())),
        }
    }
}

/// One recruiter's dashboard session.
#[derive(Debug, Clone)]
pub struct Dashboard {
    jobs: Vec<Job>,
    candidates: Vec<Candidate>,
    jobs_source: DataSource,
    candidates_source: DataSource,
    controls: Controls,
    drawer: DrawerState,
    availability: AvailabilityStore,
    notes: NoteBook,
    bookings: BookingLedger,
}

impl Dashboard {
    pub fn new(data: PipelineData, slots: Vec<AvailabilitySlot>) -> Self {
        let mut dashboard = Self {
            jobs: vec![],
            candidates: vec![],
            jobs_source: data.jobs_source,
            candidates_source: data.candidates_source,
            controls: Controls::default(),
            drawer: DrawerState::Closed,
            availability: AvailabilityStore::new(slots),
            notes: NoteBook::default(),
            bookings: BookingLedger::default(),
        };
        dashboard.replace_data(data);
        dashboard
    }

    /// Swaps in freshly loaded jobs and candidates. The selected job survives if
    /// it still exists; the drawer closes if its candidate is gone.
    pub fn replace_data(&mut self, data: PipelineData) {
        self.jobs = data.jobs;
        self.candidates = data.candidates;
        self.jobs_source = data.jobs_source;
        self.candidates_source = data.candidates_source;

        let keep_job = self
            .controls
            .job_id
            .as_deref()
            .is_some_and(|id| self.jobs.iter().any(|j| j.id == id));
        if !keep_job {
            self.controls.job_id = self.jobs.first().map(|j| j.id.clone());
        }

        if let Some(active) = self.drawer.active_candidate() {
            if self.candidate(active).is_none() {
                self.drawer.close();
            }
        }

        info!(
            "Dashboard data replaced: {} jobs ({:?}), {} candidates ({:?})",
            self.jobs.len(),
            self.jobs_source,
            self.candidates.len(),
            self.candidates_source
        );
    }

    pub fn availability(&self) -> &AvailabilityStore {
        &self.availability
    }

    pub fn selected_job(&self) -> Option<&Job> {
        let id = self.controls.job_id.as_deref()?;
        self.jobs.iter().find(|j| j.id == id)
    }

    pub fn candidate(&self, candidate_id: &str) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == candidate_id)
    }

    /// Applies one action. Returns the transient status message, if any.
    /// A rejected action leaves the session unchanged.
    pub fn handle(
        &mut self,
        action: Action,
        now: DateTime<Utc>,
    ) -> Result<Option<String>, DashboardError> {
        debug!("Dashboard action: {action:?}");

        match action {
            Action::SelectJob { job_id } => {
                if !self.jobs.iter().any(|j| j.id == job_id) {
                    return Err(DashboardError::JobNotFound(job_id));
                }
                self.controls.job_id = Some(job_id);
                Ok(None)
            }
            Action::SetMinScore { min_score } => {
                self.controls.min_score = min_score;
                Ok(None)
            }
            Action::SetDomain { domain } => {
                self.controls.domain = domain;
                Ok(None)
            }
            Action::SetSearch { query } => {
                self.controls.search = query;
                Ok(None)
            }
            Action::SetSort { sort } => {
                self.controls.sort = sort;
                Ok(None)
            }
            Action::Refresh => Ok(Some("Refreshed.".to_string())),
            Action::OpenCandidate { candidate_id } => {
                if self.candidate(&candidate_id).is_none() {
                    return Err(DashboardError::CandidateNotFound(candidate_id));
                }
                self.drawer.open(candidate_id);
                Ok(None)
            }
            Action::CloseDrawer => {
                self.drawer.close();
                Ok(None)
            }
            Action::SaveNote { rating, notes } => {
                let candidate_id = self
                    .drawer
                    .active_candidate()
                    .ok_or(DashboardError::DrawerClosed)?
                    .to_string();
                let rating = rating.as_ref().map(RatingInput::value).transpose()?.flatten();
                self.notes.save(&candidate_id, rating, &notes, now)?;
                info!("Saved notes for {candidate_id}");
                Ok(Some("Notes saved.".to_string()))
            }
            Action::BookInterview { slot_id } => self.book_interview(slot_id, now),
            Action::AddSlot { day, start, end } => {
                let slot = self.availability.add(&day, &start, &end)?;
                info!("Availability added: {} ({})", slot.label(), slot.id);
                Ok(Some("Availability added.".to_string()))
            }
            Action::RemoveSlot { slot_id } => {
                let slot = self.availability.remove(&slot_id, &self.bookings)?;
                info!("Availability removed: {} ({})", slot.label(), slot.id);
                Ok(Some("Availability removed.".to_string()))
            }
        }
    }

    fn book_interview(
        &mut self,
        slot_id: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Option<String>, DashboardError> {
        let candidate_id = self
            .drawer
            .active_candidate()
            .ok_or(DashboardError::DrawerClosed)?
            .to_string();
        let job_id = self
            .controls
            .job_id
            .clone()
            .ok_or(DashboardError::NoJobSelected)?;

        let slot_id = slot_id
            .filter(|id| !id.trim().is_empty())
            .ok_or(DashboardError::NoSlotSelected)?;
        let slot = self
            .availability
            .get(&slot_id)
            .ok_or_else(|| DashboardError::SlotNotFound(slot_id.clone()))?;

        let receipt = self.bookings.book(&candidate_id, &job_id, slot, now)?;
        info!(
            "Booked {candidate_id} for {job_id} in {} ({} conflict(s))",
            slot.label(),
            receipt.conflicts.len()
        );
        self.drawer.record_booking(receipt);

        Ok(Some("Interview booked.".to_string()))
    }
}
