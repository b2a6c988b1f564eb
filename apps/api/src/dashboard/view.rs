//! View-models returned to the client. `Dashboard::render` is a pure function
//! of session state; clients only draw what it returns.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::dashboard::filter::{filter_candidates, unique_domains, Controls, RankedCandidate};
use crate::dashboard::scoring::{
    assessment_percent, compute_match_score, overall_assessment_percent, MatchResult, ScoreBand,
};
use crate::dashboard::store::{AvailabilitySlot, Note};
use crate::dashboard::{Dashboard, DataSource};
use crate::models::pipeline::{Candidate, Job};

pub const NO_MATCHES_MESSAGE: &str = "No candidates match your filters.";
pub const NO_JOBS_MESSAGE: &str = "No jobs available.";

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub jobs: Vec<JobOption>,
    pub domains: Vec<String>,
    pub controls: Controls,
    pub sources: SourcesView,
    pub meta: String,
    pub list: CandidateList,
    pub slots: SlotList,
    pub drawer: Option<DrawerView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobOption {
    pub id: String,
    pub title: String,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourcesView {
    pub jobs: DataSource,
    pub candidates: DataSource,
}

/// The candidate list never renders as a silently empty container.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CandidateList {
    Empty { message: String },
    Rows { rows: Vec<CandidateRow> },
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateRow {
    pub id: String,
    pub last_active: String,
    pub domains: Vec<String>,
    pub skills: Vec<String>,
    pub assessment_percent: u32,
    pub assessment_count: usize,
    pub matched: MatchSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchSummary {
    pub score: u32,
    pub band: ScoreBand,
    pub matches: usize,
    pub total: usize,
    pub overlap: String,
}

impl From<MatchResult> for MatchSummary {
    fn from(m: MatchResult) -> Self {
        MatchSummary {
            score: m.score,
            band: ScoreBand::for_score(m.score),
            matches: m.matches,
            total: m.total,
            overlap: format!("{}/{} overlap", m.matches, m.total),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SlotList {
    Empty { message: String },
    Slots { slots: Vec<SlotView> },
}

#[derive(Debug, Clone, Serialize)]
pub struct SlotView {
    pub id: String,
    pub label: String,
}

impl From<&AvailabilitySlot> for SlotView {
    fn from(slot: &AvailabilitySlot) -> Self {
        SlotView {
            id: slot.id.clone(),
            label: slot.label(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DrawerView {
    pub candidate_id: String,
    pub job_title: Option<String>,
    pub matched: Option<MatchSummary>,
    pub last_active: String,
    pub assessment_summary: String,
    pub assessments: Vec<AssessmentRow>,
    pub note: NoteView,
    pub slot_picker: SlotPicker,
    pub booking: Option<BookingView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssessmentRow {
    pub domain: String,
    pub level: u8,
    pub score: u32,
    pub total: u32,
    pub percent: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum NoteView {
    Empty {
        message: String,
    },
    Saved {
        rating: u8,
        notes: String,
        saved_at: DateTime<Utc>,
        summary: String,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SlotPicker {
    Empty { placeholder: String },
    Options { options: Vec<SlotView> },
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingView {
    pub message: String,
    pub warnings: Vec<String>,
}

impl Dashboard {
    pub fn render(&self) -> DashboardView {
        let job = self.selected_job();
        let ranked = job
            .map(|j| filter_candidates(&self.candidates, j, &self.controls))
            .unwrap_or_default();

        DashboardView {
            jobs: self
                .jobs
                .iter()
                .map(|j| JobOption {
                    id: j.id.clone(),
                    title: j.title.clone(),
                    selected: Some(j.id.as_str()) == self.controls.job_id.as_deref(),
                })
                .collect(),
            domains: unique_domains(&self.candidates),
            controls: self.controls.clone(),
            sources: SourcesView {
                jobs: self.jobs_source,
                candidates: self.candidates_source,
            },
            meta: render_meta(job, ranked.len()),
            list: render_list(job, &ranked),
            slots: render_slots(self.availability.slots()),
            drawer: self.render_drawer(job),
        }
    }

    fn render_drawer(&self, job: Option<&Job>) -> Option<DrawerView> {
        let candidate = self.candidate(self.drawer.active_candidate()?)?;
        let matched = job.map(|j| MatchSummary::from(compute_match_score(candidate, j)));

        let slots = self.availability.slots();
        let slot_picker = if slots.is_empty() {
            SlotPicker::Empty {
                placeholder: "No availability slots".to_string(),
            }
        } else {
            SlotPicker::Options {
                options: slots.iter().map(SlotView::from).collect(),
            }
        };

        let booking = self.drawer.last_booking().map(|receipt| {
            let when = self
                .availability
                .get(&receipt.booking.slot_id)
                .map(|s| s.label())
                .unwrap_or_else(|| receipt.booking.slot_id.clone());
            BookingView {
                message: format!("Interview scheduled for {when}."),
                warnings: receipt
                    .conflicts
                    .iter()
                    .map(|c| c.description.clone())
                    .collect(),
            }
        });

        Some(DrawerView {
            candidate_id: candidate.id.clone(),
            job_title: job.map(|j| j.title.clone()),
            matched,
            last_active: human_date(&candidate.last_active),
            assessment_summary: assessment_summary(candidate),
            assessments: candidate
                .assessments
                .iter()
                .map(|a| AssessmentRow {
                    domain: a.domain.clone(),
                    level: a.level,
                    score: a.score,
                    total: a.total,
                    percent: assessment_percent(a),
                })
                .collect(),
            note: render_note(self.notes.get(&candidate.id)),
            slot_picker,
            booking,
        })
    }
}

fn render_meta(job: Option<&Job>, shown: usize) -> String {
    match job {
        Some(job) => format!(
            "{shown} candidates shown • Job requirements: {}",
            job.requirements.join(", ")
        ),
        None => NO_JOBS_MESSAGE.to_string(),
    }
}

fn render_list(job: Option<&Job>, ranked: &[RankedCandidate<'_>]) -> CandidateList {
    if job.is_none() {
        return CandidateList::Empty {
            message: NO_JOBS_MESSAGE.to_string(),
        };
    }
    if ranked.is_empty() {
        return CandidateList::Empty {
            message: NO_MATCHES_MESSAGE.to_string(),
        };
    }

    CandidateList::Rows {
        rows: ranked
            .iter()
            .map(|r| CandidateRow {
                id: r.candidate.id.clone(),
                last_active: human_date(&r.candidate.last_active),
                domains: r.candidate.domains.clone(),
                skills: r.candidate.skills.clone(),
                assessment_percent: overall_assessment_percent(r.candidate),
                assessment_count: r.candidate.assessments.len(),
                matched: r.matched.into(),
            })
            .collect(),
    }
}

fn render_slots(slots: &[AvailabilitySlot]) -> SlotList {
    if slots.is_empty() {
        return SlotList::Empty {
            message: "No availability yet.".to_string(),
        };
    }
    SlotList::Slots {
        slots: slots.iter().map(SlotView::from).collect(),
    }
}

fn render_note(note: Option<&Note>) -> NoteView {
    match note {
        None => NoteView::Empty {
            message: "No notes yet.".to_string(),
        },
        Some(note) => NoteView::Saved {
            rating: note.rating,
            notes: note.notes.clone(),
            saved_at: note.saved_at,
            summary: format!(
                "Rating: {}/10 • Saved: {}\n\n{}",
                note.rating,
                human_date(&note.saved_at),
                note.notes
            ),
        },
    }
}

fn assessment_summary(candidate: &Candidate) -> String {
    format!(
        "{} completed • Overall: {}%",
        candidate.assessments.len(),
        overall_assessment_percent(candidate)
    )
}

/// e.g. "Fri, Dec 12, 21:52 UTC".
pub fn human_date(ts: &DateTime<Utc>) -> String {
    ts.format("%a, %b %-d, %H:%M UTC").to_string()
}
