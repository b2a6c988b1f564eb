use serde::{Deserialize, Serialize};

/// Body of `POST /recruiters/{id}/interviews`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewInterview {
    pub candidate_id: i64,
    pub role_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedInterview {
    pub interview_id: i64,
}

/// Body of `POST /recruiters/{id}/interviews/{interview_id}/notes`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InterviewNote {
    pub notes: String,
    pub fit_score: Option<u8>,
    pub role_id: i64,
}

/// Body of `POST /recruiters/{id}/availability`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AvailabilityWindow {
    pub start_time: String,
    pub end_time: String,
}
