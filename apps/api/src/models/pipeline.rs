use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// A job posting candidates are scored against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Job {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub requirements: Vec<String>,
}

/// One completed assessment on a candidate's record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Assessment {
    pub domain: String,
    pub level: u8,
    pub score: u32,
    pub total: u32,
}

/// An anonymous candidate in the recruiter's pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: String,
    pub last_active: DateTime<Utc>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub domains: Vec<String>,
    #[serde(default)]
    pub assessments: Vec<Assessment>,
}

/// Row returned by `GET /recruiters/{id}/pipeline`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineEntry {
    pub candidate_id: i64,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub role_title: Option<String>,
    #[serde(default)]
    pub match_score: Option<f64>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

impl From<PipelineEntry> for Candidate {
    /// The pipeline endpoint carries no skills, domains or assessments yet.
    fn from(entry: PipelineEntry) -> Self {
        Candidate {
            id: entry.candidate_id.to_string(),
            last_active: entry
                .last_updated
                .as_deref()
                .and_then(parse_timestamp)
                .unwrap_or_default(),
            skills: vec![],
            domains: vec![],
            assessments: vec![],
        }
    }
}

/// Response of `GET /recruiters/{id}/candidates/{candidateId}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateDetail {
    pub id: serde_json::Value,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "isAnonymous", default)]
    pub is_anonymous: bool,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

impl CandidateDetail {
    pub fn display_name(&self) -> String {
        match (&self.name, self.is_anonymous) {
            (Some(name), false) => name.clone(),
            _ => "Anonymous Candidate".to_string(),
        }
    }
}

/// Parses RFC 3339 timestamps, falling back to naive ISO timestamps read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}
