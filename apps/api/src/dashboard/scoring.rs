//! Match scoring: how well a candidate's skills cover a job's requirements.
//!
//! A requirement counts as matched when any skill contains it or is contained
//! by it, ignoring case. Scores are capped at `MAX_MATCH_SCORE`.

use serde::{Deserialize, Serialize};

use crate::models::pipeline::{Assessment, Candidate, Job};

pub const MAX_MATCH_SCORE: u32 = 95;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchResult {
    pub score: u32, // 0 – 95
    pub matches: usize,
    pub total: usize, // never 0
}

/// Colour band of a score as shown next to candidates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Ok,
    Mid,
    Bad,
}

impl ScoreBand {
    pub fn for_score(score: u32) -> Self {
        if score >= 80 {
            ScoreBand::Ok
        } else if score >= 60 {
            ScoreBand::Mid
        } else {
            ScoreBand::Bad
        }
    }
}

pub fn compute_match_score(candidate: &Candidate, job: &Job) -> MatchResult {
    let skills: Vec<String> = candidate.skills.iter().map(|s| s.to_lowercase()).collect();

    let matches = job
        .requirements
        .iter()
        .map(|r| r.to_lowercase())
        .filter(|req| {
            skills
                .iter()
                .any(|skill| skill.contains(req.as_str()) || req.contains(skill.as_str()))
        })
        .count();

    let total = job.requirements.len().max(1);
    let score = percent(matches as u64, total as u64).min(MAX_MATCH_SCORE);

    MatchResult {
        score,
        matches,
        total,
    }
}

/// Percentage of a single assessment, 0 when it has no total.
pub fn assessment_percent(assessment: &Assessment) -> u32 {
    percent(assessment.score as u64, assessment.total as u64)
}

/// Pooled percentage across all of a candidate's assessments.
pub fn overall_assessment_percent(candidate: &Candidate) -> u32 {
    let (score, total) = candidate
        .assessments
        .iter()
        .fold((0u64, 0u64), |(score, total), a| {
            (score + a.score as u64, total + a.total as u64)
        });
    percent(score, total)
}

fn percent(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u32
}
