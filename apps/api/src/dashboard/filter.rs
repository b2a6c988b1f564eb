use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::dashboard::scoring::{compute_match_score, MatchResult};
use crate::models::pipeline::{Candidate, Job};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    None,
    ScoreDesc,
    ScoreAsc,
    RecentDesc,
}

/// Sentinel domain value meaning "no domain filter".
pub const ALL_DOMAINS: &str = "ALL";

/// Domain control value. Serialized as the domain name, or `ALL_DOMAINS`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(from = "String", into = "String")]
pub enum DomainFilter {
    #[default]
    All,
    Only(String),
}

impl From<String> for DomainFilter {
    fn from(value: String) -> Self {
        if value == ALL_DOMAINS {
            DomainFilter::All
        } else {
            DomainFilter::Only(value)
        }
    }
}

impl From<DomainFilter> for String {
    fn from(value: DomainFilter) -> Self {
        match value {
            DomainFilter::All => ALL_DOMAINS.to_string(),
            DomainFilter::Only(domain) => domain,
        }
    }
}

/// Current values of the list controls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Controls {
    pub job_id: Option<String>,
    pub min_score: u32,
    pub domain: DomainFilter,
    pub search: String,
    pub sort: SortKey,
}

/// A candidate that survived filtering, with its score for the selected job.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate<'a> {
    pub candidate: &'a Candidate,
    pub matched: MatchResult,
}

/// Scores, filters and sorts `candidates` for `job` under `controls`.
/// With `SortKey::None` the input order is kept.
pub fn filter_candidates<'a>(
    candidates: &'a [Candidate],
    job: &Job,
    controls: &Controls,
) -> Vec<RankedCandidate<'a>> {
    let query = controls.search.trim().to_lowercase();

    let mut ranked: Vec<RankedCandidate<'a>> = candidates
        .iter()
        .map(|candidate| RankedCandidate {
            candidate,
            matched: compute_match_score(candidate, job),
        })
        .filter(|r| r.matched.score >= controls.min_score)
        .filter(|r| match &controls.domain {
            DomainFilter::All => true,
            DomainFilter::Only(domain) => r.candidate.domains.iter().any(|d| d == domain),
        })
        .filter(|r| query.is_empty() || matches_query(r.candidate, &query))
        .collect();

    // sort_by is stable: ties keep collection order.
    match controls.sort {
        SortKey::None => {}
        SortKey::ScoreDesc => ranked.sort_by(|a, b| b.matched.score.cmp(&a.matched.score)),
        SortKey::ScoreAsc => ranked.sort_by(|a, b| a.matched.score.cmp(&b.matched.score)),
        SortKey::RecentDesc => {
            ranked.sort_by(|a, b| b.candidate.last_active.cmp(&a.candidate.last_active))
        }
    }

    ranked
}

fn matches_query(candidate: &Candidate, query: &str) -> bool {
    let hit = |s: &String| s.to_lowercase().contains(query);
    hit(&candidate.id) || candidate.skills.iter().any(hit) || candidate.domains.iter().any(hit)
}

/// Sorted, de-duplicated domains across all candidates.
pub fn unique_domains(candidates: &[Candidate]) -> Vec<String> {
    candidates
        .iter()
        .flat_map(|c| c.domains.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
