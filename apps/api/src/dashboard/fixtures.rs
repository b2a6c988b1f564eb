use anyhow::{Context, Result};
use serde::Deserialize;

use crate::dashboard::store::AvailabilitySlot;
use crate::models::pipeline::{Candidate, Job};

const MOCK_PIPELINE: &str = include_str!("../../data/mock_pipeline.json");

/// Static demo data used when the backend cannot supply jobs or candidates,
/// plus the availability slots a fresh session starts with.
#[derive(Debug, Clone, Deserialize)]
pub struct MockCatalog {
    pub jobs: Vec<Job>,
    pub candidates: Vec<Candidate>,
    pub availability: Vec<AvailabilitySlot>,
}

pub fn mock_catalog() -> Result<MockCatalog> {
    serde_json::from_str(MOCK_PIPELINE).context("embedded mock pipeline data is malformed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_catalog_parses() {
        let catalog = mock_catalog().unwrap();
        assert_eq!(catalog.jobs.len(), 3);
        assert_eq!(catalog.candidates.len(), 4);
        assert_eq!(catalog.availability.len(), 2);
        assert_eq!(catalog.availability[0].id, "slot_1");
    }
}
