use serde::{Deserialize, Serialize};

use crate::models::pipeline::Job;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoleRequirement {
    #[serde(default)]
    pub id: Option<i64>,
    pub text: String,
    #[serde(default)]
    pub level: Option<i32>,
}

/// A job role as listed by `GET /recruiters/{id}/roles`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoleSummary {
    pub role_id: i64,
    #[serde(default)]
    pub company_id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub requirements: Vec<RoleRequirement>,
}

impl From<RoleSummary> for Job {
    fn from(role: RoleSummary) -> Self {
        Job {
            id: role.role_id.to_string(),
            title: role.title,
            requirements: role.requirements.into_iter().map(|r| r.text).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewRequirement {
    pub requirement_text: String,
    pub level: Option<i32>,
}

/// Body of `POST /recruiters/{id}/roles`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewRole {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<i64>,
    pub company_id: i64,
    pub title: String,
    pub description: String,
    pub requirements: Vec<NewRequirement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedRole {
    pub role_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_becomes_job_with_requirement_texts() {
        let role: RoleSummary = serde_json::from_value(json!({
            "role_id": 12,
            "company_id": 3,
            "title": "Platform Engineer",
            "description": null,
            "requirements": [
                { "id": 1, "text": "Rust", "level": 3 },
                { "id": 2, "text": "Kubernetes", "level": null }
            ]
        }))
        .unwrap();

        let job = Job::from(role);
        assert_eq!(job.id, "12");
        assert_eq!(job.requirements, vec!["Rust", "Kubernetes"]);
    }

    #[test]
    fn test_new_role_omits_absent_role_id() {
        let body = serde_json::to_value(NewRole {
            role_id: None,
            company_id: 1,
            title: "SRE".to_string(),
            description: String::new(),
            requirements: vec![],
        })
        .unwrap();
        assert!(body.get("role_id").is_none());
        assert_eq!(body["company_id"], 1);
    }
}
