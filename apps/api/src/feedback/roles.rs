use serde::{Deserialize, Serialize};
use tracing::info;

use crate::backend::RecruiterBackend;
use crate::feedback::FeedbackError;
use crate::models::role::{NewRequirement, NewRole};

/// Role form as submitted. Requirement rows with blank text are dropped.
#[derive(Debug, Clone, Deserialize)]
pub struct RoleForm {
    #[serde(default)]
    pub role_id: Option<i64>,
    pub company_id: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<RequirementRow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequirementRow {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub level: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoleCreated {
    pub role_id: i64,
    pub status: String,
}

impl RoleForm {
    pub fn validate(&self) -> Result<NewRole, FeedbackError> {
        let title = self.title.trim();
        let company_id = match self.company_id {
            Some(id) if !title.is_empty() => id,
            _ => return Err(FeedbackError::MissingRoleFields),
        };

        let mut requirements = Vec::with_capacity(self.requirements.len());
        for row in &self.requirements {
            let text = row.text.trim();
            if text.is_empty() {
                continue;
            }
            if let Some(level) = row.level {
                if !(1..=5).contains(&level) {
                    return Err(FeedbackError::LevelOutOfRange(level));
                }
            }
            requirements.push(NewRequirement {
                requirement_text: text.to_string(),
                level: row.level,
            });
        }

        Ok(NewRole {
            role_id: self.role_id,
            company_id,
            title: title.to_string(),
            description: self.description.trim().to_string(),
            requirements,
        })
    }
}

pub async fn create_role(
    backend: &dyn RecruiterBackend,
    form: &RoleForm,
) -> Result<RoleCreated, FeedbackError> {
    let role = form.validate()?;
    let created = backend.create_role(&role).await?;
    info!("Created role {} ({})", created.role_id, role.title);
    Ok(RoleCreated {
        role_id: created.role_id,
        status: format!("Role created (id={})", created.role_id),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fake::FakeBackend;

    fn form() -> RoleForm {
        RoleForm {
            role_id: None,
            company_id: Some(1),
            title: "  Backend Engineer ".to_string(),
            description: "Owns the ingestion path".to_string(),
            requirements: vec![
                RequirementRow {
                    text: "Rust".to_string(),
                    level: Some(4),
                },
                RequirementRow {
                    text: "   ".to_string(),
                    level: Some(9),
                },
                RequirementRow {
                    text: "Postgres".to_string(),
                    level: None,
                },
            ],
        }
    }

    #[test]
    fn test_blank_requirement_rows_are_dropped() {
        let role = form().validate().unwrap();
        assert_eq!(role.title, "Backend Engineer");
        let texts: Vec<_> = role
            .requirements
            .iter()
            .map(|r| r.requirement_text.as_str())
            .collect();
        assert_eq!(texts, vec!["Rust", "Postgres"]);
    }

    #[test]
    fn test_company_and_title_required() {
        let mut missing_company = form();
        missing_company.company_id = None;
        assert!(matches!(
            missing_company.validate(),
            Err(FeedbackError::MissingRoleFields)
        ));

        let mut blank_title = form();
        blank_title.title = " ".to_string();
        assert!(matches!(
            blank_title.validate(),
            Err(FeedbackError::MissingRoleFields)
        ));
    }

    #[test]
    fn test_requirement_level_range() {
        let mut bad = form();
        bad.requirements[0].level = Some(0);
        assert!(matches!(
            bad.validate(),
            Err(FeedbackError::LevelOutOfRange(0))
        ));
    }

    #[tokio::test]
    async fn test_create_role_reports_new_id() {
        let backend = FakeBackend::default();
        let created = create_role(&backend, &form()).await.unwrap();
        assert_eq!(created.role_id, 100);
        assert_eq!(created.status, "Role created (id=100)");
        assert_eq!(backend.created_roles.lock().await.len(), 1);
    }
}
