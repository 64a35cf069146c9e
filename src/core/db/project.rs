use std::future::Future;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::core::db::{GatewayError, model::Color};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub domain: Option<String>,
    pub owner_id: Option<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Derived from the feedback table; absent for rows fetched without the sub-count.
    pub feedback_count: Option<u64>,
}

impl Project {
    pub fn feedback_count_or_zero(&self) -> u64 {
        self.feedback_count.unwrap_or(0)
    }

    pub fn color(&self) -> Color {
        Color::for_project(self.id)
    }

    /// First character of the name, upper-cased, for the avatar.
    pub fn initial(&self) -> char {
        self.name
            .chars()
            .next()
            .map(|c| c.to_uppercase().next().unwrap_or(c))
            .unwrap_or('?')
    }
}

/// The id/name pair used by project selectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectChoice {
    pub id: i64,
    pub name: String,
}

impl std::fmt::Display for ProjectChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub name: String,
    pub domain: Option<String>,
    pub owner_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectPatch {
    pub name: Option<String>,
    /// `Some(None)` clears the domain.
    pub domain: Option<Option<String>>,
}

pub trait ProjectRepository {
    fn list_projects(&self) -> impl Future<Output = Result<Vec<Project>, GatewayError>> + Send;
    fn list_project_choices(
        &self,
    ) -> impl Future<Output = Result<Vec<ProjectChoice>, GatewayError>> + Send;
    fn count_projects(&self) -> impl Future<Output = Result<u64, GatewayError>> + Send;
    fn insert_project(
        &self,
        project: NewProject,
    ) -> impl Future<Output = Result<Project, GatewayError>> + Send;
    fn update_project(
        &self,
        id: i64,
        patch: ProjectPatch,
    ) -> impl Future<Output = Result<Project, GatewayError>> + Send;
}
