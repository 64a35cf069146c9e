use std::{fmt, future::Future, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::core::db::GatewayError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedbackKind {
    Bug,
    Feature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedbackStatus {
    Open,
    InProgress,
    Resolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl FeedbackKind {
    pub const ALL: [FeedbackKind; 2] = [FeedbackKind::Bug, FeedbackKind::Feature];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bug => "bug",
            Self::Feature => "feature",
        }
    }

    /// Plain-text tag shown next to a feedback title.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Bug => "Bug",
            Self::Feature => "Feature",
        }
    }
}

impl FeedbackStatus {
    pub const ALL: [FeedbackStatus; 3] = [
        FeedbackStatus::Open,
        FeedbackStatus::InProgress,
        FeedbackStatus::Resolved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in-progress",
            Self::Resolved => "resolved",
        }
    }

    /// Human label used by status selectors.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
        }
    }
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for FeedbackKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bug" => Ok(Self::Bug),
            "feature" => Ok(Self::Feature),
            _ => Err(format!("Invalid feedback type: {}", s)),
        }
    }
}

impl FromStr for FeedbackStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "in-progress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            _ => Err(format!("Invalid status: {}", s)),
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("Invalid priority: {}", s)),
        }
    }
}

impl fmt::Display for FeedbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for FeedbackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Feedback {
    pub id: String,
    pub user_id: Uuid,
    pub project_id: i64,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: FeedbackKind,
    pub status: FeedbackStatus,
    pub priority: Priority,
    pub user_email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A feedback row as submitted; status and priority come from the store defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeedback {
    pub user_id: Uuid,
    pub project_id: i64,
    pub title: String,
    pub description: String,
    pub kind: FeedbackKind,
    pub user_email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackPatch {
    pub status: Option<FeedbackStatus>,
    pub priority: Option<Priority>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FeedbackOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackQuery {
    pub status: Option<FeedbackStatus>,
    /// Case-insensitive match against title or description.
    pub search: Option<String>,
    pub order: FeedbackOrder,
    pub limit: Option<u32>,
}

impl FeedbackQuery {
    pub fn recent(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }
}

pub trait FeedbackRepository {
    fn list_feedback(
        &self,
        query: &FeedbackQuery,
    ) -> impl Future<Output = Result<Vec<Feedback>, GatewayError>> + Send;
    fn count_feedback(
        &self,
        status: Option<FeedbackStatus>,
    ) -> impl Future<Output = Result<u64, GatewayError>> + Send;
    fn insert_feedback(
        &self,
        feedback: NewFeedback,
    ) -> impl Future<Output = Result<Feedback, GatewayError>> + Send;
    fn update_feedback(
        &self,
        id: &str,
        patch: FeedbackPatch,
    ) -> impl Future<Output = Result<Feedback, GatewayError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_strings_match_store_values() {
        for status in FeedbackStatus::ALL {
            assert_eq!(status.as_str().parse::<FeedbackStatus>(), Ok(status));
        }
        assert_eq!(FeedbackStatus::InProgress.as_str(), "in-progress");
        assert!("closed".parse::<FeedbackStatus>().is_err());
    }

    #[test]
    fn kind_and_priority_reject_unknown_values() {
        assert_eq!("feature".parse::<FeedbackKind>(), Ok(FeedbackKind::Feature));
        assert!("idea".parse::<FeedbackKind>().is_err());
        assert_eq!("high".parse::<Priority>(), Ok(Priority::High));
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn labels_are_plain_text() {
        let labels: Vec<&str> = FeedbackKind::ALL.iter().map(|kind| kind.label()).collect();
        assert_eq!(labels, ["Bug", "Feature"]);
        for status in FeedbackStatus::ALL {
            assert!(status.label().is_ascii());
        }
    }
}
