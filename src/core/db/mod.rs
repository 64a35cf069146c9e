mod error;
mod feedback;
mod model;
mod project;
mod state;

use std::{path::Path, sync::Arc};

use sqlx::{QueryBuilder, Sqlite};
use uuid::Uuid;

pub use error::GatewayError;
pub use feedback::{
    Feedback, FeedbackKind, FeedbackOrder, FeedbackPatch, FeedbackQuery, FeedbackRepository,
    FeedbackStatus, NewFeedback, Priority,
};
pub use model::{Color, format_date};
pub use project::{NewProject, Project, ProjectChoice, ProjectPatch, ProjectRepository};

pub(crate) use state::StoreState;

/// Everything the dashboard reads and writes.
pub trait DataGateway: ProjectRepository + FeedbackRepository + Clone + Send + Sync + 'static {}

impl<T> DataGateway for T where T: ProjectRepository + FeedbackRepository + Clone + Send + Sync + 'static {}

macro_rules! project_columns {
    () => {
        "id, name, domain, owner_id, created_at"
    };
}

macro_rules! feedback_columns {
    () => {
        "id, user_id, project_id, title, description, type, status, priority, user_email, created_at"
    };
}

/// Handle to the feedback store. Cheap to clone; clones share one pool.
#[derive(Debug, Clone)]
pub struct FeedbackDb {
    state: Arc<StoreState>,
}

impl FeedbackDb {
    /// Opens (creating and migrating if needed) the store at `db_file`.
    pub async fn open<P: AsRef<Path>>(db_file: P) -> Result<Self, GatewayError> {
        Ok(Self {
            state: Arc::new(StoreState::open(db_file).await?),
        })
    }

    pub fn path(&self) -> &Path {
        self.state.db_file()
    }

    /// Flush and close the store. Required before dropping in an async context
    /// if the WAL should be folded back into the database file.
    pub async fn close(&self) -> Result<(), GatewayError> {
        self.state.close().await
    }

    pub(crate) fn state(&self) -> Arc<StoreState> {
        self.state.clone()
    }
}

#[derive(sqlx::FromRow)]
struct ProjectRow {
    id: i64,
    name: String,
    domain: Option<String>,
    owner_id: Option<String>,
    created_at: String,
    #[sqlx(default)]
    feedback_count: Option<i64>,
}

impl TryFrom<ProjectRow> for Project {
    type Error = GatewayError;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        let owner_id = row
            .owner_id
            .map(|owner| Uuid::parse_str(&owner).map_err(|_| GatewayError::decode("owner_id", owner)))
            .transpose()?;
        Ok(Project {
            id: row.id,
            name: row.name,
            domain: row.domain,
            owner_id,
            created_at: model::parse_timestamp("created_at", &row.created_at)?,
            feedback_count: row.feedback_count.map(|count| count.max(0) as u64),
        })
    }
}

#[derive(sqlx::FromRow)]
struct FeedbackRow {
    id: String,
    user_id: String,
    project_id: i64,
    title: String,
    description: String,
    #[sqlx(rename = "type")]
    kind: String,
    status: String,
    priority: String,
    user_email: String,
    created_at: String,
}

impl TryFrom<FeedbackRow> for Feedback {
    type Error = GatewayError;

    fn try_from(row: FeedbackRow) -> Result<Self, Self::Error> {
        Ok(Feedback {
            user_id: Uuid::parse_str(&row.user_id)
                .map_err(|_| GatewayError::decode("user_id", &row.user_id))?,
            kind: row.kind.parse().map_err(|_| GatewayError::decode("type", &row.kind))?,
            status: row
                .status
                .parse()
                .map_err(|_| GatewayError::decode("status", &row.status))?,
            priority: row
                .priority
                .parse()
                .map_err(|_| GatewayError::decode("priority", &row.priority))?,
            created_at: model::parse_timestamp("created_at", &row.created_at)?,
            id: row.id,
            project_id: row.project_id,
            title: row.title,
            description: row.description,
            user_email: row.user_email,
        })
    }
}

/// Escapes LIKE wildcards so user search text matches literally.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

impl ProjectRepository for FeedbackDb {
    async fn list_projects(&self) -> Result<Vec<Project>, GatewayError> {
        let mut conn = self.state.conn().await?;
        sqlx::query_as::<_, ProjectRow>(
            r#"SELECT p.id, p.name, p.domain, p.owner_id, p.created_at,
                (SELECT COUNT(*) FROM feedback f WHERE f.project_id = p.id) AS feedback_count
            FROM projects p
            ORDER BY p.id ASC"#,
        )
        .fetch_all(&mut **conn)
        .await?
        .into_iter()
        .map(Project::try_from)
        .collect()
    }

    async fn list_project_choices(&self) -> Result<Vec<ProjectChoice>, GatewayError> {
        let mut conn = self.state.conn().await?;
        let rows: Vec<(i64, String)> =
            sqlx::query_as("SELECT id, name FROM projects ORDER BY id ASC")
                .fetch_all(&mut **conn)
                .await?;
        Ok(rows
            .into_iter()
            .map(|(id, name)| ProjectChoice { id, name })
            .collect())
    }

    async fn count_projects(&self) -> Result<u64, GatewayError> {
        let mut conn = self.state.conn().await?;
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects")
            .fetch_one(&mut **conn)
            .await?;
        Ok(count.max(0) as u64)
    }

    async fn insert_project(&self, project: NewProject) -> Result<Project, GatewayError> {
        let mut conn = self.state.conn().await?;
        let owner_id = project.owner_id.map(|id| id.to_string());
        let row = sqlx::query_as::<_, ProjectRow>(concat!(
            "INSERT INTO projects (name, domain, owner_id) VALUES (?, ?, ?) RETURNING ",
            project_columns!(),
            ", 0 AS feedback_count"
        ))
        .bind(&project.name)
        .bind(&project.domain)
        .bind(owner_id)
        .fetch_one(&mut **conn)
        .await?;
        Project::try_from(row)
    }

    async fn update_project(&self, id: i64, patch: ProjectPatch) -> Result<Project, GatewayError> {
        let mut conn = self.state.conn().await?;
        let (set_domain, domain) = match patch.domain {
            Some(domain) => (true, domain),
            None => (false, None),
        };
        let row = sqlx::query_as::<_, ProjectRow>(concat!(
            r#"UPDATE projects SET
                name = COALESCE(?, name),
                domain = CASE WHEN ? THEN ? ELSE domain END
            WHERE id = ?
            RETURNING "#,
            project_columns!()
        ))
        .bind(&patch.name)
        .bind(set_domain)
        .bind(domain)
        .bind(id)
        .fetch_optional(&mut **conn)
        .await?
        .ok_or_else(|| GatewayError::NotFound {
            resource: "project",
            id: id.to_string(),
        })?;
        Project::try_from(row)
    }
}

impl FeedbackRepository for FeedbackDb {
    async fn list_feedback(&self, query: &FeedbackQuery) -> Result<Vec<Feedback>, GatewayError> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(concat!("SELECT ", feedback_columns!(), " FROM feedback WHERE 1 = 1"));
        if let Some(status) = query.status {
            builder.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(term) = query.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let pattern = like_pattern(term);
            builder
                .push(r" AND (title LIKE ")
                .push_bind(pattern.clone())
                .push(r" ESCAPE '\' OR description LIKE ")
                .push_bind(pattern)
                .push(r" ESCAPE '\')");
        }
        builder.push(match query.order {
            FeedbackOrder::NewestFirst => " ORDER BY created_at DESC, rowid DESC",
            FeedbackOrder::OldestFirst => " ORDER BY created_at ASC, rowid ASC",
        });
        if let Some(limit) = query.limit {
            builder.push(" LIMIT ").push_bind(i64::from(limit));
        }

        let mut conn = self.state.conn().await?;
        builder
            .build_query_as::<FeedbackRow>()
            .fetch_all(&mut **conn)
            .await?
            .into_iter()
            .map(Feedback::try_from)
            .collect()
    }

    async fn count_feedback(&self, status: Option<FeedbackStatus>) -> Result<u64, GatewayError> {
        let mut conn = self.state.conn().await?;
        let count: i64 = match status {
            Some(status) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM feedback WHERE status = ?")
                    .bind(status.as_str())
                    .fetch_one(&mut **conn)
                    .await?
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM feedback")
                    .fetch_one(&mut **conn)
                    .await?
            }
        };
        Ok(count.max(0) as u64)
    }

    async fn insert_feedback(&self, feedback: NewFeedback) -> Result<Feedback, GatewayError> {
        let mut conn = self.state.conn().await?;
        let row = sqlx::query_as::<_, FeedbackRow>(concat!(
            r#"INSERT INTO feedback (user_id, project_id, title, description, type, user_email)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING "#,
            feedback_columns!()
        ))
        .bind(feedback.user_id.to_string())
        .bind(feedback.project_id)
        .bind(&feedback.title)
        .bind(&feedback.description)
        .bind(feedback.kind.as_str())
        .bind(&feedback.user_email)
        .fetch_one(&mut **conn)
        .await?;
        Feedback::try_from(row)
    }

    async fn update_feedback(&self, id: &str, patch: FeedbackPatch) -> Result<Feedback, GatewayError> {
        let mut conn = self.state.conn().await?;
        let row = sqlx::query_as::<_, FeedbackRow>(concat!(
            r#"UPDATE feedback SET
                status = COALESCE(?, status),
                priority = COALESCE(?, priority)
            WHERE id = ?
            RETURNING "#,
            feedback_columns!()
        ))
        .bind(patch.status.map(|s| s.as_str()))
        .bind(patch.priority.map(|p| p.as_str()))
        .bind(id)
        .fetch_optional(&mut **conn)
        .await?
        .ok_or_else(|| GatewayError::NotFound {
            resource: "feedback",
            id: id.to_string(),
        })?;
        Feedback::try_from(row)
    }
}
