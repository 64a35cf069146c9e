use crate::{
    core::{
        auth::IdentityProvider,
        db::{
            DataGateway, Feedback, FeedbackPatch, FeedbackQuery, FeedbackStatus, NewFeedback,
            NewProject, Project, ProjectChoice,
        },
    },
    shell::{
        Action,
        remote::{Failure, Ticket},
    },
};

/// A read issued on behalf of one slot.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchRequest {
    Projects,
    ProjectChoices,
    Feedback(FeedbackQuery),
    CountFeedback(Option<FeedbackStatus>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Fetched {
    Projects(Vec<Project>),
    ProjectChoices(Vec<ProjectChoice>),
    Feedback(Vec<Feedback>),
    Count(u64),
}

/// Pulls the typed payload a slot expects out of a [`Fetched`].
pub(crate) trait Payload: Sized {
    fn from_fetched(fetched: Fetched) -> Option<Self>;
}

impl Payload for Vec<Project> {
    fn from_fetched(fetched: Fetched) -> Option<Self> {
        match fetched {
            Fetched::Projects(projects) => Some(projects),
            _ => None,
        }
    }
}

impl Payload for Vec<ProjectChoice> {
    fn from_fetched(fetched: Fetched) -> Option<Self> {
        match fetched {
            Fetched::ProjectChoices(choices) => Some(choices),
            _ => None,
        }
    }
}

impl Payload for Vec<Feedback> {
    fn from_fetched(fetched: Fetched) -> Option<Self> {
        match fetched {
            Fetched::Feedback(feedback) => Some(feedback),
            _ => None,
        }
    }
}

impl Payload for u64 {
    fn from_fetched(fetched: Fetched) -> Option<Self> {
        match fetched {
            Fetched::Count(count) => Some(count),
            _ => None,
        }
    }
}

pub(crate) fn payload<T: Payload>(result: Result<Fetched, Failure>) -> Result<T, Failure> {
    result.and_then(|fetched| {
        T::from_fetched(fetched).ok_or_else(|| Failure::new("Unexpected response from the data gateway"))
    })
}

/// Work the shell asks its host to run. Each one resolves to exactly one [`Action`].
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Fetch { ticket: Ticket, request: FetchRequest },
    InsertProject(NewProject),
    InsertFeedback(NewFeedback),
    UpdateFeedbackStatus { id: String, status: FeedbackStatus },
    SignOut,
}

impl Effect {
    pub(crate) fn fetch(ticket: Ticket, request: FetchRequest) -> Self {
        Self::Fetch { ticket, request }
    }

    pub async fn perform<D, A>(self, db: D, auth: A) -> Action
    where
        D: DataGateway,
        A: IdentityProvider,
    {
        match self {
            Self::Fetch { ticket, request } => {
                let result = match request {
                    FetchRequest::Projects => db.list_projects().await.map(Fetched::Projects),
                    FetchRequest::ProjectChoices => {
                        db.list_project_choices().await.map(Fetched::ProjectChoices)
                    }
                    FetchRequest::Feedback(query) => {
                        db.list_feedback(&query).await.map(Fetched::Feedback)
                    }
                    FetchRequest::CountFeedback(status) => {
                        db.count_feedback(status).await.map(Fetched::Count)
                    }
                };
                Action::Fetched {
                    ticket,
                    result: result.map_err(Failure::from),
                }
            }
            Self::InsertProject(project) => {
                Action::ProjectInserted(db.insert_project(project).await.map_err(Failure::from))
            }
            Self::InsertFeedback(feedback) => {
                Action::FeedbackInserted(db.insert_feedback(feedback).await.map_err(Failure::from))
            }
            Self::UpdateFeedbackStatus { id, status } => {
                let patch = FeedbackPatch {
                    status: Some(status),
                    priority: None,
                };
                let result = db.update_feedback(&id, patch).await.map_err(Failure::from);
                Action::FeedbackStatusUpdated { id, result }
            }
            Self::SignOut => Action::SignedOut(auth.sign_out().await.map_err(Failure::from)),
        }
    }
}
