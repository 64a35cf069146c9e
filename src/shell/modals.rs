use crate::{
    core::{
        auth::User,
        db::{Feedback, FeedbackKind, FeedbackStatus, NewFeedback, NewProject, ProjectChoice},
    },
    shell::{
        effect::{Effect, FetchRequest, Fetched, payload},
        refresh::{RefreshBus, RefreshCursor, Resource},
        remote::{Failure, PanelId, Slot, SlotKey, Ticket},
    },
};

pub const NOT_SIGNED_IN: &str = "You must be signed in to do that.";
pub const FEEDBACK_SUBMITTED: &str = "Feedback submitted successfully! Add more below.";

/// Read-only view of one feedback item plus a status selector.
#[derive(Debug, Clone)]
pub struct FeedbackDetail {
    feedback: Feedback,
    selected: Option<FeedbackStatus>,
    pending: bool,
    error: Option<Failure>,
}

impl FeedbackDetail {
    pub fn new(feedback: Feedback) -> Self {
        Self {
            selected: Some(feedback.status),
            feedback,
            pending: false,
            error: None,
        }
    }

    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    pub fn selected(&self) -> Option<FeedbackStatus> {
        self.selected
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn error(&self) -> Option<&Failure> {
        self.error.as_ref()
    }

    pub(crate) fn select(&mut self, status: FeedbackStatus) {
        self.selected = Some(status);
    }

    /// The update to issue, if a status is selected and nothing is in flight.
    pub(crate) fn commit(&mut self) -> Option<Effect> {
        if self.pending {
            return None;
        }
        let status = self.selected?;
        self.pending = true;
        self.error = None;
        Some(Effect::UpdateFeedbackStatus {
            id: self.feedback.id.clone(),
            status,
        })
    }

    pub(crate) fn fail(&mut self, failure: Failure) {
        self.pending = false;
        self.error = Some(failure);
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewProjectForm {
    pub name: String,
    pub domain: String,
    pending: bool,
    error: Option<Failure>,
}

impl NewProjectForm {
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn error(&self) -> Option<&Failure> {
        self.error.as_ref()
    }

    pub fn can_submit(&self) -> bool {
        !self.pending && !self.name.trim().is_empty()
    }

    /// Builds the insert; a blank domain is stored as absent.
    pub(crate) fn submit(&mut self, identity: Option<&User>) -> Result<Effect, Failure> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(Failure::new("Project name is required."));
        }
        let Some(owner) = identity else {
            return Err(Failure::new(NOT_SIGNED_IN));
        };
        let domain = self.domain.trim();
        let project = NewProject {
            name: name.to_string(),
            domain: (!domain.is_empty()).then(|| domain.to_string()),
            owner_id: Some(owner.id),
        };
        self.pending = true;
        self.error = None;
        Ok(Effect::InsertProject(project))
    }

    pub(crate) fn fail(&mut self, failure: Failure) {
        self.pending = false;
        self.error = Some(failure);
    }
}

/// Submission form. Stays open after a successful submit.
#[derive(Debug, Clone)]
pub struct NewFeedbackForm {
    id: PanelId,
    choices: Slot<Vec<ProjectChoice>>,
    cursor: RefreshCursor,
    project: Option<i64>,
    pub kind: FeedbackKind,
    pub title: String,
    pub description: String,
    pub email: String,
    pending: bool,
    error: Option<Failure>,
    message: Option<String>,
}

impl NewFeedbackForm {
    pub(crate) fn mount(id: PanelId, bus: &RefreshBus, identity: Option<&User>) -> (Self, Vec<Effect>) {
        let mut form = Self {
            id,
            choices: Slot::default(),
            cursor: bus.subscribe(Resource::Projects),
            project: None,
            kind: FeedbackKind::Bug,
            title: String::new(),
            description: String::new(),
            email: identity.map(|user| user.email.clone()).unwrap_or_default(),
            pending: false,
            error: None,
            message: None,
        };
        let effects = form.fetch();
        (form, effects)
    }

    pub fn id(&self) -> PanelId {
        self.id
    }

    pub fn choices(&self) -> &Slot<Vec<ProjectChoice>> {
        &self.choices
    }

    pub fn selected_project(&self) -> Option<&ProjectChoice> {
        let id = self.project?;
        self.choices.value()?.iter().find(|choice| choice.id == id)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn error(&self) -> Option<&Failure> {
        self.error.as_ref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    fn fetch(&mut self) -> Vec<Effect> {
        let ticket = self.choices.begin(self.id, SlotKey::ProjectChoices);
        vec![Effect::fetch(ticket, FetchRequest::ProjectChoices)]
    }

    pub(crate) fn poll_refresh(&mut self, bus: &RefreshBus) -> Vec<Effect> {
        if self.cursor.take(bus) {
            self.fetch()
        } else {
            Vec::new()
        }
    }

    pub(crate) fn apply(&mut self, ticket: &Ticket, result: Result<Fetched, Failure>) -> bool {
        if ticket.slot != SlotKey::ProjectChoices || !self.choices.settle(ticket, payload(result)) {
            return false;
        }
        let choices = self.choices.value().map(Vec::as_slice).unwrap_or_default();
        let still_listed = self
            .project
            .is_some_and(|id| choices.iter().any(|choice| choice.id == id));
        if !still_listed {
            self.project = choices.first().map(|choice| choice.id);
        }
        true
    }

    pub(crate) fn select_project(&mut self, id: i64) {
        self.project = Some(id);
    }

    pub(crate) fn edited(&mut self) {
        self.message = None;
    }

    pub(crate) fn submit(&mut self, identity: Option<&User>) -> Result<Effect, Failure> {
        if self.pending {
            return Err(Failure::new("A submission is already in progress."));
        }
        let Some(user) = identity else {
            return Err(Failure::new(NOT_SIGNED_IN));
        };
        let Some(project) = self.selected_project() else {
            return Err(Failure::new("Please select a project."));
        };
        let (title, description, email) =
            (self.title.trim(), self.description.trim(), self.email.trim());
        if title.is_empty() || description.is_empty() || email.is_empty() {
            return Err(Failure::new("Title, description and email are required."));
        }
        let feedback = NewFeedback {
            user_id: user.id,
            project_id: project.id,
            title: title.to_string(),
            description: description.to_string(),
            kind: self.kind,
            user_email: email.to_string(),
        };
        self.pending = true;
        self.error = None;
        self.message = None;
        Ok(Effect::InsertFeedback(feedback))
    }

    pub(crate) fn succeed(&mut self) {
        self.pending = false;
        self.title.clear();
        self.description.clear();
        self.message = Some(FEEDBACK_SUBMITTED.to_string());
    }

    pub(crate) fn fail(&mut self, failure: Failure) {
        self.pending = false;
        self.error = Some(failure);
    }

    pub(crate) fn reject(&mut self, failure: Failure) {
        self.message = None;
        self.error = Some(failure);
    }
}
