//! GUI-independent state of the signed-in dashboard.
//!
//! [`Shell::update`] folds an [`Action`] into the state and returns the
//! [`Effect`]s the host must run; each effect resolves to one more action.
//! The GUI and the tests drive the same loop.

pub mod effect;
pub mod gate;
pub mod modals;
pub mod panels;
pub mod refresh;
pub mod remote;

pub use effect::{Effect, FetchRequest, Fetched};
pub use gate::{AuthMode, Command, GateAction, GateState, LoginAction, LoginForm, SessionGate};
pub use modals::{FeedbackDetail, NewFeedbackForm, NewProjectForm};
pub use panels::{DashboardPanel, RECENT_LIMIT, FeedbackFilter, FeedbackListPanel, Panel, ProjectsListPanel};
pub use refresh::{RefreshBus, RefreshCursor, Resource};
pub use remote::{Failure, ListView, PanelId, Remote, Slot, SlotKey, Ticket};

use crate::core::{
    auth::User,
    db::{Feedback, FeedbackKind, FeedbackStatus, Project},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Dashboard,
    Feedback,
    Projects,
    Settings,
}

impl View {
    pub const ALL: [View; 4] = [View::Dashboard, View::Feedback, View::Projects, View::Settings];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Feedback => "feedback",
            Self::Projects => "projects",
            Self::Settings => "settings",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Feedback => "Feedback",
            Self::Projects => "Projects",
            Self::Settings => "Settings",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    SelectView(View),

    OpenFeedback(Feedback),
    CloseFeedback,
    DetailStatusSelected(FeedbackStatus),
    UpdateFeedbackStatus,

    OpenNewProject,
    CloseNewProject,
    ProjectNameChanged(String),
    ProjectDomainChanged(String),
    SubmitNewProject,

    OpenNewFeedback,
    CloseNewFeedback,
    FeedbackProjectSelected(i64),
    FeedbackKindSelected(FeedbackKind),
    FeedbackTitleChanged(String),
    FeedbackDescriptionChanged(String),
    FeedbackEmailChanged(String),
    SubmitFeedback,

    StatusFilterChanged(Option<FeedbackStatus>),
    SearchChanged(String),

    SignOut,

    Fetched {
        ticket: Ticket,
        result: Result<Fetched, Failure>,
    },
    ProjectInserted(Result<Project, Failure>),
    FeedbackInserted(Result<Feedback, Failure>),
    FeedbackStatusUpdated {
        id: String,
        result: Result<Feedback, Failure>,
    },
    SignedOut(Result<(), Failure>),
}

/// View router and refresh coordinator for one signed-in identity.
#[derive(Debug, Clone)]
pub struct Shell {
    identity: Option<User>,
    panel: Panel,
    next_id: PanelId,
    bus: RefreshBus,
    detail: Option<FeedbackDetail>,
    new_project: Option<NewProjectForm>,
    new_feedback: Option<NewFeedbackForm>,
    signing_out: bool,
    sign_out_error: Option<Failure>,
}

impl Shell {
    /// Builds the shell on the dashboard and returns its initial fetches.
    pub fn new(identity: Option<User>) -> (Self, Vec<Effect>) {
        Self::starting_at(identity, 1)
    }

    /// Like [`Shell::new`], numbering panels from `first_panel`.
    ///
    /// A host that replaces one shell with another passes the retired shell's
    /// [`Shell::next_panel_id`], so results addressed to the old panels never
    /// match a panel of the new one.
    pub fn starting_at(identity: Option<User>, first_panel: PanelId) -> (Self, Vec<Effect>) {
        let bus = RefreshBus::new();
        let (panel, effects) = Panel::mount(View::Dashboard, first_panel, &bus);
        let shell = Self {
            identity,
            panel,
            next_id: first_panel + 1,
            bus,
            detail: None,
            new_project: None,
            new_feedback: None,
            signing_out: false,
            sign_out_error: None,
        };
        (shell, effects)
    }

    pub fn identity(&self) -> Option<&User> {
        self.identity.as_ref()
    }

    pub fn view(&self) -> View {
        self.panel.view()
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn bus(&self) -> &RefreshBus {
        &self.bus
    }

    pub fn detail(&self) -> Option<&FeedbackDetail> {
        self.detail.as_ref()
    }

    pub fn new_project(&self) -> Option<&NewProjectForm> {
        self.new_project.as_ref()
    }

    pub fn new_feedback(&self) -> Option<&NewFeedbackForm> {
        self.new_feedback.as_ref()
    }

    pub fn is_signing_out(&self) -> bool {
        self.signing_out
    }

    pub fn sign_out_error(&self) -> Option<&Failure> {
        self.sign_out_error.as_ref()
    }

    /// The id the next mounted panel or form would get.
    pub fn next_panel_id(&self) -> PanelId {
        self.next_id
    }

    fn allocate_id(&mut self) -> PanelId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn update(&mut self, action: Action) -> Vec<Effect> {
        let mut effects = self.handle(action);
        effects.extend(self.poll_refresh());
        effects
    }

    /// Lets every mounted consumer observe pending invalidations.
    fn poll_refresh(&mut self) -> Vec<Effect> {
        let mut effects = self.panel.poll_refresh(&self.bus);
        if let Some(form) = &mut self.new_feedback {
            effects.extend(form.poll_refresh(&self.bus));
        }
        effects
    }

    fn handle(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::SelectView(view) => {
                if view == self.view() {
                    return Vec::new();
                }
                let id = self.allocate_id();
                let (panel, effects) = Panel::mount(view, id, &self.bus);
                self.panel = panel;
                effects
            }

            Action::OpenFeedback(feedback) => {
                self.detail = Some(FeedbackDetail::new(feedback));
                Vec::new()
            }
            Action::CloseFeedback => {
                self.detail = None;
                Vec::new()
            }
            Action::DetailStatusSelected(status) => {
                if let Some(detail) = &mut self.detail {
                    detail.select(status);
                }
                Vec::new()
            }
            Action::UpdateFeedbackStatus => self
                .detail
                .as_mut()
                .and_then(FeedbackDetail::commit)
                .into_iter()
                .collect(),

            Action::OpenNewProject => {
                self.new_project.get_or_insert_with(NewProjectForm::default);
                Vec::new()
            }
            Action::CloseNewProject => {
                self.new_project = None;
                Vec::new()
            }
            Action::ProjectNameChanged(name) => {
                if let Some(form) = &mut self.new_project {
                    form.name = name;
                }
                Vec::new()
            }
            Action::ProjectDomainChanged(domain) => {
                if let Some(form) = &mut self.new_project {
                    form.domain = domain;
                }
                Vec::new()
            }
            Action::SubmitNewProject => {
                let Some(form) = &mut self.new_project else {
                    return Vec::new();
                };
                if form.is_pending() {
                    return Vec::new();
                }
                match form.submit(self.identity.as_ref()) {
                    Ok(effect) => vec![effect],
                    Err(failure) => {
                        tracing::warn!(error = %failure, "project not submitted");
                        form.fail(failure);
                        Vec::new()
                    }
                }
            }

            Action::OpenNewFeedback => {
                if self.new_feedback.is_some() {
                    return Vec::new();
                }
                let id = self.allocate_id();
                let (form, effects) = NewFeedbackForm::mount(id, &self.bus, self.identity.as_ref());
                self.new_feedback = Some(form);
                effects
            }
            Action::CloseNewFeedback => {
                self.new_feedback = None;
                Vec::new()
            }
            Action::FeedbackProjectSelected(id) => {
                self.edit_feedback_form(|form| form.select_project(id))
            }
            Action::FeedbackKindSelected(kind) => self.edit_feedback_form(|form| form.kind = kind),
            Action::FeedbackTitleChanged(title) => {
                self.edit_feedback_form(|form| form.title = title)
            }
            Action::FeedbackDescriptionChanged(description) => {
                self.edit_feedback_form(|form| form.description = description)
            }
            Action::FeedbackEmailChanged(email) => {
                self.edit_feedback_form(|form| form.email = email)
            }
            Action::SubmitFeedback => {
                let Some(form) = &mut self.new_feedback else {
                    return Vec::new();
                };
                match form.submit(self.identity.as_ref()) {
                    Ok(effect) => vec![effect],
                    Err(failure) => {
                        tracing::warn!(error = %failure, "feedback not submitted");
                        form.reject(failure);
                        Vec::new()
                    }
                }
            }

            Action::StatusFilterChanged(status) => match &mut self.panel {
                Panel::Feedback(panel) => panel.set_status_filter(status),
                _ => Vec::new(),
            },
            Action::SearchChanged(search) => match &mut self.panel {
                Panel::Feedback(panel) => panel.set_search(search),
                _ => Vec::new(),
            },

            Action::SignOut => {
                if self.signing_out {
                    return Vec::new();
                }
                self.signing_out = true;
                self.sign_out_error = None;
                vec![Effect::SignOut]
            }

            Action::Fetched { ticket, result } => {
                self.route_fetched(ticket, result);
                Vec::new()
            }
            Action::ProjectInserted(result) => {
                match result {
                    Ok(project) => {
                        tracing::info!(project = project.id, name = %project.name, "project created");
                        self.new_project = None;
                        self.bus.invalidate(Resource::Projects);
                    }
                    Err(failure) => {
                        tracing::error!(error = %failure, "failed to create project");
                        if let Some(form) = &mut self.new_project {
                            form.fail(failure);
                        }
                    }
                }
                Vec::new()
            }
            Action::FeedbackInserted(result) => {
                match result {
                    Ok(feedback) => {
                        tracing::info!(feedback = %feedback.id, project = feedback.project_id, "feedback submitted");
                        self.bus.invalidate(Resource::Feedback);
                        if let Some(form) = &mut self.new_feedback {
                            form.succeed();
                        }
                    }
                    Err(failure) => {
                        tracing::error!(error = %failure, "failed to submit feedback");
                        if let Some(form) = &mut self.new_feedback {
                            form.fail(failure);
                        }
                    }
                }
                Vec::new()
            }
            Action::FeedbackStatusUpdated { id, result } => {
                let detail = self.detail.as_mut().filter(|detail| detail.feedback().id == id);
                match result {
                    Ok(feedback) => {
                        tracing::info!(feedback = %id, status = feedback.status.as_str(), "status updated");
                        self.bus.invalidate(Resource::Feedback);
                        if detail.is_some() {
                            self.detail = None;
                        }
                    }
                    Err(failure) => {
                        tracing::error!(feedback = %id, error = %failure, "failed to update status");
                        if let Some(detail) = detail {
                            detail.fail(failure);
                        }
                    }
                }
                Vec::new()
            }
            Action::SignedOut(result) => {
                self.signing_out = false;
                if let Err(failure) = result {
                    tracing::error!(error = %failure, "sign-out failed");
                    self.sign_out_error = Some(failure);
                }
                Vec::new()
            }
        }
    }

    fn edit_feedback_form(&mut self, edit: impl FnOnce(&mut NewFeedbackForm)) -> Vec<Effect> {
        if let Some(form) = &mut self.new_feedback {
            edit(form);
            form.edited();
        }
        Vec::new()
    }

    fn route_fetched(&mut self, ticket: Ticket, result: Result<Fetched, Failure>) {
        if ticket.panel == self.panel.id() {
            self.panel.apply(&ticket, result);
            return;
        }
        if let Some(form) = self.new_feedback.as_mut().filter(|form| form.id() == ticket.panel) {
            form.apply(&ticket, result);
            return;
        }
        tracing::debug!(panel = ticket.panel, slot = ?ticket.slot, "dropping result for unmounted panel");
    }
}
