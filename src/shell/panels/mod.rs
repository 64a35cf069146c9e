mod dashboard;
mod feedback_list;
mod projects_list;

pub use dashboard::{DashboardPanel, RECENT_LIMIT, StatCard};
pub use feedback_list::{FeedbackFilter, FeedbackListPanel};
pub use projects_list::ProjectsListPanel;

use crate::shell::{
    View,
    effect::{Effect, Fetched},
    refresh::RefreshBus,
    remote::{Failure, PanelId, Ticket},
};

/// The content panel mounted for the active view.
#[derive(Debug, Clone)]
pub enum Panel {
    Dashboard(DashboardPanel),
    Feedback(FeedbackListPanel),
    Projects(ProjectsListPanel),
    Settings { id: PanelId },
}

impl Panel {
    pub(crate) fn mount(view: View, id: PanelId, bus: &RefreshBus) -> (Self, Vec<Effect>) {
        tracing::debug!(view = view.as_str(), panel = id, "mounting panel");
        match view {
            View::Dashboard => {
                let (panel, effects) = DashboardPanel::mount(id, bus);
                (Self::Dashboard(panel), effects)
            }
            View::Feedback => {
                let (panel, effects) = FeedbackListPanel::mount(id, bus);
                (Self::Feedback(panel), effects)
            }
            View::Projects => {
                let (panel, effects) = ProjectsListPanel::mount(id, bus);
                (Self::Projects(panel), effects)
            }
            View::Settings => (Self::Settings { id }, Vec::new()),
        }
    }

    pub fn id(&self) -> PanelId {
        match self {
            Self::Dashboard(panel) => panel.id(),
            Self::Feedback(panel) => panel.id(),
            Self::Projects(panel) => panel.id(),
            Self::Settings { id } => *id,
        }
    }

    pub fn view(&self) -> View {
        match self {
            Self::Dashboard(_) => View::Dashboard,
            Self::Feedback(_) => View::Feedback,
            Self::Projects(_) => View::Projects,
            Self::Settings { .. } => View::Settings,
        }
    }

    pub(crate) fn poll_refresh(&mut self, bus: &RefreshBus) -> Vec<Effect> {
        match self {
            Self::Dashboard(panel) => panel.poll_refresh(bus),
            Self::Feedback(panel) => panel.poll_refresh(bus),
            Self::Projects(panel) => panel.poll_refresh(bus),
            Self::Settings { .. } => Vec::new(),
        }
    }

    pub(crate) fn apply(&mut self, ticket: &Ticket, result: Result<Fetched, Failure>) -> bool {
        match self {
            Self::Dashboard(panel) => panel.apply(ticket, result),
            Self::Feedback(panel) => panel.apply(ticket, result),
            Self::Projects(panel) => panel.apply(ticket, result),
            Self::Settings { .. } => false,
        }
    }
}
