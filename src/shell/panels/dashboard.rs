use crate::{
    core::db::{Feedback, FeedbackQuery, FeedbackStatus, Project},
    shell::{
        effect::{Effect, FetchRequest, Fetched, payload},
        refresh::{RefreshBus, RefreshCursor, Resource},
        remote::{Failure, PanelId, Remote, Slot, SlotKey, Ticket},
    },
};

pub const RECENT_LIMIT: u32 = 3;

/// One tile on the overview. Each tile settles on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct StatCard {
    pub label: &'static str,
    pub value: Remote<u64>,
}

/// Overview: four counters, the latest feedback and the project cards.
#[derive(Debug, Clone)]
pub struct DashboardPanel {
    id: PanelId,
    recent: Slot<Vec<Feedback>>,
    total: Slot<u64>,
    open: Slot<u64>,
    resolved: Slot<u64>,
    projects: Slot<Vec<Project>>,
    feedback_cursor: RefreshCursor,
    projects_cursor: RefreshCursor,
}

impl DashboardPanel {
    pub(crate) fn mount(id: PanelId, bus: &RefreshBus) -> (Self, Vec<Effect>) {
        let mut panel = Self {
            id,
            recent: Slot::default(),
            total: Slot::default(),
            open: Slot::default(),
            resolved: Slot::default(),
            projects: Slot::default(),
            feedback_cursor: bus.subscribe(Resource::Feedback),
            projects_cursor: bus.subscribe(Resource::Projects),
        };
        let mut effects = panel.fetch_feedback();
        effects.extend(panel.fetch_projects());
        (panel, effects)
    }

    pub fn id(&self) -> PanelId {
        self.id
    }

    fn fetch_feedback(&mut self) -> Vec<Effect> {
        let id = self.id;
        vec![
            Effect::fetch(
                self.recent.begin(id, SlotKey::RecentFeedback),
                FetchRequest::Feedback(FeedbackQuery::recent(RECENT_LIMIT)),
            ),
            Effect::fetch(
                self.total.begin(id, SlotKey::TotalCount),
                FetchRequest::CountFeedback(None),
            ),
            Effect::fetch(
                self.open.begin(id, SlotKey::OpenCount),
                FetchRequest::CountFeedback(Some(FeedbackStatus::Open)),
            ),
            Effect::fetch(
                self.resolved.begin(id, SlotKey::ResolvedCount),
                FetchRequest::CountFeedback(Some(FeedbackStatus::Resolved)),
            ),
        ]
    }

    fn fetch_projects(&mut self) -> Vec<Effect> {
        vec![Effect::fetch(
            self.projects.begin(self.id, SlotKey::Projects),
            FetchRequest::Projects,
        )]
    }

    pub(crate) fn poll_refresh(&mut self, bus: &RefreshBus) -> Vec<Effect> {
        let feedback_changed = self.feedback_cursor.take(bus);
        let projects_changed = self.projects_cursor.take(bus);
        let mut effects = Vec::new();
        if feedback_changed {
            effects.extend(self.fetch_feedback());
        }
        // Project cards carry feedback counts.
        if feedback_changed || projects_changed {
            effects.extend(self.fetch_projects());
        }
        effects
    }

    pub(crate) fn apply(&mut self, ticket: &Ticket, result: Result<Fetched, Failure>) -> bool {
        match ticket.slot {
            SlotKey::RecentFeedback => self.recent.settle(ticket, payload(result)),
            SlotKey::TotalCount => self.total.settle(ticket, payload(result)),
            SlotKey::OpenCount => self.open.settle(ticket, payload(result)),
            SlotKey::ResolvedCount => self.resolved.settle(ticket, payload(result)),
            SlotKey::Projects => self.projects.settle(ticket, payload(result)),
            _ => false,
        }
    }

    pub fn recent(&self) -> &Slot<Vec<Feedback>> {
        &self.recent
    }

    pub fn projects(&self) -> &Slot<Vec<Project>> {
        &self.projects
    }

    pub fn stat_cards(&self) -> [StatCard; 4] {
        [
            StatCard {
                label: "Total Feedback",
                value: self.total.state().clone(),
            },
            StatCard {
                label: "Open Issues",
                value: self.open.state().clone(),
            },
            StatCard {
                label: "Resolved",
                value: self.resolved.state().clone(),
            },
            StatCard {
                label: "Active Projects",
                value: self.projects.state().map(|projects| projects.len() as u64),
            },
        ]
    }

    /// Project name for a feedback row, when the project list has it.
    pub fn project_name(&self, project_id: i64) -> Option<&str> {
        self.projects
            .value()?
            .iter()
            .find(|project| project.id == project_id)
            .map(|project| project.name.as_str())
    }
}
