use crate::{
    core::db::Project,
    shell::{
        effect::{Effect, FetchRequest, Fetched, payload},
        refresh::{RefreshBus, RefreshCursor, Resource},
        remote::{Failure, PanelId, Slot, SlotKey, Ticket},
    },
};

/// Project cards with their feedback counts.
#[derive(Debug, Clone)]
pub struct ProjectsListPanel {
    id: PanelId,
    projects: Slot<Vec<Project>>,
    projects_cursor: RefreshCursor,
    feedback_cursor: RefreshCursor,
}

impl ProjectsListPanel {
    pub(crate) fn mount(id: PanelId, bus: &RefreshBus) -> (Self, Vec<Effect>) {
        let mut panel = Self {
            id,
            projects: Slot::default(),
            projects_cursor: bus.subscribe(Resource::Projects),
            feedback_cursor: bus.subscribe(Resource::Feedback),
        };
        let effects = panel.fetch();
        (panel, effects)
    }

    pub fn id(&self) -> PanelId {
        self.id
    }

    pub fn projects(&self) -> &Slot<Vec<Project>> {
        &self.projects
    }

    fn fetch(&mut self) -> Vec<Effect> {
        let ticket = self.projects.begin(self.id, SlotKey::Projects);
        vec![Effect::fetch(ticket, FetchRequest::Projects)]
    }

    /// Re-fetches on either resource; the counts come from the feedback table.
    pub(crate) fn poll_refresh(&mut self, bus: &RefreshBus) -> Vec<Effect> {
        let projects_changed = self.projects_cursor.take(bus);
        let feedback_changed = self.feedback_cursor.take(bus);
        if projects_changed || feedback_changed {
            self.fetch()
        } else {
            Vec::new()
        }
    }

    pub(crate) fn apply(&mut self, ticket: &Ticket, result: Result<Fetched, Failure>) -> bool {
        match ticket.slot {
            SlotKey::Projects => self.projects.settle(ticket, payload(result)),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projects_fetches(effects: &[Effect]) -> usize {
        effects
            .iter()
            .filter(|effect| {
                matches!(effect, Effect::Fetch { request: FetchRequest::Projects, .. })
            })
            .count()
    }

    #[test]
    fn refetches_on_feedback_changes() {
        let mut bus = RefreshBus::new();
        let (mut panel, _) = ProjectsListPanel::mount(1, &bus);
        assert!(panel.poll_refresh(&bus).is_empty());

        bus.invalidate(Resource::Feedback);
        assert_eq!(projects_fetches(&panel.poll_refresh(&bus)), 1);

        bus.invalidate(Resource::Feedback);
        bus.invalidate(Resource::Projects);
        assert_eq!(projects_fetches(&panel.poll_refresh(&bus)), 1);
        assert!(panel.poll_refresh(&bus).is_empty());
    }
}
