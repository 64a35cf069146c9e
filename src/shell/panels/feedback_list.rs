use crate::{
    core::db::{Feedback, FeedbackQuery, FeedbackStatus},
    shell::{
        effect::{Effect, FetchRequest, Fetched, payload},
        refresh::{RefreshBus, RefreshCursor, Resource},
        remote::{Failure, PanelId, Slot, SlotKey, Ticket},
    },
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackFilter {
    pub status: Option<FeedbackStatus>,
    pub search: String,
}

impl FeedbackFilter {
    pub fn query(&self) -> FeedbackQuery {
        let search = self.search.trim();
        FeedbackQuery {
            status: self.status,
            search: (!search.is_empty()).then(|| search.to_string()),
            ..FeedbackQuery::default()
        }
    }
}

/// Every feedback record, newest first, narrowed by the filter bar.
#[derive(Debug, Clone)]
pub struct FeedbackListPanel {
    id: PanelId,
    list: Slot<Vec<Feedback>>,
    filter: FeedbackFilter,
    cursor: RefreshCursor,
}

impl FeedbackListPanel {
    pub(crate) fn mount(id: PanelId, bus: &RefreshBus) -> (Self, Vec<Effect>) {
        let mut panel = Self {
            id,
            list: Slot::default(),
            filter: FeedbackFilter::default(),
            cursor: bus.subscribe(Resource::Feedback),
        };
        let effects = panel.fetch();
        (panel, effects)
    }

    pub fn id(&self) -> PanelId {
        self.id
    }

    pub fn list(&self) -> &Slot<Vec<Feedback>> {
        &self.list
    }

    pub fn filter(&self) -> &FeedbackFilter {
        &self.filter
    }

    fn fetch(&mut self) -> Vec<Effect> {
        let ticket = self.list.begin(self.id, SlotKey::FeedbackList);
        vec![Effect::fetch(ticket, FetchRequest::Feedback(self.filter.query()))]
    }

    pub(crate) fn set_status_filter(&mut self, status: Option<FeedbackStatus>) -> Vec<Effect> {
        if self.filter.status == status {
            return Vec::new();
        }
        self.filter.status = status;
        self.fetch()
    }

    pub(crate) fn set_search(&mut self, search: String) -> Vec<Effect> {
        let unchanged = self.filter.search.trim() == search.trim();
        self.filter.search = search;
        if unchanged { Vec::new() } else { self.fetch() }
    }

    pub(crate) fn poll_refresh(&mut self, bus: &RefreshBus) -> Vec<Effect> {
        if self.cursor.take(bus) {
            self.fetch()
        } else {
            Vec::new()
        }
    }

    pub(crate) fn apply(&mut self, ticket: &Ticket, result: Result<Fetched, Failure>) -> bool {
        match ticket.slot {
            SlotKey::FeedbackList => self.list.settle(ticket, payload(result)),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_search_is_not_sent() {
        let filter = FeedbackFilter {
            status: Some(FeedbackStatus::Open),
            search: "   ".into(),
        };
        let query = filter.query();
        assert_eq!(query.status, Some(FeedbackStatus::Open));
        assert_eq!(query.search, None);
        assert_eq!(query.limit, None);
    }

    #[test]
    fn filter_changes_refetch() {
        let bus = RefreshBus::new();
        let (mut panel, effects) = FeedbackListPanel::mount(4, &bus);
        assert_eq!(effects.len(), 1);

        assert_eq!(panel.set_status_filter(Some(FeedbackStatus::Resolved)).len(), 1);
        assert!(panel.set_status_filter(Some(FeedbackStatus::Resolved)).is_empty());
        assert_eq!(panel.set_search("crash".into()).len(), 1);
        assert!(panel.set_search("crash ".into()).is_empty());
        assert!(panel.list().is_loading());
    }
}
