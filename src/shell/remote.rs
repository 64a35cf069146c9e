use std::fmt;

use crate::core::{auth::AuthError, db::GatewayError};

/// Identifies one mounted panel or modal. Never reused within a shell.
pub type PanelId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKey {
    RecentFeedback,
    TotalCount,
    OpenCount,
    ResolvedCount,
    Projects,
    FeedbackList,
    ProjectChoices,
}

/// Addresses a fetch result back to the slot that asked for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub panel: PanelId,
    pub slot: SlotKey,
    pub seq: u64,
}

/// Error text shown inline; the one failure type for fetches and mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure(String);

impl Failure {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<GatewayError> for Failure {
    fn from(err: GatewayError) -> Self {
        Self(err.to_string())
    }
}

impl From<AuthError> for Failure {
    fn from(err: AuthError) -> Self {
        Self(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Remote<T> {
    Loading,
    Failed(Failure),
    Loaded(T),
}

impl<T> Remote<T> {
    pub fn map<U>(&self, f: impl FnOnce(&T) -> U) -> Remote<U> {
        match self {
            Self::Loading => Remote::Loading,
            Self::Failed(failure) => Remote::Failed(failure.clone()),
            Self::Loaded(value) => Remote::Loaded(f(value)),
        }
    }
}

/// What a list slot should render right now.
#[derive(Debug, PartialEq)]
pub enum ListView<'a, T> {
    Loading,
    Failed(&'a str),
    Empty,
    Rows(&'a [T]),
}

/// One fetched resource inside a panel.
#[derive(Debug, Clone)]
pub struct Slot<T> {
    state: Remote<T>,
    seq: u64,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self {
            state: Remote::Loading,
            seq: 0,
        }
    }
}

impl<T> Slot<T> {
    pub fn state(&self) -> &Remote<T> {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, Remote::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match &self.state {
            Remote::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&Failure> {
        match &self.state {
            Remote::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    /// Starts a new request; any result for an older ticket is ignored from now on.
    pub(crate) fn begin(&mut self, panel: PanelId, slot: SlotKey) -> Ticket {
        self.seq += 1;
        self.state = Remote::Loading;
        Ticket {
            panel,
            slot,
            seq: self.seq,
        }
    }

    /// Stores a result if it answers the latest request. Returns whether it was applied.
    pub(crate) fn settle(&mut self, ticket: &Ticket, result: Result<T, Failure>) -> bool {
        if ticket.seq != self.seq {
            tracing::debug!(slot = ?ticket.slot, seq = ticket.seq, latest = self.seq, "dropping superseded result");
            return false;
        }
        self.state = match result {
            Ok(value) => Remote::Loaded(value),
            Err(failure) => {
                tracing::error!(slot = ?ticket.slot, error = %failure, "fetch failed");
                Remote::Failed(failure)
            }
        };
        true
    }
}

impl<T> Slot<Vec<T>> {
    pub fn rows(&self) -> ListView<'_, T> {
        match &self.state {
            Remote::Loading => ListView::Loading,
            Remote::Failed(failure) => ListView::Failed(failure.message()),
            Remote::Loaded(rows) if rows.is_empty() => ListView::Empty,
            Remote::Loaded(rows) => ListView::Rows(rows),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_slot_is_loading_without_rows() {
        let slot: Slot<Vec<u32>> = Slot::default();
        assert!(slot.is_loading());
        assert_eq!(slot.rows(), ListView::Loading);
    }

    #[test]
    fn settle_renders_error_empty_and_rows() {
        let mut slot: Slot<Vec<u32>> = Slot::default();

        let ticket = slot.begin(1, SlotKey::FeedbackList);
        assert!(slot.settle(&ticket, Err(Failure::new("offline"))));
        assert_eq!(slot.rows(), ListView::Failed("offline"));

        let ticket = slot.begin(1, SlotKey::FeedbackList);
        assert_eq!(slot.rows(), ListView::Loading);
        assert!(slot.settle(&ticket, Ok(vec![])));
        assert_eq!(slot.rows(), ListView::Empty);

        let ticket = slot.begin(1, SlotKey::FeedbackList);
        assert!(slot.settle(&ticket, Ok(vec![7, 8])));
        assert_eq!(slot.rows(), ListView::Rows(&[7, 8]));
    }

    #[test]
    fn superseded_results_are_dropped() {
        let mut slot: Slot<u64> = Slot::default();
        let old = slot.begin(3, SlotKey::TotalCount);
        let new = slot.begin(3, SlotKey::TotalCount);

        assert!(slot.settle(&new, Ok(2)));
        assert!(!slot.settle(&old, Ok(1)));
        assert_eq!(slot.value(), Some(&2));
    }
}
