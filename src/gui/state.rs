use iced::Task;

use crate::{
    core::{auth::LocalAuth, db::FeedbackDb},
    shell::{Command, GateAction},
};

/// Handles shared by every screen once the store is open.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: FeedbackDb,
    pub auth: LocalAuth,
}

impl AppState {
    pub fn new(db: FeedbackDb) -> Self {
        let auth = LocalAuth::new(&db);
        Self { db, auth }
    }

    /// Runs gate commands concurrently; each completion comes back as an action.
    pub fn perform(&self, commands: Vec<Command>) -> Task<GateAction> {
        Task::batch(commands.into_iter().map(|command| {
            Task::perform(
                command.perform(self.db.clone(), self.auth.clone()),
                std::convert::identity,
            )
        }))
    }
}
