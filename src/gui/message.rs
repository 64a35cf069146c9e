use crate::{
    core::auth::{Session, SessionSubscription},
    gui::{AppState, screens::ScreenMessage},
    shell::SessionGate,
};

#[derive(Debug, Clone)]
pub enum Message {
    StoreOpened(Result<AppState, String>),
    Gate(ScreenMessage<SessionGate>),
    /// One step of the session feed; `change` is `None` once the provider is gone.
    SessionFeed {
        change: Option<Option<Session>>,
        feed: SessionSubscription,
    },
}
