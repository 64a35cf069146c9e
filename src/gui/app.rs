use std::path::PathBuf;

use iced::{
    Element, Length, Task,
    widget::{column, container, text},
};

use crate::{
    core::{
        auth::{IdentityProvider, SessionSubscription},
        db::FeedbackDb,
    },
    gui::{
        AppState, Message,
        screens::{self, Screen, ScreenMessage},
        widgets::error_text,
    },
    shell::{GateAction, SessionGate},
};

pub enum FeedboardApp {
    Loading,
    Failed(String),
    Ready { state: AppState, gate: SessionGate },
}

fn update_gate(gate: &mut SessionGate, action: GateAction, state: &AppState) -> Task<Message> {
    Screen::update(gate, action, state).map(Message::Gate)
}

/// Waits for the next session transition and hands the feed back for re-arming.
fn watch_sessions(mut feed: SessionSubscription) -> Task<Message> {
    Task::perform(
        async move {
            let change = feed.changed().await;
            (change, feed)
        },
        |(change, feed)| Message::SessionFeed { change, feed },
    )
}

impl FeedboardApp {
    pub fn boot(database: PathBuf) -> (Self, Task<Message>) {
        (
            Self::Loading,
            Task::perform(
                async move {
                    FeedbackDb::open(&database)
                        .await
                        .map(AppState::new)
                        .map_err(|e| format!("Failed to open {}: {}", database.display(), e))
                },
                Message::StoreOpened,
            ),
        )
    }

    pub fn title(&self) -> String {
        match self {
            Self::Ready { gate, .. } => screens::title(gate.shell().map(|shell| shell.view())),
            _ => screens::title(None),
        }
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match (self, message) {
            (app @ Self::Loading, Message::StoreOpened(Ok(state))) => {
                tracing::info!(path = %state.db.path().display(), "store ready");
                let feed = state.auth.on_session_change();
                let (gate, commands) = SessionGate::new();
                let restore = state.perform(commands);
                *app = Self::Ready { state, gate };
                Task::batch([
                    restore.map(|action| Message::Gate(ScreenMessage::ScreenMessage(action))),
                    watch_sessions(feed),
                ])
            }
            (app @ Self::Loading, Message::StoreOpened(Err(message))) => {
                tracing::error!(error = %message, "could not open store");
                *app = Self::Failed(message);
                Task::none()
            }
            (Self::Ready { state, gate }, Message::Gate(ScreenMessage::ScreenMessage(action))) => {
                update_gate(gate, action, state)
            }
            (Self::Ready { state, gate }, Message::SessionFeed { change, feed }) => match change {
                Some(session) => Task::batch([
                    update_gate(gate, GateAction::SessionChanged(session), state),
                    watch_sessions(feed),
                ]),
                None => {
                    tracing::warn!("session feed closed");
                    Task::none()
                }
            },
            (_, message) => {
                tracing::debug!(?message, "message ignored in current state");
                Task::none()
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        match self {
            Self::Loading => container(text("Loading..."))
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into(),
            Self::Failed(message) => container(
                column![text("Feedboard could not start").size(24), error_text(message)].spacing(12),
            )
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into(),
            Self::Ready { gate, .. } => gate.view().map(Message::Gate),
        }
    }
}
