pub mod dashboard;
pub mod feedback;
pub mod login;
pub mod modals;
pub mod projects;
pub mod settings;

use std::convert::Infallible;

use iced::{
    Element, Length, Task,
    widget::{button, column, container, row, stack, text},
};

use crate::{
    gui::{AppState, widgets::layout},
    shell::{Action, GateAction, GateState, Panel, SessionGate, Shell, View},
};

#[derive(Debug, Clone)]
pub enum ScreenMessage<S: Screen> {
    ScreenMessage(S::Message),
    ParentMessage(S::ParentMessage),
}

pub trait Screen: Sized {
    type Message: std::fmt::Debug;
    type ParentMessage: std::fmt::Debug;
    fn view(&self) -> Element<'_, ScreenMessage<Self>>;
    fn update(&mut self, message: Self::Message, state: &AppState) -> Task<ScreenMessage<Self>>;
}

impl Screen for SessionGate {
    type Message = GateAction;
    type ParentMessage = Infallible;

    fn view(&self) -> Element<'_, ScreenMessage<Self>> {
        let content: Element<'_, GateAction> = match self.state() {
            GateState::Restoring => container(text("Restoring session..."))
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into(),
            GateState::SignedOut(form) => login::view(form).map(GateAction::Login),
            GateState::SignedIn(shell) => shell_view(shell).map(GateAction::Shell),
        };
        content.map(ScreenMessage::ScreenMessage)
    }

    fn update(&mut self, message: Self::Message, state: &AppState) -> Task<ScreenMessage<Self>> {
        let commands = SessionGate::update(self, message);
        state.perform(commands).map(ScreenMessage::ScreenMessage)
    }
}

fn shell_view(shell: &Shell) -> Element<'_, Action> {
    let header = row![
        text(shell.view().title()).size(28).width(Length::Fill),
        button("New Project").on_press(Action::OpenNewProject),
        button("Submit Feedback").on_press(Action::OpenNewFeedback),
    ]
    .spacing(12);

    let body: Element<'_, Action> = match shell.panel() {
        Panel::Dashboard(panel) => dashboard::view(panel),
        Panel::Feedback(panel) => feedback::view(panel),
        Panel::Projects(panel) => projects::view(panel),
        Panel::Settings { .. } => settings::view(shell),
    };

    let footer = text(
        shell
            .identity()
            .map(|user| user.email.clone())
            .unwrap_or_default(),
    )
    .size(12);

    let base = layout(
        shell.view(),
        Action::SelectView,
        footer,
        column![header, body].spacing(20),
    );

    let overlay = if let Some(detail) = shell.detail() {
        Some(modals::feedback_detail(detail))
    } else if let Some(form) = shell.new_project() {
        Some(modals::new_project(form))
    } else {
        shell.new_feedback().map(modals::new_feedback)
    };

    match overlay {
        Some(overlay) => stack![base, overlay].into(),
        None => base,
    }
}

/// Title shown for the active content.
pub fn title(view: Option<View>) -> String {
    match view {
        Some(view) => format!("Feedboard - {}", view.title()),
        None => "Feedboard".to_string(),
    }
}
