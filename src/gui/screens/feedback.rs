use std::fmt;

use iced::{
    Alignment::Center,
    Element, Length,
    widget::{button, column, pick_list, row, scrollable, text, text_input},
};

use crate::{
    core::db::{Feedback, FeedbackStatus, format_date},
    gui::widgets::{kind_badge, list_slot, status_badge},
    shell::{Action, FeedbackListPanel},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusChoice {
    All,
    Only(FeedbackStatus),
}

impl StatusChoice {
    const ALL: [StatusChoice; 4] = [
        StatusChoice::All,
        StatusChoice::Only(FeedbackStatus::Open),
        StatusChoice::Only(FeedbackStatus::InProgress),
        StatusChoice::Only(FeedbackStatus::Resolved),
    ];

    fn status(self) -> Option<FeedbackStatus> {
        match self {
            Self::All => None,
            Self::Only(status) => Some(status),
        }
    }
}

impl From<Option<FeedbackStatus>> for StatusChoice {
    fn from(status: Option<FeedbackStatus>) -> Self {
        status.map_or(Self::All, Self::Only)
    }
}

impl fmt::Display for StatusChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All statuses"),
            Self::Only(status) => status.fmt(f),
        }
    }
}

fn feedback_row(feedback: &Feedback) -> Element<'_, Action> {
    button(
        row![
            kind_badge(feedback.kind),
            column![
                text(&feedback.title),
                text(format!(
                    "{} · Project #{} · {}",
                    feedback.kind.label(),
                    feedback.project_id,
                    format_date(feedback.created_at)
                ))
                .size(12),
            ]
            .spacing(2)
            .width(Length::Fill),
            status_badge(feedback.status),
        ]
        .spacing(12)
        .align_y(Center),
    )
    .width(Length::Fill)
    .style(button::secondary)
    .on_press(Action::OpenFeedback(feedback.clone()))
    .into()
}

pub fn view(panel: &FeedbackListPanel) -> Element<'_, Action> {
    let filter = panel.filter();
    let filters = row![
        text_input("Search feedback...", &filter.search)
            .on_input(Action::SearchChanged)
            .width(Length::Fill),
        pick_list(
            StatusChoice::ALL,
            Some(StatusChoice::from(filter.status)),
            |choice: StatusChoice| Action::StatusFilterChanged(choice.status()),
        ),
    ]
    .spacing(12);

    column![
        filters,
        scrollable(list_slot(panel.list().rows(), "No feedback found.", feedback_row)),
    ]
    .spacing(16)
    .into()
}
