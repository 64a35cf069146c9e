use iced::{
    Alignment::Center,
    Element, Length,
    widget::{button, column, container, row, scrollable, text},
};

use crate::{
    core::db::{Feedback, Project},
    gui::widgets::{avatar, count_badge, kind_badge, list_slot, stat_card, status_badge},
    shell::{Action, DashboardPanel},
};

fn project_label(panel: &DashboardPanel, project_id: i64) -> String {
    panel
        .project_name(project_id)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Project #{}", project_id))
}

pub(crate) fn feedback_row<'a>(feedback: &'a Feedback, project: String) -> Element<'a, Action> {
    button(
        row![
            kind_badge(feedback.kind),
            column![text(&feedback.title), text(project).size(12)]
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

pub(crate) fn project_row(project: &Project) -> Element<'_, Action> {
    container(
        row![
            avatar(project.initial(), project.color()),
            column![
                text(&project.name),
                text(project.domain.as_deref().unwrap_or("")).size(12),
            ]
            .spacing(2)
            .width(Length::Fill),
            count_badge(project.feedback_count_or_zero()),
        ]
        .spacing(12)
        .align_y(Center),
    )
    .padding(10)
    .style(container::bordered_box)
    .into()
}

pub fn view(panel: &DashboardPanel) -> Element<'_, Action> {
    let stats = row(panel
        .stat_cards()
        .iter()
        .map(|card| stat_card(card.label, &card.value)))
    .spacing(16);

    let recent = column![
        text("Recent Feedback").size(20),
        list_slot(panel.recent().rows(), "No feedback yet.", |feedback| {
            feedback_row(feedback, project_label(panel, feedback.project_id))
        }),
    ]
    .spacing(10)
    .width(Length::FillPortion(3));

    let projects = column![
        text("Projects").size(20),
        list_slot(panel.projects().rows(), "No projects found.", project_row),
    ]
    .spacing(10)
    .width(Length::FillPortion(2));

    scrollable(
        column![
            text("Overview of your feedback and projects"),
            stats,
            row![recent, projects].spacing(24),
        ]
        .spacing(24),
    )
    .into()
}
