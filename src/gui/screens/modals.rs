use iced::{
    Color, Element, Length, Theme,
    widget::{button, column, container, opaque, pick_list, row, text, text_input},
};

use crate::{
    core::db::{FeedbackKind, FeedbackStatus, ProjectChoice, format_date},
    gui::widgets::{error_text, kind_badge, notice_text, status_badge},
    shell::{Action, FeedbackDetail, NewFeedbackForm, NewProjectForm, Remote},
};

/// Centers `content` in a card over a dimmed backdrop that swallows input.
fn modal<'a>(title: &'a str, content: impl Into<Element<'a, Action>>, close: Action) -> Element<'a, Action> {
    let card = container(
        column![
            row![
                text(title).size(22).width(Length::Fill),
                button("✕").style(button::text).on_press(close),
            ],
            content.into(),
        ]
        .spacing(16),
    )
    .padding(24)
    .width(Length::Fixed(520.0))
    .style(container::bordered_box);

    opaque(
        container(card)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .style(|_theme: &Theme| container::Style::default().background(Color::from_rgba8(0, 0, 0, 0.5))),
    )
}

fn field<'a>(label: &'a str, value: impl Into<Element<'a, Action>>) -> Element<'a, Action> {
    column![text(label).size(12), value.into()].spacing(4).into()
}

pub fn feedback_detail(detail: &FeedbackDetail) -> Element<'_, Action> {
    let feedback = detail.feedback();
    let pending = detail.is_pending();

    let mut content = column![
        row![
            container(kind_badge(feedback.kind)).width(Length::Fill),
            status_badge(feedback.status),
        ],
        field("Description", text(&feedback.description)),
        row![
            field("Priority", text(feedback.priority.as_str())),
            field("Project", text(format!("Project #{}", feedback.project_id))),
            field("Created", text(format_date(feedback.created_at))),
        ]
        .spacing(24),
        field("Submitted by", text(&feedback.user_email)),
        row![
            pick_list(FeedbackStatus::ALL, detail.selected(), Action::DetailStatusSelected)
                .placeholder("Select status")
                .width(Length::Fill),
            button(if pending { "Updating..." } else { "Update Status" }).on_press_maybe(
                (!pending && detail.selected().is_some()).then_some(Action::UpdateFeedbackStatus)
            ),
        ]
        .spacing(12),
    ]
    .spacing(14);
    if let Some(failure) = detail.error() {
        content = content.push(error_text(failure.message()));
    }

    modal(&feedback.title, content, Action::CloseFeedback)
}

pub fn new_project(form: &NewProjectForm) -> Element<'_, Action> {
    let submit = (form.can_submit()).then_some(Action::SubmitNewProject);
    let mut content = column![
        field(
            "Project name",
            text_input("My website", &form.name)
                .on_input(Action::ProjectNameChanged)
                .on_submit_maybe(submit.clone()),
        ),
        field(
            "Domain (optional)",
            text_input("example.com", &form.domain)
                .on_input(Action::ProjectDomainChanged)
                .on_submit_maybe(submit.clone()),
        ),
        row![
            button("Cancel")
                .style(button::secondary)
                .on_press(Action::CloseNewProject),
            button(if form.is_pending() { "Creating..." } else { "Create Project" })
                .on_press_maybe(submit),
        ]
        .spacing(12),
    ]
    .spacing(14);
    if let Some(failure) = form.error() {
        content = content.push(error_text(failure.message()));
    }

    modal("New Project", content, Action::CloseNewProject)
}

pub fn new_feedback(form: &NewFeedbackForm) -> Element<'_, Action> {
    let project: Element<'_, Action> = match form.choices().state() {
        Remote::Loading => text("Loading projects...").into(),
        Remote::Failed(failure) => error_text(failure.message()),
        Remote::Loaded(choices) => pick_list(
            choices.as_slice(),
            form.selected_project(),
            |choice: ProjectChoice| Action::FeedbackProjectSelected(choice.id),
        )
        .placeholder("No projects available")
        .width(Length::Fill)
        .into(),
    };
    let pending = form.is_pending();

    let mut content = column![
        row![
            field("Project", project),
            field(
                "Type",
                pick_list(FeedbackKind::ALL, Some(form.kind), Action::FeedbackKindSelected),
            ),
        ]
        .spacing(12),
        field(
            "Title",
            text_input("Short summary", &form.title).on_input(Action::FeedbackTitleChanged),
        ),
        field(
            "Description",
            text_input("What happened?", &form.description)
                .on_input(Action::FeedbackDescriptionChanged),
        ),
        field(
            "Your email",
            text_input("you@example.com", &form.email).on_input(Action::FeedbackEmailChanged),
        ),
        row![
            button("Close")
                .style(button::secondary)
                .on_press(Action::CloseNewFeedback),
            button(if pending { "Submitting..." } else { "Submit Feedback" })
                .on_press_maybe((!pending).then_some(Action::SubmitFeedback)),
        ]
        .spacing(12),
    ]
    .spacing(14);
    if let Some(failure) = form.error() {
        content = content.push(error_text(failure.message()));
    }
    if let Some(message) = form.message() {
        content = content.push(notice_text(message));
    }

    modal("Submit Feedback", content, Action::CloseNewFeedback)
}
