use iced::{
    Alignment::Center,
    Color, Element, Length, Theme, border,
    widget::{button, column, container, container::Style, row, text},
};

use crate::{
    core::db::{self, FeedbackKind, FeedbackStatus},
    shell::{ListView, Remote, View},
};

pub fn palette_color(color: db::Color) -> Color {
    Color::from_rgb8(color.r, color.g, color.b)
}

fn status_color(status: FeedbackStatus) -> Color {
    match status {
        FeedbackStatus::Open => Color::from_rgb8(0xef, 0x44, 0x44),
        FeedbackStatus::InProgress => Color::from_rgb8(0xf5, 0x9e, 0x0b),
        FeedbackStatus::Resolved => Color::from_rgb8(0x10, 0xb9, 0x81),
    }
}

fn pill(background: Color) -> impl Fn(&Theme) -> Style {
    move |_theme: &Theme| {
        Style::default()
            .background(background)
            .border(border::rounded(10))
            .color(Color::WHITE)
    }
}

pub fn status_badge<'a, Message: 'a>(status: FeedbackStatus) -> Element<'a, Message> {
    container(text(status.label()).size(12))
        .padding([2, 8])
        .style(pill(status_color(status)))
        .into()
}

pub fn count_badge<'a, Message: 'a>(count: u64) -> Element<'a, Message> {
    container(text(count.to_string()).size(12))
        .padding([2, 8])
        .style(pill(Color::from_rgb8(0x64, 0x74, 0x8b)))
        .into()
}

pub fn kind_badge<'a, Message: 'a>(kind: FeedbackKind) -> Element<'a, Message> {
    let background = match kind {
        FeedbackKind::Bug => Color::from_rgb8(0xb9, 0x1c, 0x1c),
        FeedbackKind::Feature => Color::from_rgb8(0x25, 0x63, 0xeb),
    };
    container(text(kind.label()).size(12))
        .padding([2, 8])
        .style(pill(background))
        .into()
}

pub fn avatar<'a, Message: 'a>(initial: char, color: db::Color) -> Element<'a, Message> {
    container(text(initial.to_string()).size(18))
        .center_x(36.0)
        .center_y(36.0)
        .style(pill(palette_color(color)))
        .into()
}

pub fn error_text<'a, Message: 'a>(message: &str) -> Element<'a, Message> {
    text(message.to_string())
        .color(Color::from_rgb8(0xdc, 0x26, 0x26))
        .into()
}

pub fn notice_text<'a, Message: 'a>(message: &str) -> Element<'a, Message> {
    text(message.to_string())
        .color(Color::from_rgb8(0x05, 0x96, 0x69))
        .into()
}

pub fn stat_card<'a, Message: 'a>(label: &'static str, value: &Remote<u64>) -> Element<'a, Message> {
    let value: Element<'a, Message> = match value {
        Remote::Loading => text("…").size(28).into(),
        Remote::Failed(failure) => error_text(failure.message()),
        Remote::Loaded(count) => text(count.to_string()).size(28).into(),
    };
    container(column![text(label).size(14), value].spacing(6))
        .padding(16)
        .width(Length::Fill)
        .style(container::bordered_box)
        .into()
}

/// Renders a list slot: indicator, error, empty state or one element per row.
pub fn list_slot<'a, T, Message: 'a>(
    rows: ListView<'a, T>,
    empty: &'static str,
    row_view: impl Fn(&'a T) -> Element<'a, Message>,
) -> Element<'a, Message> {
    match rows {
        ListView::Loading => text("Loading...").into(),
        ListView::Failed(message) => error_text(message),
        ListView::Empty => text(empty).into(),
        ListView::Rows(rows) => column(rows.iter().map(row_view)).spacing(8).into(),
    }
}

fn nav_style(active: bool) -> impl Fn(&Theme, button::Status) -> button::Style {
    move |theme: &Theme, status: button::Status| {
        if active {
            button::primary(theme, status)
        } else {
            button::text(theme, status)
        }
    }
}

/// Sidebar with one entry per view next to the main content.
pub fn layout<'a, Message>(
    active: View,
    on_select: impl Fn(View) -> Message,
    footer: impl Into<Element<'a, Message>>,
    main_content: impl Into<Element<'a, Message>>,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    let nav = column(View::ALL.into_iter().map(|view| {
        button(text(view.title()))
            .width(Length::Fill)
            .style(nav_style(view == active))
            .on_press(on_select(view))
            .into()
    }))
    .spacing(4);

    let sidebar = container(
        column![
            text("Feedboard").size(24),
            nav,
            container(footer.into()).height(Length::Fill).align_bottom(Length::Fill),
        ]
        .spacing(20),
    )
    .padding(16)
    .width(Length::Fixed(220.0))
    .height(Length::Fill)
    .style(container::bordered_box);

    row![
        sidebar,
        container(main_content.into())
            .padding(24)
            .width(Length::Fill)
            .height(Length::Fill),
    ]
    .align_y(Center)
    .height(Length::Fill)
    .into()
}
