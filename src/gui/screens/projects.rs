use iced::{
    Element,
    widget::{column, scrollable, text},
};

use crate::{
    gui::{screens::dashboard::project_row, widgets::list_slot},
    shell::{Action, ProjectsListPanel},
};

pub fn view(panel: &ProjectsListPanel) -> Element<'_, Action> {
    column![
        text("Projects you collect feedback for"),
        scrollable(list_slot(panel.projects().rows(), "No projects found.", project_row)),
    ]
    .spacing(16)
    .into()
}
