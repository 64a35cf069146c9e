mod app;
mod message;
mod screens;
mod state;
mod widgets;

use std::path::PathBuf;

pub use app::FeedboardApp;
pub use message::Message;
pub use state::AppState;

/// Opens the window on the store at `database` and runs until it closes.
pub fn run(database: PathBuf) -> iced::Result {
    iced::application(
        move || FeedboardApp::boot(database.clone()),
        FeedboardApp::update,
        FeedboardApp::view,
    )
    .title(FeedboardApp::title)
    .window_size((1200.0, 800.0))
    .run()
}
