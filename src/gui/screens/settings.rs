use iced::{
    Element,
    widget::{button, column, text},
};

use crate::{
    gui::widgets::error_text,
    shell::{Action, Shell},
};

pub fn view(shell: &Shell) -> Element<'_, Action> {
    let email = shell
        .identity()
        .map(|user| user.email.as_str())
        .unwrap_or("Not signed in");

    let sign_out = button(if shell.is_signing_out() { "Signing out..." } else { "Sign Out" })
        .on_press_maybe((!shell.is_signing_out()).then_some(Action::SignOut));

    let mut content = column![text("Account").size(20), text(email), sign_out].spacing(12);
    if let Some(failure) = shell.sign_out_error() {
        content = content.push(error_text(failure.message()));
    }
    content.into()
}
