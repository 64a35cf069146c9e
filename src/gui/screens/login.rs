use iced::{
    Alignment::Center,
    Element, Length,
    widget::{button, column, container, row, text, text_input},
};

use crate::{
    gui::widgets::error_text,
    shell::{AuthMode, LoginAction, LoginForm},
};

pub fn view(form: &LoginForm) -> Element<'_, LoginAction> {
    let ready = form.can_submit();
    let sign_in_label = match form.pending() {
        Some(AuthMode::SignIn) => "Signing in...",
        _ => "Sign In",
    };
    let sign_up_label = match form.pending() {
        Some(AuthMode::SignUp) => "Signing up...",
        _ => "Sign Up",
    };

    let mut content = column![
        text("Feedboard").size(32),
        text("Sign in to manage feedback across your projects"),
        text_input("Email", &form.email)
            .on_input(LoginAction::EmailChanged)
            .on_submit_maybe(ready.then_some(LoginAction::SignIn)),
        text_input("Password", &form.password)
            .secure(true)
            .on_input(LoginAction::PasswordChanged)
            .on_submit_maybe(ready.then_some(LoginAction::SignIn)),
        row![
            button(sign_in_label).on_press_maybe(ready.then_some(LoginAction::SignIn)),
            button(sign_up_label)
                .style(button::secondary)
                .on_press_maybe(ready.then_some(LoginAction::SignUp)),
        ]
        .spacing(12),
    ]
    .spacing(16)
    .padding(24)
    .width(Length::Fixed(380.0))
    .align_x(Center);

    if let Some(failure) = form.error() {
        content = content.push(error_text(failure.message()));
    }

    container(content)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}
