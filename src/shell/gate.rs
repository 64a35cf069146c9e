use uuid::Uuid;

use crate::{
    core::{
        auth::{IdentityProvider, Session},
        db::DataGateway,
    },
    shell::{
        Action, Effect, Shell,
        remote::{Failure, PanelId},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    SignIn,
    SignUp,
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pending: Option<AuthMode>,
    error: Option<Failure>,
}

impl LoginForm {
    pub fn pending(&self) -> Option<AuthMode> {
        self.pending
    }

    pub fn error(&self) -> Option<&Failure> {
        self.error.as_ref()
    }

    pub fn can_submit(&self) -> bool {
        self.pending.is_none() && !self.email.trim().is_empty() && !self.password.is_empty()
    }

    fn submit(&mut self, mode: AuthMode) -> Option<Command> {
        if self.pending.is_some() {
            return None;
        }
        if self.email.trim().is_empty() || self.password.is_empty() {
            self.error = Some(Failure::new("Email and password are required."));
            return None;
        }
        self.pending = Some(mode);
        self.error = None;
        let (email, password) = (self.email.trim().to_string(), self.password.clone());
        Some(match mode {
            AuthMode::SignIn => Command::SignIn { email, password },
            AuthMode::SignUp => Command::SignUp { email, password },
        })
    }
}

#[derive(Debug, Clone)]
pub enum LoginAction {
    EmailChanged(String),
    PasswordChanged(String),
    SignIn,
    SignUp,
    Finished {
        mode: AuthMode,
        result: Result<Session, Failure>,
    },
}

#[derive(Debug, Clone)]
pub enum GateAction {
    /// Answer to the lookup issued on activation.
    SessionRestored(Option<Session>),
    /// Published by the identity provider's session feed.
    SessionChanged(Option<Session>),
    Login(LoginAction),
    Shell(Action),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    RestoreSession,
    SignIn { email: String, password: String },
    SignUp { email: String, password: String },
    Shell(Effect),
}

impl Command {
    pub async fn perform<D, A>(self, db: D, auth: A) -> GateAction
    where
        D: DataGateway,
        A: IdentityProvider,
    {
        match self {
            Self::RestoreSession => GateAction::SessionRestored(auth.get_current_session().await),
            Self::SignIn { email, password } => GateAction::Login(LoginAction::Finished {
                mode: AuthMode::SignIn,
                result: auth.sign_in(&email, &password).await.map_err(Failure::from),
            }),
            Self::SignUp { email, password } => GateAction::Login(LoginAction::Finished {
                mode: AuthMode::SignUp,
                result: auth.sign_up(&email, &password).await.map_err(Failure::from),
            }),
            Self::Shell(effect) => GateAction::Shell(effect.perform(db, auth).await),
        }
    }
}

fn shell_commands(effects: Vec<Effect>) -> Vec<Command> {
    effects.into_iter().map(Command::Shell).collect()
}

#[derive(Debug, Clone)]
pub enum GateState {
    Restoring,
    SignedOut(LoginForm),
    SignedIn(Box<Shell>),
}

/// Shows the login form or the shell, following the identity provider.
///
/// Restore answers and change events may arrive in any order; the gate
/// converges on the most recent session it was told about.
#[derive(Debug, Clone)]
pub struct SessionGate {
    state: GateState,
    /// First panel id for the next shell; ids are never reused across shells.
    next_panel: PanelId,
}

impl SessionGate {
    pub fn new() -> (Self, Vec<Command>) {
        (
            Self {
                state: GateState::Restoring,
                next_panel: 1,
            },
            vec![Command::RestoreSession],
        )
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    pub fn shell(&self) -> Option<&Shell> {
        match &self.state {
            GateState::SignedIn(shell) => Some(&**shell),
            _ => None,
        }
    }

    pub fn login(&self) -> Option<&LoginForm> {
        match &self.state {
            GateState::SignedOut(form) => Some(form),
            _ => None,
        }
    }

    pub fn update(&mut self, action: GateAction) -> Vec<Command> {
        match action {
            GateAction::SessionRestored(session) => {
                if !matches!(self.state, GateState::Restoring) {
                    tracing::debug!("session feed already settled the gate; ignoring restore");
                    return Vec::new();
                }
                self.converge(session)
            }
            GateAction::SessionChanged(session) => self.converge(session),
            GateAction::Login(action) => self.update_login(action),
            GateAction::Shell(action) => match &mut self.state {
                GateState::SignedIn(shell) => shell_commands(shell.update(action)),
                _ => {
                    tracing::debug!(?action, "dropping shell action without a shell");
                    Vec::new()
                }
            },
        }
    }

    fn update_login(&mut self, action: LoginAction) -> Vec<Command> {
        match action {
            LoginAction::Finished {
                result: Ok(session),
                ..
            } => self.converge(Some(session)),
            LoginAction::Finished {
                mode,
                result: Err(failure),
            } => {
                tracing::warn!(?mode, error = %failure, "authentication failed");
                if let GateState::SignedOut(form) = &mut self.state {
                    form.pending = None;
                    form.error = Some(failure);
                }
                Vec::new()
            }
            edit => {
                let GateState::SignedOut(form) = &mut self.state else {
                    return Vec::new();
                };
                match edit {
                    LoginAction::EmailChanged(email) => form.email = email,
                    LoginAction::PasswordChanged(password) => form.password = password,
                    LoginAction::SignIn => return form.submit(AuthMode::SignIn).into_iter().collect(),
                    LoginAction::SignUp => return form.submit(AuthMode::SignUp).into_iter().collect(),
                    LoginAction::Finished { .. } => {}
                }
                Vec::new()
            }
        }
    }

    fn signed_in_user(&self) -> Option<Uuid> {
        match &self.state {
            GateState::SignedIn(shell) => shell.identity().map(|user| user.id),
            _ => None,
        }
    }

    /// Reserves every panel id the current shell handed out.
    fn retire_shell(&mut self) {
        if let GateState::SignedIn(shell) = &self.state {
            self.next_panel = self.next_panel.max(shell.next_panel_id());
        }
    }

    fn converge(&mut self, session: Option<Session>) -> Vec<Command> {
        let Some(session) = session else {
            if !matches!(self.state, GateState::SignedOut(_)) {
                tracing::info!("no session; showing login");
                self.retire_shell();
                self.state = GateState::SignedOut(LoginForm::default());
            }
            return Vec::new();
        };
        if self.signed_in_user() == Some(session.user.id) {
            return Vec::new();
        }
        tracing::info!(user = %session.user.email, "session active; showing dashboard");
        self.retire_shell();
        let (shell, effects) = Shell::starting_at(Some(session.user), self.next_panel);
        self.state = GateState::SignedIn(Box::new(shell));
        shell_commands(effects)
    }
}
