//! Identity provider: accounts, sessions and the session-change feed.

mod local;

use std::future::Future;

use thiserror::Error;
use time::OffsetDateTime;
use tokio::sync::watch;
use uuid::Uuid;

use crate::core::db::GatewayError;

pub use local::LocalAuth;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid login credentials")]
    InvalidCredentials,

    #[error("A user with this email address has already been registered")]
    EmailTaken,

    #[error("Unable to validate email address: invalid format")]
    InvalidEmail,

    #[error("Password should be at least {min} characters")]
    WeakPassword { min: usize },

    #[error("No active session")]
    NoSession,

    #[error("Password hashing failed: {0}")]
    Hash(argon2::password_hash::Error),

    #[error(transparent)]
    Store(#[from] GatewayError),
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        Self::Store(GatewayError::Database(err))
    }
}

/// Receives every session transition published by an identity provider.
///
/// Dropping the handle releases the subscription.
#[derive(Debug, Clone)]
pub struct SessionSubscription {
    rx: watch::Receiver<Option<Session>>,
}

impl SessionSubscription {
    pub(crate) fn new(rx: watch::Receiver<Option<Session>>) -> Self {
        Self { rx }
    }

    /// Waits for the next transition and returns the session it produced.
    ///
    /// Returns `None` once the provider is gone.
    pub async fn changed(&mut self) -> Option<Option<Session>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// The most recently published session, marking it as seen.
    pub fn latest(&mut self) -> Option<Session> {
        self.rx.borrow_and_update().clone()
    }
}

pub trait IdentityProvider: Clone + Send + Sync + 'static {
    /// The persisted session, if any. Lookup failures read as "no session".
    fn get_current_session(&self) -> impl Future<Output = Option<Session>> + Send;
    fn on_session_change(&self) -> SessionSubscription;
    fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Session, AuthError>> + Send;
    fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Session, AuthError>> + Send;
    fn sign_out(&self) -> impl Future<Output = Result<(), AuthError>> + Send;
    fn get_current_user(&self) -> impl Future<Output = Option<User>> + Send;
}
