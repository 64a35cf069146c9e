use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use sqlx::Connection;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tokio::sync::watch;
use uuid::Uuid;

use crate::core::{
    auth::{AuthError, IdentityProvider, Session, SessionSubscription, User},
    db::{FeedbackDb, GatewayError, StoreState},
};

const MIN_PASSWORD_LEN: usize = 6;

/// Identity provider backed by the same store as the feedback data.
///
/// The session that was current at shutdown is persisted and restored by
/// [`IdentityProvider::get_current_session`].
#[derive(Debug, Clone)]
pub struct LocalAuth {
    state: Arc<StoreState>,
    tx: Arc<watch::Sender<Option<Session>>>,
}

/// Argon2id with a fresh salt, encoded as a PHC string.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes()).map_err(AuthError::Hash)?;
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(AuthError::Hash)?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, stored: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(stored)
        .map_err(|_| GatewayError::decode("password_hash", stored))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

fn validate_email(email: &str) -> Result<(), AuthError> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(())
        }
        _ => Err(AuthError::InvalidEmail),
    }
}

fn parse_session(
    token: String,
    created_at: String,
    user_id: String,
    email: String,
) -> Result<Session, AuthError> {
    let id = Uuid::parse_str(&user_id).map_err(|_| GatewayError::decode("user_id", user_id))?;
    let created_at = OffsetDateTime::parse(&created_at, &Rfc3339)
        .map_err(|_| GatewayError::decode("created_at", created_at))?;
    Ok(Session {
        token,
        user: User { id, email },
        created_at,
    })
}

impl LocalAuth {
    pub fn new(db: &FeedbackDb) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            state: db.state(),
            tx: Arc::new(tx),
        }
    }

    async fn load_current(&self) -> Result<Option<Session>, AuthError> {
        let mut conn = self.state.conn().await?;
        let row: Option<(String, String, String, String)> = sqlx::query_as(
            r#"SELECT s.token, s.created_at, u.id, u.email
            FROM auth_state a
            JOIN sessions s ON s.token = a.token
            JOIN users u ON u.id = s.user_id
            WHERE a.slot = 0"#,
        )
        .fetch_optional(&mut **conn)
        .await?;
        row.map(|(token, created_at, user_id, email)| parse_session(token, created_at, user_id, email))
            .transpose()
    }

    /// Creates a session for the user, makes it the current one and publishes it.
    async fn start_session(&self, user: User) -> Result<Session, AuthError> {
        let token = Uuid::new_v4().simple().to_string();
        let mut conn = self.state.conn().await?;
        let mut tx = conn.begin().await?;
        let created_at: String = sqlx::query_scalar(
            "INSERT INTO sessions (token, user_id) VALUES (?, ?) RETURNING created_at",
        )
        .bind(&token)
        .bind(user.id.to_string())
        .fetch_one(&mut *tx)
        .await?;
        sqlx::query("UPDATE auth_state SET token = ? WHERE slot = 0")
            .bind(&token)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        let session = parse_session(token, created_at, user.id.to_string(), user.email)?;
        tracing::info!(user = %session.user.email, "signed in");
        self.tx.send_replace(Some(session.clone()));
        Ok(session)
    }
}

impl IdentityProvider for LocalAuth {
    async fn get_current_session(&self) -> Option<Session> {
        match self.load_current().await {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!(error = %err, "session lookup failed; treating as signed out");
                None
            }
        }
    }

    fn on_session_change(&self) -> SessionSubscription {
        SessionSubscription::new(self.tx.subscribe())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = email.trim();
        let user: Option<(String, String, String)> = {
            let mut conn = self.state.conn().await?;
            sqlx::query_as("SELECT id, email, password_hash FROM users WHERE email = ?")
                .bind(email)
                .fetch_optional(&mut **conn)
                .await?
        };
        let Some((user_id, stored_email, password_hash)) = user else {
            tracing::warn!(user = %email, "sign-in for unknown account");
            return Err(AuthError::InvalidCredentials);
        };
        if !verify_password(password, &password_hash)? {
            tracing::warn!(user = %email, "sign-in with wrong password");
            return Err(AuthError::InvalidCredentials);
        }
        let id = Uuid::parse_str(&user_id).map_err(|_| GatewayError::decode("id", user_id))?;
        self.start_session(User {
            id,
            email: stored_email,
        })
        .await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = email.trim();
        validate_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword {
                min: MIN_PASSWORD_LEN,
            });
        }

        let user_id = Uuid::new_v4();
        let password_hash = hash_password(password)?;
        let inserted = {
            let mut conn = self.state.conn().await?;
            sqlx::query(
                "INSERT INTO users (id, email, password_hash) VALUES (?, ?, ?) ON CONFLICT (email) DO NOTHING",
            )
            .bind(user_id.to_string())
            .bind(email)
            .bind(&password_hash)
            .execute(&mut **conn)
            .await?
            .rows_affected()
        };
        if inserted == 0 {
            return Err(AuthError::EmailTaken);
        }
        tracing::info!(user = %email, "account created");
        self.start_session(User {
            id: user_id,
            email: email.to_string(),
        })
        .await
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let token: Option<String> = {
            let mut conn = self.state.conn().await?;
            let token: Option<String> = sqlx::query_scalar("SELECT token FROM auth_state WHERE slot = 0")
                .fetch_one(&mut **conn)
                .await?;
            if let Some(token) = &token {
                let mut tx = conn.begin().await?;
                sqlx::query("UPDATE auth_state SET token = NULL WHERE slot = 0")
                    .execute(&mut *tx)
                    .await?;
                sqlx::query("DELETE FROM sessions WHERE token = ?")
                    .bind(token)
                    .execute(&mut *tx)
                    .await?;
                tx.commit().await?;
            }
            token
        };
        if token.is_some() {
            tracing::info!("signed out");
        }
        self.tx.send_replace(None);
        Ok(())
    }

    async fn get_current_user(&self) -> Option<User> {
        self.get_current_session().await.map(|session| session.user)
    }
}
