#![allow(dead_code)]

mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from feedboard for tests
pub use feedboard::core::{
    auth::{AuthError, IdentityProvider, LocalAuth, Session, User},
    db::{
        Feedback, FeedbackDb, FeedbackKind, FeedbackOrder, FeedbackPatch, FeedbackQuery,
        FeedbackRepository, FeedbackStatus, GatewayError, NewFeedback, NewProject, Priority,
        Project, ProjectChoice, ProjectPatch, ProjectRepository,
    },
};
pub use feedboard::shell::{
    Action, Command, Effect, FetchRequest, GateAction, GateState, ListView, LoginAction, Panel,
    Remote, Resource, SessionGate, Shell, View,
};
