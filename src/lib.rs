pub mod config;
pub mod core;
pub mod shell;

pub use crate::core::{
    auth::{IdentityProvider, LocalAuth},
    db::{DataGateway, FeedbackDb},
};
pub use shell::{SessionGate, Shell};

#[cfg(feature = "gui")]
pub mod gui;
