use std::{
    collections::{HashSet, VecDeque},
    sync::{Arc, Mutex},
};

use feedboard::{
    core::{
        auth::{IdentityProvider, LocalAuth, Session, User},
        db::{
            DataGateway, Feedback, FeedbackDb, FeedbackKind, FeedbackPatch, FeedbackQuery,
            FeedbackRepository, FeedbackStatus, GatewayError, NewFeedback, NewProject, Project,
            ProjectChoice, ProjectPatch, ProjectRepository,
        },
    },
    shell::{Action, Command, Effect, GateAction, SessionGate, Shell},
};

pub const TEST_PASSWORD: &str = "password123";

/// Opens a fresh store in a temporary directory.
/// Returns the store, its identity provider and the directory (which must be kept alive).
pub async fn create_test_store() -> (FeedbackDb, LocalAuth, tempfile::TempDir) {
    let dir = tempfile::TempDir::new().expect("Failed to create temp directory");
    let db = FeedbackDb::open(dir.path().join("feedboard.db"))
        .await
        .expect("Failed to open test store");
    let auth = LocalAuth::new(&db);
    (db, auth, dir)
}

/// Registers `email` and returns the session the sign-up started.
pub async fn sign_up(auth: &LocalAuth, email: &str) -> Session {
    auth.sign_up(email, TEST_PASSWORD)
        .await
        .expect("Failed to sign up test user")
}

pub fn make_new_project(name: &str, domain: Option<&str>, owner: Option<&User>) -> NewProject {
    NewProject {
        name: name.to_string(),
        domain: domain.map(str::to_string),
        owner_id: owner.map(|user| user.id),
    }
}

pub fn make_new_feedback(user: &User, project_id: i64, title: &str, kind: FeedbackKind) -> NewFeedback {
    NewFeedback {
        user_id: user.id,
        project_id,
        title: title.to_string(),
        description: format!("Details about {}", title.to_lowercase()),
        kind,
        user_email: user.email.clone(),
    }
}

pub async fn set_status(db: &FeedbackDb, id: &str, status: FeedbackStatus) -> Feedback {
    db.update_feedback(
        id,
        FeedbackPatch {
            status: Some(status),
            priority: None,
        },
    )
    .await
    .expect("Failed to update feedback status")
}

/// Gateway operations, as seen by [`FlakyDb`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    ListProjects,
    ListProjectChoices,
    CountProjects,
    InsertProject,
    UpdateProject,
    ListFeedback,
    CountFeedback(Option<FeedbackStatus>),
    InsertFeedback,
    UpdateFeedback,
}

/// Wraps the real store, records every call and fails the operations it is told to.
#[derive(Debug, Clone)]
pub struct FlakyDb {
    inner: FeedbackDb,
    failing: Arc<Mutex<HashSet<Op>>>,
    calls: Arc<Mutex<Vec<Op>>>,
}

impl FlakyDb {
    pub fn new(inner: FeedbackDb) -> Self {
        Self {
            inner,
            failing: Arc::default(),
            calls: Arc::default(),
        }
    }

    pub fn fail(&self, op: Op) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn heal(&self, op: Op) {
        self.failing.lock().unwrap().remove(&op);
    }

    pub fn calls(&self) -> Vec<Op> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, op: Op) -> usize {
        self.calls.lock().unwrap().iter().filter(|call| **call == op).count()
    }

    pub fn reset_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn check(&self, op: Op) -> Result<(), GatewayError> {
        self.calls.lock().unwrap().push(op);
        if self.failing.lock().unwrap().contains(&op) {
            return Err(GatewayError::Database(sqlx::Error::Protocol(format!(
                "injected failure for {:?}",
                op
            ))));
        }
        Ok(())
    }
}

impl ProjectRepository for FlakyDb {
    async fn list_projects(&self) -> Result<Vec<Project>, GatewayError> {
        self.check(Op::ListProjects)?;
        self.inner.list_projects().await
    }

    async fn list_project_choices(&self) -> Result<Vec<ProjectChoice>, GatewayError> {
        self.check(Op::ListProjectChoices)?;
        self.inner.list_project_choices().await
    }

    async fn count_projects(&self) -> Result<u64, GatewayError> {
        self.check(Op::CountProjects)?;
        self.inner.count_projects().await
    }

    async fn insert_project(&self, project: NewProject) -> Result<Project, GatewayError> {
        self.check(Op::InsertProject)?;
        self.inner.insert_project(project).await
    }

    async fn update_project(&self, id: i64, patch: ProjectPatch) -> Result<Project, GatewayError> {
        self.check(Op::UpdateProject)?;
        self.inner.update_project(id, patch).await
    }
}

impl FeedbackRepository for FlakyDb {
    async fn list_feedback(&self, query: &FeedbackQuery) -> Result<Vec<Feedback>, GatewayError> {
        self.check(Op::ListFeedback)?;
        self.inner.list_feedback(query).await
    }

    async fn count_feedback(&self, status: Option<FeedbackStatus>) -> Result<u64, GatewayError> {
        self.check(Op::CountFeedback(status))?;
        self.inner.count_feedback(status).await
    }

    async fn insert_feedback(&self, feedback: NewFeedback) -> Result<Feedback, GatewayError> {
        self.check(Op::InsertFeedback)?;
        self.inner.insert_feedback(feedback).await
    }

    async fn update_feedback(&self, id: &str, patch: FeedbackPatch) -> Result<Feedback, GatewayError> {
        self.check(Op::UpdateFeedback)?;
        self.inner.update_feedback(id, patch).await
    }
}

/// Performs `effects` and everything they lead to, in order, until the shell is idle.
/// Returns how many effects ran.
pub async fn run_effects<D, A>(shell: &mut Shell, db: &D, auth: &A, effects: Vec<Effect>) -> usize
where
    D: DataGateway,
    A: IdentityProvider,
{
    let mut queue: VecDeque<Effect> = effects.into();
    let mut performed = 0;
    while let Some(effect) = queue.pop_front() {
        performed += 1;
        let action = effect.perform(db.clone(), auth.clone()).await;
        queue.extend(shell.update(action));
    }
    performed
}

pub async fn dispatch<D, A>(shell: &mut Shell, db: &D, auth: &A, action: Action) -> usize
where
    D: DataGateway,
    A: IdentityProvider,
{
    let effects = shell.update(action);
    run_effects(shell, db, auth, effects).await
}

/// A shell for `user` whose initial fetches have all settled.
pub async fn mounted_shell<D, A>(db: &D, auth: &A, user: Option<User>) -> Shell
where
    D: DataGateway,
    A: IdentityProvider,
{
    let (mut shell, effects) = Shell::new(user);
    run_effects(&mut shell, db, auth, effects).await;
    shell
}

pub async fn run_commands<D, A>(gate: &mut SessionGate, db: &D, auth: &A, commands: Vec<Command>)
where
    D: DataGateway,
    A: IdentityProvider,
{
    let mut queue: VecDeque<Command> = commands.into();
    while let Some(command) = queue.pop_front() {
        let action = command.perform(db.clone(), auth.clone()).await;
        queue.extend(gate.update(action));
    }
}

pub async fn dispatch_gate<D, A>(gate: &mut SessionGate, db: &D, auth: &A, action: GateAction)
where
    D: DataGateway,
    A: IdentityProvider,
{
    let commands = gate.update(action);
    run_commands(gate, db, auth, commands).await;
}
