//! End-to-end tests through the session gate.
//!
//! Tests cover:
//! - Restoring with no session, signing up and landing on the dashboard
//! - Creating a project and seeing it in the projects view
//! - Signing out through the session feed
//! - Restoring a persisted session
//! - Restore answers that arrive after a newer session event
//! - Answers addressed to a shell that was replaced after sign-out

mod common;

use common::*;

fn shell(gate: &SessionGate) -> &Shell {
    gate.shell().expect("gate should be showing the shell")
}

async fn login<D: feedboard::DataGateway>(
    gate: &mut SessionGate,
    db: &D,
    auth: &LocalAuth,
    email: &str,
    action: LoginAction,
) {
    dispatch_gate(gate, db, auth, GateAction::Login(LoginAction::EmailChanged(email.into()))).await;
    dispatch_gate(
        gate,
        db,
        auth,
        GateAction::Login(LoginAction::PasswordChanged(TEST_PASSWORD.into())),
    )
    .await;
    dispatch_gate(gate, db, auth, GateAction::Login(action)).await;
}

#[tokio::test]
async fn test_sign_up_create_project_sign_out() -> anyhow::Result<()> {
    let (db, auth, _temp_dir) = create_test_store().await;
    let mut feed = auth.on_session_change();

    // 1. Nothing to restore
    let (mut gate, commands) = SessionGate::new();
    assert!(matches!(gate.state(), GateState::Restoring));
    run_commands(&mut gate, &db, &auth, commands).await;
    assert!(gate.login().is_some());

    // 2. Sign up lands on an empty dashboard
    login(&mut gate, &db, &auth, "user@example.com", LoginAction::SignUp).await;
    let Panel::Dashboard(panel) = shell(&gate).panel() else {
        panic!("shell should open on the dashboard");
    };
    let cards = panel.stat_cards();
    assert_eq!(cards[0].value, Remote::Loaded(0));
    assert_eq!(cards[3].value, Remote::Loaded(0));
    assert_eq!(
        shell(&gate).identity().map(|u| u.email.as_str()),
        Some("user@example.com")
    );

    // 3. The feed echo of the same session keeps the shell
    let session = feed.changed().await.flatten().expect("sign-up published a session");
    let panel_id = shell(&gate).panel().id();
    dispatch_gate(&mut gate, &db, &auth, GateAction::SessionChanged(Some(session))).await;
    assert_eq!(shell(&gate).panel().id(), panel_id);

    // 4. Create a project
    for action in [
        Action::OpenNewProject,
        Action::ProjectNameChanged("Site A".into()),
        Action::ProjectDomainChanged("a.com".into()),
        Action::SubmitNewProject,
    ] {
        dispatch_gate(&mut gate, &db, &auth, GateAction::Shell(action)).await;
    }
    let Panel::Dashboard(panel) = shell(&gate).panel() else {
        panic!("still on the dashboard");
    };
    assert_eq!(panel.stat_cards()[3].value, Remote::Loaded(1));

    // 5. The projects view lists it
    dispatch_gate(&mut gate, &db, &auth, GateAction::Shell(Action::SelectView(View::Projects))).await;
    let Panel::Projects(panel) = shell(&gate).panel() else {
        panic!("projects view should be mounted");
    };
    let ListView::Rows(projects) = panel.projects().rows() else {
        panic!("projects should be loaded");
    };
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].name, "Site A");
    assert_eq!(projects[0].domain.as_deref(), Some("a.com"));

    // 6. Sign out; the feed delivers the change to the gate
    dispatch_gate(&mut gate, &db, &auth, GateAction::Shell(Action::SelectView(View::Settings))).await;
    dispatch_gate(&mut gate, &db, &auth, GateAction::Shell(Action::SignOut)).await;
    let change = feed.changed().await.expect("provider alive");
    assert_eq!(change, None);
    dispatch_gate(&mut gate, &db, &auth, GateAction::SessionChanged(change)).await;
    assert!(gate.login().is_some());
    assert!(auth.get_current_session().await.is_none());

    Ok(())
}

#[tokio::test]
async fn test_failed_sign_in_stays_on_login() -> anyhow::Result<()> {
    let (db, auth, _temp_dir) = create_test_store().await;
    let (mut gate, commands) = SessionGate::new();
    run_commands(&mut gate, &db, &auth, commands).await;

    // 1. Missing password
    dispatch_gate(
        &mut gate,
        &db,
        &auth,
        GateAction::Login(LoginAction::EmailChanged("user@example.com".into())),
    )
    .await;
    dispatch_gate(&mut gate, &db, &auth, GateAction::Login(LoginAction::SignIn)).await;
    assert_eq!(
        gate.login().and_then(|f| f.error()).map(|e| e.message()),
        Some("Email and password are required.")
    );

    // 2. Unknown account
    login(&mut gate, &db, &auth, "user@example.com", LoginAction::SignIn).await;
    let form = gate.login().expect("still signed out");
    assert_eq!(form.error().map(|e| e.message()), Some("Invalid login credentials"));
    assert_eq!(form.pending(), None);

    Ok(())
}

#[tokio::test]
async fn test_restores_persisted_session() -> anyhow::Result<()> {
    let (db, auth, _temp_dir) = create_test_store().await;
    let session = sign_up(&auth, "back@example.com").await;

    let (mut gate, commands) = SessionGate::new();
    run_commands(&mut gate, &db, &auth, commands).await;
    assert_eq!(shell(&gate).identity(), Some(&session.user));
    assert_eq!(shell(&gate).view(), View::Dashboard);

    Ok(())
}

#[tokio::test]
async fn test_late_restore_does_not_override_newer_session() -> anyhow::Result<()> {
    let (db, auth, _temp_dir) = create_test_store().await;
    let session = sign_up(&auth, "user@example.com").await;

    // 1. The feed answers before the restore lookup does
    let (mut gate, _restore) = SessionGate::new();
    dispatch_gate(&mut gate, &db, &auth, GateAction::SessionChanged(Some(session.clone()))).await;
    assert_eq!(shell(&gate).identity(), Some(&session.user));

    // 2. A stale "no session" restore is ignored
    dispatch_gate(&mut gate, &db, &auth, GateAction::SessionRestored(None)).await;
    assert_eq!(shell(&gate).identity(), Some(&session.user));

    // 3. A different user replaces the shell
    auth.sign_out().await?;
    let other = sign_up(&auth, "other@example.com").await;
    dispatch_gate(&mut gate, &db, &auth, GateAction::SessionChanged(Some(other.clone()))).await;
    assert_eq!(shell(&gate).identity(), Some(&other.user));

    Ok(())
}

fn active_projects(gate: &SessionGate) -> Remote<u64> {
    let Panel::Dashboard(panel) = shell(gate).panel() else {
        panic!("expected the dashboard");
    };
    panel.stat_cards()[3].value.clone()
}

#[tokio::test]
async fn test_answers_for_replaced_shell_are_dropped() -> anyhow::Result<()> {
    let (db, auth, _temp_dir) = create_test_store().await;
    let first = sign_up(&auth, "first@example.com").await;
    let second = sign_up(&auth, "second@example.com").await;

    // 1. First shell; its fetches complete against an empty store but are held back
    let (mut gate, _restore) = SessionGate::new();
    let held = gate.update(GateAction::SessionChanged(Some(first.clone())));
    assert!(!held.is_empty());
    let mut late = Vec::new();
    for command in held {
        late.push(command.perform(db.clone(), auth.clone()).await);
    }

    // 2. A project appears, then sign-out and sign-in as the same user
    db.insert_project(make_new_project("Acme", None, None)).await?;
    dispatch_gate(&mut gate, &db, &auth, GateAction::SessionChanged(None)).await;
    dispatch_gate(&mut gate, &db, &auth, GateAction::SessionChanged(Some(first))).await;
    assert_eq!(active_projects(&gate), Remote::Loaded(1));

    // 3. The held answers reach the new shell and change nothing
    for action in late.iter().cloned() {
        assert!(gate.update(action).is_empty());
    }
    assert_eq!(active_projects(&gate), Remote::Loaded(1));

    // 4. Same after switching straight to another user
    dispatch_gate(&mut gate, &db, &auth, GateAction::SessionChanged(Some(second.clone()))).await;
    for action in late {
        gate.update(action);
    }
    assert_eq!(shell(&gate).identity(), Some(&second.user));
    assert_eq!(active_projects(&gate), Remote::Loaded(1));

    Ok(())
}
