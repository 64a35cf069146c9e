//! Integration tests for the dashboard panel.
//!
//! Tests cover:
//! - Stat cards settling independently
//! - Empty states on a fresh store
//! - Recent feedback limited and newest first
//! - Project cards with derived counts

mod common;

use common::*;
use feedboard::shell::{DashboardPanel, RECENT_LIMIT};

fn dashboard(shell: &Shell) -> &DashboardPanel {
    match shell.panel() {
        Panel::Dashboard(panel) => panel,
        other => panic!("expected the dashboard, got {:?}", other.view()),
    }
}

#[tokio::test]
async fn test_empty_store() -> anyhow::Result<()> {
    let (db, auth, _temp_dir) = create_test_store().await;
    let user = sign_up(&auth, "user@example.com").await.user;
    let shell = mounted_shell(&db, &auth, Some(user)).await;
    let panel = dashboard(&shell);

    let cards = panel.stat_cards();
    let labels: Vec<&str> = cards.iter().map(|card| card.label).collect();
    assert_eq!(labels, ["Total Feedback", "Open Issues", "Resolved", "Active Projects"]);
    assert!(cards.iter().all(|card| card.value == Remote::Loaded(0)));

    assert_eq!(panel.recent().rows(), ListView::Empty);
    assert_eq!(panel.projects().rows(), ListView::Empty);

    Ok(())
}

#[tokio::test]
async fn test_failed_stat_is_isolated() -> anyhow::Result<()> {
    let (store, auth, _temp_dir) = create_test_store().await;
    let user = sign_up(&auth, "user@example.com").await.user;
    let project = store.insert_project(make_new_project("Acme", None, None)).await?;
    store
        .insert_feedback(make_new_feedback(&user, project.id, "Crash", FeedbackKind::Bug))
        .await?;
    let db = FlakyDb::new(store);
    db.fail(Op::CountFeedback(Some(FeedbackStatus::Resolved)));

    let shell = mounted_shell(&db, &auth, Some(user)).await;
    let cards = dashboard(&shell).stat_cards();

    // 1. Only the resolved tile failed
    assert_eq!(cards[0].value, Remote::Loaded(1));
    assert_eq!(cards[1].value, Remote::Loaded(1));
    assert!(matches!(cards[2].value, Remote::Failed(_)));
    assert_eq!(cards[3].value, Remote::Loaded(1));

    // 2. The lists are unaffected
    assert!(matches!(dashboard(&shell).recent().rows(), ListView::Rows(rows) if rows.len() == 1));

    Ok(())
}

#[tokio::test]
async fn test_failed_list_shows_error() -> anyhow::Result<()> {
    let (store, auth, _temp_dir) = create_test_store().await;
    let user = sign_up(&auth, "user@example.com").await.user;
    let db = FlakyDb::new(store);
    db.fail(Op::ListProjects);

    let mut shell = mounted_shell(&db, &auth, Some(user)).await;
    let panel = dashboard(&shell);
    assert!(matches!(panel.projects().rows(), ListView::Failed(message) if message.contains("injected failure")));
    assert!(matches!(panel.stat_cards()[3].value, Remote::Failed(_)));
    assert_eq!(panel.recent().rows(), ListView::Empty);

    // Recovers on the next projects invalidation
    db.heal(Op::ListProjects);
    dispatch(&mut shell, &db, &auth, Action::OpenNewProject).await;
    dispatch(&mut shell, &db, &auth, Action::ProjectNameChanged("Acme".into())).await;
    dispatch(&mut shell, &db, &auth, Action::SubmitNewProject).await;
    assert_eq!(dashboard(&shell).stat_cards()[3].value, Remote::Loaded(1));

    Ok(())
}

#[tokio::test]
async fn test_recent_feedback_and_project_cards() -> anyhow::Result<()> {
    let (db, auth, _temp_dir) = create_test_store().await;
    let user = sign_up(&auth, "user@example.com").await.user;
    let acme = db.insert_project(make_new_project("Acme", None, None)).await?;
    let site = db
        .insert_project(make_new_project("Site A", Some("a.com"), None))
        .await?;
    for title in ["One", "Two", "Three", "Four", "Five"] {
        db.insert_feedback(make_new_feedback(&user, acme.id, title, FeedbackKind::Bug))
            .await?;
    }
    let latest = db
        .insert_feedback(make_new_feedback(&user, site.id, "Six", FeedbackKind::Feature))
        .await?;
    set_status(&db, &latest.id, FeedbackStatus::Resolved).await;

    let shell = mounted_shell(&db, &auth, Some(user)).await;
    let panel = dashboard(&shell);

    // 1. Counters
    let cards = panel.stat_cards();
    assert_eq!(cards[0].value, Remote::Loaded(6));
    assert_eq!(cards[1].value, Remote::Loaded(5));
    assert_eq!(cards[2].value, Remote::Loaded(1));
    assert_eq!(cards[3].value, Remote::Loaded(2));

    // 2. Recent feedback
    let ListView::Rows(recent) = panel.recent().rows() else {
        panic!("recent feedback should be loaded");
    };
    assert_eq!(recent.len(), RECENT_LIMIT as usize);
    let titles: Vec<&str> = recent.iter().map(|f| f.title.as_str()).collect();
    assert_eq!(titles, ["Six", "Five", "Four"]);
    assert_eq!(panel.project_name(recent[0].project_id), Some("Site A"));
    assert_eq!(panel.project_name(9999), None);

    // 3. Project cards carry their counts
    let ListView::Rows(projects) = panel.projects().rows() else {
        panic!("projects should be loaded");
    };
    let counts: Vec<(&str, u64)> = projects
        .iter()
        .map(|p| (p.name.as_str(), p.feedback_count_or_zero()))
        .collect();
    assert_eq!(counts, [("Acme", 5), ("Site A", 1)]);

    Ok(())
}
