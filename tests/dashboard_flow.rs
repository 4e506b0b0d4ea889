use chrono::Utc;
use classmon::{
    DashboardController, Database, EngagementMetric, HeadPosition, SessionStatus,
    ValidationError,
};
use tempfile::TempDir;
use tokio::time::Duration;

const TICK: Duration = Duration::from_millis(20);

fn open_db() -> (TempDir, Database) {
    let dir = TempDir::new().expect("temp dir");
    let db = Database::new(dir.path().join("classmon.sqlite3")).expect("open database");
    (dir, db)
}

#[tokio::test]
async fn full_session_flow_produces_scores_and_tears_down() {
    let (_dir, db) = open_db();
    let controller = DashboardController::new(db.clone(), TICK);

    controller
        .add_student("S-1", "Ali Osman", Some("3B"))
        .await
        .expect("add student");
    controller
        .add_student("S-2", "Maya Chen", None)
        .await
        .expect("add student");

    // No session yet, so nothing is being sampled.
    assert!(!controller.is_monitoring().await);
    assert!(controller.engagements().await.is_empty());

    let session = controller
        .start_session("Morning block")
        .await
        .expect("start session");
    assert!(controller.is_monitoring().await);

    tokio::time::sleep(TICK * 8).await;

    let engagements = controller.engagements().await;
    assert_eq!(engagements.len(), 2);
    assert!(controller.class_score().await > 0);

    controller.end_session().await.expect("end session");
    assert!(!controller.is_monitoring().await);
    assert!(controller.active_session().await.is_none());
    assert!(controller.engagements().await.is_empty());

    // The session is completed in the store and its metrics survive.
    let sessions = db.list_sessions().await.expect("list sessions");
    assert_eq!(sessions[0].status, SessionStatus::Completed);
    let metrics = db
        .list_metrics_for_session(&session.id)
        .await
        .expect("list metrics");
    assert!(!metrics.is_empty());
}

#[tokio::test]
async fn duplicate_student_code_leaves_roster_unchanged() {
    let (_dir, db) = open_db();
    let controller = DashboardController::new(db, TICK);

    controller
        .add_student("S-1", "Ali Osman", None)
        .await
        .expect("add student");

    let err = controller
        .add_student("S-1", "Someone Else", None)
        .await
        .expect_err("duplicate code must fail");
    assert!(err.downcast_ref::<ValidationError>().is_some());

    assert_eq!(controller.roster().len().await, 1);
}

#[tokio::test]
async fn removing_students_clears_every_trace() {
    let (_dir, db) = open_db();
    let controller = DashboardController::new(db.clone(), TICK);

    let ali = controller
        .add_student("S-1", "Ali Osman", None)
        .await
        .expect("add student");
    let maya = controller
        .add_student("S-2", "Maya Chen", None)
        .await
        .expect("add student");

    let session = controller
        .start_session("Morning block")
        .await
        .expect("start session");
    tokio::time::sleep(TICK * 8).await;

    // Drain the loop so a tick in flight cannot repaint the board between
    // the removal and the assertions below.
    controller.shutdown().await.expect("shutdown");

    controller
        .remove_student(&ali.id)
        .await
        .expect("remove student");
    assert!(controller.board().get(&ali.id).await.is_none());
    assert_eq!(controller.roster().len().await, 1);

    // The cascade dropped the removed student's metric rows too.
    let latest = db
        .latest_metric_for_student(&ali.id, &session.id)
        .await
        .expect("latest");
    assert!(latest.is_none());

    controller
        .remove_student(&maya.id)
        .await
        .expect("remove student");
    assert!(controller.roster().is_empty().await);
    assert!(!controller.is_monitoring().await);
}

#[tokio::test]
async fn adding_a_student_mid_session_seeds_the_board() {
    let (_dir, db) = open_db();
    // A long cadence keeps the loop from repainting the board during the
    // assertions below.
    let controller = DashboardController::new(db, Duration::from_secs(3600));

    controller
        .add_student("S-1", "Ali Osman", None)
        .await
        .expect("add student");
    controller
        .start_session("Morning block")
        .await
        .expect("start session");

    let maya = controller
        .add_student("S-2", "Maya Chen", None)
        .await
        .expect("add student");

    let entry = controller
        .board()
        .get(&maya.id)
        .await
        .expect("seeded board entry");
    assert!(entry.reading.overall_score <= 100);
}

#[tokio::test]
async fn load_seeds_placeholders_then_real_averages() {
    let (_dir, db) = open_db();

    let student = db
        .create_student("S-1", "Ali Osman", None)
        .await
        .expect("create student");
    let session = db.create_session("Morning block").await.expect("session");

    // Nothing recorded yet: the board shows the neutral placeholders.
    let controller = DashboardController::new(db.clone(), Duration::from_secs(3600));
    controller.load().await.expect("load");
    assert!(controller.is_monitoring().await);

    let entry = controller
        .board()
        .get(&student.id)
        .await
        .expect("board entry");
    assert_eq!(entry.reading.attention_score, 70);
    assert_eq!(entry.reading.participation_score, 75);
    assert_eq!(entry.reading.overall_score, 72);
    assert_eq!(entry.reading.head_position, HeadPosition::Center);
    assert!(entry.reading.eye_contact);
    controller.shutdown().await.expect("shutdown");

    // With history, the board is seeded from the session averages.
    let now = Utc::now();
    for scores in [(80u8, 60u8, 72u8), (60, 40, 52)] {
        db.insert_engagement_metric(&EngagementMetric {
            id: None,
            student_id: student.id.clone(),
            session_id: session.id.clone(),
            attention_score: scores.0,
            participation_score: scores.1,
            overall_score: scores.2,
            head_position: HeadPosition::Center,
            eye_contact: true,
            timestamp: now,
            notes: None,
        })
        .await
        .expect("insert metric");
    }

    let reloaded = DashboardController::new(db, Duration::from_secs(3600));
    reloaded.load().await.expect("load");

    let entry = reloaded
        .board()
        .get(&student.id)
        .await
        .expect("board entry");
    assert_eq!(entry.reading.attention_score, 70);
    assert_eq!(entry.reading.participation_score, 50);
    assert_eq!(entry.reading.overall_score, 62);
    reloaded.shutdown().await.expect("shutdown");
}
