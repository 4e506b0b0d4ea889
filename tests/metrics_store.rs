use chrono::{DateTime, Duration, Utc};
use classmon::{Database, EngagementMetric, HeadPosition, ScoreAverages};
use tempfile::TempDir;

fn open_db() -> (TempDir, Database) {
    let dir = TempDir::new().expect("temp dir");
    let db = Database::new(dir.path().join("classmon.sqlite3")).expect("open database");
    (dir, db)
}

fn metric(
    student_id: &str,
    session_id: &str,
    scores: (u8, u8, u8),
    timestamp: DateTime<Utc>,
) -> EngagementMetric {
    EngagementMetric {
        id: None,
        student_id: student_id.to_string(),
        session_id: session_id.to_string(),
        attention_score: scores.0,
        participation_score: scores.1,
        overall_score: scores.2,
        head_position: HeadPosition::Center,
        eye_contact: true,
        timestamp,
        notes: None,
    }
}

#[tokio::test]
async fn recorded_metric_comes_back_with_an_id() {
    let (_dir, db) = open_db();
    let session = db.create_session("Period 1").await.expect("session");
    let student = db
        .create_student("S-1", "Ali Osman", None)
        .await
        .expect("student");

    let stored = db
        .insert_engagement_metric(&metric(&student.id, &session.id, (80, 60, 72), Utc::now()))
        .await
        .expect("insert metric");

    assert!(stored.id.is_some());
    assert_eq!(stored.attention_score, 80);
    assert_eq!(stored.student_id, student.id);
}

#[tokio::test]
async fn averages_are_zero_without_metrics() {
    let (_dir, db) = open_db();
    let session = db.create_session("Period 1").await.expect("session");
    let student = db
        .create_student("S-1", "Ali Osman", None)
        .await
        .expect("student");

    let avg = db
        .average_scores_for_student(&student.id, &session.id)
        .await
        .expect("averages");
    assert_eq!(avg, ScoreAverages::ZERO);
}

#[tokio::test]
async fn averages_are_rounded_per_column_means() {
    let (_dir, db) = open_db();
    let session = db.create_session("Period 1").await.expect("session");
    let student = db
        .create_student("S-1", "Ali Osman", None)
        .await
        .expect("student");

    let now = Utc::now();
    db.insert_engagement_metric(&metric(&student.id, &session.id, (80, 60, 72), now))
        .await
        .expect("insert metric");
    db.insert_engagement_metric(&metric(
        &student.id,
        &session.id,
        (60, 40, 52),
        now + Duration::seconds(5),
    ))
    .await
    .expect("insert metric");

    let avg = db
        .average_scores_for_student(&student.id, &session.id)
        .await
        .expect("averages");
    assert_eq!(
        avg,
        ScoreAverages {
            attention: 70,
            participation: 50,
            overall: 62,
        }
    );
}

#[tokio::test]
async fn session_metrics_list_newest_first() {
    let (_dir, db) = open_db();
    let session = db.create_session("Period 1").await.expect("session");
    let student = db
        .create_student("S-1", "Ali Osman", None)
        .await
        .expect("student");

    let now = Utc::now();
    db.insert_engagement_metric(&metric(&student.id, &session.id, (80, 60, 72), now))
        .await
        .expect("insert metric");
    let newest = db
        .insert_engagement_metric(&metric(
            &student.id,
            &session.id,
            (60, 40, 52),
            now + Duration::seconds(5),
        ))
        .await
        .expect("insert metric");

    let metrics = db
        .list_metrics_for_session(&session.id)
        .await
        .expect("list metrics");
    assert_eq!(metrics.len(), 2);
    assert_eq!(metrics[0].id, newest.id);

    let latest = db
        .latest_metric_for_student(&student.id, &session.id)
        .await
        .expect("latest")
        .expect("latest exists");
    assert_eq!(latest.id, newest.id);
    assert_eq!(latest.attention_score, 60);
}

#[tokio::test]
async fn latest_is_none_without_metrics() {
    let (_dir, db) = open_db();
    let session = db.create_session("Period 1").await.expect("session");
    let student = db
        .create_student("S-1", "Ali Osman", None)
        .await
        .expect("student");

    let latest = db
        .latest_metric_for_student(&student.id, &session.id)
        .await
        .expect("latest");
    assert!(latest.is_none());
}

#[tokio::test]
async fn recording_against_a_missing_student_fails() {
    let (_dir, db) = open_db();
    let session = db.create_session("Period 1").await.expect("session");

    let result = db
        .insert_engagement_metric(&metric("no-such-student", &session.id, (80, 60, 72), Utc::now()))
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn deleting_a_student_cascades_its_metrics() {
    let (_dir, db) = open_db();
    let session = db.create_session("Period 1").await.expect("session");
    let ali = db
        .create_student("S-1", "Ali Osman", None)
        .await
        .expect("student");
    let maya = db
        .create_student("S-2", "Maya Chen", None)
        .await
        .expect("student");

    let now = Utc::now();
    db.insert_engagement_metric(&metric(&ali.id, &session.id, (80, 60, 72), now))
        .await
        .expect("insert metric");
    db.insert_engagement_metric(&metric(&maya.id, &session.id, (60, 40, 52), now))
        .await
        .expect("insert metric");

    db.delete_student(&ali.id).await.expect("delete student");

    let metrics = db
        .list_metrics_for_session(&session.id)
        .await
        .expect("list metrics");
    assert_eq!(metrics.len(), 1);
    assert_eq!(metrics[0].student_id, maya.id);
}
