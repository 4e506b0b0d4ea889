use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use log::info;
use tokio::sync::Mutex;
use tokio::time::Duration;

use crate::db::{
    models::{EngagementSession, Student},
    Database,
};
use crate::engagement::{EngagementReading, HeadPosition, ScoreGenerator};
use crate::monitor::{EngagementBoard, MonitorController, Roster, StudentEngagement};

// Neutral seeds shown before a student has any recorded average.
const PLACEHOLDER_ATTENTION: u8 = 70;
const PLACEHOLDER_PARTICIPATION: u8 = 75;
const PLACEHOLDER_OVERALL: u8 = 72;

/// Orchestrates one view of the classroom: roster, active session, the
/// engagement board the renderer reads, and the monitoring loop that
/// feeds it. All state lives here and is handed to collaborators by
/// clonable handle.
#[derive(Clone)]
pub struct DashboardController {
    db: Database,
    roster: Roster,
    board: EngagementBoard,
    monitor: Arc<Mutex<MonitorController>>,
    active_session: Arc<Mutex<Option<EngagementSession>>>,
    tick_interval: Duration,
}

impl DashboardController {
    pub fn new(db: Database, tick_interval: Duration) -> Self {
        Self {
            db,
            roster: Roster::new(),
            board: EngagementBoard::new(),
            monitor: Arc::new(Mutex::new(MonitorController::new())),
            active_session: Arc::new(Mutex::new(None)),
            tick_interval,
        }
    }

    /// Fetch the roster and any active session from the store. When both
    /// exist, the board is seeded from each student's session averages so
    /// cards render before the first tick, and monitoring resumes.
    pub async fn load(&self) -> Result<()> {
        let students = self.db.list_students().await?;
        let session = self.db.get_active_session().await?;

        self.roster.replace(students.clone()).await;
        *self.active_session.lock().await = session.clone();

        if let Some(session) = session {
            if !students.is_empty() {
                for student in students {
                    let avg = self
                        .db
                        .average_scores_for_student(&student.id, &session.id)
                        .await?;

                    // A zero component means nothing recorded yet; fall
                    // back to the neutral placeholders.
                    let reading = EngagementReading {
                        attention_score: non_zero_or(avg.attention, PLACEHOLDER_ATTENTION),
                        participation_score: non_zero_or(
                            avg.participation,
                            PLACEHOLDER_PARTICIPATION,
                        ),
                        overall_score: non_zero_or(avg.overall, PLACEHOLDER_OVERALL),
                        head_position: HeadPosition::Center,
                        eye_contact: true,
                    };

                    self.board.update(student, reading, Utc::now()).await;
                }

                self.ensure_monitoring(&session.id).await;
            }
        }

        Ok(())
    }

    /// Open a session and start monitoring if any students are enrolled.
    pub async fn start_session(&self, session_name: &str) -> Result<EngagementSession> {
        let session = self.db.create_session(session_name).await?;
        info!("session {} ({}) started", session.id, session.session_name);

        *self.active_session.lock().await = Some(session.clone());
        self.ensure_monitoring(&session.id).await;

        Ok(session)
    }

    /// End the active session: the loop drains first, then the session is
    /// marked completed and the board is cleared. No-op when nothing is
    /// active.
    pub async fn end_session(&self) -> Result<()> {
        let session = { self.active_session.lock().await.clone() };
        let Some(session) = session else {
            return Ok(());
        };

        self.monitor.lock().await.stop_monitoring().await?;
        self.db.end_session(&session.id).await?;

        *self.active_session.lock().await = None;
        self.board.clear().await;
        info!("session {} ended", session.id);

        Ok(())
    }

    /// Register a student. A duplicate user-facing code fails with
    /// `ValidationError::DuplicateStudentId` and leaves the roster
    /// unchanged. During an active session the new card is seeded with one
    /// generated (unpersisted) reading so it renders before the next tick.
    pub async fn add_student(
        &self,
        student_code: &str,
        name: &str,
        class_section: Option<&str>,
    ) -> Result<Student> {
        let student = self
            .db
            .create_student(student_code, name, class_section)
            .await?;

        self.roster.add(student.clone()).await;

        let session = { self.active_session.lock().await.clone() };
        if let Some(session) = session {
            let reading = ScoreGenerator::from_entropy().generate();
            self.board.update(student.clone(), reading, Utc::now()).await;
            self.ensure_monitoring(&session.id).await;
        }

        Ok(student)
    }

    /// Remove a student from the store, the roster, and the board. The
    /// loop reads the roster fresh each tick, so no stale reference
    /// survives; when the roster empties the loop is stopped outright.
    pub async fn remove_student(&self, student_id: &str) -> Result<()> {
        self.db.delete_student(student_id).await?;
        self.roster.remove(student_id).await;
        self.board.remove(student_id).await;

        if self.roster.is_empty().await {
            self.monitor.lock().await.stop_monitoring().await?;
        }

        Ok(())
    }

    /// Tear down the loop when the owning view goes away. The session
    /// stays active; a later `load` resumes monitoring.
    pub async fn shutdown(&self) -> Result<()> {
        self.monitor.lock().await.stop_monitoring().await
    }

    pub async fn active_session(&self) -> Option<EngagementSession> {
        self.active_session.lock().await.clone()
    }

    pub async fn engagements(&self) -> HashMap<String, StudentEngagement> {
        self.board.snapshot().await
    }

    pub async fn class_score(&self) -> u8 {
        self.board.class_score().await
    }

    pub fn roster(&self) -> Roster {
        self.roster.clone()
    }

    pub fn board(&self) -> EngagementBoard {
        self.board.clone()
    }

    pub async fn is_monitoring(&self) -> bool {
        self.monitor.lock().await.is_running()
    }

    async fn ensure_monitoring(&self, session_id: &str) {
        if self.roster.is_empty().await {
            return;
        }

        self.monitor.lock().await.start_monitoring(
            session_id.to_string(),
            self.db.clone(),
            self.roster.clone(),
            self.board.clone(),
            ScoreGenerator::from_entropy(),
            self.tick_interval,
        );
    }
}

fn non_zero_or(value: u8, fallback: u8) -> u8 {
    if value == 0 {
        fallback
    } else {
        value
    }
}
