use chrono::Utc;
use log::{error, info};
use rand::Rng;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::db::{models::EngagementMetric, Database};
use crate::engagement::ScoreGenerator;

use super::state::{EngagementBoard, Roster};

/// Periodic driver for an active session: every tick, score each student
/// on the roster, persist the reading, and publish it to the board.
///
/// Exits when cancelled or when the roster becomes empty. Cancellation is
/// only observed between ticks, so a tick that is mid-write finishes
/// before the task ends.
pub async fn monitoring_loop<R: Rng>(
    session_id: String,
    db: Database,
    roster: Roster,
    board: EngagementBoard,
    mut generator: ScoreGenerator<R>,
    tick_interval: Duration,
    cancel_token: CancellationToken,
) {
    // First tick lands one full interval after start, matching the cadence
    // the views expect.
    let mut ticker = interval_at(Instant::now() + tick_interval, tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let students = roster.snapshot().await;
                if students.is_empty() {
                    info!("roster empty, monitoring loop for session {} exiting", session_id);
                    break;
                }

                let timestamp = Utc::now();
                for student in students {
                    let reading = generator.generate();
                    let metric = EngagementMetric {
                        id: None,
                        student_id: student.id.clone(),
                        session_id: session_id.clone(),
                        attention_score: reading.attention_score,
                        participation_score: reading.participation_score,
                        overall_score: reading.overall_score,
                        head_position: reading.head_position,
                        eye_contact: reading.eye_contact,
                        timestamp,
                        notes: None,
                    };

                    // One student's failed write leaves the rest of the
                    // tick untouched.
                    match db.insert_engagement_metric(&metric).await {
                        Ok(_) => board.update(student, reading, timestamp).await,
                        Err(err) => error!(
                            "failed to record metric for student {} in session {}: {err:?}",
                            metric.student_id, session_id
                        ),
                    }
                }
            }
            _ = cancel_token.cancelled() => {
                info!("monitoring loop for session {} shutting down", session_id);
                break;
            }
        }
    }
}
