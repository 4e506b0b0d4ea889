use anyhow::Result;
use rusqlite::{params, Row};

use crate::db::{
    connection::Database,
    helpers::{parse_datetime, parse_head_position, to_score},
    models::{EngagementMetric, ScoreAverages},
};

fn row_to_metric(row: &Row) -> Result<EngagementMetric> {
    let timestamp: String = row.get("timestamp")?;
    let head_position: String = row.get("head_position")?;

    Ok(EngagementMetric {
        id: row.get("id")?,
        student_id: row.get("student_id")?,
        session_id: row.get("session_id")?,
        attention_score: to_score(row.get("attention_score")?, "attention_score")?,
        participation_score: to_score(row.get("participation_score")?, "participation_score")?,
        overall_score: to_score(row.get("overall_score")?, "overall_score")?,
        head_position: parse_head_position(&head_position)?,
        eye_contact: row.get("eye_contact")?,
        timestamp: parse_datetime(&timestamp, "timestamp")?,
        notes: row.get("notes")?,
    })
}

fn round_mean(sum: i64, count: i64) -> u8 {
    (sum as f64 / count as f64).round() as u8
}

impl Database {
    /// Persist one reading for a (student, session) pair. The returned
    /// copy carries the id the store assigned. Fails when either side of
    /// the pair no longer exists (foreign key violation).
    pub async fn insert_engagement_metric(
        &self,
        metric: &EngagementMetric,
    ) -> Result<EngagementMetric> {
        let mut record = metric.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO engagement_metrics (
                    student_id,
                    session_id,
                    attention_score,
                    participation_score,
                    overall_score,
                    head_position,
                    eye_contact,
                    timestamp,
                    notes
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    record.student_id,
                    record.session_id,
                    i64::from(record.attention_score),
                    i64::from(record.participation_score),
                    i64::from(record.overall_score),
                    record.head_position.as_str(),
                    record.eye_contact,
                    record.timestamp.to_rfc3339(),
                    record.notes,
                ],
            )?;

            record.id = Some(conn.last_insert_rowid());
            Ok(record)
        })
        .await
    }

    /// Rounded per-column means for one student within one session.
    /// All-zero when nothing has been recorded yet.
    pub async fn average_scores_for_student(
        &self,
        student_id: &str,
        session_id: &str,
    ) -> Result<ScoreAverages> {
        let student_id = student_id.to_string();
        let session_id = session_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT attention_score, participation_score, overall_score
                 FROM engagement_metrics
                 WHERE student_id = ?1 AND session_id = ?2",
            )?;

            let mut rows = stmt.query(params![student_id, session_id])?;
            let mut attention: i64 = 0;
            let mut participation: i64 = 0;
            let mut overall: i64 = 0;
            let mut count: i64 = 0;

            while let Some(row) = rows.next()? {
                attention += row.get::<_, i64>(0)?;
                participation += row.get::<_, i64>(1)?;
                overall += row.get::<_, i64>(2)?;
                count += 1;
            }

            if count == 0 {
                return Ok(ScoreAverages::ZERO);
            }

            Ok(ScoreAverages {
                attention: round_mean(attention, count),
                participation: round_mean(participation, count),
                overall: round_mean(overall, count),
            })
        })
        .await
    }

    pub async fn list_metrics_for_session(
        &self,
        session_id: &str,
    ) -> Result<Vec<EngagementMetric>> {
        let session_id = session_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, student_id, session_id, attention_score, participation_score,
                        overall_score, head_position, eye_contact, timestamp, notes
                 FROM engagement_metrics
                 WHERE session_id = ?1
                 ORDER BY timestamp DESC",
            )?;

            let mut rows = stmt.query(params![session_id])?;
            let mut metrics = Vec::new();
            while let Some(row) = rows.next()? {
                metrics.push(row_to_metric(row)?);
            }

            Ok(metrics)
        })
        .await
    }

    pub async fn latest_metric_for_student(
        &self,
        student_id: &str,
        session_id: &str,
    ) -> Result<Option<EngagementMetric>> {
        let student_id = student_id.to_string();
        let session_id = session_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, student_id, session_id, attention_score, participation_score,
                        overall_score, head_position, eye_contact, timestamp, notes
                 FROM engagement_metrics
                 WHERE student_id = ?1 AND session_id = ?2
                 ORDER BY timestamp DESC
                 LIMIT 1",
            )?;

            let mut rows = stmt.query(params![student_id, session_id])?;
            let metric = match rows.next()? {
                Some(row) => Some(row_to_metric(row)?),
                None => None,
            };
            Ok(metric)
        })
        .await
    }
}
