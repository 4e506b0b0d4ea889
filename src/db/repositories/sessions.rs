use anyhow::{anyhow, Result};
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use crate::db::{
    connection::Database,
    helpers::{parse_datetime, parse_optional_datetime, parse_status},
    models::{EngagementSession, SessionStatus},
};
use crate::error::SessionError;

fn row_to_session(row: &Row) -> Result<EngagementSession> {
    let start_time: String = row.get("start_time")?;
    let end_time: Option<String> = row.get("end_time")?;
    let created_at: String = row.get("created_at")?;
    let status: String = row.get("status")?;

    Ok(EngagementSession {
        id: row.get("id")?,
        session_name: row.get("session_name")?,
        start_time: parse_datetime(&start_time, "start_time")?,
        end_time: parse_optional_datetime(end_time, "end_time")?,
        status: parse_status(&status)?,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

impl Database {
    /// Open a monitoring session. Fails with `SessionError::AlreadyActive`
    /// when another session is still active; the check and the insert run
    /// in the same store task so concurrent starts cannot both win.
    pub async fn create_session(&self, session_name: &str) -> Result<EngagementSession> {
        let session_name = session_name.to_string();
        self.execute(move |conn| {
            let active: Option<String> = conn
                .query_row(
                    "SELECT id FROM engagement_sessions
                     WHERE status = 'active'
                     ORDER BY start_time DESC
                     LIMIT 1",
                    [],
                    |row| row.get(0),
                )
                .optional()?;

            if let Some(id) = active {
                return Err(SessionError::AlreadyActive(id).into());
            }

            let now = Utc::now();
            let session = EngagementSession {
                id: Uuid::new_v4().to_string(),
                session_name,
                start_time: now,
                end_time: None,
                status: SessionStatus::Active,
                created_at: now,
            };

            conn.execute(
                "INSERT INTO engagement_sessions (id, session_name, start_time, end_time, status, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    session.id,
                    session.session_name,
                    session.start_time.to_rfc3339(),
                    session.end_time.as_ref().map(|dt| dt.to_rfc3339()),
                    session.status.as_str(),
                    session.created_at.to_rfc3339(),
                ],
            )?;

            Ok(session)
        })
        .await
    }

    pub async fn get_active_session(&self) -> Result<Option<EngagementSession>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, session_name, start_time, end_time, status, created_at
                 FROM engagement_sessions
                 WHERE status = 'active'
                 ORDER BY start_time DESC
                 LIMIT 1",
            )?;

            let mut rows = stmt.query([])?;
            let session = match rows.next()? {
                Some(row) => Some(row_to_session(row)?),
                None => None,
            };
            Ok(session)
        })
        .await
    }

    /// Close a session. The update is guarded on status=active, so ending
    /// a session that was already completed changes nothing and succeeds;
    /// an unknown id is an error.
    pub async fn end_session(&self, session_id: &str) -> Result<()> {
        let session_id = session_id.to_string();
        self.execute(move |conn| {
            let ended_at = Utc::now();
            let rows_affected = conn.execute(
                "UPDATE engagement_sessions
                 SET status = 'completed',
                     end_time = ?1
                 WHERE id = ?2 AND status = 'active'",
                params![ended_at.to_rfc3339(), session_id],
            )?;

            if rows_affected == 0 {
                let exists: Option<String> = conn
                    .query_row(
                        "SELECT id FROM engagement_sessions WHERE id = ?1",
                        params![session_id],
                        |row| row.get(0),
                    )
                    .optional()?;

                if exists.is_none() {
                    return Err(anyhow!("Session not found"));
                }
            }

            Ok(())
        })
        .await
    }

    pub async fn list_sessions(&self) -> Result<Vec<EngagementSession>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, session_name, start_time, end_time, status, created_at
                 FROM engagement_sessions
                 ORDER BY start_time DESC",
            )?;

            let mut rows = stmt.query([])?;
            let mut sessions = Vec::new();
            while let Some(row) = rows.next()? {
                sessions.push(row_to_session(row)?);
            }

            Ok(sessions)
        })
        .await
    }
}
