use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};

use crate::db::models::SessionStatus;
use crate::engagement::HeadPosition;

pub fn to_score(value: i64, field: &str) -> Result<u8> {
    if !(0..=100).contains(&value) {
        return Err(anyhow!("{field} value {value} is outside [0,100]"));
    }
    Ok(value as u8)
}

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

pub fn parse_optional_datetime(
    value: Option<String>,
    field: &str,
) -> Result<Option<DateTime<Utc>>> {
    match value {
        Some(raw) => parse_datetime(&raw, field).map(Some),
        None => Ok(None),
    }
}

pub fn parse_status(value: &str) -> Result<SessionStatus> {
    match value {
        "active" => Ok(SessionStatus::Active),
        "completed" => Ok(SessionStatus::Completed),
        other => Err(anyhow!("unknown session status {other}")),
    }
}

pub fn parse_head_position(value: &str) -> Result<HeadPosition> {
    match value {
        "center" => Ok(HeadPosition::Center),
        "left" => Ok(HeadPosition::Left),
        "right" => Ok(HeadPosition::Right),
        "down" => Ok(HeadPosition::Down),
        other => Err(anyhow!("unknown head position {other}")),
    }
}
