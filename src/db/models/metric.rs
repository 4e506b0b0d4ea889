use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engagement::HeadPosition;

/// One persisted engagement reading tied to a (student, session) pair.
/// Append-only; `id` is assigned by the store on insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementMetric {
    pub id: Option<i64>,
    pub student_id: String,
    pub session_id: String,
    pub attention_score: u8,
    pub participation_score: u8,
    pub overall_score: u8,
    pub head_position: HeadPosition,
    pub eye_contact: bool,
    pub timestamp: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Per-column rounded means over a (student, session) pair. All zero when
/// no metrics have been recorded.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreAverages {
    pub attention: u8,
    pub participation: u8,
    pub overall: u8,
}

impl ScoreAverages {
    pub const ZERO: ScoreAverages = ScoreAverages {
        attention: 0,
        participation: 0,
        overall: 0,
    };
}
