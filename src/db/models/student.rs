use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered member of the roster. Created and deleted explicitly,
/// never mutated in between.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    /// User-facing code, unique across the roster.
    pub student_id: String,
    pub name: String,
    pub class_section: Option<String>,
    pub created_at: DateTime<Utc>,
}
