use serde::{Deserialize, Serialize};

/// Coarse head orientation attached to every reading.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HeadPosition {
    Center,
    Left,
    Right,
    Down,
}

impl HeadPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeadPosition::Center => "center",
            HeadPosition::Left => "left",
            HeadPosition::Right => "right",
            HeadPosition::Down => "down",
        }
    }
}

/// One synthetic engagement measurement for a student at a point in time.
/// All scores are bounded to [0,100].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EngagementReading {
    pub attention_score: u8,
    pub participation_score: u8,
    pub overall_score: u8,
    pub head_position: HeadPosition,
    pub eye_contact: bool,
}
