mod generator;
mod reading;

pub use generator::ScoreGenerator;
pub use reading::{EngagementReading, HeadPosition};
