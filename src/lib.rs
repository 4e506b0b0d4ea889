pub mod dashboard;
pub mod db;
pub mod engagement;
pub mod error;
pub mod monitor;
pub mod settings;
pub mod utils;

pub use dashboard::DashboardController;
pub use db::{
    models::{EngagementMetric, EngagementSession, ScoreAverages, SessionStatus, Student},
    Database,
};
pub use engagement::{EngagementReading, HeadPosition, ScoreGenerator};
pub use error::{SessionError, ValidationError};
pub use monitor::{EngagementBoard, MonitorController, Roster, StudentEngagement};
pub use settings::{MonitorCadence, MonitorView, SettingsStore};
