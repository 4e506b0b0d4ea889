mod controller;
mod loop_worker;
mod state;

pub use controller::MonitorController;
pub use loop_worker::monitoring_loop;
pub use state::{EngagementBoard, Roster, StudentEngagement};
