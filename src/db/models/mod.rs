mod metric;
mod session;
mod student;

pub use metric::{EngagementMetric, ScoreAverages};
pub use session::{EngagementSession, SessionStatus};
pub use student::Student;
