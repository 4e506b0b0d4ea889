use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::db::models::Student;
use crate::engagement::EngagementReading;

/// Latest reading for one student, as the renderer sees it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentEngagement {
    pub student: Student,
    pub reading: EngagementReading,
    pub sampled_at: DateTime<Utc>,
}

/// Latest-reading map keyed by student id. A clonable handle owned by the
/// view controller and shared with the monitoring loop; there is no
/// ambient global.
#[derive(Clone, Default)]
pub struct EngagementBoard {
    inner: Arc<Mutex<HashMap<String, StudentEngagement>>>,
}

impl EngagementBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn update(
        &self,
        student: Student,
        reading: EngagementReading,
        sampled_at: DateTime<Utc>,
    ) {
        let mut guard = self.inner.lock().await;
        guard.insert(
            student.id.clone(),
            StudentEngagement {
                student,
                reading,
                sampled_at,
            },
        );
    }

    pub async fn remove(&self, student_id: &str) {
        self.inner.lock().await.remove(student_id);
    }

    pub async fn clear(&self) {
        self.inner.lock().await.clear();
    }

    pub async fn get(&self, student_id: &str) -> Option<StudentEngagement> {
        self.inner.lock().await.get(student_id).cloned()
    }

    pub async fn snapshot(&self) -> HashMap<String, StudentEngagement> {
        self.inner.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }

    /// Class-wide engagement: rounded mean of the latest overall scores,
    /// zero when nothing has been sampled yet.
    pub async fn class_score(&self) -> u8 {
        let guard = self.inner.lock().await;
        if guard.is_empty() {
            return 0;
        }

        let sum: u32 = guard
            .values()
            .map(|entry| u32::from(entry.reading.overall_score))
            .sum();

        (f64::from(sum) / guard.len() as f64).round() as u8
    }
}

/// The current set of registered students, shared between the view
/// controller and the monitoring loop.
#[derive(Clone, Default)]
pub struct Roster {
    inner: Arc<Mutex<Vec<Student>>>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn replace(&self, students: Vec<Student>) {
        *self.inner.lock().await = students;
    }

    pub async fn add(&self, student: Student) {
        self.inner.lock().await.push(student);
    }

    pub async fn remove(&self, student_id: &str) {
        self.inner.lock().await.retain(|s| s.id != student_id);
    }

    pub async fn snapshot(&self) -> Vec<Student> {
        self.inner.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}
