use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use crate::db::{connection::Database, helpers::parse_datetime, models::Student};
use crate::error::ValidationError;

fn row_to_student(row: &Row) -> Result<Student> {
    let created_at: String = row.get("created_at")?;

    Ok(Student {
        id: row.get("id")?,
        student_id: row.get("student_id")?,
        name: row.get("name")?,
        class_section: row.get("class_section")?,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

impl Database {
    /// Register a student. Fails with `ValidationError::DuplicateStudentId`
    /// when the user-facing code is already taken; the roster is untouched.
    pub async fn create_student(
        &self,
        student_code: &str,
        name: &str,
        class_section: Option<&str>,
    ) -> Result<Student> {
        let student_code = student_code.to_string();
        let name = name.to_string();
        let class_section = class_section.map(|s| s.to_string());

        self.execute(move |conn| {
            // Check inside the same store task as the insert so two
            // concurrent creates cannot both pass.
            let existing: Option<String> = conn
                .query_row(
                    "SELECT id FROM students WHERE student_id = ?1",
                    params![student_code],
                    |row| row.get(0),
                )
                .optional()?;

            if existing.is_some() {
                return Err(ValidationError::DuplicateStudentId(student_code).into());
            }

            let now = Utc::now();
            let student = Student {
                id: Uuid::new_v4().to_string(),
                student_id: student_code,
                name,
                class_section,
                created_at: now,
            };

            conn.execute(
                "INSERT INTO students (id, student_id, name, class_section, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    student.id,
                    student.student_id,
                    student.name,
                    student.class_section,
                    student.created_at.to_rfc3339(),
                ],
            )?;

            Ok(student)
        })
        .await
    }

    pub async fn list_students(&self) -> Result<Vec<Student>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, student_id, name, class_section, created_at
                 FROM students
                 ORDER BY name ASC",
            )?;

            let mut rows = stmt.query([])?;
            let mut students = Vec::new();
            while let Some(row) = rows.next()? {
                students.push(row_to_student(row)?);
            }

            Ok(students)
        })
        .await
    }

    /// Delete a student.
    ///
    /// Note: `engagement_metrics` rows are removed via the ON DELETE
    /// CASCADE foreign key. Deleting an id that is already gone is not an
    /// error.
    pub async fn delete_student(&self, student_id: &str) -> Result<()> {
        let student_id = student_id.to_string();
        self.execute(move |conn| {
            conn.execute(
                "DELETE FROM students WHERE id = ?1",
                params![student_id],
            )?;
            Ok(())
        })
        .await
    }
}
