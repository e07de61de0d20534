use chrono::Utc;
use course_core::model::{Course, CourseId};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{conn, ser};
use crate::repository::{CourseRepository, StorageError};

#[async_trait::async_trait]
impl CourseRepository for SqliteRepository {
    async fn upsert_course(&self, course: &Course) -> Result<(), StorageError> {
        let body = serde_json::to_string(course).map_err(ser)?;

        sqlx::query(
            r"
            INSERT INTO courses (id, title, body, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                body = excluded.body,
                updated_at = excluded.updated_at
            ",
        )
        .bind(course.id.as_str())
        .bind(course.title.as_str())
        .bind(body)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }

    async fn get_course(&self, id: &CourseId) -> Result<Option<Course>, StorageError> {
        let row = sqlx::query("SELECT body FROM courses WHERE id = ?1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        match row {
            Some(row) => course_from_body(&row.try_get::<String, _>("body").map_err(ser)?).map(Some),
            None => Ok(None),
        }
    }

    async fn list_courses(&self) -> Result<Vec<Course>, StorageError> {
        let rows = sqlx::query("SELECT body FROM courses ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;

        let mut courses = Vec::with_capacity(rows.len());
        for row in rows {
            courses.push(course_from_body(
                &row.try_get::<String, _>("body").map_err(ser)?,
            )?);
        }
        Ok(courses)
    }
}

fn course_from_body(body: &str) -> Result<Course, StorageError> {
    serde_json::from_str(body).map_err(ser)
}
