use chrono::{DateTime, Utc};
use course_core::model::{
    CourseId, CourseProgress, LessonCheckpoint, LessonProgressRecord, ProjectId,
};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{conn, encode_steps, map_lesson_progress_row, ser, step_to_i64};
use crate::repository::{ProgressRepository, StorageError};

#[async_trait::async_trait]
impl ProgressRepository for SqliteRepository {
    async fn load_progress(&self, course_id: &CourseId) -> Result<CourseProgress, StorageError> {
        let mut progress = CourseProgress::default();

        let rows = sqlx::query(
            r"
            SELECT lesson_id, completed_steps, last_step, draft, updated_at
            FROM lesson_progress
            WHERE course_id = ?1
            ",
        )
        .bind(course_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;
        for row in rows {
            let (lesson_id, record) = map_lesson_progress_row(&row)?;
            progress.lessons.insert(lesson_id, record);
        }

        let rows = sqlx::query(
            r"
            SELECT project_id, completed_at
            FROM project_completions
            WHERE course_id = ?1
            ",
        )
        .bind(course_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;
        for row in rows {
            let project_id = ProjectId::new(row.try_get::<String, _>("project_id").map_err(ser)?);
            let completed_at: DateTime<Utc> = row.try_get("completed_at").map_err(ser)?;
            progress.completed_projects.insert(project_id, completed_at);
        }

        Ok(progress)
    }

    async fn save_checkpoint(
        &self,
        course_id: &CourseId,
        checkpoint: &LessonCheckpoint,
        at: DateTime<Utc>,
    ) -> Result<LessonProgressRecord, StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;

        let existing = sqlx::query(
            r"
            SELECT lesson_id, completed_steps, last_step, draft, updated_at
            FROM lesson_progress
            WHERE course_id = ?1 AND lesson_id = ?2
            ",
        )
        .bind(course_id.as_str())
        .bind(checkpoint.lesson_id.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(conn)?;

        let mut progress = CourseProgress::default();
        if let Some(row) = existing {
            let (lesson_id, record) = map_lesson_progress_row(&row)?;
            progress.lessons.insert(lesson_id, record);
        }
        progress.record_checkpoint(checkpoint, at);
        let record = progress
            .lesson(&checkpoint.lesson_id)
            .cloned()
            .ok_or(StorageError::NotFound)?;

        sqlx::query(
            r"
            INSERT INTO lesson_progress (course_id, lesson_id, completed_steps, last_step, draft, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(course_id, lesson_id) DO UPDATE SET
                completed_steps = excluded.completed_steps,
                last_step = excluded.last_step,
                draft = excluded.draft,
                updated_at = excluded.updated_at
            ",
        )
        .bind(course_id.as_str())
        .bind(checkpoint.lesson_id.as_str())
        .bind(encode_steps(&record.completed_steps)?)
        .bind(step_to_i64(record.last_step))
        .bind(record.draft.as_deref())
        .bind(record.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        tx.commit().await.map_err(conn)?;
        Ok(record)
    }

    async fn mark_project_completed(
        &self,
        course_id: &CourseId,
        project_id: &ProjectId,
        at: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, StorageError> {
        sqlx::query(
            r"
            INSERT INTO project_completions (course_id, project_id, completed_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(course_id, project_id) DO NOTHING
            ",
        )
        .bind(course_id.as_str())
        .bind(project_id.as_str())
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        let row = sqlx::query(
            r"
            SELECT completed_at FROM project_completions
            WHERE course_id = ?1 AND project_id = ?2
            ",
        )
        .bind(course_id.as_str())
        .bind(project_id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(conn)?;

        row.try_get("completed_at").map_err(ser)
    }

    async fn clear_progress(&self, course_id: &CourseId) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;
        sqlx::query("DELETE FROM lesson_progress WHERE course_id = ?1")
            .bind(course_id.as_str())
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        sqlx::query("DELETE FROM project_completions WHERE course_id = ?1")
            .bind(course_id.as_str())
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        tx.commit().await.map_err(conn)?;
        Ok(())
    }
}
