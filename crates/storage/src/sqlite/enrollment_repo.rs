use course_core::model::CourseId;

use super::SqliteRepository;
use super::mapping::{conn, map_enrollment_row};
use crate::repository::{EnrollmentRecord, EnrollmentRepository, StorageError};

#[async_trait::async_trait]
impl EnrollmentRepository for SqliteRepository {
    async fn get_enrollment(
        &self,
        course_id: &CourseId,
    ) -> Result<Option<EnrollmentRecord>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, status, enrolled_at, ended_at
            FROM enrollments
            WHERE course_id = ?1
            ",
        )
        .bind(course_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        row.as_ref().map(map_enrollment_row).transpose()
    }

    async fn upsert_enrollment(
        &self,
        course_id: &CourseId,
        record: &EnrollmentRecord,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO enrollments (course_id, id, status, enrolled_at, ended_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(course_id) DO UPDATE SET
                id = excluded.id,
                status = excluded.status,
                enrolled_at = excluded.enrolled_at,
                ended_at = excluded.ended_at
            ",
        )
        .bind(course_id.as_str())
        .bind(record.id.as_str())
        .bind(record.status.as_str())
        .bind(record.enrolled_at)
        .bind(record.ended_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => StorageError::Conflict,
            _ => conn(e),
        })?;

        Ok(())
    }

    async fn delete_enrollment(&self, course_id: &CourseId) -> Result<(), StorageError> {
        let res = sqlx::query("DELETE FROM enrollments WHERE course_id = ?1")
            .bind(course_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}
