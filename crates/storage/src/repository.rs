use async_trait::async_trait;
use chrono::{DateTime, Utc};
use course_core::model::{
    Course, CourseId, CourseProgress, Enrollment, EnrollmentId, EnrollmentStatus,
    LessonCheckpoint, LessonProgressRecord, ProjectId,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape for an enrollment row.
///
/// The homepage payload only exposes id and status; timestamps stay in storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentRecord {
    pub id: EnrollmentId,
    pub status: EnrollmentStatus,
    pub enrolled_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl EnrollmentRecord {
    #[must_use]
    pub fn active(enrolled_at: DateTime<Utc>) -> Self {
        Self {
            id: EnrollmentId::generate(),
            status: EnrollmentStatus::Active,
            enrolled_at,
            ended_at: None,
        }
    }

    #[must_use]
    pub fn ended(mut self, at: DateTime<Utc>) -> Self {
        self.status = EnrollmentStatus::Ended;
        self.ended_at = Some(at);
        self
    }

    #[must_use]
    pub fn to_enrollment(&self) -> Enrollment {
        Enrollment {
            id: Some(self.id.clone()),
            status: Some(self.status),
        }
    }
}

/// Repository contract for course structure.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Persist or replace a course definition.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the course cannot be stored.
    async fn upsert_course(&self, course: &Course) -> Result<(), StorageError>;

    /// Fetch a course by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failure. A missing course is `Ok(None)`.
    async fn get_course(&self, id: &CourseId) -> Result<Option<Course>, StorageError>;

    /// List every stored course ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failure.
    async fn list_courses(&self) -> Result<Vec<Course>, StorageError>;
}

/// Repository contract for raw learner progress.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Load all raw progress for a course. Missing records yield empty progress.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failure.
    async fn load_progress(&self, course_id: &CourseId) -> Result<CourseProgress, StorageError>;

    /// Apply a lesson checkpoint and return the updated record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn save_checkpoint(
        &self,
        course_id: &CourseId,
        checkpoint: &LessonCheckpoint,
        at: DateTime<Utc>,
    ) -> Result<LessonProgressRecord, StorageError>;

    /// Record a project completion. Returns the stored timestamp; the first one wins.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the completion cannot be stored.
    async fn mark_project_completed(
        &self,
        course_id: &CourseId,
        project_id: &ProjectId,
        at: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, StorageError>;

    /// Delete all progress for a course.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failure.
    async fn clear_progress(&self, course_id: &CourseId) -> Result<(), StorageError>;
}

/// Repository contract for the learner's enrollment in each course.
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` on backend failure.
    async fn get_enrollment(
        &self,
        course_id: &CourseId,
    ) -> Result<Option<EnrollmentRecord>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn upsert_enrollment(
        &self,
        course_id: &CourseId,
        record: &EnrollmentRecord,
    ) -> Result<(), StorageError>;

    /// Remove the enrollment for a course.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if there was nothing to remove.
    async fn delete_enrollment(&self, course_id: &CourseId) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    courses: Arc<Mutex<HashMap<CourseId, Course>>>,
    progress: Arc<Mutex<HashMap<CourseId, CourseProgress>>>,
    enrollments: Arc<Mutex<HashMap<CourseId, EnrollmentRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl CourseRepository for InMemoryRepository {
    async fn upsert_course(&self, course: &Course) -> Result<(), StorageError> {
        let mut guard = self.courses.lock().map_err(poisoned)?;
        guard.insert(course.id.clone(), course.clone());
        Ok(())
    }

    async fn get_course(&self, id: &CourseId) -> Result<Option<Course>, StorageError> {
        let guard = self.courses.lock().map_err(poisoned)?;
        Ok(guard.get(id).cloned())
    }

    async fn list_courses(&self) -> Result<Vec<Course>, StorageError> {
        let guard = self.courses.lock().map_err(poisoned)?;
        let mut courses: Vec<Course> = guard.values().cloned().collect();
        courses.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(courses)
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn load_progress(&self, course_id: &CourseId) -> Result<CourseProgress, StorageError> {
        let guard = self.progress.lock().map_err(poisoned)?;
        Ok(guard.get(course_id).cloned().unwrap_or_default())
    }

    async fn save_checkpoint(
        &self,
        course_id: &CourseId,
        checkpoint: &LessonCheckpoint,
        at: DateTime<Utc>,
    ) -> Result<LessonProgressRecord, StorageError> {
        let mut guard = self.progress.lock().map_err(poisoned)?;
        let progress = guard.entry(course_id.clone()).or_default();
        progress.record_checkpoint(checkpoint, at);
        progress
            .lesson(&checkpoint.lesson_id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn mark_project_completed(
        &self,
        course_id: &CourseId,
        project_id: &ProjectId,
        at: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, StorageError> {
        let mut guard = self.progress.lock().map_err(poisoned)?;
        let progress = guard.entry(course_id.clone()).or_default();
        progress.mark_project_completed(project_id, at);
        progress
            .project_completed_at(project_id)
            .ok_or(StorageError::NotFound)
    }

    async fn clear_progress(&self, course_id: &CourseId) -> Result<(), StorageError> {
        let mut guard = self.progress.lock().map_err(poisoned)?;
        guard.remove(course_id);
        Ok(())
    }
}

#[async_trait]
impl EnrollmentRepository for InMemoryRepository {
    async fn get_enrollment(
        &self,
        course_id: &CourseId,
    ) -> Result<Option<EnrollmentRecord>, StorageError> {
        let guard = self.enrollments.lock().map_err(poisoned)?;
        Ok(guard.get(course_id).cloned())
    }

    async fn upsert_enrollment(
        &self,
        course_id: &CourseId,
        record: &EnrollmentRecord,
    ) -> Result<(), StorageError> {
        let mut guard = self.enrollments.lock().map_err(poisoned)?;
        guard.insert(course_id.clone(), record.clone());
        Ok(())
    }

    async fn delete_enrollment(&self, course_id: &CourseId) -> Result<(), StorageError> {
        let mut guard = self.enrollments.lock().map_err(poisoned)?;
        guard
            .remove(course_id)
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }
}

/// Aggregates the course repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub courses: Arc<dyn CourseRepository>,
    pub progress: Arc<dyn ProgressRepository>,
    pub enrollments: Arc<dyn EnrollmentRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let courses: Arc<dyn CourseRepository> = Arc::new(repo.clone());
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo.clone());
        let enrollments: Arc<dyn EnrollmentRepository> = Arc::new(repo);
        Self {
            courses,
            progress,
            enrollments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::model::sample::{sample_course, sample_course_id};
    use course_core::model::LessonId;
    use course_core::time::fixed_now;

    #[tokio::test]
    async fn missing_progress_is_empty() {
        let repo = InMemoryRepository::new();
        let progress = repo.load_progress(&sample_course_id()).await.unwrap();
        assert_eq!(progress, CourseProgress::default());
    }

    #[tokio::test]
    async fn checkpoints_accumulate_per_course() {
        let repo = InMemoryRepository::new();
        let course_id = sample_course_id();
        repo.upsert_course(&sample_course()).await.unwrap();

        for step in [0, 2] {
            repo.save_checkpoint(
                &course_id,
                &LessonCheckpoint {
                    lesson_id: LessonId::new("L1"),
                    step,
                    draft: None,
                    complete_step: true,
                },
                fixed_now(),
            )
            .await
            .unwrap();
        }

        let progress = repo.load_progress(&course_id).await.unwrap();
        let record = progress.lesson(&LessonId::new("L1")).unwrap();
        assert_eq!(record.completed_steps.len(), 2);
        assert_eq!(record.last_step, Some(2));
        assert!(
            repo.load_progress(&CourseId::new("other"))
                .await
                .unwrap()
                .lessons
                .is_empty()
        );

        repo.clear_progress(&course_id).await.unwrap();
        assert!(repo.load_progress(&course_id).await.unwrap().lessons.is_empty());
    }

    #[tokio::test]
    async fn enrollment_lifecycle_round_trips() {
        let repo = InMemoryRepository::new();
        let course_id = sample_course_id();
        let record = EnrollmentRecord::active(fixed_now());
        repo.upsert_enrollment(&course_id, &record).await.unwrap();
        let stored = repo.get_enrollment(&course_id).await.unwrap().unwrap();
        assert!(stored.to_enrollment().is_enrolled());

        repo.upsert_enrollment(&course_id, &stored.clone().ended(fixed_now()))
            .await
            .unwrap();
        let ended = repo.get_enrollment(&course_id).await.unwrap().unwrap();
        assert!(!ended.to_enrollment().is_enrolled());

        repo.delete_enrollment(&course_id).await.unwrap();
        assert!(repo.get_enrollment(&course_id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete_enrollment(&course_id).await,
            Err(StorageError::NotFound)
        ));
    }
}
