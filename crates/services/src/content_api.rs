use async_trait::async_trait;

use course_core::model::{
    CourseHomepage, CourseId, CourseSummary, LessonCheckpoint, LessonProgressRecord, ProjectId,
};

use crate::error::ContentApiError;

/// Server-side collaborator for the course homepage.
///
/// Mutations return nothing beyond success; callers refetch the homepage to observe
/// the new enrollment and progress.
#[async_trait]
pub trait ContentApi: Send + Sync {
    /// # Errors
    ///
    /// Returns `ContentApiError` if the catalog cannot be loaded.
    async fn list_courses(&self) -> Result<Vec<CourseSummary>, ContentApiError>;

    /// Load the course, raw progress and enrollment in one payload.
    ///
    /// # Errors
    ///
    /// Returns `ContentApiError::NotFound` for an unknown course.
    async fn get_course_homepage(
        &self,
        course_id: &CourseId,
    ) -> Result<CourseHomepage, ContentApiError>;

    /// # Errors
    ///
    /// Returns `ContentApiError::Rejected` with the server message when enrolling is refused.
    async fn enroll(&self, course_id: &CourseId) -> Result<(), ContentApiError>;

    /// Finish the course, keeping progress.
    ///
    /// # Errors
    ///
    /// Returns `ContentApiError::IncompleteProjects` when projects still block completion.
    async fn complete_course(&self, course_id: &CourseId) -> Result<(), ContentApiError>;

    /// Leave the course. Progress is deleted.
    ///
    /// # Errors
    ///
    /// Returns `ContentApiError::Rejected` when there is no active enrollment.
    async fn unenroll(&self, course_id: &CourseId) -> Result<(), ContentApiError>;

    /// # Errors
    ///
    /// Returns `ContentApiError` if the checkpoint is refused or cannot be stored.
    async fn save_lesson_progress(
        &self,
        course_id: &CourseId,
        checkpoint: &LessonCheckpoint,
    ) -> Result<LessonProgressRecord, ContentApiError>;

    /// Record a project as completed once its requirements hold.
    ///
    /// # Errors
    ///
    /// Returns `ContentApiError::Rejected` when the requirements are not met.
    async fn complete_project(
        &self,
        course_id: &CourseId,
        project_id: &ProjectId,
    ) -> Result<(), ContentApiError>;
}
