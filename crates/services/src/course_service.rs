use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use course_core::model::{
    Course, CourseHomepage, CourseId, CourseSummary, Enrollment, IncompleteProjectsReport,
    LessonCheckpoint, LessonProgressRecord, ProjectId,
};
use course_core::progress::annotate;
use storage::repository::{
    CourseRepository, EnrollmentRecord, EnrollmentRepository, ProgressRepository, Storage,
};

use crate::Clock;
use crate::content_api::ContentApi;
use crate::error::{AppServicesError, ContentApiError};

/// Local content API backed by storage. Enforces the server-side rules.
#[derive(Clone)]
pub struct CourseService {
    clock: Clock,
    courses: Arc<dyn CourseRepository>,
    progress: Arc<dyn ProgressRepository>,
    enrollments: Arc<dyn EnrollmentRepository>,
}

impl CourseService {
    #[must_use]
    pub fn new(clock: Clock, storage: &Storage) -> Self {
        Self {
            clock,
            courses: Arc::clone(&storage.courses),
            progress: Arc::clone(&storage.progress),
            enrollments: Arc::clone(&storage.enrollments),
        }
    }

    /// Build a service backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::new(clock, &storage))
    }

    /// Store `course` unless a course with the same id already exists.
    ///
    /// Returns `true` when the course was inserted.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Storage` if repository access fails.
    pub async fn ensure_course(&self, course: &Course) -> Result<bool, AppServicesError> {
        if self.courses.get_course(&course.id).await?.is_some() {
            return Ok(false);
        }
        self.courses.upsert_course(course).await?;
        info!(course_id = %course.id, "stored course");
        Ok(true)
    }

    async fn course(&self, course_id: &CourseId) -> Result<Course, ContentApiError> {
        self.courses
            .get_course(course_id)
            .await?
            .ok_or(ContentApiError::NotFound)
    }

    async fn active_enrollment(
        &self,
        course_id: &CourseId,
    ) -> Result<EnrollmentRecord, ContentApiError> {
        self.enrollments
            .get_enrollment(course_id)
            .await?
            .filter(|record| record.to_enrollment().is_enrolled())
            .ok_or_else(|| ContentApiError::Rejected("You are not enrolled in this course.".into()))
    }

    async fn annotated(&self, course_id: &CourseId) -> Result<Course, ContentApiError> {
        let course = self.course(course_id).await?;
        let progress = self.progress.load_progress(course_id).await?;
        Ok(annotate(course, &progress))
    }
}

#[async_trait]
impl ContentApi for CourseService {
    async fn list_courses(&self) -> Result<Vec<CourseSummary>, ContentApiError> {
        let courses = self.courses.list_courses().await?;
        Ok(courses.iter().map(CourseSummary::from).collect())
    }

    async fn get_course_homepage(
        &self,
        course_id: &CourseId,
    ) -> Result<CourseHomepage, ContentApiError> {
        let course = self.course(course_id).await?;
        let progress = self.progress.load_progress(course_id).await?;
        let enrollment = self
            .enrollments
            .get_enrollment(course_id)
            .await?
            .map_or_else(Enrollment::none, |record| record.to_enrollment());
        Ok(CourseHomepage {
            course,
            progress,
            enrollment,
        })
    }

    async fn enroll(&self, course_id: &CourseId) -> Result<(), ContentApiError> {
        self.course(course_id).await?;
        if let Some(existing) = self.enrollments.get_enrollment(course_id).await?
            && existing.to_enrollment().is_enrolled()
        {
            return Err(ContentApiError::Rejected(
                "You are already enrolled in this course.".into(),
            ));
        }

        let record = EnrollmentRecord::active(self.clock.now());
        self.enrollments.upsert_enrollment(course_id, &record).await?;
        info!(%course_id, enrollment_id = %record.id, "enrolled");
        Ok(())
    }

    async fn complete_course(&self, course_id: &CourseId) -> Result<(), ContentApiError> {
        let record = self.active_enrollment(course_id).await?;
        let course = self.annotated(course_id).await?;

        let report = IncompleteProjectsReport::from_course(&course);
        if !report.is_empty() {
            debug!(%course_id, blocking = report.len(), "completion refused");
            return Err(ContentApiError::IncompleteProjects(report));
        }

        self.enrollments
            .upsert_enrollment(course_id, &record.ended(self.clock.now()))
            .await?;
        info!(%course_id, "course completed");
        Ok(())
    }

    async fn unenroll(&self, course_id: &CourseId) -> Result<(), ContentApiError> {
        self.active_enrollment(course_id).await?;
        self.enrollments.delete_enrollment(course_id).await?;
        self.progress.clear_progress(course_id).await?;
        info!(%course_id, "unenrolled; progress cleared");
        Ok(())
    }

    async fn save_lesson_progress(
        &self,
        course_id: &CourseId,
        checkpoint: &LessonCheckpoint,
    ) -> Result<LessonProgressRecord, ContentApiError> {
        let course = self.course(course_id).await?;
        let (_, lesson) = course
            .find_lesson(&checkpoint.lesson_id)
            .ok_or(ContentApiError::NotFound)?;
        if checkpoint.step >= lesson.step_count().max(1) {
            return Err(ContentApiError::Rejected(format!(
                "Lesson \"{}\" has no step {}.",
                lesson.title,
                checkpoint.step + 1
            )));
        }
        self.active_enrollment(course_id).await?;

        let record = self
            .progress
            .save_checkpoint(course_id, checkpoint, self.clock.now())
            .await?;
        debug!(%course_id, lesson_id = %checkpoint.lesson_id, step = checkpoint.step, "saved checkpoint");
        Ok(record)
    }

    async fn complete_project(
        &self,
        course_id: &CourseId,
        project_id: &ProjectId,
    ) -> Result<(), ContentApiError> {
        self.active_enrollment(course_id).await?;
        let course = self.annotated(course_id).await?;
        let project = course.project(project_id).ok_or(ContentApiError::NotFound)?;
        if project.progress.is_completed {
            return Ok(());
        }
        if !project.progress.can_complete {
            return Err(ContentApiError::Rejected(format!(
                "\"{}\" still has unmet requirements.",
                project.title
            )));
        }

        self.progress
            .mark_project_completed(course_id, project_id, self.clock.now())
            .await?;
        info!(%course_id, %project_id, "project completed");
        Ok(())
    }
}
