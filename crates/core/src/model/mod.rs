mod completion;
mod course;
mod enrollment;
mod homepage;
mod ids;
mod progress;
pub mod sample;

pub use ids::{CourseId, EnrollmentId, LessonId, ParseIdError, ProjectId};

pub use completion::{IncompleteProject, IncompleteProjectsReport, RequirementStatus};
pub use course::{
    Course, CourseError, Lesson, LessonStatus, ProgressLabel, ProgressSummary, Project, Step,
};
pub use enrollment::{Enrollment, EnrollmentStatus};
pub use homepage::{CourseHomepage, CourseSummary};
pub use progress::{CourseProgress, LessonCheckpoint, LessonProgressRecord};
