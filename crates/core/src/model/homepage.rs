use serde::{Deserialize, Serialize};

use crate::model::course::Course;
use crate::model::enrollment::Enrollment;
use crate::model::ids::CourseId;
use crate::model::progress::CourseProgress;
use crate::progress::annotate;

/// Everything the course homepage needs, as returned by the content API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseHomepage {
    pub course: Course,
    #[serde(default)]
    pub progress: CourseProgress,
    #[serde(default)]
    pub enrollment: Enrollment,
}

impl CourseHomepage {
    /// The course with every project and lesson progress field populated.
    #[must_use]
    pub fn annotated_course(&self) -> Course {
        annotate(self.course.clone(), &self.progress)
    }
}

/// Catalog entry for a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseSummary {
    pub id: CourseId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub project_count: u32,
}

impl From<&Course> for CourseSummary {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id.clone(),
            title: course.title.clone(),
            description: course.description.clone(),
            project_count: u32::try_from(course.projects.len()).unwrap_or(u32::MAX),
        }
    }
}
