use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{CourseId, LessonId, ProjectId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CourseError {
    #[error("course title cannot be empty")]
    EmptyTitle,

    #[error("project {0} appears more than once")]
    DuplicateProject(ProjectId),

    #[error("lesson {0} appears more than once")]
    DuplicateLesson(LessonId),
}

//
// ─── LESSONS ───────────────────────────────────────────────────────────────────
//

/// One task inside a lesson, consumed in the editor surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub xp: u32,
}

impl Step {
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            required: false,
            xp: 0,
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn with_xp(mut self, xp: u32) -> Self {
        self.xp = xp;
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl LessonStatus {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "Not started",
            Self::InProgress => "In progress",
            Self::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: LessonId,
    pub title: String,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub steps: Vec<Step>,

    // Derived by the progress annotator.
    #[serde(default)]
    pub status: LessonStatus,
    #[serde(default)]
    pub has_unmet_required_tasks: bool,
    #[serde(default)]
    pub resume_step: u32,
}

impl Lesson {
    #[must_use]
    pub fn new(id: LessonId, title: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            id,
            title: title.into(),
            duration_minutes: None,
            steps,
            status: LessonStatus::default(),
            has_unmet_required_tasks: false,
            resume_step: 0,
        }
    }

    #[must_use]
    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    #[must_use]
    pub fn step_count(&self) -> u32 {
        u32::try_from(self.steps.len()).unwrap_or(u32::MAX)
    }

    /// Clamp a step index into this lesson's range. Lessons without steps only have step 0.
    #[must_use]
    pub fn clamp_step(&self, step: u32) -> u32 {
        step.min(self.step_count().saturating_sub(1))
    }

    #[must_use]
    pub fn step(&self, index: u32) -> Option<&Step> {
        self.steps.get(usize::try_from(index).ok()?)
    }
}

//
// ─── PROJECTS ──────────────────────────────────────────────────────────────────
//

/// Display label for a project's progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressLabel {
    #[default]
    NotStarted,
    InProgress,
    ReadyToComplete,
    Completed,
}

impl ProgressLabel {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "Not started",
            Self::InProgress => "In progress",
            Self::ReadyToComplete => "Ready to complete",
            Self::Completed => "Completed",
        }
    }
}

/// Derived completion facts for a project.
///
/// `can_complete` is a local heuristic (`xp_met && required_tasks_met`).
/// `is_completed` only reflects a completion the server has recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct ProgressSummary {
    pub earned_xp: u32,
    pub total_xp: u32,
    pub xp_required: u32,
    pub total_tasks: u32,
    pub completed_tasks: u32,
    pub total_required_tasks: u32,
    pub completed_required_tasks: u32,
    pub percent_complete: u8,
    pub xp_met: bool,
    pub required_tasks_met: bool,
    pub can_complete: bool,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub label: ProgressLabel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub position: u32,
    /// XP needed before the project can be completed. Zero means no XP requirement.
    #[serde(default)]
    pub xp_required: u32,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
    #[serde(default)]
    pub progress: ProgressSummary,
}

impl Project {
    #[must_use]
    pub fn new(id: ProjectId, title: impl Into<String>, position: u32, lessons: Vec<Lesson>) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            position,
            xp_required: 0,
            lessons,
            progress: ProgressSummary::default(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_xp_required(mut self, xp: u32) -> Self {
        self.xp_required = xp;
        self
    }

    #[must_use]
    pub fn lesson(&self, lesson_id: &LessonId) -> Option<&Lesson> {
        self.lessons.iter().find(|lesson| lesson.id == *lesson_id)
    }

    #[must_use]
    pub fn contains_lesson(&self, lesson_id: &LessonId) -> bool {
        self.lesson(lesson_id).is_some()
    }
}

//
// ─── COURSE ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl Course {
    /// Build a course, ordering projects by position.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::EmptyTitle` for a blank title, and
    /// `CourseError::DuplicateProject` / `CourseError::DuplicateLesson` when ids repeat.
    pub fn new(
        id: CourseId,
        title: impl Into<String>,
        description: impl Into<String>,
        mut projects: Vec<Project>,
    ) -> Result<Self, CourseError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(CourseError::EmptyTitle);
        }

        let mut project_ids = HashSet::new();
        let mut lesson_ids = HashSet::new();
        for project in &projects {
            if !project_ids.insert(project.id.clone()) {
                return Err(CourseError::DuplicateProject(project.id.clone()));
            }
            for lesson in &project.lessons {
                if !lesson_ids.insert(lesson.id.clone()) {
                    return Err(CourseError::DuplicateLesson(lesson.id.clone()));
                }
            }
        }

        projects.sort_by_key(|project| project.position);

        Ok(Self {
            id,
            title,
            description: description.into(),
            projects,
        })
    }

    #[must_use]
    pub fn project(&self, project_id: &ProjectId) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == *project_id)
    }

    /// Find a lesson, requiring it to belong to the given project.
    #[must_use]
    pub fn lesson(&self, project_id: &ProjectId, lesson_id: &LessonId) -> Option<&Lesson> {
        self.project(project_id)?.lesson(lesson_id)
    }

    /// Find a lesson anywhere in the course along with its owning project.
    #[must_use]
    pub fn find_lesson(&self, lesson_id: &LessonId) -> Option<(&Project, &Lesson)> {
        self.projects
            .iter()
            .find_map(|project| project.lesson(lesson_id).map(|lesson| (project, lesson)))
    }
}
