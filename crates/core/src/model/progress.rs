use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::{LessonId, ProjectId};

/// Raw per-lesson progress as recorded by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonProgressRecord {
    #[serde(default)]
    pub completed_steps: BTreeSet<u32>,
    #[serde(default)]
    pub last_step: Option<u32>,
    #[serde(default)]
    pub draft: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl LessonProgressRecord {
    #[must_use]
    pub fn is_untouched(&self) -> bool {
        self.completed_steps.is_empty() && self.last_step.is_none() && self.draft.is_none()
    }
}

/// A lesson save reported by the editor surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonCheckpoint {
    pub lesson_id: LessonId,
    pub step: u32,
    /// `None` leaves the stored draft alone; a blank draft clears it.
    #[serde(default)]
    pub draft: Option<String>,
    /// Marks `step` as a completed task.
    #[serde(default)]
    pub complete_step: bool,
}

/// Raw learner progress for one course.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseProgress {
    #[serde(default)]
    pub lessons: HashMap<LessonId, LessonProgressRecord>,
    #[serde(default)]
    pub completed_projects: HashMap<ProjectId, DateTime<Utc>>,
}

impl CourseProgress {
    #[must_use]
    pub fn lesson(&self, lesson_id: &LessonId) -> Option<&LessonProgressRecord> {
        self.lessons.get(lesson_id)
    }

    #[must_use]
    pub fn project_completed_at(&self, project_id: &ProjectId) -> Option<DateTime<Utc>> {
        self.completed_projects.get(project_id).copied()
    }

    pub fn record_checkpoint(&mut self, checkpoint: &LessonCheckpoint, at: DateTime<Utc>) {
        let record = self.lessons.entry(checkpoint.lesson_id.clone()).or_default();
        record.last_step = Some(checkpoint.step);
        if checkpoint.complete_step {
            record.completed_steps.insert(checkpoint.step);
        }
        if let Some(draft) = &checkpoint.draft {
            record.draft = (!draft.trim().is_empty()).then(|| draft.clone());
        }
        record.updated_at = Some(at);
    }

    /// Record a project completion. The first timestamp wins.
    pub fn mark_project_completed(&mut self, project_id: &ProjectId, at: DateTime<Utc>) {
        self.completed_projects.entry(project_id.clone()).or_insert(at);
    }
}
