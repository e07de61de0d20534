use serde::{Deserialize, Serialize};

use crate::model::course::{Course, Project};
use crate::model::ids::ProjectId;

/// Progress against one completion requirement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementStatus {
    pub met: bool,
    pub current: u32,
    pub required: u32,
}

/// A project that blocks course completion, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncompleteProject {
    pub project_id: ProjectId,
    pub title: String,
    pub xp: RequirementStatus,
    pub required_tasks: RequirementStatus,
}

impl IncompleteProject {
    #[must_use]
    pub fn from_project(project: &Project) -> Self {
        let progress = &project.progress;
        Self {
            project_id: project.id.clone(),
            title: project.title.clone(),
            xp: RequirementStatus {
                met: progress.xp_met,
                current: progress.earned_xp,
                required: progress.xp_required,
            },
            required_tasks: RequirementStatus {
                met: progress.required_tasks_met,
                current: progress.completed_required_tasks,
                required: progress.total_required_tasks,
            },
        }
    }
}

/// Server explanation for a rejected "complete course" request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncompleteProjectsReport {
    pub projects: Vec<IncompleteProject>,
}

impl IncompleteProjectsReport {
    /// Collect every project of an annotated course that is neither completed nor completable.
    #[must_use]
    pub fn from_course(course: &Course) -> Self {
        let projects = course
            .projects
            .iter()
            .filter(|project| !project.progress.is_completed && !project.progress.can_complete)
            .map(IncompleteProject::from_project)
            .collect();
        Self { projects }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.projects.len()
    }
}
