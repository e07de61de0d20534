use std::collections::BTreeSet;

use crate::model::{Course, LessonId, ProjectId};
use crate::navigation::address::CourseAddress;

/// Which of the three course homepage views is showing. Derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveView {
    Overview,
    ProjectDetail {
        project_id: ProjectId,
    },
    LessonEditor {
        project_id: ProjectId,
        lesson_id: LessonId,
        step: u32,
    },
}

/// What applying an address did to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressOutcome {
    pub changed: bool,
    /// Part of the address referenced something that is not in the course.
    pub degraded: bool,
}

/// Client-only record of what is currently open on the course homepage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected_project_id: Option<ProjectId>,
    selected_lesson_id: Option<LessonId>,
    current_step_index: u32,
    expanded_project_ids: BTreeSet<ProjectId>,
    is_fullscreen: bool,
    has_unsaved_changes: bool,
    initial_step_override: Option<u32>,
}

impl SelectionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn selected_project_id(&self) -> Option<&ProjectId> {
        self.selected_project_id.as_ref()
    }

    #[must_use]
    pub fn selected_lesson_id(&self) -> Option<&LessonId> {
        self.selected_lesson_id.as_ref()
    }

    /// Only meaningful while a lesson is selected.
    #[must_use]
    pub fn current_step_index(&self) -> Option<u32> {
        self.selected_lesson_id
            .as_ref()
            .map(|_| self.current_step_index)
    }

    #[must_use]
    pub fn expanded_project_ids(&self) -> &BTreeSet<ProjectId> {
        &self.expanded_project_ids
    }

    #[must_use]
    pub fn is_expanded(&self, project_id: &ProjectId) -> bool {
        self.expanded_project_ids.contains(project_id)
    }

    #[must_use]
    pub fn is_fullscreen(&self) -> bool {
        self.is_fullscreen
    }

    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.has_unsaved_changes
    }

    #[must_use]
    pub fn initial_step_override(&self) -> Option<u32> {
        self.initial_step_override
    }

    #[must_use]
    pub fn active_view(&self) -> ActiveView {
        match (&self.selected_project_id, &self.selected_lesson_id) {
            (Some(project_id), Some(lesson_id)) => ActiveView::LessonEditor {
                project_id: project_id.clone(),
                lesson_id: lesson_id.clone(),
                step: self.current_step_index,
            },
            (Some(project_id), None) => ActiveView::ProjectDetail {
                project_id: project_id.clone(),
            },
            _ => ActiveView::Overview,
        }
    }

    /// The navigable projection of this selection.
    #[must_use]
    pub fn address(&self) -> CourseAddress {
        match (&self.selected_project_id, &self.selected_lesson_id) {
            (Some(project), Some(lesson)) => {
                CourseAddress::lesson(project.clone(), lesson.clone(), self.current_step_index)
            }
            (Some(project), None) => CourseAddress::project(project.clone()),
            _ => CourseAddress::overview(),
        }
    }

    // ─── Transitions ───────────────────────────────────────────────────────────

    pub fn select_project(&mut self, project_id: ProjectId) {
        self.leave_lesson();
        self.expanded_project_ids.insert(project_id.clone());
        self.selected_project_id = Some(project_id);
    }

    pub fn select_lesson(&mut self, project_id: ProjectId, lesson_id: LessonId) {
        if self.selected_lesson_id.as_ref() != Some(&lesson_id) {
            self.has_unsaved_changes = false;
        }
        self.expanded_project_ids.insert(project_id.clone());
        self.selected_project_id = Some(project_id);
        self.selected_lesson_id = Some(lesson_id);
        self.current_step_index = 0;
        self.initial_step_override = None;
    }

    /// No-op unless a lesson is selected.
    pub fn set_step(&mut self, index: u32) {
        if self.selected_lesson_id.is_some() {
            self.current_step_index = index;
        }
    }

    pub fn toggle_expanded(&mut self, project_id: &ProjectId) {
        if !self.expanded_project_ids.remove(project_id) {
            self.expanded_project_ids.insert(project_id.clone());
        }
    }

    pub fn return_to_overview(&mut self) {
        self.leave_lesson();
        self.selected_project_id = None;
    }

    /// Close the lesson, keeping its project selected.
    pub fn close_lesson(&mut self) {
        self.leave_lesson();
    }

    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        self.is_fullscreen = fullscreen && self.selected_lesson_id.is_some();
    }

    pub fn set_unsaved_changes(&mut self, dirty: bool) {
        self.has_unsaved_changes = dirty && self.selected_lesson_id.is_some();
    }

    fn leave_lesson(&mut self) {
        self.selected_lesson_id = None;
        self.current_step_index = 0;
        self.initial_step_override = None;
        self.is_fullscreen = false;
        self.has_unsaved_changes = false;
    }

    // ─── Address → state ───────────────────────────────────────────────────────

    /// Populate the selection from an address, validated against `course`.
    ///
    /// Unknown projects fall back to the overview; a lesson outside the referenced
    /// project is dropped; a lesson given without a project resolves its owner. A valid
    /// lesson opens at the (clamped) step via `initial_step_override`. Re-applying the
    /// address of the current selection changes nothing.
    pub fn apply_address(&mut self, course: &Course, address: &CourseAddress) -> AddressOutcome {
        let (target, degraded) = resolve(course, address);

        let current = (
            self.selected_project_id.clone(),
            self.selected_lesson_id.clone(),
            self.current_step_index(),
        );
        if current == target {
            return AddressOutcome {
                changed: false,
                degraded,
            };
        }

        match target {
            (Some(project_id), Some(lesson_id), step) => {
                self.select_lesson(project_id, lesson_id);
                let step = step.unwrap_or(0);
                self.current_step_index = step;
                self.initial_step_override = Some(step);
            }
            (Some(project_id), None, _) => self.select_project(project_id),
            _ => self.return_to_overview(),
        }

        AddressOutcome {
            changed: true,
            degraded,
        }
    }
}

type Target = (Option<ProjectId>, Option<LessonId>, Option<u32>);

fn resolve(course: &Course, address: &CourseAddress) -> (Target, bool) {
    let project = match (&address.project, &address.lesson) {
        (Some(project_id), _) => course.project(project_id),
        (None, Some(lesson_id)) => course.find_lesson(lesson_id).map(|(project, _)| project),
        (None, None) => return ((None, None, None), false),
    };
    let Some(project) = project else {
        return ((None, None, None), true);
    };

    let Some(lesson_id) = &address.lesson else {
        return ((Some(project.id.clone()), None, None), false);
    };
    let Some(lesson) = project.lesson(lesson_id) else {
        return ((Some(project.id.clone()), None, None), true);
    };

    let requested = address.step_index();
    let step = lesson.clamp_step(requested);
    (
        (Some(project.id.clone()), Some(lesson.id.clone()), Some(step)),
        step != requested,
    )
}
