use std::sync::{Arc, Mutex, MutexGuard};

use crate::model::{CourseId, LessonId, ProjectId};
use crate::navigation::address::CourseAddress;

/// Where the course homepage should land after returning from a task screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnTarget {
    pub course_id: CourseId,
    pub project_id: ProjectId,
    pub lesson_id: LessonId,
    pub step: u32,
}

impl ReturnTarget {
    #[must_use]
    pub fn address(&self) -> CourseAddress {
        CourseAddress::lesson(self.project_id.clone(), self.lesson_id.clone(), self.step)
    }
}

/// One-shot handoff that survives a navigation away from the course homepage.
///
/// Clones share the same slot. A take always clears the slot, even when the pending
/// target belongs to a different course.
#[derive(Debug, Clone, Default)]
pub struct ReturnSlot {
    inner: Arc<Mutex<Option<ReturnTarget>>>,
}

impl ReturnSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a target, replacing any earlier request.
    pub fn request(&self, target: ReturnTarget) {
        *self.lock() = Some(target);
    }

    /// Consume the pending target if it belongs to `course_id`.
    #[must_use]
    pub fn take_for(&self, course_id: &CourseId) -> Option<ReturnTarget> {
        self.lock()
            .take()
            .filter(|target| target.course_id == *course_id)
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> MutexGuard<'_, Option<ReturnTarget>> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
