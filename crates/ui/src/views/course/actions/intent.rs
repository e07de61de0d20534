use course_core::model::ProjectId;

use crate::vm::{ExitChoice, LeaveLesson};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CourseHomeIntent {
    Retry,
    Navigate(LeaveLesson),
    ToggleProject(ProjectId),
    SetStep(u32),
    SetFullscreen(bool),
    DraftChanged(String),
    SaveProgress { complete_step: bool },
    ResolveExit(ExitChoice),
    OpenTask,
    CompleteProject(ProjectId),
    Enroll,
    RequestComplete,
    RequestUnenroll,
    ConfirmDialog,
    CloseDialog,
    DismissReport,
    GoToBlockingProject(ProjectId),
    DismissNotice,
}
