use async_trait::async_trait;
use course_core::model::{CourseId, LessonId, ProjectId};
use course_core::navigation::CourseAddress;
use services::ContentApiError;
use tracing::{debug, warn};

use crate::routes::Route;

/// What the lesson editor exposes to the page hosting it.
#[async_trait(?Send)]
pub trait EditorSurface {
    /// Persist the current draft and step.
    async fn save_progress(&self) -> Result<(), ContentApiError>;
}

/// A navigation that takes the learner out of the open lesson.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LeaveLesson {
    ToOverview,
    CloseLesson,
    SelectProject(ProjectId),
    SelectLesson {
        project_id: ProjectId,
        lesson_id: LessonId,
    },
    /// An address that arrived from history (back/forward, pasted link).
    FollowAddress(CourseAddress),
    /// Another screen, opened from the app chrome or after the course ends.
    LeaveScreen(Route),
    /// History moved to another course; the router already shows its address.
    SwitchCourse(CourseId),
}

impl LeaveLesson {
    /// Handled by the page rather than the selection.
    #[must_use]
    pub fn leaves_page(&self) -> bool {
        matches!(self, Self::LeaveScreen(_) | Self::SwitchCourse(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitChoice {
    SaveAndClose,
    DiscardAndClose,
    Cancel,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExitSettlement {
    /// Apply the pending navigation.
    Leave,
    /// Stay in the editor; nothing changes.
    Stay,
    /// Saving failed; stay in the editor and show the message.
    SaveFailed(String),
}

/// Resolve the unsaved-changes prompt.
///
/// Only `SaveAndClose` touches the surface.
pub async fn settle_exit<S>(surface: &S, choice: ExitChoice) -> ExitSettlement
where
    S: EditorSurface + ?Sized,
{
    match choice {
        ExitChoice::Cancel => ExitSettlement::Stay,
        ExitChoice::DiscardAndClose => {
            debug!("discarding unsaved lesson changes");
            ExitSettlement::Leave
        }
        ExitChoice::SaveAndClose => match surface.save_progress().await {
            Ok(()) => ExitSettlement::Leave,
            Err(err) => {
                warn!(error = %err, "saving before leaving the lesson failed");
                ExitSettlement::SaveFailed(err.to_string())
            }
        },
    }
}
