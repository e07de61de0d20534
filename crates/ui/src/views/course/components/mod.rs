mod header;
mod lesson_editor;
mod modals;
mod outline;
mod overview;
mod project_detail;

pub use header::{CourseHeader, CourseNotice};
pub use lesson_editor::LessonEditor;
pub use modals::CourseOverlays;
pub use outline::CourseOutline;
pub use overview::CourseOverview;
pub use project_detail::ProjectDetail;
