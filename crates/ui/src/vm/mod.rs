mod address_sync;
mod course_home_vm;
mod exit_guard;
mod fetch_guard;
mod markdown_vm;

pub use address_sync::AddressSync;
pub use course_home_vm::{
    CourseHomeVm, LessonEditorVm, OutlineLessonVm, OutlineProjectVm, OverviewVm, ProjectDetailVm,
};
pub use exit_guard::{EditorSurface, ExitChoice, ExitSettlement, LeaveLesson, settle_exit};
pub use fetch_guard::{FetchGuard, LoadTicket};
pub use markdown_vm::{markdown_to_html, sanitize_html};
