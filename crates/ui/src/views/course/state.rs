use std::sync::Arc;

use course_core::model::{CourseId, LessonId};
use course_core::navigation::{CourseAddress, ReturnSlot};
use dioxus::prelude::*;
use services::ContentApi;
use services::enrollment::{EnrollmentMachine, EnrollmentStore};

use crate::context::AppContext;
use crate::views::ViewError;
use crate::vm::{CourseHomeVm, FetchGuard};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Error(ViewError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmDialog {
    CompleteCourse,
    Unenroll,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveState {
    Idle,
    Saving,
    Saved,
    Error(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExitState {
    Idle,
    Saving,
    Error(String),
}

#[derive(Clone)]
pub struct CourseHomeServices {
    pub api: Arc<dyn ContentApi>,
    pub return_slot: ReturnSlot,
}

impl CourseHomeServices {
    #[must_use]
    pub fn from_context(ctx: &AppContext) -> Self {
        Self {
            api: ctx.content_api(),
            return_slot: ctx.return_slot(),
        }
    }
}

/// `EnrollmentStore` over the page's machine signal.
#[derive(Clone, Copy)]
pub struct SignalStore(pub Signal<EnrollmentMachine>);

impl EnrollmentStore for SignalStore {
    fn with_machine<R>(&self, f: impl FnOnce(&mut EnrollmentMachine) -> R) -> R {
        let mut machine = self.0;
        machine.with_mut(f)
    }
}

#[derive(Clone, Copy)]
pub struct CourseHomeState {
    pub course_id: Signal<CourseId>,
    /// The address most recently reported by the router.
    pub route_address: Signal<CourseAddress>,
    pub vm: Signal<Option<CourseHomeVm>>,
    pub load_state: Signal<LoadState>,
    pub fetch_guard: Signal<FetchGuard>,
    pub enrollment: Signal<EnrollmentMachine>,
    pub draft: Signal<String>,
    pub draft_lesson: Signal<Option<LessonId>>,
    pub save_state: Signal<SaveState>,
    pub exit_state: Signal<ExitState>,
    pub confirm: Signal<Option<ConfirmDialog>>,
    pub notice: Signal<Option<String>>,
    pub notice_generation: Signal<u64>,
    pub completing_project: Signal<bool>,
}

impl CourseHomeState {
    #[must_use]
    pub fn enrollment_store(&self) -> SignalStore {
        SignalStore(self.enrollment)
    }

    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.vm
            .read()
            .as_ref()
            .is_some_and(|vm| vm.selection().has_unsaved_changes())
    }
}

pub fn use_course_home_state(course_id: &CourseId, address: &CourseAddress) -> CourseHomeState {
    let course_id = course_id.clone();
    let address = address.clone();
    CourseHomeState {
        course_id: use_signal(|| course_id),
        route_address: use_signal(|| address),
        vm: use_signal(|| None::<CourseHomeVm>),
        load_state: use_signal(|| LoadState::Loading),
        fetch_guard: use_signal(FetchGuard::new),
        enrollment: use_signal(EnrollmentMachine::default),
        draft: use_signal(String::new),
        draft_lesson: use_signal(|| None::<LessonId>),
        save_state: use_signal(|| SaveState::Idle),
        exit_state: use_signal(|| ExitState::Idle),
        confirm: use_signal(|| None::<ConfirmDialog>),
        notice: use_signal(|| None::<String>),
        notice_generation: use_signal(|| 0_u64),
        completing_project: use_signal(|| false),
    }
}
