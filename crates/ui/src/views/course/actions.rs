mod editor;
mod enrollment;
mod intent;
mod loading;
mod navigation;
mod sync;

use course_core::model::{CourseId, ProjectId};
use course_core::navigation::CourseAddress;
use dioxus::prelude::*;
use dioxus_router::{Navigator, use_navigator};
use services::enrollment::{EnrollmentMachine, EnrollmentRequest};
use tracing::debug;

use crate::vm::{ExitChoice, LeaveLesson};

use super::state::{
    ConfirmDialog, CourseHomeServices, CourseHomeState, ExitState, LoadState, SaveState,
};

pub use intent::CourseHomeIntent;
pub use loading::LoadMode;

#[derive(Clone, Copy)]
pub struct CourseHomeDispatcher {
    pub dispatch: Callback<CourseHomeIntent>,
    pub load: Callback<LoadMode>,
    /// Feed the route's course and address into the page.
    pub observe_route: Callback<(CourseId, CourseAddress)>,
}

#[derive(Clone, Copy)]
struct CourseHomeActionHandlers {
    load: Callback<LoadMode>,
    navigate: Callback<LeaveLesson>,
    toggle_project: Callback<ProjectId>,
    set_step: Callback<u32>,
    set_fullscreen: Callback<bool>,
    draft_changed: Callback<String>,
    save_progress: Callback<bool>,
    resolve_exit: Callback<ExitChoice>,
    open_task: Callback<()>,
    complete_project: Callback<ProjectId>,
    enrollment: Callback<EnrollmentRequest>,
    request_confirm: Callback<ConfirmDialog>,
    confirm_dialog: Callback<()>,
    dismiss_report: Callback<()>,
    go_to_blocking_project: Callback<ProjectId>,
}

pub fn use_course_home_dispatcher(
    state: &CourseHomeState,
    services: &CourseHomeServices,
) -> CourseHomeDispatcher {
    let navigator = use_navigator();

    let load = loading::build_load_action(state, services, navigator);
    let navigate = navigation::build_navigate_action(state, navigator, load);
    let toggle_project = navigation::build_toggle_project_action(state);
    let set_step = navigation::build_set_step_action(state, navigator);
    let set_fullscreen = navigation::build_set_fullscreen_action(state);
    let open_task = navigation::build_open_task_action(state, navigator);
    let draft_changed = editor::build_draft_changed_action(state);
    let save_progress = editor::build_save_progress_action(state, services, load);
    let resolve_exit = editor::build_resolve_exit_action(state, services, navigator, load);
    let complete_project = editor::build_complete_project_action(state, services, load);
    let enrollment = enrollment::build_enrollment_action(state, services, navigator, navigate);
    let request_confirm = enrollment::build_request_confirm_action(state);
    let confirm_dialog = enrollment::build_confirm_dialog_action(state, enrollment);
    let dismiss_report = enrollment::build_dismiss_report_action(state);
    let go_to_blocking_project =
        enrollment::build_go_to_blocking_project_action(state, navigate);
    let observe_route = build_observe_route_action(state, load, navigator);

    let handlers = CourseHomeActionHandlers {
        load,
        navigate,
        toggle_project,
        set_step,
        set_fullscreen,
        draft_changed,
        save_progress,
        resolve_exit,
        open_task,
        complete_project,
        enrollment,
        request_confirm,
        confirm_dialog,
        dismiss_report,
        go_to_blocking_project,
    };

    let state = *state;
    let dispatch =
        use_callback(move |intent: CourseHomeIntent| dispatch_intent(intent, &handlers, state));

    CourseHomeDispatcher {
        dispatch,
        load,
        observe_route,
    }
}

fn build_observe_route_action(
    state: &CourseHomeState,
    load: Callback<LoadMode>,
    navigator: Navigator,
) -> Callback<(CourseId, CourseAddress)> {
    let state = *state;
    use_callback(move |(course_id, address): (CourseId, CourseAddress)| {
        let mut route_address = state.route_address;
        route_address.set(address.clone());
        let mut vm = state.vm;

        if *state.course_id.peek() != course_id {
            let leave = LeaveLesson::SwitchCourse(course_id.clone());
            let applied = vm
                .write()
                .as_mut()
                .is_none_or(|vm| vm.request_leave(leave));
            if applied {
                switch_course(state, load, course_id);
            } else {
                debug!(to = %course_id, "holding course switch for unsaved changes");
            }
            return;
        }

        let outcome = vm
            .write()
            .as_mut()
            .and_then(|vm| vm.observe_address(&address));
        if let Some(outcome) = outcome {
            debug!(%address, ?outcome, "applied external course address");
            sync::discard_report(state);
            sync::sync_after_address(state, navigator, outcome.degraded);
        }
    })
}

fn switch_course(state: CourseHomeState, load: Callback<LoadMode>, course_id: CourseId) {
    let mut current_course = state.course_id;
    let previous = current_course.peek().clone();
    debug!(from = %previous, to = %course_id, "switching course");
    current_course.set(course_id);
    reset_for_new_course(state);
    load.call(LoadMode::Initial);
}

fn reset_for_new_course(state: CourseHomeState) {
    let CourseHomeState {
        mut vm,
        mut enrollment,
        mut draft,
        mut draft_lesson,
        mut save_state,
        mut exit_state,
        mut confirm,
        mut load_state,
        ..
    } = state;
    vm.set(None);
    enrollment.set(EnrollmentMachine::default());
    draft.set(String::new());
    draft_lesson.set(None);
    save_state.set(SaveState::Idle);
    exit_state.set(ExitState::Idle);
    confirm.set(None);
    load_state.set(LoadState::Loading);
}

fn dispatch_intent(
    intent: CourseHomeIntent,
    handlers: &CourseHomeActionHandlers,
    state: CourseHomeState,
) {
    match intent {
        CourseHomeIntent::Retry => handlers.load.call(LoadMode::Initial),
        CourseHomeIntent::Navigate(leave) => handlers.navigate.call(leave),
        CourseHomeIntent::ToggleProject(project_id) => handlers.toggle_project.call(project_id),
        CourseHomeIntent::SetStep(index) => handlers.set_step.call(index),
        CourseHomeIntent::SetFullscreen(fullscreen) => handlers.set_fullscreen.call(fullscreen),
        CourseHomeIntent::DraftChanged(text) => handlers.draft_changed.call(text),
        CourseHomeIntent::SaveProgress { complete_step } => {
            handlers.save_progress.call(complete_step);
        }
        CourseHomeIntent::ResolveExit(choice) => handlers.resolve_exit.call(choice),
        CourseHomeIntent::OpenTask => handlers.open_task.call(()),
        CourseHomeIntent::CompleteProject(project_id) => {
            handlers.complete_project.call(project_id);
        }
        CourseHomeIntent::Enroll => handlers.enrollment.call(EnrollmentRequest::Enroll),
        CourseHomeIntent::RequestComplete => {
            handlers.request_confirm.call(ConfirmDialog::CompleteCourse);
        }
        CourseHomeIntent::RequestUnenroll => handlers.request_confirm.call(ConfirmDialog::Unenroll),
        CourseHomeIntent::ConfirmDialog => handlers.confirm_dialog.call(()),
        CourseHomeIntent::CloseDialog => {
            let mut confirm = state.confirm;
            confirm.set(None);
        }
        CourseHomeIntent::DismissReport => handlers.dismiss_report.call(()),
        CourseHomeIntent::GoToBlockingProject(project_id) => {
            handlers.go_to_blocking_project.call(project_id);
        }
        CourseHomeIntent::DismissNotice => {
            let mut notice = state.notice;
            notice.set(None);
        }
    }
}
