use course_core::model::ProjectId;
use dioxus::prelude::*;
use dioxus_router::Navigator;
use tracing::debug;

use crate::routes::Route;
use crate::vm::LeaveLesson;

use super::super::state::{CourseHomeState, ExitState};
use super::loading::LoadMode;
use super::switch_course;
use super::sync::{discard_report, show_notice, sync_after_selection};

pub(super) fn build_navigate_action(
    state: &CourseHomeState,
    navigator: Navigator,
    load: Callback<LoadMode>,
) -> Callback<LeaveLesson> {
    let state = *state;
    use_callback(move |leave: LeaveLesson| {
        let mut vm = state.vm;
        let applied = match vm.write().as_mut() {
            Some(vm) => vm.request_leave(leave.clone()),
            None => leave.leaves_page(),
        };
        if applied {
            settle_leave(state, navigator, load, leave);
        } else {
            let mut exit_state = state.exit_state;
            exit_state.set(ExitState::Idle);
        }
    })
}

/// Finish a navigation the view model has already applied.
pub(super) fn settle_leave(
    state: CourseHomeState,
    navigator: Navigator,
    load: Callback<LoadMode>,
    leave: LeaveLesson,
) {
    discard_report(state);
    match leave {
        LeaveLesson::LeaveScreen(route) => {
            debug!(?route, "leaving course page");
            navigator.push(route);
        }
        LeaveLesson::SwitchCourse(course_id) => switch_course(state, load, course_id),
        _ => sync_after_selection(state, navigator),
    }
}

pub(super) fn build_toggle_project_action(state: &CourseHomeState) -> Callback<ProjectId> {
    let state = *state;
    use_callback(move |project_id: ProjectId| {
        let mut vm = state.vm;
        if let Some(vm) = vm.write().as_mut() {
            vm.toggle_project(&project_id);
        }
    })
}

pub(super) fn build_set_step_action(state: &CourseHomeState, navigator: Navigator) -> Callback<u32> {
    let state = *state;
    use_callback(move |index: u32| {
        let mut vm = state.vm;
        if let Some(vm) = vm.write().as_mut() {
            vm.set_step(index);
        }
        sync_after_selection(state, navigator);
    })
}

pub(super) fn build_set_fullscreen_action(state: &CourseHomeState) -> Callback<bool> {
    let state = *state;
    use_callback(move |fullscreen: bool| {
        let mut vm = state.vm;
        if let Some(vm) = vm.write().as_mut() {
            vm.set_fullscreen(fullscreen);
        }
    })
}

/// Leave the homepage for the open step's task screen.
pub(super) fn build_open_task_action(state: &CourseHomeState, navigator: Navigator) -> Callback<()> {
    let state = *state;
    use_callback(move |()| {
        let target = {
            let vm = state.vm.read();
            vm.as_ref().and_then(|vm| {
                if vm.selection().has_unsaved_changes() {
                    return None;
                }
                let editor = vm.lesson_editor()?;
                Some(Route::Task {
                    course_id: vm.course_id().clone(),
                    project_id: editor.project_id,
                    lesson_id: editor.lesson_id,
                    step: editor.step_index,
                })
            })
        };
        match target {
            Some(route) => {
                debug!(?route, "opening task screen");
                navigator.push(route);
            }
            None => show_notice(state, "Save your changes before opening the task."),
        }
    })
}
