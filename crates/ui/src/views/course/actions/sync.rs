use std::time::Duration;

use course_core::navigation::WriteMode;
use dioxus::prelude::*;
use dioxus_router::Navigator;
use tracing::debug;

use crate::routes::Route;
use crate::vm::CourseHomeVm;

use super::super::state::{CourseHomeState, SaveState};

const NOTICE_TTL: Duration = Duration::from_secs(4);

/// Bring the draft and the address bar in line with the current selection.
pub(super) fn sync_after_selection(state: CourseHomeState, navigator: Navigator) {
    sync_draft(state);
    write_address(state, navigator, false);
}

/// Like `sync_after_selection`, after an address was applied. A degraded address is
/// corrected in place so history never keeps the dangling reference.
pub(super) fn sync_after_address(state: CourseHomeState, navigator: Navigator, degraded: bool) {
    sync_draft(state);
    write_address(state, navigator, degraded);
}

fn sync_draft(state: CourseHomeState) {
    let (open_lesson, saved_draft) = {
        let vm = state.vm.peek();
        let Some(vm) = vm.as_ref() else {
            return;
        };
        let editor = vm.lesson_editor();
        (
            editor.as_ref().map(|editor| editor.lesson_id.clone()),
            editor.map(|editor| editor.saved_draft).unwrap_or_default(),
        )
    };
    if *state.draft_lesson.peek() == open_lesson {
        return;
    }
    let mut draft = state.draft;
    let mut draft_lesson = state.draft_lesson;
    let mut save_state = state.save_state;
    draft.set(saved_draft);
    draft_lesson.set(open_lesson);
    save_state.set(SaveState::Idle);
}

fn write_address(state: CourseHomeState, navigator: Navigator, force_replace: bool) {
    let current = state.route_address.peek().clone();
    let mut vm = state.vm;
    let planned = vm
        .write()
        .as_mut()
        .and_then(|vm| vm.plan_address_write(&current));
    let Some((next, mut mode)) = planned else {
        return;
    };
    if force_replace {
        mode = WriteMode::Replace;
    }

    let course_id = state.course_id.peek().clone();
    debug!(course_id = %course_id, address = %next, ?mode, "writing course address");
    let route = Route::course_home(course_id, next);
    match mode {
        WriteMode::Push => {
            navigator.push(route);
        }
        WriteMode::Replace => {
            navigator.replace(route);
        }
    }
}

/// Put the page's own course back in the address bar after a held course switch.
pub(super) fn restore_course_address(state: CourseHomeState, navigator: Navigator) {
    let mut vm = state.vm;
    let Some(address) = vm.write().as_mut().map(CourseHomeVm::claim_address) else {
        return;
    };
    let course_id = state.course_id.peek().clone();
    debug!(course_id = %course_id, %address, "restoring course address");
    navigator.push(Route::course_home(course_id, address));
}

/// Close the incomplete-projects report; it only describes the view it was raised on.
pub(super) fn discard_report(state: CourseHomeState) {
    let mut enrollment = state.enrollment;
    if enrollment.peek().report().is_some() {
        enrollment.write().dismiss_report();
    }
}

/// Show a transient notice. Newer notices outlive older timers.
pub(super) fn show_notice(state: CourseHomeState, message: impl Into<String>) {
    let mut notice = state.notice;
    let mut generation = state.notice_generation;
    let current = *generation.peek() + 1;
    generation.set(current);
    notice.set(Some(message.into()));

    spawn(async move {
        tokio::time::sleep(NOTICE_TTL).await;
        if *generation.peek() == current {
            notice.set(None);
        }
    });
}
