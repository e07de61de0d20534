use course_core::model::CourseHomepage;
use course_core::navigation::ReturnSlot;
use dioxus::prelude::*;
use dioxus_router::Navigator;
use tracing::{debug, info, warn};

use crate::views::ViewError;
use crate::vm::CourseHomeVm;

use super::super::state::{CourseHomeServices, CourseHomeState, LoadState};
use super::sync::{show_notice, sync_after_address};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadMode {
    /// Blank the page while loading; failures are full-screen.
    Initial,
    /// Keep the page; failures are a notice.
    Refresh,
}

pub(super) fn build_load_action(
    state: &CourseHomeState,
    services: &CourseHomeServices,
    navigator: Navigator,
) -> Callback<LoadMode> {
    let state = *state;
    let services = services.clone();
    use_callback(move |mode: LoadMode| {
        let course_id = state.course_id.peek().clone();
        let mut fetch_guard = state.fetch_guard;
        let ticket = fetch_guard.write().begin(course_id);
        let mut load_state = state.load_state;
        if mode == LoadMode::Initial {
            load_state.set(LoadState::Loading);
        }

        let services = services.clone();
        spawn(async move {
            let result = services.api.get_course_homepage(ticket.course_id()).await;
            if !state.fetch_guard.peek().accepts(&ticket) {
                debug!(course_id = %ticket.course_id(), "ignoring superseded homepage load");
                return;
            }
            match result {
                Ok(homepage) => apply_homepage(state, &services.return_slot, homepage, navigator),
                Err(err) => {
                    warn!(course_id = %ticket.course_id(), error = %err, "loading course homepage failed");
                    match mode {
                        LoadMode::Initial => load_state.set(LoadState::Error(ViewError::from(&err))),
                        LoadMode::Refresh => show_notice(state, "Could not refresh course progress."),
                    }
                }
            }
        });
    })
}

/// Install a loaded homepage.
///
/// The first homepage for a course lands on the pending return target when there is one,
/// otherwise on the address bar. Later homepages refresh in place.
pub(super) fn apply_homepage(
    state: CourseHomeState,
    return_slot: &ReturnSlot,
    homepage: CourseHomepage,
    navigator: Navigator,
) {
    let course_id = state.course_id.peek().clone();
    if homepage.course.id != course_id {
        debug!(course_id = %course_id, loaded = %homepage.course.id, "ignoring homepage for another course");
        return;
    }

    let mut enrollment = state.enrollment;
    enrollment.write().sync(&homepage.enrollment);

    let mut vm_signal = state.vm;
    let mut degraded = false;
    let fresh = {
        let mut slot = vm_signal.write();
        match slot.as_mut() {
            Some(vm) if vm.course_id() == &course_id => {
                vm.refresh(homepage);
                None
            }
            _ => Some(homepage),
        }
    };

    if let Some(homepage) = fresh {
        let mut vm = CourseHomeVm::new(course_id.clone(), homepage);
        let address = match return_slot.take_for(&course_id) {
            Some(target) => {
                info!(course_id = %course_id, lesson_id = %target.lesson_id, "returning to lesson");
                target.address()
            }
            None => state.route_address.peek().clone(),
        };
        let outcome = vm.land(&address);
        if outcome.degraded {
            debug!(course_id = %course_id, %address, "course address only partly resolved");
        }
        degraded = outcome.degraded;
        vm_signal.set(Some(vm));
    }

    let mut load_state = state.load_state;
    load_state.set(LoadState::Ready);
    sync_after_address(state, navigator, degraded);
}
