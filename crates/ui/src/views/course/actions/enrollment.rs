use std::sync::Arc;

use course_core::model::ProjectId;
use dioxus::prelude::*;
use dioxus_router::Navigator;
use services::enrollment::{
    EnrollmentAction, EnrollmentLifecycle, EnrollmentOutcome, EnrollmentRequest, EnrollmentStore,
    Settled, UnenrollConfirmation,
};

use crate::routes::Route;
use crate::vm::LeaveLesson;

use super::super::state::{ConfirmDialog, CourseHomeServices, CourseHomeState};
use super::loading::apply_homepage;
use super::sync::show_notice;

pub(super) fn build_enrollment_action(
    state: &CourseHomeState,
    services: &CourseHomeServices,
    navigator: Navigator,
    navigate: Callback<LeaveLesson>,
) -> Callback<EnrollmentRequest> {
    let state = *state;
    let services = services.clone();
    use_callback(move |request: EnrollmentRequest| {
        let course_id = state.course_id.peek().clone();
        let lifecycle = EnrollmentLifecycle::new(Arc::clone(&services.api), course_id);
        let return_slot = services.return_slot.clone();
        spawn(async move {
            let store = state.enrollment_store();
            let EnrollmentOutcome::Settled { settled, homepage } =
                lifecycle.perform(&store, request).await
            else {
                return;
            };
            if let Some(homepage) = homepage {
                apply_homepage(state, &return_slot, *homepage, navigator);
            }
            match settled {
                settled if settled.routes_to_catalog() => {
                    navigate.call(LeaveLesson::LeaveScreen(Route::Catalog {}));
                }
                Settled::Enrolled => show_notice(state, "You're enrolled. Pick a lesson to start."),
                Settled::EnrollUnconfirmed | Settled::Failed(_) => {
                    let message = store.with_machine(|machine| {
                        let message = machine.error().map(str::to_string);
                        machine.dismiss_error();
                        message
                    });
                    if let Some(message) = message {
                        show_notice(state, message);
                    }
                }
                _ => {}
            }
        });
    })
}

pub(super) fn build_request_confirm_action(state: &CourseHomeState) -> Callback<ConfirmDialog> {
    let state = *state;
    use_callback(move |dialog: ConfirmDialog| {
        let action = match dialog {
            ConfirmDialog::CompleteCourse => EnrollmentAction::Complete,
            ConfirmDialog::Unenroll => EnrollmentAction::Unenroll,
        };
        if !state.enrollment.peek().can(action) {
            return;
        }
        let dirty = state
            .vm
            .peek()
            .as_ref()
            .is_some_and(|vm| vm.selection().has_unsaved_changes());
        if dirty {
            let message = match dialog {
                ConfirmDialog::CompleteCourse => "Save your changes before completing the course.",
                ConfirmDialog::Unenroll => "Save your changes before leaving the course.",
            };
            show_notice(state, message);
            return;
        }
        let mut confirm = state.confirm;
        confirm.set(Some(dialog));
    })
}

pub(super) fn build_confirm_dialog_action(
    state: &CourseHomeState,
    enrollment: Callback<EnrollmentRequest>,
) -> Callback<()> {
    let state = *state;
    use_callback(move |()| {
        let mut confirm = state.confirm;
        let Some(dialog) = *confirm.peek() else {
            return;
        };
        confirm.set(None);
        let request = match dialog {
            ConfirmDialog::CompleteCourse => EnrollmentRequest::Complete,
            ConfirmDialog::Unenroll => {
                EnrollmentRequest::Unenroll(UnenrollConfirmation::confirmed_by_learner())
            }
        };
        enrollment.call(request);
    })
}

pub(super) fn build_dismiss_report_action(state: &CourseHomeState) -> Callback<()> {
    let state = *state;
    use_callback(move |()| {
        let mut enrollment = state.enrollment;
        enrollment.write().dismiss_report();
    })
}

/// Close the incomplete-projects report and open one of its projects.
pub(super) fn build_go_to_blocking_project_action(
    state: &CourseHomeState,
    navigate: Callback<LeaveLesson>,
) -> Callback<ProjectId> {
    let state = *state;
    use_callback(move |project_id: ProjectId| {
        let mut enrollment = state.enrollment;
        enrollment.write().dismiss_report();
        navigate.call(LeaveLesson::SelectProject(project_id));
    })
}
