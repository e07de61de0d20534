use course_core::model::sample::sample_course_id;
use course_core::model::{CourseId, LessonId, ProjectId};
use course_core::navigation::{ActiveView, CourseAddress, ReturnTarget};
use dioxus::prelude::*;

use crate::routes::Route;
use crate::vm::{ExitChoice, LeaveLesson};

use super::actions::CourseHomeIntent;
use super::state::{ConfirmDialog, ExitState};
use super::test_harness::{CourseHarness, setup_course_harness};

const OVERVIEW_PATH: &str = "/courses/rust-foundations";
const LESSON_PATH: &str = "/courses/rust-foundations?project=P1&lesson=L2&step=3";

fn active_view(harness: &CourseHarness) -> Option<ActiveView> {
    harness.with_state(|state| state.vm.read().as_ref().map(|vm| vm.active_view()))
}

fn has_pending_leave(harness: &CourseHarness) -> bool {
    harness.with_state(|state| {
        state
            .vm
            .read()
            .as_ref()
            .is_some_and(|vm| vm.pending_leave().is_some())
    })
}

fn lesson_view(project: &str, lesson: &str, step: u32) -> Option<ActiveView> {
    Some(ActiveView::LessonEditor {
        project_id: ProjectId::new(project),
        lesson_id: LessonId::new(lesson),
        step,
    })
}

fn exit_prompt_shown(harness: &CourseHarness) -> bool {
    harness.render().contains("exit-prompt")
}

/// Enrolled learner with unsaved text in the deep-linked lesson.
async fn editing_harness() -> CourseHarness {
    let mut harness = setup_course_harness(LESSON_PATH).await;
    harness.mount().await;
    harness.dispatch(CourseHomeIntent::Enroll);
    harness.settle().await;
    harness.dispatch(CourseHomeIntent::DraftChanged("slices borrow a range".to_string()));
    harness.settle().await;
    harness
}

async fn dirty_lesson_harness() -> CourseHarness {
    let mut harness = editing_harness().await;
    harness.dispatch(CourseHomeIntent::Navigate(LeaveLesson::ToOverview));
    harness.settle().await;
    assert!(has_pending_leave(&harness));
    harness
}

#[tokio::test(flavor = "current_thread")]
async fn deep_link_opens_the_requested_step() {
    let mut harness = setup_course_harness(LESSON_PATH).await;
    harness.mount().await;

    let html = harness.render();
    assert!(html.contains("Borrowing"), "{html}");
    assert!(html.contains("Slices"), "{html}");
    assert_eq!(active_view(&harness), lesson_view("P1", "L2", 3));
}

#[tokio::test(flavor = "current_thread")]
async fn unknown_lesson_in_the_address_falls_back_to_its_project() {
    let mut harness =
        setup_course_harness("/courses/rust-foundations?project=P1&lesson=missing").await;
    harness.mount().await;

    assert_eq!(
        active_view(&harness),
        Some(ActiveView::ProjectDetail {
            project_id: ProjectId::new("P1"),
        })
    );
    assert!(harness.render().contains("Ownership Basics"));
    let route = harness.current_route();
    assert!(route.contains("project=P1"), "{route}");
    assert!(!route.contains("lesson="), "{route}");
}

#[tokio::test(flavor = "current_thread")]
async fn unknown_course_shows_a_full_page_error() {
    let mut harness = setup_course_harness("/courses/no-such-course").await;
    harness.mount().await;

    let html = harness.render();
    assert!(html.contains("This course could not be found."), "{html}");
    assert!(html.contains("Back to catalog"));
}

#[tokio::test(flavor = "current_thread")]
async fn leaving_a_dirty_lesson_prompts_first() {
    let harness = dirty_lesson_harness().await;

    let html = harness.render();
    assert!(html.contains("Unsaved changes"), "{html}");
    assert!(html.contains("Save and Close"));
    assert_eq!(active_view(&harness), lesson_view("P1", "L2", 3));
}

#[tokio::test(flavor = "current_thread")]
async fn cancelling_the_exit_prompt_never_saves() {
    let mut harness = dirty_lesson_harness().await;

    harness.dispatch(CourseHomeIntent::ResolveExit(ExitChoice::Cancel));
    harness.settle().await;

    assert_eq!(harness.api.save_calls(), 0);
    assert!(!has_pending_leave(&harness));
    assert_eq!(active_view(&harness), lesson_view("P1", "L2", 3));
    let draft = harness.with_state(|state| state.draft.read().clone());
    assert_eq!(draft, "slices borrow a range");
    assert!(harness.with_state(|state| state.has_unsaved_changes()));
    assert!(!exit_prompt_shown(&harness));
}

#[tokio::test(flavor = "current_thread")]
async fn discarding_leaves_without_saving() {
    let mut harness = dirty_lesson_harness().await;

    harness.dispatch(CourseHomeIntent::ResolveExit(ExitChoice::DiscardAndClose));
    harness.settle().await;

    assert_eq!(harness.api.save_calls(), 0);
    assert_eq!(active_view(&harness), Some(ActiveView::Overview));
    assert!(!harness.current_route().contains("lesson="));
}

#[tokio::test(flavor = "current_thread")]
async fn save_and_close_saves_once_then_leaves() {
    let mut harness = dirty_lesson_harness().await;

    harness.dispatch(CourseHomeIntent::ResolveExit(ExitChoice::SaveAndClose));
    harness.settle().await;

    assert_eq!(harness.api.save_calls(), 1);
    assert_eq!(active_view(&harness), Some(ActiveView::Overview));
    assert!(!harness.with_state(|state| state.has_unsaved_changes()));
}

#[tokio::test(flavor = "current_thread")]
async fn failed_save_keeps_the_lesson_open_with_an_error() {
    let mut harness = dirty_lesson_harness().await;
    harness.api.fail_saves(true);

    harness.dispatch(CourseHomeIntent::ResolveExit(ExitChoice::SaveAndClose));
    harness.settle().await;

    assert_eq!(harness.api.save_calls(), 1);
    assert!(has_pending_leave(&harness));
    assert_eq!(active_view(&harness), lesson_view("P1", "L2", 3));
    let exit_state = harness.with_state(|state| state.exit_state.read().clone());
    assert!(matches!(exit_state, ExitState::Error(_)));
    let html = harness.render();
    assert!(html.contains("Could not save: request failed with status 503"), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn reselecting_the_open_lesson_is_not_guarded() {
    let mut harness = setup_course_harness(LESSON_PATH).await;
    harness.mount().await;
    harness.dispatch(CourseHomeIntent::DraftChanged("draft".to_string()));
    harness.settle().await;

    harness.dispatch(CourseHomeIntent::Navigate(LeaveLesson::SelectLesson {
        project_id: ProjectId::new("P1"),
        lesson_id: LessonId::new("L2"),
    }));
    harness.dispatch(CourseHomeIntent::SetFullscreen(true));
    harness.settle().await;

    assert!(!has_pending_leave(&harness));
    assert_eq!(harness.api.save_calls(), 0);
}

#[tokio::test(flavor = "current_thread")]
async fn step_changes_are_written_to_the_address() {
    let mut harness = setup_course_harness(LESSON_PATH).await;
    harness.mount().await;

    harness.dispatch(CourseHomeIntent::SetStep(1));
    harness.settle().await;

    assert_eq!(active_view(&harness), lesson_view("P1", "L2", 1));
    let route = harness.current_route();
    assert!(route.contains("lesson=L2"), "{route}");
    assert!(route.contains("step=1"), "{route}");
}

#[tokio::test(flavor = "current_thread")]
async fn pending_return_target_wins_over_the_address() {
    let mut harness = setup_course_harness(OVERVIEW_PATH).await;
    harness.ctx.return_slot().request(ReturnTarget {
        course_id: sample_course_id(),
        project_id: ProjectId::new("P2"),
        lesson_id: LessonId::new("L3"),
        step: 1,
    });

    harness.mount().await;

    assert_eq!(active_view(&harness), lesson_view("P2", "L3", 1));
    assert!(!harness.ctx.return_slot().is_pending());
    let route = harness.current_route();
    assert!(route.contains("lesson=L3"), "{route}");
}

#[tokio::test(flavor = "current_thread")]
async fn refused_completion_lists_blocking_projects() {
    let mut harness = setup_course_harness(OVERVIEW_PATH).await;
    harness.mount().await;

    harness.dispatch(CourseHomeIntent::Enroll);
    harness.settle().await;
    harness.dispatch(CourseHomeIntent::RequestComplete);
    harness.settle().await;
    let confirm = harness.with_state(|state| *state.confirm.read());
    assert_eq!(confirm, Some(ConfirmDialog::CompleteCourse));

    harness.dispatch(CourseHomeIntent::ConfirmDialog);
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Finish these projects first"), "{html}");
    assert!(html.contains("Ownership Basics"));
    assert!(html.contains("Go to project"));

    harness.dispatch(CourseHomeIntent::GoToBlockingProject(ProjectId::new("P1")));
    harness.settle().await;

    let report_open = harness.with_state(|state| state.enrollment.read().report().is_some());
    assert!(!report_open);
    assert_eq!(
        active_view(&harness),
        Some(ActiveView::ProjectDetail {
            project_id: ProjectId::new("P1"),
        })
    );
    assert!(harness.current_route().contains("project=P1"));
}

#[tokio::test(flavor = "current_thread")]
async fn catalog_link_waits_for_the_exit_prompt() {
    let mut harness = editing_harness().await;

    harness.click_catalog_link();
    harness.settle().await;

    assert!(exit_prompt_shown(&harness));
    assert!(harness.current_route().starts_with("/courses/rust-foundations"));
    assert_eq!(active_view(&harness), lesson_view("P1", "L2", 3));

    harness.dispatch(CourseHomeIntent::ResolveExit(ExitChoice::SaveAndClose));
    harness.settle().await;

    assert_eq!(harness.api.save_calls(), 1);
    assert_eq!(harness.current_route(), "/");
    assert!(harness.render().contains("3 projects"));
}

#[tokio::test(flavor = "current_thread")]
async fn catalog_link_without_changes_leaves_at_once() {
    let mut harness = setup_course_harness(LESSON_PATH).await;
    harness.mount().await;

    harness.click_catalog_link();
    harness.settle().await;

    assert_eq!(harness.current_route(), "/");
    assert_eq!(harness.api.save_calls(), 0);
}

#[tokio::test(flavor = "current_thread")]
async fn course_switch_from_history_is_held_and_restored_on_cancel() {
    let mut harness = editing_harness().await;

    harness.go_to(Route::course_home(
        CourseId::new("other-course"),
        CourseAddress::overview(),
    ));
    harness.settle().await;

    assert!(exit_prompt_shown(&harness));
    assert_eq!(active_view(&harness), lesson_view("P1", "L2", 3));

    harness.dispatch(CourseHomeIntent::ResolveExit(ExitChoice::Cancel));
    harness.settle().await;

    let route = harness.current_route();
    assert!(route.starts_with("/courses/rust-foundations"), "{route}");
    assert!(route.contains("lesson=L2"), "{route}");
    let draft = harness.with_state(|state| state.draft.read().clone());
    assert_eq!(draft, "slices borrow a range");
    assert_eq!(harness.api.save_calls(), 0);
}

#[tokio::test(flavor = "current_thread")]
async fn discarding_a_held_course_switch_opens_the_other_course() {
    let mut harness = editing_harness().await;
    harness.go_to(Route::course_home(
        CourseId::new("other-course"),
        CourseAddress::overview(),
    ));
    harness.settle().await;

    harness.dispatch(CourseHomeIntent::ResolveExit(ExitChoice::DiscardAndClose));
    harness.settle().await;

    assert_eq!(harness.api.save_calls(), 0);
    assert!(harness.current_route().starts_with("/courses/other-course"));
    assert!(harness.render().contains("This course could not be found."));
}

#[tokio::test(flavor = "current_thread")]
async fn enrollment_changes_wait_for_unsaved_work() {
    let mut harness = editing_harness().await;

    harness.dispatch(CourseHomeIntent::RequestUnenroll);
    harness.settle().await;
    harness.dispatch(CourseHomeIntent::RequestComplete);
    harness.settle().await;

    let confirm = harness.with_state(|state| *state.confirm.read());
    assert_eq!(confirm, None);
    let notice = harness.with_state(|state| state.notice.read().clone());
    assert_eq!(notice.as_deref(), Some("Save your changes before completing the course."));
    assert_eq!(active_view(&harness), lesson_view("P1", "L2", 3));
}

#[tokio::test(flavor = "current_thread")]
async fn clearing_a_saved_draft_is_stored() {
    let mut harness = editing_harness().await;
    let lesson = LessonId::new("L2");

    harness.dispatch(CourseHomeIntent::SaveProgress {
        complete_step: false,
    });
    harness.settle().await;
    assert_eq!(
        harness.stored_draft(&lesson).await.as_deref(),
        Some("slices borrow a range")
    );

    harness.dispatch(CourseHomeIntent::DraftChanged(String::new()));
    harness.dispatch(CourseHomeIntent::SaveProgress {
        complete_step: false,
    });
    harness.settle().await;

    assert_eq!(harness.api.save_calls(), 2);
    assert_eq!(harness.stored_draft(&lesson).await, None);
}

#[tokio::test(flavor = "current_thread")]
async fn history_navigation_closes_the_incomplete_projects_report() {
    let mut harness = setup_course_harness(OVERVIEW_PATH).await;
    harness.mount().await;
    harness.dispatch(CourseHomeIntent::Enroll);
    harness.settle().await;
    harness.dispatch(CourseHomeIntent::RequestComplete);
    harness.settle().await;
    harness.dispatch(CourseHomeIntent::ConfirmDialog);
    harness.settle().await;
    assert!(harness.render().contains("Finish these projects first"));

    harness.go_to(Route::course_home(
        sample_course_id(),
        CourseAddress::project(ProjectId::new("P2")),
    ));
    harness.settle().await;

    assert_eq!(
        active_view(&harness),
        Some(ActiveView::ProjectDetail {
            project_id: ProjectId::new("P2"),
        })
    );
    let report_open = harness.with_state(|state| state.enrollment.read().report().is_some());
    assert!(!report_open);
    assert!(!harness.render().contains("Finish these projects first"));
}
