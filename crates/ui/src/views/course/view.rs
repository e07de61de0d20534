use course_core::model::CourseId;
use course_core::navigation::{ActiveView, CourseAddress};
use dioxus::prelude::*;
use dioxus_router::Link;
use services::enrollment::EnrollmentPhase;

use crate::context::AppContext;
use crate::routes::Route;
use crate::screen_guard::ScreenGuard;
use crate::vm::LeaveLesson;

use super::actions::{CourseHomeIntent, LoadMode, use_course_home_dispatcher};
use super::components::{
    CourseHeader, CourseNotice, CourseOutline, CourseOverlays, CourseOverview, LessonEditor,
    ProjectDetail,
};
use super::state::{CourseHomeServices, LoadState, use_course_home_state};

#[component]
pub fn CourseHomeView(course_id: CourseId, query: CourseAddress) -> Element {
    let ctx = use_context::<AppContext>();
    let services = CourseHomeServices::from_context(&ctx);
    let state = use_course_home_state(&course_id, &query);
    let dispatcher = use_course_home_dispatcher(&state, &services);
    let on_intent = dispatcher.dispatch;
    let guard = use_context::<ScreenGuard>();

    #[cfg(test)]
    {
        let navigator = dioxus_router::use_navigator();
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<super::test_harness::CourseTestHandles>() {
                handles.register(on_intent, state, guard, navigator);
            }
        }
    }

    use_effect(move || guard.set_dirty(state.has_unsaved_changes()));
    use_effect(move || {
        if let Some(route) = guard.take_held() {
            on_intent.call(CourseHomeIntent::Navigate(LeaveLesson::LeaveScreen(route)));
        }
    });
    use_drop(move || guard.set_dirty(false));

    let load = dispatcher.load;
    use_effect(move || load.call(LoadMode::Initial));

    let observe_route = dispatcher.observe_route;
    use_effect(use_reactive!(|(course_id, query)| {
        observe_route.call((course_id, query));
    }));

    let on_step_change =
        use_callback(move |index: u32| on_intent.call(CourseHomeIntent::SetStep(index)));
    let on_draft_change =
        use_callback(move |text: String| on_intent.call(CourseHomeIntent::DraftChanged(text)));

    let load_state = (state.load_state)();
    let vm = state.vm.read().clone();
    let machine = state.enrollment.read().clone();
    let draft = state.draft.read().clone();
    let save_state = state.save_state.read().clone();
    let exit_state = state.exit_state.read().clone();
    let confirm = (state.confirm)();
    let notice = state.notice.read().clone();
    let completing = (state.completing_project)();

    let body = match (load_state, vm) {
        (LoadState::Error(err), _) => rsx! {
            div { class: "course-error",
                p { "{err.message()}" }
                div { class: "course-error-actions",
                    button {
                        class: "btn btn-primary course-retry",
                        r#type: "button",
                        onclick: move |_| on_intent.call(CourseHomeIntent::Retry),
                        "Retry"
                    }
                    Link { class: "btn course-back", to: Route::Catalog {}, "Back to catalog" }
                }
            }
        },
        (LoadState::Ready, Some(vm)) => {
            let fullscreen = vm.selection().is_fullscreen();
            let is_enrolled = matches!(
                machine.phase(),
                EnrollmentPhase::Active | EnrollmentPhase::Completing | EnrollmentPhase::Unenrolling
            );
            let main = match vm.active_view() {
                ActiveView::Overview => rsx! {
                    CourseOverview { overview: vm.overview(), on_intent }
                },
                ActiveView::ProjectDetail { .. } => match vm.project_detail() {
                    Some(project) => rsx! {
                        ProjectDetail { project, is_enrolled, completing, on_intent }
                    },
                    None => rsx! {},
                },
                ActiveView::LessonEditor { .. } => match vm.lesson_editor() {
                    Some(editor) => rsx! {
                        LessonEditor {
                            editor,
                            draft,
                            save_state,
                            on_step_change,
                            on_draft_change,
                            on_intent,
                        }
                    },
                    None => rsx! {},
                },
            };
            rsx! {
                if !fullscreen {
                    CourseHeader { title: vm.course().title.clone(), phase: machine.phase(), on_intent }
                }
                div { class: "course-body",
                    if !fullscreen {
                        CourseOutline { projects: vm.outline(), on_intent }
                    }
                    div { class: "course-main", {main} }
                }
                CourseOverlays {
                    show_exit_prompt: vm.pending_leave().is_some(),
                    exit_state,
                    confirm,
                    report: machine.report().cloned(),
                    on_intent,
                }
            }
        }
        _ => rsx! {
            p { class: "course-loading", "Loading course..." }
        },
    };

    rsx! {
        div { class: "page course-home",
            {body}
            CourseNotice { message: notice, on_intent }
        }
    }
}
