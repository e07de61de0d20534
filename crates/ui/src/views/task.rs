use course_core::model::{CourseId, LessonCheckpoint, LessonId, ProjectId};
use course_core::navigation::{CourseAddress, ReturnTarget};
use dioxus::prelude::*;
use dioxus_router::use_navigator;
use tracing::warn;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::markdown_to_html;

#[derive(Clone, Debug, PartialEq)]
struct TaskData {
    course_title: String,
    lesson_title: String,
    step_title: String,
    step_body_html: String,
    step: u32,
}

/// A single step opened outside the course homepage.
///
/// Leaving hands the lesson back to the homepage through the return slot.
#[component]
pub fn TaskView(course_id: CourseId, project_id: ProjectId, lesson_id: LessonId, step: u32) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let api = ctx.content_api();
    let return_slot = ctx.return_slot();
    let mut save_error = use_signal(|| None::<String>);
    let mut saving = use_signal(|| false);

    let resource = {
        let course_id = course_id.clone();
        let project_id = project_id.clone();
        let lesson_id = lesson_id.clone();
        let api = api.clone();
        use_resource(move || {
            let api = api.clone();
            let course_id = course_id.clone();
            let project_id = project_id.clone();
            let lesson_id = lesson_id.clone();
            async move {
                let homepage = api
                    .get_course_homepage(&course_id)
                    .await
                    .map_err(|err| ViewError::from(&err))?;
                let lesson = homepage
                    .course
                    .lesson(&project_id, &lesson_id)
                    .ok_or(ViewError::NotFound)?;
                let step = lesson.clamp_step(step);
                let current = lesson.step(step).ok_or(ViewError::NotFound)?;
                Ok(TaskData {
                    course_title: homepage.course.title.clone(),
                    lesson_title: lesson.title.clone(),
                    step_title: current.title.clone(),
                    step_body_html: markdown_to_html(&current.body),
                    step,
                })
            }
        })
    };

    let state = view_state_from_resource(&resource);
    let resolved_step = match &state {
        ViewState::Ready(data) => data.step,
        _ => step,
    };

    let back_to_lesson = {
        let course_id = course_id.clone();
        let project_id = project_id.clone();
        let lesson_id = lesson_id.clone();
        let return_slot = return_slot.clone();
        use_callback(move |()| {
            return_slot.request(ReturnTarget {
                course_id: course_id.clone(),
                project_id: project_id.clone(),
                lesson_id: lesson_id.clone(),
                step: resolved_step,
            });
            navigator.push(Route::course_home(course_id.clone(), CourseAddress::overview()));
        })
    };

    let mark_done = {
        let course_id = course_id.clone();
        let lesson_id = lesson_id.clone();
        use_callback(move |()| {
            if saving() {
                return;
            }
            saving.set(true);
            save_error.set(None);
            let api = api.clone();
            let course_id = course_id.clone();
            let checkpoint = LessonCheckpoint {
                lesson_id: lesson_id.clone(),
                step: resolved_step,
                draft: None,
                complete_step: true,
            };
            spawn(async move {
                let result = api.save_lesson_progress(&course_id, &checkpoint).await;
                saving.set(false);
                match result {
                    Ok(_) => back_to_lesson.call(()),
                    Err(err) => {
                        warn!(course_id = %course_id, error = %err, "marking task done failed");
                        save_error.set(Some(err.to_string()));
                    }
                }
            });
        })
    };

    rsx! {
        div { class: "page task",
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(data) => rsx! {
                    p { class: "task-breadcrumb", "{data.course_title} / {data.lesson_title}" }
                    h2 { class: "task-title", "{data.step_title}" }
                    div { class: "task-body", dangerous_inner_html: "{data.step_body_html}" }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "page-error", "{err.message()}" }
                },
            }
            if let Some(message) = save_error() {
                p { class: "task-error", "{message}" }
            }
            div { class: "task-actions",
                button {
                    class: "btn task-back",
                    r#type: "button",
                    onclick: move |_| back_to_lesson.call(()),
                    "Back to lesson"
                }
                button {
                    class: "btn btn-primary task-done",
                    r#type: "button",
                    disabled: saving(),
                    onclick: move |_| mark_done.call(()),
                    if saving() { "Saving..." } else { "Mark done" }
                }
            }
        }
    }
}
