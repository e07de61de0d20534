use dioxus::prelude::*;

use crate::vm::{LeaveLesson, LessonEditorVm};

use super::super::actions::CourseHomeIntent;
use super::super::state::SaveState;

#[component]
pub fn LessonEditor(
    editor: LessonEditorVm,
    draft: String,
    save_state: SaveState,
    on_step_change: Callback<u32>,
    on_draft_change: Callback<String>,
    on_intent: Callback<CourseHomeIntent>,
) -> Element {
    let step = editor.step_index;
    let has_prev = step > 0;
    let has_next = step + 1 < editor.step_count;
    let step_number = step + 1;
    let fullscreen = editor.is_fullscreen;
    let saving = save_state == SaveState::Saving;
    let dirty = editor.has_unsaved_changes;

    rsx! {
        section { class: if fullscreen { "lesson-editor fullscreen" } else { "lesson-editor" },
            header { class: "lesson-editor-header",
                div { class: "lesson-editor-crumbs",
                    span { class: "lesson-editor-project", "{editor.project_title}" }
                    h2 { class: "lesson-editor-title", "{editor.lesson_title}" }
                }
                div { class: "lesson-editor-tools",
                    button {
                        class: "btn lesson-fullscreen",
                        r#type: "button",
                        onclick: move |_| on_intent.call(CourseHomeIntent::SetFullscreen(!fullscreen)),
                        if fullscreen { "Exit fullscreen" } else { "Fullscreen" }
                    }
                    button {
                        class: "btn lesson-close",
                        r#type: "button",
                        onclick: move |_| on_intent.call(CourseHomeIntent::Navigate(LeaveLesson::CloseLesson)),
                        "Close lesson"
                    }
                }
            }

            div { class: "lesson-step",
                div { class: "lesson-step-nav",
                    button {
                        class: "btn lesson-step-prev",
                        r#type: "button",
                        disabled: !has_prev,
                        onclick: move |_| on_step_change.call(step.saturating_sub(1)),
                        "Previous"
                    }
                    span { class: "lesson-step-counter", "Step {step_number} of {editor.step_count}" }
                    button {
                        class: "btn lesson-step-next",
                        r#type: "button",
                        disabled: !has_next,
                        onclick: move |_| on_step_change.call(step + 1),
                        "Next"
                    }
                }
                h3 { class: "lesson-step-title",
                    "{editor.step_title}"
                    if editor.step_required {
                        span { class: "lesson-step-required", "Required" }
                    }
                    if editor.step_completed {
                        span { class: "lesson-step-done", "Done" }
                    }
                }
                div { class: "lesson-step-body", dangerous_inner_html: "{editor.step_body_html}" }
            }

            textarea {
                class: "lesson-draft",
                placeholder: "Your notes and answers for this lesson",
                value: "{draft}",
                oninput: move |evt| on_draft_change.call(evt.value()),
            }

            div { class: "lesson-editor-actions",
                match save_state {
                    SaveState::Saved => rsx! { span { class: "lesson-save-status", "Saved" } },
                    SaveState::Error(message) => rsx! { span { class: "lesson-save-error", "{message}" } },
                    SaveState::Idle | SaveState::Saving => rsx! {
                        if dirty {
                            span { class: "lesson-save-status", "Unsaved changes" }
                        }
                    },
                }
                button {
                    class: "btn lesson-open-task",
                    r#type: "button",
                    disabled: dirty,
                    onclick: move |_| on_intent.call(CourseHomeIntent::OpenTask),
                    "Open as task"
                }
                button {
                    class: "btn lesson-save",
                    r#type: "button",
                    disabled: saving || !dirty,
                    onclick: move |_| on_intent.call(CourseHomeIntent::SaveProgress { complete_step: false }),
                    if saving { "Saving..." } else { "Save" }
                }
                button {
                    class: "btn btn-primary lesson-mark-done",
                    r#type: "button",
                    disabled: saving || editor.step_completed,
                    onclick: move |_| on_intent.call(CourseHomeIntent::SaveProgress { complete_step: true }),
                    "Mark step done"
                }
            }
        }
    }
}
