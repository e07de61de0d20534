use course_core::model::{IncompleteProject, IncompleteProjectsReport};
use dioxus::prelude::*;

use crate::vm::ExitChoice;

use super::super::actions::CourseHomeIntent;
use super::super::state::{ConfirmDialog, ExitState};

#[component]
pub fn CourseOverlays(
    show_exit_prompt: bool,
    exit_state: ExitState,
    confirm: Option<ConfirmDialog>,
    report: Option<IncompleteProjectsReport>,
    on_intent: Callback<CourseHomeIntent>,
) -> Element {
    let exit_saving = exit_state == ExitState::Saving;

    rsx! {
        if show_exit_prompt {
            div {
                class: "editor-modal-overlay",
                onclick: move |_| on_intent.call(CourseHomeIntent::ResolveExit(ExitChoice::Cancel)),
                div {
                    class: "editor-modal exit-prompt",
                    onclick: move |evt| evt.stop_propagation(),
                    h3 { class: "editor-modal-title", "Unsaved changes" }
                    p { class: "editor-modal-body",
                        "You have unsaved work in this lesson. Save it before leaving?"
                    }
                    if let ExitState::Error(message) = &exit_state {
                        p { class: "editor-modal-error", "Could not save: {message}" }
                    }
                    div { class: "editor-modal-actions",
                        button {
                            class: "btn editor-modal-cancel",
                            r#type: "button",
                            disabled: exit_saving,
                            onclick: move |_| on_intent.call(CourseHomeIntent::ResolveExit(ExitChoice::Cancel)),
                            "Keep Editing"
                        }
                        button {
                            class: "btn editor-modal-discard",
                            r#type: "button",
                            disabled: exit_saving,
                            onclick: move |_| on_intent.call(CourseHomeIntent::ResolveExit(ExitChoice::DiscardAndClose)),
                            "Discard"
                        }
                        button {
                            class: "btn btn-primary editor-modal-confirm",
                            r#type: "button",
                            disabled: exit_saving,
                            onclick: move |_| on_intent.call(CourseHomeIntent::ResolveExit(ExitChoice::SaveAndClose)),
                            if exit_saving { "Saving..." } else { "Save and Close" }
                        }
                    }
                }
            }
        }
        match confirm {
            Some(ConfirmDialog::CompleteCourse) => rsx! {
                ConfirmModal {
                    title: "Complete this course?",
                    body: "Your enrollment ends and your progress is kept.",
                    confirm_label: "Complete Course",
                    destructive: false,
                    on_intent,
                }
            },
            Some(ConfirmDialog::Unenroll) => rsx! {
                ConfirmModal {
                    title: "Leave this course?",
                    body: "Unenrolling deletes all of your progress in this course. This cannot be undone.",
                    confirm_label: "Unenroll",
                    destructive: true,
                    on_intent,
                }
            },
            None => rsx! {},
        }
        if let Some(report) = report {
            IncompleteProjectsModal { report, on_intent }
        }
    }
}

#[component]
fn ConfirmModal(
    title: &'static str,
    body: &'static str,
    confirm_label: &'static str,
    destructive: bool,
    on_intent: Callback<CourseHomeIntent>,
) -> Element {
    let confirm_class = if destructive {
        "btn btn-danger editor-modal-confirm"
    } else {
        "btn btn-primary editor-modal-confirm"
    };
    rsx! {
        div {
            class: "editor-modal-overlay",
            onclick: move |_| on_intent.call(CourseHomeIntent::CloseDialog),
            div {
                class: "editor-modal",
                onclick: move |evt| evt.stop_propagation(),
                h3 { class: "editor-modal-title", "{title}" }
                p { class: "editor-modal-body", "{body}" }
                div { class: "editor-modal-actions",
                    button {
                        class: "btn editor-modal-cancel",
                        r#type: "button",
                        onclick: move |_| on_intent.call(CourseHomeIntent::CloseDialog),
                        "Cancel"
                    }
                    button {
                        class: confirm_class,
                        r#type: "button",
                        onclick: move |_| on_intent.call(CourseHomeIntent::ConfirmDialog),
                        "{confirm_label}"
                    }
                }
            }
        }
    }
}

fn requirement_text(project: &IncompleteProject) -> Vec<String> {
    let mut lines = Vec::new();
    if !project.xp.met {
        lines.push(format!("XP {} / {}", project.xp.current, project.xp.required));
    }
    if !project.required_tasks.met {
        lines.push(format!(
            "Required tasks {} / {}",
            project.required_tasks.current, project.required_tasks.required
        ));
    }
    lines
}

#[component]
fn IncompleteProjectsModal(
    report: IncompleteProjectsReport,
    on_intent: Callback<CourseHomeIntent>,
) -> Element {
    rsx! {
        div {
            class: "editor-modal-overlay",
            onclick: move |_| on_intent.call(CourseHomeIntent::DismissReport),
            div {
                class: "editor-modal incomplete-projects",
                onclick: move |evt| evt.stop_propagation(),
                h3 { class: "editor-modal-title", "Finish these projects first" }
                p { class: "editor-modal-body",
                    "The course can be completed once every project below is done."
                }
                ul { class: "incomplete-project-list",
                    for project in report.projects {
                        li { key: "{project.project_id}", class: "incomplete-project",
                            span { class: "incomplete-project-title", "{project.title}" }
                            for line in requirement_text(&project) {
                                span { class: "incomplete-project-requirement", "{line}" }
                            }
                            button {
                                class: "btn incomplete-project-go",
                                r#type: "button",
                                onclick: {
                                    let project_id = project.project_id.clone();
                                    move |_| on_intent.call(CourseHomeIntent::GoToBlockingProject(project_id.clone()))
                                },
                                "Go to project"
                            }
                        }
                    }
                }
                div { class: "editor-modal-actions",
                    button {
                        class: "btn editor-modal-cancel",
                        r#type: "button",
                        onclick: move |_| on_intent.call(CourseHomeIntent::DismissReport),
                        "Close"
                    }
                }
            }
        }
    }
}
