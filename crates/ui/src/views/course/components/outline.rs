use dioxus::prelude::*;

use crate::vm::{LeaveLesson, OutlineProjectVm};

use super::super::actions::CourseHomeIntent;

#[component]
pub fn CourseOutline(projects: Vec<OutlineProjectVm>, on_intent: Callback<CourseHomeIntent>) -> Element {
    rsx! {
        nav { class: "course-outline",
            button {
                class: "outline-overview",
                r#type: "button",
                onclick: move |_| on_intent.call(CourseHomeIntent::Navigate(LeaveLesson::ToOverview)),
                "Course overview"
            }
            ul { class: "outline-projects",
                for project in projects {
                    OutlineProject { key: "{project.id}", project, on_intent }
                }
            }
        }
    }
}

#[component]
fn OutlineProject(project: OutlineProjectVm, on_intent: Callback<CourseHomeIntent>) -> Element {
    let toggle_id = project.id.clone();
    let select_id = project.id.clone();
    let chevron = if project.is_expanded { "▾" } else { "▸" };
    let class = if project.is_selected {
        "outline-project selected"
    } else {
        "outline-project"
    };

    rsx! {
        li { class,
            div { class: "outline-project-row",
                button {
                    class: "outline-toggle",
                    r#type: "button",
                    aria_expanded: project.is_expanded,
                    onclick: move |_| on_intent.call(CourseHomeIntent::ToggleProject(toggle_id.clone())),
                    "{chevron}"
                }
                button {
                    class: "outline-project-title",
                    r#type: "button",
                    onclick: move |_| {
                        on_intent.call(CourseHomeIntent::Navigate(LeaveLesson::SelectProject(select_id.clone())));
                    },
                    "{project.title}"
                }
                span { class: "outline-project-progress", "{project.percent}%" }
            }
            if project.is_expanded {
                ul { class: "outline-lessons",
                    for lesson in project.lessons {
                        li {
                            key: "{lesson.id}",
                            class: if lesson.is_selected { "outline-lesson selected" } else { "outline-lesson" },
                            button {
                                r#type: "button",
                                onclick: {
                                    let project_id = project.id.clone();
                                    let lesson_id = lesson.id.clone();
                                    move |_| {
                                        on_intent.call(CourseHomeIntent::Navigate(LeaveLesson::SelectLesson {
                                            project_id: project_id.clone(),
                                            lesson_id: lesson_id.clone(),
                                        }));
                                    }
                                },
                                span { class: "outline-lesson-title", "{lesson.title}" }
                                span { class: "outline-lesson-status", "{lesson.status_label}" }
                            }
                        }
                    }
                }
            }
        }
    }
}
