use dioxus::prelude::*;

use crate::vm::{LeaveLesson, ProjectDetailVm};

use super::super::actions::CourseHomeIntent;

fn requirement_class(met: bool) -> &'static str {
    if met {
        "requirement met"
    } else {
        "requirement unmet"
    }
}

#[component]
pub fn ProjectDetail(
    project: ProjectDetailVm,
    is_enrolled: bool,
    completing: bool,
    on_intent: Callback<CourseHomeIntent>,
) -> Element {
    let complete_id = project.id.clone();
    let xp_text = if project.xp_required == 0 {
        "No XP requirement".to_string()
    } else {
        format!("{} / {} XP", project.earned_xp, project.xp_required)
    };

    rsx! {
        section { class: "project-detail",
            h2 { class: "project-detail-title", "{project.title}" }
            span { class: "project-detail-label", "{project.label} · {project.percent}%" }
            div { class: "project-detail-description", dangerous_inner_html: "{project.description_html}" }

            ul { class: "project-requirements",
                li { class: requirement_class(project.xp_met), "{xp_text}" }
                li { class: requirement_class(project.required_tasks_met),
                    "{project.completed_required_tasks} / {project.total_required_tasks} required tasks"
                }
            }

            if project.is_completed {
                p { class: "project-completed", "Project completed" }
            } else if is_enrolled {
                button {
                    class: "btn btn-primary project-complete",
                    r#type: "button",
                    disabled: !project.can_complete || completing,
                    onclick: move |_| on_intent.call(CourseHomeIntent::CompleteProject(complete_id.clone())),
                    if completing { "Completing..." } else { "Complete project" }
                }
            }

            ol { class: "project-lessons",
                for lesson in project.lessons {
                    li { key: "{lesson.id}", class: "project-lesson",
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
                            span { class: "project-lesson-title", "{lesson.title}" }
                            if let Some(minutes) = lesson.duration_minutes {
                                span { class: "project-lesson-duration", "{minutes} min" }
                            }
                            span { class: "project-lesson-status", "{lesson.status_label}" }
                            if lesson.has_unmet_required_tasks {
                                span { class: "project-lesson-required", "Required tasks open" }
                            }
                        }
                    }
                }
            }
        }
    }
}
