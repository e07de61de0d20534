use dioxus::prelude::*;

use crate::vm::{LeaveLesson, OverviewVm};

use super::super::actions::CourseHomeIntent;

#[component]
pub fn CourseOverview(overview: OverviewVm, on_intent: Callback<CourseHomeIntent>) -> Element {
    let summary = overview.summary;
    rsx! {
        section { class: "course-overview",
            h2 { class: "course-overview-title", "{overview.title}" }
            if !overview.description.is_empty() {
                p { class: "course-overview-description", "{overview.description}" }
            }
            div { class: "course-overview-stats",
                span { "{summary.percent_complete}% complete" }
                span { "{summary.completed_projects} of {summary.total_projects} projects completed" }
                span { "{summary.completed_tasks} / {summary.total_tasks} tasks" }
            }
            if !overview.is_enrolled {
                p { class: "course-overview-hint", "Enroll to start saving your progress." }
            }
            ul { class: "course-overview-projects",
                for project in overview.projects {
                    li { key: "{project.id}", class: "course-overview-project",
                        button {
                            r#type: "button",
                            onclick: {
                                let project_id = project.id.clone();
                                move |_| {
                                    on_intent.call(CourseHomeIntent::Navigate(LeaveLesson::SelectProject(project_id.clone())));
                                }
                            },
                            span { class: "project-card-title", "{project.title}" }
                            span { class: "project-card-label", "{project.label}" }
                            span { class: "project-card-progress", "{project.percent}%" }
                        }
                    }
                }
            }
        }
    }
}
