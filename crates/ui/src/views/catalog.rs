use course_core::model::CourseSummary;
use course_core::navigation::CourseAddress;
use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};

#[component]
pub fn CatalogView() -> Element {
    let ctx = use_context::<AppContext>();
    let api = ctx.content_api();
    let default_course_id = ctx.default_course_id();

    let resource = use_resource(move || {
        let api = api.clone();
        async move {
            api.list_courses()
                .await
                .map_err(|err| ViewError::from(&err))
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page catalog",
            h2 { "Courses" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(courses) => rsx! {
                    if courses.is_empty() {
                        p { "No courses yet." }
                        Link {
                            class: "btn btn-primary",
                            to: Route::course_home(default_course_id.clone(), CourseAddress::overview()),
                            "Open {default_course_id}"
                        }
                    } else {
                        ul { class: "catalog-list",
                            for course in courses {
                                CatalogCard { key: "{course.id}", course }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "page-error", "{err.message()}" }
                },
            }
        }
    }
}

#[component]
fn CatalogCard(course: CourseSummary) -> Element {
    let projects = match course.project_count {
        1 => "1 project".to_string(),
        n => format!("{n} projects"),
    };
    rsx! {
        li { class: "catalog-card",
            Link {
                class: "catalog-link",
                to: Route::course_home(course.id.clone(), CourseAddress::overview()),
                span { class: "catalog-title", "{course.title}" }
                span { class: "catalog-meta", "{projects}" }
            }
            if !course.description.is_empty() {
                p { class: "catalog-description", "{course.description}" }
            }
        }
    }
}
