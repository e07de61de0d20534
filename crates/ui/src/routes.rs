use course_core::model::{CourseId, LessonId, ProjectId};
use course_core::navigation::CourseAddress;
use dioxus::prelude::*;
use dioxus_router::{Outlet, Routable, use_navigator};

use crate::screen_guard::ScreenGuard;
use crate::views::{CatalogView, CourseHomeView, TaskView};

#[derive(Clone, Debug, Routable, PartialEq, Eq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", CatalogView)] Catalog {},
        #[route("/courses/:course_id?:..query", CourseHomeView)]
        CourseHome { course_id: CourseId, query: CourseAddress },
        #[route("/courses/:course_id/projects/:project_id/lessons/:lesson_id/task/:step", TaskView)]
        Task { course_id: CourseId, project_id: ProjectId, lesson_id: LessonId, step: u32 },
}

impl Route {
    #[must_use]
    pub fn course_home(course_id: CourseId, query: CourseAddress) -> Self {
        Self::CourseHome { course_id, query }
    }
}

#[component]
fn Layout() -> Element {
    let guard = use_context_provider(ScreenGuard::new);
    let navigator = use_navigator();

    rsx! {
        div { class: "app",
            header { class: "topbar",
                button {
                    class: "topbar-brand",
                    r#type: "button",
                    onclick: move |_| guard.leave(navigator, Route::Catalog {}),
                    "Courses"
                }
            }
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}
