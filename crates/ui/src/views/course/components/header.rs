use dioxus::prelude::*;
use services::enrollment::EnrollmentPhase;

use super::super::actions::CourseHomeIntent;

#[component]
pub fn CourseHeader(
    title: String,
    phase: EnrollmentPhase,
    on_intent: Callback<CourseHomeIntent>,
) -> Element {
    let busy = phase.is_busy();
    let status = match phase {
        EnrollmentPhase::NotEnrolled => "Not enrolled",
        EnrollmentPhase::Enrolling => "Enrolling...",
        EnrollmentPhase::Active => "Enrolled",
        EnrollmentPhase::Completing => "Completing...",
        EnrollmentPhase::Completed => "Completed",
        EnrollmentPhase::Unenrolling => "Unenrolling...",
    };

    rsx! {
        header { class: "course-header",
            h1 { class: "course-title", "{title}" }
            span { class: "course-enrollment-status", "{status}" }
            div { class: "course-enrollment-actions",
                match phase {
                    EnrollmentPhase::NotEnrolled | EnrollmentPhase::Enrolling => rsx! {
                        button {
                            class: "btn btn-primary course-enroll",
                            r#type: "button",
                            disabled: busy,
                            onclick: move |_| on_intent.call(CourseHomeIntent::Enroll),
                            "Enroll"
                        }
                    },
                    EnrollmentPhase::Active | EnrollmentPhase::Completing | EnrollmentPhase::Unenrolling => rsx! {
                        button {
                            class: "btn btn-primary course-complete",
                            r#type: "button",
                            disabled: busy,
                            onclick: move |_| on_intent.call(CourseHomeIntent::RequestComplete),
                            "Complete course"
                        }
                        button {
                            class: "btn btn-danger course-unenroll",
                            r#type: "button",
                            disabled: busy,
                            onclick: move |_| on_intent.call(CourseHomeIntent::RequestUnenroll),
                            "Unenroll"
                        }
                    },
                    EnrollmentPhase::Completed => rsx! {},
                }
            }
        }
    }
}

#[component]
pub fn CourseNotice(message: Option<String>, on_intent: Callback<CourseHomeIntent>) -> Element {
    let Some(message) = message else {
        return rsx! {};
    };
    rsx! {
        div { class: "course-notice", role: "status",
            span { "{message}" }
            button {
                class: "course-notice-dismiss",
                r#type: "button",
                onclick: move |_| on_intent.call(CourseHomeIntent::DismissNotice),
                "Dismiss"
            }
        }
    }
}
