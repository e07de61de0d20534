use super::course::test_harness::setup_course_harness;

#[tokio::test(flavor = "current_thread")]
async fn catalog_lists_stored_courses() {
    let mut harness = setup_course_harness("/").await;
    harness.mount().await;

    let html = harness.render();
    assert!(html.contains("Courses"), "{html}");
    assert!(html.contains("Rust Foundations"), "{html}");
    assert!(html.contains("3 projects"), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn course_overview_renders_outline_and_progress() {
    let mut harness = setup_course_harness("/courses/rust-foundations").await;
    harness.mount().await;

    let html = harness.render();
    assert!(html.contains("Rust Foundations"), "{html}");
    assert!(html.contains("Ownership Basics"));
    assert!(html.contains("Error Handling"));
    assert!(html.contains("Traits"));
    assert!(html.contains("Enroll"));
}

#[tokio::test(flavor = "current_thread")]
async fn task_screen_renders_step_markdown() {
    let mut harness =
        setup_course_harness("/courses/rust-foundations/projects/P1/lessons/L1/task/0").await;
    harness.mount().await;

    let html = harness.render();
    assert!(html.contains("What moves"), "{html}");
    assert!(html.contains("<strong>moves</strong>"), "{html}");
    assert!(html.contains("Back to lesson"));
}

#[tokio::test(flavor = "current_thread")]
async fn task_screen_reports_unknown_lessons() {
    let mut harness =
        setup_course_harness("/courses/rust-foundations/projects/P1/lessons/L9/task/0").await;
    harness.mount().await;

    let html = harness.render();
    assert!(html.contains("This course could not be found."), "{html}");
}
