//! A small built-in course used by the seed command, first launch, and tests.

use crate::model::course::{Course, Lesson, Project, Step};
use crate::model::ids::{CourseId, LessonId, ProjectId};

pub const SAMPLE_COURSE_ID: &str = "rust-foundations";

#[must_use]
pub fn sample_course_id() -> CourseId {
    CourseId::new(SAMPLE_COURSE_ID)
}

/// Three projects, six lessons. `P1` has an XP threshold, `P2` has none.
#[must_use]
pub fn sample_course() -> Course {
    let ownership = Project::new(
        ProjectId::new("P1"),
        "Ownership Basics",
        1,
        vec![
            Lesson::new(
                LessonId::new("L1"),
                "Moves and copies",
                vec![
                    Step::new("What moves", "Assigning a `String` **moves** it.")
                        .required()
                        .with_xp(10),
                    Step::new("Copy types", "Integers implement `Copy`.").with_xp(10),
                    Step::new("Clone", "Call `.clone()` to duplicate heap data.")
                        .required()
                        .with_xp(10),
                ],
            )
            .with_duration(15),
            Lesson::new(
                LessonId::new("L2"),
                "Borrowing",
                vec![
                    Step::new("Shared borrows", "Any number of `&T` at once.").with_xp(5),
                    Step::new("Mutable borrows", "Exactly one `&mut T`.")
                        .required()
                        .with_xp(10),
                    Step::new("Lifetimes", "References never outlive their owner.").with_xp(5),
                    Step::new("Slices", "`&str` and `&[T]` borrow a range.")
                        .required()
                        .with_xp(10),
                ],
            )
            .with_duration(20),
        ],
    )
    .with_description("Moves, copies, and borrows.")
    .with_xp_required(30);

    let errors = Project::new(
        ProjectId::new("P2"),
        "Error Handling",
        2,
        vec![
            Lesson::new(
                LessonId::new("L3"),
                "Result and ?",
                vec![
                    Step::new("Result", "`Result<T, E>` carries success or failure.").with_xp(5),
                    Step::new("The ? operator", "Propagate errors upward.")
                        .required()
                        .with_xp(10),
                    Step::new("Option", "`Option<T>` models absence.").with_xp(5),
                ],
            )
            .with_duration(10),
            Lesson::new(
                LessonId::new("L4"),
                "Custom errors",
                vec![
                    Step::new("Error enums", "One variant per failure.").with_xp(10),
                    Step::new("From conversions", "`#[from]` wires `?` conversions.").with_xp(10),
                ],
            ),
        ],
    )
    .with_description("Recoverable failures without panics.");

    let traits = Project::new(
        ProjectId::new("P3"),
        "Traits",
        3,
        vec![
            Lesson::new(
                LessonId::new("L5"),
                "Defining traits",
                vec![
                    Step::new("Trait items", "Methods, constants, associated types.")
                        .required()
                        .with_xp(15),
                    Step::new("Default methods", "Provide bodies in the trait.").with_xp(10),
                ],
            )
            .with_duration(25),
            Lesson::new(
                LessonId::new("L6"),
                "Trait objects",
                vec![
                    Step::new("dyn Trait", "Dynamic dispatch through a vtable.")
                        .required()
                        .with_xp(15),
                    Step::new("Object safety", "No generic methods on `dyn` traits.").with_xp(10),
                ],
            )
            .with_duration(25),
        ],
    )
    .with_description("Shared behavior and dynamic dispatch.")
    .with_xp_required(40);

    Course {
        id: sample_course_id(),
        title: "Rust Foundations".to_string(),
        description: "A guided path through ownership, errors, and traits.".to_string(),
        projects: vec![ownership, errors, traits],
    }
}
