use std::fmt;

use url::form_urlencoded;

use crate::model::{LessonId, ProjectId};

const PROJECT_KEY: &str = "project";
const LESSON_KEY: &str = "lesson";
const STEP_KEY: &str = "step";

/// How a new address should be written into history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// A distinct, navigable history entry.
    Push,
    /// Overwrite the current entry.
    Replace,
}

/// The navigable part of the selection, as carried in query parameters.
///
/// Parsing is tolerant: unknown keys, empty values and malformed steps are dropped.
/// A step is only kept alongside a lesson and only when it is non-zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CourseAddress {
    pub project: Option<ProjectId>,
    pub lesson: Option<LessonId>,
    pub step: Option<u32>,
}

impl CourseAddress {
    #[must_use]
    pub fn overview() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn project(project: ProjectId) -> Self {
        Self {
            project: Some(project),
            lesson: None,
            step: None,
        }
    }

    #[must_use]
    pub fn lesson(project: ProjectId, lesson: LessonId, step: u32) -> Self {
        Self {
            project: Some(project),
            lesson: Some(lesson),
            step: None,
        }
        .with_step(step)
    }

    #[must_use]
    pub fn with_step(mut self, step: u32) -> Self {
        self.step = (self.lesson.is_some() && step > 0).then_some(step);
        self
    }

    #[must_use]
    pub fn is_overview(&self) -> bool {
        self.project.is_none() && self.lesson.is_none()
    }

    #[must_use]
    pub fn step_index(&self) -> u32 {
        self.step.unwrap_or(0)
    }

    /// Parse a query string, with or without a leading `?`.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut project = None;
        let mut lesson = None;
        let mut step = None;

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                PROJECT_KEY if project.is_none() => project = Some(ProjectId::new(value)),
                LESSON_KEY if lesson.is_none() => lesson = Some(LessonId::new(value)),
                STEP_KEY if step.is_none() => step = value.parse::<u32>().ok(),
                _ => {}
            }
        }

        Self {
            project,
            lesson,
            step: None,
        }
        .with_step(step.unwrap_or(0))
    }

    /// Serialize to a query string without the leading `?`. Absent fields are omitted.
    #[must_use]
    pub fn to_query(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if let Some(project) = &self.project {
            serializer.append_pair(PROJECT_KEY, project.as_str());
        }
        if let Some(lesson) = &self.lesson {
            serializer.append_pair(LESSON_KEY, lesson.as_str());
            if let Some(step) = self.step.filter(|step| *step > 0) {
                serializer.append_pair(STEP_KEY, &step.to_string());
            }
        }
        serializer.finish()
    }

    /// Compare-before-write: how `self` should replace `current`, or `None` if equal.
    ///
    /// Project and lesson changes push; a step-only change replaces.
    #[must_use]
    pub fn write_mode_from(&self, current: &CourseAddress) -> Option<WriteMode> {
        if self == current {
            None
        } else if self.project != current.project || self.lesson != current.lesson {
            Some(WriteMode::Push)
        } else {
            Some(WriteMode::Replace)
        }
    }
}

impl From<&str> for CourseAddress {
    fn from(query: &str) -> Self {
        Self::parse(query)
    }
}

impl fmt::Display for CourseAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_project_lesson_step() {
        let address = CourseAddress::lesson(ProjectId::new("P1"), LessonId::new("L2"), 3);
        assert_eq!(address.to_query(), "project=P1&lesson=L2&step=3");
    }

    #[test]
    fn parses_with_leading_question_mark() {
        let address = CourseAddress::parse("?project=P1&lesson=L2&step=3");
        assert_eq!(
            address,
            CourseAddress::lesson(ProjectId::new("P1"), LessonId::new("L2"), 3)
        );
    }

    #[test]
    fn omitted_fields_are_absent() {
        assert_eq!(CourseAddress::overview().to_query(), "");
        assert_eq!(
            CourseAddress::project(ProjectId::new("P1")).to_query(),
            "project=P1"
        );
        assert_eq!(
            CourseAddress::lesson(ProjectId::new("P1"), LessonId::new("L1"), 0).to_query(),
            "project=P1&lesson=L1"
        );
    }

    #[test]
    fn tolerates_garbage() {
        let address = CourseAddress::parse("project=&lesson=L9&step=abc&utm=x&project=P2");
        assert_eq!(address.project, Some(ProjectId::new("P2")));
        assert_eq!(address.lesson, Some(LessonId::new("L9")));
        assert_eq!(address.step, None);
    }

    #[test]
    fn step_without_lesson_is_dropped() {
        let address = CourseAddress::parse("project=P1&step=4");
        assert_eq!(address, CourseAddress::project(ProjectId::new("P1")));
    }

    #[test]
    fn encodes_reserved_characters() {
        let address = CourseAddress::project(ProjectId::new("a&b c"));
        let query = address.to_query();
        assert_eq!(query, "project=a%26b+c");
        assert_eq!(CourseAddress::parse(&query), address);
    }

    #[test]
    fn write_mode_push_for_navigation_replace_for_steps() {
        let overview = CourseAddress::overview();
        let p1 = CourseAddress::project(ProjectId::new("P1"));
        let l2 = CourseAddress::lesson(ProjectId::new("P1"), LessonId::new("L2"), 0);
        let l2_step = CourseAddress::lesson(ProjectId::new("P1"), LessonId::new("L2"), 2);

        assert_eq!(p1.write_mode_from(&overview), Some(WriteMode::Push));
        assert_eq!(l2.write_mode_from(&p1), Some(WriteMode::Push));
        assert_eq!(l2_step.write_mode_from(&l2), Some(WriteMode::Replace));
        assert_eq!(l2_step.write_mode_from(&l2_step.clone()), None);
        assert_eq!(overview.write_mode_from(&l2_step), Some(WriteMode::Push));
    }

    #[test]
    fn display_matches_query() {
        let address = CourseAddress::lesson(ProjectId::new("P1"), LessonId::new("L2"), 3);
        assert_eq!(address.to_string(), address.to_query());
        assert_eq!(CourseAddress::from(address.to_string().as_str()), address);
    }
}
