use course_core::model::CourseId;

/// Identifies one homepage load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    course_id: CourseId,
    generation: u64,
}

impl LoadTicket {
    #[must_use]
    pub fn course_id(&self) -> &CourseId {
        &self.course_id
    }
}

/// Only the most recently started load may land.
///
/// Results for another course, or for an earlier load of the same course, are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchGuard {
    latest: Option<LoadTicket>,
    generation: u64,
}

impl FetchGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, course_id: CourseId) -> LoadTicket {
        self.generation += 1;
        let ticket = LoadTicket {
            course_id,
            generation: self.generation,
        };
        self.latest = Some(ticket.clone());
        ticket
    }

    #[must_use]
    pub fn accepts(&self, ticket: &LoadTicket) -> bool {
        self.latest.as_ref() == Some(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_for_previous_course_is_rejected() {
        let mut guard = FetchGuard::new();
        let first = guard.begin(CourseId::new("rust-foundations"));
        let second = guard.begin(CourseId::new("async-rust"));

        assert!(!guard.accepts(&first));
        assert!(guard.accepts(&second));
    }

    #[test]
    fn superseded_reload_of_same_course_is_rejected() {
        let mut guard = FetchGuard::new();
        let first = guard.begin(CourseId::new("rust-foundations"));
        let retry = guard.begin(CourseId::new("rust-foundations"));

        assert!(!guard.accepts(&first));
        assert!(guard.accepts(&retry));
        assert_eq!(retry.course_id().as_str(), "rust-foundations");
    }
}
