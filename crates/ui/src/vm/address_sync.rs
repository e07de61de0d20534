use course_core::navigation::{CourseAddress, WriteMode};

/// Keeps the address bar and the selection from echoing each other.
///
/// Every address this side writes is remembered until the router reports it back, so the
/// echo is not mistaken for an external navigation (back/forward, pasted link).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressSync {
    last_written: Option<CourseAddress>,
}

impl AddressSync {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare-before-write. Returns how `next` should be written over `current`, or `None`
    /// when nothing needs writing.
    pub fn plan_write(&mut self, current: &CourseAddress, next: &CourseAddress) -> Option<WriteMode> {
        let mode = next.write_mode_from(current)?;
        self.record_write(next);
        Some(mode)
    }

    /// Remember a write made without comparing against the address bar.
    pub fn record_write(&mut self, written: &CourseAddress) {
        self.last_written = Some(written.clone());
    }

    /// True when `observed` did not come from our own last write.
    ///
    /// Observing the echo consumes it.
    pub fn is_external(&mut self, observed: &CourseAddress) -> bool {
        if self.last_written.as_ref() == Some(observed) {
            self.last_written = None;
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use course_core::model::{LessonId, ProjectId};

    use super::*;

    fn lesson(step: u32) -> CourseAddress {
        CourseAddress::lesson(ProjectId::new("P1"), LessonId::new("L2"), step)
    }

    #[test]
    fn equal_addresses_are_not_written() {
        let mut sync = AddressSync::new();
        assert_eq!(sync.plan_write(&lesson(1), &lesson(1)), None);
        assert!(sync.is_external(&lesson(1)));
    }

    #[test]
    fn step_change_replaces_and_lesson_change_pushes() {
        let mut sync = AddressSync::new();
        assert_eq!(sync.plan_write(&lesson(1), &lesson(2)), Some(WriteMode::Replace));
        assert_eq!(
            sync.plan_write(&CourseAddress::overview(), &lesson(0)),
            Some(WriteMode::Push)
        );
    }

    #[test]
    fn own_write_echo_is_not_external() {
        let mut sync = AddressSync::new();
        sync.plan_write(&CourseAddress::overview(), &lesson(0));

        assert!(!sync.is_external(&lesson(0)));
        // A second observation of the same address is a real navigation.
        assert!(sync.is_external(&lesson(0)));
    }

    #[test]
    fn recorded_write_is_treated_as_an_echo() {
        let mut sync = AddressSync::new();
        sync.record_write(&lesson(2));
        assert!(!sync.is_external(&lesson(2)));
    }

    #[test]
    fn different_address_is_external() {
        let mut sync = AddressSync::new();
        sync.plan_write(&CourseAddress::overview(), &lesson(0));
        assert!(sync.is_external(&CourseAddress::project(ProjectId::new("P2"))));
    }
}
