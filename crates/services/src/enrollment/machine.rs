use std::fmt;

use course_core::model::{Enrollment, IncompleteProjectsReport};

use crate::error::ContentApiError;

/// Where the learner stands with the current course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentPhase {
    NotEnrolled,
    Enrolling,
    Active,
    Completing,
    Completed,
    Unenrolling,
}

impl EnrollmentPhase {
    #[must_use]
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Enrolling | Self::Completing | Self::Unenrolling)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentAction {
    Enroll,
    Complete,
    Unenroll,
}

impl EnrollmentAction {
    fn required_phase(self) -> EnrollmentPhase {
        match self {
            Self::Enroll => EnrollmentPhase::NotEnrolled,
            Self::Complete | Self::Unenroll => EnrollmentPhase::Active,
        }
    }

    fn in_flight_phase(self) -> EnrollmentPhase {
        match self {
            Self::Enroll => EnrollmentPhase::Enrolling,
            Self::Complete => EnrollmentPhase::Completing,
            Self::Unenroll => EnrollmentPhase::Unenrolling,
        }
    }
}

impl fmt::Display for EnrollmentAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Enroll => "enroll",
            Self::Complete => "complete",
            Self::Unenroll => "unenroll",
        })
    }
}

/// Why an action was not started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeginRefusal {
    /// Another action is in flight.
    Busy(EnrollmentAction),
    /// The action is not valid from the current phase.
    InvalidPhase(EnrollmentPhase),
}

/// What a finished action means for the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled {
    Enrolled,
    /// Enrollment could not be confirmed by the refetch.
    EnrollUnconfirmed,
    Completed,
    Unenrolled,
    /// Completion was refused with a report of blocking projects.
    Blocked,
    Failed(String),
}

impl Settled {
    /// The learner leaves the course homepage for the catalog.
    #[must_use]
    pub fn routes_to_catalog(&self) -> bool {
        matches!(self, Self::Completed | Self::Unenrolled)
    }
}

/// Enroll / complete / unenroll state machine for one course.
///
/// Only one action may be in flight; the phase doubles as the busy flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentMachine {
    phase: EnrollmentPhase,
    error: Option<String>,
    report: Option<IncompleteProjectsReport>,
}

impl Default for EnrollmentMachine {
    fn default() -> Self {
        Self {
            phase: EnrollmentPhase::NotEnrolled,
            error: None,
            report: None,
        }
    }
}

impl EnrollmentMachine {
    #[must_use]
    pub fn from_enrollment(enrollment: &Enrollment) -> Self {
        let mut machine = Self::default();
        machine.sync(enrollment);
        machine
    }

    #[must_use]
    pub fn phase(&self) -> EnrollmentPhase {
        self.phase
    }

    #[must_use]
    pub fn busy_action(&self) -> Option<EnrollmentAction> {
        match self.phase {
            EnrollmentPhase::Enrolling => Some(EnrollmentAction::Enroll),
            EnrollmentPhase::Completing => Some(EnrollmentAction::Complete),
            EnrollmentPhase::Unenrolling => Some(EnrollmentAction::Unenroll),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.phase.is_busy()
    }

    #[must_use]
    pub fn can(&self, action: EnrollmentAction) -> bool {
        self.phase == action.required_phase()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn report(&self) -> Option<&IncompleteProjectsReport> {
        self.report.as_ref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Drop the incomplete-projects report once its modal is closed.
    pub fn dismiss_report(&mut self) {
        self.report = None;
    }

    /// Follow a freshly loaded enrollment. Ignored while an action is in flight.
    pub fn sync(&mut self, enrollment: &Enrollment) {
        if self.is_busy() {
            return;
        }
        self.phase = if enrollment.is_enrolled() {
            EnrollmentPhase::Active
        } else if self.phase == EnrollmentPhase::Completed {
            EnrollmentPhase::Completed
        } else {
            EnrollmentPhase::NotEnrolled
        };
    }

    /// Move into the in-flight phase for `action`.
    ///
    /// # Errors
    ///
    /// Returns `BeginRefusal` when another action is running or the phase does not allow it.
    pub fn begin(&mut self, action: EnrollmentAction) -> Result<(), BeginRefusal> {
        if let Some(running) = self.busy_action() {
            return Err(BeginRefusal::Busy(running));
        }
        if !self.can(action) {
            return Err(BeginRefusal::InvalidPhase(self.phase));
        }
        self.phase = action.in_flight_phase();
        self.error = None;
        self.report = None;
        Ok(())
    }

    /// Settle a successful mutation. `refetched` is the enrollment from the follow-up load.
    pub fn succeed(
        &mut self,
        action: EnrollmentAction,
        refetched: Result<&Enrollment, &ContentApiError>,
    ) -> Settled {
        if self.busy_action() != Some(action) {
            return Settled::Failed(format!("{action} was not in progress"));
        }
        match action {
            EnrollmentAction::Enroll => match refetched {
                Ok(enrollment) if enrollment.is_enrolled() => {
                    self.phase = EnrollmentPhase::Active;
                    Settled::Enrolled
                }
                Ok(_) => {
                    self.phase = EnrollmentPhase::NotEnrolled;
                    self.error = Some("Enrollment could not be confirmed.".into());
                    Settled::EnrollUnconfirmed
                }
                Err(err) => {
                    self.phase = EnrollmentPhase::NotEnrolled;
                    self.error = Some(err.to_string());
                    Settled::EnrollUnconfirmed
                }
            },
            EnrollmentAction::Complete => {
                self.phase = EnrollmentPhase::Completed;
                Settled::Completed
            }
            EnrollmentAction::Unenroll => {
                self.phase = EnrollmentPhase::NotEnrolled;
                Settled::Unenrolled
            }
        }
    }

    /// Settle a rejected mutation, rolling back to the phase it started from.
    pub fn fail(&mut self, action: EnrollmentAction, err: ContentApiError) -> Settled {
        if self.busy_action() != Some(action) {
            return Settled::Failed(format!("{action} was not in progress"));
        }
        self.phase = action.required_phase();
        match err {
            ContentApiError::IncompleteProjects(report) if action == EnrollmentAction::Complete => {
                self.report = Some(report);
                Settled::Blocked
            }
            other => {
                let message = other.to_string();
                self.error = Some(message.clone());
                Settled::Failed(message)
            }
        }
    }
}
