use std::cell::RefCell;
use std::sync::Arc;

use tracing::{debug, info, warn};

use course_core::model::{CourseHomepage, CourseId};

use crate::content_api::ContentApi;
use crate::enrollment::machine::{BeginRefusal, EnrollmentAction, EnrollmentMachine, Settled};

/// Somewhere an `EnrollmentMachine` lives between awaits.
///
/// Borrows are scoped to the closure so the machine is never held across a mutation.
pub trait EnrollmentStore {
    fn with_machine<R>(&self, f: impl FnOnce(&mut EnrollmentMachine) -> R) -> R;
}

impl EnrollmentStore for RefCell<EnrollmentMachine> {
    fn with_machine<R>(&self, f: impl FnOnce(&mut EnrollmentMachine) -> R) -> R {
        f(&mut self.borrow_mut())
    }
}

/// Proof that the learner confirmed the destructive unenroll dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnenrollConfirmation {
    _confirmed: (),
}

impl UnenrollConfirmation {
    /// Only call from the confirm button of the unenroll dialog.
    #[must_use]
    pub fn confirmed_by_learner() -> Self {
        Self { _confirmed: () }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentRequest {
    Enroll,
    Complete,
    Unenroll(UnenrollConfirmation),
}

impl EnrollmentRequest {
    #[must_use]
    pub fn action(self) -> EnrollmentAction {
        match self {
            Self::Enroll => EnrollmentAction::Enroll,
            Self::Complete => EnrollmentAction::Complete,
            Self::Unenroll(_) => EnrollmentAction::Unenroll,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnrollmentOutcome {
    /// Nothing was sent.
    Ignored(BeginRefusal),
    Settled {
        settled: Settled,
        /// The refetched homepage, when the follow-up load succeeded.
        homepage: Option<Box<CourseHomepage>>,
    },
}

impl EnrollmentOutcome {
    #[must_use]
    pub fn settled(&self) -> Option<&Settled> {
        match self {
            Self::Settled { settled, .. } => Some(settled),
            Self::Ignored(_) => None,
        }
    }
}

/// Runs enrollment mutations: begin, mutate, refetch, settle.
#[derive(Clone)]
pub struct EnrollmentLifecycle {
    api: Arc<dyn ContentApi>,
    course_id: CourseId,
}

impl EnrollmentLifecycle {
    #[must_use]
    pub fn new(api: Arc<dyn ContentApi>, course_id: CourseId) -> Self {
        Self { api, course_id }
    }

    #[must_use]
    pub fn course_id(&self) -> &CourseId {
        &self.course_id
    }

    /// Perform `request` against the machine in `store`.
    ///
    /// A request refused by the machine (busy, or wrong phase) issues no mutation.
    pub async fn perform<S>(&self, store: &S, request: EnrollmentRequest) -> EnrollmentOutcome
    where
        S: EnrollmentStore + ?Sized,
    {
        let action = request.action();
        if let Err(refusal) = store.with_machine(|machine| machine.begin(action)) {
            debug!(course_id = %self.course_id, %action, ?refusal, "enrollment action ignored");
            return EnrollmentOutcome::Ignored(refusal);
        }

        let result = match request {
            EnrollmentRequest::Enroll => self.api.enroll(&self.course_id).await,
            EnrollmentRequest::Complete => self.api.complete_course(&self.course_id).await,
            EnrollmentRequest::Unenroll(_) => self.api.unenroll(&self.course_id).await,
        };

        if let Err(err) = result {
            warn!(course_id = %self.course_id, %action, error = %err, "enrollment action failed");
            let settled = store.with_machine(|machine| machine.fail(action, err));
            return EnrollmentOutcome::Settled {
                settled,
                homepage: None,
            };
        }

        let refetched = self.api.get_course_homepage(&self.course_id).await;
        let settled = store.with_machine(|machine| {
            machine.succeed(action, refetched.as_ref().map(|homepage| &homepage.enrollment))
        });
        info!(course_id = %self.course_id, %action, ?settled, "enrollment action settled");

        EnrollmentOutcome::Settled {
            settled,
            homepage: refetched.ok().map(Box::new),
        }
    }
}
