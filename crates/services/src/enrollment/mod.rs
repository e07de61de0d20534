mod lifecycle;
mod machine;

pub use lifecycle::{
    EnrollmentLifecycle, EnrollmentOutcome, EnrollmentRequest, EnrollmentStore,
    UnenrollConfirmation,
};
pub use machine::{BeginRefusal, EnrollmentAction, EnrollmentMachine, EnrollmentPhase, Settled};
