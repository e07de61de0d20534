//! Client-side navigation state for the course homepage.

pub mod address;
pub mod handoff;
pub mod selection;

pub use address::{CourseAddress, WriteMode};
pub use handoff::{ReturnSlot, ReturnTarget};
pub use selection::{ActiveView, AddressOutcome, SelectionState};
