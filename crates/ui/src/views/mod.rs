mod catalog;
mod course;
mod state;
mod task;

pub use catalog::CatalogView;
pub use course::CourseHomeView;
pub use state::{ViewError, ViewState, view_state_from_resource};
pub use task::TaskView;

#[cfg(test)]
mod view_smoke;
