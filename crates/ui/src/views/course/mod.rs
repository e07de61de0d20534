mod actions;
mod components;
pub(crate) mod state;
mod view;

pub use view::CourseHomeView;

#[cfg(test)]
pub(crate) mod test_harness;

#[cfg(test)]
mod intent_smoke;
