#![allow(non_snake_case)]

pub mod app;
pub mod context;
pub mod routes;
pub mod screen_guard;
pub mod views;
pub mod vm;

pub use app::App;
pub use context::{AppContext, UiApp, build_app_context};
