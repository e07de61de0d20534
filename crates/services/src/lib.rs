#![forbid(unsafe_code)]

pub mod content_api;
pub mod course_service;
pub mod enrollment;
pub mod error;
pub mod http_api;

pub use course_core::Clock;

pub use content_api::ContentApi;
pub use course_service::CourseService;
pub use error::{AppServicesError, ContentApiError};
pub use http_api::HttpContentApi;
