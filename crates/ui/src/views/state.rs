use dioxus::prelude::*;
use services::ContentApiError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    NotFound,
    Unavailable,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::NotFound => "This course could not be found.",
            Self::Unavailable => "The course service is unreachable. Check your connection.",
            Self::Unknown => "Something went wrong. Please try again.",
        }
    }
}

impl From<&ContentApiError> for ViewError {
    fn from(err: &ContentApiError) -> Self {
        match err {
            ContentApiError::NotFound => Self::NotFound,
            ContentApiError::Http(_) | ContentApiError::HttpStatus { .. } => Self::Unavailable,
            _ => Self::Unknown,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
