use std::sync::Arc;

use course_core::model::CourseId;
use course_core::navigation::ReturnSlot;
use services::ContentApi;

pub trait UiApp: Send + Sync {
    /// Course opened when the catalog has nothing better to offer.
    fn default_course_id(&self) -> CourseId;

    fn content_api(&self) -> Arc<dyn ContentApi>;
}

#[derive(Clone)]
pub struct AppContext {
    default_course_id: CourseId,
    content_api: Arc<dyn ContentApi>,
    return_slot: ReturnSlot,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            default_course_id: app.default_course_id(),
            content_api: app.content_api(),
            return_slot: ReturnSlot::new(),
        }
    }

    #[must_use]
    pub fn default_course_id(&self) -> CourseId {
        self.default_course_id.clone()
    }

    #[must_use]
    pub fn content_api(&self) -> Arc<dyn ContentApi> {
        Arc::clone(&self.content_api)
    }

    /// One-shot "return to this lesson" handoff shared by every screen.
    #[must_use]
    pub fn return_slot(&self) -> ReturnSlot {
        self.return_slot.clone()
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
