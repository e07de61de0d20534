use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use course_core::model::sample::{sample_course, sample_course_id};
use course_core::model::{
    CourseHomepage, CourseId, CourseSummary, LessonCheckpoint, LessonId, LessonProgressRecord,
    ProjectId,
};
use course_core::time::fixed_now;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_history::{History, MemoryHistory, provide_history_context};
use dioxus_router::{Navigator, Router};
use services::{Clock, ContentApi, ContentApiError, CourseService};
use storage::repository::Storage;

use crate::context::{AppContext, UiApp, build_app_context};
use crate::routes::Route;
use crate::screen_guard::ScreenGuard;

use super::actions::CourseHomeIntent;
use super::state::CourseHomeState;

/// Local course service that counts checkpoint saves and can be told to refuse them.
pub(crate) struct RecordingApi {
    inner: CourseService,
    save_calls: AtomicUsize,
    fail_saves: AtomicBool,
}

impl RecordingApi {
    pub(crate) fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ContentApi for RecordingApi {
    async fn list_courses(&self) -> Result<Vec<CourseSummary>, ContentApiError> {
        self.inner.list_courses().await
    }

    async fn get_course_homepage(
        &self,
        course_id: &CourseId,
    ) -> Result<CourseHomepage, ContentApiError> {
        self.inner.get_course_homepage(course_id).await
    }

    async fn enroll(&self, course_id: &CourseId) -> Result<(), ContentApiError> {
        self.inner.enroll(course_id).await
    }

    async fn complete_course(&self, course_id: &CourseId) -> Result<(), ContentApiError> {
        self.inner.complete_course(course_id).await
    }

    async fn unenroll(&self, course_id: &CourseId) -> Result<(), ContentApiError> {
        self.inner.unenroll(course_id).await
    }

    async fn save_lesson_progress(
        &self,
        course_id: &CourseId,
        checkpoint: &LessonCheckpoint,
    ) -> Result<LessonProgressRecord, ContentApiError> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(ContentApiError::HttpStatus { status: 503 });
        }
        self.inner.save_lesson_progress(course_id, checkpoint).await
    }

    async fn complete_project(
        &self,
        course_id: &CourseId,
        project_id: &ProjectId,
    ) -> Result<(), ContentApiError> {
        self.inner.complete_project(course_id, project_id).await
    }
}

struct TestApp {
    api: Arc<RecordingApi>,
}

impl UiApp for TestApp {
    fn default_course_id(&self) -> CourseId {
        sample_course_id()
    }

    fn content_api(&self) -> Arc<dyn ContentApi> {
        self.api.clone()
    }
}

/// Handles the course page registers itself into when running under the harness.
#[derive(Clone, Default)]
pub(crate) struct CourseTestHandles {
    dispatch: Rc<RefCell<Option<Callback<CourseHomeIntent>>>>,
    state: Rc<RefCell<Option<CourseHomeState>>>,
    chrome: Rc<RefCell<Option<(ScreenGuard, Navigator)>>>,
}

impl CourseTestHandles {
    pub(crate) fn register(
        &self,
        dispatch: Callback<CourseHomeIntent>,
        state: CourseHomeState,
        guard: ScreenGuard,
        navigator: Navigator,
    ) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.state.borrow_mut() = Some(state);
        *self.chrome.borrow_mut() = Some((guard, navigator));
    }

    fn chrome(&self) -> (ScreenGuard, Navigator) {
        (*self.chrome.borrow()).expect("course chrome registered")
    }

    pub(crate) fn dispatch(&self) -> Callback<CourseHomeIntent> {
        (*self.dispatch.borrow()).expect("course dispatch registered")
    }

    pub(crate) fn state(&self) -> CourseHomeState {
        (*self.state.borrow()).expect("course state registered")
    }
}

#[derive(Props, Clone)]
struct HarnessProps {
    ctx: AppContext,
    history: Rc<MemoryHistory>,
    handles: CourseTestHandles,
}

impl PartialEq for HarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for HarnessProps {}

#[component]
fn CourseRouterHarness(props: HarnessProps) -> Element {
    let history = props.history.clone();
    use_hook(move || provide_history_context(history));
    use_context_provider(|| props.ctx.clone());
    use_context_provider(|| props.handles.clone());
    rsx! { Router::<Route> {} }
}

pub(crate) struct CourseHarness {
    pub dom: VirtualDom,
    pub api: Arc<RecordingApi>,
    pub ctx: AppContext,
    history: Rc<MemoryHistory>,
    handles: CourseTestHandles,
}

impl CourseHarness {
    pub(crate) fn dispatch(&self, intent: CourseHomeIntent) {
        self.dom.in_runtime(|| self.handles.dispatch().call(intent));
    }

    /// Read page state inside the dom's runtime.
    pub(crate) fn with_state<R>(&self, f: impl FnOnce(CourseHomeState) -> R) -> R {
        let state = self.handles.state();
        self.dom.in_runtime(|| f(state))
    }

    /// Follow the topbar's catalog link.
    pub(crate) fn click_catalog_link(&self) {
        let (guard, navigator) = self.handles.chrome();
        self.dom.in_runtime(|| guard.leave(navigator, Route::Catalog {}));
    }

    /// Navigate the way a history entry would, bypassing the page.
    pub(crate) fn go_to(&self, route: Route) {
        let (_, navigator) = self.handles.chrome();
        self.dom.in_runtime(|| {
            navigator.push(route);
        });
    }

    /// The draft the service has stored for a lesson.
    pub(crate) async fn stored_draft(&self, lesson_id: &LessonId) -> Option<String> {
        self.api
            .get_course_homepage(&sample_course_id())
            .await
            .expect("load homepage")
            .progress
            .lesson(lesson_id)
            .and_then(|record| record.draft.clone())
    }

    pub(crate) fn current_route(&self) -> String {
        self.history.current_route()
    }

    pub(crate) fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }

    pub(crate) async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Drive until spawned loads and their follow-up writes have settled.
    pub(crate) async fn settle(&mut self) {
        for _ in 0..4 {
            self.drive_async().await;
        }
    }

    /// Mount the page and wait for the first homepage to land.
    pub(crate) async fn mount(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
        self.settle().await;
    }
}

pub(crate) fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// Harness over a sample-course service, opened at `path`. Call `mount` to render.
pub(crate) async fn setup_course_harness(path: &str) -> CourseHarness {
    let storage = Storage::in_memory();
    let service = CourseService::new(Clock::fixed(fixed_now()), &storage);
    service
        .ensure_course(&sample_course())
        .await
        .expect("store sample course");

    let api = Arc::new(RecordingApi {
        inner: service,
        save_calls: AtomicUsize::new(0),
        fail_saves: AtomicBool::new(false),
    });
    let app: Arc<dyn UiApp> = Arc::new(TestApp {
        api: Arc::clone(&api),
    });
    let ctx = build_app_context(&app);
    let history = Rc::new(MemoryHistory::with_initial_path(path));
    let handles = CourseTestHandles::default();

    let dom = VirtualDom::new_with_props(
        CourseRouterHarness,
        HarnessProps {
            ctx: ctx.clone(),
            history: Rc::clone(&history),
            handles: handles.clone(),
        },
    );

    CourseHarness {
        dom,
        api,
        ctx,
        history,
        handles,
    }
}
