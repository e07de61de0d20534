use std::sync::Arc;

use async_trait::async_trait;
use course_core::model::{CourseId, LessonCheckpoint, ProjectId};
use dioxus::prelude::*;
use dioxus_router::Navigator;
use services::{ContentApi, ContentApiError};
use tracing::{info, warn};

use crate::vm::{EditorSurface, ExitChoice, ExitSettlement, LeaveLesson, settle_exit};

use super::super::state::{CourseHomeServices, CourseHomeState, ExitState, SaveState};
use super::loading::LoadMode;
use super::navigation::settle_leave;
use super::sync::{restore_course_address, show_notice, sync_after_selection};

/// Saves one checkpoint of the open lesson through the content API.
struct CheckpointSurface {
    api: Arc<dyn ContentApi>,
    course_id: CourseId,
    checkpoint: LessonCheckpoint,
}

#[async_trait(?Send)]
impl EditorSurface for CheckpointSurface {
    async fn save_progress(&self) -> Result<(), ContentApiError> {
        self.api
            .save_lesson_progress(&self.course_id, &self.checkpoint)
            .await
            .map(|_| ())
    }
}

fn surface_for(
    state: CourseHomeState,
    services: &CourseHomeServices,
    complete_step: bool,
) -> Option<CheckpointSurface> {
    let draft = state.draft.peek().clone();
    let vm = state.vm.peek();
    let vm = vm.as_ref()?;
    Some(CheckpointSurface {
        api: Arc::clone(&services.api),
        course_id: vm.course_id().clone(),
        checkpoint: vm.checkpoint(&draft, complete_step)?,
    })
}

pub(super) fn build_draft_changed_action(state: &CourseHomeState) -> Callback<String> {
    let state = *state;
    use_callback(move |text: String| {
        let mut vm = state.vm;
        let mut draft = state.draft;
        let mut save_state = state.save_state;
        if let Some(vm) = vm.write().as_mut() {
            let saved = vm
                .lesson_editor()
                .map(|editor| editor.saved_draft)
                .unwrap_or_default();
            vm.set_unsaved_changes(text != saved);
        }
        draft.set(text);
        save_state.set(SaveState::Idle);
    })
}

pub(super) fn build_save_progress_action(
    state: &CourseHomeState,
    services: &CourseHomeServices,
    reload: Callback<LoadMode>,
) -> Callback<bool> {
    let state = *state;
    let services = services.clone();
    use_callback(move |complete_step: bool| {
        let mut save_state = state.save_state;
        if *save_state.peek() == SaveState::Saving {
            return;
        }
        let Some(surface) = surface_for(state, &services, complete_step) else {
            return;
        };
        save_state.set(SaveState::Saving);
        spawn(async move {
            match surface.save_progress().await {
                Ok(()) => {
                    let mut vm = state.vm;
                    if let Some(vm) = vm.write().as_mut() {
                        vm.set_unsaved_changes(false);
                    }
                    save_state.set(SaveState::Saved);
                    reload.call(LoadMode::Refresh);
                }
                Err(err) => {
                    warn!(course_id = %surface.course_id, error = %err, "saving lesson progress failed");
                    save_state.set(SaveState::Error(err.to_string()));
                }
            }
        });
    })
}

/// Resolve the unsaved-changes prompt held by the page.
pub(super) fn build_resolve_exit_action(
    state: &CourseHomeState,
    services: &CourseHomeServices,
    navigator: Navigator,
    reload: Callback<LoadMode>,
) -> Callback<ExitChoice> {
    let state = *state;
    let services = services.clone();
    use_callback(move |choice: ExitChoice| {
        let mut exit_state = state.exit_state;
        if *exit_state.peek() == ExitState::Saving {
            return;
        }
        let Some(surface) = surface_for(state, &services, false) else {
            return;
        };
        if choice == ExitChoice::SaveAndClose {
            exit_state.set(ExitState::Saving);
        }
        spawn(async move {
            let settlement = settle_exit(&surface, choice).await;
            let mut vm = state.vm;
            match settlement {
                ExitSettlement::Leave => {
                    let left = vm.write().as_mut().and_then(|vm| vm.confirm_leave());
                    exit_state.set(ExitState::Idle);
                    let Some(leave) = left else {
                        return;
                    };
                    info!(?leave, ?choice, "left lesson");
                    let stays_on_page = !leave.leaves_page();
                    settle_leave(state, navigator, reload, leave);
                    if stays_on_page && choice == ExitChoice::SaveAndClose {
                        reload.call(LoadMode::Refresh);
                    }
                }
                ExitSettlement::Stay => {
                    let held = vm.write().as_mut().and_then(|vm| vm.cancel_leave());
                    exit_state.set(ExitState::Idle);
                    match held {
                        Some(LeaveLesson::SwitchCourse(_)) => {
                            restore_course_address(state, navigator);
                        }
                        // A held history navigation already moved the address bar.
                        _ => sync_after_selection(state, navigator),
                    }
                }
                ExitSettlement::SaveFailed(message) => {
                    exit_state.set(ExitState::Error(message));
                }
            }
        });
    })
}

pub(super) fn build_complete_project_action(
    state: &CourseHomeState,
    services: &CourseHomeServices,
    reload: Callback<LoadMode>,
) -> Callback<ProjectId> {
    let state = *state;
    let services = services.clone();
    use_callback(move |project_id: ProjectId| {
        let mut completing = state.completing_project;
        if *completing.peek() {
            return;
        }
        let course_id = state.course_id.peek().clone();
        let api = Arc::clone(&services.api);
        completing.set(true);
        spawn(async move {
            let result = api.complete_project(&course_id, &project_id).await;
            completing.set(false);
            match result {
                Ok(()) => {
                    info!(course_id = %course_id, project_id = %project_id, "project completed");
                    reload.call(LoadMode::Refresh);
                }
                Err(err) => {
                    warn!(course_id = %course_id, project_id = %project_id, error = %err, "completing project failed");
                    show_notice(state, err.to_string());
                }
            }
        });
    })
}
