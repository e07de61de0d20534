use course_core::model::{
    Course, CourseHomepage, CourseId, Enrollment, Lesson, LessonCheckpoint, LessonId,
    LessonStatus, Project, ProjectId,
};
use course_core::navigation::{ActiveView, AddressOutcome, CourseAddress, SelectionState, WriteMode};
use course_core::progress::CourseProgressSummary;
use tracing::debug;

use super::address_sync::AddressSync;
use super::exit_guard::LeaveLesson;
use super::markdown_vm::markdown_to_html;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutlineLessonVm {
    pub id: LessonId,
    pub title: String,
    pub status: LessonStatus,
    pub status_label: &'static str,
    pub has_unmet_required_tasks: bool,
    pub duration_minutes: Option<u32>,
    pub is_selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutlineProjectVm {
    pub id: ProjectId,
    pub title: String,
    pub label: &'static str,
    pub percent: u8,
    pub is_completed: bool,
    pub is_expanded: bool,
    pub is_selected: bool,
    pub lessons: Vec<OutlineLessonVm>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverviewVm {
    pub title: String,
    pub description: String,
    pub summary: CourseProgressSummary,
    pub is_enrolled: bool,
    pub projects: Vec<OutlineProjectVm>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectDetailVm {
    pub id: ProjectId,
    pub title: String,
    pub description_html: String,
    pub label: &'static str,
    pub percent: u8,
    pub earned_xp: u32,
    pub xp_required: u32,
    pub xp_met: bool,
    pub completed_required_tasks: u32,
    pub total_required_tasks: u32,
    pub required_tasks_met: bool,
    pub can_complete: bool,
    pub is_completed: bool,
    pub lessons: Vec<OutlineLessonVm>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LessonEditorVm {
    pub project_id: ProjectId,
    pub project_title: String,
    pub lesson_id: LessonId,
    pub lesson_title: String,
    pub step_index: u32,
    pub step_count: u32,
    pub step_title: String,
    pub step_body_html: String,
    pub step_required: bool,
    pub step_completed: bool,
    pub saved_draft: String,
    pub is_fullscreen: bool,
    pub has_unsaved_changes: bool,
}

/// Everything the course homepage shows, derived from one loaded homepage and the
/// learner's selection.
#[derive(Clone, Debug, PartialEq)]
pub struct CourseHomeVm {
    course_id: CourseId,
    homepage: CourseHomepage,
    course: Course,
    selection: SelectionState,
    address_sync: AddressSync,
    pending_leave: Option<LeaveLesson>,
}

impl CourseHomeVm {
    #[must_use]
    pub fn new(course_id: CourseId, homepage: CourseHomepage) -> Self {
        let course = homepage.annotated_course();
        Self {
            course_id,
            homepage,
            course,
            selection: SelectionState::new(),
            address_sync: AddressSync::new(),
            pending_leave: None,
        }
    }

    /// Swap in a refetched homepage, keeping the selection where it still resolves.
    pub fn refresh(&mut self, homepage: CourseHomepage) {
        self.course = homepage.annotated_course();
        self.homepage = homepage;
        let address = self.selection.address();
        let outcome = self.selection.apply_address(&self.course, &address);
        if outcome.degraded {
            debug!(course_id = %self.course_id, %address, "selection no longer resolves after refresh");
        }
    }

    #[must_use]
    pub fn course_id(&self) -> &CourseId {
        &self.course_id
    }

    #[must_use]
    pub fn course(&self) -> &Course {
        &self.course
    }

    #[must_use]
    pub fn enrollment(&self) -> &Enrollment {
        &self.homepage.enrollment
    }

    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    #[must_use]
    pub fn active_view(&self) -> ActiveView {
        self.selection.active_view()
    }

    #[must_use]
    pub fn pending_leave(&self) -> Option<&LeaveLesson> {
        self.pending_leave.as_ref()
    }

    // ─── Address sync ──────────────────────────────────────────────────────────

    /// Apply the address the page was opened with. Never treated as an echo.
    pub fn land(&mut self, address: &CourseAddress) -> AddressOutcome {
        self.pending_leave = None;
        self.selection.apply_address(&self.course, address)
    }

    /// Apply an address reported by the router, unless it is our own write coming back.
    pub fn observe_address(&mut self, address: &CourseAddress) -> Option<AddressOutcome> {
        if !self.address_sync.is_external(address) {
            return None;
        }
        let leave = LeaveLesson::FollowAddress(address.clone());
        if self.leaves_open_lesson(&leave) && self.selection.has_unsaved_changes() {
            debug!(course_id = %self.course_id, %address, "holding external address for unsaved changes");
            self.pending_leave = Some(leave);
            return Some(AddressOutcome {
                changed: false,
                degraded: false,
            });
        }
        self.pending_leave = None;
        Some(self.selection.apply_address(&self.course, address))
    }

    /// The address write the current selection needs, if any.
    ///
    /// Nothing is written while a navigation is held behind the exit prompt.
    pub fn plan_address_write(&mut self, current: &CourseAddress) -> Option<(CourseAddress, WriteMode)> {
        if self.pending_leave.is_some() {
            return None;
        }
        let next = self.selection.address();
        let mode = self.address_sync.plan_write(current, &next)?;
        Some((next, mode))
    }

    // ─── Navigation ────────────────────────────────────────────────────────────

    /// Navigate, or hold the navigation behind the unsaved-changes prompt.
    ///
    /// Returns `true` when the navigation was applied.
    pub fn request_leave(&mut self, leave: LeaveLesson) -> bool {
        if self.leaves_open_lesson(&leave) && self.selection.has_unsaved_changes() {
            debug!(course_id = %self.course_id, ?leave, "holding navigation for unsaved changes");
            self.pending_leave = Some(leave);
            return false;
        }
        self.apply_leave(leave);
        true
    }

    /// Apply the held navigation.
    pub fn confirm_leave(&mut self) -> Option<LeaveLesson> {
        let leave = self.pending_leave.take()?;
        self.selection.set_unsaved_changes(false);
        self.apply_leave(leave.clone());
        Some(leave)
    }

    /// Drop the held navigation and return it.
    pub fn cancel_leave(&mut self) -> Option<LeaveLesson> {
        self.pending_leave.take()
    }

    /// The current selection's address, remembered as our own write so its echo is ignored.
    pub fn claim_address(&mut self) -> CourseAddress {
        let address = self.selection.address();
        self.address_sync.record_write(&address);
        address
    }

    pub fn toggle_project(&mut self, project_id: &ProjectId) {
        self.selection.toggle_expanded(project_id);
    }

    pub fn set_step(&mut self, index: u32) {
        let clamped = self.open_lesson().map(|(_, lesson)| lesson.clamp_step(index));
        if let Some(step) = clamped {
            self.selection.set_step(step);
        }
    }

    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        self.selection.set_fullscreen(fullscreen);
    }

    pub fn set_unsaved_changes(&mut self, dirty: bool) {
        self.selection.set_unsaved_changes(dirty);
    }

    fn leaves_open_lesson(&self, leave: &LeaveLesson) -> bool {
        let Some(open) = self.selection.selected_lesson_id() else {
            return false;
        };
        match leave {
            LeaveLesson::SelectLesson { lesson_id, .. } => lesson_id != open,
            LeaveLesson::FollowAddress(address) => address.lesson.as_ref() != Some(open),
            LeaveLesson::ToOverview
            | LeaveLesson::CloseLesson
            | LeaveLesson::SelectProject(_)
            | LeaveLesson::LeaveScreen(_)
            | LeaveLesson::SwitchCourse(_) => true,
        }
    }

    fn apply_leave(&mut self, leave: LeaveLesson) {
        match leave {
            LeaveLesson::ToOverview => self.selection.return_to_overview(),
            LeaveLesson::CloseLesson => self.selection.close_lesson(),
            LeaveLesson::SelectProject(project_id) => self.selection.select_project(project_id),
            LeaveLesson::LeaveScreen(_) | LeaveLesson::SwitchCourse(_) => {}
            LeaveLesson::FollowAddress(address) => {
                let outcome = self.selection.apply_address(&self.course, &address);
                if outcome.degraded {
                    debug!(course_id = %self.course_id, %address, "followed address only partly resolved");
                }
            }
            LeaveLesson::SelectLesson {
                project_id,
                lesson_id,
            } => {
                if self.selection.selected_lesson_id() == Some(&lesson_id) {
                    return;
                }
                let resume = self
                    .course
                    .lesson(&project_id, &lesson_id)
                    .map_or(0, |lesson| lesson.resume_step);
                self.selection.select_lesson(project_id, lesson_id);
                self.selection.set_step(resume);
            }
        }
    }

    // ─── Editor ────────────────────────────────────────────────────────────────

    fn open_lesson(&self) -> Option<(&Project, &Lesson)> {
        let project_id = self.selection.selected_project_id()?;
        let lesson_id = self.selection.selected_lesson_id()?;
        let project = self.course.project(project_id)?;
        Some((project, project.lesson(lesson_id)?))
    }

    /// The checkpoint to save for the open lesson at its current step.
    #[must_use]
    pub fn checkpoint(&self, draft: &str, complete_step: bool) -> Option<LessonCheckpoint> {
        let (_, lesson) = self.open_lesson()?;
        Some(LessonCheckpoint {
            lesson_id: lesson.id.clone(),
            step: self.selection.current_step_index()?,
            draft: Some(draft.to_string()),
            complete_step,
        })
    }

    // ─── Projections ───────────────────────────────────────────────────────────

    #[must_use]
    pub fn outline(&self) -> Vec<OutlineProjectVm> {
        self.course
            .projects
            .iter()
            .map(|project| self.outline_project(project))
            .collect()
    }

    #[must_use]
    pub fn overview(&self) -> OverviewVm {
        OverviewVm {
            title: self.course.title.clone(),
            description: self.course.description.clone(),
            summary: CourseProgressSummary::from_course(&self.course),
            is_enrolled: self.homepage.enrollment.is_enrolled(),
            projects: self.outline(),
        }
    }

    #[must_use]
    pub fn project_detail(&self) -> Option<ProjectDetailVm> {
        let ActiveView::ProjectDetail { project_id } = self.active_view() else {
            return None;
        };
        let project = self.course.project(&project_id)?;
        let progress = &project.progress;
        Some(ProjectDetailVm {
            id: project.id.clone(),
            title: project.title.clone(),
            description_html: markdown_to_html(&project.description),
            label: progress.label.label(),
            percent: progress.percent_complete,
            earned_xp: progress.earned_xp,
            xp_required: progress.xp_required,
            xp_met: progress.xp_met,
            completed_required_tasks: progress.completed_required_tasks,
            total_required_tasks: progress.total_required_tasks,
            required_tasks_met: progress.required_tasks_met,
            can_complete: progress.can_complete,
            is_completed: progress.is_completed,
            lessons: self.outline_lessons(project),
        })
    }

    #[must_use]
    pub fn lesson_editor(&self) -> Option<LessonEditorVm> {
        let (project, lesson) = self.open_lesson()?;
        let step_index = self.selection.current_step_index()?;
        let step = lesson.step(step_index);
        let record = self.homepage.progress.lesson(&lesson.id);
        Some(LessonEditorVm {
            project_id: project.id.clone(),
            project_title: project.title.clone(),
            lesson_id: lesson.id.clone(),
            lesson_title: lesson.title.clone(),
            step_index,
            step_count: lesson.step_count(),
            step_title: step.map(|step| step.title.clone()).unwrap_or_default(),
            step_body_html: step.map(|step| markdown_to_html(&step.body)).unwrap_or_default(),
            step_required: step.is_some_and(|step| step.required),
            step_completed: record.is_some_and(|record| record.completed_steps.contains(&step_index)),
            saved_draft: record
                .and_then(|record| record.draft.clone())
                .unwrap_or_default(),
            is_fullscreen: self.selection.is_fullscreen(),
            has_unsaved_changes: self.selection.has_unsaved_changes(),
        })
    }

    fn outline_project(&self, project: &Project) -> OutlineProjectVm {
        OutlineProjectVm {
            id: project.id.clone(),
            title: project.title.clone(),
            label: project.progress.label.label(),
            percent: project.progress.percent_complete,
            is_completed: project.progress.is_completed,
            is_expanded: self.selection.is_expanded(&project.id),
            is_selected: self.selection.selected_project_id() == Some(&project.id),
            lessons: self.outline_lessons(project),
        }
    }

    fn outline_lessons(&self, project: &Project) -> Vec<OutlineLessonVm> {
        project
            .lessons
            .iter()
            .map(|lesson| OutlineLessonVm {
                id: lesson.id.clone(),
                title: lesson.title.clone(),
                status: lesson.status,
                status_label: lesson.status.label(),
                has_unmet_required_tasks: lesson.has_unmet_required_tasks,
                duration_minutes: lesson.duration_minutes,
                is_selected: self.selection.selected_lesson_id() == Some(&lesson.id),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use course_core::model::sample::{sample_course, sample_course_id};
    use course_core::model::{CourseProgress, EnrollmentId, LessonProgressRecord};

    use super::*;
    use crate::routes::Route;

    fn p(id: &str) -> ProjectId {
        ProjectId::new(id)
    }

    fn l(id: &str) -> LessonId {
        LessonId::new(id)
    }

    fn homepage(progress: CourseProgress) -> CourseHomepage {
        CourseHomepage {
            course: sample_course(),
            progress,
            enrollment: Enrollment::active(EnrollmentId::new("e1")),
        }
    }

    fn vm() -> CourseHomeVm {
        CourseHomeVm::new(sample_course_id(), homepage(CourseProgress::default()))
    }

    fn open(vm: &mut CourseHomeVm, project: &str, lesson: &str) {
        assert!(vm.request_leave(LeaveLesson::SelectLesson {
            project_id: p(project),
            lesson_id: l(lesson),
        }));
    }

    #[test]
    fn deep_link_reconstructs_ancestors() {
        let mut vm = vm();
        vm.land(&CourseAddress::parse("project=P1&lesson=L2&step=3"));

        assert_eq!(
            vm.active_view(),
            ActiveView::LessonEditor {
                project_id: p("P1"),
                lesson_id: l("L2"),
                step: 3
            }
        );
        let outline = vm.outline();
        assert!(outline[0].is_expanded && outline[0].is_selected);
        assert!(outline[0].lessons[1].is_selected);
        assert_eq!(vm.lesson_editor().unwrap().step_title, "Slices");
    }

    #[test]
    fn dirty_editor_holds_navigation_until_confirmed() {
        let mut vm = vm();
        open(&mut vm, "P1", "L1");
        vm.set_unsaved_changes(true);

        assert!(!vm.request_leave(LeaveLesson::ToOverview));
        assert_eq!(vm.pending_leave(), Some(&LeaveLesson::ToOverview));
        assert!(matches!(vm.active_view(), ActiveView::LessonEditor { .. }));

        assert_eq!(vm.confirm_leave(), Some(LeaveLesson::ToOverview));
        assert_eq!(vm.active_view(), ActiveView::Overview);
        assert!(!vm.selection().has_unsaved_changes());
    }

    #[test]
    fn cancel_leaves_selection_untouched() {
        let mut vm = vm();
        open(&mut vm, "P1", "L2");
        vm.set_step(2);
        vm.set_unsaved_changes(true);
        let before = vm.selection().clone();

        assert!(!vm.request_leave(LeaveLesson::SelectProject(p("P3"))));
        vm.cancel_leave();

        assert_eq!(vm.selection(), &before);
        assert_eq!(vm.pending_leave(), None);
    }

    #[test]
    fn fullscreen_and_same_lesson_are_unguarded() {
        let mut vm = vm();
        open(&mut vm, "P1", "L2");
        vm.set_step(1);
        vm.set_unsaved_changes(true);

        vm.set_fullscreen(true);
        assert!(vm.selection().is_fullscreen());
        assert!(vm.request_leave(LeaveLesson::SelectLesson {
            project_id: p("P1"),
            lesson_id: l("L2"),
        }));
        assert_eq!(vm.selection().current_step_index(), Some(1));
        assert_eq!(vm.pending_leave(), None);
    }

    #[test]
    fn opening_a_lesson_resumes_at_last_step() {
        let mut progress = CourseProgress::default();
        progress.lessons.insert(
            l("L3"),
            LessonProgressRecord {
                last_step: Some(2),
                draft: Some("notes".into()),
                ..LessonProgressRecord::default()
            },
        );
        let mut vm = CourseHomeVm::new(sample_course_id(), homepage(progress));
        open(&mut vm, "P2", "L3");

        let editor = vm.lesson_editor().unwrap();
        assert_eq!(editor.step_index, 2);
        assert_eq!(editor.saved_draft, "notes");
    }

    #[test]
    fn step_changes_replace_and_lesson_changes_push() {
        let mut vm = vm();
        let mut bar = CourseAddress::overview();

        open(&mut vm, "P1", "L2");
        let (next, mode) = vm.plan_address_write(&bar).unwrap();
        assert_eq!(mode, WriteMode::Push);
        bar = next;
        assert_eq!(vm.observe_address(&bar), None);

        vm.set_step(3);
        let (next, mode) = vm.plan_address_write(&bar).unwrap();
        assert_eq!(mode, WriteMode::Replace);
        assert_eq!(next.to_query(), "project=P1&lesson=L2&step=3");
        assert_eq!(vm.plan_address_write(&next), None);
    }

    #[test]
    fn external_address_is_applied_and_degrades_silently() {
        let mut vm = vm();
        let outcome = vm
            .observe_address(&CourseAddress::parse("project=P1&lesson=L5"))
            .unwrap();
        assert!(outcome.degraded);
        assert_eq!(vm.active_view(), ActiveView::ProjectDetail { project_id: p("P1") });
    }

    #[test]
    fn history_navigation_out_of_a_dirty_lesson_is_held() {
        let mut vm = vm();
        open(&mut vm, "P1", "L2");
        vm.set_unsaved_changes(true);
        let back = CourseAddress::project(p("P1"));

        assert!(vm.observe_address(&back).is_some());
        assert_eq!(vm.pending_leave(), Some(&LeaveLesson::FollowAddress(back.clone())));
        assert!(matches!(vm.active_view(), ActiveView::LessonEditor { .. }));
        assert_eq!(vm.plan_address_write(&back), None);

        vm.cancel_leave();
        let (restore, mode) = vm.plan_address_write(&back).unwrap();
        assert_eq!(mode, WriteMode::Push);
        assert_eq!(restore.lesson, Some(l("L2")));

        assert!(vm.observe_address(&CourseAddress::overview()).is_some());
        vm.confirm_leave();
        assert_eq!(vm.active_view(), ActiveView::Overview);
    }

    #[test]
    fn leaving_the_page_is_held_only_while_dirty() {
        let mut vm = vm();
        let catalog = LeaveLesson::LeaveScreen(Route::Catalog {});
        assert!(vm.request_leave(catalog.clone()));

        open(&mut vm, "P1", "L2");
        vm.set_unsaved_changes(true);
        let switch = LeaveLesson::SwitchCourse(CourseId::new("other"));
        assert!(!vm.request_leave(switch.clone()));
        assert_eq!(vm.cancel_leave(), Some(switch));

        assert!(!vm.request_leave(catalog.clone()));
        assert_eq!(vm.confirm_leave(), Some(catalog));
        assert!(!vm.selection().has_unsaved_changes());
        assert!(matches!(vm.active_view(), ActiveView::LessonEditor { .. }));
    }

    #[test]
    fn claimed_address_echo_is_ignored() {
        let mut vm = vm();
        open(&mut vm, "P1", "L2");
        let address = vm.claim_address();
        assert_eq!(vm.observe_address(&address), None);
    }

    #[test]
    fn refresh_keeps_selection_and_updates_progress() {
        let mut vm = vm();
        open(&mut vm, "P2", "L4");
        let mut progress = CourseProgress::default();
        progress.lessons.entry(l("L4")).or_default().completed_steps.extend([0, 1]);
        vm.refresh(homepage(progress));

        assert_eq!(vm.selection().selected_lesson_id(), Some(&l("L4")));
        let lesson = &vm.project_detail_for_test("P2").lessons[1];
        assert_eq!(lesson.status, LessonStatus::Completed);
    }

    #[test]
    fn checkpoint_carries_blank_drafts_so_they_clear() {
        let mut vm = vm();
        assert_eq!(vm.checkpoint("x", false), None);
        open(&mut vm, "P1", "L1");
        let checkpoint = vm.checkpoint("   ", true).unwrap();
        assert_eq!(checkpoint.draft.as_deref(), Some("   "));
        assert!(checkpoint.complete_step);
    }

    impl CourseHomeVm {
        fn project_detail_for_test(&self, id: &str) -> ProjectDetailVm {
            let mut copy = self.clone();
            copy.selection.select_project(p(id));
            copy.project_detail().unwrap()
        }
    }
}
