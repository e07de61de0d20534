//! Progress annotation: derives completion facts from raw progress records.
//!
//! Everything here is pure and total. Missing records count as zero progress and
//! out-of-range step indices are ignored.

use std::ops::AddAssign;

use chrono::{DateTime, Utc};

use crate::model::{
    Course, CourseProgress, Lesson, LessonProgressRecord, LessonStatus, ProgressLabel,
    ProgressSummary, Project,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Tally {
    total_tasks: u32,
    completed_tasks: u32,
    total_required: u32,
    completed_required: u32,
    total_xp: u32,
    earned_xp: u32,
}

impl AddAssign for Tally {
    fn add_assign(&mut self, rhs: Self) {
        self.total_tasks = self.total_tasks.saturating_add(rhs.total_tasks);
        self.completed_tasks = self.completed_tasks.saturating_add(rhs.completed_tasks);
        self.total_required = self.total_required.saturating_add(rhs.total_required);
        self.completed_required = self.completed_required.saturating_add(rhs.completed_required);
        self.total_xp = self.total_xp.saturating_add(rhs.total_xp);
        self.earned_xp = self.earned_xp.saturating_add(rhs.earned_xp);
    }
}

/// Populate every project and lesson progress field of `course` from `raw`.
#[must_use]
pub fn annotate(mut course: Course, raw: &CourseProgress) -> Course {
    for project in &mut course.projects {
        annotate_project(project, raw);
    }
    course
}

fn annotate_project(project: &mut Project, raw: &CourseProgress) {
    let mut tally = Tally::default();
    for lesson in &mut project.lessons {
        tally += annotate_lesson(lesson, raw.lesson(&lesson.id));
    }
    project.progress = summarize(
        tally,
        project.xp_required,
        raw.project_completed_at(&project.id),
    );
}

fn annotate_lesson(lesson: &mut Lesson, record: Option<&LessonProgressRecord>) -> Tally {
    let mut tally = Tally::default();
    for (index, step) in lesson.steps.iter().enumerate() {
        let done = u32::try_from(index)
            .ok()
            .zip(record)
            .is_some_and(|(index, record)| record.completed_steps.contains(&index));

        tally.total_tasks += 1;
        tally.total_xp = tally.total_xp.saturating_add(step.xp);
        if step.required {
            tally.total_required += 1;
        }
        if done {
            tally.completed_tasks += 1;
            tally.earned_xp = tally.earned_xp.saturating_add(step.xp);
            if step.required {
                tally.completed_required += 1;
            }
        }
    }

    let touched = record.is_some_and(|record| !record.is_untouched());
    lesson.status = if tally.total_tasks > 0 && tally.completed_tasks == tally.total_tasks {
        LessonStatus::Completed
    } else if tally.completed_tasks > 0 || touched {
        LessonStatus::InProgress
    } else {
        LessonStatus::NotStarted
    };
    lesson.has_unmet_required_tasks = tally.completed_required < tally.total_required;
    lesson.resume_step = record
        .and_then(|record| record.last_step)
        .map_or(0, |step| lesson.clamp_step(step));

    tally
}

fn summarize(
    tally: Tally,
    xp_required: u32,
    completed_at: Option<DateTime<Utc>>,
) -> ProgressSummary {
    let xp_met = xp_required == 0 || tally.earned_xp >= xp_required;
    let required_tasks_met = tally.completed_required >= tally.total_required;
    let can_complete = xp_met && required_tasks_met;
    let is_completed = completed_at.is_some();

    let label = if is_completed {
        ProgressLabel::Completed
    } else if tally.total_tasks == 0 || tally.completed_tasks == 0 {
        ProgressLabel::NotStarted
    } else if can_complete {
        ProgressLabel::ReadyToComplete
    } else {
        ProgressLabel::InProgress
    };

    ProgressSummary {
        earned_xp: tally.earned_xp,
        total_xp: tally.total_xp,
        xp_required,
        total_tasks: tally.total_tasks,
        completed_tasks: tally.completed_tasks,
        total_required_tasks: tally.total_required,
        completed_required_tasks: tally.completed_required,
        percent_complete: percent(tally.completed_tasks, tally.total_tasks),
        xp_met,
        required_tasks_met,
        can_complete,
        is_completed,
        completed_at,
        label,
    }
}

fn percent(done: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = u64::from(done.min(total)) * 100 / u64::from(total);
    u8::try_from(pct).unwrap_or(100)
}

/// Course-wide rollup shown above the outline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CourseProgressSummary {
    pub completed_projects: u32,
    pub total_projects: u32,
    pub completed_tasks: u32,
    pub total_tasks: u32,
    pub percent_complete: u8,
}

impl CourseProgressSummary {
    /// Roll up an annotated course.
    #[must_use]
    pub fn from_course(course: &Course) -> Self {
        let mut summary = Self::default();
        for project in &course.projects {
            summary.total_projects += 1;
            if project.progress.is_completed {
                summary.completed_projects += 1;
            }
            summary.completed_tasks = summary
                .completed_tasks
                .saturating_add(project.progress.completed_tasks);
            summary.total_tasks = summary
                .total_tasks
                .saturating_add(project.progress.total_tasks);
        }
        summary.percent_complete = percent(summary.completed_tasks, summary.total_tasks);
        summary
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::model::sample::sample_course;
    use crate::model::{CourseId, LessonId, ProjectId, Step};
    use crate::time::fixed_now;

    fn complete_steps(progress: &mut CourseProgress, lesson: &str, steps: &[u32]) {
        let record = progress.lessons.entry(LessonId::new(lesson)).or_default();
        record.completed_steps.extend(steps.iter().copied());
    }

    fn project<'a>(course: &'a Course, id: &str) -> &'a Project {
        course.project(&ProjectId::new(id)).unwrap()
    }

    #[test]
    fn can_complete_is_xp_and_required_tasks() {
        let course = sample_course();
        let mut progress = CourseProgress::default();
        // P1 required steps: L1[0], L1[2], L2[1], L2[3]; XP threshold 30.
        complete_steps(&mut progress, "L1", &[0, 2]);
        complete_steps(&mut progress, "L2", &[1, 3]);
        let annotated = annotate(course.clone(), &progress);
        let p1 = &project(&annotated, "P1").progress;
        assert!(p1.required_tasks_met);
        assert!(p1.xp_met, "earned {} of {}", p1.earned_xp, p1.xp_required);
        assert!(p1.can_complete);

        let mut xp_short = CourseProgress::default();
        complete_steps(&mut xp_short, "L1", &[0]);
        complete_steps(&mut xp_short, "L2", &[1]);
        let annotated = annotate(course, &xp_short);
        for project in &annotated.projects {
            let p = &project.progress;
            assert_eq!(p.can_complete, p.xp_met && p.required_tasks_met);
        }
        assert!(!project(&annotated, "P1").progress.can_complete);
    }

    #[test]
    fn can_complete_does_not_imply_is_completed() {
        let mut progress = CourseProgress::default();
        complete_steps(&mut progress, "L3", &[0, 1, 2]);
        complete_steps(&mut progress, "L4", &[0, 1]);
        let annotated = annotate(sample_course(), &progress);
        let p2 = &project(&annotated, "P2").progress;
        assert!(p2.can_complete);
        assert!(!p2.is_completed);
        assert_eq!(p2.label, ProgressLabel::ReadyToComplete);

        progress.mark_project_completed(&ProjectId::new("P2"), fixed_now());
        let annotated = annotate(sample_course(), &progress);
        let p2 = &project(&annotated, "P2").progress;
        assert!(p2.is_completed);
        assert_eq!(p2.label, ProgressLabel::Completed);
    }

    #[test]
    fn zero_task_project_reports_not_started() {
        let course = Course::new(
            CourseId::new("c"),
            "Empty",
            "",
            vec![
                Project::new(ProjectId::new("P0"), "Nothing yet", 1, vec![])
                    .with_xp_required(0),
            ],
        )
        .unwrap();
        let annotated = annotate(course, &CourseProgress::default());
        let p = &annotated.projects[0].progress;
        assert_eq!(p.total_tasks, 0);
        assert_eq!(p.percent_complete, 0);
        assert_eq!(p.label, ProgressLabel::NotStarted);
        assert!(!p.is_completed);
    }

    #[test]
    fn zero_xp_threshold_is_always_met() {
        let annotated = annotate(sample_course(), &CourseProgress::default());
        let p2 = &project(&annotated, "P2").progress;
        assert_eq!(p2.xp_required, 0);
        assert!(p2.xp_met);
        assert!(!p2.required_tasks_met);
    }

    #[test]
    fn out_of_range_steps_are_ignored() {
        let mut progress = CourseProgress::default();
        complete_steps(&mut progress, "L4", &[7, 99]);
        let record = progress.lessons.get_mut(&LessonId::new("L4")).unwrap();
        record.last_step = Some(40);

        let annotated = annotate(sample_course(), &progress);
        let p2 = project(&annotated, "P2");
        assert_eq!(p2.progress.completed_tasks, 0);
        let l4 = p2.lesson(&LessonId::new("L4")).unwrap();
        assert_eq!(l4.status, LessonStatus::InProgress);
        assert_eq!(l4.resume_step, 1);
    }

    #[test]
    fn lesson_status_and_unmet_required_flag() {
        let mut progress = CourseProgress::default();
        complete_steps(&mut progress, "L1", &[0, 1, 2]);
        complete_steps(&mut progress, "L2", &[0]);
        let annotated = annotate(sample_course(), &progress);
        let p1 = project(&annotated, "P1");

        let l1 = p1.lesson(&LessonId::new("L1")).unwrap();
        assert_eq!(l1.status, LessonStatus::Completed);
        assert!(!l1.has_unmet_required_tasks);

        let l2 = p1.lesson(&LessonId::new("L2")).unwrap();
        assert_eq!(l2.status, LessonStatus::InProgress);
        assert!(l2.has_unmet_required_tasks);

        assert_eq!(p1.progress.completed_tasks, 4);
        assert_eq!(p1.progress.total_tasks, 7);
        assert_eq!(p1.progress.percent_complete, 57);
        assert_eq!(p1.progress.label, ProgressLabel::InProgress);
    }

    #[test]
    fn annotate_is_deterministic() {
        let mut progress = CourseProgress::default();
        complete_steps(&mut progress, "L5", &[0]);
        let first = annotate(sample_course(), &progress);
        let second = annotate(first.clone(), &progress);
        assert_eq!(first, second);
    }

    #[test]
    fn course_summary_rolls_up_projects() {
        let mut progress = CourseProgress::default();
        progress.lessons.insert(
            LessonId::new("L3"),
            LessonProgressRecord {
                completed_steps: BTreeSet::from([0, 1, 2]),
                ..LessonProgressRecord::default()
            },
        );
        progress.mark_project_completed(&ProjectId::new("P2"), fixed_now());
        let annotated = annotate(sample_course(), &progress);
        let summary = CourseProgressSummary::from_course(&annotated);
        assert_eq!(summary.total_projects, 3);
        assert_eq!(summary.completed_projects, 1);
        assert_eq!(summary.completed_tasks, 3);
        assert_eq!(summary.total_tasks, 16);
        assert_eq!(summary.percent_complete, 18);
    }

    #[test]
    fn steps_without_xp_still_count_as_tasks() {
        let course = Course::new(
            CourseId::new("c"),
            "Course",
            "",
            vec![Project::new(
                ProjectId::new("P"),
                "P",
                1,
                vec![Lesson::new(
                    LessonId::new("L"),
                    "L",
                    vec![Step::new("a", ""), Step::new("b", "")],
                )],
            )],
        )
        .unwrap();
        let mut progress = CourseProgress::default();
        complete_steps(&mut progress, "L", &[1]);
        let annotated = annotate(course, &progress);
        let p = &annotated.projects[0].progress;
        assert_eq!(p.percent_complete, 50);
        assert!(p.can_complete);
        assert_eq!(p.label, ProgressLabel::ReadyToComplete);
    }
}
