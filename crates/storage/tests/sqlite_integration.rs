use chrono::Duration;
use course_core::model::sample::{sample_course, sample_course_id};
use course_core::model::{CourseId, LessonCheckpoint, LessonId, ProjectId};
use course_core::time::fixed_now;
use storage::repository::{
    CourseRepository, EnrollmentRecord, EnrollmentRepository, ProgressRepository, Storage,
    StorageError,
};
use storage::sqlite::SqliteRepository;

async fn connect(name: &str) -> SqliteRepository {
    let repo = SqliteRepository::connect(&format!("sqlite:file:{name}?mode=memory&cache=shared"))
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

#[tokio::test]
async fn sqlite_roundtrips_course_structure() {
    let repo = connect("memdb_courses").await;
    let course = sample_course();
    repo.upsert_course(&course).await.unwrap();
    repo.upsert_course(&course).await.unwrap();

    let fetched = repo.get_course(&course.id).await.unwrap().expect("course");
    assert_eq!(fetched, course);
    assert_eq!(repo.list_courses().await.unwrap().len(), 1);
    assert!(
        repo.get_course(&CourseId::new("missing"))
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn sqlite_merges_checkpoints_and_keeps_first_completion() {
    let repo = connect("memdb_progress").await;
    let course_id = sample_course_id();
    let lesson_id = LessonId::new("L2");

    repo.save_checkpoint(
        &course_id,
        &LessonCheckpoint {
            lesson_id: lesson_id.clone(),
            step: 1,
            draft: Some("let r = &mut v;".into()),
            complete_step: true,
        },
        fixed_now(),
    )
    .await
    .unwrap();
    let record = repo
        .save_checkpoint(
            &course_id,
            &LessonCheckpoint {
                lesson_id: lesson_id.clone(),
                step: 3,
                draft: None,
                complete_step: true,
            },
            fixed_now() + Duration::minutes(5),
        )
        .await
        .unwrap();
    assert_eq!(record.completed_steps.iter().copied().collect::<Vec<_>>(), vec![1, 3]);
    assert_eq!(record.draft.as_deref(), Some("let r = &mut v;"));

    let project_id = ProjectId::new("P2");
    let first = repo
        .mark_project_completed(&course_id, &project_id, fixed_now())
        .await
        .unwrap();
    let second = repo
        .mark_project_completed(&course_id, &project_id, fixed_now() + Duration::days(1))
        .await
        .unwrap();
    assert_eq!(first, second);

    let progress = repo.load_progress(&course_id).await.unwrap();
    assert_eq!(progress.lesson(&lesson_id).unwrap().last_step, Some(3));
    assert_eq!(progress.project_completed_at(&project_id), Some(fixed_now()));
}

#[tokio::test]
async fn sqlite_enrollment_transitions() {
    let repo = connect("memdb_enrollments").await;
    let course_id = sample_course_id();
    assert!(repo.get_enrollment(&course_id).await.unwrap().is_none());

    let record = EnrollmentRecord::active(fixed_now());
    repo.upsert_enrollment(&course_id, &record).await.unwrap();
    let stored = repo.get_enrollment(&course_id).await.unwrap().unwrap();
    assert_eq!(stored, record);

    let ended = stored.ended(fixed_now() + Duration::hours(1));
    repo.upsert_enrollment(&course_id, &ended).await.unwrap();
    let stored = repo.get_enrollment(&course_id).await.unwrap().unwrap();
    assert!(!stored.to_enrollment().is_enrolled());

    repo.delete_enrollment(&course_id).await.unwrap();
    assert!(matches!(
        repo.delete_enrollment(&course_id).await,
        Err(StorageError::NotFound)
    ));
}

#[tokio::test]
async fn storage_sqlite_bundles_repositories() {
    let storage = Storage::sqlite("sqlite:file:memdb_bundle?mode=memory&cache=shared")
        .await
        .expect("storage");
    storage.courses.upsert_course(&sample_course()).await.unwrap();
    let progress = storage
        .progress
        .load_progress(&sample_course_id())
        .await
        .unwrap();
    assert!(progress.lessons.is_empty());
}
