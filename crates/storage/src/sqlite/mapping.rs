use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use course_core::model::{EnrollmentId, EnrollmentStatus, LessonId, LessonProgressRecord};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::{EnrollmentRecord, StorageError};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

pub(crate) fn step_to_i64(step: Option<u32>) -> Option<i64> {
    step.map(i64::from)
}

fn i64_to_u32(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn encode_steps(steps: &BTreeSet<u32>) -> Result<String, StorageError> {
    serde_json::to_string(steps).map_err(ser)
}

pub(crate) fn map_lesson_progress_row(
    row: &SqliteRow,
) -> Result<(LessonId, LessonProgressRecord), StorageError> {
    let lesson_id = LessonId::new(row.try_get::<String, _>("lesson_id").map_err(ser)?);
    let completed_steps: BTreeSet<u32> =
        serde_json::from_str(&row.try_get::<String, _>("completed_steps").map_err(ser)?)
            .map_err(ser)?;
    let last_step = row
        .try_get::<Option<i64>, _>("last_step")
        .map_err(ser)?
        .map(|v| i64_to_u32("last_step", v))
        .transpose()?;

    Ok((
        lesson_id,
        LessonProgressRecord {
            completed_steps,
            last_step,
            draft: row.try_get("draft").map_err(ser)?,
            updated_at: row.try_get("updated_at").map_err(ser)?,
        },
    ))
}

pub(crate) fn map_enrollment_row(row: &SqliteRow) -> Result<EnrollmentRecord, StorageError> {
    let status_str: String = row.try_get("status").map_err(ser)?;
    let status = EnrollmentStatus::parse(&status_str)
        .ok_or_else(|| StorageError::Serialization(format!("invalid status: {status_str}")))?;
    let enrolled_at: DateTime<Utc> = row.try_get("enrolled_at").map_err(ser)?;

    Ok(EnrollmentRecord {
        id: EnrollmentId::new(row.try_get::<String, _>("id").map_err(ser)?),
        status,
        enrolled_at,
        ended_at: row.try_get("ended_at").map_err(ser)?,
    })
}
