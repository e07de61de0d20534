use serde::{Deserialize, Serialize};

use crate::model::ids::EnrollmentId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    Active,
    Ended,
}

impl EnrollmentStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Ended => "ended",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "active" => Some(Self::Active),
            "ended" => Some(Self::Ended),
            _ => None,
        }
    }
}

/// The record linking the learner to a course.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    #[serde(default)]
    pub id: Option<EnrollmentId>,
    #[serde(default)]
    pub status: Option<EnrollmentStatus>,
}

impl Enrollment {
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn active(id: EnrollmentId) -> Self {
        Self {
            id: Some(id),
            status: Some(EnrollmentStatus::Active),
        }
    }

    #[must_use]
    pub fn ended(id: EnrollmentId) -> Self {
        Self {
            id: Some(id),
            status: Some(EnrollmentStatus::Ended),
        }
    }

    /// Enrolled only when an id is present and the status is `active`.
    #[must_use]
    pub fn is_enrolled(&self) -> bool {
        self.id.is_some() && self.status == Some(EnrollmentStatus::Active)
    }
}
