use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use course_core::model::{
    CourseHomepage, CourseId, CourseSummary, IncompleteProject, IncompleteProjectsReport,
    LessonCheckpoint, LessonProgressRecord, ProjectId,
};

use crate::content_api::ContentApi;
use crate::error::{AppServicesError, ContentApiError};

const INCOMPLETE_PROJECTS_REASON: &str = "INCOMPLETE_PROJECTS";

/// `ContentApi` over HTTP/JSON.
#[derive(Clone)]
pub struct HttpContentApi {
    client: Client,
    base_url: Url,
}

impl HttpContentApi {
    /// # Errors
    ///
    /// Returns `AppServicesError::InvalidBaseUrl` if `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, AppServicesError> {
        let parsed = Url::parse(base_url)
            .map_err(|_| AppServicesError::InvalidBaseUrl(base_url.to_string()))?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(AppServicesError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self {
            client: Client::new(),
            base_url: parsed,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ContentApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ContentApiError::Decode(format!("invalid base url {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ContentApiError> {
        debug!(%url, "GET");
        let response = self.client.get(url).send().await?;
        let response = check(response).await?;
        response
            .json()
            .await
            .map_err(|err| ContentApiError::Decode(err.to_string()))
    }

    async fn post(&self, url: Url) -> Result<Response, ContentApiError> {
        debug!(%url, "POST");
        let response = self.client.post(url).send().await?;
        check(response).await
    }
}

async fn check(response: Response) -> Result<Response, ContentApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(error_from_body(status, &body))
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    projects: Vec<IncompleteProject>,
    #[serde(default)]
    message: Option<String>,
}

fn error_from_body(status: StatusCode, body: &str) -> ContentApiError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    if parsed.reason.as_deref() == Some(INCOMPLETE_PROJECTS_REASON) {
        return ContentApiError::IncompleteProjects(IncompleteProjectsReport {
            projects: parsed.projects,
        });
    }
    if let Some(message) = parsed.message.filter(|m| !m.trim().is_empty()) {
        return ContentApiError::Rejected(message);
    }
    if status == StatusCode::NOT_FOUND {
        return ContentApiError::NotFound;
    }
    ContentApiError::HttpStatus {
        status: status.as_u16(),
    }
}

#[async_trait]
impl ContentApi for HttpContentApi {
    async fn list_courses(&self) -> Result<Vec<CourseSummary>, ContentApiError> {
        self.get_json(self.endpoint(&["courses"])?).await
    }

    async fn get_course_homepage(
        &self,
        course_id: &CourseId,
    ) -> Result<CourseHomepage, ContentApiError> {
        self.get_json(self.endpoint(&["courses", course_id.as_str(), "homepage"])?)
            .await
    }

    async fn enroll(&self, course_id: &CourseId) -> Result<(), ContentApiError> {
        self.post(self.endpoint(&["courses", course_id.as_str(), "enroll"])?)
            .await
            .map(drop)
    }

    async fn complete_course(&self, course_id: &CourseId) -> Result<(), ContentApiError> {
        self.post(self.endpoint(&["courses", course_id.as_str(), "complete"])?)
            .await
            .map(drop)
    }

    async fn unenroll(&self, course_id: &CourseId) -> Result<(), ContentApiError> {
        self.post(self.endpoint(&["courses", course_id.as_str(), "unenroll"])?)
            .await
            .map(drop)
    }

    async fn save_lesson_progress(
        &self,
        course_id: &CourseId,
        checkpoint: &LessonCheckpoint,
    ) -> Result<LessonProgressRecord, ContentApiError> {
        let url = self.endpoint(&[
            "courses",
            course_id.as_str(),
            "lessons",
            checkpoint.lesson_id.as_str(),
            "progress",
        ])?;
        debug!(%url, "POST");
        let response = self.client.post(url).json(checkpoint).send().await?;
        check(response)
            .await?
            .json()
            .await
            .map_err(|err| ContentApiError::Decode(err.to_string()))
    }

    async fn complete_project(
        &self,
        course_id: &CourseId,
        project_id: &ProjectId,
    ) -> Result<(), ContentApiError> {
        self.post(self.endpoint(&[
            "courses",
            course_id.as_str(),
            "projects",
            project_id.as_str(),
            "complete",
        ])?)
        .await
        .map(drop)
    }
}
