//! HTTP surface for the student roster.
//!
//! - `POST /students` – Create a student; the server assigns the id. Returns `201`.
//! - `GET /students` – List every student in unspecified order.
//! - `GET /students/:id` – Fetch one student.
//! - `PUT /students/:id` – Replace every field of a student; the path id always wins.
//! - `DELETE /students/:id` – Remove a student. Returns `204`.
//! - `GET /students/:id/summary` – Generate a one-paragraph summary via the configured
//!   generation service. Returns `{ "summary": "..." }`.
//!
//! Handlers only translate between HTTP and [`StudentStore`] / [`SummaryClient`] calls. The
//! store lock is released before any response is serialized or the summary service is called.

use crate::store::{StoreError, Student, StudentFields, StudentStore};
use crate::summary::{SummaryClient, SummaryError};
use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use std::sync::Arc;

/// Shared handler state: the record store and the summary provider.
struct AppState<C> {
    store: Arc<StudentStore>,
    summarizer: Arc<C>,
}

impl<C> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            summarizer: Arc::clone(&self.summarizer),
        }
    }
}

/// Build the HTTP router exposing the student API.
pub fn create_router<C>(store: Arc<StudentStore>, summarizer: Arc<C>) -> Router
where
    C: SummaryClient + 'static,
{
    Router::new()
        .route(
            "/students",
            get(list_students::<C>).post(create_student::<C>),
        )
        .route(
            "/students/:id",
            get(get_student::<C>)
                .put(update_student::<C>)
                .delete(delete_student::<C>),
        )
        .route("/students/:id/summary", get(summarize_student::<C>))
        .with_state(AppState { store, summarizer })
}

async fn create_student<C>(
    State(state): State<AppState<C>>,
    body: Result<Json<StudentFields>, JsonRejection>,
) -> Result<(StatusCode, Json<Student>), AppError> {
    let Json(fields) = body?;
    let student = state.store.create(fields);
    tracing::info!(id = student.id, "Student created");
    Ok((StatusCode::CREATED, Json(student)))
}

async fn list_students<C>(State(state): State<AppState<C>>) -> Json<Vec<Student>> {
    let students = state.store.list();
    tracing::debug!(count = students.len(), "Listing students");
    Json(students)
}

async fn get_student<C>(
    State(state): State<AppState<C>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Student>, AppError> {
    let Path(id) = id?;
    Ok(Json(state.store.get(id)?))
}

async fn update_student<C>(
    State(state): State<AppState<C>>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<StudentFields>, JsonRejection>,
) -> Result<Json<Student>, AppError> {
    let Path(id) = id?;
    let Json(fields) = body?;
    let student = state.store.update(id, fields)?;
    tracing::info!(id, "Student updated");
    Ok(Json(student))
}

async fn delete_student<C>(
    State(state): State<AppState<C>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id?;
    state.store.delete(id)?;
    tracing::info!(id, "Student deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Response body for `GET /students/:id/summary`.
#[derive(Serialize)]
struct SummaryResponse {
    summary: String,
}

async fn summarize_student<C>(
    State(state): State<AppState<C>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<SummaryResponse>, AppError>
where
    C: SummaryClient,
{
    let Path(id) = id?;
    let student = state.store.get(id)?;
    tracing::info!(id, "Generating student summary");
    let summary = state.summarizer.summarize(&student).await?;
    Ok(Json(SummaryResponse { summary }))
}

enum AppError {
    InvalidInput(JsonRejection),
    InvalidId(PathRejection),
    NotFound(i64),
    Summary(SummaryError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::InvalidInput(rejection) => {
                tracing::debug!(error = %rejection.body_text(), "Rejected request body");
                (StatusCode::BAD_REQUEST, "Invalid input").into_response()
            }
            Self::InvalidId(rejection) => {
                tracing::debug!(error = %rejection.body_text(), "Rejected student id");
                (StatusCode::BAD_REQUEST, "Invalid ID").into_response()
            }
            Self::NotFound(id) => {
                tracing::debug!(id, "Student not found");
                (StatusCode::NOT_FOUND, "Student not found").into_response()
            }
            Self::Summary(error) => {
                tracing::error!(error = %error, "Summary generation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to generate summary",
                )
                    .into_response()
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidInput(rejection)
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::InvalidId(rejection)
    }
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(id) => Self::NotFound(id),
        }
    }
}

impl From<SummaryError> for AppError {
    fn from(error: SummaryError) -> Self {
        Self::Summary(error)
    }
}
