use crate::api::response::{ApiResponse, ErrorResponse};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use crate::features::FeatureState;

use super::commands::{
    ArchiveVersionCommand, ArchiveVersionError, ConfirmVersionCommand, ConfirmVersionError,
    CreateDraftCommand, CreateDraftError, PublishVersionCommand, PublishVersionError,
    UpdateDraftCommand, UpdateDraftError,
};
use super::queries::{GetVersionError, GetVersionQuery, ListVersionsError, ListVersionsQuery};

pub fn versions_routes() -> Router<FeatureState> {
    Router::new()
        .route("/", post(create_draft))
        .route("/", get(list_versions))
        .route("/:id", get(get_version).put(update_draft))
        .route("/:id/confirm", post(confirm_version))
        .route("/:id/publish", post(publish_version))
        .route("/:id/archive", post(archive_version))
}

#[tracing::instrument(skip(state, command), fields(entry_id = %command.entry_id))]
async fn create_draft(
    State(state): State<FeatureState>,
    Json(command): Json<CreateDraftCommand>,
) -> Result<Response, VersionsApiError> {
    let response = super::commands::create_draft::handle(state.db, command).await?;

    tracing::info!(version_id = %response.id, "Draft created via API");

    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state, command), fields(version_id = %id))]
async fn update_draft(
    State(state): State<FeatureState>,
    Path(id): Path<uuid::Uuid>,
    Json(mut command): Json<UpdateDraftCommand>,
) -> Result<Response, VersionsApiError> {
    command.version_id = id;

    let response = super::commands::update_draft::handle(state.db, command).await?;

    tracing::info!(version_id = %response.id, "Draft updated via API");

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state), fields(version_id = %id))]
async fn confirm_version(
    State(state): State<FeatureState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<Response, VersionsApiError> {
    let command = ConfirmVersionCommand { version_id: id };

    let response = super::commands::confirm::handle(state.db, command).await?;

    tracing::info!(version_id = %response.id, "Version confirmed via API");

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state), fields(version_id = %id))]
async fn publish_version(
    State(state): State<FeatureState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<Response, VersionsApiError> {
    let command = PublishVersionCommand { version_id: id };

    let response = super::commands::publish::handle(state.db, state.search, command).await?;

    tracing::info!(
        version_id = %response.id,
        superseded = ?response.superseded_version_id,
        "Version published via API"
    );

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state), fields(version_id = %id))]
async fn archive_version(
    State(state): State<FeatureState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<Response, VersionsApiError> {
    let command = ArchiveVersionCommand { version_id: id };

    let response = super::commands::archive::handle(state.db, state.search, command).await?;

    tracing::info!(
        version_id = %response.id,
        restored = ?response.restored_version_id,
        "Version archived via API"
    );

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state), fields(version_id = %id))]
async fn get_version(
    State(state): State<FeatureState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<Response, VersionsApiError> {
    let response =
        super::queries::get::handle(state.db, GetVersionQuery { version_id: id }).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state, query), fields(entry_id = %query.entry_id))]
async fn list_versions(
    State(state): State<FeatureState>,
    Query(query): Query<ListVersionsQuery>,
) -> Result<Response, VersionsApiError> {
    let response = super::queries::list::handle(state.db, query).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[derive(Debug, thiserror::Error)]
enum VersionsApiError {
    #[error(transparent)]
    CreateDraft(#[from] CreateDraftError),
    #[error(transparent)]
    UpdateDraft(#[from] UpdateDraftError),
    #[error(transparent)]
    Confirm(#[from] ConfirmVersionError),
    #[error(transparent)]
    Publish(#[from] PublishVersionError),
    #[error(transparent)]
    Archive(#[from] ArchiveVersionError),
    #[error(transparent)]
    Get(#[from] GetVersionError),
    #[error(transparent)]
    List(#[from] ListVersionsError),
}

impl IntoResponse for VersionsApiError {
    fn into_response(self) -> Response {
        match self {
            VersionsApiError::UpdateDraft(UpdateDraftError::UrlValidation(_)) => {
                let error = ErrorResponse::new("VALIDATION_ERROR", self.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            VersionsApiError::CreateDraft(CreateDraftError::EntryNotFound(_))
            | VersionsApiError::UpdateDraft(UpdateDraftError::NotFound(_))
            | VersionsApiError::Confirm(ConfirmVersionError::NotFound(_))
            | VersionsApiError::Publish(PublishVersionError::NotFound(_))
            | VersionsApiError::Archive(ArchiveVersionError::NotFound(_))
            | VersionsApiError::Get(GetVersionError::NotFound(_))
            | VersionsApiError::List(ListVersionsError::EntryNotFound(_)) => {
                let error = ErrorResponse::new("NOT_FOUND", self.to_string());
                (StatusCode::NOT_FOUND, Json(error)).into_response()
            },
            VersionsApiError::Confirm(ConfirmVersionError::InvalidTransition(_))
            | VersionsApiError::Publish(PublishVersionError::InvalidTransition(_))
            | VersionsApiError::Archive(ArchiveVersionError::InvalidTransition(_))
            | VersionsApiError::UpdateDraft(UpdateDraftError::NotEditable(_)) => {
                let error = ErrorResponse::new("INVALID_TRANSITION", self.to_string());
                (StatusCode::CONFLICT, Json(error)).into_response()
            },
            VersionsApiError::Publish(PublishVersionError::Index(_))
            | VersionsApiError::Archive(ArchiveVersionError::Index(_)) => {
                tracing::error!("Search index error in versions API: {}", self);
                let error =
                    ErrorResponse::new("SEARCH_INDEX_ERROR", "The search index could not be updated");
                (StatusCode::BAD_GATEWAY, Json(error)).into_response()
            },
            VersionsApiError::CreateDraft(CreateDraftError::Database(_))
            | VersionsApiError::UpdateDraft(UpdateDraftError::Database(_))
            | VersionsApiError::Confirm(ConfirmVersionError::Database(_))
            | VersionsApiError::Publish(PublishVersionError::Database(_))
            | VersionsApiError::Publish(PublishVersionError::SlugAssignment(_))
            | VersionsApiError::Archive(ArchiveVersionError::Database(_))
            | VersionsApiError::Get(GetVersionError::Database(_))
            | VersionsApiError::List(ListVersionsError::Database(_)) => {
                tracing::error!("Database error in versions API: {}", self);
                let error = ErrorResponse::new("INTERNAL_ERROR", "A database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            },
        }
    }
}
