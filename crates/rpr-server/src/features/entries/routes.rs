use crate::api::response::{ApiResponse, ErrorResponse};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use sqlx::PgPool;

use super::commands::{
    CreateEntryCommand, CreateEntryError, RenameEntryCommand, RenameEntryError,
};
use super::queries::{GetEntryError, GetEntryQuery, ListEntriesError, ListEntriesQuery};

pub fn entries_routes() -> Router<PgPool> {
    Router::new()
        .route("/", post(create_entry))
        .route("/", get(list_entries))
        .route("/:id", get(get_entry))
        .route("/:id/rename", post(rename_entry))
}

#[tracing::instrument(skip(pool, command), fields(kind = %command.kind, name = %command.name))]
async fn create_entry(
    State(pool): State<PgPool>,
    Json(command): Json<CreateEntryCommand>,
) -> Result<Response, EntriesApiError> {
    let response = super::commands::create::handle(pool, command).await?;

    tracing::info!(entry_id = %response.id, "Register entry created via API");

    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(pool, command), fields(entry_id = %id))]
async fn rename_entry(
    State(pool): State<PgPool>,
    Path(id): Path<uuid::Uuid>,
    Json(mut command): Json<RenameEntryCommand>,
) -> Result<Response, EntriesApiError> {
    command.id = id;

    let response = super::commands::rename::handle(pool, command).await?;

    tracing::info!(entry_id = %response.id, slug = ?response.slug, "Register entry renamed via API");

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(pool), fields(entry_id = %id))]
async fn get_entry(
    State(pool): State<PgPool>,
    Path(id): Path<uuid::Uuid>,
) -> Result<Response, EntriesApiError> {
    let response = super::queries::get::handle(pool, GetEntryQuery { id }).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(pool, query))]
async fn list_entries(
    State(pool): State<PgPool>,
    Query(query): Query<ListEntriesQuery>,
) -> Result<Response, EntriesApiError> {
    let response = super::queries::list::handle(pool, query).await?;

    let meta = json!({ "pagination": response.pagination });

    Ok(
        (StatusCode::OK, Json(ApiResponse::success_with_meta(response.items, meta)))
            .into_response(),
    )
}

#[derive(Debug, thiserror::Error)]
enum EntriesApiError {
    #[error(transparent)]
    Create(#[from] CreateEntryError),
    #[error(transparent)]
    Rename(#[from] RenameEntryError),
    #[error(transparent)]
    Get(#[from] GetEntryError),
    #[error(transparent)]
    List(#[from] ListEntriesError),
}

impl IntoResponse for EntriesApiError {
    fn into_response(self) -> Response {
        match self {
            EntriesApiError::Create(CreateEntryError::NameValidation(_))
            | EntriesApiError::Rename(RenameEntryError::NameValidation(_)) => {
                let error = ErrorResponse::new("VALIDATION_ERROR", self.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            EntriesApiError::Rename(RenameEntryError::NotFound(_))
            | EntriesApiError::Get(GetEntryError::NotFound(_)) => {
                let error = ErrorResponse::new("NOT_FOUND", self.to_string());
                (StatusCode::NOT_FOUND, Json(error)).into_response()
            },
            EntriesApiError::Create(CreateEntryError::Database(_))
            | EntriesApiError::Rename(RenameEntryError::Database(_))
            | EntriesApiError::Get(GetEntryError::Database(_))
            | EntriesApiError::List(ListEntriesError::Database(_)) => {
                tracing::error!("Database error in entries API: {}", self);
                let error = ErrorResponse::new("INTERNAL_ERROR", "A database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            },
        }
    }
}
