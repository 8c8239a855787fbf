//! Plugin HTTP handlers.
//!
//! Responsibilities:
//! - Decode the host envelope (malformed JSON becomes a BAD_REQUEST body)
//! - Resolve the resource type from the path
//! - Run exactly one lifecycle call and map its result back to the host
//!
//! Every failure, including decode and unknown-type errors, is logged once in
//! `respond` before it reaches the host.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use resbind_core::error::{ErrorCode, ResBindError, Result};
use resbind_core::protocol::plugin::{
    CreateRequest, DeleteRequest, ErrorResponse, ProviderSchema, ReadRequest, ResourceState,
    StateResponse, UpdateRequest,
};

use crate::app_state::AppState;

/// Error as returned to the host.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct PluginError(#[from] pub ResBindError);

impl IntoResponse for PluginError {
    fn into_response(self) -> Response {
        let code = self.0.code();
        let status = if code.is_remote() {
            StatusCode::BAD_GATEWAY
        } else if code == ErrorCode::Internal {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::BAD_REQUEST
        };
        (status, Json(ErrorResponse::from(&self.0))).into_response()
    }
}

type PluginResult = std::result::Result<Json<StateResponse>, PluginError>;

fn rejection(r: JsonRejection) -> ResBindError {
    ResBindError::BadRequest(r.body_text())
}

fn respond(type_name: &str, op: &'static str, out: Result<Option<ResourceState>>) -> PluginResult {
    match out {
        Ok(state) => Ok(Json(StateResponse { state })),
        Err(e) => {
            tracing::warn!(
                resource = %type_name,
                op,
                code = e.code().as_str(),
                error = %e,
                "lifecycle call failed"
            );
            Err(e.into())
        }
    }
}

pub async fn schema(State(app): State<AppState>) -> Json<ProviderSchema> {
    Json(app.registry().schema())
}

pub async fn create(
    State(app): State<AppState>,
    Path(type_name): Path<String>,
    body: std::result::Result<Json<CreateRequest>, JsonRejection>,
) -> PluginResult {
    respond(&type_name, "create", run_create(&app, &type_name, body).await)
}

async fn run_create(
    app: &AppState,
    type_name: &str,
    body: std::result::Result<Json<CreateRequest>, JsonRejection>,
) -> Result<Option<ResourceState>> {
    let Json(req) = body.map_err(rejection)?;
    let res = app.registry().get(type_name)?;
    res.create(&req.config).await.map(Some)
}

pub async fn read(
    State(app): State<AppState>,
    Path(type_name): Path<String>,
    body: std::result::Result<Json<ReadRequest>, JsonRejection>,
) -> PluginResult {
    respond(&type_name, "read", run_read(&app, &type_name, body).await)
}

async fn run_read(
    app: &AppState,
    type_name: &str,
    body: std::result::Result<Json<ReadRequest>, JsonRejection>,
) -> Result<Option<ResourceState>> {
    let Json(req) = body.map_err(rejection)?;
    let res = app.registry().get(type_name)?;
    res.read(req.state).await.map(Some)
}

pub async fn update(
    State(app): State<AppState>,
    Path(type_name): Path<String>,
    body: std::result::Result<Json<UpdateRequest>, JsonRejection>,
) -> PluginResult {
    respond(&type_name, "update", run_update(&app, &type_name, body).await)
}

async fn run_update(
    app: &AppState,
    type_name: &str,
    body: std::result::Result<Json<UpdateRequest>, JsonRejection>,
) -> Result<Option<ResourceState>> {
    let Json(req) = body.map_err(rejection)?;
    let res = app.registry().get(type_name)?;
    res.update(req.prior, &req.config).await.map(Some)
}

pub async fn delete(
    State(app): State<AppState>,
    Path(type_name): Path<String>,
    body: std::result::Result<Json<DeleteRequest>, JsonRejection>,
) -> PluginResult {
    respond(&type_name, "delete", run_delete(&app, &type_name, body).await)
}

async fn run_delete(
    app: &AppState,
    type_name: &str,
    body: std::result::Result<Json<DeleteRequest>, JsonRejection>,
) -> Result<Option<ResourceState>> {
    let Json(req) = body.map_err(rejection)?;
    let res = app.registry().get(type_name)?;
    res.delete(req.state).await.map(|()| None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(e: ResBindError) -> StatusCode {
        PluginError(e).into_response().status()
    }

    #[test]
    fn remote_failures_map_to_bad_gateway() {
        for e in [
            ResBindError::ClientBuild("no credentials".into()),
            ResBindError::Submit("403 (PERMISSION_DENIED): denied".into()),
            ResBindError::Operation("RESOURCE_NOT_FOUND: pol-a".into()),
        ] {
            assert!(e.code().is_remote());
            assert_eq!(status_of(e), StatusCode::BAD_GATEWAY);
        }
    }

    #[test]
    fn local_failures_map_to_client_or_server_errors() {
        assert_eq!(status_of(ResBindError::BadRequest("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(ResBindError::UnsupportedVersion), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(ResBindError::Internal("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
