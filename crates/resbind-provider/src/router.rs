//! Axum router wiring (host -> lifecycle handlers).
//!
//! One schema route plus one route per lifecycle call, keyed by resource type.

use axum::{
    routing::{get, post},
    Router,
};

use crate::{app_state::AppState, transport};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/schema", get(transport::plugin::schema))
        .route("/v1/resources/:type_name/create", post(transport::plugin::create))
        .route("/v1/resources/:type_name/read", post(transport::plugin::read))
        .route("/v1/resources/:type_name/update", post(transport::plugin::update))
        .route("/v1/resources/:type_name/delete", post(transport::plugin::delete))
        .with_state(state)
}
