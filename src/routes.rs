use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::handlers;
use crate::state::AppState;

// Route path constants - single source of truth for all paths

pub const ROOT: &str = "/";
pub const ELB_CHECK: &str = "/elb-check";
pub const LIST_MOUNT_FILES: &str = "/list-mount-files";
pub const MAKE_MOUNT_FILE: &str = "/make-mount-file";
pub const SWAGGER_UI: &str = "/swagger-ui";
pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(ROOT, get(handlers::root_handler))
        .route(ELB_CHECK, get(handlers::elb_check_handler))
        .route(LIST_MOUNT_FILES, get(handlers::list_mount_files_handler))
        .route(MAKE_MOUNT_FILE, get(handlers::make_mount_file_handler))
        .merge(SwaggerUi::new(SWAGGER_UI).url(OPENAPI_JSON, ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
