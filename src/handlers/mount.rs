use crate::error::ApiError;
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, response::Html};

/// GET /list-mount-files handler - List the mounted directory
///
/// Returns an HTML heading with the mount path followed by the entry names
/// separated by `<br/>`.
#[utoipa::path(
    get,
    path = routes::LIST_MOUNT_FILES,
    responses(
        (status = 200, description = "Directory listing", body = String, content_type = "text/html"),
        (status = 404, description = "Mount path does not exist", body = String, content_type = "text/plain"),
        (status = 500, description = "Mount path cannot be read", body = String, content_type = "text/plain")
    ),
    tag = "mount"
)]
pub async fn list_mount_files_handler(
    State(state): State<AppState>,
) -> Result<Html<String>, ApiError> {
    let mount = state.mount_dir();
    let entries = mount.list_entries().await.inspect_err(|e| {
        tracing::warn!("Listing mount path failed: {}", e);
    })?;

    Ok(Html(format!(
        "<h4>File list @ {}</h4> {}",
        mount.path().display(),
        entries.join("<br/>")
    )))
}

/// GET /make-mount-file handler - Create a marker file in the mount path
///
/// Always answers 200. The body says whether the file was created.
#[utoipa::path(
    get,
    path = routes::MAKE_MOUNT_FILE,
    responses(
        (status = 200, description = "Created or failed, with the file name", body = String, content_type = "text/plain")
    ),
    tag = "mount"
)]
pub async fn make_mount_file_handler(State(state): State<AppState>) -> String {
    let marker = state.mount_dir().create_marker_file().await;

    if marker.created {
        format!("Created {}", marker.path.display())
    } else {
        format!("Failed creating file {}", marker.path.display())
    }
}
