use utoipa::OpenApi;

use crate::handlers;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "dummy-app API",
        version = "1.0.0",
        description = "Placeholder service for smoke-testing deployments: label echo, Redis PING and mount checks"
    ),
    paths(
        handlers::status::root_handler,
        handlers::status::elb_check_handler,
        handlers::mount::list_mount_files_handler,
        handlers::mount::make_mount_file_handler
    ),
    tags(
        (name = "status", description = "Label and dependency checks"),
        (name = "mount", description = "Mounted volume checks")
    )
)]
pub struct ApiDoc;
