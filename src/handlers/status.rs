use crate::config::PingPolicy;
use crate::error::ApiError;
use crate::routes;
use crate::state::AppState;
use axum::extract::State;

/// Substituted for the PING reply when the probe fails under the guarded policy
pub const PING_ERROR_TEXT: &str = "ERROR WHILE CONNECTING";

fn label_text(label: &str) -> String {
    format!("This is dummy app. Label: {}", label)
}

/// GET / handler - Label plus a Redis liveness probe
///
/// Opens a fresh Redis connection and sends PING. With the guarded policy a
/// failed probe is reported inline and the status stays 200; with the
/// unguarded policy it becomes a 500.
#[utoipa::path(
    get,
    path = routes::ROOT,
    responses(
        (status = 200, description = "Label and PING reply", body = String, content_type = "text/plain"),
        (status = 500, description = "Redis unreachable (unguarded policy only)", body = String, content_type = "text/plain")
    ),
    tag = "status"
)]
pub async fn root_handler(State(state): State<AppState>) -> Result<String, ApiError> {
    let probe = state.cache_probe();

    let ping = match probe.ping().await {
        Ok(reply) => reply,
        Err(e) => match state.config.ping_policy {
            PingPolicy::Guarded => {
                tracing::warn!("Redis PING to {} failed: {:#}", probe.address(), e);
                PING_ERROR_TEXT.to_string()
            }
            PingPolicy::Unguarded => {
                tracing::error!("Redis PING to {} failed: {:#}", probe.address(), e);
                return Err(ApiError::CacheUnavailable(e));
            }
        },
    };

    Ok(format!("{}. Redis PING: {}", label_text(&state.config.label), ping))
}

/// GET /elb-check handler - Load balancer health check
///
/// Echoes the label only. Makes no external calls and always answers 200.
#[utoipa::path(
    get,
    path = routes::ELB_CHECK,
    responses(
        (status = 200, description = "Service is up", body = String, content_type = "text/plain")
    ),
    tag = "status"
)]
pub async fn elb_check_handler(State(state): State<AppState>) -> String {
    label_text(&state.config.label)
}
