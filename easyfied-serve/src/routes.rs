//! HTTP routes: health check and static mounts.

use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderValue, StatusCode, Uri};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use easyfied::core::route::strip_base_url;
use easyfied::error::HttpError;
use easyfied::io::sink::ResponseHead;
use tracing::{debug, warn};

use crate::body::{self, ChannelSink};
use crate::state::MountState;

/// Build the application router from opened mounts.
pub fn app_router(mounts: Vec<MountState>) -> Router {
    let mut app = Router::new().route("/health", get(health));
    for mount in mounts {
        app = app.merge(mount_router(mount));
    }
    app
}

fn mount_router(mount: MountState) -> Router {
    let base = mount.base_url.trim_end_matches('/');
    let pattern = format!("{base}/{{*path}}");
    Router::new()
        .route(&pattern, get(serve_static))
        .with_state(mount)
}

async fn health() -> &'static str {
    "ok"
}

/// GET <base_url>/* - stream a file from the mount's folder.
pub async fn serve_static(State(mount): State<MountState>, uri: Uri) -> Response {
    let sub_path = strip_base_url(&mount.base_url, uri.path());
    let (sink, head_rx, body) = body::channel(mount.chunk_size);

    tokio::spawn(deliver_in_background(mount, sub_path, sink));

    match head_rx.await {
        Ok(Ok(head)) => head_response(head, body),
        Ok(Err(err)) => match err.http_error() {
            Some(http) => {
                debug!(error = %err, "delivery refused");
                error_response(&http)
            }
            None => {
                warn!(error = %err, "delivery failed before head");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        },
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn deliver_in_background(mount: MountState, sub_path: String, mut sink: ChannelSink) {
    match mount.deliverer.deliver(&sub_path, &mut sink).await {
        Ok(bytes) => debug!(path = %sub_path, bytes, "static delivery complete"),
        Err(err) => match sink.take_head_tx() {
            Some(tx) => {
                let _ = tx.send(Err(err));
            }
            None => warn!(path = %sub_path, error = %err, "static delivery aborted mid-stream"),
        },
    }
}

fn head_response(head: ResponseHead, body: Body) -> Response {
    let mut response = Response::new(body);
    *response.status_mut() = StatusCode::from_u16(head.status).unwrap_or(StatusCode::OK);
    let headers = response.headers_mut();
    match HeaderValue::from_str(&head.content_type) {
        Ok(value) => {
            headers.insert(CONTENT_TYPE, value);
        }
        Err(_) => warn!(content_type = %head.content_type, "unrepresentable content type"),
    }
    headers.insert(CONTENT_LENGTH, HeaderValue::from(head.content_length));
    response
}

fn error_response(err: &HttpError) -> Response {
    let status = StatusCode::from_u16(err.status).unwrap_or(StatusCode::BAD_REQUEST);
    (status, Json(err)).into_response()
}
