//! Request boundary shared by all routes: request logging and panic recovery.

use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    Router,
};
use std::any::Any;
use std::time::Instant;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::{error, info, info_span, Instrument};

use crate::io::rest::error::internal_error_response;

/// Wrap `router` with the request boundary. Panics become the opaque 500 response
/// and are then logged like any other request.
pub fn with_request_boundary<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn(log_requests))
}

/// Log duration, path, method and status of every request.
///
/// The handler runs inside a `request` span, so failures logged further down carry the
/// method and path too.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let span = info_span!("request", method = %method, path = %path);
    let response = next.run(request).instrument(span).await;

    let duration_ms = started.elapsed().as_secs_f64() * 1000.0;
    if response.status().is_server_error() {
        error!(
            "Request failed. Path: {}, Method: {}, Status: {}",
            path,
            method,
            response.status().as_u16()
        );
    }
    info!(
        duration_ms = %format!("{:.3}", duration_ms),
        path = %path,
        method = %method,
        response_status = response.status().as_u16(),
        "Request"
    );
    response
}

fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = payload.downcast_ref::<&'static str>() {
        *s
    } else {
        "unknown panic payload"
    };
    error!(panic = %message, "Unhandled panic while processing request");
    internal_error_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::rest::error::ApiError;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::routing::get;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    async fn broken() -> Result<&'static str, ApiError> {
        Err(anyhow::anyhow!("disk unavailable").into())
    }

    #[tokio::test]
    async fn test_internal_error_log_names_method_and_path() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let app = with_request_boundary(Router::new().route("/broken", get(broken)));
        let request = axum::http::Request::builder().uri("/broken").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let output = logs.contents();
        let failure = output
            .lines()
            .find(|line| line.contains("disk unavailable"))
            .expect("error chain was not logged");
        assert!(failure.contains("method=GET"), "{}", failure);
        assert!(failure.contains("path=/broken"), "{}", failure);
        assert!(output.contains("Path: /broken, Method: GET, Status: 500"), "{}", output);
    }
}
