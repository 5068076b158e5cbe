use std::{any::Any, sync::Arc};

use axum::{
    extract::Request,
    http::{header::HeaderName, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{self, CorsLayer},
    trace::TraceLayer,
};

use super::{
    error::ApiError,
    handlers::{self, AppState},
};

const ALLOWED_METHODS: [Method; 6] = [
    Method::GET,
    Method::OPTIONS,
    Method::PATCH,
    Method::DELETE,
    Method::POST,
    Method::PUT,
];

const ALLOWED_HEADERS: [&str; 9] = [
    "x-csrf-token",
    "x-requested-with",
    "accept",
    "accept-version",
    "content-length",
    "content-md5",
    "content-type",
    "date",
    "x-api-version",
];

pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/detect", post(handlers::detect))
        .route("/scan", post(handlers::scan))
        .route("/health", get(handlers::health))
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .with_state(state);

    with_layers(Router::new().nest("/api", api).fallback(handlers::not_found))
}

/// Wraps every route and the fallback: OPTIONS answer, CORS, panic guard,
/// request tracing (outermost last).
fn with_layers(router: Router) -> Router {
    router
        .layer(middleware::from_fn(answer_options))
        .layer(cors_layer())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(cors::Any)
        .allow_methods(ALLOWED_METHODS)
        .allow_headers(ALLOWED_HEADERS.map(HeaderName::from_static))
}

/// Plain OPTIONS requests (no CORS preflight headers) get an empty 200 on
/// any path.
async fn answer_options(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    next.run(request).await
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(target: "http", panic = detail, "handler panicked");
    ApiError::Internal.into_response()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request},
    };
    use reqwest::Client;
    use tower::ServiceExt;

    use super::*;
    use crate::{
        config::VirusTotalConfig,
        scanner::VirusTotalClient,
        spam::{KeywordSet, SpamClassifier},
    };

    fn state() -> Arc<AppState> {
        Arc::new(AppState {
            classifier: SpamClassifier::new(KeywordSet::for_deployment(false, &[]), 2, false),
            scanner: VirusTotalClient::new(
                Client::new(),
                VirusTotalConfig {
                    api_key: None,
                    base_url: "http://127.0.0.1:9/api/v3".to_string(),
                    request_timeout: Duration::from_millis(200),
                    analysis_delay: Duration::ZERO,
                    max_polls: 1,
                    report_timeouts: false,
                },
            ),
            report_timeouts: false,
        })
    }

    async fn send(app: Router, request: Request<Body>) -> Response {
        app.oneshot(request).await.unwrap()
    }

    #[tokio::test]
    async fn options_on_any_path_is_empty_ok() {
        for path in ["/api/detect", "/api/scan", "/anything/else"] {
            let response = send(
                router(state()),
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri(path)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
            assert_eq!(response.status(), StatusCode::OK);
            let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            assert!(body.is_empty());
        }
    }

    #[tokio::test]
    async fn preflight_allows_any_origin() {
        let response = send(
            router(state()),
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/scan")
                .header(header::ORIGIN, "https://app.example")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS].to_str().unwrap();
        assert!(methods.contains("POST"));
        assert!(methods.contains("PATCH"));
        let allowed = headers[header::ACCESS_CONTROL_ALLOW_HEADERS].to_str().unwrap();
        assert!(allowed.contains("content-type"));
    }

    #[tokio::test]
    async fn regular_responses_carry_cors_header() {
        let response = send(
            router(state()),
            Request::get("/api/health")
                .header(header::ORIGIN, "https://app.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn wrong_method_is_rejected() {
        let response = send(
            router(state()),
            Request::get("/api/detect").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"error":"Method not allowed"}"#);
    }

    #[tokio::test]
    async fn unknown_path_is_json_not_found() {
        let response = send(
            router(state()),
            Request::get("/api/nope").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"error":"Not found"}"#);
    }

    #[tokio::test]
    async fn panics_become_internal_errors() {
        async fn boom() -> &'static str {
            panic!("classifier exploded")
        }
        let app = with_layers(Router::new().route("/boom", get(boom)));

        let response = send(app, Request::get("/boom").body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"error":"Internal server error"}"#);
    }
}
