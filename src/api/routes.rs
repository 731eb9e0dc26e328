//! HTTP API route definitions.

use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use super::handlers::{extract, health, liveness, metrics_export, AppState};
use crate::config::Config;

/// Create the API router.
pub fn create_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .route("/", get(liveness))
        .route("/extract", post(extract))
        // Operational endpoints
        .route("/health", get(health))
        .route("/metrics", get(metrics_export))
        .with_state(state);

    let router = if config.cors_enabled {
        router.layer(cors_layer(config))
    } else {
        router
    };

    router.layer(TraceLayer::new_for_http())
}

/// Build the CORS layer: any origin unless an allow-list is configured.
fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .origins()
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "Skipping invalid CORS origin");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::LIVENESS_MESSAGE;
    use crate::config::DEFAULT_USER_AGENT;
    use crate::extractor::{ArticleFetcher, ErrorResult, ExtractionResult};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app_with(config: &Config) -> Router {
        let fetcher =
            ArticleFetcher::with_settings(DEFAULT_USER_AGENT, Duration::from_secs(10)).unwrap();
        create_router(AppState::new(fetcher, None), config)
    }

    fn app() -> Router {
        app_with(&Config::default())
    }

    fn post_extract(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/extract")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[tokio::test]
    async fn liveness_returns_ok() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, LIVENESS_MESSAGE.as_bytes());
    }

    #[tokio::test]
    async fn health_endpoint_returns_ok() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn metrics_endpoint_is_404_without_recorder() {
        let response = app()
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn missing_url_returns_400() {
        for body in ["{}", r#"{"url": ""}"#, r#"{"url": null}"#, "garbage", ""] {
            let response = app().oneshot(post_extract(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");

            let error: ErrorResult = serde_json::from_slice(&body_bytes(response).await).unwrap();
            assert_eq!(error.error, "Missing URL");
        }
    }

    #[tokio::test]
    async fn oversized_body_returns_json_400() {
        let body = vec![b' '; 3 * 1024 * 1024];
        let response = app().oneshot(post_extract(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let error: ErrorResult = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.error, "Missing URL");
    }

    #[tokio::test]
    async fn extract_returns_article() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/article"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "<title>Headline</title><p> Hello </p><p></p><p>World</p>",
            ))
            .mount(&server)
            .await;

        let url = format!("{}/article", server.uri());
        let body = serde_json::json!({ "url": url }).to_string();
        let response = app().oneshot(post_extract(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let article: ExtractionResult =
            serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(
            article,
            ExtractionResult {
                title: "Headline".to_string(),
                domain: "127.0.0.1".to_string(),
                url,
                content: "Hello World".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn body_is_parsed_regardless_of_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>text</p>"))
            .mount(&server)
            .await;

        let request = Request::builder()
            .method("POST")
            .uri("/extract")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from(serde_json::json!({ "url": server.uri() }).to_string()))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn upstream_error_status_returns_500() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let body = serde_json::json!({ "url": server.uri() }).to_string();
        let response = app().oneshot(post_extract(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let error: ErrorResult = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert!(error.error.contains("404"), "error: {}", error.error);
    }

    #[tokio::test]
    async fn invalid_url_returns_500() {
        let response = app()
            .oneshot(post_extract(r#"{"url": "nope"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let error: ErrorResult = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert!(!error.error.is_empty());
    }

    #[tokio::test]
    async fn cors_allows_any_origin_by_default() {
        let request = Request::builder()
            .uri("/")
            .header(header::ORIGIN, "https://somewhere.example")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn cors_preflight_allows_any_request_header() {
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/extract")
            .header(header::ORIGIN, "https://somewhere.example")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization, x-trace-id")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_HEADERS).unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn cors_respects_allow_list() {
        let config = Config {
            allowed_origins: Some("https://allowed.example".to_string()),
            ..Config::default()
        };

        let request = Request::builder()
            .uri("/")
            .header(header::ORIGIN, "https://allowed.example")
            .body(Body::empty())
            .unwrap();
        let response = app_with(&config).oneshot(request).await.unwrap();
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://allowed.example"
        );

        let request = Request::builder()
            .uri("/")
            .header(header::ORIGIN, "https://other.example")
            .body(Body::empty())
            .unwrap();
        let response = app_with(&config).oneshot(request).await.unwrap();
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn cors_can_be_disabled() {
        let config = Config {
            cors_enabled: false,
            ..Config::default()
        };
        let request = Request::builder()
            .uri("/")
            .header(header::ORIGIN, "https://somewhere.example")
            .body(Body::empty())
            .unwrap();
        let response = app_with(&config).oneshot(request).await.unwrap();

        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }
}
