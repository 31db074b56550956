use std::sync::Arc;

use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

/// CORS for the browser chat client.
///
/// Any origin is allowed unless `SERENE_CORS_ORIGINS` lists specific ones.
pub fn cors_layer(state: &Arc<AppState>) -> CorsLayer {
    let base = CorsLayer::new().allow_headers(Any).allow_methods(Any);

    let origins: Vec<HeaderValue> = state
        .config
        .cors_allowed_origins
        .as_deref()
        .map(|list| {
            list.split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect()
        })
        .unwrap_or_default();

    if origins.is_empty() {
        base.allow_origin(Any)
    } else {
        base.allow_origin(origins)
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, header};
    use tower::ServiceExt;

    use crate::config::{API_KEY_VAR, Config};
    use crate::provider::{ChatProvider, ProviderError};
    use crate::routes;
    use crate::state::AppState;

    struct Unused;

    #[async_trait]
    impl ChatProvider for Unused {
        async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
            Err(ProviderError::Empty)
        }
    }

    async fn preflight_response(origins: Option<&str>, origin: &str) -> axum::response::Response {
        let config = Config::from_lookup(|k| match k {
            API_KEY_VAR => Some("k".to_owned()),
            "SERENE_CORS_ORIGINS" => origins.map(str::to_owned),
            _ => None,
        })
        .unwrap();
        let app = routes::build(Arc::new(AppState::new(config, Arc::new(Unused))));
        let req = Request::builder()
            .method("OPTIONS")
            .uri("/chat")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        app.oneshot(req).await.unwrap()
    }

    async fn preflight(origins: Option<&str>, origin: &str) -> Option<String> {
        preflight_response(origins, origin)
            .await
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    }

    #[tokio::test]
    async fn any_origin_by_default() {
        let allowed = preflight(None, "http://localhost:5173").await;
        assert_eq!(allowed.as_deref(), Some("*"));
    }

    #[tokio::test]
    async fn configured_origins_are_enforced() {
        let list = Some("http://localhost:5173, https://app.serene.example");
        assert_eq!(
            preflight(list, "https://app.serene.example").await.as_deref(),
            Some("https://app.serene.example")
        );
        assert_eq!(preflight(list, "https://evil.example").await, None);
    }

    #[tokio::test]
    async fn preflight_is_traced() {
        let resp = preflight_response(None, "http://localhost:5173").await;
        assert!(resp.headers().contains_key(crate::middleware::trace::X_TRACE_ID));
    }
}
