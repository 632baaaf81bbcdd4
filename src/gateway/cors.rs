//! CORS layer built from configuration.

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::CorsLayer;

use crate::config::CorsConfig;

/// `["*"]` (or an empty list) is fully open, otherwise only the listed
/// origins are allowed. Unparseable origins are skipped.
pub fn create_cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.allowed_origins.is_empty() || config.allowed_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, Response};
    use tower::{ServiceBuilder, ServiceExt};

    async fn allow_origin(config: &CorsConfig, origin: &str) -> Option<String> {
        let svc = ServiceBuilder::new()
            .layer(create_cors_layer(config))
            .service(tower::service_fn(|_req: Request<Body>| async {
                Ok::<_, std::convert::Infallible>(Response::new(Body::empty()))
            }));
        let req = Request::builder()
            .uri("/api/health")
            .header(header::ORIGIN, origin)
            .body(Body::empty())
            .unwrap();
        let resp = svc.oneshot(req).await.unwrap();
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn test_wildcard_and_empty_list_allow_any_origin() {
        let empty = CorsConfig {
            allowed_origins: vec![],
        };
        for config in [CorsConfig::default(), empty] {
            assert_eq!(
                allow_origin(&config, "http://foo.example").await.as_deref(),
                Some("*")
            );
        }
    }

    #[tokio::test]
    async fn test_explicit_origins_skip_invalid_entries() {
        let config = CorsConfig {
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "bad\norigin".to_string(),
            ],
        };
        assert_eq!(
            allow_origin(&config, "http://localhost:3000").await.as_deref(),
            Some("http://localhost:3000")
        );
        assert_eq!(allow_origin(&config, "http://foo.example").await, None);
    }
}
