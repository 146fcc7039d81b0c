use axum::{
    body::Body,
    extract::Extension,
    http::{HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};
use utoipa::ToSchema;

use super::auth::AuthState;
use crate::GIT_COMMIT_HASH;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Health {
    commit: String,
    name: String,
    version: String,
    environment: String,
}

#[utoipa::path(
    get,
    path= "/health",
    responses (
        (status = 200, description = "Service is up", body = Health)
    ),
    tag= "health"
)]
// axum handler for health
pub async fn health(method: Method, auth_state: Extension<Arc<AuthState>>) -> impl IntoResponse {
    let health = Health {
        commit: GIT_COMMIT_HASH.to_string(),
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: auth_state.config().environment().to_string(),
    };

    let body = if method == Method::GET {
        Json(&health).into_response()
    } else {
        Body::empty().into_response()
    };

    let short_hash = if health.commit.len() > 7 {
        &health.commit[0..7]
    } else {
        ""
    };

    let headers = format!("{}:{}:{}", health.name, health.version, short_hash)
        .parse::<HeaderValue>()
        .map(|x_app_header_value| {
            debug!("X-App header: {:?}", x_app_header_value);

            let mut headers = HeaderMap::new();
            headers.insert("X-App", x_app_header_value);
            headers
        })
        .map_err(|err| {
            error!("Failed to parse X-App header: {}", err);
        })
        .unwrap_or_else(|()| HeaderMap::new());

    (StatusCode::OK, headers, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::handlers::auth::AuthConfig,
        email::LogEmailSender,
        store::MemoryUserStore,
        token::TokenCodec,
    };
    use axum::body::to_bytes;

    fn state() -> anyhow::Result<Arc<AuthState>> {
        Ok(Arc::new(AuthState::new(
            AuthConfig::new("http://localhost:8080".to_string()),
            TokenCodec::new(b"health-secret")?,
            Arc::new(MemoryUserStore::new()),
            Arc::new(LogEmailSender),
        )))
    }

    #[tokio::test]
    async fn get_returns_body_and_app_header() -> anyhow::Result<()> {
        let response = health(Method::GET, Extension(state()?)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let x_app = response
            .headers()
            .get("X-App")
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(x_app.starts_with(concat!(env!("CARGO_PKG_NAME"), ":", env!("CARGO_PKG_VERSION"))));

        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let body: serde_json::Value = serde_json::from_slice(&bytes)?;
        assert_eq!(body["name"], env!("CARGO_PKG_NAME"));
        assert_eq!(body["environment"], "development");
        Ok(())
    }

    #[tokio::test]
    async fn options_returns_empty_body() -> anyhow::Result<()> {
        let response = health(Method::OPTIONS, Extension(state()?)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        assert!(bytes.is_empty());
        Ok(())
    }
}
