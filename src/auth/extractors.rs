use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::warn;

use crate::error::ApiError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Caller identity as forwarded by the identity provider in `X-User-Id`.
pub struct UserId(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                warn!("request without X-User-Id");
                ApiError::Unauthorized("Not authenticated. Missing X-User-Id header.".into())
            })?;

        Ok(UserId(user_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<UserId, ApiError> {
        let (mut parts, _) = request.into_parts();
        UserId::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn reads_header() {
        let request = Request::builder()
            .header("X-User-Id", " user_2abc ")
            .body(())
            .unwrap();
        assert_eq!(extract(request).await.unwrap().0, "user_2abc");
    }

    #[tokio::test]
    async fn rejects_missing_or_blank_header() {
        let missing = Request::builder().body(()).unwrap();
        assert!(matches!(extract(missing).await, Err(ApiError::Unauthorized(_))));

        let blank = Request::builder().header("X-User-Id", "").body(()).unwrap();
        assert!(matches!(extract(blank).await, Err(ApiError::Unauthorized(_))));
    }
}
