//! Authentication interceptor.
//!
//! Runs once per inbound HTTP request, ahead of MCP dispatch. Extracts the
//! caller's API credential from transport headers and binds it to the request
//! extensions, where the streamable HTTP transport carries it into each tool
//! call's context. The interceptor never rejects a request: authorization
//! decisions belong to the tools themselves.

use axum::{
    body::Body,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};

/// Caller-supplied API credential for the current request.
///
/// Opaque to this server; it would be forwarded as-is to the upstream API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiCredential(pub String);

impl ApiCredential {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First few characters for log lines. Never log the whole secret.
    pub fn preview(&self) -> String {
        self.0.chars().take(10).collect()
    }
}

/// Extract a credential from transport headers.
///
/// `Authorization: Bearer <token>` wins, with a case-insensitive scheme match
/// per RFC 7235 §2.1 and surrounding whitespace trimmed from the token.
/// `X-API-KEY` is the fallback and is taken verbatim. Returns `None` when
/// neither header yields a non-empty token.
pub fn credential_from_headers(headers: &HeaderMap) -> Option<ApiCredential> {
    let bearer = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| {
            if v.len() > 7 && v[..7].eq_ignore_ascii_case("bearer ") {
                Some(v[7..].trim())
            } else {
                None
            }
        })
        .filter(|t| !t.is_empty());

    let token = match bearer {
        Some(t) => Some(t.to_string()),
        None => headers
            .get("x-api-key")
            .and_then(|v| v.to_str().ok())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_string()),
    };

    token.map(ApiCredential)
}

/// Axum middleware that binds the caller credential to the request.
///
/// Inserts a typed [`ApiCredential`] into the request extensions, plus a
/// clone of the raw header map so downstream fallback lookups can re-parse
/// the transport headers independently. Extraction failure is logged and
/// swallowed; the request always proceeds.
pub async fn auth_middleware(mut req: Request<Body>, next: Next) -> Response {
    let headers = req.headers().clone();

    match credential_from_headers(&headers) {
        Some(credential) => {
            tracing::debug!(
                method = %req.method(),
                uri = %req.uri(),
                prefix = %credential.preview(),
                "API key bound to request context"
            );
            req.extensions_mut().insert(credential);
        }
        None => {
            tracing::debug!(
                method = %req.method(),
                uri = %req.uri(),
                "no API key provided in request headers"
            );
        }
    }

    req.extensions_mut().insert(headers);

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::{middleware as axum_mw, routing, Extension, Router};
    use tower::ServiceExt;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(
                axum::http::HeaderName::from_bytes(name.as_bytes()).unwrap(),
                value.parse().unwrap(),
            );
        }
        map
    }

    #[test]
    fn bearer_token_is_trimmed() {
        let h = headers(&[("Authorization", "Bearer  abc123  ")]);
        assert_eq!(
            credential_from_headers(&h),
            Some(ApiCredential("abc123".into()))
        );
    }

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        for scheme in ["bearer", "Bearer", "BEARER", "bEaReR"] {
            let h = headers(&[("Authorization", &format!("{scheme} tok"))]);
            assert_eq!(
                credential_from_headers(&h),
                Some(ApiCredential("tok".into())),
                "scheme {scheme} should match"
            );
        }
    }

    #[test]
    fn x_api_key_is_taken_verbatim() {
        let h = headers(&[("X-API-KEY", "zzz")]);
        assert_eq!(credential_from_headers(&h), Some(ApiCredential("zzz".into())));
    }

    #[test]
    fn bearer_wins_over_x_api_key() {
        let h = headers(&[
            ("Authorization", "Bearer primary"),
            ("X-API-KEY", "secondary"),
        ]);
        assert_eq!(
            credential_from_headers(&h),
            Some(ApiCredential("primary".into()))
        );
    }

    #[test]
    fn empty_bearer_falls_back_to_x_api_key() {
        let h = headers(&[("Authorization", "Bearer    "), ("X-API-KEY", "zzz")]);
        assert_eq!(credential_from_headers(&h), Some(ApiCredential("zzz".into())));
    }

    #[test]
    fn non_bearer_scheme_is_ignored() {
        let h = headers(&[("Authorization", "Basic dXNlcjpwYXNz")]);
        assert_eq!(credential_from_headers(&h), None);
    }

    #[test]
    fn no_headers_yields_none() {
        assert_eq!(credential_from_headers(&HeaderMap::new()), None);
    }

    #[test]
    fn empty_x_api_key_yields_none() {
        let h = headers(&[("X-API-KEY", "")]);
        assert_eq!(credential_from_headers(&h), None);
    }

    // Probe handler that reports the credential the middleware bound, or "-".
    async fn probe(credential: Option<Extension<ApiCredential>>) -> String {
        credential
            .map(|Extension(c)| c.0)
            .unwrap_or_else(|| "-".to_string())
    }

    fn test_app() -> Router {
        Router::new()
            .route("/probe", routing::get(probe))
            .layer(axum_mw::from_fn(auth_middleware))
    }

    async fn probe_with(app: Router, auth: Option<(&str, &str)>) -> (StatusCode, String) {
        let mut builder = Request::builder().uri("/probe");
        if let Some((name, value)) = auth {
            builder = builder.header(name, value);
        }
        let resp = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn middleware_binds_bearer_credential() {
        let (status, body) =
            probe_with(test_app(), Some(("Authorization", "Bearer abc123"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "abc123");
    }

    #[tokio::test]
    async fn middleware_never_rejects_unauthenticated_requests() {
        let (status, body) = probe_with(test_app(), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "-");
    }

    #[tokio::test]
    async fn concurrent_requests_do_not_share_credentials() {
        let app = test_app();
        let (a, b) = tokio::join!(
            probe_with(app.clone(), Some(("Authorization", "Bearer first"))),
            probe_with(app.clone(), None),
        );
        assert_eq!(a.1, "first");
        assert_eq!(b.1, "-");
    }
}
