//! Fixed CORS policy applied to every response.

use axum::extract::Request;
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

/// Value of `Access-Control-Allow-Methods`.
pub const ALLOWED_METHODS: &str = "POST";
/// Value of `Access-Control-Allow-Headers`.
pub const ALLOWED_HEADERS: &str =
    "Connect-Protocol-Version,Accept,Authorization,Content-Type,X-CSRF-Token";
/// Value of `Access-Control-Max-Age`: seconds a browser may cache the preflight decision.
pub const MAX_AGE_SECS: u32 = 300;

/// Echo the request origin, add the fixed CORS headers, and answer every
/// `OPTIONS` request with a bare 200 without reaching the route handler.
pub(crate) async fn cors(request: Request, next: Next) -> Response {
    let origin = request.headers().get(header::ORIGIN).cloned();

    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };

    apply_headers(response.headers_mut(), origin);
    response
}

fn apply_headers(headers: &mut HeaderMap, origin: Option<HeaderValue>) {
    if let Some(origin) = origin {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    }
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.insert(header::ACCESS_CONTROL_MAX_AGE, HeaderValue::from(MAX_AGE_SECS));
}
