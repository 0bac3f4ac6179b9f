//! Security Middleware Module
//!
//! Response-header hardening for the API surface. Responses are
//! rendered in a browser context, so the usual XSS/framing headers
//! apply on every route.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};

/// Add standard security headers to every response
pub async fn security_headers_middleware(
    req: Request<Body>,
    next: Next,
) -> std::result::Result<Response, StatusCode> {
    let mut response = next.run(req).await;

    response
        .headers_mut()
        .insert("X-Content-Type-Options", "nosniff".parse().unwrap());

    response
        .headers_mut()
        .insert("X-Frame-Options", "DENY".parse().unwrap());

    response
        .headers_mut()
        .insert("X-XSS-Protection", "1; mode=block".parse().unwrap());

    response.headers_mut().insert(
        "Content-Security-Policy",
        "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'"
            .parse()
            .unwrap(),
    );

    Ok(response)
}
