//! Request forwarding.
//!
//! The gateway is a transparent pipe: method, path remainder, query, headers,
//! and body go downstream as-is; status, headers, and body come back as-is.
//! The bearer token is passed through, never inspected. Every forwarded call
//! runs under the client's connect and total timeouts, so one slow downstream
//! cannot pin gateway workers.

use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;

use crate::routes::RouteTable;

/// Connection-scoped headers that must not cross the proxy hop.
const HOP_BY_HOP: [&str; 9] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "host",
];

fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP.iter().any(|h| name.eq_ignore_ascii_case(h))
}

fn service_unavailable(display_name: &str) -> HttpResponse {
    HttpResponse::ServiceUnavailable().json(json!({
        "error": format!("{} service unavailable", display_name)
    }))
}

/// Catch-all handler: resolve the route, forward, relay the response.
pub async fn forward(
    req: HttpRequest,
    body: web::Bytes,
    table: web::Data<RouteTable>,
    client: web::Data<reqwest::Client>,
) -> HttpResponse {
    let resolved = match table.resolve(req.path()) {
        Some(resolved) => resolved,
        None => {
            return HttpResponse::NotFound().json(json!({ "error": "Route not found" }));
        }
    };

    let mut url = resolved.target_url.clone();
    if !req.query_string().is_empty() {
        url.push('?');
        url.push_str(req.query_string());
    }

    let method = match reqwest::Method::from_bytes(req.method().as_str().as_bytes()) {
        Ok(method) => method,
        Err(_) => return HttpResponse::MethodNotAllowed().finish(),
    };

    // actix and reqwest carry different http-crate versions, so headers cross
    // the boundary as bytes.
    let mut headers = reqwest::header::HeaderMap::new();
    for (name, value) in req.headers() {
        if is_hop_by_hop(name.as_str()) {
            continue;
        }
        if let (Ok(name), Ok(value)) = (
            reqwest::header::HeaderName::from_bytes(name.as_str().as_bytes()),
            reqwest::header::HeaderValue::from_bytes(value.as_bytes()),
        ) {
            headers.append(name, value);
        }
    }

    let upstream = match client
        .request(method, &url)
        .headers(headers)
        .body(body.to_vec())
        .send()
        .await
    {
        Ok(resp) => resp,
        Err(err) => {
            tracing::warn!(service = resolved.display_name, url, error = %err, "proxy call failed");
            return service_unavailable(resolved.display_name);
        }
    };

    let status =
        StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut response = HttpResponse::build(status);
    for (name, value) in upstream.headers() {
        if is_hop_by_hop(name.as_str()) {
            continue;
        }
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_str().as_bytes()),
            HeaderValue::from_bytes(value.as_bytes()),
        ) {
            response.insert_header((name, value));
        }
    }

    match upstream.bytes().await {
        Ok(bytes) => response.body(bytes.to_vec()),
        Err(err) => {
            tracing::warn!(service = resolved.display_name, url, error = %err, "proxy body read failed");
            service_unavailable(resolved.display_name)
        }
    }
}
