//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method checks, path dispatch and
//! access logging.

use crate::config::AppState;
use crate::handler::{contact, pages};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderName, HeaderValue, IF_NONE_MATCH, REFERER, SERVER, USER_AGENT};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::error::Error as StdError;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Contact form submission endpoint
pub const CONTACT_API_PATH: &str = "/api/contact";

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn StdError + Send + Sync>>,
{
    let started = Instant::now();
    let entry = state
        .config
        .logging
        .access_log
        .then(|| access_entry(&req, peer_addr));

    let mut response = route_request(req, &state).await;

    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server);
    }

    if let Some(mut entry) = entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route request based on method and path
async fn route_request<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn StdError + Send + Sync>>,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let site = &state.config.site;

    if method == Method::OPTIONS {
        return http::build_options_response(state.config.http.enable_cors);
    }

    if path == CONTACT_API_PATH {
        return if method == Method::POST {
            contact::handle_contact(req, state).await
        } else {
            http::build_405_response("POST, OPTIONS")
        };
    }

    let is_health = site.health_enabled && path == site.health_path;
    let template = pages::template_for(&path);
    let asset = path.strip_prefix(pages::STATIC_PREFIX);

    let is_head = method == Method::HEAD;
    if method != Method::GET && !is_head {
        // Unknown paths stay 404 whatever the method
        return if is_health || template.is_some() || asset.is_some() {
            logger::log_warning(&format!("Method not allowed: {method} {path}"));
            http::build_405_response("GET, HEAD, OPTIONS")
        } else {
            http::build_404_response()
        };
    }

    if is_health {
        return http::build_health_response();
    }

    if let Some(template) = template {
        return pages::render_page(template, &site.template_dir, is_head).await;
    }

    if let Some(asset) = asset {
        let if_none_match = req
            .headers()
            .get(IF_NONE_MATCH)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);
        return pages::serve_static(asset, &site.static_dir, if_none_match.as_deref(), is_head)
            .await;
    }

    http::build_404_response()
}

fn access_entry<B>(req: &Request<B>, peer_addr: SocketAddr) -> AccessLogEntry {
    let header = |name: HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
