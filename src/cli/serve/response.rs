//! HTTP response handlers.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Request, Response, StatusCode};

use crate::utils::mime::{PLAIN, SVG};

/// Cache policy for served sprites.
const CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// Respond with a sprite file.
pub fn respond_sprite(request: Request, path: &Path) -> Result<()> {
    let headers = [
        make_header("Cache-Control", CACHE_CONTROL),
        make_header("Access-Control-Allow-Origin", "*"),
    ];

    if is_head_request(&request) {
        return send_head(request, 200, SVG, headers);
    }

    let body = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    send_body(request, 200, SVG, body, headers)
}

pub fn respond_not_found(request: Request) -> Result<()> {
    if is_head_request(&request) {
        return send_head(request, 404, PLAIN, []);
    }
    send_body(request, 404, PLAIN, b"404 Not Found".to_vec(), [])
}

pub fn respond_method_not_allowed(request: Request) -> Result<()> {
    let allow = [make_header("Allow", "GET, HEAD")];
    send_body(request, 405, PLAIN, b"405 Method Not Allowed".to_vec(), allow)
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    send_body(request, 503, PLAIN, b"503 Service Unavailable".to_vec(), [])
}

fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

fn send_head<const N: usize>(
    request: Request,
    status: u16,
    content_type: &'static str,
    headers: [Header; N],
) -> Result<()> {
    let mut response =
        Response::empty(StatusCode(status)).with_header(make_header("Content-Type", content_type));
    for header in headers {
        response.add_header(header);
    }
    request.respond(response)?;
    Ok(())
}

fn send_body<const N: usize>(
    request: Request,
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
    headers: [Header; N],
) -> Result<()> {
    let mut response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", content_type));
    for header in headers {
        response.add_header(header);
    }
    request.respond(response)?;
    Ok(())
}

fn make_header(key: &'static str, value: &'static str) -> Header {
    Header::from_bytes(key, value).unwrap()
}
