//! Static files under the site root

use axum::{
    body::Body,
    handler::HandlerWithoutStateExt,
    http::{header, HeaderValue, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use std::path::{Path, PathBuf};
use tower_http::services::ServeDir;

/// Content type by file extension
pub fn mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("ico") => "image/x-icon",
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("js") => "text/javascript",
        Some("json") => "application/json",
        Some("css") => "text/css",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("wav") => "audio/wav",
        Some("mp3") => "audio/mpeg",
        Some("svg") => "image/svg+xml",
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("eot") => "application/vnd.ms-fontobject",
        Some("ttf") => "application/font-sfnt",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("md") => "text/markdown; charset=utf-8",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "text/plain",
    }
}

/// Serve a request from `root` through `ServeDir`. Directories serve their
/// `index.html`, and anything missing is a plain-text 404 naming the path.
pub async fn serve(root: &Path, request: Request<Body>) -> Response {
    let url_path = request.uri().path().to_string();
    let mut service = ServeDir::new(root)
        .append_index_html_on_directories(true)
        .not_found_service(missing.into_service());

    match service.try_call(request).await {
        Ok(response) => {
            let mut response = response.into_response();
            if response.status().is_success() {
                tracing::debug!("Serving {}", url_path);
                let content_type = mime_type(&served_file(&url_path));
                response
                    .headers_mut()
                    .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
            }
            response
        }
        Err(e) => {
            tracing::error!("Static file {} failed: {}", url_path, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

/// The file a successful request resolved to, for picking its content type
fn served_file(url_path: &str) -> PathBuf {
    let path = PathBuf::from(url_path);
    if url_path.ends_with('/') {
        path.join("index.html")
    } else {
        path
    }
}

async fn missing(uri: Uri) -> Response {
    tracing::debug!("Static file {} not found", uri.path());
    not_found(uri.path())
}

pub fn not_found(url_path: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        format!("File {} not found!", url_path),
    )
        .into_response()
}
