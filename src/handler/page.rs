//! Page serving module
//!
//! Loads the bundled page file and builds its responses.

use crate::config::AppState;
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;

use super::router::RequestContext;

/// Serve the configured page file
pub async fn serve_page(ctx: &RequestContext<'_>, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    let file = &state.config.pages.file;
    match load_page(file).await {
        Ok((content, content_type)) => {
            build_response(&content, content_type, ctx, &state.config.http.server_name)
        }
        Err(e) => {
            logger::log_error(&format!("Failed to read page file '{file}': {e}"));
            http::build_500_response()
        }
    }
}

/// Read the page file and infer its content type from the extension
///
/// The file is read on every request: a file missing at request time is a
/// 500 on that request, not a startup failure.
pub async fn load_page(file_path: &str) -> std::io::Result<(Vec<u8>, &'static str)> {
    let path = Path::new(file_path);
    let content = fs::read(path).await?;
    let content_type = mime::content_type_for(path.extension().and_then(|e| e.to_str()));
    Ok((content, content_type))
}

/// Build the page response, honoring conditional requests and HEAD
fn build_response(
    data: &[u8],
    content_type: &'static str,
    ctx: &RequestContext<'_>,
    server_name: &str,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(data);

    if cache::etag_matches(ctx.if_none_match.as_deref(), &etag) {
        return http::build_304_response(&etag);
    }

    http::response::build_file_response(
        Bytes::from(data.to_owned()),
        content_type,
        &etag,
        server_name,
        ctx.is_head,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_test_page(name: &str, content: &[u8]) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "testpage_page_{}_{name}.html",
            std::process::id()
        ));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_load_page() {
        let page = write_test_page("load", b"<html>hello</html>");
        let (content, content_type) = load_page(page.to_str().unwrap()).await.unwrap();
        assert_eq!(content, b"<html>hello</html>");
        assert_eq!(content_type, "text/html; charset=utf-8");
        std::fs::remove_file(&page).ok();
    }

    #[tokio::test]
    async fn test_load_page_missing_file() {
        assert!(load_page("/no/such/dir/index.html").await.is_err());
    }

    #[test]
    fn test_conditional_request_gets_304() {
        let data = b"<html>cached</html>";
        let etag = cache::generate_etag(data);

        let ctx = RequestContext {
            path: "/",
            is_head: false,
            if_none_match: Some(etag.clone()),
        };
        let resp = build_response(data, "text/html; charset=utf-8", &ctx, "test");
        assert_eq!(resp.status(), 304);
        assert_eq!(resp.headers().get("ETag").unwrap().to_str().unwrap(), etag);
    }

    #[test]
    fn test_stale_etag_gets_full_response() {
        let data = b"<html>fresh</html>";
        let ctx = RequestContext {
            path: "/",
            is_head: false,
            if_none_match: Some("\"stale\"".to_string()),
        };
        let resp = build_response(data, "text/html; charset=utf-8", &ctx, "test");
        assert_eq!(resp.status(), 200);
    }
}
