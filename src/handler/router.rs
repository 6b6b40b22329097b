//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for method
//! validation, route matching, and access logging.

use crate::config::AppState;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use super::page;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_str(req.version()).to_string();
    entry.referer = header_value(&req, "referer");
    entry.user_agent = header_value(&req, "user-agent");

    let response = process_request(&req, &state).await;

    if state.config.logging.access_log {
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.request_time_us =
            u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

async fn process_request(
    req: &Request<hyper::body::Incoming>,
    state: &Arc<AppState>,
) -> Response<Full<Bytes>> {
    let method = req.method();

    // 1. Check HTTP method
    if let Some(resp) = check_http_method(method) {
        return resp;
    }

    // 2. Check declared body size
    if let Some(resp) = check_body_size(req, state.config.http.max_body_size) {
        return resp;
    }

    // 3. Log headers if enabled
    logger::log_headers_count(req.headers().len(), state.config.logging.show_headers);

    // 4. Extract headers for conditional requests and dispatch
    let ctx = RequestContext {
        path: req.uri().path(),
        is_head: *method == Method::HEAD,
        if_none_match: header_value(req, "if-none-match"),
    };

    dispatch(&ctx, state).await
}

/// Route request based on path: configured page routes match exactly,
/// everything else is 404
async fn dispatch(ctx: &RequestContext<'_>, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    if state.config.pages.routes.iter().any(|r| r == ctx.path) {
        page::serve_page(ctx, state).await
    } else {
        http::build_404_response()
    }
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match method {
        &Method::GET | &Method::HEAD => None,
        &Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(
    req: &Request<hyper::body::Incoming>,
    max_body_size: u64,
) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

fn header_value(req: &Request<hyper::body::Incoming>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

const fn version_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        Config, HttpConfig, LoggingConfig, PagesConfig, PerformanceConfig, ServerConfig,
    };
    use http_body_util::BodyExt;

    fn test_state(page_file: &str) -> Arc<AppState> {
        Arc::new(AppState::new(Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                workers: None,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                access_log: false,
                access_log_format: "combined".to_string(),
                show_headers: false,
            },
            performance: PerformanceConfig {
                keep_alive_timeout: 75,
                read_timeout: 30,
                write_timeout: 30,
                max_connections: None,
            },
            http: HttpConfig {
                server_name: "Testpage-Server/0.1".to_string(),
                max_body_size: 1024,
            },
            pages: PagesConfig {
                file: page_file.to_string(),
                routes: vec!["/".to_string(), "/testpage".to_string()],
            },
        }))
    }

    fn ctx(path: &str) -> RequestContext<'_> {
        RequestContext {
            path,
            is_head: false,
            if_none_match: None,
        }
    }

    async fn body_bytes(resp: Response<Full<Bytes>>) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    fn write_test_page(name: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "testpage_router_{}_{name}.html",
            std::process::id()
        ));
        std::fs::write(&path, b"<html><body>test page</body></html>").unwrap();
        path
    }

    #[tokio::test]
    async fn test_page_routes_serve_identical_bodies() {
        let page = write_test_page("routes");
        let state = test_state(page.to_str().unwrap());

        let root = dispatch(&ctx("/"), &state).await;
        assert_eq!(root.status(), 200);
        let testpage = dispatch(&ctx("/testpage"), &state).await;
        assert_eq!(testpage.status(), 200);

        let root_body = body_bytes(root).await;
        assert_eq!(root_body, body_bytes(testpage).await);
        assert_eq!(root_body, std::fs::read(&page).unwrap());

        std::fs::remove_file(&page).ok();
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let page = write_test_page("notfound");
        let state = test_state(page.to_str().unwrap());

        assert_eq!(dispatch(&ctx("/nonexistent"), &state).await.status(), 404);
        // Matching is exact, no prefix bleed
        assert_eq!(dispatch(&ctx("/testpage/sub"), &state).await.status(), 404);

        std::fs::remove_file(&page).ok();
    }

    #[tokio::test]
    async fn test_missing_page_file_is_500() {
        let state = test_state("/no/such/dir/index.html");
        assert_eq!(dispatch(&ctx("/"), &state).await.status(), 500);
    }

    #[tokio::test]
    async fn test_head_gets_empty_body() {
        let page = write_test_page("head");
        let state = test_state(page.to_str().unwrap());

        let head_ctx = RequestContext {
            path: "/testpage",
            is_head: true,
            if_none_match: None,
        };
        let resp = dispatch(&head_ctx, &state).await;
        assert_eq!(resp.status(), 200);
        assert!(body_bytes(resp).await.is_empty());

        std::fs::remove_file(&page).ok();
    }

    #[test]
    fn test_check_http_method() {
        assert!(check_http_method(&Method::GET).is_none());
        assert!(check_http_method(&Method::HEAD).is_none());
        assert_eq!(
            check_http_method(&Method::OPTIONS).unwrap().status(),
            204
        );
        assert_eq!(check_http_method(&Method::POST).unwrap().status(), 405);
        assert_eq!(check_http_method(&Method::DELETE).unwrap().status(), 405);
    }
}
