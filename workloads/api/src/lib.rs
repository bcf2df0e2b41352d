//! The Api worker: a stateless handler with a single static route.
//!
//! `GET /` returns a fixed JSON greeting; everything else is a 404. The
//! handler has no inputs beyond the request line, no side effects, and no
//! failure paths, so the response is byte-for-byte stable across calls.

use http::{header, Method, Request, Response, StatusCode};
use serde::Serialize;

/// The greeting served at the root path.
pub const GREETING: &str = "Hello from Hono + Cloudflare + pnpm!";

#[derive(Debug, Serialize)]
struct Greeting {
    message: &'static str,
}

/// Handle a single request.
pub fn handle<B>(req: &Request<B>) -> Response<String> {
    if req.method() == Method::GET && req.uri().path() == "/" {
        let body = serde_json::to_string(&Greeting { message: GREETING })
            .expect("greeting serializes");
        Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .expect("static response parts are valid")
    } else {
        Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(String::new())
            .expect("static response parts are valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get(path: &str) -> Request<()> {
        Request::builder().method(Method::GET).uri(path).body(()).unwrap()
    }

    #[test]
    fn test_root_returns_fixed_json() {
        let res = handle(&get("/"));

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(
            res.body(),
            r#"{"message":"Hello from Hono + Cloudflare + pnpm!"}"#
        );
    }

    #[test]
    fn test_response_is_stable_across_calls() {
        let first = handle(&get("/"));
        let second = handle(&get("/"));

        assert_eq!(first.status(), second.status());
        assert_eq!(first.body().as_bytes(), second.body().as_bytes());
    }

    #[test]
    fn test_other_paths_are_not_found() {
        for path in ["/health", "/api", "/index.html"] {
            let res = handle(&get(path));
            assert_eq!(res.status(), StatusCode::NOT_FOUND, "path {:?}", path);
        }
    }

    #[test]
    fn test_non_get_is_not_found() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/")
            .body(())
            .unwrap();

        assert_eq!(handle(&req).status(), StatusCode::NOT_FOUND);
    }
}
