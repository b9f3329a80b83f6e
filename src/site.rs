use std::path::{Component, Path, PathBuf};

use axum::{
    debug_handler,
    extract::State,
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use tokio::fs;

/// Where the static site lives on disk.
#[derive(Clone)]
pub struct Site {
    pub root: PathBuf,
}

impl Site {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Site { root: root.into() }
    }

    /// Maps a request path to a file under the content root. Paths that
    /// would escape the root resolve to nothing.
    fn resolve(&self, request_path: &str) -> Option<PathBuf> {
        let relative = Path::new(request_path.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return None;
        }
        Some(self.root.join(relative))
    }
}

#[debug_handler]
pub(crate) async fn index() -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, "/index.html")])
}

/// Catch-all for anything no API route claimed: serve the matching file,
/// or the fixed 404 page when there is no regular file at that path.
#[debug_handler]
pub(crate) async fn static_file(State(site): State<Site>, uri: Uri) -> Response {
    let Some(path) = site.resolve(uri.path()) else {
        tracing::warn!("refusing path outside content root: {}", uri.path());
        return not_found_page(&site).await;
    };

    tracing::debug!("requested file: {}", path.display());

    let is_file = fs::metadata(&path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false);
    if !is_file {
        tracing::warn!("file not found: {}", path.display());
        return not_found_page(&site).await;
    }

    match fs::read(&path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, content_type(&path))], bytes).into_response(),
        Err(err) => {
            tracing::warn!("failed to read {}: {err}", path.display());
            not_found_page(&site).await
        }
    }
}

/// The fixed 404 page, served with a 404 status for every static failure.
/// The request path is never echoed back.
async fn not_found_page(site: &Site) -> Response {
    match fs::read(site.root.join("404.html")).await {
        Ok(bytes) => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            bytes,
        )
            .into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
    }
}

fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") => "text/html; charset=utf-8",
        Some("js") => "application/javascript; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("ico") => "image/x-icon",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;
    use crate::{AppState, app};

    #[test]
    fn resolve_stays_inside_the_root() {
        let site = Site::new("/srv/site");
        assert_eq!(
            site.resolve("/index.html"),
            Some(PathBuf::from("/srv/site/index.html"))
        );
        assert_eq!(
            site.resolve("/css/style.css"),
            Some(PathBuf::from("/srv/site/css/style.css"))
        );
        assert_eq!(site.resolve("/../etc/passwd"), None);
        assert_eq!(site.resolve("/css/../../etc/passwd"), None);
    }

    #[test]
    fn content_types_follow_the_extension() {
        assert_eq!(
            content_type(Path::new("index.html")),
            "text/html; charset=utf-8"
        );
        assert_eq!(
            content_type(Path::new("app.js")),
            "application/javascript; charset=utf-8"
        );
        assert_eq!(content_type(Path::new("logo.png")), "image/png");
        assert_eq!(
            content_type(Path::new("mystery.xyz")),
            "application/octet-stream"
        );
        assert_eq!(content_type(Path::new("no_extension")), "application/octet-stream");
    }

    fn site_fixture() -> (tempfile::TempDir, axum::Router) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>hello</h1>").unwrap();
        std::fs::write(dir.path().join("404.html"), "<h1>nothing here</h1>").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        let app = app(AppState::new(Site::new(dir.path())));
        (dir, app)
    }

    async fn get(app: &axum::Router, uri: &str) -> Response {
        app.clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn root_redirects_to_the_landing_page() {
        let (_dir, app) = site_fixture();

        let response = get(&app, "/").await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/index.html");
    }

    #[tokio::test]
    async fn existing_files_are_served_with_their_content_type() {
        let (_dir, app) = site_fixture();

        let response = get(&app, "/index.html").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
        assert_eq!(body_string(response).await, "<h1>hello</h1>");
    }

    #[tokio::test]
    async fn missing_files_get_the_404_page() {
        let (_dir, app) = site_fixture();

        let response = get(&app, "/missing.css").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(response).await, "<h1>nothing here</h1>");
    }

    #[tokio::test]
    async fn directories_are_not_served() {
        let (_dir, app) = site_fixture();

        let response = get(&app, "/sub").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(response).await, "<h1>nothing here</h1>");
    }

    #[tokio::test]
    async fn without_a_404_page_a_plain_message_is_served() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(AppState::new(Site::new(dir.path())));

        let response = get(&app, "/missing.html").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(response).await, "404 Not Found");
    }
}
