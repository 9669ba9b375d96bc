//! Page and static asset serving
//!
//! The four site pages are plain HTML files in the template directory; assets
//! under `/static/` come from the static directory.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

use crate::http::{self, cache, mime};
use crate::logger;

/// URL prefix for static assets
pub const STATIC_PREFIX: &str = "/static/";

/// Site pages: request path and the template rendered for it
const PAGES: [(&str, &str); 4] = [
    ("/", "index.html"),
    ("/services", "services.html"),
    ("/portfolio", "portfolio.html"),
    ("/contact", "contact.html"),
];

/// Template for an exact page path
pub fn template_for(path: &str) -> Option<&'static str> {
    PAGES
        .iter()
        .find(|(page, _)| *page == path)
        .map(|(_, template)| *template)
}

/// Render a page template
///
/// A template missing from disk is a deployment error, so it answers 500
/// rather than 404.
pub async fn render_page(template: &str, template_dir: &str, is_head: bool) -> Response<Full<Bytes>> {
    let path = Path::new(template_dir).join(template);
    match fs::read_to_string(&path).await {
        Ok(html) => http::build_html_response(html, is_head),
        Err(e) => {
            logger::log_error(&format!("Failed to load template {}: {e}", path.display()));
            http::build_500_response()
        }
    }
}

/// Serve one file below the static directory
pub async fn serve_static(
    asset: &str,
    static_dir: &str,
    if_none_match: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let Some(path) = resolve_asset(Path::new(static_dir), asset) else {
        logger::log_warning(&format!("Rejected static asset path: {asset}"));
        return http::build_404_response();
    };

    let data = match fs::read(&path).await {
        Ok(data) => data,
        Err(e) => {
            if e.kind() != ErrorKind::NotFound {
                logger::log_warning(&format!("Failed to read {}: {e}", path.display()));
            }
            return http::build_404_response();
        }
    };

    let etag = cache::etag_for(&data);
    if cache::is_not_modified(if_none_match, &etag) {
        return http::build_304_response(&etag);
    }

    http::build_asset_response(Bytes::from(data), mime::content_type_for(&path), &etag, is_head)
}

/// Join `asset` onto `base`, refusing anything that could leave `base`
fn resolve_asset(base: &Path, asset: &str) -> Option<PathBuf> {
    let relative = Path::new(asset);
    let mut resolved = base.to_path_buf();
    let mut has_file = false;

    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                resolved.push(part);
                has_file = true;
            }
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    has_file.then_some(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use hyper::StatusCode;

    #[test]
    fn test_template_for_known_pages() {
        assert_eq!(template_for("/"), Some("index.html"));
        assert_eq!(template_for("/services"), Some("services.html"));
        assert_eq!(template_for("/portfolio"), Some("portfolio.html"));
        assert_eq!(template_for("/contact"), Some("contact.html"));
        assert_eq!(template_for("/contact/"), None);
        assert_eq!(template_for("/about"), None);
    }

    #[test]
    fn test_resolve_asset_rejects_traversal() {
        let base = Path::new("static");
        assert_eq!(
            resolve_asset(base, "css/site.css"),
            Some(PathBuf::from("static/css/site.css"))
        );
        assert_eq!(resolve_asset(base, "../config.toml"), None);
        assert_eq!(resolve_asset(base, "css/../../secret"), None);
        assert_eq!(resolve_asset(base, "/etc/passwd"), None);
        assert_eq!(resolve_asset(base, ""), None);
    }

    #[tokio::test]
    async fn test_render_page() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>Home</h1>").unwrap();
        let template_dir = dir.path().to_str().unwrap();

        let resp = render_page("index.html", template_dir, false).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"<h1>Home</h1>");

        let resp = render_page("services.html", template_dir, false).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_serve_static_with_etag() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("css")).unwrap();
        std::fs::write(dir.path().join("css/site.css"), "body{}").unwrap();
        let static_dir = dir.path().to_str().unwrap();

        let resp = serve_static("css/site.css", static_dir, None, false).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["Content-Type"], "text/css; charset=utf-8");
        let etag = resp.headers()["ETag"].to_str().unwrap().to_string();

        let resp = serve_static("css/site.css", static_dir, Some(&etag), false).await;
        assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);

        let resp = serve_static("css/missing.css", static_dir, None, false).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = serve_static("css", static_dir, None, false).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
