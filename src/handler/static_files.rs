//! Static file serving module
//!
//! Serves the artifacts under the site root so the IDE can fetch them.
//! Directory paths redirect to the index page expanded at that directory.

use crate::config::SiteConfig;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, range::RangeParseResult, CachePolicy};
use crate::logger;
use crate::site::path::{percent_encode_segment, url_path_segments, DIR_PARAM};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::{Path, PathBuf};
use tokio::fs;

/// What a request path resolved to under the site root
#[derive(Debug, PartialEq, Eq)]
pub enum Resolved {
    File(PathBuf),
    Dir(Vec<String>),
}

/// Serve a file or redirect a directory under the site root
pub async fn serve_path(ctx: &RequestContext<'_>, site: &SiteConfig) -> Response<Full<Bytes>> {
    match resolve(ctx.path, site).await {
        Some(Resolved::Dir(segments)) => {
            let dir = segments
                .iter()
                .map(|s| percent_encode_segment(s))
                .collect::<Vec<_>>()
                .join("/");
            http::build_redirect_response(&format!("/?{DIR_PARAM}={dir}"))
        }
        Some(Resolved::File(path)) => serve_file(ctx, &path).await,
        None => http::build_404_response(),
    }
}

/// Map a URL path onto the site root
///
/// Returns `None` for unsafe or missing paths and excluded script files.
/// Without `follow_symlinks`, a path crossing any symlink is refused, so every
/// served file lies inside the root.
pub async fn resolve(url_path: &str, site: &SiteConfig) -> Option<Resolved> {
    let segments = url_path_segments(url_path)?;

    let root = match fs::canonicalize(&site.root).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Site root not found or inaccessible '{}': {e}",
                site.root.display()
            ));
            return None;
        }
    };

    let requested: PathBuf = segments.iter().fold(root.clone(), |p, s| p.join(s));

    // Missing files are common (404), no need to log at warning level
    let canonical = fs::canonicalize(&requested).await.ok()?;
    if !site.follow_symlinks && canonical != requested {
        logger::log_warning(&format!(
            "Blocked symlinked path: {url_path} -> {}",
            canonical.display()
        ));
        return None;
    }

    let meta = fs::metadata(&canonical).await.ok()?;
    if meta.is_dir() {
        return Some(Resolved::Dir(segments));
    }

    let name = segments.last()?;
    if site.script_filter().is_excluded(name) {
        return None;
    }
    meta.is_file().then_some(Resolved::File(canonical))
}

async fn serve_file(ctx: &RequestContext<'_>, path: &Path) -> Response<Full<Bytes>> {
    let content = match fs::read(path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!("Failed to read file '{}': {e}", path.display()));
            return http::build_404_response();
        }
    };
    let content_type = mime::get_content_type(path.extension().and_then(|e| e.to_str()));
    let policy = path
        .file_name()
        .and_then(|n| n.to_str())
        .map_or(CachePolicy::ARTIFACT, CachePolicy::for_file);

    build_file_response(content, content_type, policy, ctx)
}

/// Build file response with `ETag` and Range support
fn build_file_response(
    data: Vec<u8>,
    content_type: &str,
    policy: CachePolicy,
    ctx: &RequestContext<'_>,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(&data);
    let total_size = data.len();

    // Check if client has cached version
    if cache::check_etag_match(ctx.if_none_match, &etag) {
        return http::build_304_response(&etag, policy);
    }

    match http::parse_range_header(ctx.range_header, total_size) {
        RangeParseResult::Valid(range) => {
            let body = Bytes::from(data).slice(range.as_range());
            http::response::build_partial_response(
                body,
                content_type,
                &etag,
                policy,
                range,
                total_size,
                ctx.is_head,
            )
        }
        RangeParseResult::NotSatisfiable => http::build_416_response(total_size),
        RangeParseResult::None => http::response::build_cached_response(
            Bytes::from(data),
            content_type,
            &etag,
            policy,
            ctx.is_head,
        ),
    }
}
