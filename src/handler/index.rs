//! Index page handler
//!
//! Renders the welcome banner and the directory tree for the `dir` query
//! parameter. The filesystem walk is synchronous and runs on the blocking pool.

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, CachePolicy};
use crate::logger;
use crate::site::{render_index, RequestedPath};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::sync::Arc;

/// Serve the index page
pub async fn serve_index(ctx: &RequestContext<'_>, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    let requested = RequestedPath::from_query(ctx.query);
    logger::log_debug(&format!("Rendering index for '/{}'", requested.joined()));

    let state = Arc::clone(state);
    let rendered =
        tokio::task::spawn_blocking(move || render_index(&state.config.site, &requested)).await;

    let html = match rendered {
        Ok(html) => html,
        Err(e) => {
            logger::log_error(&format!("Index rendering task failed: {e}"));
            return http::build_500_response();
        }
    };

    let etag = cache::generate_etag(html.as_bytes());
    if cache::check_etag_match(ctx.if_none_match, &etag) {
        return http::build_304_response(&etag, CachePolicy::INDEX);
    }

    http::build_html_response(html, &etag, CachePolicy::INDEX, ctx.is_head)
}
