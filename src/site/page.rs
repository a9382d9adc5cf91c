//! Index page module
//!
//! Wraps the welcome banner and the rendered directory tree into a full HTML
//! document.

use std::fmt::Write;

use super::render::{escape_html, write_tree};
use super::RequestedPath;
use crate::config::SiteConfig;

/// Render the complete index page for a requested path
pub fn render_index(site: &SiteConfig, requested: &RequestedPath) -> String {
    let mut html = String::with_capacity(2048);
    let _ = write_header(&mut html, site, requested);
    let _ = write_tree(&mut html, &site.root, requested, &site.listing_options());
    html.push_str(PAGE_FOOTER);
    html
}

fn write_header(html: &mut String, site: &SiteConfig, requested: &RequestedPath) -> std::fmt::Result {
    let title = escape_html(&site.title);
    write!(
        html,
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <style>
        body {{
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
            line-height: 1.5;
            margin: 2em auto;
            max-width: 960px;
            padding: 0 1em;
            color: #222;
        }}
        .banner {{
            border-bottom: 1px solid #ddd;
            margin-bottom: 1.5em;
        }}
        ul {{
            list-style: square;
        }}
        a {{
            color: #2c5aa0;
            text-decoration: none;
        }}
        a:hover {{
            text-decoration: underline;
        }}
    </style>
</head>
<body>
    <div class="banner">
        <h1>{title}</h1>
        <p>{}</p>
    </div>
"#,
        escape_html(&site.welcome)
    )?;

    if !requested.is_empty() {
        writeln!(
            html,
            "    <p class=\"location\"><a href=\"?\">/</a> {}</p>",
            escape_html(&requested.joined())
        )?;
    }
    Ok(())
}

const PAGE_FOOTER: &str = "</body>\n</html>\n";
