//! Directory tree renderer
//!
//! Emits the site root as nested `<ul>` lists. Every level shows its direct
//! children; only the sub-directory named by the requested path at that depth
//! is expanded, so a request opens exactly one branch of the tree.

use std::fmt::{self, Write};
use std::path::{Path, PathBuf};

use super::listing::{read_listing, ListingOptions};
use super::path::{percent_encode_segment, RequestedPath, DIR_PARAM};

/// Render the listing for `requested` under `root` into a new string
pub fn render_tree(root: &Path, requested: &RequestedPath, options: &ListingOptions) -> String {
    let mut html = String::new();
    // Writing into a String cannot fail
    let _ = write_tree(&mut html, root, requested, options);
    html
}

/// Stream the listing for `requested` under `root` into `out`
pub fn write_tree<W: Write>(
    out: &mut W,
    root: &Path,
    requested: &RequestedPath,
    options: &ListingOptions,
) -> fmt::Result {
    let mut walk = TreeWalk {
        out,
        requested,
        options,
    };
    walk.level(root.to_path_buf(), "", 0)
}

struct TreeWalk<'a, W> {
    out: &'a mut W,
    requested: &'a RequestedPath,
    options: &'a ListingOptions,
}

impl<W: Write> TreeWalk<'_, W> {
    /// Render one directory level
    ///
    /// `link_prefix` is the already-encoded `dir` value of this level, empty at
    /// the root.
    fn level(&mut self, dir: PathBuf, link_prefix: &str, depth: usize) -> fmt::Result {
        let listing = read_listing(&dir, self.options);
        let expand = self.requested.segment(depth);

        self.out.write_str("<ul>\n")?;

        for name in &listing.dirs {
            let target = if link_prefix.is_empty() {
                percent_encode_segment(name)
            } else {
                format!("{link_prefix}/{}", percent_encode_segment(name))
            };

            write!(
                self.out,
                "<li><a href=\"?{DIR_PARAM}={}\">{}</a>",
                escape_html(&target),
                escape_html(name)
            )?;

            if expand == Some(name.as_str()) {
                self.out.write_char('\n')?;
                self.level(dir.join(name), &target, depth + 1)?;
            }

            self.out.write_str("</li>\n")?;
        }

        for name in &listing.files {
            writeln!(self.out, "<li>{}</li>", escape_html(name))?;
        }

        self.out.write_str("</ul>\n")
    }
}

/// Escape text for HTML element content and attribute values
///
/// # Examples
/// ```
/// use updatesite_index::site::escape_html;
///
/// assert_eq!(escape_html("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&#39;");
/// ```
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::ScriptFilter;
    use std::fs;
    use tempfile::TempDir;

    /// plugins/, features/, index.html, plugins/com.example_1.0.0.jar
    fn update_site() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir(root.join("plugins")).unwrap();
        fs::create_dir(root.join("features")).unwrap();
        fs::write(root.join("index.html"), "<html/>").unwrap();
        fs::write(root.join("plugins/com.example_1.0.0.jar"), [0u8; 8]).unwrap();
        tmp
    }

    fn render(root: &Path, dir: &str) -> String {
        render_tree(root, &RequestedPath::parse(dir), &ListingOptions::default())
    }

    #[test]
    fn test_root_collapsed() {
        let tmp = update_site();
        let html = render(tmp.path(), "");
        assert_eq!(
            html,
            "<ul>\n\
             <li><a href=\"?dir=features\">features</a></li>\n\
             <li><a href=\"?dir=plugins\">plugins</a></li>\n\
             <li>index.html</li>\n\
             </ul>\n"
        );
        assert!(!html.contains("com.example"));
    }

    #[test]
    fn test_requested_branch_expanded() {
        let tmp = update_site();
        let html = render(tmp.path(), "plugins");
        assert_eq!(
            html,
            "<ul>\n\
             <li><a href=\"?dir=features\">features</a></li>\n\
             <li><a href=\"?dir=plugins\">plugins</a>\n\
             <ul>\n\
             <li>com.example_1.0.0.jar</li>\n\
             </ul>\n\
             </li>\n\
             <li>index.html</li>\n\
             </ul>\n"
        );
    }

    #[test]
    fn test_only_matching_branch_expanded_at_each_depth() {
        let tmp = update_site();
        let root = tmp.path();
        fs::create_dir_all(root.join("plugins/a/deep")).unwrap();
        fs::create_dir_all(root.join("plugins/b/other")).unwrap();
        fs::create_dir_all(root.join("features/f/hidden")).unwrap();
        fs::write(root.join("plugins/a/deep/leaf.jar"), "").unwrap();

        let html = render(root, "plugins/a/deep");
        assert!(html.contains("href=\"?dir=plugins/a/deep\""));
        assert!(html.contains("<li>leaf.jar</li>"));
        // Siblings show only themselves, not their children
        assert!(html.contains("href=\"?dir=plugins/b\""));
        assert!(!html.contains("plugins/b/other"));
        assert!(!html.contains("features/f"));
        // One nested list per expanded level plus the root
        assert_eq!(html.matches("<ul>").count(), 4);
        assert_eq!(html.matches("<ul>").count(), html.matches("</ul>").count());
    }

    #[test]
    fn test_missing_path_stops_at_last_match() {
        let tmp = update_site();
        let html = render(tmp.path(), "plugins/missing/more");
        assert!(html.contains("<li>com.example_1.0.0.jar</li>"));
        assert_eq!(html.matches("<ul>").count(), 2);

        let html = render(tmp.path(), "nothing-here");
        assert_eq!(html, render(tmp.path(), ""));
    }

    #[test]
    fn test_file_segment_does_not_expand() {
        let tmp = update_site();
        assert_eq!(render(tmp.path(), "index.html"), render(tmp.path(), ""));
    }

    #[test]
    fn test_missing_root_is_empty_list() {
        let tmp = TempDir::new().unwrap();
        let html = render(&tmp.path().join("absent"), "plugins");
        assert_eq!(html, "<ul>\n</ul>\n");
    }

    #[test]
    fn test_scripts_hidden() {
        let tmp = update_site();
        fs::write(tmp.path().join("index.php"), "<?php ?>").unwrap();
        fs::write(tmp.path().join("plugins/helper.php"), "").unwrap();

        let html = render(tmp.path(), "plugins");
        assert!(!html.contains(".php"));

        let options = ListingOptions {
            filter: ScriptFilter::new(Vec::<String>::new()),
            follow_symlinks: false,
        };
        let html = render_tree(tmp.path(), &RequestedPath::parse("plugins"), &options);
        assert!(html.contains("<li>index.php</li>"));
        assert!(html.contains("<li>helper.php</li>"));
    }

    #[test]
    fn test_names_escaped_and_links_encoded() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir(root.join("a b&c")).unwrap();
        fs::write(root.join("a b&c/<x>.jar"), "").unwrap();

        let html = render(root, "a b&c");
        assert!(html.contains("<a href=\"?dir=a%20b%26c\">a b&amp;c</a>"));
        assert!(html.contains("<li>&lt;x&gt;.jar</li>"));
    }

    #[test]
    fn test_traversal_segment_expands_nothing() {
        let tmp = update_site();
        let nested = tmp.path().join("plugins");
        assert_eq!(render(&nested, "../plugins"), render(&nested, ""));
    }

    #[test]
    fn test_write_tree_into_custom_sink() {
        let tmp = update_site();
        let mut out = String::from("<div>");
        write_tree(
            &mut out,
            tmp.path(),
            &RequestedPath::root(),
            &ListingOptions::default(),
        )
        .unwrap();
        assert!(out.starts_with("<div><ul>\n"));
    }
}
