//! HTTP cache control module
//!
//! Validators for rendered pages and served artifacts, plus the
//! `Cache-Control` policy chosen per kind of update site file.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Repository metadata that changes in place whenever the site is republished
const METADATA_FILES: &[&str] = &[
    "site.xml",
    "content.jar",
    "content.xml",
    "content.xml.xz",
    "artifacts.jar",
    "artifacts.xml",
    "artifacts.xml.xz",
    "compositecontent.jar",
    "compositecontent.xml",
    "compositeartifacts.jar",
    "compositeartifacts.xml",
    "p2.index",
];

/// Compute a strong `ETag` for a body
///
/// The tag combines the body length with a hash of its bytes, e.g.
/// `"1a4-9f3c01d2b7e8a655"`.
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("\"{:x}-{:x}\"", content.len(), hasher.finish())
}

/// Whether `If-None-Match` lists `etag` (a 304 is due)
///
/// Accepts comma-separated lists, weak `W/` validators and `*`.
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    let Some(header) = if_none_match else {
        return false;
    };
    header.split(',').map(str::trim).any(|candidate| {
        candidate == "*" || candidate.strip_prefix("W/").unwrap_or(candidate) == etag
    })
}

/// Cache control policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Shared caches may keep the response for `max-age` seconds
    Public(u32),
    /// Store but revalidate on every use
    NoCache,
}

impl CachePolicy {
    /// Rendered index pages follow the directory contents
    pub const INDEX: Self = Self::NoCache;

    /// Versioned bundles and features
    pub const ARTIFACT: Self = Self::Public(3600);

    /// Policy for a served file, by name
    ///
    /// # Examples
    /// ```
    /// use updatesite_index::http::CachePolicy;
    ///
    /// assert_eq!(CachePolicy::for_file("content.jar"), CachePolicy::NoCache);
    /// assert_eq!(CachePolicy::for_file("com.example_1.0.0.jar"), CachePolicy::ARTIFACT);
    /// ```
    pub fn for_file(name: &str) -> Self {
        if METADATA_FILES.iter().any(|m| m.eq_ignore_ascii_case(name)) {
            Self::NoCache
        } else {
            Self::ARTIFACT
        }
    }

    /// Value for the `Cache-Control` header
    pub fn to_header_value(self) -> String {
        match self {
            Self::Public(max_age) => format!("public, max-age={max_age}"),
            Self::NoCache => "no-cache".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_etag_is_quoted_and_content_sensitive() {
        let etag = generate_etag(b"hello world");
        assert!(etag.starts_with("\"b-"));
        assert!(etag.ends_with('"'));
        assert_eq!(etag, generate_etag(b"hello world"));
        assert_ne!(etag, generate_etag(b"hello there"));
    }

    #[test]
    fn test_if_none_match() {
        let etag = "\"5-abc\"";
        assert!(check_etag_match(Some("\"5-abc\""), etag));
        assert!(check_etag_match(Some("\"1-x\",  \"5-abc\""), etag));
        assert!(check_etag_match(Some("W/\"5-abc\""), etag));
        assert!(check_etag_match(Some("*"), etag));
        assert!(!check_etag_match(Some("\"5-abd\""), etag));
        assert!(!check_etag_match(Some(""), etag));
        assert!(!check_etag_match(None, etag));
    }

    #[test]
    fn test_policy_per_file() {
        assert_eq!(CachePolicy::for_file("artifacts.xml.xz"), CachePolicy::NoCache);
        assert_eq!(CachePolicy::for_file("SITE.XML"), CachePolicy::NoCache);
        assert_eq!(CachePolicy::for_file("org.example.feature_2.1.0.jar"), CachePolicy::ARTIFACT);
        assert_eq!(CachePolicy::ARTIFACT.to_header_value(), "public, max-age=3600");
        assert_eq!(CachePolicy::INDEX.to_header_value(), "no-cache");
    }
}
