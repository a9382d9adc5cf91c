//! Requested path module
//!
//! Turns the `dir` query parameter into an ordered list of path segments.

/// Query parameter carrying the requested directory
pub const DIR_PARAM: &str = "dir";

/// Path requested by the client, split into `/`-delimited segments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestedPath {
    segments: Vec<String>,
}

impl RequestedPath {
    /// The site root (no segments)
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Parse an already-decoded relative path such as `plugins/nested`
    ///
    /// Empty segments are dropped. The path is cut at the first segment that
    /// could step outside the served root (`.`, `..`, or one containing a
    /// backslash or NUL), so the listing expands no further than the segments
    /// before it.
    ///
    /// # Examples
    /// ```
    /// use updatesite_index::site::RequestedPath;
    ///
    /// let path = RequestedPath::parse("/plugins//nested/");
    /// assert_eq!(path.segments(), ["plugins", "nested"]);
    ///
    /// let path = RequestedPath::parse("plugins/../../etc");
    /// assert_eq!(path.segments(), ["plugins"]);
    /// ```
    pub fn parse(raw: &str) -> Self {
        let segments = raw
            .split('/')
            .filter(|s| !s.is_empty())
            .take_while(|s| is_safe_segment(s))
            .map(ToString::to_string)
            .collect();
        Self { segments }
    }

    /// Extract the `dir` parameter from a raw URL query string
    ///
    /// Missing query or parameter yields the root. When the parameter is
    /// repeated, the last occurrence wins.
    pub fn from_query(query: Option<&str>) -> Self {
        query
            .and_then(|q| query_param(q, DIR_PARAM))
            .map_or_else(Self::root, |value| Self::parse(&value))
    }

    /// Segment at the given depth, if the request goes that deep
    pub fn segment(&self, depth: usize) -> Option<&str> {
        self.segments.get(depth).map(String::as_str)
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segments joined back with `/`
    pub fn joined(&self) -> String {
        self.segments.join("/")
    }
}

fn is_safe_segment(segment: &str) -> bool {
    segment != "." && segment != ".." && !segment.contains(['\\', '\0'])
}

/// Find a parameter in an `application/x-www-form-urlencoded` query string
pub fn query_param(query: &str, name: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (percent_decode(key) == name).then(|| percent_decode(value))
        })
        .last()
}

/// Decode a query component: `%XX` escapes and `+` as space
///
/// Malformed escapes are kept literally; invalid UTF-8 is replaced.
pub fn percent_decode(input: &str) -> String {
    decode(input, true)
}

/// Decode a URL path segment, where `+` is literal
pub fn percent_decode_path(input: &str) -> String {
    decode(input, false)
}

/// Split a URL path into decoded segments, rejecting any that could leave
/// the served root
///
/// Returns `None` for `.`/`..` segments, encoded slashes, backslashes or NUL.
pub fn url_path_segments(path: &str) -> Option<Vec<String>> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|raw| {
            let segment = percent_decode_path(raw);
            (is_safe_segment(&segment) && !segment.contains('/')).then_some(segment)
        })
        .collect()
}

fn decode(input: &str, plus_as_space: bool) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'+' if plus_as_space => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                match (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        out.push((hi << 4) | lo);
                        i += 3;
                    }
                    _ => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

/// Percent-encode one path segment for use inside a query value
///
/// Unreserved characters pass through; everything else, `/` included,
/// becomes `%XX`.
pub fn percent_encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for b in segment.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~') {
            out.push(char::from(b));
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}

const fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_drops_empty_segments() {
        let path = RequestedPath::parse("//plugins///nested/");
        assert_eq!(path.segments(), ["plugins", "nested"]);
        assert_eq!(path.len(), 2);
        assert_eq!(path.segment(0), Some("plugins"));
        assert_eq!(path.segment(2), None);
    }

    #[test]
    fn test_parse_empty_is_root() {
        assert!(RequestedPath::parse("").is_empty());
        assert!(RequestedPath::parse("///").is_empty());
        assert_eq!(RequestedPath::parse(""), RequestedPath::root());
    }

    #[test]
    fn test_parse_stops_at_traversal() {
        assert_eq!(RequestedPath::parse("../etc").segments().len(), 0);
        assert_eq!(RequestedPath::parse("a/./b").segments(), ["a"]);
        assert_eq!(RequestedPath::parse("a/b\\c/d").segments(), ["a"]);
        // dots inside a name are fine
        assert_eq!(
            RequestedPath::parse("plugins/a..b").segments(),
            ["plugins", "a..b"]
        );
    }

    #[test]
    fn test_from_query() {
        let path = RequestedPath::from_query(Some("dir=plugins%2Fnested&x=1"));
        assert_eq!(path.segments(), ["plugins", "nested"]);

        let path = RequestedPath::from_query(Some("x=1&dir=features"));
        assert_eq!(path.joined(), "features");

        assert!(RequestedPath::from_query(None).is_empty());
        assert!(RequestedPath::from_query(Some("other=plugins")).is_empty());
        assert!(RequestedPath::from_query(Some("dir")).is_empty());
    }

    #[test]
    fn test_from_query_last_wins() {
        let path = RequestedPath::from_query(Some("dir=plugins&dir=features"));
        assert_eq!(path.joined(), "features");
    }

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode("a%20b"), "a b");
        assert_eq!(percent_decode("a+b"), "a b");
        assert_eq!(percent_decode("%2e%2E"), "..");
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%zz"), "%zz");
        assert_eq!(percent_decode("%C3%A9"), "é");
    }

    #[test]
    fn test_percent_decode_path_keeps_plus() {
        assert_eq!(percent_decode_path("c++%20x"), "c++ x");
    }

    #[test]
    fn test_url_path_segments() {
        assert_eq!(
            url_path_segments("/plugins/com.example%5F1.0.0.jar").unwrap(),
            ["plugins", "com.example_1.0.0.jar"]
        );
        assert_eq!(url_path_segments("/").unwrap().len(), 0);
        assert!(url_path_segments("/plugins/../secret").is_none());
        assert!(url_path_segments("/%2e%2e/secret").is_none());
        assert!(url_path_segments("/a%2Fb").is_none());
        assert!(url_path_segments("/a%5Cb").is_none());
    }

    #[test]
    fn test_encoded_traversal_is_cut() {
        let path = RequestedPath::from_query(Some("dir=plugins%2F%2E%2E%2F%2E%2E"));
        assert_eq!(path.segments(), ["plugins"]);
    }

    #[test]
    fn test_percent_encode_segment() {
        assert_eq!(
            percent_encode_segment("com.example_1.0.0.jar"),
            "com.example_1.0.0.jar"
        );
        assert_eq!(percent_encode_segment("a b&c"), "a%20b%26c");
        assert_eq!(percent_encode_segment("a/b"), "a%2Fb");
        assert_eq!(percent_decode(&percent_encode_segment("é +%")), "é +%");
    }
}
