//! HTTP Range request parsing module
//!
//! Single byte-range parsing for resumable artifact downloads (RFC 7233).

use std::ops::RangeInclusive;

/// Byte range resolved against a known file size, both ends inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    /// Number of bytes covered, the `Content-Length` of a 206
    pub const fn content_length(self) -> usize {
        self.end - self.start + 1
    }

    pub const fn as_range(self) -> RangeInclusive<usize> {
        self.start..=self.end
    }
}

/// Range header parse result
#[derive(Debug, PartialEq, Eq)]
pub enum RangeParseResult {
    /// Satisfiable range
    Valid(ByteRange),
    /// Well-formed but outside the file - respond 416
    NotSatisfiable,
    /// No Range header, other unit, multi-range or malformed - send the whole file
    None,
}

/// Parse a `Range` header against the size of the file being served
///
/// Supported forms: `bytes=start-end`, `bytes=start-` and `bytes=-suffix`.
///
/// # Examples
/// ```
/// use updatesite_index::http::range::{parse_range_header, ByteRange, RangeParseResult};
///
/// assert_eq!(
///     parse_range_header(Some("bytes=0-99"), 1000),
///     RangeParseResult::Valid(ByteRange { start: 0, end: 99 })
/// );
/// assert_eq!(parse_range_header(None, 1000), RangeParseResult::None);
/// ```
pub fn parse_range_header(range_header: Option<&str>, file_size: usize) -> RangeParseResult {
    let Some(spec) = range_header.and_then(|h| h.trim().strip_prefix("bytes=")) else {
        return RangeParseResult::None;
    };
    if spec.contains(',') {
        return RangeParseResult::None;
    }
    let Some((first, last)) = spec.split_once('-') else {
        return RangeParseResult::None;
    };
    let (first, last) = (first.trim(), last.trim());

    if first.is_empty() {
        suffix_range(last, file_size)
    } else {
        bounded_range(first, last, file_size)
    }
}

/// `-N`: the last N bytes
fn suffix_range(suffix: &str, file_size: usize) -> RangeParseResult {
    match suffix.parse::<usize>() {
        Err(_) => RangeParseResult::None,
        Ok(0) => RangeParseResult::NotSatisfiable,
        Ok(_) if file_size == 0 => RangeParseResult::NotSatisfiable,
        Ok(n) => RangeParseResult::Valid(ByteRange {
            start: file_size.saturating_sub(n),
            end: file_size - 1,
        }),
    }
}

/// `A-` or `A-B`, with B clamped to the last byte
fn bounded_range(first: &str, last: &str, file_size: usize) -> RangeParseResult {
    let Ok(start) = first.parse::<usize>() else {
        return RangeParseResult::None;
    };
    if start >= file_size {
        return RangeParseResult::NotSatisfiable;
    }

    let end = if last.is_empty() {
        file_size - 1
    } else {
        match last.parse::<usize>() {
            Ok(e) => e.min(file_size - 1),
            Err(_) => return RangeParseResult::None,
        }
    };

    if start > end {
        RangeParseResult::NotSatisfiable
    } else {
        RangeParseResult::Valid(ByteRange { start, end })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid(start: usize, end: usize) -> RangeParseResult {
        RangeParseResult::Valid(ByteRange { start, end })
    }

    #[test]
    fn test_no_range() {
        assert_eq!(parse_range_header(None, 100), RangeParseResult::None);
        assert_eq!(
            parse_range_header(Some("items=0-1"), 100),
            RangeParseResult::None
        );
    }

    #[test]
    fn test_bounded_and_open_ranges() {
        assert_eq!(parse_range_header(Some("bytes=0-9"), 100), valid(0, 9));
        assert_eq!(parse_range_header(Some("bytes=50-"), 100), valid(50, 99));
        assert_eq!(parse_range_header(Some("bytes=90-500"), 100), valid(90, 99));
        assert_eq!(ByteRange { start: 50, end: 99 }.content_length(), 50);
    }

    #[test]
    fn test_suffix_range() {
        assert_eq!(parse_range_header(Some("bytes=-20"), 100), valid(80, 99));
        assert_eq!(parse_range_header(Some("bytes=-500"), 100), valid(0, 99));
    }

    #[test]
    fn test_not_satisfiable() {
        for header in ["bytes=200-", "bytes=9-3", "bytes=-0"] {
            assert_eq!(
                parse_range_header(Some(header), 100),
                RangeParseResult::NotSatisfiable,
                "{header}"
            );
        }
        assert_eq!(
            parse_range_header(Some("bytes=-5"), 0),
            RangeParseResult::NotSatisfiable
        );
    }

    #[test]
    fn test_malformed_ignored() {
        for header in ["bytes=a-b", "bytes=0-9,20-29", "bytes=5"] {
            assert_eq!(
                parse_range_header(Some(header), 100),
                RangeParseResult::None,
                "{header}"
            );
        }
    }
}
