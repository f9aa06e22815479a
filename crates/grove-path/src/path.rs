//! Absolute, `/`-separated paths into a hierarchical store.
//!
//! A [`Path`] is an ordered sequence of non-empty segments. The root is the
//! empty sequence and renders as `"/"`. Parsing collapses repeated
//! separators and rejects `.` and `..` segments, so every parsed path is
//! already in normal form: parsing the rendered form of a path yields the
//! same path back (normalization is idempotent).

use serde::{Deserialize, Serialize};

use crate::error::{PathError, PathResult};

/// The path separator used in rendered form.
pub const SEPARATOR: char = '/';

/// An absolute path into a hierarchical store.
///
/// Ordering is segment-wise lexicographic, which is the order used for all
/// reproducible reporting (diff output, copy processing order).
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    /// The root path (empty segment sequence).
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a raw string into a normalized absolute path.
    ///
    /// Empty segments (from repeated or trailing separators) are dropped.
    /// A leading separator is optional: `"a/b"` and `"/a/b"` parse to the
    /// same path. Segments equal to `.` or `..` are malformed input.
    ///
    /// # Examples
    ///
    /// ```
    /// use grove_path::Path;
    ///
    /// let p = Path::parse("//a///b/").unwrap();
    /// assert_eq!(p.to_string(), "/a/b");
    /// assert!(Path::parse("/a/../b").is_err());
    /// ```
    pub fn parse(raw: &str) -> PathResult<Self> {
        let mut segments = Vec::new();
        for segment in raw.split(SEPARATOR) {
            if segment.is_empty() {
                continue;
            }
            if segment == "." || segment == ".." {
                return Err(PathError::InvalidPath {
                    raw: raw.to_string(),
                    reason: format!("segment {segment:?} is not allowed"),
                });
            }
            segments.push(segment.to_string());
        }
        Ok(Self { segments })
    }

    /// Resolve `relative` against this path.
    ///
    /// A `relative` beginning with the separator is absolute and replaces
    /// this path entirely; otherwise its segments are appended.
    pub fn join(&self, relative: &str) -> PathResult<Self> {
        let tail = Self::parse(relative)?;
        if relative.starts_with(SEPARATOR) {
            return Ok(tail);
        }
        let mut segments = self.segments.clone();
        segments.extend(tail.segments);
        Ok(Self { segments })
    }

    /// Append a single already-validated segment.
    pub fn child(&self, name: &str) -> PathResult<Self> {
        if name.is_empty() || name.contains(SEPARATOR) || name == "." || name == ".." {
            return Err(PathError::InvalidPath {
                raw: name.to_string(),
                reason: "not a valid child name".into(),
            });
        }
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Ok(Self { segments })
    }

    /// The path segments, shallowest first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments; the root has depth 0.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` for the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The final segment, or `None` for the root.
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// The containing path, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// All proper prefixes between the root and this path, shallowest first.
    ///
    /// For `/a/b/c` this returns `[/a, /a/b]` — exactly the groups that must
    /// exist before `/a/b/c` itself can be created.
    pub fn ancestors(&self) -> Vec<Self> {
        (1..self.segments.len())
            .map(|n| Self {
                segments: self.segments[..n].to_vec(),
            })
            .collect()
    }

    /// Returns `true` if `prefix` is this path or one of its ancestors.
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.segments.len() >= prefix.segments.len()
            && self.segments[..prefix.segments.len()] == prefix.segments[..]
    }

    /// Truncate to at most `depth` segments.
    pub fn truncate(&self, depth: usize) -> Self {
        Self {
            segments: self.segments[..depth.min(self.segments.len())].to_vec(),
        }
    }
}

impl std::fmt::Display for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "{SEPARATOR}");
        }
        for segment in &self.segments {
            write!(f, "{SEPARATOR}{segment}")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> PathResult<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn p(raw: &str) -> Path {
        Path::parse(raw).unwrap()
    }

    #[test]
    fn parse_simple() {
        assert_eq!(p("/a/b").segments(), ["a", "b"]);
        assert_eq!(p("a/b"), p("/a/b"));
    }

    #[test]
    fn parse_collapses_separators() {
        assert_eq!(p("//a///b/"), p("/a/b"));
        assert_eq!(p("/").depth(), 0);
        assert_eq!(p(""), Path::root());
    }

    #[test]
    fn parse_rejects_dot_segments() {
        assert!(Path::parse("/a/./b").is_err());
        assert!(Path::parse("/a/../b").is_err());
        assert!(Path::parse("..").is_err());
    }

    #[test]
    fn render_root() {
        assert_eq!(Path::root().to_string(), "/");
    }

    #[test]
    fn render_leading_no_trailing() {
        assert_eq!(p("a/b/").to_string(), "/a/b");
    }

    #[test]
    fn join_relative_appends() {
        assert_eq!(p("/a").join("b/c").unwrap(), p("/a/b/c"));
    }

    #[test]
    fn join_absolute_replaces() {
        assert_eq!(p("/a").join("/x/y").unwrap(), p("/x/y"));
    }

    #[test]
    fn join_rejects_dot_segments() {
        assert!(p("/a").join("../b").is_err());
    }

    #[test]
    fn child_valid_and_invalid() {
        assert_eq!(p("/a").child("b").unwrap(), p("/a/b"));
        assert!(p("/a").child("b/c").is_err());
        assert!(p("/a").child("").is_err());
        assert!(p("/a").child("..").is_err());
    }

    #[test]
    fn parent_and_name() {
        assert_eq!(p("/a/b").parent(), Some(p("/a")));
        assert_eq!(p("/a").parent(), Some(Path::root()));
        assert_eq!(Path::root().parent(), None);
        assert_eq!(p("/a/b").name(), Some("b"));
        assert_eq!(Path::root().name(), None);
    }

    #[test]
    fn ancestors_shallowest_first() {
        assert_eq!(p("/a/b/c").ancestors(), vec![p("/a"), p("/a/b")]);
        assert!(p("/a").ancestors().is_empty());
        assert!(Path::root().ancestors().is_empty());
    }

    #[test]
    fn starts_with_prefixes() {
        assert!(p("/a/b/c").starts_with(&p("/a/b")));
        assert!(p("/a/b").starts_with(&p("/a/b")));
        assert!(p("/a/b").starts_with(&Path::root()));
        assert!(!p("/a/b").starts_with(&p("/a/b/c")));
        assert!(!p("/ab").starts_with(&p("/a")));
    }

    #[test]
    fn truncate_caps_depth() {
        assert_eq!(p("/a/b/c").truncate(2), p("/a/b"));
        assert_eq!(p("/a").truncate(5), p("/a"));
        assert_eq!(p("/a/b").truncate(0), Path::root());
    }

    #[test]
    fn ordering_is_segment_wise() {
        let mut v = vec![p("/b"), p("/a/c"), p("/a"), p("/a/b")];
        v.sort();
        assert_eq!(v, vec![p("/a"), p("/a/b"), p("/a/c"), p("/b")]);
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(raw in "[a-z/]{0,24}") {
            if let Ok(once) = Path::parse(&raw) {
                let twice = Path::parse(&once.to_string()).unwrap();
                prop_assert_eq!(once, twice);
            }
        }

        #[test]
        fn parsed_paths_round_trip(segs in proptest::collection::vec("[a-z0-9_]{1,8}", 0..6)) {
            let raw = format!("/{}", segs.join("/"));
            let path = Path::parse(&raw).unwrap();
            prop_assert_eq!(path.segments(), &segs[..]);
        }
    }
}
