//! # Path Resolution
//!
//! Lexical normalization of caller-supplied paths against a driver root.
//!
//! ## Responsibility
//! - Canonicalize any string into a root-anchored, traversal-safe path
//! - Join canonical paths onto a driver root and take them back off
//!
//! Every path handed to a driver goes through [`safepath`] first, so two
//! spellings of the same location (`a//b/./c`, `/a/b/c/`) always produce the
//! same string. The FTPS driver relies on that equality when it mirrors remote
//! paths into its cache directory.
//!
//! ## Usage
//!
//! ```rust
//! use anyfs_drivers::{safepath, PathResolver};
//!
//! assert_eq!(safepath("../../etc//passwd"), "/etc/passwd");
//!
//! let resolver = PathResolver::new("/srv/data");
//! assert_eq!(resolver.abspath("reports/q1.csv"), "/srv/data/reports/q1.csv");
//! assert_eq!(resolver.relpath("/srv/data/reports"), "/reports");
//! assert_eq!(resolver.relpath("/etc"), "/");
//! ```

/// The single path separator used by every driver.
pub const SEPARATOR: char = '/';

/// The canonical root path.
pub const ROOT: &str = "/";

/// Normalizes `path` into a canonical root-relative form.
///
/// Leading separators are stripped and the result is re-anchored at `/`.
/// Empty and `.` segments are dropped; `..` removes the previous segment and
/// is ignored at the root, so the result never points above it.
///
/// The function is idempotent: `safepath(&safepath(p)) == safepath(p)`.
pub fn safepath(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split(SEPARATOR) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            name => segments.push(name),
        }
    }
    let mut out = String::with_capacity(path.len() + 1);
    for segment in &segments {
        out.push(SEPARATOR);
        out.push_str(segment);
    }
    if out.is_empty() {
        out.push(SEPARATOR);
    }
    out
}

/// Returns the canonical parent of `path`. The root is its own parent.
pub fn parent(path: &str) -> String {
    let path = safepath(path);
    match path.rfind(SEPARATOR) {
        Some(0) | None => ROOT.to_string(),
        Some(idx) => path[..idx].to_string(),
    }
}

/// Returns the final segment of `path`, or an empty string for the root.
pub fn basename(path: &str) -> &str {
    path.trim_end_matches(SEPARATOR)
        .rsplit(SEPARATOR)
        .next()
        .unwrap_or("")
}

/// Joins `child` under `dir` and normalizes the result.
pub fn join(dir: &str, child: &str) -> String {
    safepath(&format!("{dir}{SEPARATOR}{child}"))
}

/// Returns `true` if `path` is `base` or lies below it. Both must be canonical.
pub fn is_within(path: &str, base: &str) -> bool {
    base == ROOT
        || path == base
        || (path.starts_with(base) && path[base.len()..].starts_with(SEPARATOR))
}

/// Resolves canonical paths against a fixed driver root.
///
/// The root is normalized once at construction and never changes afterward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    root: String,
}

impl PathResolver {
    /// Creates a resolver for `root`.
    pub fn new(root: &str) -> Self {
        Self {
            root: safepath(root),
        }
    }

    /// The normalized root.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Canonical form of `path` relative to this root. See [`safepath`].
    pub fn safepath(&self, path: &str) -> String {
        safepath(path)
    }

    /// Joins the root with the safe form of `path`.
    pub fn abspath(&self, path: &str) -> String {
        let safe = safepath(path);
        if self.root == ROOT {
            safe
        } else if safe == ROOT {
            self.root.clone()
        } else {
            format!("{}{}", self.root, safe)
        }
    }

    /// Expresses an absolute `path` relative to the root.
    ///
    /// Paths outside the root cannot be expressed relative to it and resolve
    /// to `/` instead of failing.
    pub fn relpath(&self, path: &str) -> String {
        let abs = safepath(path);
        if !is_within(&abs, &self.root) {
            return ROOT.to_string();
        }
        if self.root == ROOT {
            return abs;
        }
        safepath(&abs[self.root.len()..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safepath_empty_is_root() {
        assert_eq!(safepath(""), "/");
        assert_eq!(safepath("/"), "/");
        assert_eq!(safepath("."), "/");
        assert_eq!(safepath("///"), "/");
    }

    #[test]
    fn safepath_collapses_redundant_segments() {
        assert_eq!(safepath("a//b/./c/"), "/a/b/c");
        assert_eq!(safepath("/a/b/c"), "/a/b/c");
        assert_eq!(safepath("//a/b/c"), "/a/b/c");
    }

    #[test]
    fn safepath_never_escapes_root() {
        assert_eq!(safepath(".."), "/");
        assert_eq!(safepath("../../etc/passwd"), "/etc/passwd");
        assert_eq!(safepath("/a/../../b"), "/b");
        assert_eq!(safepath("a/b/../../../.."), "/");
    }

    #[test]
    fn safepath_is_idempotent() {
        let inputs = [
            "",
            "..",
            "a/./b//c/..",
            "/x/../../y/z/",
            "./../.hidden/..name",
            "trailing/",
        ];
        for input in inputs {
            let once = safepath(input);
            assert_eq!(safepath(&once), once, "input {input:?}");
            assert!(once.starts_with('/'));
            assert!(!once.split('/').any(|segment| segment == ".."));
        }
    }

    #[test]
    fn safepath_keeps_dot_prefixed_names() {
        assert_eq!(safepath("/.config/..rc"), "/.config/..rc");
    }

    #[test]
    fn parent_and_basename() {
        assert_eq!(parent("/a/b/c.txt"), "/a/b");
        assert_eq!(parent("/a"), "/");
        assert_eq!(parent("/"), "/");
        assert_eq!(basename("/a/b/c.txt"), "c.txt");
        assert_eq!(basename("/a/b/"), "b");
        assert_eq!(basename("/"), "");
    }

    #[test]
    fn join_normalizes() {
        assert_eq!(join("/a", "b"), "/a/b");
        assert_eq!(join("/a", "/b"), "/a/b");
        assert_eq!(join("/a/b", "../c"), "/a/c");
    }

    #[test]
    fn is_within_respects_segment_boundaries() {
        assert!(is_within("/srv/data/x", "/srv/data"));
        assert!(is_within("/srv/data", "/srv/data"));
        assert!(!is_within("/srv/database", "/srv/data"));
        assert!(is_within("/anything", "/"));
    }

    #[test]
    fn abspath_joins_root() {
        let resolver = PathResolver::new("/srv/data/");
        assert_eq!(resolver.root(), "/srv/data");
        assert_eq!(resolver.abspath("a/b"), "/srv/data/a/b");
        assert_eq!(resolver.abspath(""), "/srv/data");
        assert_eq!(resolver.abspath("../../../etc"), "/srv/data/etc");

        let at_root = PathResolver::new("/");
        assert_eq!(at_root.abspath("a"), "/a");
    }

    #[test]
    fn relpath_inverts_abspath() {
        let resolver = PathResolver::new("/srv/data");
        for path in ["/", "/a", "/a/b/c.txt"] {
            assert_eq!(resolver.relpath(&resolver.abspath(path)), path);
        }
    }

    #[test]
    fn relpath_outside_root_falls_back_to_root() {
        let resolver = PathResolver::new("/srv/data");
        assert_eq!(resolver.relpath("/etc/passwd"), "/");
        assert_eq!(resolver.relpath("/srv/database/x"), "/");
        assert_eq!(resolver.relpath("/srv/data/../other"), "/");
    }
}
