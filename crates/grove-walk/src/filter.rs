//! Pattern filtering of walked paths.

use grove_path::Path;

use crate::error::{WalkError, WalkResult};

/// How a filter pattern is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatternMode {
    /// Shell-style glob; `*` stops at separators, `**` crosses them.
    Glob,
    /// Regular expression, matched against the rendered path.
    Regex,
}

/// A compiled path filter.
#[derive(Clone, Debug)]
pub struct PathFilter(Inner);

#[derive(Clone, Debug)]
enum Inner {
    Glob(globset::GlobMatcher),
    Regex(regex::Regex),
}

impl PathFilter {
    /// Compile `pattern` under `mode`.
    pub fn compile(pattern: &str, mode: PatternMode) -> WalkResult<Self> {
        match mode {
            PatternMode::Glob => {
                let glob = globset::Glob::new(pattern).map_err(|e| WalkError::InvalidPattern {
                    mode: "glob",
                    pattern: pattern.to_string(),
                    reason: e.to_string(),
                })?;
                Ok(Self(Inner::Glob(glob.compile_matcher())))
            }
            PatternMode::Regex => {
                let re = regex::Regex::new(pattern).map_err(|e| WalkError::InvalidPattern {
                    mode: "regex",
                    pattern: pattern.to_string(),
                    reason: e.to_string(),
                })?;
                Ok(Self(Inner::Regex(re)))
            }
        }
    }

    /// Test a path's full rendered form against the pattern.
    pub fn is_match(&self, path: &Path) -> bool {
        let rendered = path.to_string();
        match &self.0 {
            Inner::Glob(matcher) => matcher.is_match(&rendered),
            Inner::Regex(re) => re.is_match(&rendered),
        }
    }

    /// Lazily yield only matching paths.
    pub fn filter<'a, I>(&'a self, paths: I) -> impl Iterator<Item = Path> + 'a
    where
        I: IntoIterator<Item = Path>,
        I::IntoIter: 'a,
    {
        paths.into_iter().filter(|path| self.is_match(path))
    }
}
