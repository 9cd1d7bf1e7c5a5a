//! Pattern parsing and path-classification predicates.

use std::path::{Component, Path, PathBuf};

use crate::config::CleanupConfig;

/// A parsed classification pattern.
///
/// The config format is glob-like strings; parsing collapses them into a
/// closed set of kinds so matching stays exhaustive rather than relying on
/// string-prefix heuristics at match time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternKind {
    /// `*.tmp` - matches a file name ending in the suffix.
    Suffix(String),
    /// `.DS_Store` or `docs/index.md` - matches a name or relative path exactly.
    Exact(String),
    /// `__pycache__/` - matches a directory name or prefix; never matches a file.
    DirPrefix(String),
}

impl PatternKind {
    pub fn parse(raw: &str) -> PatternKind {
        if let Some(stem) = raw.strip_suffix('/') {
            PatternKind::DirPrefix(stem.to_string())
        } else if let Some(suffix) = raw.strip_prefix('*') {
            PatternKind::Suffix(suffix.to_string())
        } else {
            PatternKind::Exact(raw.to_string())
        }
    }

    fn parse_all(raw: &[String]) -> Vec<PatternKind> {
        raw.iter().map(|p| PatternKind::parse(p)).collect()
    }
}

/// Classification predicates over one project root.
///
/// All methods are pure with respect to the filesystem; they look only at
/// path strings, never at disk state.
pub struct PatternMatcher {
    root: PathBuf,
    temp: Vec<PatternKind>,
    cache_dirs: Vec<PatternKind>,
    test_dirs: Vec<PatternKind>,
    build_suffixes: Vec<String>,
    log_suffixes: Vec<String>,
    essential: Vec<PatternKind>,
}

impl PatternMatcher {
    pub fn new(root: &Path, config: &CleanupConfig) -> Self {
        PatternMatcher {
            root: root.to_path_buf(),
            temp: PatternKind::parse_all(&config.temp_file_patterns),
            cache_dirs: PatternKind::parse_all(&config.cache_dir_patterns),
            test_dirs: PatternKind::parse_all(&config.test_artifact_dirs),
            build_suffixes: config.build_artifact_suffixes.clone(),
            log_suffixes: config.log_file_suffixes.clone(),
            essential: PatternKind::parse_all(&config.preserve_essential_files),
        }
    }

    /// Whether the allow-list protects this path from deletion.
    ///
    /// True when the path, made relative to the project root, exactly equals
    /// an allow-list entry, starts with an allow-listed directory prefix, or
    /// contains an allow-listed name as a path segment. A path outside the
    /// project root cannot be made relative and is always protected.
    pub fn is_essential(&self, path: &Path) -> bool {
        let rel = match path.strip_prefix(&self.root) {
            Ok(rel) => rel,
            Err(_) => return true,
        };

        for entry in &self.essential {
            match entry {
                PatternKind::Exact(name) => {
                    if rel == Path::new(name.as_str()) {
                        return true;
                    }
                    // A bare name also protects any path containing it as a segment
                    if !name.contains('/') && contains_segment(rel, name) {
                        return true;
                    }
                }
                PatternKind::DirPrefix(stem) => {
                    if rel.starts_with(stem) {
                        return true;
                    }
                }
                // Suffix entries make no sense in an allow-list; ignore them
                PatternKind::Suffix(_) => {}
            }
        }

        false
    }

    /// Whether a file matches a temp-file pattern.
    /// Directory patterns in the temp list never match files.
    pub fn matches_temp(&self, path: &Path) -> bool {
        let name = path
            .file_name()
            .map(|f| f.to_string_lossy())
            .unwrap_or_default();

        self.temp.iter().any(|pattern| match pattern {
            PatternKind::Suffix(suffix) => name.ends_with(suffix.as_str()),
            PatternKind::Exact(exact) => name == exact.as_str(),
            PatternKind::DirPrefix(_) => false,
        })
    }

    /// Whether a directory name matches a cache-directory pattern.
    pub fn matches_cache_dir(&self, name: &str) -> bool {
        matches_dir_name(&self.cache_dirs, name)
    }

    /// Whether a directory name matches a test-tool artifact pattern.
    pub fn matches_test_artifact_dir(&self, name: &str) -> bool {
        matches_dir_name(&self.test_dirs, name)
    }

    /// Whether a file name carries a build-artifact suffix.
    pub fn is_build_artifact(&self, path: &Path) -> bool {
        matches_suffix(path, &self.build_suffixes)
    }

    /// Whether a file name carries a log-file suffix.
    pub fn is_log_file(&self, path: &Path) -> bool {
        matches_suffix(path, &self.log_suffixes)
    }
}

fn matches_dir_name(patterns: &[PatternKind], name: &str) -> bool {
    patterns.iter().any(|pattern| match pattern {
        PatternKind::DirPrefix(stem) => name == stem.as_str(),
        PatternKind::Exact(exact) => name == exact.as_str(),
        PatternKind::Suffix(suffix) => name.ends_with(suffix.as_str()),
    })
}

fn matches_suffix(path: &Path, suffixes: &[String]) -> bool {
    let name = path
        .file_name()
        .map(|f| f.to_string_lossy())
        .unwrap_or_default();
    suffixes.iter().any(|suffix| name.ends_with(suffix.as_str()))
}

fn contains_segment(path: &Path, name: &str) -> bool {
    path.components().any(|c| {
        if let Component::Normal(os_str) = c {
            os_str.to_string_lossy() == name
        } else {
            false
        }
    })
}
