//! Ignore rules for filesystem scans.
//!
//! Layers a built-in rule set (VCS internals, dependency and build
//! directories, lockfiles, env files) under the project's own
//! `.gitignore`, with standard gitignore semantics: later rules win,
//! `!` negation re-includes, directory rules prune whole subtrees.

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::Path;

use crate::core::error::{Result, SemdexError};

/// Patterns applied before any project rules.
const BUILTIN_PATTERNS: &[&str] = &[
    ".git",
    ".svn",
    ".hg",
    "node_modules",
    "target",
    "dist",
    "build",
    "coverage",
    "*.log",
    "package-lock.json",
    "Cargo.lock",
    "yarn.lock",
    ".env*",
];

/// Compiled ignore rules rooted at a scan directory.
pub struct IgnoreFilter {
    matcher: Gitignore,
}

impl IgnoreFilter {
    /// Build the filter for `root`, reading `root/.gitignore` if it
    /// exists. Project rules are added after the built-ins so they can
    /// override them (including by negation).
    pub fn build(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let mut builder = GitignoreBuilder::new(root);

        for pattern in BUILTIN_PATTERNS {
            builder.add_line(None, pattern).map_err(|e| {
                SemdexError::Unexpected(format!("Invalid built-in ignore pattern: {e}"))
            })?;
        }

        let gitignore = root.join(".gitignore");
        if gitignore.is_file() {
            // add() returns a partial-parse error; bad lines are
            // skipped, the rest of the file still applies.
            if let Some(err) = builder.add(&gitignore) {
                tracing::warn!("Errors parsing {}: {}", gitignore.display(), err);
            }
        }

        let matcher = builder
            .build()
            .map_err(|e| SemdexError::Unexpected(format!("Failed to build ignore rules: {e}")))?;

        Ok(Self { matcher })
    }

    /// Whether `path` should be excluded from the scan.
    ///
    /// The `.gitignore` file itself is always excluded. Ancestor rules
    /// apply: a file inside an ignored directory is ignored even if no
    /// rule names the file.
    pub fn is_ignored(&self, path: impl AsRef<Path>, is_dir: bool) -> bool {
        let path = path.as_ref();

        if !is_dir && path.file_name().is_some_and(|n| n == ".gitignore") {
            return true;
        }

        self.matcher
            .matched_path_or_any_parents(path, is_dir)
            .is_ignore()
    }
}
