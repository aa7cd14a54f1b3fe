//! Compilation and evaluation of single exclusion rules
//!
//! Gitignore-inspired subset, additive only (no negation):
//! - a bare name matches a path segment of that name at any depth
//! - a leading `/` anchors the pattern to the root of the base path
//! - a pattern containing `/` matches at the literal depth it spells out
//! - `**` matches zero or more path segments
//! - a trailing `/` restricts the rule to directories
//! - `*` and `?` are single-segment globs and never cross `/`

use std::path::PathBuf;

use globset::{GlobBuilder, GlobMatcher};

use crate::error::ExclusionError;

/// Where a rule came from, kept for the ignored-files listing tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOrigin {
	/// A configuration layer (`global_excludes` or a binding's `excludes`)
	Config(PathBuf),
	/// A `.gsupload_ignore` file
	IgnoreFile(PathBuf),
}

#[derive(Debug)]
enum RuleMatcher {
	/// Bare name: tested against every path segment independently
	Segment(GlobMatcher),
	/// Contains `/`: tested against the whole base-relative path
	Path(GlobMatcher),
}

/// One compiled exclusion rule
#[derive(Debug)]
pub struct CompiledRule {
	/// Original pattern text as written
	pub pattern: String,
	pub origin: RuleOrigin,
	/// Trailing `/` in the source pattern: matches directories only
	pub dir_only: bool,
	/// Leading `/` or embedded `/`: evaluated against the base root
	pub anchored: bool,
	matcher: RuleMatcher,
}

impl CompiledRule {
	pub fn compile(pattern: &str, origin: RuleOrigin) -> Result<Self, ExclusionError> {
		let text = pattern.trim();
		let (text, dir_only) = match text.strip_suffix('/') {
			Some(stripped) => (stripped, true),
			None => (text, false),
		};

		let (glob_text, anchored) = if text.contains('/') {
			(text.strip_prefix('/').unwrap_or(text), true)
		} else {
			(text, false)
		};

		let glob = GlobBuilder::new(glob_text)
			.literal_separator(true)
			.build()
			.map_err(|e| ExclusionError::InvalidPattern {
				pattern: pattern.to_string(),
				message: e.to_string(),
			})?
			.compile_matcher();

		let matcher =
			if anchored { RuleMatcher::Path(glob) } else { RuleMatcher::Segment(glob) };

		Ok(CompiledRule { pattern: pattern.to_string(), origin, dir_only, anchored, matcher })
	}

	/// Whether this rule excludes the path split into `segments`, where the
	/// final segment is a directory iff `is_dir`.
	///
	/// A rule that matches an ancestor directory of the path excludes the
	/// path too; that is what lets traversal prune whole subtrees and makes
	/// `/dist` exclude `dist/index.html`.
	pub fn matches(&self, segments: &[&str], is_dir: bool) -> bool {
		match &self.matcher {
			RuleMatcher::Segment(glob) => {
				for (i, segment) in segments.iter().enumerate() {
					// every non-final segment is an ancestor directory
					let segment_is_dir = i + 1 < segments.len() || is_dir;
					if (!self.dir_only || segment_is_dir) && glob.is_match(segment) {
						return true;
					}
				}
				false
			}
			RuleMatcher::Path(glob) => {
				let mut prefix = String::new();
				for (i, segment) in segments.iter().enumerate() {
					if i > 0 {
						prefix.push('/');
					}
					prefix.push_str(segment);
					let prefix_is_dir = i + 1 < segments.len() || is_dir;
					if (!self.dir_only || prefix_is_dir) && glob.is_match(&prefix) {
						return true;
					}
				}
				false
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn rule(pattern: &str) -> CompiledRule {
		CompiledRule::compile(pattern, RuleOrigin::Config(PathBuf::from("/t/.gsupload.json")))
			.unwrap()
	}

	fn matches(pattern: &str, path: &str, is_dir: bool) -> bool {
		let segments: Vec<&str> = path.split('/').collect();
		rule(pattern).matches(&segments, is_dir)
	}

	#[test]
	fn test_bare_name_matches_any_depth() {
		assert!(matches("*.tmp", "app.tmp", false));
		assert!(matches("*.tmp", "src/assets/app.tmp", false));
		assert!(matches("node_modules", "a/node_modules/b.js", false));
		assert!(!matches("*.tmp", "src/app.css", false));
	}

	#[test]
	fn test_leading_slash_anchors_to_root() {
		assert!(matches("/app.tmp", "app.tmp", false));
		assert!(!matches("/app.tmp", "src/assets/app.tmp", false));
		assert!(matches("/dist", "dist/index.html", false));
		assert!(!matches("/dist", "nested/dist/index.html", false));
	}

	#[test]
	fn test_embedded_slash_matches_literal_depth() {
		assert!(matches("src/*.tmp", "src/a.tmp", false));
		assert!(!matches("src/*.tmp", "src/deep/a.tmp", false));
		assert!(!matches("src/*.tmp", "other/src/a.tmp", false));
	}

	#[test]
	fn test_double_star_crosses_segments() {
		assert!(matches("src/**/*.tmp", "src/a.tmp", false));
		assert!(matches("src/**/*.tmp", "src/x/y/a.tmp", false));
		assert!(!matches("src/**/*.tmp", "lib/a.tmp", false));
	}

	#[test]
	fn test_trailing_slash_is_directory_only() {
		assert!(matches("build/", "build", true));
		assert!(!matches("build/", "build", false));
		// a file below a matching directory is still excluded
		assert!(matches("build/", "build/out.js", false));
	}

	#[test]
	fn test_question_mark_stays_within_segment() {
		assert!(matches("?.css", "a.css", false));
		assert!(!matches("?.css", "ab.css", false));
	}
}

// vim: ts=4
