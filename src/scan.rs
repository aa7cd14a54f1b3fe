//! Local file selection
//!
//! Walks the binding's local base path with exclusion pruning, and expands
//! user-supplied name/glob patterns into concrete files. The local
//! filesystem is only ever read, never mutated.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::exclusion::ExclusionRuleSet;
use crate::logging::*;
use crate::types::{FileEntry, FileKind};

/// Base-relative path with forward slashes, `None` when `path` is not under
/// `base`.
pub fn relative_slash_path(path: &Path, base: &Path) -> Option<String> {
	let rel = path.strip_prefix(base).ok()?;
	let mut out = String::new();
	for component in rel.components() {
		if !out.is_empty() {
			out.push('/');
		}
		out.push_str(&component.as_os_str().to_string_lossy());
	}
	Some(out)
}

/// Walk `base` recursively, pruning excluded directories.
///
/// Children of an excluded directory are never tested individually: the
/// walker skips the whole subtree. Returns files and directories as
/// base-relative entries.
pub fn scan_local(base: &Path, rules: &ExclusionRuleSet) -> Result<Vec<FileEntry>, io::Error> {
	scan_subtree(base, base, rules)
}

/// Walk `root`, which must lie within `base`. Relative paths and exclusion
/// checks stay relative to `base`, so anchored rules keep their meaning when
/// only a subtree is scanned.
pub fn scan_subtree(
	root: &Path,
	base: &Path,
	rules: &ExclusionRuleSet,
) -> Result<Vec<FileEntry>, io::Error> {
	let mut entries = Vec::new();
	let walker = WalkDir::new(root).min_depth(1).into_iter().filter_entry(|entry| {
		match relative_slash_path(entry.path(), base) {
			Some(rel) => !rules.is_excluded(&rel, entry.file_type().is_dir()),
			None => true,
		}
	});

	for entry in walker {
		let entry = entry.map_err(io::Error::from)?;
		if let Some(rel) = relative_slash_path(entry.path(), base) {
			let kind =
				if entry.file_type().is_dir() { FileKind::Directory } else { FileKind::File };
			entries.push(FileEntry { path: rel, kind });
		}
	}
	Ok(entries)
}

/// Expand name/glob patterns into deduplicated absolute file paths.
///
/// Patterns are interpreted relative to `from_dir`. With `recursive`, a
/// pattern without a path separator is first searched through the whole
/// subtree (`**/pattern`). Matched directories expand to their non-excluded
/// files. Files outside `local_basepath` or matching an exclusion rule are
/// dropped; a pattern matching nothing logs a warning and is skipped.
pub fn expand_patterns(
	patterns: &[String],
	rules: &ExclusionRuleSet,
	local_basepath: &Path,
	from_dir: &Path,
	recursive: bool,
) -> Vec<PathBuf> {
	let mut files = Vec::new();
	let mut seen: HashSet<PathBuf> = HashSet::new();

	for pattern in patterns {
		let mut matched: Vec<PathBuf> = Vec::new();

		if recursive && !pattern.contains('/') {
			let deep = from_dir.join("**").join(pattern);
			if let Ok(paths) = glob::glob(&deep.to_string_lossy()) {
				matched.extend(paths.flatten().filter(|p| p.is_file()));
			}
		}

		if matched.is_empty() {
			if let Ok(paths) = glob::glob(&from_dir.join(pattern).to_string_lossy()) {
				matched.extend(paths.flatten());
			}
		}

		if matched.is_empty() {
			let literal = from_dir.join(pattern);
			if literal.exists() {
				matched.push(literal);
			} else {
				warn!(pattern = %pattern, "no files found for pattern");
				continue;
			}
		}

		for path in matched {
			if !seen.insert(path.clone()) {
				continue;
			}
			let rel = match relative_slash_path(&path, local_basepath) {
				Some(rel) => rel,
				// outside the local base path
				None => continue,
			};
			if path.is_dir() {
				if rules.is_excluded(&rel, true) {
					continue;
				}
				if let Ok(entries) = scan_subtree(&path, local_basepath, rules) {
					for entry in entries {
						if entry.kind != FileKind::File {
							continue;
						}
						let abs = local_basepath
							.join(entry.path.replace('/', std::path::MAIN_SEPARATOR_STR));
						if seen.insert(abs.clone()) {
							files.push(abs);
						}
					}
				}
			} else {
				if rules.is_excluded(&rel, false) {
					continue;
				}
				files.push(path);
			}
		}
	}

	files
}


// vim: ts=4
