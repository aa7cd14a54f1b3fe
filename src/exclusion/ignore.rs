//! `.gsupload_ignore` discovery and loading
//!
//! Ignore files are collected walking from the working directory up to and
//! including the binding's local base path, one file per directory. Their
//! patterns are additive. Patterns containing `/` are re-anchored to the
//! directory the ignore file lives in, so `src/.gsupload_ignore` with
//! `/cache` excludes `src/cache` and nothing else; bare names keep applying
//! at any depth.

use std::fs;
use std::path::{Path, PathBuf};

use crate::logging::*;

/// File name of a per-directory ignore file
pub const IGNORE_FILE_NAME: &str = ".gsupload_ignore";

/// Collect ignore patterns from `cwd` up to and including `local_basepath`.
///
/// Returns `(pattern, ignore file path)` pairs, already re-anchored.
/// Directories outside the base path's ancestry are never visited; a `cwd`
/// outside the base path yields nothing.
pub fn collect_ignore_files(cwd: &Path, local_basepath: &Path) -> Vec<(String, PathBuf)> {
	let mut patterns = Vec::new();
	if !cwd.starts_with(local_basepath) {
		return patterns;
	}

	let mut current = cwd.to_path_buf();
	loop {
		let ignore_file = current.join(IGNORE_FILE_NAME);
		if ignore_file.is_file() {
			// safe: current is within local_basepath by the check above
			let rel_dir = current.strip_prefix(local_basepath).unwrap_or(Path::new(""));
			let loaded = load_ignore_file(&ignore_file);
			debug!(path = %ignore_file.display(), count = loaded.len(), "loaded ignore file");
			for pattern in loaded {
				patterns.push((anchor_pattern(&pattern, rel_dir), ignore_file.clone()));
			}
		}

		if current == local_basepath {
			break;
		}
		match current.parent() {
			Some(parent) => current = parent.to_path_buf(),
			None => break,
		}
	}

	patterns
}

/// Read one ignore file: one pattern per line, blank lines and `#` comments
/// skipped. Unreadable files contribute nothing.
pub fn load_ignore_file(path: &Path) -> Vec<String> {
	match fs::read_to_string(path) {
		Ok(text) => text
			.lines()
			.map(str::trim)
			.filter(|line| !line.is_empty() && !line.starts_with('#'))
			.map(str::to_string)
			.collect(),
		Err(e) => {
			warn!(path = %path.display(), error = %e, "failed to read ignore file");
			Vec::new()
		}
	}
}

/// Re-anchor a path-shaped pattern to the directory its ignore file lives
/// in, expressed relative to the local base path. Bare names pass through.
fn anchor_pattern(pattern: &str, rel_dir: &Path) -> String {
	if !pattern.trim_end_matches('/').contains('/') {
		return pattern.to_string();
	}

	let clean = pattern.strip_prefix('/').unwrap_or(pattern);
	let mut rel = String::new();
	for component in rel_dir.components() {
		if !rel.is_empty() {
			rel.push('/');
		}
		rel.push_str(&component.as_os_str().to_string_lossy());
	}

	if rel.is_empty() {
		format!("/{}", clean)
	} else {
		format!("/{}/{}", rel, clean)
	}
}


// vim: ts=4
