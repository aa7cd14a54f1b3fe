//! Local-vs-remote diff engine
//!
//! Pure classification of a filtered local file set against a remote
//! listing, driving the pre-flight safety check. Directories and files are
//! compared by existence only; ordering for display is the caller's concern.

use std::collections::HashMap;

use crate::types::FileEntry;

/// Relationship of one path between the local and remote trees
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffClass {
	/// Present locally, absent remotely: upload creates it
	New,
	/// Present on both sides: upload overwrites it
	Overwrite,
	/// Present only remotely: untouched by the upload
	RemoteOnly,
}

/// Unordered classification of every path, plus per-category totals.
///
/// The counts always cover all three categories, even in changes-only mode
/// where `RemoteOnly` entries are omitted from `entries`.
#[derive(Debug, Default)]
pub struct DiffResult {
	pub entries: HashMap<String, DiffClass>,
	pub new_count: usize,
	pub overwrite_count: usize,
	pub remote_only_count: usize,
}

impl DiffResult {
	/// Paths in the given class, unsorted
	pub fn paths_in(&self, class: DiffClass) -> Vec<&str> {
		self.entries
			.iter()
			.filter(|(_, c)| **c == class)
			.map(|(p, _)| p.as_str())
			.collect()
	}
}

/// Classify `local` against `remote`. With `changes_only`, `RemoteOnly`
/// entries are left out of the result while all counts stay accurate.
pub fn diff(local: &[FileEntry], remote: &[FileEntry], changes_only: bool) -> DiffResult {
	let mut result = DiffResult::default();

	let remote_map: HashMap<&str, &FileEntry> =
		remote.iter().map(|e| (e.path.as_str(), e)).collect();
	let local_map: HashMap<&str, &FileEntry> =
		local.iter().map(|e| (e.path.as_str(), e)).collect();

	for entry in local {
		let class = if remote_map.contains_key(entry.path.as_str()) {
			result.overwrite_count += 1;
			DiffClass::Overwrite
		} else {
			result.new_count += 1;
			DiffClass::New
		};
		result.entries.insert(entry.path.clone(), class);
	}

	for entry in remote {
		if !local_map.contains_key(entry.path.as_str()) {
			result.remote_only_count += 1;
			if !changes_only {
				result.entries.insert(entry.path.clone(), DiffClass::RemoteOnly);
			}
		}
	}

	result
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_basic_classification() {
		let local = vec![FileEntry::file("a.css"), FileEntry::file("b.css")];
		let remote = vec![FileEntry::file("a.css"), FileEntry::file("c.css")];

		let result = diff(&local, &remote, false);
		assert_eq!(result.entries["a.css"], DiffClass::Overwrite);
		assert_eq!(result.entries["b.css"], DiffClass::New);
		assert_eq!(result.entries["c.css"], DiffClass::RemoteOnly);
		assert_eq!(result.new_count, 1);
		assert_eq!(result.overwrite_count, 1);
		assert_eq!(result.remote_only_count, 1);
	}

	#[test]
	fn test_changes_only_omits_entries_but_keeps_counts() {
		let local = vec![FileEntry::file("a.css")];
		let remote = vec![FileEntry::file("a.css"), FileEntry::file("c.css")];

		let result = diff(&local, &remote, true);
		assert!(!result.entries.contains_key("c.css"));
		assert_eq!(result.remote_only_count, 1);
		assert_eq!(result.overwrite_count, 1);
	}

	#[test]
	fn test_directories_compared_by_existence() {
		let local = vec![FileEntry::dir("assets"), FileEntry::file("assets/a.css")];
		let remote = vec![FileEntry::dir("assets")];

		let result = diff(&local, &remote, false);
		assert_eq!(result.entries["assets"], DiffClass::Overwrite);
		assert_eq!(result.entries["assets/a.css"], DiffClass::New);
	}

	#[test]
	fn test_empty_sides() {
		let result = diff(&[], &[], false);
		assert!(result.entries.is_empty());
		assert_eq!(result.new_count + result.overwrite_count + result.remote_only_count, 0);
	}
}

// vim: ts=4
