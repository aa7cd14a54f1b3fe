//! Shared cache of remote directories known to exist
//!
//! One cache instance is scoped to one upload run and passed into the
//! orchestrator explicitly, never held in process-wide state. Entries are
//! never re-verified within a run.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Directories known to exist remotely, shared across all workers of a run
#[derive(Debug, Default)]
pub struct DirCache {
	created: Mutex<HashSet<String>>,
}

impl DirCache {
	pub fn new() -> Self {
		Self::default()
	}

	/// Mark `path` as existing. Returns `true` when this call inserted the
	/// entry, i.e. the caller won the race and is responsible for the remote
	/// create. Only the check-and-insert happens under the lock; the network
	/// call stays outside it.
	pub fn mark(&self, path: &str) -> bool {
		let mut created = self.created.lock().unwrap_or_else(PoisonError::into_inner);
		created.insert(path.to_string())
	}

	pub fn contains(&self, path: &str) -> bool {
		let created = self.created.lock().unwrap_or_else(PoisonError::into_inner);
		created.contains(path)
	}

	pub fn len(&self) -> usize {
		let created = self.created.lock().unwrap_or_else(PoisonError::into_inner);
		created.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}


// vim: ts=4
