//! Transfer orchestrator
//!
//! Executes uploads on a fixed pool of OS threads. Every worker owns its own
//! protocol connection (the transport clients are not safe for concurrent
//! use on one connection), established once with escalating timeouts and
//! reused for all of that worker's tasks. The run never aborts on individual
//! failures: its result is the full outcome list, one entry per task.

mod dir_cache;

pub use dir_cache::DirCache;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};

use crate::config::Binding;
use crate::error::{ConnError, TransferError};
use crate::logging::*;
use crate::protocol::{join_remote, RemoteConnection, Transport};
use crate::scan::relative_slash_path;

/// One file to upload: the local source plus its base-relative target path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferTask {
	pub local_path: PathBuf,
	pub relative_path: String,
}

/// Why a task failed. Connection failures are shared by every task of the
/// affected worker, hence the `Arc`.
#[derive(Debug, Clone)]
pub enum TransferFailure {
	/// The worker never got a connection; all its tasks carry this
	Connection(Arc<ConnError>),
	/// The individual transfer failed
	Transfer(Arc<TransferError>),
}

impl fmt::Display for TransferFailure {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TransferFailure::Connection(e) => write!(f, "{}", e),
			TransferFailure::Transfer(e) => write!(f, "{}", e),
		}
	}
}

/// Result of one task
#[derive(Debug)]
pub struct TransferOutcome {
	pub task: TransferTask,
	/// Connection attempts for connection failures, put attempts otherwise
	pub attempts: u32,
	pub error: Option<TransferFailure>,
}

impl TransferOutcome {
	pub fn is_success(&self) -> bool {
		self.error.is_none()
	}
}

/// Connection establishment policy: one attempt per timeout, escalating
#[derive(Debug, Clone)]
pub struct RetryPolicy {
	pub timeouts: Vec<Duration>,
}

impl Default for RetryPolicy {
	fn default() -> Self {
		RetryPolicy {
			timeouts: vec![
				Duration::from_secs(10),
				Duration::from_secs(30),
				Duration::from_secs(60),
			],
		}
	}
}

/// Per-run options
#[derive(Debug, Clone, Default)]
pub struct TransferOptions {
	/// Overrides the binding's `max_workers` when set
	pub max_workers: Option<usize>,
	pub retry: RetryPolicy,
}

/// Build a task from an absolute local path, or fail when the file escapes
/// the binding's local base path
pub fn task_for(local: &Path, binding: &Binding) -> Result<TransferTask, TransferError> {
	match relative_slash_path(local, &binding.local_basepath) {
		Some(rel) if !rel.is_empty() => {
			Ok(TransferTask { local_path: local.to_path_buf(), relative_path: rel })
		}
		_ => Err(TransferError::OutsideBasePath {
			path: local.to_path_buf(),
			base: binding.local_basepath.clone(),
		}),
	}
}

/// Build tasks for a list of absolute local file paths
pub fn tasks_for_files(
	files: &[PathBuf],
	binding: &Binding,
) -> Result<Vec<TransferTask>, TransferError> {
	files.iter().map(|f| task_for(f, binding)).collect()
}

/// Order tasks shallowest-first, then case-insensitively by path. Callers
/// use this so top-level files land before deeply nested ones; the pool
/// itself guarantees no ordering between workers.
pub fn sort_tasks(tasks: &mut [TransferTask]) {
	tasks.sort_by_key(|t| {
		(t.relative_path.matches('/').count(), t.relative_path.to_lowercase())
	});
}

/// Upload every task, returning one outcome per task.
///
/// Worker count is the explicit override, else the binding's configured
/// value, else 5; never more workers than tasks. A worker that exhausts its
/// connection attempts reports every task it would have handled as failed
/// with the same connection error; other workers are unaffected.
pub fn run(
	transport: &dyn Transport,
	binding: &Binding,
	tasks: Vec<TransferTask>,
	options: &TransferOptions,
	cache: &DirCache,
) -> Vec<TransferOutcome> {
	if tasks.is_empty() {
		return Vec::new();
	}

	let worker_count = options
		.max_workers
		.unwrap_or(binding.max_workers)
		.max(1)
		.min(tasks.len());

	let total = tasks.len();
	info!(workers = worker_count, tasks = total, host = %binding.hostname, "starting upload run");

	let (task_tx, task_rx) = crossbeam_channel::unbounded::<TransferTask>();
	for task in tasks {
		// unbounded channel, send cannot fail while the receiver lives
		let _ = task_tx.send(task);
	}
	drop(task_tx);

	let (outcome_tx, outcome_rx) = crossbeam_channel::unbounded::<TransferOutcome>();

	let outcomes = thread::scope(|scope| {
		for worker_id in 0..worker_count {
			let task_rx = task_rx.clone();
			let outcome_tx = outcome_tx.clone();
			scope.spawn(move || {
				worker_loop(worker_id, transport, binding, options, cache, &task_rx, &outcome_tx);
			});
		}
		drop(outcome_tx);
		// the iterator ends once every worker has dropped its sender
		outcome_rx.iter().collect::<Vec<_>>()
	});

	let failed = outcomes.iter().filter(|o| !o.is_success()).count();
	info!(total = outcomes.len(), failed = failed, "upload run finished");
	outcomes
}

fn worker_loop(
	worker_id: usize,
	transport: &dyn Transport,
	binding: &Binding,
	options: &TransferOptions,
	cache: &DirCache,
	tasks: &Receiver<TransferTask>,
	outcomes: &Sender<TransferOutcome>,
) {
	let timeouts: &[Duration] = if options.retry.timeouts.is_empty() {
		&[Duration::from_secs(10)]
	} else {
		&options.retry.timeouts
	};

	let mut connection: Option<Box<dyn RemoteConnection>> = None;
	let mut last_error: Option<ConnError> = None;
	let mut attempts: u32 = 0;

	for timeout in timeouts {
		attempts += 1;
		match transport.connect(binding, *timeout) {
			Ok(conn) => {
				connection = Some(conn);
				break;
			}
			Err(e) => {
				warn!(worker = worker_id, attempt = attempts, error = %e, "connection attempt failed");
				last_error = Some(e);
			}
		}
	}

	match connection {
		Some(mut conn) => {
			for task in tasks.iter() {
				let outcome = upload_one(conn.as_mut(), binding, task, cache);
				let _ = outcomes.send(outcome);
			}
		}
		None => {
			// every remaining task gets the same connection-error outcome
			let error = Arc::new(last_error.unwrap_or(ConnError::Timeout {
				host: binding.hostname.clone(),
			}));
			error!(worker = worker_id, error = %error, "connection retries exhausted");
			for task in tasks.iter() {
				let _ = outcomes.send(TransferOutcome {
					task,
					attempts,
					error: Some(TransferFailure::Connection(error.clone())),
				});
			}
		}
	}
}

fn upload_one(
	conn: &mut dyn RemoteConnection,
	binding: &Binding,
	task: TransferTask,
	cache: &DirCache,
) -> TransferOutcome {
	let remote_path = join_remote(&binding.remote_basepath, &task.relative_path);

	for dir in remote_ancestor_dirs(&remote_path) {
		// check-and-insert happens inside the cache lock; the create call
		// stays outside it, "already exists" counting as success
		if cache.mark(&dir) {
			if let Err(e) = conn.ensure_dir(&dir) {
				warn!(path = %dir, error = %e, "ensure_dir failed, put will surface the error");
			}
		}
	}

	match conn.put(&task.local_path, &remote_path) {
		Ok(()) => {
			info!(local = %task.local_path.display(), remote = %remote_path, "uploaded");
			TransferOutcome { task, attempts: 1, error: None }
		}
		Err(e) => {
			error!(local = %task.local_path.display(), error = %e, "upload failed");
			TransferOutcome {
				task,
				attempts: 1,
				error: Some(TransferFailure::Transfer(Arc::new(e))),
			}
		}
	}
}

/// Progressive directory prefixes of a remote file path, shallowest first:
/// `/var/www/css/a.css` yields `/var`, `/var/www`, `/var/www/css`.
fn remote_ancestor_dirs(remote_path: &str) -> Vec<String> {
	let parent = match remote_path.rsplit_once('/') {
		Some((parent, _)) => parent,
		None => return Vec::new(),
	};
	let absolute = parent.starts_with('/');
	let mut dirs = Vec::new();
	let mut current = String::new();
	for part in parent.split('/').filter(|p| !p.is_empty()) {
		if current.is_empty() && absolute {
			current = format!("/{}", part);
		} else if current.is_empty() {
			current = part.to_string();
		} else {
			current = format!("{}/{}", current, part);
		}
		dirs.push(current.clone());
	}
	dirs
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_remote_ancestor_dirs() {
		assert_eq!(
			remote_ancestor_dirs("/var/www/css/a.css"),
			vec!["/var", "/var/www", "/var/www/css"]
		);
		assert_eq!(remote_ancestor_dirs("public_html/a.css"), vec!["public_html"]);
		assert!(remote_ancestor_dirs("a.css").is_empty());
	}

	#[test]
	fn test_sort_tasks_depth_then_name() {
		let mut tasks = vec![
			TransferTask { local_path: "/b/x/y.css".into(), relative_path: "x/y.css".into() },
			TransferTask { local_path: "/b/B.css".into(), relative_path: "B.css".into() },
			TransferTask { local_path: "/b/a.css".into(), relative_path: "a.css".into() },
		];
		sort_tasks(&mut tasks);
		let order: Vec<&str> = tasks.iter().map(|t| t.relative_path.as_str()).collect();
		assert_eq!(order, vec!["a.css", "B.css", "x/y.css"]);
	}
}

// vim: ts=4
