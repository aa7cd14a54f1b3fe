//! Transport capability interface
//!
//! The orchestrator and diff engine depend only on the [`Transport`] /
//! [`RemoteConnection`] traits, never on protocol-specific types. Two
//! variants exist: FTP (`suppaftp`) and SFTP (`ssh2`). Connections are not
//! safe for concurrent use, so every worker owns its own.

mod ftp;
mod sftp;

pub use ftp::FtpTransport;
pub use sftp::SftpTransport;

use std::path::Path;
use std::time::Duration;

use crate::config::Binding;
use crate::error::{ConnError, TransferError};
use crate::types::{FileEntry, Protocol};

/// Result of ensuring a remote directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirStatus {
	Created,
	/// The directory was already there; never an error
	AlreadyExists,
}

/// Connection factory for one protocol
pub trait Transport: Send + Sync {
	fn connect(
		&self,
		binding: &Binding,
		timeout: Duration,
	) -> Result<Box<dyn RemoteConnection>, ConnError>;
}

/// One established remote session. All paths are absolute remote paths with
/// forward slashes, except `list` which returns base-relative entries.
pub trait RemoteConnection: Send {
	/// Create `path` if missing. "Already exists" is a success.
	fn ensure_dir(&mut self, path: &str) -> Result<DirStatus, TransferError>;

	/// Upload one local file to the absolute remote path, overwriting
	fn put(&mut self, local: &Path, remote: &str) -> Result<(), TransferError>;

	/// Recursively list the remote tree under `remote_base`, returning
	/// entries relative to it
	fn list(&mut self, remote_base: &str) -> Result<Vec<FileEntry>, TransferError>;
}

/// Transport implementation for a protocol
pub fn transport_for(protocol: Protocol) -> Box<dyn Transport> {
	match protocol {
		Protocol::Ftp => Box::new(FtpTransport),
		Protocol::Sftp => Box::new(SftpTransport),
	}
}

/// Join a remote base path and a base-relative path
pub(crate) fn join_remote(base: &str, rel: &str) -> String {
	let base = base.trim_end_matches('/');
	if rel.is_empty() {
		base.to_string()
	} else {
		format!("{}/{}", base, rel)
	}
}

/// Path of `full` relative to `base`, `None` when `full` is not below it
pub(crate) fn strip_remote_base(full: &str, base: &str) -> Option<String> {
	let base = base.trim_end_matches('/');
	if full == base {
		return Some(String::new());
	}
	full.strip_prefix(base)
		.and_then(|rest| rest.strip_prefix('/'))
		.map(str::to_string)
}


// vim: ts=4
