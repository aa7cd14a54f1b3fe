//! Shared data types for the resolution and transfer core

use serde::{Deserialize, Serialize};

/// Transfer protocol of a binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
	Ftp,
	Sftp,
}

impl Protocol {
	/// Default TCP port for the protocol
	pub fn default_port(self) -> u16 {
		match self {
			Protocol::Ftp => 21,
			Protocol::Sftp => 22,
		}
	}
}

impl std::fmt::Display for Protocol {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Protocol::Ftp => write!(f, "ftp"),
			Protocol::Sftp => write!(f, "sftp"),
		}
	}
}

/// Kind of a scanned or listed entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
	File,
	Directory,
}

/// One entry of a local scan or remote listing.
///
/// The path is always relative to the binding's local or remote base path and
/// uses forward slashes regardless of platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
	pub path: String,
	pub kind: FileKind,
}

impl FileEntry {
	pub fn file(path: impl Into<String>) -> Self {
		FileEntry { path: path.into(), kind: FileKind::File }
	}

	pub fn dir(path: impl Into<String>) -> Self {
		FileEntry { path: path.into(), kind: FileKind::Directory }
	}

	pub fn is_dir(&self) -> bool {
		self.kind == FileKind::Directory
	}
}

// vim: ts=4
