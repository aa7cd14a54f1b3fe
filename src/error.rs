//! Error types for gsupload operations

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for the resolution and transfer core.
///
/// Configuration and selection errors are fatal and abort before any network
/// activity. Connection and transfer errors never surface here: the
/// orchestrator captures them per worker / per task and returns them as
/// outcome data.
#[derive(Debug)]
pub enum UploadError {
	/// Configuration discovery, parsing or validation failed
	Config(ConfigError),

	/// Binding selection failed
	Selection(SelectionError),

	/// Exclusion pattern compilation failed
	Exclusion(ExclusionError),

	/// Local I/O error outside any transfer (e.g. scanning)
	Io(io::Error),
}

impl fmt::Display for UploadError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			UploadError::Config(e) => write!(f, "Configuration error: {}", e),
			UploadError::Selection(e) => write!(f, "Binding selection error: {}", e),
			UploadError::Exclusion(e) => write!(f, "Exclusion error: {}", e),
			UploadError::Io(e) => write!(f, "I/O error: {}", e),
		}
	}
}

impl Error for UploadError {}

impl From<ConfigError> for UploadError {
	fn from(e: ConfigError) -> Self {
		UploadError::Config(e)
	}
}

impl From<SelectionError> for UploadError {
	fn from(e: SelectionError) -> Self {
		UploadError::Selection(e)
	}
}

impl From<ExclusionError> for UploadError {
	fn from(e: ExclusionError) -> Self {
		UploadError::Exclusion(e)
	}
}

impl From<io::Error> for UploadError {
	fn from(e: io::Error) -> Self {
		UploadError::Io(e)
	}
}

/// Configuration discovery and merge errors
#[derive(Debug)]
pub enum ConfigError {
	/// No configuration layer found anywhere
	NotFound { searched: Vec<PathBuf> },

	/// A layer document is malformed
	Invalid { path: PathBuf, message: String },

	/// A selected binding lacks a required field after the full merge
	MissingField { alias: String, field: &'static str },
}

impl fmt::Display for ConfigError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ConfigError::NotFound { searched } => {
				let paths: Vec<String> = searched.iter().map(|p| p.display().to_string()).collect();
				write!(f, "Configuration file not found. Checked: {}", paths.join(", "))
			}
			ConfigError::Invalid { path, message } => {
				write!(f, "Failed to parse '{}': {}", path.display(), message)
			}
			ConfigError::MissingField { alias, field } => {
				write!(f, "Binding '{}' is missing required field '{}'", alias, field)
			}
		}
	}
}

impl Error for ConfigError {}

/// Binding selection errors
#[derive(Debug)]
pub enum SelectionError {
	/// Explicit alias not present in the merged configuration
	UnknownAlias { alias: String },

	/// No binding's local base path contains the current directory
	NoMatch { cwd: PathBuf },

	/// Several bindings match the current directory; the caller decides
	Ambiguous { candidates: Vec<String> },
}

impl fmt::Display for SelectionError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SelectionError::UnknownAlias { alias } => {
				write!(f, "Binding alias '{}' not found in configuration", alias)
			}
			SelectionError::NoMatch { cwd } => {
				write!(f, "No binding matches current directory {}", cwd.display())
			}
			SelectionError::Ambiguous { candidates } => {
				write!(f, "Multiple bindings match: {}", candidates.join(", "))
			}
		}
	}
}

impl Error for SelectionError {}

/// Exclusion pattern errors
#[derive(Debug)]
pub enum ExclusionError {
	/// Failed to compile a glob pattern
	InvalidPattern { pattern: String, message: String },
}

impl fmt::Display for ExclusionError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ExclusionError::InvalidPattern { pattern, message } => {
				write!(f, "Invalid exclusion pattern '{}': {}", pattern, message)
			}
		}
	}
}

impl Error for ExclusionError {}

/// Connection establishment errors, scoped to a single worker
#[derive(Debug)]
pub enum ConnError {
	/// Connection attempt timed out
	Timeout { host: String },

	/// TCP connection refused or unreachable
	Refused { host: String, source: io::Error },

	/// Authentication failed after trying every applicable method
	Auth { host: String, message: String },

	/// Protocol-level failure during session setup
	Protocol { host: String, message: String },
}

impl fmt::Display for ConnError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ConnError::Timeout { host } => write!(f, "Connection to {} timed out", host),
			ConnError::Refused { host, source } => {
				write!(f, "Connection to {} failed: {}", host, source)
			}
			ConnError::Auth { host, message } => {
				write!(f, "Authentication to {} failed: {}", host, message)
			}
			ConnError::Protocol { host, message } => {
				write!(f, "Protocol error on {}: {}", host, message)
			}
		}
	}
}

impl Error for ConnError {}

/// Transfer errors, scoped to a single task
#[derive(Debug)]
pub enum TransferError {
	/// Uploading the file failed mid-put
	Put { remote_path: String, message: String },

	/// Remote listing failed
	List { remote_path: String, message: String },

	/// Remote directory creation failed
	CreateDir { remote_path: String, message: String },

	/// Local file escapes the binding's local base path
	OutsideBasePath { path: PathBuf, base: PathBuf },

	/// Local read error
	Local { path: PathBuf, source: io::Error },
}

impl fmt::Display for TransferError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TransferError::Put { remote_path, message } => {
				write!(f, "Upload to '{}' failed: {}", remote_path, message)
			}
			TransferError::List { remote_path, message } => {
				write!(f, "Listing '{}' failed: {}", remote_path, message)
			}
			TransferError::CreateDir { remote_path, message } => {
				write!(f, "Creating remote directory '{}' failed: {}", remote_path, message)
			}
			TransferError::OutsideBasePath { path, base } => {
				write!(
					f,
					"File '{}' is not within local basepath '{}'",
					path.display(),
					base.display()
				)
			}
			TransferError::Local { path, source } => {
				write!(f, "Failed to read '{}': {}", path.display(), source)
			}
		}
	}
}

impl Error for TransferError {}

// vim: ts=4
